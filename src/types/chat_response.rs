use serde::{Deserialize, Deserializer, Serialize};

/// Optional structured formatting attached to an answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StructuredAnswer {
    /// Concise answer suitable for direct display.
    #[serde(default)]
    pub summary: String,

    /// Key points, in display order.  `null` decodes as no bullets.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bullets: Vec<String>,
}

impl StructuredAnswer {
    /// Creates a new StructuredAnswer.
    pub fn new(summary: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            summary: summary.into(),
            bullets,
        }
    }
}

/// Body returned by `POST /api/chat`.
///
/// Decoding is tolerant: every field other than the JSON object itself may be
/// missing or `null`, in which case it is treated as absent rather than rejected.  The
/// values are passed through verbatim; `confidence` in particular is never
/// clamped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    /// The full answer text.
    #[serde(default)]
    pub answer: String,

    /// Structured payload; `null` and absent both decode to `None`.
    #[serde(default)]
    pub structured: Option<StructuredAnswer>,

    /// Source identifiers cited by the answer.  `null` decodes as none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<String>,

    /// Reliability score reported by the service.
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Deserialize a list that the backend may send as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
