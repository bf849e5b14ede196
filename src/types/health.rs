use serde::{Deserialize, Serialize};

/// Body returned by `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    /// `"ok"` when the backend is ready to answer.
    pub status: String,
}

impl HealthStatus {
    /// Returns true if the backend reports itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
