//! The input control: a locally held draft and the rules for submitting it.

use crate::types::RequestStatus;

/// Draft text waiting to be submitted.
///
/// Submission trims the draft and refuses empty text without touching it.
/// A successful submission clears the draft immediately, whatever happens to
/// the request afterwards.  While the session is loading the control is
/// disabled: nothing can be submitted and the draft is kept.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBox {
    draft: String,
}

impl InputBox {
    /// Creates an empty input box.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the draft.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// The current draft, untrimmed.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether the control accepts input in the given session status.
    pub fn is_disabled(&self, status: &RequestStatus) -> bool {
        status.is_loading()
    }

    /// Whether the send action is available: enabled and a non-blank draft.
    pub fn can_submit(&self, status: &RequestStatus) -> bool {
        !self.is_disabled(status) && !self.draft.trim().is_empty()
    }

    /// Takes the trimmed draft for sending, clearing it.
    ///
    /// Returns `None`, leaving the draft as it was, when the control is
    /// disabled or the draft is blank.
    pub fn submit(&mut self, status: &RequestStatus) -> Option<String> {
        if !self.can_submit(status) {
            return None;
        }
        let text = self.draft.trim().to_string();
        self.draft.clear();
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_trims_and_clears() {
        let mut input = InputBox::new();
        input.set_draft("  Hello \n");
        assert_eq!(input.submit(&RequestStatus::Idle).as_deref(), Some("Hello"));
        assert_eq!(input.draft(), "");
    }

    #[test]
    fn blank_drafts_are_rejected_and_kept() {
        let mut input = InputBox::new();
        assert_eq!(input.submit(&RequestStatus::Idle), None);
        input.set_draft(" \t ");
        assert_eq!(input.submit(&RequestStatus::Idle), None);
        assert_eq!(input.draft(), " \t ");
    }

    #[test]
    fn disabled_while_loading() {
        let mut input = InputBox::new();
        input.set_draft("Are you there?");
        assert!(input.is_disabled(&RequestStatus::Loading));
        assert!(!input.can_submit(&RequestStatus::Loading));
        assert_eq!(input.submit(&RequestStatus::Loading), None);
        assert_eq!(input.draft(), "Are you there?");
    }

    #[test]
    fn enabled_after_error() {
        let mut input = InputBox::new();
        input.set_draft("retry");
        let status = RequestStatus::Error("Network Error".to_string());
        assert!(!input.is_disabled(&status));
        assert_eq!(input.submit(&status).as_deref(), Some("retry"));
    }
}
