//! Waitlist form validation and feedback state.
//!
//! This is UI-feedback orchestration only: the actual submission is handled
//! by an externally attached provider listener. Policy here is
//! block-and-defer — invalid input blocks the submit event outright; valid
//! input is allowed to propagate, and the confirmation message lands after a
//! fixed delay.

use std::sync::OnceLock;

use regex::Regex;

/// Delay before the confirmation message replaces the interim one.
pub const CONFIRM_DELAY_MS: i32 = 1400;

/// Class added to the email input while its value is invalid.
pub const INPUT_ERROR_CLASS: &str = "input-error";

pub const ERROR_MESSAGE: &str = "Please enter a valid email address.";
pub const SUBMITTING_MESSAGE: &str = "Adding you to the waitlist...";
pub const CONFIRMED_MESSAGE: &str = "You're on the list. We'll be in touch soon.";

/// Validate an email against the `local@domain.tld` shape.
pub fn validate_email(email: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    });
    pattern.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Submitting,
    Error,
    Confirmed,
}

/// What the DOM layer should display after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackView {
    pub message: &'static str,
    pub message_class: &'static str,
    /// Mark the email input with [`INPUT_ERROR_CLASS`].
    pub input_invalid: bool,
    /// Prevent the submit event from reaching the provider handler.
    pub block_submission: bool,
    /// Hide the auxiliary row/note elements.
    pub hide_aux: bool,
}

/// Form feedback state machine driven by submit events and the
/// post-submission timer.
#[derive(Debug, Default)]
pub struct FormFeedback {
    phase: FormPhase,
}

impl Default for FormPhase {
    fn default() -> Self {
        FormPhase::Idle
    }
}

impl FormFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Handle a submit event carrying the raw input value.
    pub fn submit(&mut self, raw_input: &str) -> FeedbackView {
        let email = raw_input.trim();

        if !validate_email(email) {
            self.phase = FormPhase::Error;
            return FeedbackView {
                message: ERROR_MESSAGE,
                message_class: "form-message form-message--error",
                input_invalid: true,
                block_submission: true,
                hide_aux: false,
            };
        }

        self.phase = FormPhase::Submitting;
        FeedbackView {
            message: SUBMITTING_MESSAGE,
            message_class: "form-message form-message--info",
            input_invalid: false,
            block_submission: false,
            hide_aux: true,
        }
    }

    /// Fixed-delay timer fired after a valid submission.
    ///
    /// Ignored unless the form is still in the submitting phase (a second
    /// submit may have raced the timer).
    pub fn confirm(&mut self) -> Option<FeedbackView> {
        if self.phase != FormPhase::Submitting {
            return None;
        }

        self.phase = FormPhase::Confirmed;
        Some(FeedbackView {
            message: CONFIRMED_MESSAGE,
            message_class: "form-message form-message--success",
            input_invalid: false,
            block_submission: false,
            hide_aux: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_accepts_standard_address() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("first.last+tag@sub.domain.co"));
    }

    #[test]
    fn test_validator_rejects_malformed_addresses() {
        assert!(!validate_email("user@"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("plain-text"));
        assert!(!validate_email(""));
        assert!(!validate_email("user@nodot"));
        assert!(!validate_email("user name@example.com"));
    }

    #[test]
    fn test_invalid_submission_blocks_and_marks_input() {
        let mut form = FormFeedback::new();
        let view = form.submit("not-an-email");

        assert_eq!(form.phase(), FormPhase::Error);
        assert_eq!(view.message, ERROR_MESSAGE);
        assert!(view.input_invalid);
        assert!(view.block_submission);
    }

    #[test]
    fn test_valid_submission_defers_and_hides_aux() {
        let mut form = FormFeedback::new();
        let view = form.submit("  user@example.com  "); // trimmed

        assert_eq!(form.phase(), FormPhase::Submitting);
        assert_eq!(view.message, SUBMITTING_MESSAGE);
        assert!(!view.input_invalid);
        assert!(!view.block_submission);
        assert!(view.hide_aux);
    }

    #[test]
    fn test_confirmation_after_valid_submission() {
        let mut form = FormFeedback::new();
        form.submit("user@example.com");

        let view = form.confirm().expect("confirmation should fire");
        assert_eq!(form.phase(), FormPhase::Confirmed);
        assert_eq!(view.message, CONFIRMED_MESSAGE);
        assert!(!view.input_invalid);
    }

    #[test]
    fn test_confirm_is_ignored_outside_submitting() {
        let mut form = FormFeedback::new();
        assert!(form.confirm().is_none());

        form.submit("nope");
        assert!(form.confirm().is_none());
        assert_eq!(form.phase(), FormPhase::Error);
    }

    #[test]
    fn test_error_then_valid_submission_recovers() {
        let mut form = FormFeedback::new();
        form.submit("bad");
        let view = form.submit("user@example.com");

        assert_eq!(form.phase(), FormPhase::Submitting);
        assert!(!view.input_invalid);
    }
}
