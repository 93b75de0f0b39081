//! Toast notifications
//!
//! Transient, non-blocking messages produced by the page controllers. The CLI
//! prints them to stderr; an embedding UI can render them however it likes.

use owo_colors::{AnsiColors, OwoColorize};

/// A toast notification message
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// The message to display
    pub message: String,
    /// The severity level of the toast
    pub level: ToastLevel,
}

/// Severity level for toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Error,
    Success,
}

impl Toast {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastLevel::Success)
    }

    /// The generic request-failure toast: "Failed to <verb> <entity>. Please try again."
    pub fn request_failed(verb: &str, entity: &str) -> Self {
        Self::error(format!("Failed to {verb} {entity}. Please try again."))
    }

    /// Get the color associated with this toast's level
    pub fn color(&self) -> AnsiColors {
        match self.level {
            ToastLevel::Error => AnsiColors::Red,
            ToastLevel::Success => AnsiColors::Green,
        }
    }

    /// Message colored by level, for terminal output
    pub fn render(&self) -> String {
        self.message.color(self.color()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_message() {
        let toast = Toast::request_failed("update", "bid");
        assert_eq!(toast.message, "Failed to update bid. Please try again.");
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.color(), AnsiColors::Red);
    }

    #[test]
    fn test_success_toast_is_green() {
        let toast = Toast::success("Bid created");
        assert_eq!(toast.level, ToastLevel::Success);
        assert_eq!(toast.color(), AnsiColors::Green);
        assert!(toast.render().contains("Bid created"));
    }
}
