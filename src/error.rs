// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error taxonomy for the game.
//!
//! Every fallible operation in the crate returns [`Error`]. Errors are grouped
//! into categories so that the UI can log them in a structured way and show
//! the player a short, actionable message.

use crate::notifications::{NoticeLevel, Notify};
use thiserror::Error;

/// Store error codes that indicate a connectivity problem rather than a
/// rejected request.
pub const CONNECTIVITY_CODES: [&str; 3] = ["unavailable", "deadline-exceeded", "retry-limit-exceeded"];

/// Message shown for connectivity failures.
pub const CONNECTION_MESSAGE: &str = "Please check your internet connection and try again.";

/// Message shown for every other failure.
pub const GENERIC_MESSAGE: &str = "Please try again.";

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("store error ({code}): {message}")]
    Store { code: String, message: String },

    #[error("authentication failed ({code}): {message}")]
    Auth { code: String, message: String },

    #[error("image loading error: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("upload rejected: {0}")]
    UploadRejected(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid rectangle: {0}")]
    InvalidRectangle(String),

    #[error("step size must be strictly positive, got {0}")]
    InvalidStep(i64),

    #[error("invalid month index {0}")]
    InvalidMonth(u32),

    #[error("invalid game settings: {0}")]
    InvalidSettings(String),

    #[error("the game has ended, start a new game to keep playing")]
    GameOver,

    #[error("unreachable state: {0}")]
    Unreachable(&'static str),
}

/// Broad error category, one per reporting path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Auth,
    ImageLoad,
    Contract,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a store error from a backend code and message.
    pub fn store(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Store {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build an authentication error from a code and message.
    pub fn auth(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Auth {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Network(_) | Error::UploadRejected(_) | Error::Url(_) => ErrorCategory::Network,
            Error::Io(_) | Error::Json(_) | Error::Yaml(_) | Error::Store { .. } => {
                ErrorCategory::Storage
            }
            Error::Auth { .. } => ErrorCategory::Auth,
            Error::ImageLoad(_) => ErrorCategory::ImageLoad,
            Error::InvalidRectangle(_)
            | Error::InvalidStep(_)
            | Error::InvalidMonth(_)
            | Error::InvalidSettings(_)
            | Error::GameOver
            | Error::Unreachable(_) => ErrorCategory::Contract,
        }
    }

    pub fn is_network_error(&self) -> bool {
        self.category() == ErrorCategory::Network
    }

    pub fn is_storage_error(&self) -> bool {
        self.category() == ErrorCategory::Storage
    }

    pub fn is_auth_error(&self) -> bool {
        self.category() == ErrorCategory::Auth
    }

    pub fn is_image_load_error(&self) -> bool {
        self.category() == ErrorCategory::ImageLoad
    }

    /// True when the failure looks like a lost or flaky connection.
    pub fn is_connectivity(&self) -> bool {
        match self {
            Error::Network(e) => e.is_timeout() || e.is_connect(),
            Error::Store { code, .. } | Error::Auth { code, .. } => {
                let code = code.rsplit('/').next().unwrap_or(code);
                CONNECTIVITY_CODES.contains(&code)
            }
            _ => false,
        }
    }

    /// Short message suitable for a transient notification.
    pub fn user_message(&self) -> &'static str {
        if self.is_connectivity() {
            CONNECTION_MESSAGE
        } else {
            GENERIC_MESSAGE
        }
    }

    /// Structured log line for this error.
    pub fn log_line(&self, context: &str) -> String {
        if self.is_network_error() {
            return match self {
                Error::Network(e) => match e.status() {
                    Some(status) => format!("HTTP response error in {}\n status: {}", context, status),
                    None => format!("HTTP no response error in {}\n message: {}", context, e),
                },
                other => format!("Network error in {}\n message: {}", context, other),
            };
        }

        match self {
            Error::Auth { code, message } | Error::Store { code, message } => {
                let kind = if self.is_auth_error() { "Auth" } else { "Store" };
                format!("{} error in {}\n code: {}\n message: {}", kind, context, code, message)
            }
            other if other.is_image_load_error() => {
                format!("Image loading error in {}\n message: {}", context, other)
            }
            other if other.is_storage_error() => {
                format!("Storage error in {}\n message: {}", context, other)
            }
            other => format!("Uncaught error in {}\n {}", context, other),
        }
    }

    /// Log the error and, when a notifier is supplied, surface a short message.
    pub fn report(&self, context: &str, notifier: Option<&mut dyn Notify>) {
        log::error!("{}", self.log_line(context));
        if let Some(notifier) = notifier {
            notifier.notify(self.user_message().to_string(), NoticeLevel::Error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::Notice;

    #[derive(Default)]
    struct Collect(Vec<Notice>);

    impl Notify for Collect {
        fn notify(&mut self, message: String, level: NoticeLevel) {
            self.0.push(Notice { message, level });
        }
    }

    #[test]
    fn test_connectivity_codes_get_actionable_message() {
        let err = Error::store("storage/retry-limit-exceeded", "gave up");
        assert!(err.is_connectivity());
        assert_eq!(err.user_message(), CONNECTION_MESSAGE);

        let err = Error::store("unavailable", "offline");
        assert!(err.is_connectivity());
    }

    #[test]
    fn test_other_errors_get_generic_message() {
        let err = Error::store("permission-denied", "nope");
        assert!(!err.is_connectivity());
        assert_eq!(err.user_message(), GENERIC_MESSAGE);
        assert_eq!(Error::InvalidStep(0).user_message(), GENERIC_MESSAGE);
    }

    #[test]
    fn test_categories() {
        assert!(Error::auth("auth/wrong-password", "bad").is_auth_error());
        assert!(Error::store("x", "y").is_storage_error());
        assert!(Error::UploadRejected("no".into()).is_network_error());
        assert_eq!(Error::GameOver.category(), ErrorCategory::Contract);
        assert_eq!(Error::Unreachable("x").category(), ErrorCategory::Contract);
    }

    #[test]
    fn test_log_line_formats() {
        let err = Error::auth("auth/code", "auth error");
        assert_eq!(
            err.log_line("login"),
            "Auth error in login\n code: auth/code\n message: auth error"
        );
        let err = Error::store("storage/code", "storage error");
        assert_eq!(
            err.log_line("upload"),
            "Store error in upload\n code: storage/code\n message: storage error"
        );
        let err = Error::UploadRejected("wrong password".into());
        assert_eq!(
            err.log_line("upload"),
            "Network error in upload\n message: upload rejected: wrong password"
        );
        let err = Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(
            err.log_line("saving"),
            "Storage error in saving\n message: I/O error: disk full"
        );
        assert_eq!(
            Error::GameOver.log_line("round"),
            format!("Uncaught error in round\n {}", Error::GameOver)
        );
    }

    #[test]
    fn test_report_notifies_once() {
        let mut sink = Collect::default();
        Error::store("deadline-exceeded", "slow").report("scores", Some(&mut sink));
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].message, CONNECTION_MESSAGE);
        assert_eq!(sink.0[0].level, NoticeLevel::Error);

        // Logging only
        Error::GameOver.report("round", None);
    }
}
