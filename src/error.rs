//! Error types with fix suggestions

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LibriError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum LibriError {
    #[error("Config error: {reason}")]
    Config { reason: String },

    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} request failed with status {status}: {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Malformed {service} response: {reason}")]
    MalformedResponse {
        service: &'static str,
        reason: String,
    },

    #[error("Recommendation service not initialized")]
    SessionMissing,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FixSuggestion for LibriError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            LibriError::Config { .. } => {
                Some("Check ~/.config/libri/config.toml for TOML syntax errors")
            }
            LibriError::InvalidUrl { .. } => {
                Some("Endpoint URLs must be absolute, e.g. http://localhost:4000")
            }
            LibriError::Http(_) => {
                Some("Check the service is running and the endpoint URL is reachable")
            }
            LibriError::Api { .. } => Some("Inspect the service logs for the failing request"),
            LibriError::MalformedResponse { .. } => {
                Some("The endpoint answered with an unexpected shape - verify the URL points at the right service")
            }
            LibriError::SessionMissing => {
                Some("Verify the session service URL and restart to re-initialize")
            }
            LibriError::Io(_) => Some("Check file path and permissions"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_has_a_suggestion() {
        let errors = [
            LibriError::Config {
                reason: "bad toml".into(),
            },
            LibriError::InvalidUrl {
                url: "nope".into(),
                reason: "relative URL without a base".into(),
            },
            LibriError::Api {
                service: "catalog",
                status: 500,
                body: "boom".into(),
            },
            LibriError::MalformedResponse {
                service: "agent",
                reason: "missing field".into(),
            },
            LibriError::SessionMissing,
        ];
        for e in errors {
            assert!(e.fix_suggestion().is_some(), "no suggestion for {e}");
        }
    }

    #[test]
    fn test_display_includes_context() {
        let e = LibriError::Api {
            service: "catalog",
            status: 503,
            body: "unavailable".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("catalog"));
        assert!(msg.contains("503"));
        assert!(msg.contains("unavailable"));
    }

    #[test]
    fn test_session_missing_message() {
        assert_eq!(
            LibriError::SessionMissing.to_string(),
            "Recommendation service not initialized"
        );
    }
}
