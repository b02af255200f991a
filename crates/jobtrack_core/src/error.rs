use thiserror::Error;

/// Client-side input problem. Detected before anything touches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter app username/password")]
    MissingCredentials,
    #[error("Upload both Excel files")]
    MissingFiles,
    #[error("Select NED column for both files")]
    MissingSelections,
    #[error("Select vessel")]
    MissingTarget,
}

/// The backend rejected a submission (or discovery request), or was unreachable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub status: Option<u16>,
    pub message: String,
}

impl SubmissionError {
    pub const GENERIC_MESSAGE: &'static str = "Request failed";

    /// Uses the server detail when present, the generic message otherwise.
    pub fn new(status: Option<u16>, detail: Option<String>) -> Self {
        Self {
            status,
            message: non_empty(detail).unwrap_or_else(|| Self::GENERIC_MESSAGE.to_string()),
        }
    }

    pub fn generic() -> Self {
        Self::new(None, None)
    }
}

/// A poll exchange failed. Fatal for the tracking session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PollError {
    pub status: Option<u16>,
    pub message: String,
}

impl PollError {
    pub const GENERIC_MESSAGE: &'static str = "Status failed";

    pub fn new(status: Option<u16>, detail: Option<String>) -> Self {
        Self {
            status,
            message: non_empty(detail).unwrap_or_else(|| Self::GENERIC_MESSAGE.to_string()),
        }
    }

    pub fn generic() -> Self {
        Self::new(None, None)
    }
}

/// Every failure path the operator can see on the status line.
///
/// `JobFailed` is a successful poll reporting a business failure; it shares
/// the error severity with `Poll` but stays a distinct variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Poll(#[from] PollError),
    #[error("FAILED: {}", .error.as_deref().unwrap_or("Unknown error"))]
    JobFailed { error: Option<String> },
}

fn non_empty(detail: Option<String>) -> Option<String> {
    detail.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_match_form_prompts() {
        assert_eq!(
            ValidationError::MissingCredentials.to_string(),
            "Enter app username/password"
        );
        assert_eq!(
            ValidationError::MissingSelections.to_string(),
            "Select NED column for both files"
        );
    }

    #[test]
    fn detail_wins_over_generic_message() {
        let err = SubmissionError::new(Some(400), Some("vessel required".into()));
        assert_eq!(err.to_string(), "vessel required");
        assert_eq!(err.status, Some(400));
    }

    #[test]
    fn blank_detail_falls_back_to_generic() {
        assert_eq!(
            SubmissionError::new(Some(500), Some("  ".into())).message,
            SubmissionError::GENERIC_MESSAGE
        );
        assert_eq!(PollError::generic().message, PollError::GENERIC_MESSAGE);
    }

    #[test]
    fn job_failure_renders_with_prefix() {
        let with_reason = ClientError::JobFailed {
            error: Some("bad column".into()),
        };
        let without = ClientError::JobFailed { error: None };
        assert_eq!(with_reason.to_string(), "FAILED: bad column");
        assert_eq!(without.to_string(), "FAILED: Unknown error");
    }
}
