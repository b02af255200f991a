//! JSON bodies exchanged with the backend.

use jobtrack_core::{JobHandle, JobStatus, PollError, SubmissionError};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JobIdValue {
    Text(String),
    Number(u64),
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedBody {
    job_id: JobIdValue,
}

impl CreatedBody {
    pub(crate) fn into_handle(self) -> Result<JobHandle, SubmissionError> {
        let id = match self.job_id {
            JobIdValue::Text(text) => text,
            JobIdValue::Number(number) => number.to_string(),
        };
        if id.trim().is_empty() {
            return Err(SubmissionError::new(None, Some("Empty job id".to_string())));
        }
        Ok(JobHandle::new(id))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    status: String,
    #[serde(default)]
    download_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl StatusBody {
    pub(crate) fn into_status(self) -> Result<JobStatus, PollError> {
        match self.status.as_str() {
            "QUEUED" => Ok(JobStatus::Queued),
            "RUNNING" => Ok(JobStatus::Running),
            "COMPLETED" => match self.download_token {
                Some(download_token) if !download_token.is_empty() => {
                    Ok(JobStatus::Completed { download_token })
                }
                _ => Err(PollError::new(
                    None,
                    Some("COMPLETED without download token".to_string()),
                )),
            },
            "FAILED" => Ok(JobStatus::Failed { error: self.error }),
            other => Err(PollError::new(None, Some(format!("Unknown status: {other}")))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldsBody {
    pub(crate) headers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

/// `detail` of an error body; non-string details are rendered as JSON text.
pub(crate) fn error_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        Value::String(text) => Some(text),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
