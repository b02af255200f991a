use std::path::PathBuf;

use crate::{FormField, Generation, JobHandle, JobStatus, PollError, SubmissionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited a text input or picked a column.
    FieldEdited { field: FormField, value: String },
    /// User picked (or cleared) the file of an upload slot.
    FileChosen { slot: usize, path: Option<PathBuf> },
    /// User asked to submit the form as a new job.
    StartClicked,
    /// Engine finished the creation request.
    JobSubmitted {
        generation: Generation,
        result: Result<JobHandle, SubmissionError>,
    },
    /// Poll delay elapsed.
    PollDue { generation: Generation },
    /// Engine finished a status exchange.
    PollCompleted {
        generation: Generation,
        result: Result<JobStatus, PollError>,
    },
    /// Engine finished a field discovery request.
    FieldsDiscovered {
        slot: usize,
        ticket: u64,
        result: Result<Vec<String>, SubmissionError>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
