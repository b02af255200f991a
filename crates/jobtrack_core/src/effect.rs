use std::time::Duration;

use crate::{Credentials, FieldRequest, Generation, JobHandle, JobRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the creation request; answer with `Msg::JobSubmitted`.
    SubmitJob {
        generation: Generation,
        request: JobRequest,
    },
    /// Wait, then answer with `Msg::PollDue`.
    SchedulePoll {
        generation: Generation,
        delay: Duration,
    },
    /// One status exchange; answer with `Msg::PollCompleted`.
    PollStatus {
        generation: Generation,
        handle: JobHandle,
        credentials: Credentials,
    },
    /// List the columns of an uploaded file; answer with `Msg::FieldsDiscovered`.
    DiscoverFields {
        slot: usize,
        ticket: u64,
        request: FieldRequest,
    },
}
