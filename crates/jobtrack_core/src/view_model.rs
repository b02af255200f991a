use crate::{
    ClientError, DownloadDescriptor, Generation, JobHandle, JobStatus, Phase, SelectOption,
    StatusMessage, UPLOAD_SLOTS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub phase: Phase,
    pub status: StatusMessage,
    pub generation: Generation,
    pub job_id: Option<JobHandle>,
    pub latest_status: Option<JobStatus>,
    /// Polls sent for the current job.
    pub polls_issued: u32,
    pub downloads: Option<DownloadDescriptor>,
    pub column_options: [Vec<SelectOption>; UPLOAD_SLOTS],
    /// A field discovery request is still outstanding.
    pub discovering: bool,
    pub busy: bool,
    pub last_error: Option<ClientError>,
    pub dirty: bool,
}
