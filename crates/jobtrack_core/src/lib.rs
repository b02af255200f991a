//! Job tracking core: pure lifecycle state machine and view-model helpers.
mod effect;
mod error;
mod form;
mod layout;
mod msg;
mod resolver;
mod state;
mod status;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{ClientError, PollError, SubmissionError, ValidationError};
pub use form::{
    collect_field_request, collect_job_request, select_options, FieldRequest, FileHandle,
    FormField, FormInput, JobRequest, SelectOption, Selection, UploadSlot, COLUMN_PLACEHOLDER,
    DISCOVERY_FILE_FIELD, PASSWORD_FIELD, TARGET_FIELD, UPLOAD_SLOTS, USERNAME_FIELD,
};
pub use layout::{ApiLayout, EndpointPaths, LayoutError};
pub use msg::Msg;
pub use resolver::{resolve_downloads, DownloadDescriptor, DownloadLink, ARTIFACTS};
pub use state::{AppState, Phase, PollSchedule};
pub use status::{Severity, StatusMessage};
pub use types::{Credentials, Generation, JobHandle, JobStatus};
pub use update::update;
pub use view_model::AppViewModel;
