use std::time::Duration;

use crate::view_model::AppViewModel;
use crate::{
    resolve_downloads, select_options, ApiLayout, ClientError, Credentials, DownloadDescriptor,
    FormInput, Generation, JobHandle, JobStatus, StatusMessage, UPLOAD_SLOTS,
};

/// Delay before the first poll after submission, then between polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub first_delay: Duration,
    pub interval: Duration,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            first_delay: Duration::from_secs(1),
            interval: Duration::from_secs(2),
        }
    }
}

/// Lifecycle phase of the current (or last) job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    /// Handle obtained, first poll not answered yet.
    Pending,
    Queued,
    Running,
    Completed,
    Failed,
    /// Validation, submission or poll error.
    Errored,
}

impl Phase {
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            Phase::Idle | Phase::Completed | Phase::Failed | Phase::Errored
        )
    }

    fn from_status(status: &JobStatus) -> Self {
        match status {
            JobStatus::Queued => Phase::Queued,
            JobStatus::Running => Phase::Running,
            JobStatus::Completed { .. } => Phase::Completed,
            JobStatus::Failed { .. } => Phase::Failed,
        }
    }
}

/// Everything known about the job of one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JobContext {
    generation: Generation,
    credentials: Credentials,
    handle: Option<JobHandle>,
    latest: Option<JobStatus>,
    polls_issued: u32,
    downloads: Option<DownloadDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct DiscoverySlot {
    ticket: u64,
    in_flight: bool,
    fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    layout: ApiLayout,
    schedule: PollSchedule,
    form: FormInput,
    generation: Generation,
    job: Option<JobContext>,
    phase: Phase,
    status: StatusMessage,
    last_error: Option<ClientError>,
    discovery: [DiscoverySlot; UPLOAD_SLOTS],
    dirty: bool,
}

impl AppState {
    pub fn new(layout: ApiLayout, schedule: PollSchedule) -> Self {
        Self {
            layout,
            schedule,
            form: FormInput::default(),
            generation: 0,
            job: None,
            phase: Phase::Idle,
            status: StatusMessage::default(),
            last_error: None,
            discovery: Default::default(),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let job = self.job.as_ref();
        AppViewModel {
            phase: self.phase,
            status: self.status.clone(),
            generation: self.generation,
            job_id: job.and_then(|job| job.handle.clone()),
            latest_status: job.and_then(|job| job.latest.clone()),
            polls_issued: job.map_or(0, |job| job.polls_issued),
            downloads: job.and_then(|job| job.downloads.clone()),
            column_options: self
                .discovery
                .each_ref()
                .map(|slot| select_options(&slot.fields)),
            discovering: self.discovery.iter().any(|slot| slot.in_flight),
            busy: !self.phase.is_settled(),
            last_error: self.last_error.clone(),
            dirty: self.dirty,
        }
    }

    pub fn form(&self) -> &FormInput {
        &self.form
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn schedule(&self) -> PollSchedule {
        self.schedule
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormInput {
        self.dirty = true;
        &mut self.form
    }

    pub(crate) fn set_status(&mut self, status: StatusMessage) {
        self.status = status;
        self.dirty = true;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.dirty = true;
    }

    /// Records the error and shows it as the status line.
    pub(crate) fn report(&mut self, error: ClientError) {
        self.set_status(StatusMessage::error(error.to_string()));
        self.last_error = Some(error);
    }

    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        self.job
            .as_ref()
            .is_some_and(|job| job.generation == generation)
    }

    /// Replaces any tracked job with a fresh one and returns its generation.
    pub(crate) fn begin_job(&mut self, credentials: Credentials) -> Generation {
        self.generation += 1;
        self.job = Some(JobContext {
            generation: self.generation,
            credentials,
            handle: None,
            latest: None,
            polls_issued: 0,
            downloads: None,
        });
        self.last_error = None;
        self.set_phase(Phase::Submitting);
        self.generation
    }

    pub(crate) fn has_active_job(&self) -> bool {
        self.job.is_some() && !self.phase.is_settled()
    }

    pub(crate) fn attach_handle(&mut self, handle: JobHandle) {
        if let Some(job) = self.job.as_mut() {
            job.handle = Some(handle);
        }
        self.set_phase(Phase::Pending);
    }

    /// Handle and credentials for the next poll, counting it as issued.
    pub(crate) fn next_poll(&mut self) -> Option<(JobHandle, Credentials)> {
        if self.phase.is_settled() {
            return None;
        }
        let job = self.job.as_mut()?;
        let handle = job.handle.clone()?;
        job.polls_issued += 1;
        Some((handle, job.credentials.clone()))
    }

    /// Stores the latest status and moves the phase to match it.
    pub(crate) fn apply_status(&mut self, status: JobStatus) {
        let phase = Phase::from_status(&status);
        if let Some(job) = self.job.as_mut() {
            if let JobStatus::Completed { download_token } = &status {
                job.downloads = Some(resolve_downloads(
                    &self.layout,
                    download_token,
                    &job.credentials,
                ));
            }
            job.latest = Some(status);
        }
        self.set_phase(phase);
    }

    pub(crate) fn begin_discovery(&mut self, slot: usize) -> Option<u64> {
        let discovery = self.discovery.get_mut(slot)?;
        discovery.ticket += 1;
        discovery.in_flight = true;
        discovery.fields.clear();
        self.dirty = true;
        Some(discovery.ticket)
    }

    /// Closes the discovery of `ticket`. False when a newer request superseded it.
    pub(crate) fn finish_discovery(&mut self, slot: usize, ticket: u64) -> bool {
        match self.discovery.get_mut(slot) {
            Some(discovery) if discovery.ticket == ticket && discovery.in_flight => {
                discovery.in_flight = false;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_fields(&mut self, slot: usize, fields: Vec<String>) {
        if let Some(discovery) = self.discovery.get_mut(slot) {
            discovery.fields = fields;
            self.dirty = true;
        }
    }

    pub(crate) fn clear_fields(&mut self, slot: usize) {
        if let Some(discovery) = self.discovery.get_mut(slot) {
            if discovery.in_flight {
                discovery.ticket += 1;
                discovery.in_flight = false;
            }
            discovery.fields.clear();
            self.dirty = true;
        }
    }
}
