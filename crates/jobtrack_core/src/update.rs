use jobtrack_logging::{jobtrack_debug, jobtrack_info};

use crate::{
    collect_field_request, collect_job_request, AppState, ClientError, Effect,
    Generation, JobHandle, JobStatus, Msg, Phase, PollError, StatusMessage, SubmissionError,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Job messages tagged with a generation other than the current one belong to
/// a superseded submission and are dropped without touching the state.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FieldEdited { field, value } => {
            if !state.form_mut().set(field, value) {
                jobtrack_debug!("Ignoring edit of unknown field {:?}", field);
            }
            Vec::new()
        }
        Msg::FileChosen { slot, path } => on_file_chosen(&mut state, slot, path),
        Msg::StartClicked => on_start(&mut state),
        Msg::JobSubmitted { generation, result } => {
            if !state.is_current(generation) {
                jobtrack_debug!("Dropping stale submission result of generation {}", generation);
                return (state, Vec::new());
            }
            on_submitted(&mut state, generation, result)
        }
        Msg::PollDue { generation } => {
            if !state.is_current(generation) {
                jobtrack_debug!("Dropping stale poll timer of generation {}", generation);
                return (state, Vec::new());
            }
            match state.next_poll() {
                Some((handle, credentials)) => vec![Effect::PollStatus {
                    generation,
                    handle,
                    credentials,
                }],
                None => Vec::new(),
            }
        }
        Msg::PollCompleted { generation, result } => {
            if !state.is_current(generation) || state.phase().is_settled() {
                jobtrack_debug!("Dropping stale poll result of generation {}", generation);
                return (state, Vec::new());
            }
            on_polled(&mut state, generation, result)
        }
        Msg::FieldsDiscovered {
            slot,
            ticket,
            result,
        } => {
            if !state.finish_discovery(slot, ticket) {
                jobtrack_debug!("Dropping superseded field list for slot {}", slot);
                return (state, Vec::new());
            }
            match result {
                Ok(fields) => {
                    jobtrack_info!("Discovered {} fields for slot {}", fields.len(), slot);
                    state.set_fields(slot, fields);
                    state.set_status(StatusMessage::neutral("Headers loaded."));
                }
                Err(err) => state.report(ClientError::Submission(err)),
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn on_file_chosen(
    state: &mut AppState,
    slot: usize,
    path: Option<std::path::PathBuf>,
) -> Vec<Effect> {
    let chosen = path.is_some();
    match state.form_mut().uploads.get_mut(slot) {
        Some(upload) => {
            upload.file = path;
            upload.column.clear();
        }
        None => {
            jobtrack_debug!("Ignoring file for unknown slot {}", slot);
            return Vec::new();
        }
    }
    state.clear_fields(slot);
    if !chosen {
        return Vec::new();
    }

    match collect_field_request(state.form(), slot) {
        Ok(request) => {
            let Some(ticket) = state.begin_discovery(slot) else {
                return Vec::new();
            };
            state.set_status(StatusMessage::neutral("Reading headers…"));
            vec![Effect::DiscoverFields {
                slot,
                ticket,
                request,
            }]
        }
        Err(err) => {
            state.report(ClientError::Validation(err));
            Vec::new()
        }
    }
}

fn on_start(state: &mut AppState) -> Vec<Effect> {
    let request = match collect_job_request(state.form()) {
        Ok(request) => request,
        Err(err) => {
            jobtrack_info!("Submission blocked: {}", err);
            // A rejected form does not cancel a job that is still being tracked.
            if !state.has_active_job() {
                state.set_phase(Phase::Errored);
            }
            state.report(ClientError::Validation(err));
            return Vec::new();
        }
    };

    let generation = state.begin_job(request.credentials().clone());
    jobtrack_info!("Submitting job, generation {}", generation);
    state.set_status(StatusMessage::neutral("Submitting job…"));
    vec![Effect::SubmitJob {
        generation,
        request,
    }]
}

fn on_submitted(
    state: &mut AppState,
    generation: Generation,
    result: Result<JobHandle, SubmissionError>,
) -> Vec<Effect> {
    match result {
        Ok(handle) => {
            jobtrack_info!("Job {} accepted, generation {}", handle, generation);
            state.set_status(StatusMessage::neutral(format!("Queued: {handle}")));
            state.attach_handle(handle);
            vec![Effect::SchedulePoll {
                generation,
                delay: state.schedule().first_delay,
            }]
        }
        Err(err) => {
            state.set_phase(Phase::Errored);
            state.report(ClientError::Submission(err));
            Vec::new()
        }
    }
}

fn on_polled(
    state: &mut AppState,
    generation: Generation,
    result: Result<JobStatus, PollError>,
) -> Vec<Effect> {
    let status = match result {
        Ok(status) => status,
        Err(err) => {
            state.set_phase(Phase::Errored);
            state.report(ClientError::Poll(err));
            return Vec::new();
        }
    };

    jobtrack_debug!("Generation {} polled {}", generation, status.label());
    let effects = match &status {
        JobStatus::Queued | JobStatus::Running => {
            state.set_status(StatusMessage::neutral(format!("{}…", status.label())));
            vec![Effect::SchedulePoll {
                generation,
                delay: state.schedule().interval,
            }]
        }
        JobStatus::Completed { .. } => {
            state.set_status(StatusMessage::ok("COMPLETED. Download outputs below."));
            Vec::new()
        }
        JobStatus::Failed { error } => {
            state.report(ClientError::JobFailed {
                error: error.clone(),
            });
            Vec::new()
        }
    };
    state.apply_status(status);
    effects
}
