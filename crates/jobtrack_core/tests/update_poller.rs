use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use jobtrack_core::{
    update, ApiLayout, AppState, ClientError, Effect, EndpointPaths, FormField, JobHandle,
    JobStatus, Msg, Phase, PollError, PollSchedule, Severity, SubmissionError,
};
use pretty_assertions::assert_eq;

const FIRST: Duration = Duration::from_millis(1000);
const INTERVAL: Duration = Duration::from_millis(2000);

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(jobtrack_logging::initialize_for_tests);
}

fn filled_state() -> AppState {
    let layout = ApiLayout::new("http://localhost:8000", EndpointPaths::default()).unwrap();
    let mut state = AppState::new(
        layout,
        PollSchedule {
            first_delay: FIRST,
            interval: INTERVAL,
        },
    );
    let edits = [
        (FormField::Username, "operator"),
        (FormField::Password, "secret"),
        (FormField::Target, "Aurora"),
    ];
    for (field, value) in edits {
        state = update(
            state,
            Msg::FieldEdited {
                field,
                value: value.to_string(),
            },
        )
        .0;
    }
    for (slot, (file, column)) in [("/d/a.xlsx", "NED"), ("/d/b.xlsx", "Employee")]
        .into_iter()
        .enumerate()
    {
        state = update(
            state,
            Msg::FileChosen {
                slot,
                path: Some(PathBuf::from(file)),
            },
        )
        .0;
        state = update(
            state,
            Msg::FieldEdited {
                field: FormField::Column(slot),
                value: column.to_string(),
            },
        )
        .0;
    }
    state
}

/// Submits the form and accepts it as `job_id`; returns the generation.
fn submitted(job_id: &str) -> (AppState, u64, Vec<Effect>) {
    let (state, effects) = update(filled_state(), Msg::StartClicked);
    let generation = match effects.as_slice() {
        [Effect::SubmitJob { generation, .. }] => *generation,
        other => panic!("expected submit effect, got {other:?}"),
    };
    let (state, effects) = update(
        state,
        Msg::JobSubmitted {
            generation,
            result: Ok(JobHandle::new(job_id)),
        },
    );
    (state, generation, effects)
}

fn poll(state: AppState, generation: u64, status: JobStatus) -> (AppState, Vec<Effect>) {
    let (state, effects) = update(state, Msg::PollDue { generation });
    assert!(
        matches!(effects.as_slice(), [Effect::PollStatus { .. }]),
        "poll due must issue one request: {effects:?}"
    );
    update(
        state,
        Msg::PollCompleted {
            generation,
            result: Ok(status),
        },
    )
}

#[test]
fn accepted_submission_waits_first_delay() {
    init_logging();
    let (state, generation, effects) = submitted("abc123");

    let view = state.view();
    assert_eq!(view.phase, Phase::Pending);
    assert_eq!(view.status.text, "Queued: abc123");
    assert_eq!(view.job_id, Some(JobHandle::new("abc123")));
    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            generation,
            delay: FIRST
        }]
    );
}

#[test]
fn poll_request_carries_handle_and_credentials() {
    init_logging();
    let (state, generation, _) = submitted("abc123");
    let (state, effects) = update(state, Msg::PollDue { generation });

    match effects.as_slice() {
        [Effect::PollStatus {
            handle,
            credentials,
            ..
        }] => {
            assert_eq!(handle.as_str(), "abc123");
            assert_eq!(credentials.username(), "operator");
            assert_eq!(credentials.password(), "secret");
        }
        other => panic!("unexpected effects {other:?}"),
    }
    assert_eq!(state.view().polls_issued, 1);
}

#[test]
fn queued_running_completed_resolves_downloads() {
    init_logging();
    let (state, generation, _) = submitted("abc123");

    let (state, effects) = poll(state, generation, JobStatus::Queued);
    assert_eq!(state.view().status.text, "QUEUED…");
    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            generation,
            delay: INTERVAL
        }]
    );

    let (state, effects) = poll(state, generation, JobStatus::Running);
    assert_eq!(state.view().phase, Phase::Running);
    assert_eq!(state.view().status.text, "RUNNING…");
    assert_eq!(effects.len(), 1);

    let (state, effects) = poll(
        state,
        generation,
        JobStatus::Completed {
            download_token: "tok1".to_string(),
        },
    );
    assert!(effects.is_empty());

    let view = state.view();
    assert_eq!(view.phase, Phase::Completed);
    assert_eq!(view.status.severity, Severity::Ok);
    assert_eq!(view.status.text, "COMPLETED. Download outputs below.");
    assert_eq!(view.polls_issued, 3);
    let downloads = view.downloads.expect("downloads resolved");
    assert_eq!(
        downloads.links[0].url,
        "http://localhost:8000/download/tok1/excel1?app_username=operator&app_password=secret"
    );
    assert!(downloads.links.iter().all(|link| link.url.contains("tok1")));
}

#[test]
fn failed_job_reports_error_and_stops() {
    init_logging();
    let (state, generation, _) = submitted("abc123");
    let (state, effects) = poll(
        state,
        generation,
        JobStatus::Failed {
            error: Some("bad column".to_string()),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, Phase::Failed);
    assert_eq!(view.status.text, "FAILED: bad column");
    assert_eq!(view.status.severity, Severity::Error);
    assert_eq!(
        view.last_error,
        Some(ClientError::JobFailed {
            error: Some("bad column".to_string())
        })
    );
    assert!(view.downloads.is_none());

    let (_, effects) = update(state, Msg::PollDue { generation });
    assert!(effects.is_empty(), "terminal state must not poll again");
}

#[test]
fn poll_error_halts_without_retry() {
    init_logging();
    let (state, generation, _) = submitted("abc123");
    let (state, _) = update(state, Msg::PollDue { generation });
    let (state, effects) = update(
        state,
        Msg::PollCompleted {
            generation,
            result: Err(PollError::new(Some(404), Some("Job not found".to_string()))),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, Phase::Errored);
    assert_eq!(view.status.text, "Job not found");
    assert!(matches!(view.last_error, Some(ClientError::Poll(_))));
}

#[test]
fn rejected_submission_never_polls() {
    init_logging();
    let (state, effects) = update(filled_state(), Msg::StartClicked);
    let generation = match effects.as_slice() {
        [Effect::SubmitJob { generation, .. }] => *generation,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, effects) = update(
        state,
        Msg::JobSubmitted {
            generation,
            result: Err(SubmissionError::new(
                Some(400),
                Some("vessel required".to_string()),
            )),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, Phase::Errored);
    assert_eq!(view.status.text, "vessel required");
    assert_eq!(view.status.severity, Severity::Error);
    assert_eq!(view.job_id, None);
}

#[test]
fn resubmission_suppresses_previous_generation() {
    init_logging();
    let (state, first, _) = submitted("job-1");
    let (state, _) = update(state, Msg::PollDue { generation: first });

    let (state, effects) = update(state, Msg::StartClicked);
    let second = match effects.as_slice() {
        [Effect::SubmitJob { generation, .. }] => *generation,
        other => panic!("unexpected effects {other:?}"),
    };
    assert_eq!(second, first + 1);
    assert_eq!(state.view().job_id, None);

    let (mut state, _) = update(
        state,
        Msg::JobSubmitted {
            generation: second,
            result: Ok(JobHandle::new("job-2")),
        },
    );
    let before = state.view();
    assert!(state.consume_dirty());

    // The in-flight poll of the first job lands after the resubmission.
    let (mut state, effects) = update(
        state,
        Msg::PollCompleted {
            generation: first,
            result: Ok(JobStatus::Failed {
                error: Some("old".to_string()),
            }),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state.view().status, before.status);

    let (state, effects) = update(state, Msg::PollDue { generation: first });
    assert!(effects.is_empty());
    assert_eq!(state.view().phase, Phase::Pending);
    assert_eq!(state.view().job_id, Some(JobHandle::new("job-2")));
}

#[test]
fn invalid_resubmission_keeps_tracking_current_job() {
    init_logging();
    let (state, generation, _) = submitted("abc123");
    let (state, _) = update(
        state,
        Msg::FieldEdited {
            field: FormField::Password,
            value: String::new(),
        },
    );
    let (state, effects) = update(state, Msg::StartClicked);
    assert!(effects.is_empty());
    assert_eq!(state.view().phase, Phase::Pending);
    assert_eq!(state.view().status.severity, Severity::Error);

    let (_, effects) = update(state, Msg::PollDue { generation });
    assert_eq!(effects.len(), 1);
}
