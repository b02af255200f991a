use jobtrack_core::{update, ApiLayout, AppState, EndpointPaths, Msg, PollSchedule};

#[test]
fn update_is_noop() {
    let layout = ApiLayout::new("http://localhost:8000", EndpointPaths::default()).unwrap();
    let state = AppState::new(layout, PollSchedule::default());
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
