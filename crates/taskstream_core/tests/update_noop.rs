use taskstream_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn messages_before_mount_issue_no_fetch() {
    let state = AppState::new();
    let (state, effects) = update(state, Msg::RefreshClicked);
    assert!(effects.is_empty());
    let (_state, effects) = update(state, Msg::PageSelected(3));
    assert!(effects.is_empty());
}
