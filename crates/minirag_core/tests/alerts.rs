use std::time::Duration;

use minirag_core::{update, AppState, ChatConfig, Effect, Msg};

fn scheduled_generation(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ScheduleAlertClear { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("alert clear scheduled")
}

#[test]
fn alert_clears_when_its_timer_fires() {
    let (state, effects) = update(AppState::new(), Msg::IngestSubmitted);
    let generation = scheduled_generation(&effects);
    assert!(state.view().status.is_some());

    let (mut state, _) = update(state, Msg::AlertExpired { generation });
    assert!(state.view().status.is_none());
    assert!(state.consume_dirty());
}

#[test]
fn newer_alert_restarts_the_delay() {
    let (state, effects) = update(AppState::new(), Msg::IngestSubmitted);
    let first = scheduled_generation(&effects);
    let (state, _) = update(state, Msg::ModeSelected(minirag_core::IngestionMode::File));
    let (state, effects) = update(state, Msg::IngestSubmitted);
    let second = scheduled_generation(&effects);
    assert!(second > first);

    let (state, _) = update(state, Msg::AlertExpired { generation: first });
    assert_eq!(
        state.view().status.map(|s| s.text),
        Some("Please select a file.".to_string())
    );

    let (state, _) = update(state, Msg::AlertExpired { generation: second });
    assert!(state.view().status.is_none());
}

#[test]
fn stale_timer_does_not_erase_indexing_status() {
    let (state, effects) = update(AppState::new(), Msg::IngestSubmitted);
    let stale = scheduled_generation(&effects);
    let (state, _) = update(state, Msg::IngestTextChanged("text".into()));
    let (state, _) = update(state, Msg::IngestSubmitted);

    let (state, _) = update(state, Msg::AlertExpired { generation: stale });
    assert_eq!(
        state.view().status.map(|s| s.text),
        Some("Indexing...".to_string())
    );
}

#[test]
fn configured_delay_is_used() {
    let config = ChatConfig {
        alert_clear_delay: Duration::from_millis(1500),
        ..ChatConfig::default()
    };
    let (_, effects) = update(AppState::with_config(config), Msg::IngestSubmitted);
    assert!(matches!(
        effects.as_slice(),
        [Effect::ScheduleAlertClear { after, .. }] if *after == Duration::from_millis(1500)
    ));
}
