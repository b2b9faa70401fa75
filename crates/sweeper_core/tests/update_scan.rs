use std::sync::Once;

use sweeper_core::{
    update, Effect, Msg, SessionState, StopReason, SweepConfig, SweepState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(sweep_logging::initialize_for_tests);
}

fn running_state(config: SweepConfig) -> SweepState {
    let (state, effects) = update(SweepState::new(config), Msg::StartRequested);
    assert_eq!(effects, vec![Effect::ScheduleScan { delay_ms: 0 }]);
    state
}

fn idle_batch(state: SweepState) -> (SweepState, Vec<Effect>) {
    update(
        state,
        Msg::BatchReady {
            items: Vec::new(),
            grew: false,
        },
    )
}

#[test]
fn start_schedules_an_immediate_cycle() {
    init_logging();
    let state = running_state(SweepConfig::default());
    assert_eq!(state.session(), SessionState::Running);
}

#[test]
fn repeated_start_is_a_noop() {
    let state = running_state(SweepConfig::default());
    let (state, effects) = update(state, Msg::StartRequested);
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Running);
}

#[test]
fn idle_scans_below_threshold_keep_the_base_delay() {
    init_logging();
    let config = SweepConfig::default();
    let base = config.scan_interval_ms;
    let mut state = running_state(config);

    for expected_idle in 1..15 {
        let (next, effects) = idle_batch(state);
        state = next;
        assert_eq!(state.idle_scans(), expected_idle);
        assert_eq!(effects, vec![Effect::ScheduleScan { delay_ms: base }]);
    }
}

#[test]
fn threshold_triggers_one_refill_and_backoff() {
    init_logging();
    let config = SweepConfig::default();
    let base = config.scan_interval_ms;
    let mut state = running_state(config);

    for _ in 1..15 {
        let (next, _effects) = idle_batch(state);
        state = next;
    }

    // 15th consecutive idle scan: request more exactly once, escalate delay.
    let (state, effects) = idle_batch(state);
    let escalated = base * 2;
    assert_eq!(
        effects,
        vec![
            Effect::RequestMore,
            Effect::NotifyBackoff {
                idle_scans: 15,
                next_delay_ms: escalated,
            },
            Effect::ScheduleScan {
                delay_ms: escalated,
            },
        ]
    );
    assert!(state.refill_attempted());
}

#[test]
fn failed_refill_finishes_the_run_as_stagnated() {
    init_logging();
    let mut state = running_state(SweepConfig::default());
    for _ in 1..=15 {
        let (next, _effects) = idle_batch(state);
        state = next;
    }

    let (state, effects) = idle_batch(state);
    assert_eq!(
        effects,
        vec![Effect::Finish {
            reason: StopReason::Stagnated,
        }]
    );
    assert_eq!(state.session(), SessionState::Finished);
    assert_eq!(state.stop_reason(), Some(StopReason::Stagnated));
}

#[test]
fn growth_resets_idle_counter_and_delay() {
    let config = SweepConfig::default();
    let base = config.scan_interval_ms;
    let mut state = running_state(config);

    for _ in 1..=15 {
        let (next, _effects) = idle_batch(state);
        state = next;
    }
    assert!(state.refill_attempted());

    // The refill produced growth: the episode is over.
    let (state, effects) = update(
        state,
        Msg::BatchReady {
            items: Vec::new(),
            grew: true,
        },
    );
    assert_eq!(state.idle_scans(), 0);
    assert!(!state.refill_attempted());
    assert_eq!(effects, vec![Effect::ScheduleScan { delay_ms: base }]);
}

#[test]
fn scanned_counter_accumulates_across_cycles() {
    use sweeper_core::Item;

    let mut state = running_state(SweepConfig::default());
    let batch = vec![
        Item {
            handle: 1,
            title: Some("Feature".to_string()),
            source_name: Some("Fine Channel".to_string()),
            duration_ms: Some(3_600_000),
            short_format: false,
        };
        3
    ];

    for _ in 0..2 {
        let (next, _effects) = update(
            state,
            Msg::BatchReady {
                items: batch.clone(),
                grew: false,
            },
        );
        state = next;
    }
    assert_eq!(state.status().scanned, 6);
}

#[test]
fn stop_while_idle_finishes_immediately() {
    let state = running_state(SweepConfig::default());
    let (state, effects) = update(state, Msg::StopRequested);

    assert_eq!(
        effects,
        vec![Effect::Finish {
            reason: StopReason::Stopped,
        }]
    );
    assert_eq!(state.session(), SessionState::Finished);
    assert_eq!(state.stop_reason(), Some(StopReason::Stopped));
}

#[test]
fn batches_are_ignored_before_start_and_after_finish() {
    let state = SweepState::new(SweepConfig::default());
    let (state, effects) = idle_batch(state);
    assert!(effects.is_empty());
    assert_eq!(state.status().scanned, 0);

    let state = running_state(SweepConfig::default());
    let (state, _effects) = update(state, Msg::StopRequested);
    let (state, effects) = idle_batch(state);
    assert!(effects.is_empty());
    assert_eq!(state.status().scanned, 0);
}

#[test]
fn block_source_grows_the_configured_set() {
    let state = running_state(SweepConfig::default());
    assert_eq!(state.status().blocked_sources, 0);

    let (state, effects) = update(state, Msg::BlockSource("Podpah".to_string()));
    assert!(effects.is_empty());
    assert_eq!(state.status().blocked_sources, 1);
    assert!(state.config().blocked_sources.contains("Podpah"));
}
