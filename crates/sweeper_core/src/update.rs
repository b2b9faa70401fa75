use crate::classify::{classify, RemovalReason};
use crate::effect::Effect;
use crate::item::Item;
use crate::msg::{Msg, RemovalOutcome};
use crate::state::{RemovalPhase, SessionState, StopReason, SweepState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SweepState, msg: Msg) -> (SweepState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested => {
            if state.session() == SessionState::Idle {
                state.begin();
                // First cycle runs immediately.
                vec![Effect::ScheduleScan { delay_ms: 0 }]
            } else {
                Vec::new()
            }
        }
        Msg::StopRequested => match state.session() {
            SessionState::Idle => {
                state.finish(StopReason::Stopped);
                vec![Effect::Finish {
                    reason: StopReason::Stopped,
                }]
            }
            SessionState::Running => {
                if matches!(state.phase(), RemovalPhase::Idle) {
                    state.finish(StopReason::Stopped);
                    vec![Effect::Finish {
                        reason: StopReason::Stopped,
                    }]
                } else {
                    // An in-flight removal is allowed to settle before the
                    // run ends.
                    state.begin_finishing();
                    Vec::new()
                }
            }
            SessionState::Finishing | SessionState::Finished => Vec::new(),
        },
        Msg::BlockSource(name) => {
            state.block_source(name);
            Vec::new()
        }
        Msg::TrimTick => {
            state.trim_ledger();
            Vec::new()
        }
        Msg::BatchReady { items, grew } => handle_batch(&mut state, items, grew),
        Msg::RemovalResolved { outcome } => handle_removal_resolved(&mut state, outcome),
        Msg::ConfirmResolved { .. } => handle_confirm_resolved(&mut state),
    };

    (state, effects)
}

/// One scan cycle: select a target, or account for an idle pass.
fn handle_batch(state: &mut SweepState, items: Vec<Item>, grew: bool) -> Vec<Effect> {
    if state.session() != SessionState::Running || !matches!(state.phase(), RemovalPhase::Idle) {
        return Vec::new();
    }
    state.note_scanned(items.len() as u64);

    // First item that matches a rule and is not already in the ledger.
    // Failed removals are not recorded, so they are re-evaluated here every
    // cycle and criteria added at runtime can still catch them.
    let target = items.into_iter().find_map(|item| {
        let identity = item.identity()?;
        if state.ledger().contains(&identity) {
            return None;
        }
        let reason = classify(&item, state.config())?;
        Some((item, reason))
    });

    if let Some((item, reason)) = target {
        state.reset_idle();
        state.set_phase(RemovalPhase::Removing {
            item: item.clone(),
            reason,
        });
        return vec![Effect::Remove { item }];
    }

    if grew {
        state.reset_idle();
        return vec![Effect::ScheduleScan {
            delay_ms: state.next_scan_delay_ms(),
        }];
    }

    state.note_idle_scan();
    if state.idle_scans() < state.config().max_idle_scans {
        return vec![Effect::ScheduleScan {
            delay_ms: state.next_scan_delay_ms(),
        }];
    }
    if state.refill_attempted() {
        // The refill bought neither growth nor a match: the feed is
        // exhausted. Terminal success, not an error.
        state.finish(StopReason::Stagnated);
        return vec![Effect::Finish {
            reason: StopReason::Stagnated,
        }];
    }
    state.note_refill_attempt();
    vec![
        Effect::RequestMore,
        Effect::NotifyBackoff {
            idle_scans: state.idle_scans(),
            next_delay_ms: state.next_scan_delay_ms(),
        },
        Effect::ScheduleScan {
            delay_ms: state.next_scan_delay_ms(),
        },
    ]
}

fn handle_removal_resolved(state: &mut SweepState, outcome: RemovalOutcome) -> Vec<Effect> {
    let RemovalPhase::Removing { item, reason } = state.phase().clone() else {
        return Vec::new();
    };

    match outcome {
        RemovalOutcome::Removed => {
            state.set_phase(RemovalPhase::Idle);
            record(state, &item, reason)
        }
        RemovalOutcome::NeedsConfirmation => {
            let wait_ms = state.config().confirm_wait_ms;
            state.set_phase(RemovalPhase::AwaitingConfirmation { item, reason });
            vec![Effect::AwaitConfirm { wait_ms }]
        }
        RemovalOutcome::Unsupported | RemovalOutcome::Failed(_) => {
            // Not recorded: a later scan retries the item instead of the
            // ledger silently losing it.
            state.note_error();
            state.set_phase(RemovalPhase::Idle);
            after_action(state)
        }
    }
}

/// The confirm wait elapsed. Whether the confirming control was still
/// present or already gone, the removal counts as handled so a UI that
/// skips its own dialog cannot starve the loop.
fn handle_confirm_resolved(state: &mut SweepState) -> Vec<Effect> {
    let RemovalPhase::AwaitingConfirmation { item, reason } = state.phase().clone() else {
        return Vec::new();
    };
    state.set_phase(RemovalPhase::Idle);
    record(state, &item, reason)
}

fn record(state: &mut SweepState, item: &Item, reason: RemovalReason) -> Vec<Effect> {
    // Selection only picks items with a derivable identity.
    let Some(identity) = item.identity() else {
        return after_action(state);
    };
    state.record_removal(identity.clone());

    let mut effects = vec![Effect::NotifyRemoved {
        title: identity.title,
        source_name: identity.source_name,
        reason,
    }];
    effects.extend(after_action(state));
    effects
}

fn after_action(state: &mut SweepState) -> Vec<Effect> {
    if state.session() == SessionState::Finishing {
        state.finish(StopReason::Stopped);
        return vec![Effect::Finish {
            reason: StopReason::Stopped,
        }];
    }
    vec![Effect::ScheduleScan {
        delay_ms: state.config().action_delay_ms,
    }]
}
