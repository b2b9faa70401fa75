//! Sweeper core: pure classification, dedupe, and scan-loop state machine.
mod classify;
mod config;
mod duration;
mod effect;
mod item;
mod ledger;
mod msg;
mod state;
mod update;

pub use classify::{classify, RemovalReason};
pub use config::SweepConfig;
pub use duration::parse_duration_ms;
pub use effect::Effect;
pub use item::{Identity, Item, ItemHandle};
pub use ledger::DedupeLedger;
pub use msg::{Msg, RemovalOutcome};
pub use state::{
    RemovalPhase, SessionState, StatusSnapshot, StopReason, SweepState,
};
pub use update::update;
