use std::fmt;

use crate::classify::RemovalReason;
use crate::config::SweepConfig;
use crate::item::{Identity, Item};
use crate::ledger::DedupeLedger;

/// Lifecycle of a sweep run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet started.
    Idle,
    /// Scanning and removing.
    Running,
    /// Stop requested while a removal was in flight; it settles first.
    Finishing,
    /// No further cycles will run.
    Finished,
}

/// Why a finished run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The collection stopped growing and no matches remained. Terminal
    /// success, not an error.
    Stagnated,
    /// The host asked the run to stop.
    Stopped,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Stagnated => write!(f, "stagnated"),
            StopReason::Stopped => write!(f, "stopped by host"),
        }
    }
}

/// Where the serialized removal pipeline currently is.
///
/// Selection and recording are instantaneous transitions of the pure
/// machine; only the action itself and the confirmation wait are phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalPhase {
    Idle,
    Removing { item: Item, reason: RemovalReason },
    AwaitingConfirmation { item: Item, reason: RemovalReason },
}

/// Counters exposed to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub removed: u64,
    pub scanned: u64,
    pub errors: u64,
    pub blocked_sources: usize,
}

/// All state owned by one sweep run: created on start, discarded when the
/// run ends. There is no process-wide mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepState {
    session: SessionState,
    phase: RemovalPhase,
    config: SweepConfig,
    ledger: DedupeLedger,
    idle_scans: u32,
    scan_delay_ms: u64,
    refill_attempted: bool,
    removed: u64,
    scanned: u64,
    errors: u64,
    stop_reason: Option<StopReason>,
}

impl SweepState {
    pub fn new(config: SweepConfig) -> Self {
        let scan_delay_ms = config.scan_interval_ms;
        Self {
            session: SessionState::Idle,
            phase: RemovalPhase::Idle,
            config,
            ledger: DedupeLedger::new(),
            idle_scans: 0,
            scan_delay_ms,
            refill_attempted: false,
            removed: 0,
            scanned: 0,
            errors: 0,
            stop_reason: None,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn phase(&self) -> &RemovalPhase {
        &self.phase
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    pub fn ledger(&self) -> &DedupeLedger {
        &self.ledger
    }

    pub fn idle_scans(&self) -> u32 {
        self.idle_scans
    }

    /// Delay the next scheduled cycle will use.
    pub fn next_scan_delay_ms(&self) -> u64 {
        self.scan_delay_ms
    }

    /// Whether the current stagnation episode already requested a refill.
    pub fn refill_attempted(&self) -> bool {
        self.refill_attempted
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            removed: self.removed,
            scanned: self.scanned,
            errors: self.errors,
            blocked_sources: self.config.blocked_sources.len(),
        }
    }

    pub(crate) fn begin(&mut self) {
        self.session = SessionState::Running;
    }

    pub(crate) fn begin_finishing(&mut self) {
        self.session = SessionState::Finishing;
    }

    pub(crate) fn finish(&mut self, reason: StopReason) {
        self.session = SessionState::Finished;
        self.stop_reason = Some(reason);
    }

    pub(crate) fn set_phase(&mut self, phase: RemovalPhase) {
        self.phase = phase;
    }

    pub(crate) fn block_source(&mut self, name: String) {
        self.config.blocked_sources.insert(name);
    }

    pub(crate) fn trim_ledger(&mut self) {
        let capacity = self.config.ledger_capacity;
        self.ledger.trim(capacity);
    }

    pub(crate) fn note_scanned(&mut self, count: u64) {
        self.scanned += count;
    }

    pub(crate) fn note_idle_scan(&mut self) {
        self.idle_scans += 1;
    }

    /// Growth or a match: idle accounting and the delay go back to base.
    pub(crate) fn reset_idle(&mut self) {
        self.idle_scans = 0;
        self.refill_attempted = false;
        self.scan_delay_ms = self.config.scan_interval_ms;
    }

    pub(crate) fn note_refill_attempt(&mut self) {
        self.refill_attempted = true;
        self.scan_delay_ms =
            ((self.scan_delay_ms as f64) * self.config.backoff_multiplier).round() as u64;
    }

    pub(crate) fn note_error(&mut self) {
        self.errors += 1;
    }

    pub(crate) fn record_removal(&mut self, identity: Identity) {
        self.ledger.record(identity);
        self.removed += 1;
    }
}
