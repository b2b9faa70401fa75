use std::collections::BTreeSet;

/// Runtime configuration for a sweep run.
///
/// All values are mutable at runtime through messages; the blocked-source
/// set grows via [`crate::Msg::BlockSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Items with a known duration below this are removed.
    pub min_duration_ms: u64,
    /// Source names whose items are always removed.
    pub blocked_sources: BTreeSet<String>,
    /// Base delay between scan cycles.
    pub scan_interval_ms: u64,
    /// Delay between a settled removal and the next scan.
    pub action_delay_ms: u64,
    /// Wait before resolving a pending confirmation control.
    pub confirm_wait_ms: u64,
    /// Idle cycles (no growth, no match) tolerated before a refill request.
    pub max_idle_scans: u32,
    /// Scan delay multiplier applied on each refill request.
    pub backoff_multiplier: f64,
    /// Most recently removed identities kept by the ledger after a trim.
    pub ledger_capacity: usize,
    /// Wall-clock interval between ledger trims.
    pub trim_interval_ms: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: 90_000,
            blocked_sources: BTreeSet::new(),
            scan_interval_ms: 2_500,
            action_delay_ms: 800,
            confirm_wait_ms: 1_200,
            max_idle_scans: 15,
            backoff_multiplier: 2.0,
            ledger_capacity: 45,
            trim_interval_ms: 75_000,
        }
    }
}
