use sweeper_core::{RemovalReason, StatusSnapshot, StopReason};

/// Events the driver sends to its host, one channel message each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepEvent {
    /// The run began with these criteria.
    Started {
        min_duration_ms: u64,
        blocked_sources: usize,
    },
    /// An item was removed (or its confirmation was treated as handled).
    ItemRemoved {
        title: String,
        source_name: String,
        reason: RemovalReason,
    },
    /// The idle threshold was hit: a refill was requested and the scan
    /// delay escalated.
    BackoffEscalated { idle_scans: u32, next_delay_ms: u64 },
    /// One scan cycle settled.
    CycleCompleted { visible: usize, scanned: u64 },
    /// The run is over; no further events follow.
    Finished {
        reason: StopReason,
        status: StatusSnapshot,
    },
}
