use crate::classify::RemovalReason;
use crate::item::Item;
use crate::state::StopReason;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Invoke the item source's removal action for this item.
    Remove { item: Item },
    /// Sleep the confirm wait, then resolve the pending confirmation.
    AwaitConfirm { wait_ms: u64 },
    /// Ask the item source to load more entries (fire-and-forget).
    RequestMore,
    /// A removal was recorded; surface it to the host and the log.
    NotifyRemoved {
        title: String,
        source_name: String,
        reason: RemovalReason,
    },
    /// The scan delay escalated; surface it to the host and the log.
    NotifyBackoff { idle_scans: u32, next_delay_ms: u64 },
    /// Schedule the next scan cycle after this delay.
    ScheduleScan { delay_ms: u64 },
    /// The run is over; no further cycles may be scheduled.
    Finish { reason: StopReason },
}
