use crate::item::Item;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host asked the loop to begin scanning.
    StartRequested,
    /// Host asked the loop to stop; in-flight work settles first.
    StopRequested,
    /// Driver listed the currently visible items for this cycle.
    BatchReady { items: Vec<Item>, grew: bool },
    /// Driver finished the removal action for the selected item.
    RemovalResolved { outcome: RemovalOutcome },
    /// The confirm wait elapsed and the confirming control was resolved.
    /// `confirmed` is false when the control was already gone.
    ConfirmResolved { confirmed: bool },
    /// Wall-clock trim interval elapsed.
    TrimTick,
    /// Host added a source name to the blocked set.
    BlockSource(String),
}

/// How the item source answered a removal action, as seen by the state
/// machine. Confirmation handles stay at the driver boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed,
    NeedsConfirmation,
    Unsupported,
    Failed(String),
}
