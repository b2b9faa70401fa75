use async_trait::async_trait;

use sweeper_core::{Item, ItemHandle};

/// Opaque reference to a pending confirmation control.
pub type ConfirmToken = u64;

/// How the underlying UI answered a removal action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The item is gone.
    Removed,
    /// A confirming control must be invoked after a render delay.
    NeedsConfirmation(ConfirmToken),
    /// The item offers no removal action.
    Unsupported,
    /// The action was attempted and failed.
    Failed(String),
}

/// Result of resolving a confirmation control after the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The control was present and has been invoked.
    Confirmed,
    /// No control was found; it already closed or never appeared.
    AlreadyGone,
}

/// Boundary to the live, auto-updating item collection.
///
/// A real adapter queries a document structure for elements matching
/// configured selector patterns; that is pure configuration and lives
/// outside this crate. The driver only relies on this contract.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Currently visible items, in display order.
    async fn list(&self) -> Vec<Item>;

    /// Whether the visible count increased since the caller's recorded
    /// count.
    fn grew(&self, previous: usize) -> bool;

    /// Trigger whatever refill mechanism is appropriate (e.g. a scroll).
    /// Fire-and-forget.
    async fn request_more(&self);

    /// Invoke the removal action for one item.
    async fn remove(&self, handle: ItemHandle) -> ActionOutcome;

    /// Resolve a confirmation control issued by [`ItemSource::remove`].
    async fn confirm(&self, token: ConfirmToken) -> ConfirmOutcome;
}
