//! Sweeper engine: effect execution and the cooperative scan-loop driver.
mod driver;
mod replay;
mod source;
mod types;

pub use driver::SweepHandle;
pub use replay::{RemovalBehavior, ReplayEntry, ReplayError, ReplayScript, ReplaySource};
pub use source::{ActionOutcome, ConfirmOutcome, ConfirmToken, ItemSource};
pub use types::SweepEvent;
