use std::fmt;

use crate::config::SweepConfig;
use crate::item::Item;

/// The first removal rule an item matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalReason {
    /// The explicit short-format flag was set.
    ShortFormat,
    /// Known duration below the configured minimum.
    TooShort { duration_ms: u64 },
    /// Source name is in the blocked set.
    BlockedSource { name: String },
}

impl fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalReason::ShortFormat => write!(f, "short format"),
            RemovalReason::TooShort { duration_ms } => {
                write!(f, "too short ({}s)", duration_ms / 1000)
            }
            RemovalReason::BlockedSource { name } => write!(f, "blocked source ({name})"),
        }
    }
}

/// Decides whether an item matches a removal rule.
///
/// Rules short-circuit in a fixed priority order: the explicit format flag,
/// then the duration threshold, then the blocked-source set; the first
/// satisfied clause is the reported reason. Items without a derivable
/// identity never match, regardless of other signals, so the dedupe ledger
/// is never fed ambiguous entries.
pub fn classify(item: &Item, config: &SweepConfig) -> Option<RemovalReason> {
    item.identity()?;

    if item.short_format {
        return Some(RemovalReason::ShortFormat);
    }
    if let Some(duration_ms) = item.duration_ms {
        if duration_ms < config.min_duration_ms {
            return Some(RemovalReason::TooShort { duration_ms });
        }
    }
    if let Some(name) = item.source_name.as_deref() {
        if config.blocked_sources.contains(name) {
            return Some(RemovalReason::BlockedSource {
                name: name.to_string(),
            });
        }
    }
    None
}
