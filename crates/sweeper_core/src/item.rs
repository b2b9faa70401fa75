use std::fmt;

/// Opaque reference back into the item source. Only used to invoke removal;
/// never part of an item's identity.
pub type ItemHandle = u64;

/// One visible feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub handle: ItemHandle,
    /// Entry title, `None` when the adapter could not extract it.
    pub title: Option<String>,
    /// Channel/author name, `None` when the adapter could not extract it.
    pub source_name: Option<String>,
    /// Total duration in milliseconds; `None` is the explicit "unknown"
    /// sentinel and is never conflated with a zero duration.
    pub duration_ms: Option<u64>,
    /// Explicit short-format flag, independent of duration.
    pub short_format: bool,
}

impl Item {
    /// Dedup key for this item, or `None` if either component is missing.
    ///
    /// Invariant: an item without a derivable identity is never removed and
    /// never recorded, so the ledger only ever holds unambiguous entries.
    pub fn identity(&self) -> Option<Identity> {
        let title = non_blank(self.title.as_deref())?;
        let source_name = non_blank(self.source_name.as_deref())?;
        Some(Identity {
            title: title.to_string(),
            source_name: source_name.to_string(),
        })
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// Logical identity of a feed entry: `(title, source name)`.
///
/// Two items with equal identity are the same entry across scan cycles even
/// when their underlying handles differ (e.g. after a reload).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    pub title: String,
    pub source_name: String,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" [{}]", self.title, self.source_name)
    }
}
