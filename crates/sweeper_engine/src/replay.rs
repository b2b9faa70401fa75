use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use sweeper_core::{parse_duration_ms, Item, ItemHandle};

use crate::source::{ActionOutcome, ConfirmOutcome, ConfirmToken, ItemSource};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed replay script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Scripted description of a virtualized feed.
///
/// The viewport starts at `initial_visible` entries and reveals another
/// `grow_step` on every refill request, which is how the lazily-populated
/// list is modeled for demos and tests.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default = "defaults::initial_visible")]
    pub initial_visible: usize,
    #[serde(default = "defaults::grow_step")]
    pub grow_step: usize,
    pub entries: Vec<ReplayEntry>,
}

/// One scripted feed entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayEntry {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    /// Duration text as the UI would render it (`H:MM:SS`, `MM:SS`, bare
    /// seconds), absent when the UI shows none.
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub short_format: bool,
    #[serde(default)]
    pub removal: RemovalBehavior,
}

/// How the scripted UI reacts when the entry's removal is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalBehavior {
    /// Single-step removal.
    #[default]
    Ok,
    /// A confirmation dialog renders and must be invoked.
    Confirm,
    /// A confirmation is announced but the dialog never appears.
    ConfirmMissing,
    /// The entry offers no removal action.
    Unsupported,
    /// The action fails every time.
    Fail,
    /// The action fails once, then succeeds.
    FailOnce,
}

mod defaults {
    pub(super) fn initial_visible() -> usize {
        10
    }
    pub(super) fn grow_step() -> usize {
        10
    }
}

/// [`ItemSource`] over a [`ReplayScript`].
pub struct ReplaySource {
    inner: Mutex<ReplayState>,
}

#[derive(Debug)]
struct ReplayState {
    entries: Vec<ReplayEntry>,
    removed: Vec<bool>,
    failed_once: Vec<bool>,
    visible: usize,
    grow_step: usize,
}

impl ReplaySource {
    pub fn new(script: ReplayScript) -> Self {
        let count = script.entries.len();
        let visible = script.initial_visible.min(count);
        Self {
            inner: Mutex::new(ReplayState {
                entries: script.entries,
                removed: vec![false; count],
                failed_once: vec![false; count],
                visible,
                grow_step: script.grow_step,
            }),
        }
    }

    /// Loads a script from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a script from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        let script: ReplayScript = serde_json::from_str(text)?;
        Ok(Self::new(script))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ReplayState> {
        self.inner.lock().expect("lock replay state")
    }
}

impl ReplayState {
    fn visible_count(&self) -> usize {
        self.removed[..self.visible]
            .iter()
            .filter(|gone| !**gone)
            .count()
    }

    fn item(&self, index: usize) -> Item {
        let entry = &self.entries[index];
        Item {
            handle: index as ItemHandle,
            title: entry.title.clone(),
            source_name: entry.channel.clone(),
            duration_ms: parse_duration_ms(entry.duration.as_deref()),
            short_format: entry.short_format,
        }
    }
}

#[async_trait]
impl ItemSource for ReplaySource {
    async fn list(&self) -> Vec<Item> {
        let state = self.lock();
        (0..state.visible)
            .filter(|&index| !state.removed[index])
            .map(|index| state.item(index))
            .collect()
    }

    fn grew(&self, previous: usize) -> bool {
        self.lock().visible_count() > previous
    }

    async fn request_more(&self) {
        let mut state = self.lock();
        let total = state.entries.len();
        state.visible = (state.visible + state.grow_step).min(total);
    }

    async fn remove(&self, handle: ItemHandle) -> ActionOutcome {
        let mut state = self.lock();
        let index = handle as usize;
        if index >= state.entries.len() || state.removed[index] {
            return ActionOutcome::Failed("stale handle".to_string());
        }
        match state.entries[index].removal {
            RemovalBehavior::Ok => {
                state.removed[index] = true;
                ActionOutcome::Removed
            }
            RemovalBehavior::Confirm => ActionOutcome::NeedsConfirmation(handle),
            RemovalBehavior::ConfirmMissing => {
                // The UI removes the entry and closes its own dialog before
                // anyone can confirm it.
                state.removed[index] = true;
                ActionOutcome::NeedsConfirmation(handle)
            }
            RemovalBehavior::Unsupported => ActionOutcome::Unsupported,
            RemovalBehavior::Fail => ActionOutcome::Failed("scripted failure".to_string()),
            RemovalBehavior::FailOnce => {
                if state.failed_once[index] {
                    state.removed[index] = true;
                    ActionOutcome::Removed
                } else {
                    state.failed_once[index] = true;
                    ActionOutcome::Failed("scripted transient failure".to_string())
                }
            }
        }
    }

    async fn confirm(&self, token: ConfirmToken) -> ConfirmOutcome {
        let mut state = self.lock();
        let index = token as usize;
        if index >= state.entries.len() || state.removed[index] {
            return ConfirmOutcome::AlreadyGone;
        }
        state.removed[index] = true;
        ConfirmOutcome::Confirmed
    }
}
