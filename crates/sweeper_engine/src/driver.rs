use std::collections::VecDeque;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use sweep_logging::{sweep_debug, sweep_info, sweep_warn};
use sweeper_core::{
    update, Effect, Item, Msg, RemovalOutcome, SessionState, StatusSnapshot, SweepConfig,
    SweepState,
};

use crate::source::{ActionOutcome, ConfirmOutcome, ConfirmToken, ItemSource};
use crate::types::SweepEvent;

enum Command {
    Start,
    Stop,
    AddBlockedSource(String),
}

/// Handle to a sweep run on its own driver thread.
///
/// The thread hosts a current-thread tokio runtime: every wait is a timer
/// await inside one sequential task, so cycles are strictly serialized and
/// one removal is in flight at a time. Dropping the handle closes the
/// command channel and the driver winds down on its own.
pub struct SweepHandle {
    cmd_tx: mpsc::Sender<Command>,
    event_rx: mpsc::Receiver<SweepEvent>,
    status: Arc<Mutex<StatusSnapshot>>,
}

impl SweepHandle {
    /// Spawns the driver thread. The run does not scan until
    /// [`SweepHandle::start`] is called.
    pub fn spawn(config: SweepConfig, source: Box<dyn ItemSource>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let status = Arc::new(Mutex::new(StatusSnapshot::default()));
        let shared = status.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .expect("tokio runtime");
            runtime.block_on(run_loop(config, source, cmd_rx, event_tx, shared));
        });

        Self {
            cmd_tx,
            event_rx,
            status,
        }
    }

    pub fn start(&self) {
        let _ = self.cmd_tx.send(Command::Start);
    }

    /// Requests a stop. Honored at the top of the next cycle; an in-flight
    /// removal settles first.
    pub fn stop(&self) {
        let _ = self.cmd_tx.send(Command::Stop);
    }

    pub fn add_blocked_source(&self, name: impl Into<String>) {
        let _ = self.cmd_tx.send(Command::AddBlockedSource(name.into()));
    }

    /// Counters as of the most recently settled message.
    pub fn status(&self) -> StatusSnapshot {
        self.status
            .lock()
            .map(|snapshot| snapshot.clone())
            .unwrap_or_default()
    }

    pub fn try_recv_event(&self) -> Option<SweepEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks up to `timeout` for the next event. `None` on timeout or
    /// after the driver has gone away; a run always ends with
    /// [`SweepEvent::Finished`] before that happens.
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<SweepEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn run_loop(
    config: SweepConfig,
    source: Box<dyn ItemSource>,
    cmd_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<SweepEvent>,
    status: Arc<Mutex<StatusSnapshot>>,
) {
    let mut state = SweepState::new(config);
    let mut driver = Driver {
        source,
        event_tx,
        status,
        pending_confirm: None,
        next_delay_ms: None,
    };
    driver.publish_status(&state);

    // Nothing is scheduled until the host starts the run, so a blocking
    // recv is fine here. A stop (or a dropped handle) before the first
    // start ends the run without a single scan.
    loop {
        let Ok(command) = cmd_rx.recv() else { return };
        let starting = matches!(command, Command::Start);
        state = driver.apply_command(state, command).await;
        if state.session() == SessionState::Finished {
            return;
        }
        if starting && state.session() == SessionState::Running {
            sweep_info!(
                "starting sweep: shorter than {}ms or one of {} blocked sources",
                state.config().min_duration_ms,
                state.config().blocked_sources.len()
            );
            driver.emit(SweepEvent::Started {
                min_duration_ms: state.config().min_duration_ms,
                blocked_sources: state.config().blocked_sources.len(),
            });
            break;
        }
    }

    let mut last_trim = Instant::now();
    let mut previous_count = 0usize;
    let mut cycle: u64 = 0;

    while let Some(delay_ms) = driver.next_delay_ms.take() {
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        cycle += 1;
        sweep_logging::set_scan_cycle(cycle);

        // Stop and configuration commands are honored at the top of every
        // cycle, never mid-removal.
        loop {
            match cmd_rx.try_recv() {
                Ok(command) => state = driver.apply_command(state, command).await,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    // The host dropped the handle; treat it as a stop.
                    state = driver.drive(state, Msg::StopRequested).await;
                    break;
                }
            }
        }
        if state.session() == SessionState::Finished {
            break;
        }

        let trim_interval = Duration::from_millis(state.config().trim_interval_ms);
        if last_trim.elapsed() >= trim_interval {
            state = driver.drive(state, Msg::TrimTick).await;
            last_trim = Instant::now();
        }

        let items = driver.source.list().await;
        let grew = driver.source.grew(previous_count);
        previous_count = items.len();
        let visible = items.len();

        state = driver.drive(state, Msg::BatchReady { items, grew }).await;

        sweep_debug!(
            "cycle {}: {} visible, {}/{} idle scans",
            cycle,
            visible,
            state.idle_scans(),
            state.config().max_idle_scans
        );
        driver.emit(SweepEvent::CycleCompleted {
            visible,
            scanned: state.status().scanned,
        });

        if state.session() == SessionState::Finished {
            break;
        }
    }
}

struct Driver {
    source: Box<dyn ItemSource>,
    event_tx: mpsc::Sender<SweepEvent>,
    status: Arc<Mutex<StatusSnapshot>>,
    pending_confirm: Option<ConfirmToken>,
    next_delay_ms: Option<u64>,
}

impl Driver {
    async fn apply_command(&mut self, state: SweepState, command: Command) -> SweepState {
        let msg = match command {
            Command::Start => Msg::StartRequested,
            Command::Stop => Msg::StopRequested,
            Command::AddBlockedSource(name) => {
                sweep_info!("blocking source: {name}");
                Msg::BlockSource(name)
            }
        };
        self.drive(state, msg).await
    }

    /// Feeds one message through the pure update function and executes the
    /// resulting effects in order, looping outcome messages back in until
    /// everything has settled. This is what keeps removals serialized.
    async fn drive(&mut self, mut state: SweepState, msg: Msg) -> SweepState {
        let mut inbox = VecDeque::new();
        inbox.push_back(msg);

        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;

            for effect in effects {
                match effect {
                    Effect::Remove { item } => {
                        let outcome = self.execute_remove(&item).await;
                        inbox.push_back(Msg::RemovalResolved { outcome });
                    }
                    Effect::AwaitConfirm { wait_ms } => {
                        // The dialog needs time to render before lookup.
                        tokio::time::sleep(Duration::from_millis(wait_ms)).await;
                        let confirmed = self.resolve_confirm().await;
                        inbox.push_back(Msg::ConfirmResolved { confirmed });
                    }
                    Effect::RequestMore => {
                        self.source.request_more().await;
                    }
                    Effect::NotifyRemoved {
                        title,
                        source_name,
                        reason,
                    } => {
                        sweep_info!(
                            "removed \"{}\" [{}]: {}",
                            truncate_title(&title),
                            source_name,
                            reason
                        );
                        self.emit(SweepEvent::ItemRemoved {
                            title,
                            source_name,
                            reason,
                        });
                    }
                    Effect::NotifyBackoff {
                        idle_scans,
                        next_delay_ms,
                    } => {
                        sweep_info!(
                            "no growth after {idle_scans} idle scans: requested more items, backing off to {next_delay_ms}ms"
                        );
                        self.emit(SweepEvent::BackoffEscalated {
                            idle_scans,
                            next_delay_ms,
                        });
                    }
                    Effect::ScheduleScan { delay_ms } => {
                        self.next_delay_ms = Some(delay_ms);
                    }
                    Effect::Finish { reason } => {
                        let status = state.status();
                        sweep_info!(
                            "sweep finished ({reason}): removed {}, scanned {}, errors {}",
                            status.removed,
                            status.scanned,
                            status.errors
                        );
                        self.emit(SweepEvent::Finished { reason, status });
                    }
                }
            }
        }

        self.publish_status(&state);
        state
    }

    async fn execute_remove(&mut self, item: &Item) -> RemovalOutcome {
        let label = item.title.as_deref().unwrap_or("(untitled)");
        match self.source.remove(item.handle).await {
            ActionOutcome::Removed => RemovalOutcome::Removed,
            ActionOutcome::NeedsConfirmation(token) => {
                self.pending_confirm = Some(token);
                RemovalOutcome::NeedsConfirmation
            }
            ActionOutcome::Unsupported => {
                sweep_warn!("removal unsupported for \"{}\"", truncate_title(label));
                RemovalOutcome::Unsupported
            }
            ActionOutcome::Failed(error) => {
                sweep_warn!("removal failed for \"{}\": {error}", truncate_title(label));
                RemovalOutcome::Failed(error)
            }
        }
    }

    async fn resolve_confirm(&mut self) -> bool {
        match self.pending_confirm.take() {
            Some(token) => match self.source.confirm(token).await {
                ConfirmOutcome::Confirmed => true,
                ConfirmOutcome::AlreadyGone => {
                    sweep_debug!("confirmation control already gone; treating as handled");
                    false
                }
            },
            None => false,
        }
    }

    fn emit(&self, event: SweepEvent) {
        // If the receiver is gone the host has exited; the run keeps its
        // own state and winds down via the closed command channel.
        let _ = self.event_tx.send(event);
    }

    fn publish_status(&self, state: &SweepState) {
        if let Ok(mut snapshot) = self.status.lock() {
            *snapshot = state.status();
        }
    }
}

/// Log lines carry at most 40 characters of a title.
fn truncate_title(title: &str) -> String {
    let mut chars = title.chars();
    let head: String = chars.by_ref().take(40).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
