//! Headless host for a sweep run.
//!
//! Wires a scripted feed and an optional RON config into the engine,
//! pumps driver events to stdout, and reports the final counters.

mod config_file;
mod logging;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use sweeper_core::SweepConfig;
use sweeper_engine::{ReplaySource, SweepEvent, SweepHandle};

fn main() -> Result<()> {
    logging::initialize(logging::LogDestination::File);

    let mut args = std::env::args().skip(1);
    let Some(feed_path) = args.next() else {
        bail!("usage: sweeper_app <feed.json> [config.ron]");
    };
    let config = match args.next() {
        Some(path) => config_file::load_config(Path::new(&path))
            .with_context(|| format!("loading config {path}"))?,
        None => SweepConfig::default(),
    };

    let source = ReplaySource::load(Path::new(&feed_path))
        .with_context(|| format!("loading feed script {feed_path}"))?;

    println!(
        "sweep started at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let handle = SweepHandle::spawn(config, Box::new(source));
    handle.start();

    loop {
        match handle.recv_event_timeout(Duration::from_millis(250)) {
            Some(SweepEvent::Started {
                min_duration_ms,
                blocked_sources,
            }) => {
                println!(
                    "criteria: shorter than {}s, or one of {} blocked sources",
                    min_duration_ms / 1000,
                    blocked_sources
                );
            }
            Some(SweepEvent::ItemRemoved {
                title,
                source_name,
                reason,
            }) => {
                println!("removed \"{title}\" [{source_name}]: {reason}");
            }
            Some(SweepEvent::BackoffEscalated {
                idle_scans,
                next_delay_ms,
            }) => {
                println!("idle for {idle_scans} scans, backing off to {next_delay_ms}ms");
            }
            Some(SweepEvent::CycleCompleted { .. }) => {}
            Some(SweepEvent::Finished { reason, status }) => {
                println!(
                    "finished ({reason}) at {}: removed {}, scanned {}, errors {}",
                    chrono::Local::now().format("%H:%M:%S"),
                    status.removed,
                    status.scanned,
                    status.errors
                );
                break;
            }
            None => {}
        }
    }

    Ok(())
}
