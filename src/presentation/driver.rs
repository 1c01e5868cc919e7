// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Real-time driver.
//!
//! Maps the controller's virtual clock onto wall time: sleeps until the next
//! pending deadline, advances the controller to the elapsed wall time and
//! repeats. Show file reloads and Ctrl+C are handled between deadlines.

use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::time::{interval, sleep_until, MissedTickBehavior};
use tracing::{info, warn};

use super::{PresentationController, PresentationState};
use crate::config::watcher::{ConfigEvent, ConfigWatcher};
use crate::timing::WallClock;

/// Wait used when no timer is pending
const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Driver options
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Stop after this many completed loop passes (None runs until Ctrl+C)
    pub max_loops: Option<u64>,
    /// How often to poll the show file watcher
    pub reload_poll: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_loops: None,
            reload_poll: Duration::from_millis(200),
        }
    }
}

/// Start `controller` and drive it in real time until Ctrl+C, until
/// `max_loops` passes complete, or until the presentation stops itself.
/// The controller is always stopped before returning.
pub async fn run(
    mut controller: PresentationController,
    options: RunOptions,
    watcher: Option<ConfigWatcher>,
) -> Result<()> {
    let now = Instant::now();
    let clock = WallClock::anchored_at(now.checked_sub(controller.now()).unwrap_or(now));

    controller.start()?;

    let mut reload = interval(options.reload_poll);
    reload.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let wake = match controller.next_deadline() {
            Some(deadline) => clock.instant_at(deadline),
            None => Instant::now() + IDLE_WAIT,
        };

        tokio::select! {
            _ = sleep_until(wake.into()) => {
                controller.advance_to(clock.elapsed());
            }
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    warn!("failed to listen for Ctrl+C: {}", e);
                }
                info!("interrupted");
                break;
            }
            _ = reload.tick(), if watcher.is_some() => {
                if let Some(watcher) = watcher.as_ref() {
                    apply_config_events(&mut controller, watcher);
                }
            }
        }

        if controller.state() == PresentationState::Stopped {
            info!("presentation stopped itself");
            break;
        }
        if let (Some(max), Some(state)) = (options.max_loops, controller.timeline_state()) {
            if state.loop_generation >= max {
                info!(loops = state.loop_generation, "loop limit reached");
                break;
            }
        }
    }

    controller.stop();
    Ok(())
}

fn apply_config_events(controller: &mut PresentationController, watcher: &ConfigWatcher) {
    for event in watcher.recv_all() {
        match event {
            ConfigEvent::Reloaded(show) => {
                info!(show = %show.show.name, "show file changed");
                if let Err(e) = controller.reload(*show) {
                    warn!("reload rejected, keeping current show: {}", e);
                }
            }
            ConfigEvent::Error(message) => warn!("{}", message),
            ConfigEvent::FileCreated(path) => info!(?path, "show file created"),
            ConfigEvent::FileDeleted(path) => warn!(?path, "show file deleted"),
        }
    }
}
