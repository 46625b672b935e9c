//! Periodic workspace-layout save.
//!
//! The timer only posts `Action::SaveLayout` onto the kernel bus; the owner
//! of the store decides when to apply it. Dropping the handle cancels the
//! task, so no tick can outlive the workspace that mounted it.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::kernel::services::KernelBusSender;
use crate::kernel::Action;

pub struct LayoutAutosave {
    handle: JoinHandle<()>,
    interval: Duration,
}

impl LayoutAutosave {
    /// Spawns the timer on the current tokio runtime. Returns `None` outside
    /// a runtime or for a zero interval.
    pub fn start(interval: Duration, bus: KernelBusSender) -> Option<Self> {
        if interval.is_zero() {
            return None;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::warn!(error = %e, "autosave not started: no async runtime");
                return None;
            }
        };

        let handle = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                tracing::trace!("autosave tick");
                if bus.send_action(Action::SaveLayout).is_err() {
                    break;
                }
            }
        });

        tracing::debug!(interval_secs = interval.as_secs(), "autosave started");
        Some(Self { handle, interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for LayoutAutosave {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("autosave stopped");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/autosave.rs"]
mod tests;
