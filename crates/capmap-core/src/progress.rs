//! Synthetic upload progress

use crate::config::ProgressSchedule;
use crate::observer::SessionObserver;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// Background task advancing progress on a timer up to the ceiling
///
/// Dropping the ticker aborts the task.
#[derive(Debug)]
pub(crate) struct ProgressTicker {
    handle: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    /// Report 0% and start ticking
    pub(crate) fn spawn(schedule: ProgressSchedule, observer: Arc<dyn SessionObserver>) -> Self {
        observer.on_progress(0);

        let period = Duration::from_millis(schedule.tick_ms.max(1));
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            let mut percent = 0u8;
            while percent < schedule.ceiling {
                interval.tick().await;
                percent = percent.saturating_add(schedule.step).min(schedule.ceiling);
                observer.on_progress(percent);
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Stop ticking; no progress is reported after this returns
    pub(crate) async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            // Cancelled or finished, either way it is done reporting
            let _ = handle.await;
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
