/*!
 * Progress reporting.
 *
 * Sinks receive `(percent, stage label)` pairs. Updates from concurrently
 * processed pages are serialised through one tracker so the percentages a
 * sink sees never decrease.
 */

use parking_lot::Mutex;
use std::sync::Arc;

/// Receiver of progress updates. Must return quickly.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, percent: f32, stage: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(f32, &str) + Send + Sync,
{
    fn on_progress(&self, percent: f32, stage: &str) {
        self(percent, stage)
    }
}

/// Sink that drops every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _percent: f32, _stage: &str) {}
}

#[derive(Debug, Default)]
struct TrackerState {
    done: usize,
    last_percent: f32,
}

/// Step counter shared by every page task of one document.
pub struct ProgressTracker {
    sink: Arc<dyn ProgressSink>,
    total_steps: usize,
    state: Mutex<TrackerState>,
}

impl ProgressTracker {
    /// Tracker for `total_steps` steps (pages × stages).
    pub fn new(sink: Arc<dyn ProgressSink>, total_steps: usize) -> Self {
        Self {
            sink,
            total_steps,
            state: Mutex::new(TrackerState::default()),
        }
    }

    /// Report the start of the run at 0%.
    pub fn start(&self, label: &str) {
        let state = self.state.lock();
        self.sink.on_progress(state.last_percent, label);
    }

    /// Mark `steps` steps done.
    pub fn advance(&self, steps: usize, label: &str) {
        let mut state = self.state.lock();
        state.done = (state.done + steps).min(self.total_steps);

        let percent = if self.total_steps == 0 {
            100.0
        } else {
            state.done as f32 * 100.0 / self.total_steps as f32
        };
        state.last_percent = state.last_percent.max(percent);

        // Sink is called under the lock so deliveries stay ordered
        self.sink.on_progress(state.last_percent, label);
    }

    /// Report the end of the run. Completed runs report 100%.
    pub fn finish(&self, label: &str, completed: bool) {
        let mut state = self.state.lock();
        if completed {
            state.done = self.total_steps;
            state.last_percent = 100.0;
        }
        self.sink.on_progress(state.last_percent, label);
    }

    /// Last delivered percentage.
    pub fn percent(&self) -> f32 {
        self.state.lock().last_percent
    }
}
