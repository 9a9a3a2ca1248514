use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Maximum number of lines retained in the visible transcript.
pub const OUTPUT_BUFFER_CAPACITY: usize = 1000;

/// Cadence at which pending lines are flushed into the transcript.
pub const FLUSH_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
struct OutputState {
    pending: Vec<String>,
    buffer: VecDeque<String>,
}

/// Bounded, append-only aggregator for execution output.
///
/// Lines arrive on `push` at whatever rate the remote side produces them
/// and are moved into the bounded transcript buffer only on `flush`, so
/// render work stays constant regardless of arrival rate. A line pushed
/// while a flush is draining lands in the next cycle.
#[derive(Debug)]
pub struct OutputAggregator {
    capacity: usize,
    state: Mutex<OutputState>,
}

impl Default for OutputAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(OUTPUT_BUFFER_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(OutputState::default()),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends one decoded line to the pending queue. Never blocks beyond
    /// the queue lock and never drops; bounding happens at flush time.
    pub fn push(&self, line: impl Into<String>) {
        let mut state = self.lock_state();
        state.pending.push(line.into());
    }

    /// Moves all pending lines into the bounded buffer in arrival order and
    /// trims the buffer from the front to capacity.
    ///
    /// Returns the newly flushed lines for rendering, or `None` when
    /// nothing was pending so callers can skip a redundant render.
    pub fn flush(&self) -> Option<Vec<String>> {
        let mut state = self.lock_state();
        if state.pending.is_empty() {
            return None;
        }

        let drained = std::mem::take(&mut state.pending);
        state.buffer.extend(drained.iter().cloned());
        while state.buffer.len() > self.capacity {
            state.buffer.pop_front();
        }

        Some(drained)
    }

    /// Snapshot of the bounded transcript, oldest line first.
    #[must_use]
    pub fn visible_lines(&self) -> Vec<String> {
        self.lock_state().buffer.iter().cloned().collect()
    }

    /// Clears both the pending queue and the transcript buffer so no output
    /// from a previous execution leaks into a new one.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.pending.clear();
        state.buffer.clear();
    }

    fn lock_state(&self) -> MutexGuard<'_, OutputState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
