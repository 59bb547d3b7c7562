//! Deferred work: debounce timers and animation-frame coalescing
//!
//! Time is supplied by the host as milliseconds (the animation-frame
//! timestamp). Nothing here runs on its own; the engine polls on each frame.

use smallvec::SmallVec;

/// A single-shot timer restarted by every [`Debouncer::arm`]
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer {
    delay_ms: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms: sanitize_delay(delay_ms),
            deadline: None,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    pub fn set_delay(&mut self, delay_ms: f64) {
        self.delay_ms = sanitize_delay(delay_ms);
    }

    /// Start or restart the timer
    pub fn arm(&mut self, now: f64) {
        self.deadline = Some(now + self.delay_ms);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true once when the deadline has passed, disarming the timer
    pub fn fire_if_due(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

fn sanitize_delay(delay_ms: f64) -> f64 {
    if delay_ms.is_finite() {
        delay_ms.max(0.0)
    } else {
        0.0
    }
}

/// Work that is coalesced into the next animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameTask {
    /// Re-measure blocks and recompute pages
    Measure,
    /// Regenerate the mirror snapshot if content changed
    Mirror,
    /// Re-derive the caret page
    Caret,
    /// Recompute the mounted page set
    Visibility,
}

/// Pending frame work; requesting the same task twice before the frame runs
/// schedules it once
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    pending: SmallVec<[FrameTask; 4]>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, task: FrameTask) {
        if !self.pending.contains(&task) {
            self.pending.push(task);
        }
    }

    /// Take the queued tasks in a fixed execution order
    pub fn take(&mut self) -> SmallVec<[FrameTask; 4]> {
        let mut tasks = std::mem::take(&mut self.pending);
        tasks.sort_by_key(|task| match task {
            FrameTask::Measure => 0,
            FrameTask::Mirror => 1,
            FrameTask::Caret => 2,
            FrameTask::Visibility => 3,
        });
        tasks
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_restarts() {
        let mut debouncer = Debouncer::new(100.0);
        debouncer.arm(0.0);
        debouncer.arm(80.0);
        assert!(!debouncer.fire_if_due(150.0));
        assert!(debouncer.fire_if_due(180.0));
        // Fires once
        assert!(!debouncer.fire_if_due(500.0));
    }

    #[test]
    fn test_debounce_cancel() {
        let mut debouncer = Debouncer::new(100.0);
        debouncer.arm(0.0);
        debouncer.cancel();
        assert!(!debouncer.is_armed());
        assert!(!debouncer.fire_if_due(1000.0));
    }

    #[test]
    fn test_negative_delay_is_immediate() {
        let mut debouncer = Debouncer::new(-5.0);
        debouncer.arm(10.0);
        assert!(debouncer.fire_if_due(10.0));
    }

    #[test]
    fn test_frame_requests_coalesce() {
        let mut queue = FrameQueue::new();
        queue.request(FrameTask::Visibility);
        queue.request(FrameTask::Measure);
        queue.request(FrameTask::Visibility);
        let tasks = queue.take();
        assert_eq!(tasks.as_slice(), &[FrameTask::Measure, FrameTask::Visibility]);
        assert!(queue.take().is_empty());
    }

    #[test]
    fn test_cancel_all() {
        let mut queue = FrameQueue::new();
        queue.request(FrameTask::Mirror);
        queue.cancel_all();
        assert!(queue.take().is_empty());
    }
}
