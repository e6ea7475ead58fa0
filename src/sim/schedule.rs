//! Cancellable delayed tasks on a simulated clock
//!
//! The engine never sleeps. It schedules a task N ms ahead and the clock is
//! advanced by `tick`. Tasks fire in due order (ties in scheduling order), and
//! a task scheduled while another fires is measured from that task's due
//! time, so one large `dt` plays out exactly like many small ones.

/// Handle for cancelling or inspecting a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    id: u64,
    due_ms: u64,
    task: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    queue: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            queue: Vec::new(),
        }
    }

    /// Current simulated time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Run `task` once `delay_ms` have elapsed
    pub fn schedule(&mut self, delay_ms: u32, task: T) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push(Scheduled {
            id,
            due_ms: self.now_ms + u64::from(delay_ms),
            task,
        });
        TaskHandle(id)
    }

    /// Drop a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|s| s.id != handle.0);
        self.queue.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    /// Time left before a pending task fires
    pub fn remaining_ms(&self, handle: TaskHandle) -> Option<u64> {
        self.queue
            .iter()
            .find(|s| s.id == handle.0)
            .map(|s| s.due_ms.saturating_sub(self.now_ms))
    }

    /// Remove and return the earliest task due at or before `until_ms`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<T> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= until_ms)
            .min_by_key(|(_, s)| (s.due_ms, s.id))
            .map(|(i, _)| i)?;
        let scheduled = self.queue.swap_remove(idx);
        self.now_ms = self.now_ms.max(scheduled.due_ms);
        Some(scheduled.task)
    }

    /// Move the clock forward once nothing else is due
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
