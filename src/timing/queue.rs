// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timer queue with microsecond-precision virtual time.
//!
//! A priority queue of timed tasks driven by an explicit clock. Nothing
//! here blocks: "waiting" is a task sitting in the heap until the owner
//! advances the clock past its due time. Every task is tagged with the
//! [`Handle`] of the operation that scheduled it and is skipped at fire
//! time if that handle has been revoked.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::Duration;

use tracing::trace;

use super::handle::{Handle, Liveness};

/// A task run when its timer fires. It receives the queue so it can
/// schedule follow-up work.
pub type TimerTask = Box<dyn FnOnce(&mut TimerQueue)>;

/// A timer waiting in the queue
struct PendingTimer {
    /// Due time in microseconds on the queue clock
    due_micros: u64,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    /// Owning handle
    handle: Handle,
    task: TimerTask,
}

// For BinaryHeap - we want earliest (due, seq) first
impl Eq for PendingTimer {}

impl PartialEq for PendingTimer {
    fn eq(&self, other: &Self) -> bool {
        self.due_micros == other.due_micros && self.seq == other.seq
    }
}

impl Ord for PendingTimer {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .due_micros
            .cmp(&self.due_micros)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PendingTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-threaded timer queue
pub struct TimerQueue {
    /// Pending timers, earliest first
    heap: BinaryHeap<PendingTimer>,
    /// Current position of the virtual clock
    now_micros: u64,
    /// Next insertion sequence number
    next_seq: u64,
    /// Live handles
    liveness: Liveness,
}

impl TimerQueue {
    /// Create an empty queue with the clock at zero
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::with_capacity(64),
            now_micros: 0,
            next_seq: 0,
            liveness: Liveness::new(),
        }
    }

    /// Current clock position in microseconds
    pub fn now_micros(&self) -> u64 {
        self.now_micros
    }

    /// Current clock position
    pub fn now(&self) -> Duration {
        Duration::from_micros(self.now_micros)
    }

    /// Issue a new live handle for a group of timers
    pub fn issue_handle(&mut self) -> Handle {
        self.liveness.issue()
    }

    /// Check if a handle is still live
    pub fn is_live(&self, handle: Handle) -> bool {
        self.liveness.is_live(handle)
    }

    /// Revoke a handle and drop its pending timers.
    ///
    /// Returns true if the handle was live. Revoking twice is harmless.
    pub fn revoke(&mut self, handle: Handle) -> bool {
        let was_live = self.liveness.revoke(handle);
        if was_live {
            self.heap.retain(|timer| timer.handle != handle);
        }
        was_live
    }

    /// Schedule a task at an absolute clock position.
    ///
    /// Due times already in the past are clamped to now, so the task runs on
    /// the next advance.
    pub fn schedule_at<F>(&mut self, handle: Handle, due_micros: u64, task: F)
    where
        F: FnOnce(&mut TimerQueue) + 'static,
    {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(PendingTimer {
            due_micros: due_micros.max(self.now_micros),
            seq,
            handle,
            task: Box::new(task),
        });
    }

    /// Schedule a task relative to the current clock position
    pub fn schedule_after<F>(&mut self, handle: Handle, delay_micros: u64, task: F)
    where
        F: FnOnce(&mut TimerQueue) + 'static,
    {
        let due = self.now_micros.saturating_add(delay_micros);
        self.schedule_at(handle, due, task);
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if no timers are pending
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending timers owned by a handle
    pub fn pending_for(&self, handle: Handle) -> usize {
        self.heap.iter().filter(|timer| timer.handle == handle).count()
    }

    /// Due time of the earliest pending timer
    pub fn next_deadline_micros(&self) -> Option<u64> {
        self.heap.peek().map(|timer| timer.due_micros)
    }

    /// Advance the clock to `target_micros`, running every timer that falls
    /// due on the way in time order.
    ///
    /// The clock is moved to each timer's due time before its task runs, so
    /// tasks that schedule relative work see the instant they fired at.
    /// Timers whose handle is no longer live are discarded without running.
    /// Returns the number of tasks run.
    pub fn advance_to(&mut self, target_micros: u64) -> usize {
        let mut fired = 0;

        while let Some(next) = self.heap.peek() {
            if next.due_micros > target_micros {
                break;
            }
            let Some(timer) = self.heap.pop() else {
                break;
            };

            self.now_micros = self.now_micros.max(timer.due_micros);
            if !self.liveness.is_live(timer.handle) {
                trace!(handle = %timer.handle, due = timer.due_micros, "skipping stale timer");
                continue;
            }

            (timer.task)(self);
            fired += 1;
        }

        self.now_micros = self.now_micros.max(target_micros);
        fired
    }

    /// Advance the clock by a relative amount
    pub fn advance_by(&mut self, delta_micros: u64) -> usize {
        let target = self.now_micros.saturating_add(delta_micros);
        self.advance_to(target)
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now_micros", &self.now_micros)
            .field("pending", &self.heap.len())
            .field("live_handles", &self.liveness.live_count())
            .finish()
    }
}
