//! Deferred continuations.
//!
//! Every event carries the token (journey version or attack id) that was
//! valid when it was scheduled. The receiver compares the token before
//! acting, so superseded continuations fall through as no-ops.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use warglobe_core::types::AttackId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredEvent {
    /// Settle delay elapsed: choose the next leg if still holding under `version`.
    ResumeJourney { version: u64 },
    /// Launch one missile of a salvo.
    LaunchMissile { attack: AttackId, duration_ms: f64 },
    /// The last missile of a salvo has landed: apply persistent damage.
    ApplyDamage { attack: AttackId },
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due_ms: f64,
    seq: u64,
    event: DeferredEvent,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed so the max-heap pops the earliest event first; ties keep
    // scheduling order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Time-ordered queue of deferred events.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire once elapsed time reaches `due_ms`.
    pub fn schedule(&mut self, due_ms: f64, event: DeferredEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled { due_ms, seq, event });
    }

    /// Remove and return every event due at or before `now_ms`, earliest first.
    pub fn pop_due(&mut self, now_ms: f64) -> Vec<DeferredEvent> {
        let mut due = Vec::new();
        while self.queue.peek().is_some_and(|s| s.due_ms <= now_ms) {
            if let Some(scheduled) = self.queue.pop() {
                due.push(scheduled.event);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
