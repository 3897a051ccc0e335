//! Delayed-task queue on a virtual clock
//!
//! Every timer in the game, recurring or one-shot, is a record
//! `{fire_at, seq, task}` in a min-heap. Ties on `fire_at` run in insertion
//! order. Nothing is ever cancelled: tasks that find their condition unmet
//! simply do nothing when they fire.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::effects::AmbientKind;

/// Recurring loops of the chaos scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopKind {
    Teleport,
    ExtraTeleport,
    Burst,
    BonusSpawn,
    Ambient,
}

impl LoopKind {
    pub const ALL: [LoopKind; 5] = [
        LoopKind::Teleport,
        LoopKind::ExtraTeleport,
        LoopKind::Burst,
        LoopKind::BonusSpawn,
        LoopKind::Ambient,
    ];

    fn index(self) -> usize {
        match self {
            LoopKind::Teleport => 0,
            LoopKind::ExtraTeleport => 1,
            LoopKind::Burst => 2,
            LoopKind::BonusSpawn => 3,
            LoopKind::Ambient => 4,
        }
    }
}

/// Work a scheduled record performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// Run one loop iteration and reschedule it
    Loop(LoopKind),
    /// One teleport of a burst
    BurstTeleport,
    /// Bring a hidden target back
    Reappear,
    /// Hide the bonus actor if its appearance has expired
    BonusAutoHide,
    /// Delayed layer of an ambient disturbance
    Disturbance(AmbientKind),
    /// Restore the idle prompt unless a newer message replaced it
    ClearMessage { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    fire_at: Millis,
    seq: u64,
    task: Task,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap on (fire_at, seq)
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-loop counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopStats {
    pub fired: u64,
    /// Fires whose action was a guard no-op
    pub ignored: u64,
}

/// Virtual clock plus pending tasks
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Millis,
    queue: BinaryHeap<Scheduled>,
    next_seq: u64,
    stats: [LoopStats; 5],
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Queue `task` to fire `delay` ms from now
    pub fn schedule_in(&mut self, delay: Millis, task: Task) -> Millis {
        let fire_at = self.now.saturating_add(delay);
        self.schedule_at(fire_at, task);
        fire_at
    }

    pub fn schedule_at(&mut self, fire_at: Millis, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            fire_at: fire_at.max(self.now),
            seq,
            task,
        });
    }

    pub fn next_fire_at(&self) -> Option<Millis> {
        self.queue.peek().map(|s| s.fire_at)
    }

    /// Pop the earliest task due at or before `until` and move the clock to it
    pub fn pop_due(&mut self, until: Millis) -> Option<(Millis, Task)> {
        if self.queue.peek()?.fire_at > until {
            return None;
        }
        let next = self.queue.pop()?;
        self.now = self.now.max(next.fire_at);
        Some((next.fire_at, next.task))
    }

    /// Pop the earliest task due strictly before `before`
    pub fn pop_before(&mut self, before: Millis) -> Option<(Millis, Task)> {
        match before.checked_sub(1) {
            Some(until) => self.pop_due(until),
            None => None,
        }
    }

    /// Move the clock forward; never backwards
    pub fn advance_to(&mut self, t: Millis) {
        self.now = self.now.max(t);
    }

    /// Fire time of the pending record of one loop kind
    pub fn next_loop_fire(&self, kind: LoopKind) -> Option<Millis> {
        self.queue
            .iter()
            .filter(|s| s.task == Task::Loop(kind))
            .map(|s| s.fire_at)
            .min()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Pending records of one loop kind (always 1 once armed)
    pub fn armed(&self, kind: LoopKind) -> usize {
        self.queue
            .iter()
            .filter(|s| s.task == Task::Loop(kind))
            .count()
    }

    pub fn pending_tasks(&self) -> impl Iterator<Item = &Task> {
        self.queue.iter().map(|s| &s.task)
    }

    pub fn record_fire(&mut self, kind: LoopKind) {
        self.stats[kind.index()].fired += 1;
    }

    pub fn record_ignored(&mut self, kind: LoopKind) {
        self.stats[kind.index()].ignored += 1;
    }

    pub fn stats(&self, kind: LoopKind) -> LoopStats {
        self.stats[kind.index()]
    }
}
