//! "Run after N frames" queue.
//!
//! Delayed work is expressed as data and executed at one fixed point of the
//! tick, after collisions and spawners, before time advances.

use hecs::Entity;

use vortex_core::enums::UfoClass;

/// Deferred actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    RespawnPlayer { player: usize },
    SpawnSatellite { owner: Entity },
    SpawnUfos { class: UfoClass, count: u32 },
    AdvanceMission,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: Vec<Scheduled>,
    next_seq: u64,
}

#[derive(Debug)]
struct Scheduled {
    due: u64,
    seq: u64,
    action: Deferred,
}

impl Scheduler {
    /// Queue `action` to run `delay_ticks` after tick `now`.
    pub fn schedule(&mut self, now: u64, delay_ticks: u32, action: Deferred) {
        self.queue.push(Scheduled {
            due: now + delay_ticks as u64,
            seq: self.next_seq,
            action,
        });
        self.next_seq += 1;
    }

    /// Remove and return actions due at or before `now`, in due/queue order.
    pub fn take_due(&mut self, now: u64) -> Vec<Deferred> {
        let mut due: Vec<Scheduled> = Vec::new();
        let mut i = 0;
        while i < self.queue.len() {
            if self.queue[i].due <= now {
                due.push(self.queue.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.action).collect()
    }

    pub fn contains(&self, pred: impl Fn(&Deferred) -> bool) -> bool {
        self.queue.iter().any(|s| pred(&s.action))
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
