//! Two-sided FIFO matchmaking queue.
//!
//! Not synchronized by itself: the coordinator keeps it inside
//! `CoordinatorState` so pairing is atomic with every other state change.

use std::collections::VecDeque;

use super::{GenderTag, UserId};

/// Result of [`MatchQueue::find_or_enqueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The front of the opposite queue was popped
    Matched(UserId),
    /// No partner available; the user now waits at the back of its own queue
    Enqueued,
    /// The user is already waiting; nothing changed
    AlreadyWaiting,
}

#[derive(Debug, Default)]
pub struct MatchQueue {
    waiting_a: VecDeque<UserId>,
    waiting_b: VecDeque<UserId>,
}

impl MatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self, gender: GenderTag) -> &VecDeque<UserId> {
        match gender {
            GenderTag::A => &self.waiting_a,
            GenderTag::B => &self.waiting_b,
        }
    }

    fn queue_mut(&mut self, gender: GenderTag) -> &mut VecDeque<UserId> {
        match gender {
            GenderTag::A => &mut self.waiting_a,
            GenderTag::B => &mut self.waiting_b,
        }
    }

    /// Pair with the earliest waiting user of the opposite side, or wait.
    pub fn find_or_enqueue(&mut self, user_id: UserId, gender: GenderTag) -> MatchOutcome {
        if self.contains(user_id) {
            return MatchOutcome::AlreadyWaiting;
        }
        match self.queue_mut(gender.opposite()).pop_front() {
            Some(partner) => MatchOutcome::Matched(partner),
            None => {
                self.queue_mut(gender).push_back(user_id);
                MatchOutcome::Enqueued
            }
        }
    }

    /// Remove `user_id` from whichever queue holds it. Returns whether it was waiting.
    pub fn remove(&mut self, user_id: UserId) -> bool {
        let before = self.waiting_a.len() + self.waiting_b.len();
        self.waiting_a.retain(|id| *id != user_id);
        self.waiting_b.retain(|id| *id != user_id);
        before != self.waiting_a.len() + self.waiting_b.len()
    }

    /// Put a popped user back at the front of its queue
    pub fn restore_front(&mut self, user_id: UserId, gender: GenderTag) {
        if !self.contains(user_id) {
            self.queue_mut(gender).push_front(user_id);
        }
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.waiting_a.contains(&user_id) || self.waiting_b.contains(&user_id)
    }

    pub fn waiting(&self, gender: GenderTag) -> Vec<UserId> {
        self.queue(gender).iter().copied().collect()
    }

    pub fn len(&self, gender: GenderTag) -> usize {
        self.queue(gender).len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting_a.is_empty() && self.waiting_b.is_empty()
    }
}
