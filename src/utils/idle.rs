//! Deferred work that runs when the host event loop goes idle.
//!
//! Tasks are plain values; the owner decides what running one means. Every scheduled task gets a
//! token that can cancel it until it is taken out of the queue.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdleToken(u64);

#[derive(Debug)]
pub struct IdleQueue<T> {
    tasks: VecDeque<(IdleToken, T)>,
    next_token: u64,
}

impl<T> IdleQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
            next_token: 0,
        }
    }

    pub fn schedule(&mut self, task: T) -> IdleToken {
        let token = IdleToken(self.next_token);
        self.next_token += 1;
        self.tasks.push_back((token, task));
        token
    }

    /// Cancels a task that has not run yet.
    ///
    /// Returns `false` if the token is unknown, already ran or was already cancelled.
    pub fn cancel(&mut self, token: IdleToken) -> bool {
        let Some(idx) = self.tasks.iter().position(|(t, _)| *t == token) else {
            return false;
        };
        self.tasks.remove(idx);
        true
    }

    pub fn is_scheduled(&self, token: IdleToken) -> bool {
        self.tasks.iter().any(|(t, _)| *t == token)
    }

    /// Takes every task scheduled so far, in scheduling order.
    ///
    /// Tasks scheduled while the returned batch is being processed wait for the next pass.
    pub fn take_pending(&mut self) -> Vec<(IdleToken, T)> {
        self.tasks.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(IdleToken, T)> + '_ {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Default for IdleQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
