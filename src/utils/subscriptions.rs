//! Explicit registry of the host event sources an object listens to.

use crate::host::{WindowId, WorkspaceId};

/// Something that emits host events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Workspace count, order and switches.
    WorkspaceManager,
    /// Overview visibility and restacking.
    Overview,
    /// Monitors and work areas.
    Display,
    /// Windows being added to or removed from a workspace.
    Workspace(WorkspaceId),
    /// State changes of a single window.
    Window(WindowId),
}

#[derive(Debug, Default)]
pub struct Subscriptions {
    sources: Vec<Source>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if already subscribed.
    pub fn subscribe(&mut self, source: Source) -> bool {
        if self.is_subscribed(source) {
            return false;
        }
        self.sources.push(source);
        true
    }

    /// Returns `false` if there was no such subscription.
    pub fn unsubscribe(&mut self, source: Source) -> bool {
        let Some(idx) = self.sources.iter().position(|s| *s == source) else {
            return false;
        };
        self.sources.swap_remove(idx);
        true
    }

    pub fn is_subscribed(&self, source: Source) -> bool {
        self.sources.contains(&source)
    }

    /// Cancels every subscription, returning what was cancelled.
    pub fn drain(&mut self) -> Vec<Source> {
        std::mem::take(&mut self.sources)
    }

    /// Windows with an individual subscription.
    pub fn windows(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.sources.iter().filter_map(|s| match s {
            Source::Window(id) => Some(*id),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
