//! Keeping a thumbnail's window clones in sync with the host.
//!
//! A tracker clones exactly the windows that are on its workspace and monitor, are not skipped
//! from the overview and are showing. Windows the compositor has not attached a surface to yet
//! are retried from the idle queue until they get one, disappear or move away.

use std::collections::{HashMap, HashSet};

use super::stack_sync::{self, StackIndices};
use super::window_clone::WindowClone;
use crate::host::{Host, HostEvent, WindowId, WindowInfo, WorkspaceId};
use crate::utils::id::IdCounter;
use crate::utils::idle::{IdleQueue, IdleToken};
use crate::utils::subscriptions::{Source, Subscriptions};

static TRACKER_ID_COUNTER: IdCounter = IdCounter::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackerId(u32);

impl TrackerId {
    fn next() -> TrackerId {
        TrackerId(TRACKER_ID_COUNTER.next())
    }
}

/// Deferred attempt to clone a window that had no surface yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryTask {
    pub tracker: TrackerId,
    pub window: WindowId,
    /// Number of idle passes this window already waited.
    pub attempt: u32,
}

#[derive(Debug)]
pub struct WindowCloneTracker {
    id: TrackerId,
    workspace: WorkspaceId,
    monitor: usize,
    /// Clones from the bottom of the stack to the top.
    clones: Vec<WindowClone>,
    /// Workspace, display and per-window subscriptions.
    ///
    /// Every window ever seen keeps its subscription, including minimized ones without a clone.
    subscriptions: Subscriptions,
    /// Retries that have not fired yet.
    pending: HashMap<WindowId, IdleToken>,
    max_backing_retries: u32,
    removed: bool,
}

impl WindowCloneTracker {
    pub fn new(
        host: &dyn Host,
        idle: &mut IdleQueue<RetryTask>,
        workspace: WorkspaceId,
        monitor: usize,
        max_backing_retries: u32,
    ) -> Self {
        let _span = tracy_client::span!("WindowCloneTracker::new");

        let mut tracker = Self {
            id: TrackerId::next(),
            workspace,
            monitor,
            clones: Vec::new(),
            subscriptions: Subscriptions::new(),
            pending: HashMap::new(),
            max_backing_retries,
            removed: false,
        };

        tracker.subscriptions.subscribe(Source::Workspace(workspace));
        tracker.subscriptions.subscribe(Source::Display);

        for window in host.window_ids() {
            let on_workspace = host
                .window(window)
                .is_some_and(|info| info.located_on(workspace));
            if on_workspace {
                tracker.add_window(host, idle, window);
            }
        }

        tracker
    }

    pub fn id(&self) -> TrackerId {
        self.id
    }

    pub fn workspace(&self) -> WorkspaceId {
        self.workspace
    }

    pub fn monitor(&self) -> usize {
        self.monitor
    }

    /// Clones from the bottom of the stack to the top.
    pub fn clones(&self) -> &[WindowClone] {
        &self.clones
    }

    pub fn clone_of(&self, window: WindowId) -> Option<&WindowClone> {
        self.clones.iter().find(|c| c.window() == window)
    }

    pub fn has_clone(&self, window: WindowId) -> bool {
        self.clone_of(window).is_some()
    }

    pub fn is_subscribed(&self, source: Source) -> bool {
        self.subscriptions.is_subscribed(source)
    }

    /// Windows this tracker has seen and still listens to.
    pub fn seen_windows(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.subscriptions.windows()
    }

    pub fn has_pending_retry(&self, window: WindowId) -> bool {
        self.pending.contains_key(&window)
    }

    pub fn pending_retry(&self, window: WindowId) -> Option<IdleToken> {
        self.pending.get(&window).copied()
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    fn is_my_window(&self, info: &WindowInfo) -> bool {
        info.located_on(self.workspace) && info.monitor == self.monitor
    }

    /// Routes a host event to the matching operation.
    ///
    /// Events from sources this tracker is not subscribed to are ignored.
    pub fn handle_event(
        &mut self,
        host: &dyn Host,
        idle: &mut IdleQueue<RetryTask>,
        event: &HostEvent,
    ) {
        if event
            .source()
            .is_some_and(|source| !self.is_subscribed(source))
        {
            return;
        }

        match *event {
            HostEvent::WindowAdded { window, .. } => self.add_window(host, idle, window),
            HostEvent::WindowRemoved { window, .. } => self.window_removed(idle, window),
            HostEvent::WindowEnteredMonitor { monitor, window } => {
                self.monitor_entered(host, idle, monitor, window)
            }
            HostEvent::WindowLeftMonitor { monitor, window } => self.monitor_left(monitor, window),
            HostEvent::MinimizedChanged { window } => self.minimized_changed(host, idle, window),
            HostEvent::PositionChanged { window } => self.position_changed(host, window),
            _ => (),
        }
    }

    pub fn add_window(&mut self, host: &dyn Host, idle: &mut IdleQueue<RetryTask>, window: WindowId) {
        if self.removed {
            return;
        }

        let Some(info) = host.window(window) else {
            return;
        };

        if !info.has_surface {
            self.schedule_retry(idle, window, 0);
            return;
        }

        self.add_backed_window(host, &info);
    }

    fn add_backed_window(&mut self, host: &dyn Host, info: &WindowInfo) {
        if self.subscriptions.subscribe(Source::Window(info.id)) {
            trace!("tracker {:?}: watching {:?}", self.id, info.id);
        }

        // The window can already be here when it was on all workspaces and got moved to ours.
        if self.has_clone(info.id) {
            return;
        }

        if !self.is_my_window(info) {
            return;
        }

        if info.is_overview_window() {
            let above = self.clones.last().map(WindowClone::window);
            self.clones.push(WindowClone::new(host, info, above));
            trace!("tracker {:?}: cloned {:?}", self.id, info.id);
        } else if info.is_attached_dialog {
            let Some(parent) = dialog_root(host, info) else {
                return;
            };

            match self.clones.iter_mut().find(|c| c.window() == parent) {
                Some(clone) => clone.add_dialog(info),
                // The parent attaches its dialogs once it gets a clone.
                None => trace!(
                    "tracker {:?}: deferring dialog {:?} until {parent:?} is cloned",
                    self.id,
                    info.id
                ),
            }
        }
    }

    fn schedule_retry(&mut self, idle: &mut IdleQueue<RetryTask>, window: WindowId, attempt: u32) {
        if self.pending.contains_key(&window) {
            return;
        }

        if attempt >= self.max_backing_retries {
            warn!(
                "{window:?} got no surface after {attempt} idle passes, not cloning it into \
                 workspace {:?}",
                self.workspace
            );
            return;
        }

        let token = idle.schedule(RetryTask {
            tracker: self.id,
            window,
            attempt,
        });
        self.pending.insert(window, token);
    }

    /// Runs a retry taken from the idle queue.
    pub fn retry(
        &mut self,
        host: &dyn Host,
        idle: &mut IdleQueue<RetryTask>,
        token: IdleToken,
        task: RetryTask,
    ) {
        if task.tracker != self.id || self.pending.get(&task.window) != Some(&token) {
            return;
        }
        self.pending.remove(&task.window);

        if self.removed {
            return;
        }

        let Some(info) = host.window(task.window) else {
            return;
        };
        if !info.located_on(self.workspace) {
            debug!(
                "{:?} left workspace {:?} before getting a surface",
                task.window, self.workspace
            );
            return;
        }

        if !info.has_surface {
            self.schedule_retry(idle, task.window, task.attempt + 1);
            return;
        }

        self.add_backed_window(host, &info);
    }

    /// Destroys the clone of `window`, if any.
    pub fn remove_window(&mut self, window: WindowId) -> bool {
        let Some(idx) = self.clones.iter().position(|c| c.window() == window) else {
            return false;
        };

        let clone = self.clones.remove(idx);
        for other in &mut self.clones {
            if other.stack_above() == Some(window) {
                other.set_stack_above(clone.stack_above());
            }
        }

        trace!("tracker {:?}: removed clone of {window:?}", self.id);
        true
    }

    /// Handles a window leaving the workspace.
    pub fn window_removed(&mut self, idle: &mut IdleQueue<RetryTask>, window: WindowId) {
        self.subscriptions.unsubscribe(Source::Window(window));

        if let Some(token) = self.pending.remove(&window) {
            idle.cancel(token);
        }

        self.remove_window(window);

        for clone in &mut self.clones {
            clone.remove_dialog(window);
        }
    }

    pub fn minimized_changed(
        &mut self,
        host: &dyn Host,
        idle: &mut IdleQueue<RetryTask>,
        window: WindowId,
    ) {
        let Some(info) = host.window(window) else {
            return;
        };

        if info.minimized {
            self.remove_window(window);
        } else {
            self.add_window(host, idle, window);
        }
    }

    pub fn monitor_entered(
        &mut self,
        host: &dyn Host,
        idle: &mut IdleQueue<RetryTask>,
        monitor: usize,
        window: WindowId,
    ) {
        if monitor == self.monitor {
            self.add_window(host, idle, window);
        }
    }

    pub fn monitor_left(&mut self, monitor: usize, window: WindowId) {
        if monitor == self.monitor {
            self.remove_window(window);
        }
    }

    pub fn position_changed(&mut self, host: &dyn Host, window: WindowId) {
        let Some(info) = host.window(window) else {
            return;
        };

        if let Some(clone) = self.clones.iter_mut().find(|c| c.window() == window) {
            clone.update_position(host, &info);
            return;
        }

        for clone in &mut self.clones {
            if clone.update_dialog_position(&info) {
                break;
            }
        }
    }

    /// Reorders the clones to match the host's stacking, returning how many links changed.
    pub fn sync_stacking(&mut self, indices: &StackIndices) -> usize {
        stack_sync::sync_stacking(&mut self.clones, indices)
    }

    /// Cancels everything this tracker waits for and destroys its clones.
    pub fn teardown(&mut self, idle: &mut IdleQueue<RetryTask>) {
        if self.removed {
            return;
        }
        self.removed = true;

        for (_, token) in self.pending.drain() {
            idle.cancel(token);
        }

        let sources = self.subscriptions.drain();
        debug!(
            "tracker {:?} for workspace {:?}: dropped {} subscriptions",
            self.id,
            self.workspace,
            sources.len()
        );

        self.clones.clear();
    }

    #[cfg(test)]
    pub fn verify_invariants(&self, host: &dyn Host, idle: &IdleQueue<RetryTask>) {
        if self.removed {
            assert!(self.clones.is_empty(), "removed tracker must have no clones");
            assert!(self.pending.is_empty(), "removed tracker must have no retries");
            assert!(
                self.subscriptions.is_empty(),
                "removed tracker must have no subscriptions"
            );
            return;
        }

        assert!(self.is_subscribed(Source::Workspace(self.workspace)));
        assert!(self.is_subscribed(Source::Display));

        for token in self.pending.values() {
            assert!(idle.is_scheduled(*token), "pending retry must be scheduled");
        }

        let mut seen = HashSet::new();
        let mut below = None;
        for clone in &self.clones {
            let window = clone.window();
            assert!(seen.insert(window), "{window:?} must be cloned once");
            assert_eq!(clone.stack_above(), below, "clones must be linked bottom to top");
            below = Some(window);

            assert!(
                self.is_subscribed(Source::Window(window)),
                "cloned {window:?} must be watched"
            );

            let info = host
                .window(window)
                .unwrap_or_else(|| panic!("clone of {window:?} must not outlive it"));
            assert!(info.has_surface);
            assert!(self.is_my_window(&info), "{window:?} must be on our workspace");
            assert!(info.is_overview_window(), "{window:?} must be shown in overview");

            for dialog in clone.dialogs() {
                let info = host
                    .window(dialog.window)
                    .unwrap_or_else(|| panic!("dialog {:?} must exist", dialog.window));
                assert!(info.is_attached_dialog);
                assert!(info.has_surface);
            }
        }
    }
}

/// Walks `transient_for` past dialog ancestors to the window that owns the dialog chain.
fn dialog_root(host: &dyn Host, dialog: &WindowInfo) -> Option<WindowId> {
    let mut visited = HashSet::from([dialog.id]);
    let mut parent = host.window(dialog.transient_for?)?;

    while parent.is_attached_dialog {
        if !visited.insert(parent.id) {
            return None;
        }
        parent = host.window(parent.transient_for?)?;
    }

    Some(parent.id)
}
