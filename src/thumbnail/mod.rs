//! Miniature of one workspace on one monitor.

use glam::DVec2;

use self::dnd::{DragMotionResult, DragSource};
use self::lifecycle::{Lifecycle, ThumbnailState};
use self::stack_sync::StackIndices;
use self::tracker::{RetryTask, WindowCloneTracker};
use crate::host::{Host, HostEvent, WindowId, WorkspaceId, WorkspaceInfo};
use crate::utils::geometry::Rectangle;
use crate::utils::idle::{IdleQueue, IdleToken};

pub mod dnd;
pub mod lifecycle;
pub mod stack_sync;
pub mod tracker;
pub mod window_clone;

#[derive(Debug)]
pub struct WorkspaceThumbnail {
    workspace: WorkspaceId,
    monitor: usize,
    /// Screen region mirrored by the thumbnail.
    porthole: Rectangle,
    /// Horizontal and vertical scale from the porthole to the thumbnail.
    scale: DVec2,
    /// Allocated geometry, relative to the box.
    geometry: Rectangle,
    active: bool,
    tracker: WindowCloneTracker,
    lifecycle: Lifecycle,
}

impl WorkspaceThumbnail {
    pub fn new(
        host: &dyn Host,
        idle: &mut IdleQueue<RetryTask>,
        workspace: &WorkspaceInfo,
        monitor: usize,
        porthole: Rectangle,
        lifecycle: Lifecycle,
        max_backing_retries: u32,
    ) -> Self {
        let tracker =
            WindowCloneTracker::new(host, idle, workspace.id, monitor, max_backing_retries);

        Self {
            workspace: workspace.id,
            monitor,
            porthole,
            scale: DVec2::ONE,
            geometry: Rectangle::default(),
            active: workspace.active,
            tracker,
            lifecycle,
        }
    }

    pub fn workspace(&self) -> WorkspaceId {
        self.workspace
    }

    pub fn monitor(&self) -> usize {
        self.monitor
    }

    pub fn porthole(&self) -> Rectangle {
        self.porthole
    }

    pub fn set_porthole(&mut self, porthole: Rectangle) {
        self.porthole = porthole;
    }

    pub fn scale(&self) -> DVec2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.scale = DVec2::new(scale_x, scale_y);
    }

    pub fn geometry(&self) -> Rectangle {
        self.geometry
    }

    pub fn set_geometry(&mut self, geometry: Rectangle) {
        self.geometry = geometry;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn tracker(&self) -> &WindowCloneTracker {
        &self.tracker
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    pub fn state(&self) -> ThumbnailState {
        self.lifecycle.state()
    }

    pub fn handle_window_event(
        &mut self,
        host: &dyn Host,
        idle: &mut IdleQueue<RetryTask>,
        event: &HostEvent,
    ) {
        self.tracker.handle_event(host, idle, event);
    }

    pub fn retry(
        &mut self,
        host: &dyn Host,
        idle: &mut IdleQueue<RetryTask>,
        token: IdleToken,
        task: RetryTask,
    ) {
        self.tracker.retry(host, idle, token, task);
    }

    pub fn sync_stacking(&mut self, indices: &StackIndices) -> usize {
        self.tracker.sync_stacking(indices)
    }

    /// Switches to this workspace, or leaves the overview if it is already the active one.
    ///
    /// Returns `false` while the thumbnail is being removed.
    pub fn activate(&self, host: &mut dyn Host, timestamp: u32) -> bool {
        if !self.lifecycle.accepts_input() {
            return false;
        }

        let active = host.workspace(self.workspace).is_some_and(|ws| ws.active);
        if active {
            host.hide_overview();
        } else {
            host.activate_workspace(self.workspace, timestamp);
        }
        true
    }

    fn is_my_window(&self, host: &dyn Host, window: WindowId) -> bool {
        host.window(window)
            .is_some_and(|info| info.located_on(self.workspace) && info.monitor == self.monitor)
    }

    pub fn drag_over(
        &self,
        host: &mut dyn Host,
        source: &DragSource,
        timestamp: u32,
    ) -> DragMotionResult {
        if *source == DragSource::Xdnd {
            host.activate_workspace(self.workspace, timestamp);
            return DragMotionResult::Continue;
        }

        if !self.lifecycle.accepts_input() {
            return DragMotionResult::Continue;
        }

        match source {
            DragSource::Window(window) if !self.is_my_window(host, *window) => {
                DragMotionResult::MoveDrop
            }
            DragSource::App {
                can_open_new_window: true,
                ..
            } => DragMotionResult::CopyDrop,
            DragSource::CustomLaunch { .. } => DragMotionResult::CopyDrop,
            _ => DragMotionResult::Continue,
        }
    }

    /// Handles a drop, returning whether it was consumed.
    pub fn accept_drop(&self, host: &mut dyn Host, source: &DragSource, timestamp: u32) -> bool {
        if !self.lifecycle.accepts_input() {
            return false;
        }

        let Some(index) = host.workspace(self.workspace).map(|ws| ws.index) else {
            return false;
        };

        match source {
            DragSource::Window(window) => {
                if self.is_my_window(host, *window) {
                    return false;
                }
                host.move_window_to_monitor_and_workspace(*window, self.monitor, index);
                true
            }
            DragSource::App {
                app_id,
                can_open_new_window: true,
            } => {
                host.open_new_window(app_id, index);
                true
            }
            DragSource::CustomLaunch { launch_id } => {
                host.custom_launch(launch_id, index, timestamp);
                true
            }
            _ => false,
        }
    }

    /// Tears down the tracker. Safe to call more than once.
    pub fn destroy(&mut self, idle: &mut IdleQueue<RetryTask>) {
        self.tracker.teardown(idle);
        if self.lifecycle.state() == ThumbnailState::Collapsing {
            self.lifecycle.transition(ThumbnailState::Destroyed);
        }
    }

    #[cfg(test)]
    pub fn verify_invariants(&self, host: &dyn Host, idle: &IdleQueue<RetryTask>) {
        assert_eq!(self.tracker.workspace(), self.workspace);
        assert_eq!(self.tracker.monitor(), self.monitor);
        self.tracker.verify_invariants(host, idle);
    }
}
