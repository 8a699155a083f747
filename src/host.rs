//! Interface to the compositor hosting the overview.
//!
//! The engine never owns windows or workspaces. It reads them through [`Host`] at the moment it
//! needs them, reacts to [`HostEvent`]s, and sends commands back through the same trait.

use glam::IVec2;

use crate::thumbnail::stack_sync::StackIndices;
use crate::utils::geometry::Rectangle;
use crate::utils::subscriptions::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkspaceId(pub u64);

/// Where a window lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowLocation {
    Workspace(WorkspaceId),
    /// Sticky window shown on every workspace.
    AllWorkspaces,
}

/// Snapshot of a window's state.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    pub id: WindowId,
    pub location: WindowLocation,
    /// Index of the monitor the window is on.
    pub monitor: usize,
    /// Window asked to be left out of overviews and task lists.
    pub skip_from_overview: bool,
    /// Whether the window is shown when its workspace is visible.
    ///
    /// This is `false` for minimized and otherwise hidden windows.
    pub showing_on_workspace: bool,
    pub minimized: bool,
    /// Whether the compositor attached a renderable surface to the window yet.
    pub has_surface: bool,
    /// Modal dialog rendered together with its parent.
    pub is_attached_dialog: bool,
    pub transient_for: Option<WindowId>,
    /// Visible frame in stage coordinates.
    pub frame_rect: Rectangle,
    /// Position of the window actor in stage coordinates.
    pub position: IVec2,
}

impl WindowInfo {
    pub fn located_on(&self, workspace: WorkspaceId) -> bool {
        match self.location {
            WindowLocation::Workspace(id) => id == workspace,
            WindowLocation::AllWorkspaces => true,
        }
    }

    /// Whether the window gets a clone of its own in the overview.
    pub fn is_overview_window(&self) -> bool {
        !self.skip_from_overview && self.showing_on_workspace && !self.minimized
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceInfo {
    pub id: WorkspaceId,
    pub index: usize,
    pub active: bool,
}

pub trait Host {
    /// Current workspaces, in index order.
    fn workspaces(&self) -> Vec<WorkspaceInfo>;

    fn workspace(&self, id: WorkspaceId) -> Option<WorkspaceInfo> {
        self.workspaces().into_iter().find(|ws| ws.id == id)
    }

    fn active_workspace(&self) -> Option<WorkspaceInfo> {
        self.workspaces().into_iter().find(|ws| ws.active)
    }

    fn window_ids(&self) -> Vec<WindowId>;

    /// Returns `None` once the window is gone.
    fn window(&self, id: WindowId) -> Option<WindowInfo>;

    /// Windows whose `transient_for` is `id`.
    fn transient_children(&self, id: WindowId) -> Vec<WindowId>;

    /// Work area of a monitor, `None` if there is no such monitor.
    fn work_area(&self, monitor: usize) -> Option<Rectangle>;

    /// Rectangle covering every monitor.
    fn stage_rect(&self) -> Rectangle;

    fn primary_monitor(&self) -> usize;

    fn activate_workspace(&mut self, workspace: WorkspaceId, timestamp: u32);

    fn hide_overview(&mut self);

    fn move_window_to_monitor_and_workspace(
        &mut self,
        window: WindowId,
        monitor: usize,
        workspace_index: usize,
    );

    fn open_new_window(&mut self, app_id: &str, workspace_index: usize);

    fn custom_launch(&mut self, launch_id: &str, workspace_index: usize, timestamp: u32);
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    OverviewShowing,
    MonitorsChanged,
    WorkAreasChanged,
    WorkspaceCountChanged,
    WorkspacesReordered,
    WorkspaceSwitched {
        to: WorkspaceId,
    },
    Restacked(StackIndices),
    WindowAdded {
        workspace: WorkspaceId,
        window: WindowId,
    },
    WindowRemoved {
        workspace: WorkspaceId,
        window: WindowId,
    },
    WindowEnteredMonitor {
        monitor: usize,
        window: WindowId,
    },
    WindowLeftMonitor {
        monitor: usize,
        window: WindowId,
    },
    MinimizedChanged {
        window: WindowId,
    },
    PositionChanged {
        window: WindowId,
    },
}

impl HostEvent {
    /// The source an object must be subscribed to in order to receive this event.
    ///
    /// `None` for events every box handles unconditionally.
    pub fn source(&self) -> Option<Source> {
        match self {
            HostEvent::OverviewShowing | HostEvent::MonitorsChanged | HostEvent::WorkAreasChanged => {
                None
            }
            HostEvent::WorkspaceCountChanged
            | HostEvent::WorkspacesReordered
            | HostEvent::WorkspaceSwitched { .. } => Some(Source::WorkspaceManager),
            HostEvent::Restacked(_) => Some(Source::Overview),
            HostEvent::WindowAdded { workspace, .. } | HostEvent::WindowRemoved { workspace, .. } => {
                Some(Source::Workspace(*workspace))
            }
            HostEvent::WindowEnteredMonitor { .. } | HostEvent::WindowLeftMonitor { .. } => {
                Some(Source::Display)
            }
            HostEvent::MinimizedChanged { window } | HostEvent::PositionChanged { window } => {
                Some(Source::Window(*window))
            }
        }
    }
}
