//! Container owning the thumbnails of every workspace on one monitor.

use std::rc::Rc;

use glam::DVec2;

use crate::host::{Host, HostEvent, WorkspaceId};
use crate::layout::{Arrangement, Constraints, LayoutStrategy, Options, StripLayout};
use crate::thumbnail::dnd::{DragMotionResult, DragSource};
use crate::thumbnail::lifecycle::Lifecycle;
use crate::thumbnail::tracker::RetryTask;
use crate::thumbnail::WorkspaceThumbnail;
use crate::utils::geometry::Rectangle;
use crate::utils::idle::IdleQueue;
use crate::utils::subscriptions::{Source, Subscriptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Begin,
    Update,
    End,
    Cancel,
}

#[derive(Debug)]
pub struct ThumbnailsBox {
    monitor: usize,
    /// Screen region every thumbnail mirrors.
    porthole: Rectangle,
    /// Thumbnails in workspace order.
    thumbnails: Vec<WorkspaceThumbnail>,
    /// Workspace manager and overview subscriptions, held while thumbnails exist.
    subscriptions: Subscriptions,
    /// Deferred clone retries of every tracker in this box.
    idle: IdleQueue<RetryTask>,
    /// Active workspace index; fractional while a switch animates.
    indicator_position: f64,
    /// Last allocation in stage coordinates.
    allocation: Rectangle,
    /// Last successful arrangement, relative to the allocation.
    arrangement: Option<Arrangement>,
    relayout_pending: bool,
    options: Rc<Options>,
}

impl ThumbnailsBox {
    pub fn new(host: &dyn Host, monitor: usize, options: Rc<Options>) -> Self {
        let mut this = Self {
            monitor,
            porthole: Rectangle::default(),
            thumbnails: Vec::new(),
            subscriptions: Subscriptions::new(),
            idle: IdleQueue::new(),
            indicator_position: 0.,
            allocation: Rectangle::default(),
            arrangement: None,
            relayout_pending: false,
            options,
        };
        this.update_porthole(host);
        this
    }

    pub fn monitor(&self) -> usize {
        self.monitor
    }

    pub fn set_monitor_index(&mut self, monitor: usize) {
        self.monitor = monitor;
    }

    pub fn porthole(&self) -> Rectangle {
        self.porthole
    }

    pub fn thumbnails(&self) -> &[WorkspaceThumbnail] {
        &self.thumbnails
    }

    pub fn thumbnail_mut(&mut self, workspace: WorkspaceId) -> Option<&mut WorkspaceThumbnail> {
        self.thumbnails
            .iter_mut()
            .find(|t| t.workspace() == workspace)
    }

    pub fn idle(&self) -> &IdleQueue<RetryTask> {
        &self.idle
    }

    pub fn options(&self) -> &Rc<Options> {
        &self.options
    }

    /// New trackers pick up changed retry limits on the next rebuild.
    pub fn update_options(&mut self, options: Rc<Options>) {
        self.options = options;
        self.queue_relayout();
    }

    pub fn indicator_position(&self) -> f64 {
        self.indicator_position
    }

    pub fn set_indicator_position(&mut self, position: f64) {
        if self.indicator_position != position {
            self.indicator_position = position;
            self.queue_relayout();
        }
    }

    pub fn arrangement(&self) -> Option<&Arrangement> {
        self.arrangement.as_ref()
    }

    /// Whether thumbnails are currently built.
    pub fn is_populated(&self) -> bool {
        self.subscriptions.is_subscribed(Source::WorkspaceManager)
    }

    pub fn create_all(&mut self, host: &dyn Host) {
        let _span = tracy_client::span!("ThumbnailsBox::create_all");

        if !self.thumbnails.is_empty() {
            return;
        }

        self.subscriptions.subscribe(Source::WorkspaceManager);
        self.subscriptions.subscribe(Source::Overview);

        for workspace in host.workspaces() {
            let thumbnail = WorkspaceThumbnail::new(
                host,
                &mut self.idle,
                &workspace,
                self.monitor,
                self.porthole,
                Lifecycle::settled(),
                self.options.max_backing_retries,
            );
            if workspace.active {
                self.indicator_position = workspace.index as f64;
            }
            self.thumbnails.push(thumbnail);
        }

        debug!(
            "created {} workspace thumbnails on monitor {}",
            self.thumbnails.len(),
            self.monitor
        );
        self.queue_relayout();
    }

    pub fn destroy_all(&mut self) {
        if self.thumbnails.is_empty() && self.subscriptions.is_empty() {
            return;
        }

        self.subscriptions.drain();
        for thumbnail in &mut self.thumbnails {
            thumbnail.destroy(&mut self.idle);
        }
        self.thumbnails.clear();
        self.arrangement = None;

        debug!("destroyed workspace thumbnails on monitor {}", self.monitor);
    }

    fn rebuild(&mut self, host: &dyn Host) {
        self.destroy_all();
        self.create_all(host);
    }

    /// Mirrors the work area of our monitor, or the whole stage if the monitor is gone.
    pub fn update_porthole(&mut self, host: &dyn Host) {
        self.porthole = host.work_area(self.monitor).unwrap_or_else(|| {
            debug!("no monitor {}, using the stage as porthole", self.monitor);
            host.stage_rect()
        });

        for thumbnail in &mut self.thumbnails {
            thumbnail.set_porthole(self.porthole);
        }
        self.queue_relayout();
    }

    pub fn handle_event(&mut self, host: &dyn Host, event: &HostEvent) {
        let _span = tracy_client::span!("ThumbnailsBox::handle_event");

        match event {
            HostEvent::OverviewShowing => self.create_all(host),
            HostEvent::MonitorsChanged => {
                self.set_monitor_index(host.primary_monitor());
                self.update_porthole(host);
                if self.is_populated() {
                    self.rebuild(host);
                }
            }
            HostEvent::WorkAreasChanged => self.update_porthole(host),
            HostEvent::WorkspaceCountChanged if self.is_populated() => self.rebuild(host),
            HostEvent::WorkspacesReordered if self.is_populated() => self.sort_thumbnails(host),
            HostEvent::WorkspaceSwitched { to } if self.is_populated() => {
                self.workspace_switched(host, *to)
            }
            HostEvent::Restacked(indices) if self.subscriptions.is_subscribed(Source::Overview) => {
                for thumbnail in &mut self.thumbnails {
                    thumbnail.sync_stacking(indices);
                }
            }
            HostEvent::WindowAdded { .. }
            | HostEvent::WindowRemoved { .. }
            | HostEvent::WindowEnteredMonitor { .. }
            | HostEvent::WindowLeftMonitor { .. }
            | HostEvent::MinimizedChanged { .. }
            | HostEvent::PositionChanged { .. } => {
                for thumbnail in &mut self.thumbnails {
                    thumbnail.handle_window_event(host, &mut self.idle, event);
                }
            }
            _ => (),
        }
    }

    fn sort_thumbnails(&mut self, host: &dyn Host) {
        let workspaces = host.workspaces();
        self.thumbnails.sort_by_cached_key(|t| {
            workspaces
                .iter()
                .find(|ws| ws.id == t.workspace())
                .map_or(usize::MAX, |ws| ws.index)
        });
        if let Some(active) = workspaces.iter().find(|ws| ws.active) {
            self.indicator_position = active.index as f64;
        }
        self.queue_relayout();
    }

    fn workspace_switched(&mut self, host: &dyn Host, to: WorkspaceId) {
        if let Some(workspace) = host.workspace(to) {
            self.indicator_position = workspace.index as f64;
        }
        for thumbnail in &mut self.thumbnails {
            thumbnail.set_active(thumbnail.workspace() == to);
        }
        self.queue_relayout();
    }

    /// Runs the clone retries scheduled so far, returning how many there were.
    pub fn dispatch_idle(&mut self, host: &dyn Host) -> usize {
        let tasks = self.idle.take_pending();
        let count = tasks.len();

        for (token, task) in tasks {
            let Some(thumbnail) = self
                .thumbnails
                .iter_mut()
                .find(|t| t.tracker().id() == task.tracker)
            else {
                continue;
            };
            thumbnail.retry(host, &mut self.idle, token, task);
        }

        count
    }

    pub fn queue_relayout(&mut self) {
        self.relayout_pending = true;
    }

    pub fn needs_relayout(&self) -> bool {
        self.relayout_pending
            || self
                .thumbnails
                .iter()
                .any(|t| t.lifecycle().is_relayout_pending())
    }

    fn strip_layout(&self) -> StripLayout {
        StripLayout::new(
            self.thumbnails.len(),
            self.porthole.size,
            self.indicator_position,
            &self.options,
        )
    }

    pub fn preferred_width(&self, for_height: Option<f64>) -> f64 {
        self.strip_layout()
            .measure(Constraints {
                for_width: None,
                for_height,
            })
            .x
    }

    pub fn preferred_height(&self, for_width: f64) -> f64 {
        self.strip_layout()
            .measure(Constraints {
                for_width: Some(for_width),
                for_height: None,
            })
            .y
    }

    /// Lays the thumbnails out inside `area`, given in stage coordinates.
    ///
    /// Returns `false` if nothing could be laid out; thumbnails then keep their previous geometry.
    pub fn allocate(&mut self, area: Rectangle) -> bool {
        let _span = tracy_client::span!("ThumbnailsBox::allocate");

        self.allocation = area;
        self.relayout_pending = false;
        for thumbnail in &mut self.thumbnails {
            thumbnail.lifecycle_mut().take_relayout_request();
        }

        if self.thumbnails.is_empty() {
            self.arrangement = None;
            return false;
        }

        let Some(arrangement) = self.strip_layout().arrange(Rectangle::from_size(area.size)) else {
            warn!(
                "cannot lay out {} thumbnails in {:?} with porthole {:?}, keeping previous geometry",
                self.thumbnails.len(),
                area.size,
                self.porthole.size
            );
            return false;
        };

        for (thumbnail, placement) in self.thumbnails.iter_mut().zip(&arrangement.thumbnails) {
            thumbnail.set_geometry(placement.geometry);
            thumbnail.set_scale(placement.scale.x, placement.scale.y);
        }
        self.arrangement = Some(arrangement);
        true
    }

    /// Index of the thumbnail under a point in stage coordinates.
    pub fn thumbnail_at(&self, point: DVec2) -> Option<usize> {
        let x = point.x - f64::from(self.allocation.loc.x);
        self.thumbnails.iter().position(|t| {
            let geo = t.geometry();
            let x1 = f64::from(geo.loc.x);
            x1 <= x && x < x1 + f64::from(geo.size.x)
        })
    }

    fn activate_at(&self, host: &mut dyn Host, point: DVec2, timestamp: u32) -> bool {
        let Some(idx) = self.thumbnail_at(point) else {
            return false;
        };
        self.thumbnails[idx].activate(host, timestamp)
    }

    pub fn button_released(&self, host: &mut dyn Host, point: DVec2, timestamp: u32) -> bool {
        self.activate_at(host, point, timestamp)
    }

    /// Only the end of the pointer-emulating touch sequence activates.
    pub fn touch_event(
        &self,
        host: &mut dyn Host,
        phase: TouchPhase,
        pointer_emulating: bool,
        point: DVec2,
        timestamp: u32,
    ) -> bool {
        if phase != TouchPhase::End || !pointer_emulating {
            return false;
        }
        self.activate_at(host, point, timestamp)
    }

    /// Activates the neighbor of the active workspace in the scroll direction.
    pub fn scroll(&self, host: &mut dyn Host, direction: ScrollDirection, timestamp: u32) -> bool {
        let workspaces = host.workspaces();
        let Some(current) = workspaces.iter().position(|ws| ws.active) else {
            return false;
        };

        let forward = match direction {
            ScrollDirection::Up => false,
            ScrollDirection::Down => true,
            ScrollDirection::Left => self.options.right_to_left,
            ScrollDirection::Right => !self.options.right_to_left,
        };

        let target = if forward {
            current + 1
        } else {
            let Some(prev) = current.checked_sub(1) else {
                return false;
            };
            prev
        };

        let Some(workspace) = workspaces.get(target) else {
            return false;
        };
        host.activate_workspace(workspace.id, timestamp);
        true
    }

    pub fn drag_over(
        &self,
        host: &mut dyn Host,
        point: DVec2,
        source: &DragSource,
        timestamp: u32,
    ) -> DragMotionResult {
        match self.thumbnail_at(point) {
            Some(idx) => self.thumbnails[idx].drag_over(host, source, timestamp),
            None => DragMotionResult::Continue,
        }
    }

    pub fn accept_drop(
        &self,
        host: &mut dyn Host,
        point: DVec2,
        source: &DragSource,
        timestamp: u32,
    ) -> bool {
        match self.thumbnail_at(point) {
            Some(idx) => self.thumbnails[idx].accept_drop(host, source, timestamp),
            None => false,
        }
    }

    #[cfg(test)]
    pub fn verify_invariants(&self, host: &dyn Host) {
        if !self.is_populated() {
            assert!(self.thumbnails.is_empty(), "unpopulated box must be empty");
            assert!(self.subscriptions.is_empty());
            assert!(self.idle.is_empty(), "unpopulated box must have no retries");
            return;
        }

        assert!(self.subscriptions.is_subscribed(Source::Overview));

        let workspaces: Vec<_> = host.workspaces().iter().map(|ws| ws.id).collect();
        let ours: Vec<_> = self.thumbnails.iter().map(|t| t.workspace()).collect();
        assert_eq!(ours, workspaces, "thumbnails must follow host workspaces");

        for thumbnail in &self.thumbnails {
            assert_eq!(thumbnail.monitor(), self.monitor);
            assert_eq!(thumbnail.porthole(), self.porthole);
            thumbnail.verify_invariants(host, &self.idle);
        }

        for (token, task) in self.idle.iter() {
            let owner = self
                .thumbnails
                .iter()
                .find(|t| t.tracker().id() == task.tracker)
                .expect("retry must belong to a live tracker");
            assert_eq!(owner.tracker().pending_retry(task.window), Some(*token));
        }
    }
}
