use glam::{DVec2, IVec2};
use proptest::prelude::*;
use proptest_derive::Arbitrary;

use super::*;
use crate::host::{Host, HostEvent, WindowId, WindowLocation, WorkspaceId};
use crate::layout::Options;
use crate::thumbnails_box::ScrollDirection;
use crate::utils::geometry::Rectangle;

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Op {
    Show,
    Hide,
    AddWorkspace,
    RemoveWorkspace(#[proptest(strategy = "0..5usize")] usize),
    MoveWorkspace {
        #[proptest(strategy = "0..5usize")]
        from: usize,
        #[proptest(strategy = "0..5usize")]
        to: usize,
    },
    SwitchWorkspace(#[proptest(strategy = "0..5usize")] usize),
    AddWindow {
        #[proptest(strategy = "0..5usize")]
        workspace: usize,
        #[proptest(strategy = "0..=1usize")]
        monitor: usize,
        backed: bool,
        sticky: bool,
    },
    AddDialog {
        #[proptest(strategy = "0..8usize")]
        parent: usize,
        backed: bool,
    },
    RemoveWindow(#[proptest(strategy = "0..8usize")] usize),
    AttachSurface(#[proptest(strategy = "0..8usize")] usize),
    SetMinimized {
        #[proptest(strategy = "0..8usize")]
        window: usize,
        minimized: bool,
    },
    SetSkipFromOverview {
        #[proptest(strategy = "0..8usize")]
        window: usize,
        skip: bool,
    },
    MoveWindowToMonitor {
        #[proptest(strategy = "0..8usize")]
        window: usize,
        #[proptest(strategy = "0..=1usize")]
        monitor: usize,
    },
    MoveWindowToWorkspace {
        #[proptest(strategy = "0..8usize")]
        window: usize,
        #[proptest(strategy = "0..5usize")]
        workspace: usize,
    },
    MoveWindowBy {
        #[proptest(strategy = "0..8usize")]
        window: usize,
        #[proptest(strategy = "-200..200i32")]
        dx: i32,
        #[proptest(strategy = "-200..200i32")]
        dy: i32,
    },
    Raise(#[proptest(strategy = "0..8usize")] usize),
    DispatchIdle,
    SetWorkAreaHeight {
        #[proptest(strategy = "0..=1usize")]
        monitor: usize,
        #[proptest(strategy = "0..=1080i32")]
        height: i32,
    },
    SetPrimaryMonitor(#[proptest(strategy = "0..=2usize")] usize),
    Allocate {
        #[proptest(strategy = "0..2000i32")]
        width: i32,
        #[proptest(strategy = "0..200i32")]
        height: i32,
    },
    SetIndicatorPosition(#[proptest(strategy = "-1f64..6.")] f64),
    Click(#[proptest(strategy = "0f64..2000.")] f64),
    Scroll(#[proptest(strategy = "0..4u8")] u8),
}

fn window_at(f: &Fixture, idx: usize) -> Option<WindowId> {
    if f.host.windows.is_empty() {
        return None;
    }
    Some(f.host.windows[idx % f.host.windows.len()].id)
}

/// Workspaces whose window lists include a window at `location`.
fn workspaces_of(f: &Fixture, location: WindowLocation) -> Vec<WorkspaceId> {
    match location {
        WindowLocation::Workspace(ws) => vec![ws],
        WindowLocation::AllWorkspaces => f.host.workspaces.iter().map(|ws| ws.id).collect(),
    }
}

fn announce(f: &mut Fixture, window: WindowId) {
    let Some(info) = f.host.window(window) else {
        return;
    };
    for workspace in workspaces_of(f, info.location) {
        f.event(HostEvent::WindowAdded { workspace, window });
    }
}

fn retract(f: &mut Fixture, window: WindowId, location: WindowLocation) {
    for workspace in workspaces_of(f, location) {
        f.event(HostEvent::WindowRemoved { workspace, window });
    }
}

impl Op {
    fn apply(self, f: &mut Fixture) {
        match self {
            Op::Show => f.show(),
            Op::Hide => f.strip.destroy_all(),
            Op::AddWorkspace => {
                f.host.add_workspace();
                f.event(HostEvent::WorkspaceCountChanged);
            }
            Op::RemoveWorkspace(idx) => {
                let Some(ws) = f.host.workspaces.get(idx).map(|ws| ws.id) else {
                    return;
                };
                f.host.remove_workspace(ws);
                f.event(HostEvent::WorkspaceCountChanged);
            }
            Op::MoveWorkspace { from, to } => {
                let len = f.host.workspaces.len();
                if from >= len || to >= len {
                    return;
                }
                f.host.move_workspace(from, to);
                f.event(HostEvent::WorkspacesReordered);
            }
            Op::SwitchWorkspace(idx) => {
                let Some(ws) = f.host.workspaces.get(idx).map(|ws| ws.id) else {
                    return;
                };
                f.host.set_active_workspace(ws);
                f.event(HostEvent::WorkspaceSwitched { to: ws });
            }
            Op::AddWindow {
                workspace,
                monitor,
                backed,
                sticky,
            } => {
                let Some(ws) = f.host.workspaces.get(workspace).map(|ws| ws.id) else {
                    return;
                };
                let window = if backed {
                    f.host.add_window(ws)
                } else {
                    f.host.add_unbacked_window(ws)
                };
                let info = f.host.window_mut(window);
                info.monitor = monitor;
                if sticky {
                    info.location = WindowLocation::AllWorkspaces;
                }
                announce(f, window);
            }
            Op::AddDialog { parent, backed } => {
                let Some(parent) = window_at(f, parent) else {
                    return;
                };
                let dialog = f.host.add_dialog(parent);
                f.host.window_mut(dialog).has_surface = backed;
                announce(f, dialog);
            }
            Op::RemoveWindow(idx) => {
                let Some(window) = window_at(f, idx) else {
                    return;
                };
                let location = f.host.window_mut(window).location;
                f.host.remove_window(window);
                retract(f, window, location);
            }
            Op::AttachSurface(idx) => {
                let Some(window) = window_at(f, idx) else {
                    return;
                };
                // Trackers notice on their next idle pass.
                f.host.window_mut(window).has_surface = true;
            }
            Op::SetMinimized { window, minimized } => {
                let Some(window) = window_at(f, window) else {
                    return;
                };
                let info = f.host.window_mut(window);
                info.minimized = minimized;
                info.showing_on_workspace = !minimized;
                f.event(HostEvent::MinimizedChanged { window });
            }
            Op::SetSkipFromOverview { window, skip } => {
                let Some(window) = window_at(f, window) else {
                    return;
                };
                // Hosts re-announce windows whose overview visibility changed.
                let location = f.host.window_mut(window).location;
                retract(f, window, location);
                f.host.window_mut(window).skip_from_overview = skip;
                announce(f, window);
            }
            Op::MoveWindowToMonitor { window, monitor } => {
                let Some(window) = window_at(f, window) else {
                    return;
                };
                let info = f.host.window_mut(window);
                let old = info.monitor;
                info.monitor = monitor;
                f.event(HostEvent::WindowLeftMonitor {
                    monitor: old,
                    window,
                });
                f.event(HostEvent::WindowEnteredMonitor { monitor, window });
            }
            Op::MoveWindowToWorkspace { window, workspace } => {
                let Some(window) = window_at(f, window) else {
                    return;
                };
                let Some(ws) = f.host.workspaces.get(workspace).map(|ws| ws.id) else {
                    return;
                };
                let info = f.host.window_mut(window);
                let WindowLocation::Workspace(old) = info.location else {
                    return;
                };
                info.location = WindowLocation::Workspace(ws);
                f.event(HostEvent::WindowRemoved {
                    workspace: old,
                    window,
                });
                f.event(HostEvent::WindowAdded {
                    workspace: ws,
                    window,
                });
            }
            Op::MoveWindowBy { window, dx, dy } => {
                let Some(window) = window_at(f, window) else {
                    return;
                };
                let info = f.host.window_mut(window);
                info.frame_rect.loc += IVec2::new(dx, dy);
                info.position += IVec2::new(dx, dy);
                f.event(HostEvent::PositionChanged { window });
            }
            Op::Raise(idx) => {
                let Some(window) = window_at(f, idx) else {
                    return;
                };
                f.host.raise(window);
                f.event(HostEvent::Restacked(f.host.stack_indices()));
            }
            Op::DispatchIdle => {
                f.dispatch_idle();
            }
            Op::SetWorkAreaHeight { monitor, height } => {
                f.host.monitors[monitor].size.y = height;
                f.event(HostEvent::WorkAreasChanged);
            }
            Op::SetPrimaryMonitor(monitor) => {
                f.host.primary = monitor;
                f.event(HostEvent::MonitorsChanged);
            }
            Op::Allocate { width, height } => {
                f.allocate(width, height);
            }
            Op::SetIndicatorPosition(position) => f.strip.set_indicator_position(position),
            Op::Click(x) => {
                f.strip.button_released(&mut f.host, DVec2::new(x, 10.), 0);
            }
            Op::Scroll(direction) => {
                let direction = match direction {
                    0 => ScrollDirection::Up,
                    1 => ScrollDirection::Down,
                    2 => ScrollDirection::Left,
                    _ => ScrollDirection::Right,
                };
                f.strip.scroll(&mut f.host, direction, 0);
            }
        }
    }
}

fn fixture() -> Fixture {
    let options = Options {
        max_backing_retries: u32::MAX,
        ..Options::default()
    };
    let mut f = Fixture::with_options(3, options);
    f.host
        .monitors
        .push(Rectangle::new(IVec2::new(1920, 0), IVec2::new(1280, 720)));
    f
}

#[track_caller]
fn check_ops(ops: impl IntoIterator<Item = Op>) -> Fixture {
    let mut f = fixture();
    for op in ops {
        op.apply(&mut f);
        f.strip.verify_invariants(&f.host);
    }
    f
}

/// Once every window has a surface and the idle queue ran dry, each thumbnail clones exactly the
/// visible windows of its workspace and monitor, in stacking order.
#[track_caller]
fn check_complete(f: &mut Fixture) {
    if !f.strip.is_populated() {
        return;
    }

    for window in &mut f.host.windows {
        window.has_surface = true;
    }
    while f.dispatch_idle() > 0 {}
    f.event(HostEvent::Restacked(f.host.stack_indices()));

    let monitor = f.strip.monitor();
    for thumbnail in f.strip.thumbnails() {
        let workspace = thumbnail.workspace();
        let expected: Vec<_> = f
            .host
            .windows
            .iter()
            .filter(|w| w.located_on(workspace) && w.monitor == monitor && w.is_overview_window())
            .map(|w| w.id)
            .collect();
        assert_eq!(f.cloned(workspace), expected, "clones of {workspace:?}");
    }
}

#[test]
fn unbacked_window_minimized_before_surface() {
    let mut f = check_ops([
        Op::Show,
        Op::AddWindow {
            workspace: 0,
            monitor: 0,
            backed: false,
            sticky: false,
        },
        Op::SetMinimized {
            window: 0,
            minimized: true,
        },
        Op::DispatchIdle,
        Op::AttachSurface(0),
        Op::DispatchIdle,
        Op::SetMinimized {
            window: 0,
            minimized: false,
        },
    ]);
    check_complete(&mut f);
    assert_eq!(f.cloned(f.host.workspace_id(0)).len(), 1);
}

#[test]
fn sticky_window_survives_workspace_changes() {
    let mut f = check_ops([
        Op::Show,
        Op::AddWindow {
            workspace: 1,
            monitor: 0,
            backed: true,
            sticky: true,
        },
        Op::AddWorkspace,
        Op::MoveWorkspace { from: 3, to: 0 },
        Op::RemoveWorkspace(1),
    ]);
    check_complete(&mut f);
    for thumbnail in f.strip.thumbnails() {
        assert_eq!(thumbnail.tracker().clones().len(), 1);
    }
}

#[test]
fn window_moved_while_waiting_for_surface() {
    let mut f = check_ops([
        Op::Show,
        Op::AddWindow {
            workspace: 0,
            monitor: 0,
            backed: false,
            sticky: false,
        },
        Op::MoveWindowToWorkspace {
            window: 0,
            workspace: 2,
        },
        Op::MoveWindowToMonitor {
            window: 0,
            monitor: 1,
        },
        Op::AttachSurface(0),
        Op::DispatchIdle,
        Op::MoveWindowToMonitor {
            window: 0,
            monitor: 0,
        },
    ]);
    check_complete(&mut f);
    assert_eq!(f.cloned(f.host.workspace_id(2)).len(), 1);
    assert!(f.cloned(f.host.workspace_id(0)).is_empty());
}

#[test]
fn primary_monitor_disappears() {
    let mut f = check_ops([
        Op::Show,
        Op::AddWindow {
            workspace: 0,
            monitor: 1,
            backed: true,
            sticky: false,
        },
        Op::SetPrimaryMonitor(1),
        Op::Allocate {
            width: 600,
            height: 54,
        },
        Op::SetPrimaryMonitor(2),
        Op::Allocate {
            width: 600,
            height: 54,
        },
    ]);
    check_complete(&mut f);
    assert_eq!(f.strip.porthole(), f.host.stage);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: if std::env::var_os("RUN_SLOW_TESTS").is_none() {
            64
        } else {
            ProptestConfig::default().cases * 16
        },
        ..ProptestConfig::default()
    })]

    #[test]
    fn random_operations_dont_panic(ops: Vec<Op>) {
        check_ops(ops);
    }

    #[test]
    fn random_operations_clone_every_visible_window(ops: Vec<Op>) {
        let mut f = check_ops(ops);
        check_complete(&mut f);
    }
}
