//! Drag sources a thumbnail can accept and its reply while one hovers.

use crate::host::WindowId;

/// What is being dragged over the strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// Drag coming from an X11 client through the XDND bridge.
    Xdnd,
    /// A window clone from the overview.
    Window(WindowId),
    /// An application launcher.
    App {
        app_id: String,
        can_open_new_window: bool,
    },
    /// Third-party source with its own launch action.
    CustomLaunch { launch_id: String },
}

/// Feedback for the drag currently hovering a thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMotionResult {
    /// Not a drop target; the drag continues.
    Continue,
    MoveDrop,
    CopyDrop,
}
