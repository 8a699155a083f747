//! Proxy of a single real window inside a workspace thumbnail.

use std::collections::HashSet;

use glam::IVec2;

use crate::host::{Host, WindowId, WindowInfo};

/// Clone of an attached dialog, drawn on top of its parent's clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogClone {
    pub window: WindowId,
    /// Dialog frame location relative to the parent's frame.
    pub offset: IVec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowClone {
    window: WindowId,
    /// Mirrors the real window's position.
    position: IVec2,
    /// Location of the real window's frame, used to place dialogs.
    frame_loc: IVec2,
    dialogs: Vec<DialogClone>,
    /// Clone rendered directly below this one, `None` for the bottom of the stack.
    stack_above: Option<WindowId>,
}

impl WindowClone {
    /// Creates a clone of `info`, picking up every attached dialog that is already backed.
    pub fn new(host: &dyn Host, info: &WindowInfo, stack_above: Option<WindowId>) -> Self {
        let mut clone = Self {
            window: info.id,
            position: info.position,
            frame_loc: info.frame_rect.loc,
            dialogs: Vec::new(),
            stack_above,
        };

        let mut visited = HashSet::from([info.id]);
        clone.attach_transient_dialogs(host, info.id, &mut visited);
        clone
    }

    fn attach_transient_dialogs(
        &mut self,
        host: &dyn Host,
        parent: WindowId,
        visited: &mut HashSet<WindowId>,
    ) {
        for child in host.transient_children(parent) {
            if !visited.insert(child) {
                continue;
            }

            let Some(info) = host.window(child) else {
                continue;
            };
            if !info.has_surface || !info.is_attached_dialog {
                continue;
            }

            self.add_dialog(&info);
            self.attach_transient_dialogs(host, child, visited);
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn dialogs(&self) -> &[DialogClone] {
        &self.dialogs
    }

    pub fn has_dialog(&self, window: WindowId) -> bool {
        self.dialogs.iter().any(|d| d.window == window)
    }

    pub fn stack_above(&self) -> Option<WindowId> {
        self.stack_above
    }

    /// Returns whether the reference changed.
    pub fn set_stack_above(&mut self, below: Option<WindowId>) -> bool {
        if self.stack_above == below {
            return false;
        }
        self.stack_above = below;
        true
    }

    /// Attaches a dialog clone. Adding the same dialog twice is a no-op.
    pub fn add_dialog(&mut self, dialog: &WindowInfo) {
        if self.has_dialog(dialog.id) {
            return;
        }

        self.dialogs.push(DialogClone {
            window: dialog.id,
            offset: dialog.frame_rect.loc - self.frame_loc,
        });
    }

    pub fn remove_dialog(&mut self, window: WindowId) -> bool {
        let len = self.dialogs.len();
        self.dialogs.retain(|d| d.window != window);
        self.dialogs.len() != len
    }

    /// Follows the real window after it moved.
    pub fn update_position(&mut self, host: &dyn Host, info: &WindowInfo) {
        self.position = info.position;
        self.frame_loc = info.frame_rect.loc;

        for dialog in &mut self.dialogs {
            if let Some(dialog_info) = host.window(dialog.window) {
                dialog.offset = dialog_info.frame_rect.loc - self.frame_loc;
            }
        }
    }

    /// Follows one of the attached dialogs after it moved.
    pub fn update_dialog_position(&mut self, dialog: &WindowInfo) -> bool {
        let Some(clone) = self.dialogs.iter_mut().find(|d| d.window == dialog.id) else {
            return false;
        };
        clone.offset = dialog.frame_rect.loc - self.frame_loc;
        true
    }
}
