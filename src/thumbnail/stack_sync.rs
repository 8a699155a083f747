//! Mirroring the host's window stacking inside a thumbnail.

use std::collections::HashMap;

use super::window_clone::WindowClone;
use crate::host::WindowId;

/// Stacking rank of every window the host knows about; lower ranks are further back.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StackIndices(HashMap<WindowId, usize>);

impl StackIndices {
    /// Ranks windows in the given order, first one at the bottom.
    pub fn from_bottom_to_top(windows: impl IntoIterator<Item = WindowId>) -> Self {
        windows
            .into_iter()
            .enumerate()
            .map(|(rank, id)| (id, rank))
            .collect()
    }

    pub fn rank(&self, window: WindowId) -> Option<usize> {
        self.0.get(&window).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(WindowId, usize)> for StackIndices {
    fn from_iter<T: IntoIterator<Item = (WindowId, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reorders `clones` back-to-front by rank and relinks every clone to the one below it.
///
/// Clones missing from `indices` keep their slots; ranked clones are stably sorted among the
/// remaining slots. Returns how many "stack above" references changed.
pub fn sync_stacking(clones: &mut Vec<WindowClone>, indices: &StackIndices) -> usize {
    let _span = tracy_client::span!("sync_stacking");

    let ranks: Vec<Option<usize>> = clones.iter().map(|c| indices.rank(c.window())).collect();
    let mut ranked: Vec<usize> = (0..clones.len()).filter(|&i| ranks[i].is_some()).collect();
    ranked.sort_by_key(|&i| ranks[i]);
    let mut ranked = ranked.into_iter();

    let mut taken: Vec<Option<WindowClone>> = clones.drain(..).map(Some).collect();
    let order: Vec<usize> = ranks
        .iter()
        .enumerate()
        .map(|(slot, rank)| match rank {
            Some(_) => ranked.next().unwrap_or(slot),
            None => slot,
        })
        .collect();
    clones.extend(order.into_iter().filter_map(|from| taken[from].take()));

    let mut changed = 0;
    let mut below = None;
    for clone in clones.iter_mut() {
        if clone.set_stack_above(below) {
            changed += 1;
        }
        below = Some(clone.window());
    }
    changed
}
