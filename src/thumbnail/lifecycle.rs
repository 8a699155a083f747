//! Add/remove phases of a workspace thumbnail.
//!
//! The presentation layer drives the transitions when its animations complete. This module only
//! records where a thumbnail is and gates input on it.

use crate::utils::lerp;

/// Scale of a thumbnail that slid out completely.
const SLID_OUT_SCALE: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ThumbnailState {
    New,
    Expanding,
    Expanded,
    AnimatingIn,
    Normal,
    Removing,
    AnimatingOut,
    AnimatedOut,
    Collapsing,
    Destroyed,
}

impl ThumbnailState {
    /// Next state along the creation or removal path.
    pub fn next(self) -> Option<Self> {
        Some(match self {
            Self::New => Self::Expanding,
            Self::Expanding => Self::Expanded,
            Self::Expanded => Self::AnimatingIn,
            Self::AnimatingIn => Self::Normal,
            Self::Normal => Self::Removing,
            Self::Removing => Self::AnimatingOut,
            Self::AnimatingOut => Self::AnimatedOut,
            Self::AnimatedOut => Self::Collapsing,
            Self::Collapsing => Self::Destroyed,
            Self::Destroyed => return None,
        })
    }

    pub fn accepts_input(self) -> bool {
        self <= Self::Normal
    }

    fn is_creating(self) -> bool {
        self < Self::Normal
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lifecycle {
    state: ThumbnailState,
    /// How far the thumbnail slid out, from 0 (in place) to 1 (gone).
    slide_position: f64,
    /// How far the thumbnail's slot collapsed, from 0 (full width) to 1 (no width).
    collapse_fraction: f64,
    relayout_pending: bool,
}

impl Lifecycle {
    /// Lifecycle of a thumbnail that will animate in.
    pub fn new() -> Self {
        Self {
            state: ThumbnailState::New,
            slide_position: 0.,
            collapse_fraction: 0.,
            relayout_pending: false,
        }
    }

    /// Lifecycle of a thumbnail that appears without animation.
    pub fn settled() -> Self {
        Self {
            state: ThumbnailState::Normal,
            ..Self::new()
        }
    }

    pub fn state(&self) -> ThumbnailState {
        self.state
    }

    pub fn accepts_input(&self) -> bool {
        self.state.accepts_input()
    }

    /// Moves to `to`, returning whether the transition was legal.
    ///
    /// A thumbnail can start its removal from any point of the creation path; every other
    /// transition must be the next step of its path.
    pub fn transition(&mut self, to: ThumbnailState) -> bool {
        let from = self.state;
        let legal =
            from.next() == Some(to) || (to == ThumbnailState::Removing && from.is_creating());

        if !legal {
            warn!("ignoring thumbnail transition from {from:?} to {to:?}");
            return false;
        }

        trace!("thumbnail transition from {from:?} to {to:?}");
        self.state = to;
        true
    }

    pub fn slide_position(&self) -> f64 {
        self.slide_position
    }

    /// Sets the slide position, clamped to `[0, 1]`. Returns whether it changed.
    pub fn set_slide_position(&mut self, value: f64) -> bool {
        Self::set_fraction(&mut self.slide_position, value, &mut self.relayout_pending)
    }

    pub fn collapse_fraction(&self) -> f64 {
        self.collapse_fraction
    }

    /// Sets the collapse fraction, clamped to `[0, 1]`. Returns whether it changed.
    pub fn set_collapse_fraction(&mut self, value: f64) -> bool {
        Self::set_fraction(&mut self.collapse_fraction, value, &mut self.relayout_pending)
    }

    fn set_fraction(field: &mut f64, value: f64, relayout_pending: &mut bool) -> bool {
        if value.is_nan() {
            return false;
        }

        let value = value.clamp(0., 1.);
        if *field == value {
            return false;
        }

        *field = value;
        *relayout_pending = true;
        true
    }

    pub fn slide_scale(&self) -> f64 {
        lerp(1., SLID_OUT_SCALE, self.slide_position)
    }

    pub fn alpha(&self) -> f64 {
        lerp(1., 0., self.slide_position)
    }

    pub fn is_relayout_pending(&self) -> bool {
        self.relayout_pending
    }

    /// Returns and clears the pending relayout request.
    pub fn take_relayout_request(&mut self) -> bool {
        std::mem::take(&mut self.relayout_pending)
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
