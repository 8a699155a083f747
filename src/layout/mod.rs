//! Geometry of the thumbnail strip.
//!
//! The strip lays out one thumbnail per workspace in a single row. Every thumbnail mirrors the
//! same porthole, so they all share one height, and their widths are distributed such that the
//! integer widths plus the gaps between them exactly fill the strip, no matter how the available
//! width divides.
//!
//! Sizes are first computed as if every thumbnail rendered at the maximum scale. When the strip
//! ends up narrower than the box, it is centered, shrinking the box by the slack on each side.
//!
//! The activation indicator follows the active workspace index, which is fractional while a
//! workspace switch is in progress. It then sits between the two neighboring thumbnails.

use glam::{DVec2, IVec2};
use serde::Serialize;
use thumbstrip_config::Config;

use crate::utils::geometry::{Rectangle, RectangleF};
use crate::utils::lerp;


#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Gap between neighboring thumbnails in logical pixels.
    pub spacing: i32,
    /// Largest thumbnail size as a fraction of the porthole.
    pub max_scale: f64,
    /// Space the indicator extends past the active thumbnail.
    pub indicator: Insets,
    pub right_to_left: bool,
    // Debug flags.
    pub max_backing_retries: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            spacing: 10,
            max_scale: 0.05,
            indicator: Insets::uniform(2.),
            right_to_left: false,
            max_backing_retries: 64,
        }
    }
}

impl Options {
    pub fn from_config(config: &Config) -> Self {
        let thumbnails = &config.thumbnails;

        Self {
            spacing: i32::from(thumbnails.spacing),
            max_scale: thumbnails.max_scale.0,
            indicator: Insets::uniform(thumbnails.indicator.full_border()),
            right_to_left: thumbnails.right_to_left,
            max_backing_retries: config.debug.max_backing_retries,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn pad(&self, rect: RectangleF) -> RectangleF {
        RectangleF {
            loc: rect.loc - DVec2::new(self.left, self.top),
            size: rect.size + DVec2::new(self.left + self.right, self.top + self.bottom),
        }
    }
}

/// Size the parent offers along each axis, if it already decided on one.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Constraints {
    pub for_width: Option<f64>,
    pub for_height: Option<f64>,
}

pub trait LayoutStrategy {
    /// Natural size given the constraints.
    fn measure(&self, constraints: Constraints) -> DVec2;

    /// Places the children inside `area`.
    ///
    /// Returns `None` when nothing can be placed, in which case callers keep their previous
    /// geometry.
    fn arrange(&self, area: Rectangle) -> Option<Arrangement>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub geometry: Rectangle,
    /// Horizontal and vertical scale from the porthole to this thumbnail.
    pub scale: DVec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrangement {
    /// Scale the strip was computed at, before per-item rounding.
    pub scale: f64,
    pub thumbnail_height: i32,
    /// Span covered by the thumbnails and the gaps between them.
    pub strip: Rectangle,
    /// One placement per thumbnail, in workspace order.
    pub thumbnails: Vec<Placement>,
    pub indicator: RectangleF,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StripLayout {
    pub count: usize,
    pub spacing: i32,
    pub porthole: IVec2,
    pub max_scale: f64,
    /// Index of the active workspace; fractional during a switch.
    pub active_index: f64,
    pub indicator: Insets,
    pub right_to_left: bool,
}

impl StripLayout {
    pub fn new(count: usize, porthole: IVec2, active_index: f64, options: &Options) -> Self {
        Self {
            count,
            spacing: options.spacing,
            porthole,
            max_scale: options.max_scale,
            active_index,
            indicator: options.indicator,
            right_to_left: options.right_to_left,
        }
    }

    fn has_porthole(&self) -> bool {
        self.porthole.x > 0 && self.porthole.y > 0
    }

    fn total_spacing(&self) -> f64 {
        self.count.saturating_sub(1) as f64 * f64::from(self.spacing)
    }

    /// Width with every thumbnail at the maximum scale.
    pub fn preferred_width(&self) -> f64 {
        if self.count == 0 || !self.has_porthole() {
            return 0.;
        }

        // Every thumbnail also claims half of each adjacent gap.
        let half = f64::from(self.spacing) / 2.;
        (0..self.count)
            .map(|idx| {
                let mut width = f64::from(self.porthole.x) * self.max_scale;
                if idx > 0 {
                    width += half;
                }
                if idx + 1 < self.count {
                    width += half;
                }
                width
            })
            .sum()
    }

    pub fn preferred_height(&self, for_width: f64) -> f64 {
        if self.count == 0 || !self.has_porthole() {
            return 0.;
        }

        let avail = (for_width - self.total_spacing()) / self.count as f64;
        let scale = (avail / f64::from(self.porthole.x))
            .min(self.max_scale)
            .max(0.);
        (f64::from(self.porthole.y) * scale).round()
    }

    /// Left and right edges of every thumbnail, left to right, before mirroring.
    fn edges(&self, strip_x1: f64, strip_x2: f64) -> Vec<(i32, i32)> {
        let spacing = f64::from(self.spacing);
        let width = (strip_x2 - strip_x1 - self.total_spacing()) / self.count as f64;
        let pitch = width + spacing;

        let lefts: Vec<f64> = (0..self.count)
            .map(|idx| (strip_x1 + idx as f64 * pitch).round())
            .collect();

        // Each right edge is derived from the next left edge so that the gaps stay exact, and the
        // last thumbnail ends at the strip end.
        (0..self.count)
            .map(|idx| {
                let x2 = lefts.get(idx + 1).map_or(strip_x2, |next| next - spacing);
                (lefts[idx] as i32, x2 as i32)
            })
            .collect()
    }
}

impl LayoutStrategy for StripLayout {
    fn measure(&self, constraints: Constraints) -> DVec2 {
        let width = self.preferred_width();
        let height = self.preferred_height(constraints.for_width.unwrap_or(width));
        DVec2::new(width, height)
    }

    fn arrange(&self, area: Rectangle) -> Option<Arrangement> {
        let _span = tracy_client::span!("StripLayout::arrange");

        if self.count == 0 || !self.has_porthole() {
            return None;
        }

        let n = self.count as f64;
        let pw = f64::from(self.porthole.x);
        let ph = f64::from(self.porthole.y);
        let total_spacing = self.total_spacing();
        let box_width = f64::from(area.size.x);

        let h_scale = (box_width - total_spacing) / n / pw;
        let v_scale = f64::from(area.size.y) / ph;
        let scale = h_scale.min(v_scale).min(self.max_scale);
        if scale.is_nan() || scale <= 0. {
            return None;
        }

        let thumbnail_height = (ph * scale).round();
        let thumbnail_width = (thumbnail_height * pw / ph).round();
        if thumbnail_width <= 0. || thumbnail_height <= 0. {
            return None;
        }

        // The rounded strip can overflow a narrow box, in which case it shrinks to the box.
        let strip_width = (n * thumbnail_width + total_spacing).min(box_width);
        let inset = ((box_width - strip_width) / 2.).floor();
        let strip_x1 = f64::from(area.loc.x) + inset;
        let strip_x2 = strip_x1 + strip_width;
        let y = area.loc.y;

        let v_scale = thumbnail_height / ph;
        let thumbnail_height = thumbnail_height as i32;

        let thumbnails: Vec<Placement> = self
            .edges(strip_x1, strip_x2)
            .into_iter()
            .map(|(x1, x2)| {
                let (x1, x2) = if self.right_to_left {
                    let mirror = (strip_x1 + strip_x2) as i32;
                    (mirror - x2, mirror - x1)
                } else {
                    (x1, x2)
                };

                Placement {
                    geometry: Rectangle::new(
                        IVec2::new(x1, y),
                        IVec2::new(x2 - x1, thumbnail_height),
                    ),
                    scale: DVec2::new(f64::from(x2 - x1) / pw, v_scale),
                }
            })
            .collect();

        let active = if self.active_index.is_finite() {
            self.active_index.clamp(0., n - 1.)
        } else {
            0.
        };
        let lower = &thumbnails[active.floor() as usize].geometry;
        let upper = &thumbnails[active.ceil() as usize].geometry;
        let t = active - active.floor();

        let lower_x2 = f64::from(lower.loc.x + lower.size.x);
        let upper_x2 = f64::from(upper.loc.x + upper.size.x);
        let indicator = RectangleF::from_x_span(
            lerp(f64::from(lower.loc.x), f64::from(upper.loc.x), t),
            lerp(lower_x2, upper_x2, t),
            f64::from(y),
            f64::from(thumbnail_height),
        );

        Some(Arrangement {
            scale,
            thumbnail_height,
            strip: Rectangle::new(
                IVec2::new(strip_x1 as i32, y),
                IVec2::new((strip_x2 - strip_x1) as i32, thumbnail_height),
            ),
            thumbnails,
            indicator: self.indicator.pad(indicator),
        })
    }
}
