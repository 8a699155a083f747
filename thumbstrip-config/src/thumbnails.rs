use crate::FloatOrInt;

#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Thumbnails {
    #[knuffel(child, unwrap(argument), default = Self::default().spacing)]
    pub spacing: u16,
    #[knuffel(child, unwrap(argument), default = Self::default().max_scale)]
    pub max_scale: FloatOrInt<0, 1>,
    #[knuffel(child, default)]
    pub indicator: Indicator,
    #[knuffel(child)]
    pub right_to_left: bool,
}

impl Default for Thumbnails {
    fn default() -> Self {
        Self {
            spacing: 10,
            max_scale: FloatOrInt(0.05),
            indicator: Indicator::default(),
            right_to_left: false,
        }
    }
}

/// Highlight around the active workspace thumbnail.
#[derive(knuffel::Decode, Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    #[knuffel(child, unwrap(argument), default = Self::default().border_width)]
    pub border_width: FloatOrInt<0, 65535>,
    #[knuffel(child, unwrap(argument), default = Self::default().padding)]
    pub padding: FloatOrInt<0, 65535>,
}

impl Default for Indicator {
    fn default() -> Self {
        Self {
            border_width: FloatOrInt(2.),
            padding: FloatOrInt(0.),
        }
    }
}

impl Indicator {
    /// Distance the indicator extends past the thumbnail edge on every side.
    pub fn full_border(&self) -> f64 {
        self.border_width.0 + self.padding.0
    }
}
