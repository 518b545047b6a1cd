use std::fmt;

use crate::config::scale;

/// Preview zoom in whole percent, always one of 25, 50, 75 or 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scale(u8);

impl Scale {
    pub const MIN: Scale = Scale(scale::MIN);
    pub const MAX: Scale = Scale(scale::MAX);

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Linear scale factor in `0.25..=1.0`.
    pub fn factor(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// One step smaller, or `None` at the floor.
    pub fn zoomed_out(self) -> Option<Scale> {
        (self > Self::MIN).then(|| Scale(self.0 - scale::STEP))
    }

    /// One step larger, or `None` at the ceiling.
    pub fn zoomed_in(self) -> Option<Scale> {
        (self < Self::MAX).then(|| Scale(self.0 + scale::STEP))
    }

    /// Value shown in the scale control, e.g. `75%`.
    pub fn label(self) -> String {
        format!("{}%", self.0)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::MAX
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Transform applied to the preview image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageTransform {
    /// Nothing applied yet, or reset after closing
    #[default]
    None,
    Scaled(Scale),
}

impl ImageTransform {
    pub fn css(self) -> String {
        match self {
            ImageTransform::None => scale::TRANSFORM_NONE.to_string(),
            ImageTransform::Scaled(s) => format!("scale({})", s.factor()),
        }
    }
}
