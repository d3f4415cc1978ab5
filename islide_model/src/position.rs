use emath::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// One of the three layout variants an element carries.
#[derive(
    Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    #[display("desktop")]
    Desktop,
    #[display("tablet")]
    Tablet,
    #[display("mobile")]
    Mobile,
}

/// A fixed rectangle in canvas pixels.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct FixedPosition {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for FixedPosition {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl FixedPosition {
    /// Used when no breakpoint of an element resolves to a usable rectangle
    pub const FALLBACK: FixedPosition = FixedPosition {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle is usable when its size is positive and every
    /// coordinate is a finite number
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn min(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn translate(self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..self
        }
    }

    pub fn contains(&self, point: Pos2) -> bool {
        self.to_rect().contains(point)
    }

    pub fn to_rect(&self) -> Rect {
        Rect::from_min_size(self.min(), self.size())
    }
}

impl From<Rect> for FixedPosition {
    fn from(rect: Rect) -> Self {
        Self::new(rect.min.x, rect.min.y, rect.width(), rect.height())
    }
}

impl From<FixedPosition> for Rect {
    fn from(position: FixedPosition) -> Self {
        position.to_rect()
    }
}

/// Per device class layout of an element.
///
/// Authored data may leave `tablet` and `mobile` (or even `desktop`)
/// out. Resolution never fails on a missing entry, it falls back
/// along `mobile -> tablet -> desktop -> FixedPosition::FALLBACK`.
#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct ResponsivePosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<FixedPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<FixedPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<FixedPosition>,
}

impl ResponsivePosition {
    /// The same rectangle on every breakpoint
    pub const fn uniform(position: FixedPosition) -> Self {
        Self {
            desktop: Some(position),
            tablet: Some(position),
            mobile: Some(position),
        }
    }

    pub const fn desktop_only(position: FixedPosition) -> Self {
        Self {
            desktop: Some(position),
            tablet: None,
            mobile: None,
        }
    }

    /// The authored entry for `class`, if it is present and usable
    pub fn get(&self, class: DeviceClass) -> Option<FixedPosition> {
        let entry = match class {
            DeviceClass::Desktop => self.desktop,
            DeviceClass::Tablet => self.tablet,
            DeviceClass::Mobile => self.mobile,
        };
        entry.filter(FixedPosition::is_valid)
    }

    /// Returns a copy where only the entry for `class` is replaced
    #[must_use]
    pub fn with(mut self, class: DeviceClass, position: FixedPosition) -> Self {
        match class {
            DeviceClass::Desktop => self.desktop = Some(position),
            DeviceClass::Tablet => self.tablet = Some(position),
            DeviceClass::Mobile => self.mobile = Some(position),
        }
        self
    }
}
