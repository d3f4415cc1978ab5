use islide_model::position::{DeviceClass, FixedPosition, ResponsivePosition};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Width cutoffs between device classes, in pixels.
///
/// `width < tablet` is mobile, `tablet <= width < desktop` is tablet
/// and everything wider is desktop.
#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, Copy, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Breakpoints {
    #[default = 768.0]
    pub tablet: f32,
    #[default = 1024.0]
    pub desktop: f32,
}

impl Breakpoints {
    pub fn device_class(&self, width: f32) -> DeviceClass {
        // Non-finite and negative widths count as the narrowest screen
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        if width >= self.desktop {
            DeviceClass::Desktop
        } else if width >= self.tablet {
            DeviceClass::Tablet
        } else {
            DeviceClass::Mobile
        }
    }

    /// The rectangle `position` occupies on a viewport `width` pixels wide
    pub fn resolve(&self, width: f32, position: &ResponsivePosition) -> FixedPosition {
        resolve_position(position, self.device_class(width))
    }
}

/// Picks the rectangle for `class`, falling back
/// `mobile -> tablet -> desktop -> FixedPosition::FALLBACK`.
///
/// Never fails, the result always has a positive size.
pub fn resolve_position(position: &ResponsivePosition, class: DeviceClass) -> FixedPosition {
    let chain: &[DeviceClass] = match class {
        DeviceClass::Mobile => &[DeviceClass::Mobile, DeviceClass::Tablet, DeviceClass::Desktop],
        DeviceClass::Tablet => &[DeviceClass::Tablet, DeviceClass::Desktop],
        DeviceClass::Desktop => &[DeviceClass::Desktop],
    };

    chain
        .iter()
        .find_map(|class| position.get(*class))
        .unwrap_or(FixedPosition::FALLBACK)
}

/// Size of the window or frame the slide is shown in.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn device_class(&self, breakpoints: &Breakpoints) -> DeviceClass {
        breakpoints.device_class(self.width)
    }
}
