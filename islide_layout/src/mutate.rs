use emath::Vec2;
use islide_model::{
    position::{DeviceClass, FixedPosition, ResponsivePosition},
    slide::SlideElement,
    ElementId,
};
use serde::{Deserialize, Serialize};

/// Size of the slide canvas elements are kept inside of.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub width: f32,
    pub height: f32,
}

impl CanvasBounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A new position for one element, ready for the document store.
///
/// `position` is the element's whole [`ResponsivePosition`], but only
/// the entry for `device_class` differs from what the element had.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub element_id: ElementId,
    pub device_class: DeviceClass,
    pub position: ResponsivePosition,
}

impl PositionUpdate {
    /// The rectangle written for `device_class`
    pub fn rect(&self) -> FixedPosition {
        self.position
            .get(self.device_class)
            .unwrap_or(FixedPosition::FALLBACK)
    }
}

/// Where a rectangle picked up at `start` lands after the pointer
/// travelled `delta`, before any clamping
pub fn dragged_position(start: FixedPosition, delta: Vec2) -> FixedPosition {
    start.translate(delta)
}

/// Keeps `candidate` on the canvas.
///
/// The top left corner never goes negative. With known `bounds` the
/// rectangle is also pulled back so it does not hang over the right or
/// bottom edge; an element larger than the canvas sticks to the top left.
pub fn clamp_position(candidate: FixedPosition, bounds: Option<CanvasBounds>) -> FixedPosition {
    let (width, height) = if candidate.width.is_finite()
        && candidate.height.is_finite()
        && candidate.width > 0.0
        && candidate.height > 0.0
    {
        (candidate.width, candidate.height)
    } else {
        (FixedPosition::FALLBACK.width, FixedPosition::FALLBACK.height)
    };
    let mut x = if candidate.x.is_finite() { candidate.x } else { 0.0 };
    let mut y = if candidate.y.is_finite() { candidate.y } else { 0.0 };

    if let Some(bounds) = bounds {
        x = x.min(bounds.width - width);
        y = y.min(bounds.height - height);
    }

    FixedPosition::new(x.max(0.0), y.max(0.0), width, height)
}

/// Moves `element` to `candidate` on `device_class` only
pub fn position_update(
    element: &SlideElement,
    device_class: DeviceClass,
    candidate: FixedPosition,
    bounds: Option<CanvasBounds>,
) -> PositionUpdate {
    let rect = clamp_position(candidate, bounds);
    tracing::trace!(element = %element.id, %device_class, ?rect, "Position update");
    PositionUpdate {
        element_id: element.id.clone(),
        device_class,
        position: element.position.with(device_class, rect),
    }
}
