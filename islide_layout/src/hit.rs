use emath::Pos2;
use islide_model::{position::DeviceClass, slide::SlideElement};

use crate::breakpoint::resolve_position;

/// The visible element drawn on top at `point`.
///
/// Higher `z_index` wins, equal indices go to the element later in the
/// slide since it is painted last.
pub fn topmost_at(
    elements: &[SlideElement],
    point: Pos2,
    device_class: DeviceClass,
) -> Option<&SlideElement> {
    elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_visible && resolve_position(&e.position, device_class).contains(point))
        .max_by_key(|(index, e)| (e.style.z_index, *index))
        .map(|(_, e)| e)
}

#[cfg(test)]
mod tests {
    use islide_model::{
        position::{FixedPosition, ResponsivePosition},
        slide::ElementType,
    };

    use super::*;

    fn element(id: &str, rect: FixedPosition, z_index: i32) -> SlideElement {
        let mut element =
            SlideElement::new(id, ElementType::Hotspot, ResponsivePosition::uniform(rect));
        element.style.z_index = z_index;
        element
    }

    #[test]
    fn later_element_wins_on_equal_z() {
        let elements = [
            element("a", FixedPosition::new(0.0, 0.0, 100.0, 100.0), 0),
            element("b", FixedPosition::new(50.0, 50.0, 100.0, 100.0), 0),
        ];
        let hit = topmost_at(&elements, Pos2::new(75.0, 75.0), DeviceClass::Desktop);
        assert_eq!(hit.map(|e| e.id.as_str()), Some("b"));
    }

    #[test]
    fn z_index_beats_order() {
        let elements = [
            element("a", FixedPosition::new(0.0, 0.0, 100.0, 100.0), 5),
            element("b", FixedPosition::new(50.0, 50.0, 100.0, 100.0), 1),
        ];
        let hit = topmost_at(&elements, Pos2::new(75.0, 75.0), DeviceClass::Desktop);
        assert_eq!(hit.map(|e| e.id.as_str()), Some("a"));
    }

    #[test]
    fn hidden_elements_and_empty_canvas() {
        let mut hidden = element("a", FixedPosition::new(0.0, 0.0, 100.0, 100.0), 0);
        hidden.is_visible = false;
        let elements = [hidden];

        assert!(topmost_at(&elements, Pos2::new(10.0, 10.0), DeviceClass::Desktop).is_none());
        assert!(topmost_at(&elements, Pos2::new(500.0, 500.0), DeviceClass::Mobile).is_none());
    }
}
