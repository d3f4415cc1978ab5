use ecolor::Color32;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smart_default::SmartDefault;

use crate::{
    interaction::{ElementInteraction, Trigger},
    position::ResponsivePosition,
    ElementId, SlideId,
};

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Slide {
    pub id: SlideId,
    pub title: String,
    pub elements: Vec<SlideElement>,
    #[default(Color32::from_gray(27))]
    #[serde(with = "crate::color")]
    pub background_color: Color32,
}

impl Slide {
    pub fn element(&self, id: &str) -> Option<&SlideElement> {
        self.elements.iter().find(|e| e.id.as_str() == id)
    }

    pub fn element_index(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.id.as_str() == id)
    }
}

#[derive(
    Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    #[display("hotspot")]
    Hotspot,
    #[display("text")]
    Text,
    #[display("media")]
    Media,
    #[display("shape")]
    Shape,
}

fn visible_by_default() -> bool {
    true
}

/// An element placed on a slide.
///
/// Elements are replaced whole, never patched field by field, so the
/// document store can keep its own history of them.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlideElement {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(default)]
    pub position: ResponsivePosition,
    #[serde(default)]
    pub style: ElementStyle,
    #[serde(default)]
    pub content: ElementContent,
    #[serde(default)]
    pub interactions: SmallVec<[ElementInteraction; 2]>,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
}

impl SlideElement {
    pub fn new(
        id: impl Into<ElementId>,
        element_type: ElementType,
        position: ResponsivePosition,
    ) -> Self {
        Self {
            id: id.into(),
            element_type,
            position,
            style: ElementStyle::default(),
            content: ElementContent::default(),
            interactions: SmallVec::new(),
            is_visible: true,
        }
    }

    #[must_use]
    pub fn with_interaction(mut self, interaction: ElementInteraction) -> Self {
        self.interactions.push(interaction);
        self
    }

    /// The first interaction bound to `trigger`. Later interactions
    /// with the same trigger are never reached.
    pub fn interaction_for(&self, trigger: Trigger) -> Option<&ElementInteraction> {
        self.interactions.iter().find(|i| i.trigger == trigger)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub width: f32,
    #[serde(with = "crate::color")]
    pub color: Color32,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementStyle {
    #[default(Color32::from_rgb(59, 130, 246))]
    #[serde(with = "crate::color")]
    pub color: Color32,
    #[default = 1.0]
    pub opacity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    pub z_index: i32,
    /// Idle animation the renderer loops, e.g. `pulse`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<smartstring::alias::String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Arrow,
    Line,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeKind>,
    /// Fields owned by the authoring forms, kept so a whole element
    /// round-trips without loss
    #[serde(flatten)]
    pub extra: IndexMap<smartstring::alias::String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::position::{DeviceClass, FixedPosition};

    #[test]
    fn element_defaults() {
        let element: SlideElement = serde_json::from_value(json!({
            "id": "hs-1",
            "type": "hotspot",
            "position": { "desktop": { "x": 10, "y": 20, "width": 40, "height": 40 } }
        }))
        .unwrap();

        assert!(element.is_visible);
        assert!(element.interactions.is_empty());
        assert_eq!(element.style, ElementStyle::default());
        assert_eq!(
            element.position.get(DeviceClass::Desktop),
            Some(FixedPosition::new(10.0, 20.0, 40.0, 40.0))
        );
        assert_eq!(element.position.get(DeviceClass::Mobile), None);
    }

    #[test]
    fn unknown_content_fields_round_trip() {
        let value = json!({
            "id": "t-1",
            "type": "text",
            "content": { "text": "Hi", "fontFamily": "serif" },
            "isVisible": false
        });
        let element: SlideElement = serde_json::from_value(value).unwrap();

        assert_eq!(element.content.text.as_deref(), Some("Hi"));
        assert_eq!(element.content.extra["fontFamily"], "serif");
        assert!(!element.is_visible);

        let back = serde_json::to_value(&element).unwrap();
        assert_eq!(back["content"]["fontFamily"], "serif");
        assert_eq!(back["isVisible"], false);
    }
}
