use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{effect::SlideEffect, InteractionId};

/// How the user acts on an element.
#[derive(
    Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    #[display("click")]
    Click,
    #[display("hover")]
    Hover,
    #[display("double-click")]
    DoubleClick,
    #[display("long-press")]
    LongPress,
    #[display("touch-start")]
    TouchStart,
    #[display("touch-end")]
    TouchEnd,
    #[display("timeline")]
    Timeline,
    #[display("auto")]
    Auto,
}

impl Trigger {
    /// Triggers whose interactions become timeline steps
    pub const fn is_sequenced(self) -> bool {
        matches!(self, Self::Click | Self::Auto | Self::Timeline)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementInteraction {
    pub id: InteractionId,
    pub trigger: Trigger,
    /// Carried for the authoring tool, resolution only looks at `trigger`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<IndexMap<smartstring::alias::String, serde_json::Value>>,
    pub effect: SlideEffect,
}

impl ElementInteraction {
    pub fn new(id: impl Into<InteractionId>, trigger: Trigger, effect: SlideEffect) -> Self {
        Self {
            id: id.into(),
            trigger,
            conditions: None,
            effect,
        }
    }
}
