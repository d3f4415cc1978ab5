//! Ordered, timestamped steps derived from a deck.

use std::time::Duration;

use islide_model::{
    interaction::ElementInteraction, position::ResponsivePosition, ElementId, SlideDeck,
};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

pub type StepId = smartstring::alias::String;

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, Copy, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Seconds of rest added after every step's effect
    #[default = 1.0]
    pub step_gap_secs: f64,
    /// Playback never advances faster than this, whatever the speed
    #[default = 1000]
    pub min_advance_delay_ms: u64,
}

impl TimelineConfig {
    pub const fn min_advance_delay(&self) -> Duration {
        Duration::from_millis(self.min_advance_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineStep {
    pub id: StepId,
    /// 1 based
    pub step_number: u32,
    pub slide_index: usize,
    pub element_id: ElementId,
    pub interaction: ElementInteraction,
    /// Seconds from the start of the timeline
    pub timestamp: f64,
    /// Copy of the element's layout when the steps were derived
    pub element_position: ResponsivePosition,
}

/// Walks slides, elements and interactions in order and turns every
/// sequenced interaction into a step.
///
/// The first step starts at 0 and each following one starts after the
/// previous effect's duration plus the configured gap.
pub fn derive_steps(deck: &SlideDeck, config: &TimelineConfig) -> Vec<TimelineStep> {
    let gap = if config.step_gap_secs.is_finite() {
        config.step_gap_secs.max(0.0)
    } else {
        0.0
    };

    let mut steps: Vec<TimelineStep> = Vec::new();
    for (slide_index, slide) in deck.slides.iter().enumerate() {
        for element in &slide.elements {
            for interaction in element.interactions.iter().filter(|i| i.trigger.is_sequenced()) {
                let timestamp = steps.last().map_or(0.0, |previous| {
                    previous.timestamp + previous.interaction.effect.duration as f64 / 1000.0 + gap
                });
                let step_number = steps.len() as u32 + 1;
                steps.push(TimelineStep {
                    id: format!("step-{step_number}").into(),
                    step_number,
                    slide_index,
                    element_id: element.id.clone(),
                    interaction: interaction.clone(),
                    timestamp,
                    element_position: element.position,
                });
            }
        }
    }

    tracing::debug!(steps = steps.len(), "Derived timeline");
    steps
}

#[cfg(test)]
pub(crate) mod tests {
    use islide_model::{
        effect::{EffectParameters, SlideEffect},
        interaction::Trigger,
        position::FixedPosition,
        slide::{ElementType, Slide, SlideElement},
    };
    use pretty_assertions::assert_eq;

    use super::*;

    pub(crate) fn element(id: &str, bindings: &[(Trigger, u64)]) -> SlideElement {
        bindings.iter().enumerate().fold(
            SlideElement::new(
                id,
                ElementType::Hotspot,
                ResponsivePosition::desktop_only(FixedPosition::new(0.0, 0.0, 50.0, 50.0)),
            ),
            |element, (index, (trigger, duration))| {
                let id = format!("{id}-{index}");
                element.with_interaction(ElementInteraction::new(
                    id.as_str(),
                    *trigger,
                    SlideEffect::new(
                        id.as_str(),
                        *duration,
                        EffectParameters::Spotlight(Default::default()),
                    ),
                ))
            },
        )
    }

    pub(crate) fn deck(slides: Vec<Vec<SlideElement>>) -> SlideDeck {
        SlideDeck {
            id: "deck".into(),
            title: "Deck".into(),
            slides: slides
                .into_iter()
                .enumerate()
                .map(|(index, elements)| Slide {
                    id: format!("slide-{index}").into(),
                    elements,
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn timestamps_accumulate_duration_and_gap() {
        let deck = deck(vec![vec![element(
            "a",
            &[(Trigger::Click, 500), (Trigger::Auto, 2000), (Trigger::Timeline, 0)],
        )]]);

        let steps = derive_steps(&deck, &TimelineConfig::default());
        let timestamps: Vec<f64> = steps.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, [0.0, 1.5, 4.5]);
        let numbers: Vec<u32> = steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, [1, 2, 3]);
        assert_eq!(steps[2].id.as_str(), "step-3");
    }

    #[test]
    fn only_sequenced_triggers_become_steps() {
        let deck = deck(vec![
            vec![
                element("a", &[(Trigger::Hover, 100), (Trigger::Click, 1000)]),
                element("b", &[(Trigger::LongPress, 100)]),
            ],
            vec![element("c", &[(Trigger::TouchEnd, 100), (Trigger::Click, 0)])],
        ]);

        let steps = derive_steps(&deck, &TimelineConfig::default());
        let order: Vec<(&str, usize)> = steps
            .iter()
            .map(|s| (s.element_id.as_str(), s.slide_index))
            .collect();
        assert_eq!(order, [("a", 0), ("c", 1)]);
        assert_eq!(steps[1].timestamp, 2.0);
        assert_eq!(steps[1].interaction.id.as_str(), "c-1");
    }

    #[test]
    fn empty_deck_has_no_steps() {
        assert!(derive_steps(&SlideDeck::default(), &TimelineConfig::default()).is_empty());
    }

    #[test]
    fn gap_is_configurable() {
        let deck = deck(vec![vec![element("a", &[(Trigger::Click, 250), (Trigger::Click, 0)])]]);
        let config = TimelineConfig {
            step_gap_secs: 0.0,
            ..Default::default()
        };
        let steps = derive_steps(&deck, &config);
        assert_eq!(steps[1].timestamp, 0.25);
    }
}
