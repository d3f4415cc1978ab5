//! Data model of an interactive slide deck: slides, positioned elements,
//! the interactions bound to them and the effects those interactions fire.

use std::{collections::HashMap, io::Read};

use serde::{Deserialize, Serialize};
use slide::{Slide, SlideElement};

pub mod color;
pub mod effect;
pub mod error;
pub mod interaction;
pub mod position;
pub mod slide;

pub use error::DeckError;

pub type DeckId = smartstring::alias::String;
pub type SlideId = smartstring::alias::String;
pub type ElementId = smartstring::alias::String;
pub type InteractionId = smartstring::alias::String;
pub type EffectId = smartstring::alias::String;

#[derive(Default, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SlideDeck {
    pub id: DeckId,
    pub title: String,
    pub slides: Vec<Slide>,
}

impl SlideDeck {
    pub fn from_json(json: &str) -> error::Result<Self> {
        let deck: Self = serde_json::from_str(json)?;
        deck.validate()?;
        Ok(deck)
    }

    pub fn from_reader(reader: impl Read) -> error::Result<Self> {
        let deck: Self = serde_json::from_reader(reader)?;
        deck.validate()?;
        Ok(deck)
    }

    pub fn to_json_pretty(&self) -> error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Element ids key every update handed to the document store, so
    /// they have to be unique across the whole deck
    pub fn validate(&self) -> error::Result<()> {
        let mut seen: HashMap<&str, usize, ahash::RandomState> = HashMap::default();
        for (slide_index, slide) in self.slides.iter().enumerate() {
            for element in &slide.elements {
                if let Some(first) = seen.insert(element.id.as_str(), slide_index) {
                    return Err(DeckError::DuplicateElementId {
                        id: element.id.clone(),
                        first,
                        second: slide_index,
                    });
                }
            }
        }
        Ok(())
    }

    /// Finds an element anywhere in the deck, with the index of its slide
    pub fn element(&self, id: &str) -> Option<(usize, &SlideElement)> {
        self.slides
            .iter()
            .enumerate()
            .find_map(|(index, slide)| slide.element(id).map(|e| (index, e)))
    }

    /// Swaps in a whole new version of an element, returning the old one
    pub fn replace_element(&mut self, element: SlideElement) -> Option<SlideElement> {
        let (slide, index) = self.slides.iter_mut().find_map(|slide| {
            let index = slide.element_index(&element.id)?;
            Some((slide, index))
        })?;
        Some(std::mem::replace(&mut slide.elements[index], element))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        position::{FixedPosition, ResponsivePosition},
        slide::ElementType,
    };

    const DECK: &str = r##"{
        "id": "deck-1",
        "title": "Tour",
        "slides": [
            {
                "id": "s1",
                "elements": [
                    {
                        "id": "hotspot-1",
                        "type": "hotspot",
                        "position": { "desktop": { "x": 100, "y": 80, "width": 48, "height": 48 } },
                        "interactions": [
                            {
                                "id": "i1",
                                "trigger": "click",
                                "effect": {
                                    "id": "fx1",
                                    "type": "spotlight",
                                    "duration": 1000,
                                    "parameters": { "intensity": 40 }
                                }
                            }
                        ]
                    }
                ]
            },
            { "id": "s2", "backgroundColor": "#ffffff" }
        ]
    }"##;

    #[test]
    fn load_deck() {
        let deck = SlideDeck::from_json(DECK).unwrap();

        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[1].background_color, ecolor::Color32::WHITE);
        let (slide_index, element) = deck.element("hotspot-1").unwrap();
        assert_eq!(slide_index, 0);
        assert_eq!(element.interactions.len(), 1);
        assert_eq!(element.interactions[0].effect.duration, 1000);
    }

    #[test]
    fn duplicate_element_ids_are_rejected() {
        let mut deck = SlideDeck::from_json(DECK).unwrap();
        let copy = deck.slides[0].elements[0].clone();
        deck.slides[1].elements.push(copy);

        let error = deck.validate().unwrap_err();
        assert!(matches!(
            error,
            DeckError::DuplicateElementId { first: 0, second: 1, .. }
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            SlideDeck::from_json("{ \"slides\": 3 }"),
            Err(DeckError::Json(_))
        ));
    }

    #[test]
    fn replace_element_swaps_whole_value() {
        let mut deck = SlideDeck::from_json(DECK).unwrap();
        let moved = SlideElement::new(
            "hotspot-1",
            ElementType::Hotspot,
            ResponsivePosition::uniform(FixedPosition::new(1.0, 1.0, 10.0, 10.0)),
        );

        let old = deck.replace_element(moved.clone()).unwrap();
        assert_eq!(old.interactions.len(), 1);
        assert_eq!(deck.element("hotspot-1").unwrap().1, &moved);
        assert!(deck
            .replace_element(SlideElement::new(
                "missing",
                ElementType::Shape,
                ResponsivePosition::default()
            ))
            .is_none());
    }
}
