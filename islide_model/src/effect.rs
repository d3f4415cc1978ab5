use ecolor::Color32;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smart_default::SmartDefault;

use crate::{position::FixedPosition, EffectId};

/// The closed set of effects an interaction can fire.
#[derive(
    Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    #[display("spotlight")]
    Spotlight,
    #[display("pan_zoom")]
    PanZoom,
    #[serde(alias = "text")]
    #[display("show_text")]
    ShowText,
    #[display("tooltip")]
    Tooltip,
    #[display("play_video")]
    PlayVideo,
    #[display("play_audio")]
    PlayAudio,
    #[display("quiz")]
    Quiz,
}

/// Named easing curve. Unknown names are kept so that saving a deck
/// does not lose what the author picked.
#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, PartialEq, Eq)]
#[serde(from = "smartstring::alias::String", into = "smartstring::alias::String")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    Other(smartstring::alias::String),
}

impl From<smartstring::alias::String> for Easing {
    fn from(name: smartstring::alias::String) -> Self {
        match name.as_str() {
            "linear" => Self::Linear,
            "ease-in" => Self::EaseIn,
            "ease-out" => Self::EaseOut,
            "ease-in-out" | "ease" => Self::EaseInOut,
            _ => Self::Other(name),
        }
    }
}

impl From<Easing> for smartstring::alias::String {
    fn from(easing: Easing) -> Self {
        match easing {
            Easing::Linear => "linear".into(),
            Easing::EaseIn => "ease-in".into(),
            Easing::EaseOut => "ease-out".into(),
            Easing::EaseInOut => "ease-in-out".into(),
            Easing::Other(name) => name,
        }
    }
}

/// A timed behavior fired by an interaction.
///
/// The effect type is carried by [`EffectParameters`], so a spotlight
/// can never hold quiz parameters. When authored parameters do not fit
/// the shape of their type they are replaced by that type's defaults
/// while loading.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(from = "RawSlideEffect", into = "RawSlideEffect")]
pub struct SlideEffect {
    pub id: EffectId,
    /// Milliseconds
    pub duration: u64,
    /// Milliseconds before the effect starts
    pub delay: Option<u64>,
    pub easing: Easing,
    pub parameters: EffectParameters,
}

impl SlideEffect {
    pub fn new(id: impl Into<EffectId>, duration: u64, parameters: EffectParameters) -> Self {
        Self {
            id: id.into(),
            duration,
            delay: None,
            easing: Easing::default(),
            parameters,
        }
    }

    pub fn effect_type(&self) -> EffectType {
        self.parameters.effect_type()
    }
}

#[derive(Deserialize, Serialize)]
struct RawSlideEffect {
    id: EffectId,
    #[serde(rename = "type")]
    effect_type: EffectType,
    #[serde(default)]
    duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delay: Option<f64>,
    #[serde(default)]
    easing: Easing,
    #[serde(default)]
    parameters: serde_json::Value,
}

// Negative or non-finite times from the editor become 0
fn millis(value: f64) -> u64 {
    if value.is_finite() {
        value.max(0.0).round() as u64
    } else {
        0
    }
}

impl From<RawSlideEffect> for SlideEffect {
    fn from(raw: RawSlideEffect) -> Self {
        let parameters = EffectParameters::from_value(raw.effect_type, raw.parameters);
        Self {
            id: raw.id,
            duration: millis(raw.duration),
            delay: raw.delay.map(millis),
            easing: raw.easing,
            parameters,
        }
    }
}

impl From<SlideEffect> for RawSlideEffect {
    fn from(effect: SlideEffect) -> Self {
        Self {
            id: effect.id,
            effect_type: effect.parameters.effect_type(),
            duration: effect.duration as f64,
            delay: effect.delay.map(|d| d as f64),
            easing: effect.easing,
            parameters: effect.parameters.to_value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EffectParameters {
    Spotlight(SpotlightParams),
    PanZoom(PanZoomParams),
    ShowText(ShowTextParams),
    Tooltip(TooltipParams),
    PlayVideo(PlayVideoParams),
    PlayAudio(PlayAudioParams),
    Quiz(QuizParams),
}

impl EffectParameters {
    pub fn effect_type(&self) -> EffectType {
        match self {
            Self::Spotlight(_) => EffectType::Spotlight,
            Self::PanZoom(_) => EffectType::PanZoom,
            Self::ShowText(_) => EffectType::ShowText,
            Self::Tooltip(_) => EffectType::Tooltip,
            Self::PlayVideo(_) => EffectType::PlayVideo,
            Self::PlayAudio(_) => EffectType::PlayAudio,
            Self::Quiz(_) => EffectType::Quiz,
        }
    }

    pub fn defaults_for(effect_type: EffectType) -> Self {
        match effect_type {
            EffectType::Spotlight => Self::Spotlight(Default::default()),
            EffectType::PanZoom => Self::PanZoom(Default::default()),
            EffectType::ShowText => Self::ShowText(Default::default()),
            EffectType::Tooltip => Self::Tooltip(Default::default()),
            EffectType::PlayVideo => Self::PlayVideo(Default::default()),
            EffectType::PlayAudio => Self::PlayAudio(Default::default()),
            EffectType::Quiz => Self::Quiz(Default::default()),
        }
    }

    /// Reads the parameters of `effect_type` out of loosely typed
    /// authored data. Missing fields take their defaults, and data that
    /// does not fit the shape at all yields the type's defaults.
    pub fn from_value(effect_type: EffectType, value: serde_json::Value) -> Self {
        if value.is_null() {
            return Self::defaults_for(effect_type);
        }

        fn parse<T: serde::de::DeserializeOwned>(
            effect_type: EffectType,
            value: serde_json::Value,
        ) -> Option<T> {
            serde_json::from_value(value)
                .inspect_err(|error| {
                    tracing::warn!(
                        %effect_type,
                        %error,
                        "Effect parameters do not fit their type, using defaults"
                    )
                })
                .ok()
        }

        let parsed = match effect_type {
            EffectType::Spotlight => parse(effect_type, value).map(Self::Spotlight),
            EffectType::PanZoom => parse(effect_type, value).map(Self::PanZoom),
            EffectType::ShowText => parse(effect_type, value).map(Self::ShowText),
            EffectType::Tooltip => parse(effect_type, value).map(Self::Tooltip),
            EffectType::PlayVideo => parse(effect_type, value).map(Self::PlayVideo),
            EffectType::PlayAudio => parse(effect_type, value).map(Self::PlayAudio),
            EffectType::Quiz => parse(effect_type, value).map(Self::Quiz),
        };
        parsed.unwrap_or_else(|| Self::defaults_for(effect_type))
    }

    pub fn to_value(&self) -> serde_json::Value {
        let value = match self {
            Self::Spotlight(p) => serde_json::to_value(p),
            Self::PanZoom(p) => serde_json::to_value(p),
            Self::ShowText(p) => serde_json::to_value(p),
            Self::Tooltip(p) => serde_json::to_value(p),
            Self::PlayVideo(p) => serde_json::to_value(p),
            Self::PlayAudio(p) => serde_json::to_value(p),
            Self::Quiz(p) => serde_json::to_value(p),
        };
        value.unwrap_or_default()
    }

    /// Pulls every value back into the range its type allows
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::Spotlight(mut p) => {
                p.intensity = if p.intensity.is_finite() {
                    p.intensity.clamp(0.0, 100.0)
                } else {
                    SpotlightParams::default().intensity
                };
                Self::Spotlight(p)
            }
            Self::PanZoom(mut p) => {
                p.zoom_level = if p.zoom_level.is_finite() {
                    p.zoom_level.max(1.0)
                } else {
                    PanZoomParams::default().zoom_level
                };
                Self::PanZoom(p)
            }
            Self::ShowText(mut p) => {
                if !(p.style.font_size.is_finite() && p.style.font_size > 0.0) {
                    p.style.font_size = TextOverlayStyle::default().font_size;
                }
                Self::ShowText(p)
            }
            Self::Quiz(mut p) => {
                if p.question_type == QuestionType::TrueFalse && p.choices.is_empty() {
                    p.choices = SmallVec::from_iter(["True".to_owned(), "False".to_owned()]);
                }
                Self::Quiz(p)
            }
            other @ (Self::Tooltip(_) | Self::PlayVideo(_) | Self::PlayAudio(_)) => other,
        }
    }
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpotlightShape {
    #[default]
    Circle,
    Rectangle,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SpotlightParams {
    /// `None` lights up the element itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<FixedPosition>,
    pub shape: SpotlightShape,
    /// 0 to 100
    #[default = 70.0]
    pub intensity: f32,
    #[default = true]
    pub fade_edges: bool,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PanZoomParams {
    /// `None` zooms onto the element itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_position: Option<FixedPosition>,
    #[default = 2.0]
    pub zoom_level: f32,
    /// Milliseconds spent travelling to the target, the effect's
    /// duration when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOverlayStyle {
    #[default = 16.0]
    pub font_size: f32,
    #[default(Color32::WHITE)]
    #[serde(with = "crate::color")]
    pub color: Color32,
    #[default(Color32::from_rgba_unmultiplied(0, 0, 0, 204))]
    #[serde(with = "crate::color")]
    pub background_color: Color32,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowTextParams {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<FixedPosition>,
    pub style: TextOverlayStyle,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TooltipPlacement {
    Top,
    Bottom,
    Left,
    Right,
    #[default]
    Auto,
}

#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TooltipParams {
    pub text: String,
    pub position: TooltipPlacement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoSource {
    File,
    Youtube,
    #[default]
    Url,
    Device,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VideoDisplayMode {
    Inline,
    #[default]
    Modal,
    Overlay,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayVideoParams {
    pub video_source: VideoSource,
    /// File name, YouTube id, URL or device id depending on `video_source`
    pub source: String,
    pub display_mode: VideoDisplayMode,
    #[default = true]
    pub autoplay: bool,
    #[default = true]
    pub show_controls: bool,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AudioDisplayMode {
    Background,
    Modal,
    #[default]
    MiniPlayer,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayAudioParams {
    pub audio_url: String,
    pub display_mode: AudioDisplayMode,
    #[default = true]
    pub autoplay: bool,
    #[default = true]
    pub show_controls: bool,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
    FillInTheBlank,
}

/// A quiz answer as authored or given: a choice index, a true/false
/// value or free text.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum QuizAnswer {
    Bool(bool),
    Index(usize),
    Text(String),
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizParams {
    pub question: String,
    pub question_type: QuestionType,
    pub choices: SmallVec<[String; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<QuizAnswer>,
    #[default = true]
    pub allow_multiple_attempts: bool,
}

impl QuizParams {
    fn choice_index(&self, answer: &QuizAnswer) -> Option<usize> {
        match answer {
            QuizAnswer::Index(i) => Some(*i),
            QuizAnswer::Text(text) => self
                .choices
                .iter()
                .position(|c| c.trim().eq_ignore_ascii_case(text.trim())),
            QuizAnswer::Bool(_) => None,
        }
    }

    fn truth(answer: &QuizAnswer) -> Option<bool> {
        match answer {
            QuizAnswer::Bool(b) => Some(*b),
            // Choices of a true/false question are `True`, `False`
            QuizAnswer::Index(0) => Some(true),
            QuizAnswer::Index(1) => Some(false),
            QuizAnswer::Index(_) => None,
            QuizAnswer::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
        }
    }

    /// Whether `given` matches the authored correct answer. A quiz
    /// without a correct answer accepts nothing.
    pub fn is_correct(&self, given: &QuizAnswer) -> bool {
        let Some(correct) = &self.correct_answer else {
            return false;
        };

        match self.question_type {
            QuestionType::MultipleChoice => self
                .choice_index(correct)
                .zip(self.choice_index(given))
                .is_some_and(|(a, b)| a == b),
            QuestionType::TrueFalse => Self::truth(correct)
                .zip(Self::truth(given))
                .is_some_and(|(a, b)| a == b),
            QuestionType::FillInTheBlank => match (correct, given) {
                (QuizAnswer::Text(a), QuizAnswer::Text(b)) => {
                    a.trim().to_lowercase() == b.trim().to_lowercase()
                }
                _ => false,
            },
        }
    }
}
