use std::time::Duration;

use islide_model::{
    effect::{EffectParameters, EffectType, Easing, SlideEffect},
    interaction::Trigger,
    position::FixedPosition,
    EffectId, ElementId, InteractionId,
};
use keyframe::{
    functions::{EaseIn, EaseInOut, EaseOut, Linear},
    EasingFunction,
};

/// An effect ready to be played for one element.
///
/// Position fields left empty by the author hold the element's rectangle
/// at the time the effect fired, and every parameter is within range.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEffect {
    pub id: EffectId,
    pub parameters: EffectParameters,
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl ResolvedEffect {
    pub fn new(effect: &SlideEffect, element_rect: FixedPosition) -> Self {
        let parameters = match effect.parameters.clone().normalized() {
            EffectParameters::Spotlight(mut p) => {
                p.position.get_or_insert(element_rect);
                EffectParameters::Spotlight(p)
            }
            EffectParameters::PanZoom(mut p) => {
                p.target_position.get_or_insert(element_rect);
                p.duration.get_or_insert(effect.duration);
                EffectParameters::PanZoom(p)
            }
            EffectParameters::ShowText(mut p) => {
                p.position.get_or_insert(element_rect);
                EffectParameters::ShowText(p)
            }
            other => other,
        };

        Self {
            id: effect.id.clone(),
            parameters,
            duration: Duration::from_millis(effect.duration),
            delay: Duration::from_millis(effect.delay.unwrap_or_default()),
            easing: effect.easing.clone(),
        }
    }

    pub fn effect_type(&self) -> EffectType {
        self.parameters.effect_type()
    }

    /// Eased progress in `0.0..=1.0` after the effect has been running
    /// for `elapsed`, counting its delay
    pub fn progress(&self, elapsed: Duration) -> f64 {
        let Some(running) = elapsed.checked_sub(self.delay) else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }

        let x = (running.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        match &self.easing {
            Easing::Linear => Linear.y(x),
            Easing::EaseIn => EaseIn.y(x),
            Easing::EaseOut => EaseOut.y(x),
            Easing::EaseInOut => EaseInOut.y(x),
            // Curves we have no implementation for play linearly
            Easing::Other(_) => Linear.y(x),
        }
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.delay + self.duration
    }
}

/// Handed to the renderer whenever an effect fires.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectCue {
    pub element_id: ElementId,
    pub interaction_id: InteractionId,
    pub trigger: Trigger,
    /// Timeline step number when the cue came from playback
    pub step: Option<u32>,
    pub effect: ResolvedEffect,
}

#[cfg(test)]
mod tests {
    use islide_model::effect::{PanZoomParams, QuestionType, QuizParams, SpotlightParams};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const ELEMENT: FixedPosition = FixedPosition::new(10.0, 20.0, 30.0, 40.0);

    #[test]
    fn empty_positions_take_element_rect() {
        let effect = SlideEffect::new(
            "fx",
            800,
            EffectParameters::PanZoom(PanZoomParams::default()),
        );
        let resolved = ResolvedEffect::new(&effect, ELEMENT);

        let EffectParameters::PanZoom(params) = &resolved.parameters else {
            panic!("expected pan/zoom, got {:?}", resolved.parameters);
        };
        assert_eq!(params.target_position, Some(ELEMENT));
        assert_eq!(params.duration, Some(800));
        assert_eq!(params.zoom_level, 2.0);
    }

    #[test]
    fn authored_position_is_kept_and_values_clamped() {
        let authored = FixedPosition::new(0.0, 0.0, 5.0, 5.0);
        let effect = SlideEffect::new(
            "fx",
            100,
            EffectParameters::Spotlight(SpotlightParams {
                position: Some(authored),
                intensity: 250.0,
                ..Default::default()
            }),
        );
        let resolved = ResolvedEffect::new(&effect, ELEMENT);

        assert_eq!(
            resolved.parameters,
            EffectParameters::Spotlight(SpotlightParams {
                position: Some(authored),
                intensity: 100.0,
                ..Default::default()
            })
        );
    }

    #[test]
    fn true_false_quiz_gets_choices() {
        let effect = SlideEffect::new(
            "fx",
            0,
            EffectParameters::Quiz(QuizParams {
                question_type: QuestionType::TrueFalse,
                ..Default::default()
            }),
        );
        let EffectParameters::Quiz(params) = ResolvedEffect::new(&effect, ELEMENT).parameters
        else {
            panic!("expected quiz");
        };
        assert_eq!(params.choices.as_slice(), ["True", "False"]);
    }

    #[rstest]
    #[case::before_delay(100, 0.0)]
    #[case::start(200, 0.0)]
    #[case::halfway(700, 0.5)]
    #[case::end(1200, 1.0)]
    #[case::after(5000, 1.0)]
    fn linear_progress_counts_delay(#[case] elapsed: u64, #[case] expected: f64) {
        let mut effect = SlideEffect::new(
            "fx",
            1000,
            EffectParameters::Spotlight(Default::default()),
        );
        effect.delay = Some(200);
        effect.easing = Easing::Linear;
        let resolved = ResolvedEffect::new(&effect, ELEMENT);

        let progress = resolved.progress(Duration::from_millis(elapsed));
        assert!((progress - expected).abs() < 1e-9, "{progress} != {expected}");
        assert_eq!(resolved.is_finished(Duration::from_millis(elapsed)), elapsed >= 1200);
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        let effect = SlideEffect::new("fx", 0, EffectParameters::Tooltip(Default::default()));
        let resolved = ResolvedEffect::new(&effect, ELEMENT);
        assert_eq!(resolved.progress(Duration::ZERO), 1.0);
        assert!(resolved.is_finished(Duration::ZERO));
    }

    #[test]
    fn eased_curves_stay_in_range() {
        for easing in [Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            let mut effect =
                SlideEffect::new("fx", 1000, EffectParameters::Spotlight(Default::default()));
            effect.easing = easing;
            let resolved = ResolvedEffect::new(&effect, ELEMENT);

            let mut last = 0.0;
            for ms in (0..=1000).step_by(50) {
                let progress = resolved.progress(Duration::from_millis(ms));
                assert!((-1e-6..=1.0 + 1e-6).contains(&progress));
                assert!(progress >= last - 1e-6);
                last = progress;
            }
            assert!((last - 1.0).abs() < 1e-6);
        }
    }
}
