use islide_layout::resolve_position;
use islide_model::{
    interaction::{ElementInteraction, Trigger},
    position::{DeviceClass, ResponsivePosition},
    slide::SlideElement,
    ElementId,
};

use crate::{
    cue::{EffectCue, ResolvedEffect},
    gesture::{GestureOutcome, PointerKind},
};

/// The interaction `trigger` fires on `element`: the first one bound to
/// it in authoring order.
pub fn resolve_interaction(element: &SlideElement, trigger: Trigger) -> Option<&ElementInteraction> {
    element.interaction_for(trigger)
}

/// Resolves what happens when `trigger` is observed on `element`.
/// `None` means nothing is bound to it, which is not an error.
pub fn resolve_effect(
    element: &SlideElement,
    trigger: Trigger,
    device_class: DeviceClass,
) -> Option<EffectCue> {
    let interaction = resolve_interaction(element, trigger)?;
    Some(cue_for(
        &element.id,
        &element.position,
        interaction,
        device_class,
        None,
    ))
}

pub(crate) fn cue_for(
    element_id: &ElementId,
    position: &ResponsivePosition,
    interaction: &ElementInteraction,
    device_class: DeviceClass,
    step: Option<u32>,
) -> EffectCue {
    let rect = resolve_position(position, device_class);
    EffectCue {
        element_id: element_id.clone(),
        interaction_id: interaction.id.clone(),
        trigger: interaction.trigger,
        step,
        effect: ResolvedEffect::new(&interaction.effect, rect),
    }
}

/// Trigger a finished gesture stands for while presenting.
/// Drags are never interactions.
pub fn trigger_for_outcome(outcome: &GestureOutcome) -> Option<Trigger> {
    match outcome {
        GestureOutcome::Tap { .. } => Some(Trigger::Click),
        GestureOutcome::DoubleTap { .. } => Some(Trigger::DoubleClick),
        GestureOutcome::Held { .. } => Some(Trigger::LongPress),
        GestureOutcome::DragEnd { .. } => None,
    }
}

/// Triggers raised by the raw pointer, on top of the classified gesture
pub const fn touch_trigger_on_press(kind: PointerKind) -> Option<Trigger> {
    match kind {
        PointerKind::Touch => Some(Trigger::TouchStart),
        PointerKind::Mouse => None,
    }
}

pub fn touch_trigger_on_release(outcome: &GestureOutcome) -> Option<Trigger> {
    match outcome {
        GestureOutcome::DragEnd { .. } => None,
        other if other.kind() == PointerKind::Touch => Some(Trigger::TouchEnd),
        _ => None,
    }
}
