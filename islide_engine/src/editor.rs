//! The controller behind one slide editor or preview.
//!
//! [`EditorSession`] owns everything that changes while the user works on
//! a deck: the deck itself, the selection, the gesture in progress, the
//! live drag preview and the viewport. Hosts forward raw pointer and
//! resize input together with the current time and get back
//! [`EditorEvent`]s to act on.

use std::time::Duration;

use emath::Pos2;
use islide_layout::{
    position_update, resolve_position, topmost_at, CanvasBounds, PositionUpdate, Viewport,
};
use islide_model::{
    interaction::Trigger,
    position::{DeviceClass, FixedPosition},
    slide::{ElementType, Slide, SlideElement},
    ElementId, SlideDeck,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    config::EngineConfig,
    cue::EffectCue,
    gesture::{GestureClassifier, GestureOutcome, GestureUpdate, PointerId, PointerKind},
    interaction::{
        resolve_effect, touch_trigger_on_press, touch_trigger_on_release, trigger_for_outcome,
    },
    viewport::ResizeDebouncer,
};

#[derive(
    Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Taps select, drags move elements
    #[default]
    Edit,
    /// Gestures fire the interactions bound to elements
    Preview,
}

/// What the renderer draws for one element this frame.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementFrame {
    pub element_id: ElementId,
    pub rect: FixedPosition,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Selected(Option<ElementId>),
    /// Double tap on a text element in edit mode, the host opens its editor
    EditRequested(ElementId),
    DragStarted(ElementId),
    /// A drag was released and written to the deck
    PositionCommitted(PositionUpdate),
    Effect(EffectCue),
    DeviceClassChanged(DeviceClass),
}

#[derive(Debug)]
pub struct EditorSession {
    deck: SlideDeck,
    config: EngineConfig,
    mode: EditorMode,
    slide_index: usize,
    selected: Option<ElementId>,
    hovered: Option<ElementId>,
    gestures: GestureClassifier,
    preview: Option<PositionUpdate>,
    viewport: Viewport,
    canvas: Option<CanvasBounds>,
    resize: ResizeDebouncer,
}

impl EditorSession {
    pub fn new(deck: SlideDeck, config: EngineConfig, viewport: Viewport) -> Self {
        Self {
            deck,
            config,
            mode: EditorMode::default(),
            slide_index: 0,
            selected: None,
            hovered: None,
            gestures: GestureClassifier::new(config.gesture),
            preview: None,
            viewport,
            canvas: None,
            resize: ResizeDebouncer::new(config.resize_debounce()),
        }
    }

    pub const fn deck(&self) -> &SlideDeck {
        &self.deck
    }

    pub fn into_deck(self) -> SlideDeck {
        self.deck
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub const fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        if self.mode != mode {
            tracing::debug!(%mode, "Editor mode changed");
            self.cancel_gesture();
            self.hovered = None;
            self.mode = mode;
        }
    }

    pub const fn slide_index(&self) -> usize {
        self.slide_index
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.deck.slides.get(self.slide_index)
    }

    /// Moves to another slide. Out of range indices are ignored.
    pub fn set_slide(&mut self, index: usize) -> bool {
        if index >= self.deck.slides.len() {
            return false;
        }
        self.cancel_gesture();
        self.selected = None;
        self.hovered = None;
        self.slide_index = index;
        true
    }

    pub const fn selected(&self) -> Option<&ElementId> {
        self.selected.as_ref()
    }

    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn device_class(&self) -> DeviceClass {
        self.viewport.device_class(&self.config.breakpoints)
    }

    /// Bounds drags are clamped to. Without them positions are only kept
    /// out of negative coordinates.
    pub fn set_canvas_bounds(&mut self, canvas: Option<CanvasBounds>) {
        self.canvas = canvas;
    }

    /// The uncommitted position of the element being dragged
    pub const fn preview(&self) -> Option<&PositionUpdate> {
        self.preview.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.gestures.is_dragging()
    }

    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        kind: PointerKind,
        point: Pos2,
        now: Duration,
    ) -> Option<EditorEvent> {
        let device_class = self.device_class();
        let Some(element) = self
            .current_slide()
            .and_then(|slide| topmost_at(&slide.elements, point, device_class))
        else {
            if self.gestures.active().is_none() && self.mode == EditorMode::Edit {
                return self.select(None);
            }
            return None;
        };

        let element_id = element.id.clone();
        let start_rect = resolve_position(&element.position, device_class);
        let touch_cue = touch_trigger_on_press(kind)
            .filter(|_| self.mode == EditorMode::Preview)
            .and_then(|trigger| resolve_effect(element, trigger, device_class));

        if !self
            .gestures
            .press(pointer, kind, element_id, point, start_rect, now)
        {
            return None;
        }
        touch_cue.map(EditorEvent::Effect)
    }

    pub fn pointer_move(&mut self, pointer: PointerId, point: Pos2) -> Option<EditorEvent> {
        if self.gestures.active().is_none() {
            return self.hover(point);
        }

        let (element_id, candidate, started) = match self.gestures.move_to(pointer, point) {
            GestureUpdate::Ignored | GestureUpdate::Pending => return None,
            GestureUpdate::DragStarted {
                element_id,
                candidate,
            } => (element_id, candidate, true),
            GestureUpdate::Dragging {
                element_id,
                candidate,
            } => (element_id, candidate, false),
        };
        if self.mode != EditorMode::Edit {
            return None;
        }

        self.preview = self.update_for(&element_id, candidate);
        started.then_some(EditorEvent::DragStarted(element_id))
    }

    pub fn pointer_up(
        &mut self,
        pointer: PointerId,
        point: Pos2,
        now: Duration,
    ) -> SmallVec<[EditorEvent; 2]> {
        let mut events = SmallVec::new();

        // Drags end anywhere on the canvas, everything else has to be
        // released over the element it started on
        let threshold = self.gestures.config().drag_threshold;
        let stray = self
            .gestures
            .active()
            .filter(|g| g.pointer == pointer)
            .is_some_and(|g| {
                if g.has_crossed_threshold || (point - g.start_point).length() > threshold {
                    !self.on_canvas(point)
                } else {
                    !g.start_rect.contains(point)
                }
            });
        if stray {
            tracing::debug!(?point, "Released off target, dropping gesture");
            self.cancel_gesture();
            return events;
        }
        let Some(outcome) = self.gestures.release(pointer, point, now) else {
            return events;
        };
        let preview = self.preview.take();

        match self.mode {
            EditorMode::Edit => match outcome {
                GestureOutcome::DragEnd {
                    element_id,
                    candidate,
                    ..
                } => {
                    let update = self.update_for(&element_id, candidate).or(preview);
                    if let Some(update) = update {
                        self.commit(&update);
                        events.push(EditorEvent::PositionCommitted(update));
                    }
                }
                GestureOutcome::Tap { element_id, .. } => {
                    events.extend(self.select(Some(element_id)));
                }
                GestureOutcome::DoubleTap { element_id, .. } => {
                    let is_text = self
                        .current_slide()
                        .and_then(|slide| slide.element(&element_id))
                        .is_some_and(|element| element.element_type == ElementType::Text);
                    events.extend(self.select(Some(element_id.clone())));
                    if is_text {
                        events.push(EditorEvent::EditRequested(element_id));
                    }
                }
                GestureOutcome::Held { .. } => {}
            },
            EditorMode::Preview => {
                let triggers = [trigger_for_outcome(&outcome), touch_trigger_on_release(&outcome)];
                for trigger in triggers.into_iter().flatten() {
                    events.extend(self.trigger(outcome.element_id(), trigger).map(EditorEvent::Effect));
                }
            }
        }
        events
    }

    /// The platform took the pointer away, the gesture is dropped
    pub fn pointer_cancel(&mut self) {
        self.cancel_gesture();
    }

    /// The window lost focus
    pub fn blur(&mut self) {
        self.cancel_gesture();
        self.hovered = None;
    }

    /// Tracks which element the mouse is over and fires hover
    /// interactions on entering one while previewing
    pub fn hover(&mut self, point: Pos2) -> Option<EditorEvent> {
        let device_class = self.device_class();
        let over = self
            .current_slide()
            .and_then(|slide| topmost_at(&slide.elements, point, device_class))
            .map(|element| element.id.clone());
        if over == self.hovered {
            return None;
        }

        self.hovered = over.clone();
        match (self.mode, over) {
            (EditorMode::Preview, Some(element_id)) => {
                self.trigger(&element_id, Trigger::Hover).map(EditorEvent::Effect)
            }
            _ => None,
        }
    }

    pub fn resize(&mut self, viewport: Viewport, now: Duration) {
        self.resize.resize(viewport, now);
    }

    /// The viewport waiting for the resize burst to settle
    pub const fn pending_viewport(&self) -> Option<Viewport> {
        self.resize.pending()
    }

    /// Tears the session down for its host: drops the gesture and any
    /// pending resize so nothing fires after the surface is gone
    pub fn close(&mut self) {
        self.cancel_gesture();
        self.resize.cancel();
        self.hovered = None;
    }

    /// Applies a resize once it settled
    pub fn poll(&mut self, now: Duration) -> Option<EditorEvent> {
        let viewport = self.resize.poll(now)?;
        let before = self.device_class();
        self.viewport = viewport;
        let after = self.device_class();
        if before == after {
            return None;
        }

        tracing::debug!(%before, %after, "Device class changed");
        self.cancel_gesture();
        Some(EditorEvent::DeviceClassChanged(after))
    }

    /// Renderer input for the visible elements of the current slide, in
    /// paint order
    pub fn frames(&self) -> Vec<ElementFrame> {
        let Some(slide) = self.current_slide() else {
            return Vec::new();
        };
        let device_class = self.device_class();

        let mut frames: Vec<(i32, ElementFrame)> = slide
            .elements
            .iter()
            .filter(|element| element.is_visible)
            .map(|element| {
                let rect = match &self.preview {
                    Some(preview) if preview.element_id == element.id => preview.rect(),
                    _ => resolve_position(&element.position, device_class),
                };
                let frame = ElementFrame {
                    element_id: element.id.clone(),
                    rect,
                    is_selected: self.selected.as_ref() == Some(&element.id),
                };
                (element.style.z_index, frame)
            })
            .collect();
        frames.sort_by_key(|(z_index, _)| *z_index);
        frames.into_iter().map(|(_, frame)| frame).collect()
    }

    /// Fires `trigger` on an element of the current slide
    pub fn trigger(&self, element_id: &str, trigger: Trigger) -> Option<EffectCue> {
        let element = self.current_slide()?.element(element_id)?;
        resolve_effect(element, trigger, self.device_class())
    }

    /// Adds an element to the current slide. Ids are unique across the
    /// deck, so an element reusing one is refused.
    pub fn add_element(&mut self, element: SlideElement) -> bool {
        if self.deck.element(&element.id).is_some() {
            tracing::warn!(element = %element.id, "Refusing to add element with a duplicate id");
            return false;
        }
        let Some(slide) = self.deck.slides.get_mut(self.slide_index) else {
            return false;
        };
        slide.elements.push(element);
        true
    }

    pub fn remove_element(&mut self, element_id: &str) -> Option<SlideElement> {
        let slide = self.deck.slides.get_mut(self.slide_index)?;
        let index = slide.element_index(element_id)?;
        let removed = slide.elements.remove(index);

        if self.selected.as_deref() == Some(element_id) {
            self.selected = None;
        }
        if self.hovered.as_deref() == Some(element_id) {
            self.hovered = None;
        }
        if self.gesture_on(element_id) {
            self.cancel_gesture();
        }
        Some(removed)
    }

    /// Swaps in a new version of an element, wherever it is in the deck
    pub fn replace_element(&mut self, element: SlideElement) -> Option<SlideElement> {
        if self.gesture_on(&element.id) {
            self.cancel_gesture();
        }
        self.deck.replace_element(element)
    }

    fn select(&mut self, element_id: Option<ElementId>) -> Option<EditorEvent> {
        if self.selected == element_id {
            return None;
        }
        tracing::debug!(element = ?element_id, "Selection changed");
        self.selected = element_id.clone();
        Some(EditorEvent::Selected(element_id))
    }

    fn update_for(&self, element_id: &str, candidate: FixedPosition) -> Option<PositionUpdate> {
        let element = self.current_slide()?.element(element_id)?;
        Some(position_update(
            element,
            self.device_class(),
            candidate,
            self.canvas,
        ))
    }

    fn commit(&mut self, update: &PositionUpdate) {
        let Some((_, element)) = self.deck.element(&update.element_id) else {
            return;
        };
        let mut element = element.clone();
        element.position = update.position;
        self.deck.replace_element(element);
        tracing::debug!(element = %update.element_id, rect = ?update.rect(), "Position committed");
    }

    fn cancel_gesture(&mut self) {
        self.gestures.cancel();
        self.preview = None;
    }

    fn gesture_on(&self, element_id: &str) -> bool {
        self.gestures
            .active()
            .is_some_and(|gesture| gesture.element_id.as_str() == element_id)
    }

    fn on_canvas(&self, point: Pos2) -> bool {
        self.canvas.is_none_or(|canvas| {
            (0.0..=canvas.width).contains(&point.x) && (0.0..=canvas.height).contains(&point.y)
        })
    }
}
