//! Pointer gesture classification.
//!
//! Mouse and touch input go through the same state machine and the same
//! thresholds:
//!
//! ```text
//! Idle --press--> Pressed --moved past threshold--> Dragging --release--> Idle (drag end)
//!                    |
//!                    +--release--> Idle (tap, double tap or held)
//! ```
//!
//! Only one gesture is tracked at a time. A press from a second pointer
//! while a gesture is active is dropped, and events from any pointer
//! other than the one that started the gesture are ignored.

use std::time::Duration;

use emath::{Pos2, Vec2};
use islide_layout::dragged_position;
use islide_model::{position::FixedPosition, ElementId};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

pub type PointerId = u64;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Deserialize, Serialize, SmartDefault, Debug, Clone, Copy, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GestureConfig {
    /// Distance in pixels a press has to travel before it becomes a drag.
    /// The same value applies to mouse and touch.
    #[default = 60.0]
    pub drag_threshold: f32,
    /// Presses held this long or longer are never taps
    #[default = 300]
    pub tap_max_duration_ms: u64,
    /// Two taps on the same element closer together than this are a
    /// double tap
    #[default = 300]
    pub double_tap_window_ms: u64,
}

impl GestureConfig {
    pub const fn tap_max_duration(&self) -> Duration {
        Duration::from_millis(self.tap_max_duration_ms)
    }

    pub const fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }
}

/// State of the one press-to-release sequence being tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGesture {
    pub pointer: PointerId,
    pub kind: PointerKind,
    pub element_id: ElementId,
    pub start_point: Pos2,
    /// Where the element was when it was picked up
    pub start_rect: FixedPosition,
    pub start_time: Duration,
    pub has_crossed_threshold: bool,
}

impl ActiveGesture {
    fn candidate(&self, point: Pos2) -> FixedPosition {
        dragged_position(self.start_rect, point - self.start_point)
    }

    fn offset(&self, point: Pos2) -> Vec2 {
        point - self.start_point
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureUpdate {
    /// The event did not belong to the active gesture
    Ignored,
    /// Still within the drag threshold
    Pending,
    /// The threshold was crossed by this move. Default scrolling and
    /// text selection should be suppressed until release.
    DragStarted {
        element_id: ElementId,
        candidate: FixedPosition,
    },
    Dragging {
        element_id: ElementId,
        candidate: FixedPosition,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    Tap {
        element_id: ElementId,
        kind: PointerKind,
    },
    DoubleTap {
        element_id: ElementId,
        kind: PointerKind,
    },
    /// The element was dragged, `candidate` is its unclamped final spot
    DragEnd {
        element_id: ElementId,
        kind: PointerKind,
        candidate: FixedPosition,
    },
    /// Stayed inside the threshold but for too long to be a tap
    Held {
        element_id: ElementId,
        kind: PointerKind,
        duration: Duration,
    },
}

impl GestureOutcome {
    pub fn element_id(&self) -> &ElementId {
        match self {
            Self::Tap { element_id, .. }
            | Self::DoubleTap { element_id, .. }
            | Self::DragEnd { element_id, .. }
            | Self::Held { element_id, .. } => element_id,
        }
    }

    pub const fn kind(&self) -> PointerKind {
        match self {
            Self::Tap { kind, .. }
            | Self::DoubleTap { kind, .. }
            | Self::DragEnd { kind, .. }
            | Self::Held { kind, .. } => *kind,
        }
    }
}

#[derive(Debug, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
    active: Option<ActiveGesture>,
    last_tap: Option<(ElementId, Duration)>,
}

impl GestureClassifier {
    /// Builds a classifier, falling back to the default drag threshold
    /// when the configured one is negative or not a number
    pub fn new(mut config: GestureConfig) -> Self {
        if !config.drag_threshold.is_finite() || config.drag_threshold < 0.0 {
            tracing::warn!(
                threshold = config.drag_threshold,
                "Ignoring invalid drag threshold"
            );
            config.drag_threshold = GestureConfig::default().drag_threshold;
        }
        Self {
            config,
            active: None,
            last_tap: None,
        }
    }

    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub const fn active(&self) -> Option<&ActiveGesture> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|gesture| gesture.has_crossed_threshold)
    }

    /// Starts tracking a press on `element_id`, whose current rectangle
    /// is `start_rect`. Returns `false` when the press was dropped
    /// because another gesture is already active.
    pub fn press(
        &mut self,
        pointer: PointerId,
        kind: PointerKind,
        element_id: ElementId,
        point: Pos2,
        start_rect: FixedPosition,
        now: Duration,
    ) -> bool {
        if let Some(active) = &self.active {
            tracing::debug!(
                pointer,
                active_pointer = active.pointer,
                "Dropping press while another gesture is active"
            );
            return false;
        }

        tracing::trace!(pointer, ?kind, element = %element_id, "Gesture pressed");
        self.active = Some(ActiveGesture {
            pointer,
            kind,
            element_id,
            start_point: point,
            start_rect,
            start_time: now,
            has_crossed_threshold: false,
        });
        true
    }

    pub fn move_to(&mut self, pointer: PointerId, point: Pos2) -> GestureUpdate {
        let threshold = self.config.drag_threshold;
        let Some(gesture) = self.active.as_mut().filter(|g| g.pointer == pointer) else {
            return GestureUpdate::Ignored;
        };

        let candidate = gesture.candidate(point);
        if gesture.has_crossed_threshold {
            GestureUpdate::Dragging {
                element_id: gesture.element_id.clone(),
                candidate,
            }
        } else if gesture.offset(point).length() > threshold {
            gesture.has_crossed_threshold = true;
            tracing::debug!(element = %gesture.element_id, "Drag started");
            GestureUpdate::DragStarted {
                element_id: gesture.element_id.clone(),
                candidate,
            }
        } else {
            GestureUpdate::Pending
        }
    }

    /// Ends the gesture of `pointer` and classifies it. Releases from
    /// other pointers, or after the gesture was cancelled, yield `None`.
    pub fn release(
        &mut self,
        pointer: PointerId,
        point: Pos2,
        now: Duration,
    ) -> Option<GestureOutcome> {
        if self.active.as_ref().is_none_or(|g| g.pointer != pointer) {
            tracing::trace!(pointer, "Stale release ignored");
            return None;
        }
        let gesture = self.active.take()?;

        let crossed = gesture.has_crossed_threshold
            || gesture.offset(point).length() > self.config.drag_threshold;
        let held_for = now.saturating_sub(gesture.start_time);
        let ActiveGesture {
            kind, element_id, ..
        } = gesture.clone();

        let outcome = if crossed {
            self.last_tap = None;
            GestureOutcome::DragEnd {
                element_id,
                kind,
                candidate: gesture.candidate(point),
            }
        } else if held_for >= self.config.tap_max_duration() {
            self.last_tap = None;
            GestureOutcome::Held {
                element_id,
                kind,
                duration: held_for,
            }
        } else {
            let double = self.last_tap.take().is_some_and(|(last_element, at)| {
                last_element == element_id
                    && now.saturating_sub(at) < self.config.double_tap_window()
            });
            if double {
                GestureOutcome::DoubleTap { element_id, kind }
            } else {
                self.last_tap = Some((element_id.clone(), now));
                GestureOutcome::Tap { element_id, kind }
            }
        };

        tracing::debug!(?outcome, "Gesture classified");
        Some(outcome)
    }

    /// Drops the active gesture without classifying it, e.g. when the
    /// window loses focus
    pub fn cancel(&mut self) -> Option<ActiveGesture> {
        let cancelled = self.active.take();
        if let Some(gesture) = &cancelled {
            tracing::debug!(element = %gesture.element_id, "Gesture cancelled");
        }
        cancelled
    }
}
