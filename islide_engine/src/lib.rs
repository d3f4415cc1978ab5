#![warn(clippy::missing_const_for_fn)]
//! Runtime behavior of interactive slides: pointer gestures, element
//! dragging, interaction resolution and timeline playback.
//!
//! Nothing in here spawns threads or real timers. Hosts pass the current
//! time into every call that depends on it and poll sessions for
//! deadlines, so the same code runs under a real or a simulated clock.

pub mod config;
pub mod cue;
pub mod editor;
pub mod gesture;
pub mod interaction;
pub mod player;
pub mod timeline;
pub mod timer;
pub mod viewport;

pub use config::EngineConfig;
pub use cue::{EffectCue, ResolvedEffect};
pub use editor::{EditorEvent, EditorMode, EditorSession, ElementFrame};
pub use gesture::{GestureClassifier, GestureConfig, GestureOutcome, PointerId, PointerKind};
pub use interaction::{resolve_effect, resolve_interaction};
pub use player::{PlaybackState, TimelinePlayer};
pub use timeline::{derive_steps, TimelineConfig, TimelineStep};
pub use timer::Timer;
