#![warn(clippy::missing_const_for_fn)]
//! Responsive geometry for slide elements: which rectangle an element
//! occupies on the current device, and how a drag rewrites it.

mod breakpoint;
mod hit;
mod mutate;

pub use breakpoint::{resolve_position, Breakpoints, Viewport};
pub use hit::topmost_at;
pub use mutate::{clamp_position, dragged_position, position_update, CanvasBounds, PositionUpdate};
