//! Rendering boundary
//!
//! Renderers receive a borrowed `RenderFrame` after every update and must
//! not mutate the simulation. Drawing back ends live outside this crate;
//! `LogRenderer` is the headless one used by the demo binary and tests.

pub mod frame;
pub mod headless;

pub use frame::{RenderFrame, RenderItem, shake_offset, wall_level_label};
pub use headless::LogRenderer;

/// Consumer of per-frame snapshots
pub trait Renderer {
    fn draw(&mut self, frame: &RenderFrame<'_>);
}
