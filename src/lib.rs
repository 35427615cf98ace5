//! Ray-cast first-person maze for a low-resolution flip-dot style display.
//!
//! The core is [`viewpoint::Viewpoint::advance`] (collision-aware movement)
//! and [`renderer::Renderer::cast_and_draw`] (per-column DDA ray casting into
//! an abstract [`renderer::Color`] buffer). [`display`] turns that buffer into
//! window pixels.

pub mod config;
pub mod display;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod viewpoint;

pub use config::Config;
pub use grid::Grid;
pub use input::{Key, Keyboard};
pub use renderer::{Color, Palette, Renderer};
pub use viewpoint::{Speeds, Viewpoint};
