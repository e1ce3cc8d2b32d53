//! Backdrop rendering
//!
//! The scene is projected through a fixed perspective [`Camera`] and turned
//! into a backend-free [`DrawList`]. On the web the list is painted with the
//! Canvas 2D API.

pub mod camera;
pub mod palette;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use camera::{Camera, Projected};
pub use palette::Palette;
pub use shapes::{DrawCommand, DrawList, Wireframe, build_draw_list};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
