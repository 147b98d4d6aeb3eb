//! Pseudo-3D rasterization of the cell grid.
//!
//! Cells become raised tiles on a software [`Surface`]: the more motion a cell
//! has, the higher its top face is lifted toward the upper left, exposing
//! shaded side faces and casting a shadow.

mod layout;
mod rasterizer;
mod shading;
mod surface;

pub use layout::GridLayout;
pub use rasterizer::Rasterizer;
pub use shading::ShadingTuning;
pub use surface::{Point, Rect, Surface, SurfaceError};
