//! Layer composition.
//!
//! # Components
//!
//! - [`LayerCompositor`]: stitches one tile grid into a cropped RGBA image
//! - [`TileSource`]: where tile bytes come from ([`FsTileSource`] on disk)
//! - [`OutputLayout`]: maps `(group, layer)` to an output PNG path

mod compositor;
mod output;
mod source;

pub use compositor::{crop_dimensions, CompositionTarget, LayerCompositor};
pub use output::{encode_png, write_png, OutputLayout};
pub use source::{FsTileSource, TileSource, TILE_EXTENSION};
