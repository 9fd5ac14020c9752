//! Pyramid descriptor files.
//!
//! A descriptor declares the full-resolution size of one image and a tile
//! grid per resolution layer. See [`parser`] for the line grammar.

mod grid;
pub mod parser;

pub use grid::{TileCell, TileGrid};
pub use parser::{
    group_name, is_descriptor_path, parse_descriptor, parse_descriptor_str, Layer,
    PyramidDescriptor, DESCRIPTOR_EXTENSION,
};
