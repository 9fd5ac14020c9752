//! # DZI Assembler
//!
//! Rebuilds full-resolution layer images from a deep-zoom style tiled pyramid.
//!
//! Each `.dzi` descriptor in an event directory names the full size of one
//! image and, per resolution layer, a grid of tile references. The assembler
//! stitches each layer's tiles back into a single RGBA image, crops it to the
//! layer's expected size and writes `<output>/<group>/layer_<n>.png`.
//!
//! ## Architecture
//!
//! - [`descriptor`] - descriptor grammar, [`PyramidDescriptor`] and the sparse [`TileGrid`]
//! - [`compose`] - [`LayerCompositor`], tile sources and output layout
//! - [`assemble`] - the [`Assembler`] orchestrator and the layer scale convention
//! - [`config`] - CLI configuration
//!
//! ## Example
//!
//! ```rust,no_run
//! use dzi_assembler::{AssembleOptions, Assembler};
//!
//! #[tokio::main]
//! async fn main() {
//!     let options = AssembleOptions::new("event").with_lower_layers(false);
//!     let assembler = Assembler::from_dirs(options, "event/tex", "event/dist");
//!
//!     match assembler.run().await {
//!         Ok(summary) => println!("{} layer(s) written", summary.written()),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

pub mod assemble;
pub mod compose;
pub mod config;
pub mod descriptor;
pub mod error;

// Re-export commonly used types
pub use assemble::{
    layer_scale_factor, target_dimensions, AssembleOptions, Assembler, LayerReport, LayerStatus,
    RunSummary,
};
pub use compose::{
    CompositionTarget, FsTileSource, LayerCompositor, OutputLayout, TileSource, TILE_EXTENSION,
};
pub use config::{Config, SummaryFormat};
pub use descriptor::{
    parse_descriptor, Layer, PyramidDescriptor, TileCell, TileGrid, DESCRIPTOR_EXTENSION,
};
pub use error::{AssembleError, ComposeError, DescriptorError};

/// Run the full pipeline for a validated [`Config`].
pub async fn run(config: &Config) -> Result<RunSummary, AssembleError> {
    Assembler::from_dirs(
        config.assemble_options(),
        config.resolved_tex_dir(),
        config.resolved_output_dir(),
    )
    .run()
    .await
}
