//! Pyramid assembly.
//!
//! The [`Assembler`] walks an event directory, parses every descriptor and
//! hands each enabled layer to the [`LayerCompositor`](crate::compose::LayerCompositor)
//! together with a target size derived by [`layer_scale_factor`].

mod orchestrator;
mod scale;

pub use orchestrator::{
    discover_descriptors, AssembleOptions, Assembler, LayerReport, LayerStatus, RunSummary,
};
pub use scale::{
    composition_target, layer_scale_factor, should_process_layer, target_dimensions,
    LAYER_SCALE_BASE, NATIVE_LAYER_INDEX,
};
