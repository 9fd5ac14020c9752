//! Layer scale convention.
//!
//! Layer 1 is native resolution. Layer 0 is stored at double scale, and each
//! layer after 1 halves the previous one. The tile sets are produced with
//! this numbering, so the formula must stay exactly `0.5^(i-1)`.

use crate::compose::CompositionTarget;

/// Base of the per-layer scale factor.
pub const LAYER_SCALE_BASE: f64 = 0.5;

/// Index of the native-resolution layer.
pub const NATIVE_LAYER_INDEX: usize = 1;

/// Scale factor of layer `index` relative to the descriptor's full size.
pub fn layer_scale_factor(index: usize) -> f64 {
    LAYER_SCALE_BASE.powi(index as i32 - NATIVE_LAYER_INDEX as i32)
}

/// Target output size of layer `index`, rounded to the nearest pixel.
pub fn target_dimensions(width: u32, height: u32, index: usize) -> (u32, u32) {
    let scale = layer_scale_factor(index);
    (
        (width as f64 * scale).round() as u32,
        (height as f64 * scale).round() as u32,
    )
}

/// Whether layer `index` is composed. Layers 0 and 1 always are.
pub fn should_process_layer(index: usize, enable_lower_layers: bool) -> bool {
    index <= NATIVE_LAYER_INDEX || enable_lower_layers
}

/// Build the composition target for one layer of `group`.
pub fn composition_target(group: &str, width: u32, height: u32, index: usize) -> CompositionTarget {
    let (width, height) = target_dimensions(width, height, index);
    CompositionTarget {
        group: group.to_string(),
        layer_index: index,
        width,
        height,
    }
}
