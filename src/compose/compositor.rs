//! Layer compositor.
//!
//! Stitches one layer's tile grid into a single RGBA image:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       compose()                              │
//! │  1. Empty grid?  -> no-op                                    │
//! │  2. Probe tile size from cell [0][0]                         │
//! │  3. Allocate transparent canvas (cols*tw x rows*th)          │
//! │  4. Decode each present tile, place at (col*tw, row*th)      │
//! │  5. Crop top-left to min(target, canvas) per axis            │
//! │  6. Write <root>/<group>/layer_<index>.png                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::io::Cursor;
use std::path::PathBuf;

use image::{imageops, ImageReader, Rgba, RgbaImage};
use tracing::{debug, info};

use crate::descriptor::{TileCell, TileGrid};
use crate::error::ComposeError;

use super::output::{write_png, OutputLayout};
use super::source::TileSource;

// =============================================================================
// Composition Target
// =============================================================================

/// Where and how large one composed layer should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionTarget {
    /// Group the layer belongs to (descriptor file stem)
    pub group: String,

    /// Layer index within the descriptor
    pub layer_index: usize,

    /// Upper bound on the output width
    pub width: u32,

    /// Upper bound on the output height
    pub height: u32,
}

/// Final output size: the canvas cropped to the target on each axis.
///
/// The target only ever shrinks the canvas; it never enlarges it.
pub fn crop_dimensions(canvas: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    (canvas.0.min(target.0), canvas.1.min(target.1))
}

// =============================================================================
// Layer Compositor
// =============================================================================

/// Composes layer images from tiles read through a [`TileSource`].
pub struct LayerCompositor<S> {
    source: S,
    output: OutputLayout,
}

impl<S: TileSource> LayerCompositor<S> {
    pub fn new(source: S, output: OutputLayout) -> Self {
        Self { source, output }
    }

    pub fn output(&self) -> &OutputLayout {
        &self.output
    }

    /// Compose, crop and write one layer.
    ///
    /// Returns the written path, or `None` when the grid is empty.
    pub async fn compose(
        &self,
        grid: &TileGrid,
        target: &CompositionTarget,
    ) -> Result<Option<PathBuf>, ComposeError> {
        let Some(canvas) = self.render(grid, target).await? else {
            debug!(
                "Layer {} of group '{}' has an empty grid, nothing to compose",
                target.layer_index, target.group
            );
            return Ok(None);
        };

        let (width, height) = crop_dimensions(canvas.dimensions(), (target.width, target.height));
        let cropped = imageops::crop_imm(&canvas, 0, 0, width, height).to_image();

        let path = self.output.layer_path(&target.group, target.layer_index);
        write_png(&cropped, &path).await?;

        info!(
            "Composed layer_{} for group {} ({}x{}) -> {:?}",
            target.layer_index, target.group, width, height, path
        );
        Ok(Some(path))
    }

    /// Build the uncropped canvas for `grid`, or `None` if the grid is empty.
    pub async fn render(
        &self,
        grid: &TileGrid,
        target: &CompositionTarget,
    ) -> Result<Option<RgbaImage>, ComposeError> {
        if grid.is_empty() {
            return Ok(None);
        }

        let (tile_width, tile_height) = self.probe_tile_size(grid, target).await?;

        let rows = grid.rows();
        let cols = grid.cols();
        let too_large = || ComposeError::CanvasTooLarge {
            group: target.group.clone(),
            layer: target.layer_index,
            cols,
            rows,
            tile_width,
            tile_height,
        };
        let canvas_width = u32::try_from(cols)
            .ok()
            .and_then(|c| c.checked_mul(tile_width))
            .ok_or_else(too_large)?;
        let canvas_height = u32::try_from(rows)
            .ok()
            .and_then(|r| r.checked_mul(tile_height))
            .ok_or_else(too_large)?;

        let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, Rgba([0, 0, 0, 0]));

        for (row, col, reference) in grid.tiles() {
            let tile = self.load_tile(reference).await?;
            let x = col as i64 * tile_width as i64;
            let y = row as i64 * tile_height as i64;
            imageops::replace(&mut canvas, &tile, x, y);
        }

        Ok(Some(canvas))
    }

    /// Tile pixel size, read from the header of the tile at `[0][0]`.
    async fn probe_tile_size(
        &self,
        grid: &TileGrid,
        target: &CompositionTarget,
    ) -> Result<(u32, u32), ComposeError> {
        let reference = match grid.get(0, 0) {
            Some(TileCell::Present(reference)) => reference,
            _ => {
                return Err(ComposeError::MissingFirstTile {
                    group: target.group.clone(),
                    layer: target.layer_index,
                })
            }
        };

        let path = self.source.locate(reference);
        let data = self.source.read(reference).await?;

        let decode_err = |message: String| ComposeError::TileDecode {
            path: path.clone(),
            message,
        };
        let (width, height) = ImageReader::new(Cursor::new(&data[..]))
            .with_guessed_format()
            .map_err(|e| decode_err(e.to_string()))?
            .into_dimensions()
            .map_err(|e| decode_err(e.to_string()))?;

        if width == 0 || height == 0 {
            return Err(decode_err(format!("tile has no usable size ({width}x{height})")));
        }

        Ok((width, height))
    }

    /// Read and decode a tile into RGBA.
    async fn load_tile(&self, reference: &str) -> Result<RgbaImage, ComposeError> {
        let data = self.source.read(reference).await?;

        let img = ImageReader::new(Cursor::new(&data[..]))
            .with_guessed_format()
            .map_err(|e| e.to_string())
            .and_then(|reader| reader.decode().map_err(|e| e.to_string()))
            .map_err(|message| ComposeError::TileDecode {
                path: self.source.locate(reference),
                message,
            })?;

        Ok(img.to_rgba8())
    }
}

// =============================================================================
// Tests
// =============================================================================
