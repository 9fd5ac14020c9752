use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading and parsing a pyramid descriptor file.
#[derive(Debug, Clone, Error)]
pub enum DescriptorError {
    /// The descriptor file could not be read
    #[error("Failed to read descriptor {path:?}: {message}")]
    Io { path: PathBuf, message: String },

    /// The file ended before the `width,height` size line
    #[error("Descriptor {path:?} has no size line")]
    MissingSizeLine { path: PathBuf },

    /// A size or layer header line did not hold two comma-separated integers
    #[error("Descriptor {path:?} line {line}: invalid {context} '{value}'")]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        context: &'static str,
        value: String,
    },

    /// A layer header declared more rows than the file supplies
    #[error(
        "Descriptor {path:?} layer {layer}: header declares {expected} rows but only {found} remain"
    )]
    TruncatedLayer {
        path: PathBuf,
        layer: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors raised while compositing a single layer.
#[derive(Debug, Clone, Error)]
pub enum ComposeError {
    /// A tile image could not be read from its source
    #[error("Failed to read tile {path:?}: {message}")]
    TileRead { path: PathBuf, message: String },

    /// A tile image could not be decoded, or yielded no usable dimensions
    #[error("Failed to decode tile {path:?}: {message}")]
    TileDecode { path: PathBuf, message: String },

    /// The grid has no tile at row 0, column 0, so the tile size is unknown
    #[error("Layer {layer} of group '{group}' has no tile at [0][0]; cannot determine tile size")]
    MissingFirstTile { group: String, layer: usize },

    /// The composed canvas does not fit in 32-bit pixel dimensions
    #[error("Canvas for layer {layer} of group '{group}' is too large: {cols}x{rows} tiles of {tile_width}x{tile_height}")]
    CanvasTooLarge {
        group: String,
        layer: usize,
        cols: usize,
        rows: usize,
        tile_width: u32,
        tile_height: u32,
    },

    /// The cropped layer image could not be encoded
    #[error("Failed to encode {path:?}: {message}")]
    Encode { path: PathBuf, message: String },

    /// The encoded layer image could not be written
    #[error("Failed to write {path:?}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Errors that abort an assembly run.
#[derive(Debug, Clone, Error)]
pub enum AssembleError {
    /// Descriptor parsing error
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// Layer composition error
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// Filesystem error on the event or output directory
    #[error("I/O error on {path:?}: {message}")]
    Io { path: PathBuf, message: String },
}

impl AssembleError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        AssembleError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
