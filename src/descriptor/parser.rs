//! Line-based descriptor parser.
//!
//! # Grammar
//!
//! ```text
//! <format tag>
//! <width>,<height>
//! <cols>,<rows>          \
//! <tile>,<tile>,...      |  repeated once per layer,
//! ...  (rows lines)      /  `rows` data lines each
//! ```
//!
//! Tokens in data lines may be empty, marking absent tiles. Trailing blank
//! lines are ignored and both LF and CRLF line endings are accepted.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::DescriptorError;

use super::grid::TileGrid;

/// File extension of descriptor files, without the dot.
pub const DESCRIPTOR_EXTENSION: &str = "dzi";

// =============================================================================
// Data Model
// =============================================================================

/// One resolution level of a pyramid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Tile grid as written in the descriptor
    pub tiles: TileGrid,

    /// Row count declared by the layer header
    pub rows: usize,

    /// Column count declared by the layer header
    pub cols: usize,
}

impl Layer {
    /// Render the `cols,rows` header from the grid's actual shape.
    pub fn header_line(&self) -> String {
        format!("{},{}", self.tiles.cols(), self.tiles.rows())
    }
}

/// Parsed contents of one descriptor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidDescriptor {
    /// Format tag from the first line, kept verbatim
    pub format: String,

    /// Full-resolution width in pixels
    pub width: u32,

    /// Full-resolution height in pixels
    pub height: u32,

    /// Layers in declaration order
    pub layers: Vec<Layer>,
}

// =============================================================================
// Parsing
// =============================================================================

/// Read and parse a descriptor file.
pub async fn parse_descriptor(path: &Path) -> Result<PyramidDescriptor, DescriptorError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DescriptorError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let descriptor = parse_descriptor_str(path, &content)?;
    debug!(
        "Parsed {:?}: {}x{}, {} layer(s)",
        path,
        descriptor.width,
        descriptor.height,
        descriptor.layers.len()
    );
    Ok(descriptor)
}

/// Parse descriptor text. `path` is used only for error context.
pub fn parse_descriptor_str(
    path: &Path,
    content: &str,
) -> Result<PyramidDescriptor, DescriptorError> {
    let lines: Vec<&str> = content.trim_end().lines().collect();

    let format = lines
        .first()
        .map(|l| l.trim().to_string())
        .ok_or_else(|| DescriptorError::MissingSizeLine {
            path: path.to_path_buf(),
        })?;

    let size_line = lines.get(1).ok_or_else(|| DescriptorError::MissingSizeLine {
        path: path.to_path_buf(),
    })?;
    let (width, height) = parse_pair::<u32>(path, 2, size_line, "size line")?;

    let mut layers = Vec::new();
    let mut cursor = 2;

    while cursor < lines.len() {
        let layer_index = layers.len();
        let (cols, rows) = parse_pair::<usize>(path, cursor + 1, lines[cursor], "layer header")?;
        cursor += 1;

        let remaining = lines.len() - cursor;
        if remaining < rows {
            return Err(DescriptorError::TruncatedLayer {
                path: path.to_path_buf(),
                layer: layer_index,
                expected: rows,
                found: remaining,
            });
        }

        let data = &lines[cursor..cursor + rows];
        cursor += rows;

        for (row, line) in data.iter().enumerate() {
            let tokens = line.split(',').count();
            if tokens != cols {
                warn!(
                    "{:?} layer {} row {}: {} token(s), header declares {} column(s)",
                    path, layer_index, row, tokens, cols
                );
            }
        }

        let tiles =
            TileGrid::from_tokens(data.iter().map(|line| line.split(',').collect::<Vec<_>>()));
        layers.push(Layer { tiles, rows, cols });
    }

    Ok(PyramidDescriptor {
        format,
        width,
        height,
        layers,
    })
}

/// Parse a `a,b` line of two integers. `line_no` is 1-based.
fn parse_pair<T: std::str::FromStr>(
    path: &Path,
    line_no: usize,
    line: &str,
    context: &'static str,
) -> Result<(T, T), DescriptorError> {
    let invalid = || DescriptorError::InvalidNumber {
        path: PathBuf::from(path),
        line: line_no,
        context,
        value: line.trim().to_string(),
    };

    let mut parts = line.split(',').map(str::trim);
    let first = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    let second = parts.next().and_then(|s| s.parse().ok()).ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok((first, second))
}

/// Group name of a descriptor: its file name with the extension stripped.
pub fn group_name(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// True if `path` carries the descriptor file extension.
pub fn is_descriptor_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(DESCRIPTOR_EXTENSION)
}

// =============================================================================
// Tests
// =============================================================================
