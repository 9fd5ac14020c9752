//! Tile image sources.
//!
//! The compositor reads tiles through the [`TileSource`] trait so the
//! pipeline can run against the filesystem or an in-memory set of tiles.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ComposeError;

/// File extension appended to tile references, without the dot.
pub const TILE_EXTENSION: &str = "png";

/// Source of encoded tile images, addressed by descriptor tile reference.
#[async_trait]
pub trait TileSource: Send + Sync {
    /// Location of the tile named by `reference`, used in logs and errors.
    fn locate(&self, reference: &str) -> PathBuf;

    /// Read the encoded bytes of the tile named by `reference`.
    async fn read(&self, reference: &str) -> Result<Bytes, ComposeError>;
}

/// Tile source backed by a directory of PNG files.
///
/// A reference `ev01/a` resolves to `<root>/ev01/a.png`.
#[derive(Debug, Clone)]
pub struct FsTileSource {
    root: PathBuf,
}

impl FsTileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TileSource for FsTileSource {
    fn locate(&self, reference: &str) -> PathBuf {
        self.root.join(format!("{reference}.{TILE_EXTENSION}"))
    }

    async fn read(&self, reference: &str) -> Result<Bytes, ComposeError> {
        let path = self.locate(reference);
        let data = tokio::fs::read(&path)
            .await
            .map_err(|e| ComposeError::TileRead {
                path: path.clone(),
                message: e.to_string(),
            })?;
        Ok(Bytes::from(data))
    }
}
