//! Output layout and PNG persistence for composed layers.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::ComposeError;

/// Output file layout: `<root>/<group>/layer_<index>.png`.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every layer of `group`.
    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.root.join(group)
    }

    /// Path of one layer image.
    pub fn layer_path(&self, group: &str, layer_index: usize) -> PathBuf {
        self.group_dir(group).join(format!("layer_{layer_index}.png"))
    }
}

/// Encode `image` as PNG.
pub fn encode_png(image: &RgbaImage, path: &Path) -> Result<Vec<u8>, ComposeError> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| ComposeError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(buf)
}

/// Encode `image` and write it to `path`, creating parent directories.
pub async fn write_png(image: &RgbaImage, path: &Path) -> Result<(), ComposeError> {
    let encoded = encode_png(image, path)?;

    let write_err = |e: std::io::Error| ComposeError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(path, encoded).await.map_err(write_err)
}
