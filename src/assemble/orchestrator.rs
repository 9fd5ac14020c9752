//! Pyramid orchestrator.
//!
//! A run has two phases:
//!
//! 1. **Prepare**: remove the output directory tree if it exists.
//! 2. **Populate**: for each descriptor in the event directory (sorted by
//!    file name), parse it and compose every enabled layer.
//!
//! Any error aborts the run. Nothing is retried or skipped except non-descriptor
//! files and empty layer grids.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::compose::{FsTileSource, LayerCompositor, OutputLayout, TileSource};
use crate::descriptor::{group_name, is_descriptor_path, parse_descriptor};
use crate::error::AssembleError;

use super::scale::{composition_target, should_process_layer};

// =============================================================================
// Options and Summary
// =============================================================================

/// Settings for one assembly run.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Directory holding the descriptor files
    pub event_dir: PathBuf,

    /// Compose layers past index 1
    pub enable_lower_layers: bool,

    /// Plan only: parse and compute targets, touch nothing on disk
    pub dry_run: bool,
}

impl AssembleOptions {
    pub fn new(event_dir: impl Into<PathBuf>) -> Self {
        Self {
            event_dir: event_dir.into(),
            enable_lower_layers: true,
            dry_run: false,
        }
    }

    pub fn with_lower_layers(mut self, enabled: bool) -> Self {
        self.enable_lower_layers = enabled;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// What happened to one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerStatus {
    Written,
    Skipped,
    Empty,
    Planned,
}

/// Per-layer entry of a [`RunSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerReport {
    pub group: String,
    pub layer_index: usize,
    pub target_width: u32,
    pub target_height: u32,
    pub status: LayerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Result of a completed run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Group names in processing order
    pub groups: Vec<String>,

    /// One entry per layer visited, in processing order
    pub layers: Vec<LayerReport>,
}

impl RunSummary {
    pub fn count(&self, status: LayerStatus) -> usize {
        self.layers.iter().filter(|l| l.status == status).count()
    }

    pub fn written(&self) -> usize {
        self.count(LayerStatus::Written)
    }

    pub fn skipped(&self) -> usize {
        self.count(LayerStatus::Skipped)
    }

    /// Paths of every written layer image.
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.layers.iter().filter_map(|l| l.output.as_deref())
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Drives descriptor discovery, parsing and layer composition.
pub struct Assembler<S> {
    compositor: LayerCompositor<S>,
    options: AssembleOptions,
}

impl Assembler<FsTileSource> {
    /// Assembler reading tiles from `tex_dir` and writing under `output_dir`.
    pub fn from_dirs(
        options: AssembleOptions,
        tex_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let compositor =
            LayerCompositor::new(FsTileSource::new(tex_dir), OutputLayout::new(output_dir));
        Self::new(compositor, options)
    }
}

impl<S: TileSource> Assembler<S> {
    pub fn new(compositor: LayerCompositor<S>, options: AssembleOptions) -> Self {
        Self {
            compositor,
            options,
        }
    }

    /// Run both phases. In dry-run mode the prepare phase is skipped.
    pub async fn run(&self) -> Result<RunSummary, AssembleError> {
        if !self.options.dry_run {
            self.prepare_output().await?;
        }
        let summary = self.populate().await?;

        info!(
            "Assembled {} group(s): {} layer(s) written, {} skipped",
            summary.groups.len(),
            summary.written(),
            summary.skipped()
        );
        Ok(summary)
    }

    /// Remove the output tree. Returns `true` if something was removed.
    pub async fn prepare_output(&self) -> Result<bool, AssembleError> {
        let root = self.compositor.output().root();
        let exists = tokio::fs::try_exists(root)
            .await
            .map_err(|e| AssembleError::io(root, e))?;
        if !exists {
            return Ok(false);
        }

        tokio::fs::remove_dir_all(root)
            .await
            .map_err(|e| AssembleError::io(root, e))?;
        info!("Cleared output directory {:?}", root);
        Ok(true)
    }

    /// Compose every descriptor in the event directory.
    pub async fn populate(&self) -> Result<RunSummary, AssembleError> {
        let mut summary = RunSummary::default();
        for path in discover_descriptors(&self.options.event_dir).await? {
            self.assemble_descriptor(&path, &mut summary).await?;
        }
        Ok(summary)
    }

    async fn assemble_descriptor(
        &self,
        path: &Path,
        summary: &mut RunSummary,
    ) -> Result<(), AssembleError> {
        let Some(group) = group_name(path) else {
            return Ok(());
        };
        info!("Handling {} ...", group);

        let descriptor = parse_descriptor(path).await?;
        summary.groups.push(group.clone());

        for (index, layer) in descriptor.layers.iter().enumerate() {
            let target = composition_target(&group, descriptor.width, descriptor.height, index);
            let mut report = LayerReport {
                group: group.clone(),
                layer_index: index,
                target_width: target.width,
                target_height: target.height,
                status: LayerStatus::Planned,
                output: None,
            };

            if !should_process_layer(index, self.options.enable_lower_layers) {
                info!("Skipping layer_{} due to config", index);
                report.status = LayerStatus::Skipped;
            } else if self.options.dry_run {
                info!(
                    "[dry run] layer_{} of {}: {} tile(s), target {}x{}",
                    index,
                    group,
                    layer.tiles.tile_count(),
                    target.width,
                    target.height
                );
            } else {
                match self.compositor.compose(&layer.tiles, &target).await? {
                    Some(output) => {
                        report.status = LayerStatus::Written;
                        report.output = Some(output);
                    }
                    None => report.status = LayerStatus::Empty,
                }
            }

            summary.layers.push(report);
        }

        Ok(())
    }
}

/// Descriptor files directly inside `dir`, sorted by path.
pub async fn discover_descriptors(dir: &Path) -> Result<Vec<PathBuf>, AssembleError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| AssembleError::io(dir, e))?;

    let mut found = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AssembleError::io(dir, e))?
    {
        let path = entry.path();
        if !is_descriptor_path(&path) {
            continue;
        }
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| AssembleError::io(&path, e))?;
        if metadata.is_file() {
            found.push(path);
        }
    }

    found.sort();
    debug!("Found {} descriptor(s) in {:?}", found.len(), dir);
    Ok(found)
}

// =============================================================================
// Tests
// =============================================================================
