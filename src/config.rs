//! Command-line configuration for the DZI assembler.
//!
//! # Example
//!
//! ```text
//! dzi-assembler --event-dir event --tex-dir tex --output-dir dist --enable-lower-layers false
//! ```
//!
//! `--tex-dir` and `--output-dir` are resolved against `--event-dir` when
//! relative, so the example reads tiles from `event/tex` and writes
//! `event/dist/<group>/layer_<n>.png`.

use std::path::{Component, Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};

use crate::assemble::AssembleOptions;

/// Format of the summary printed after a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// JSON document
    Json,
}

/// DZI Assembler - rebuild full layer images from a tiled pyramid.
///
/// Reads every `.dzi` descriptor in the event directory and stitches each
/// layer's tiles into `<output-dir>/<group>/layer_<n>.png`. The output
/// directory is deleted and rebuilt on every run.
#[derive(Parser, Debug, Clone)]
#[command(name = "dzi-assembler")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Directory containing the `.dzi` descriptor files.
    #[arg(short, long)]
    pub event_dir: PathBuf,

    /// Directory containing the PNG tiles (relative to the event directory).
    #[arg(short, long)]
    pub tex_dir: PathBuf,

    /// Directory to write composed layers to (relative to the event directory).
    ///
    /// WARNING: this directory is removed before every run.
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Compose layers past index 1 (`true` or `false`).
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub enable_lower_layers: bool,

    /// Parse descriptors and report targets without touching the output directory.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Format of the run summary.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub summary: SummaryFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Tile directory, resolved against the event directory.
    pub fn resolved_tex_dir(&self) -> PathBuf {
        self.event_dir.join(&self.tex_dir)
    }

    /// Output directory, resolved against the event directory.
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.event_dir.join(&self.output_dir)
    }

    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.event_dir.as_os_str().is_empty() {
            return Err("Event directory is required. Set --event-dir".to_string());
        }
        if self.tex_dir.as_os_str().is_empty() {
            return Err("Tile directory is required. Set --tex-dir".to_string());
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err("Output directory is required. Set --output-dir".to_string());
        }

        // The output tree is deleted on every run
        let output = normalize_path(&self.resolved_output_dir());
        let event = normalize_path(&self.event_dir);
        let tex = normalize_path(&self.resolved_tex_dir());
        if event.starts_with(&output) || tex.starts_with(&output) {
            return Err(format!(
                "Output directory {:?} must not be or contain the event and tile directories",
                output
            ));
        }

        Ok(())
    }

    /// Orchestrator options for this configuration.
    pub fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions::new(&self.event_dir)
            .with_lower_layers(self.enable_lower_layers)
            .with_dry_run(self.dry_run)
    }
}

/// Absolute form of `path` with `.` and `..` resolved and symlinks in its
/// existing prefix followed. The path itself does not need to exist.
fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other.as_os_str()),
        }
    }

    let mut existing = lexical.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = std::fs::canonicalize(existing).unwrap_or_else(|_| existing.to_path_buf());
    for name in missing.iter().rev() {
        resolved.push(name);
    }
    resolved
}

// =============================================================================
// Tests
// =============================================================================
