//! # QuiltKit
//!
//! A brick-pattern quilt generator:
//! - Brick-offset grids with per-row width and height variation
//! - Diagonal and angled splits of single cells
//! - Adjacency-aware weighted coloring
//! - Miter-joint seam allowances with bevel fallback
//!
//! ## Architecture
//!
//! QuiltKit is organized as a workspace with multiple crates:
//!
//! 1. **quiltkit-core** - Geometry primitives and the shared error type
//! 2. **quiltkit-patterns** - Layout, splitting, coloring, seam offset, nesting, pattern files
//! 3. **quiltkit-settings** - Configuration files
//! 4. **quiltkit** - Command-line binary tying the crates together

pub use quiltkit_core::{BoundingBox, Error, GeometryError, Point, Polygon, Result};
pub use quiltkit_patterns::{
    apply_seam_allowance, assign_colors, offset_polygon, split_rectangle, CancelToken, CutLayout,
    Nester, NestingOutcome, NestingProgress, NestingRequest, ParameterError, Pattern, PatternError,
    PatternFile, PatternMaker, PatternParameters, Piece, PiecePosition, SheetSpec, ShelfNester,
};
pub use quiltkit_settings::{default_config_path, Config};

use anyhow::Context;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging on stderr so stdout stays free for results.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Generates a pattern from `config` and writes it as a pattern file.
pub fn generate_to_file(config: &Config, output: &Path) -> anyhow::Result<PatternFile> {
    config.validate().context("Invalid configuration")?;

    let pattern = PatternMaker::new(config.pattern.clone()).generate();
    let cut = pattern.cut_layout();
    info!(
        pieces = pattern.pieces.len(),
        triangles = pattern.triangle_count(),
        width = pattern.width(),
        height = pattern.height(),
        cut_width = cut.bounds.width(),
        cut_height = cut.bounds.height(),
        "Prepared cut layout"
    );
    for (color, count) in pattern.color_counts() {
        debug!(color, count, "Color usage");
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let file = PatternFile::new(
        config.output.pattern_name.clone(),
        &pattern,
        config.active_palette(),
    );
    file.save_to_file(output)?;
    Ok(file)
}

/// Nests the seam-allowance cut pieces of `pattern` on the configured sheet.
pub async fn nest_pattern(pattern: &Pattern, sheet: SheetSpec) -> anyhow::Result<NestingOutcome> {
    let cut = pattern.cut_layout();
    let request = NestingRequest::from_pieces(&cut.cut_lines, sheet);
    let (tx, mut rx) = mpsc::unbounded_channel::<NestingProgress>();

    let reporter = tokio::spawn(async move {
        while let Some(progress) = rx.recv().await {
            debug!(
                color = ?progress.color,
                percent = progress.fraction() * 100.0,
                "Nesting progress"
            );
        }
    });

    let outcome = ShelfNester.nest(&request, tx, CancelToken::new()).await?;
    reporter.await.context("Progress reporter failed")?;
    Ok(outcome)
}
