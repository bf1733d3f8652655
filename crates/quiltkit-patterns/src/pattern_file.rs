//! Saved pattern files.
//!
//! A pattern is saved as a versioned JSON bundle holding the parameters, the
//! palette, the materialized pieces and their bounds. Loading a file resumes
//! from the stored pieces; nothing is regenerated.

use crate::error::{PatternError, PatternResult};
use crate::layout::Pattern;
use crate::params::PatternParameters;
use crate::piece::Piece;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quiltkit_core::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Pattern file format version
pub const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete pattern file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFile {
    pub version: String,
    pub metadata: PatternMetadata,
    pub params: PatternParameters,
    /// Colors indexed by piece color labels, as CSS color strings
    #[serde(default)]
    pub palette: Vec<String>,
    pub pieces: Vec<Piece>,
    pub bounds: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMetadata {
    pub id: Uuid,
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

impl PatternFile {
    /// Bundles a generated pattern with its palette.
    pub fn new(name: impl Into<String>, pattern: &Pattern, palette: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: PatternMetadata {
                id: Uuid::new_v4(),
                name: name.into(),
                created: now,
                modified: now,
                description: String::new(),
            },
            params: pattern.params.clone(),
            palette,
            pieces: pattern.pieces.clone(),
            bounds: pattern.bounds,
        }
    }

    /// Writes the file as pretty JSON.
    pub fn write_to<W: Write>(&self, mut writer: W) -> PatternResult<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reads a pattern file and checks it with [`PatternFile::check`].
    pub fn read_from<R: Read>(mut reader: R) -> PatternResult<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let file: PatternFile = serde_json::from_str(&content)?;
        file.check()?;
        Ok(file)
    }

    /// Save pattern to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).context("Failed to write pattern file")?;
        self.write_to(BufWriter::new(file))
            .context("Failed to write pattern file")?;

        info!(path = %path.display(), pieces = self.pieces.len(), "Saved pattern");
        Ok(())
    }

    /// Load pattern from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).context("Failed to read pattern file")?;
        let pattern =
            Self::read_from(BufReader::new(file)).context("Failed to load pattern file")?;

        info!(path = %path.display(), pieces = pattern.pieces.len(), "Loaded pattern");
        Ok(pattern)
    }

    /// Accepts any minor revision of the current major format version.
    pub fn check_version(&self) -> PatternResult<()> {
        let major = |v: &str| v.split('.').next().map(str::to_owned);
        if major(&self.version) == major(FILE_FORMAT_VERSION) {
            Ok(())
        } else {
            Err(PatternError::UnsupportedVersion(self.version.clone()))
        }
    }

    /// Checks the version, the stored parameters and every stored piece.
    pub fn check(&self) -> PatternResult<()> {
        self.check_version()?;
        self.params.validate()?;

        for piece in &self.pieces {
            piece.polygon.validate()?;
            if let Some(color) = piece.color {
                if color >= self.params.num_colors {
                    return Err(PatternError::InvalidParameters(format!(
                        "{} uses color {} but the pattern has {} colors",
                        piece.id, color, self.params.num_colors
                    )));
                }
            }
        }
        Ok(())
    }

    /// Rebuilds the pattern from the stored pieces; bounds are recomputed.
    pub fn into_pattern(self) -> Pattern {
        Pattern::from_pieces(self.params, self.pieces)
    }
}
