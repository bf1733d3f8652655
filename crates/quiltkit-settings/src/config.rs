//! Configuration and settings management for QuiltKit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats; the default location is in the platform config
//! directory.
//!
//! Configuration is organized into sections:
//! - Pattern parameters (grid, variation, split, colors, seam)
//! - Palette (display colors for each color label)
//! - Nesting sheet dimensions
//! - Output preferences (directory, file name, recent files)

use quiltkit_core::{Error, Result};
use quiltkit_patterns::{PatternParameters, SheetSpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Display colors, indexed by color label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSettings {
    /// CSS color strings
    pub colors: Vec<String>,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            colors: vec![
                "#264653".to_string(),
                "#2a9d8f".to_string(),
                "#e9c46a".to_string(),
                "#f4a261".to_string(),
                "#e76f51".to_string(),
            ],
        }
    }
}

/// Output preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory pattern files are written to
    pub directory: PathBuf,
    /// File name used when none is given
    pub file_name: String,
    /// Name stored in the pattern file metadata
    pub pattern_name: String,
    /// Number of recent files to track
    pub recent_files_count: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_name: "pattern.json".to_string(),
            pattern_name: "Brick Quilt".to_string(),
            recent_files_count: 10,
        }
    }
}

impl OutputSettings {
    pub fn default_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub pattern: PatternParameters,
    pub palette: PaletteSettings,
    /// Sheet used when nesting cut pieces
    pub sheet: SheetSpec,
    pub output: OutputSettings,
    /// Recently written pattern files, newest first
    pub recent_files: Vec<PathBuf>,
}

/// `<config dir>/quiltkit/config.toml`, falling back to the home directory.
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push("quiltkit");
    path.push("config.toml");
    path
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(Error::other("Config file must be .json or .toml")),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::other(format!("Failed to read config file: {}", e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid JSON config: {}", e)))?,
            Format::Toml => toml::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid TOML config: {}", e)))?,
        };

        config.validate()?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise returns defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            info!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?,
            Format::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| Error::other(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.pattern
            .validate()
            .map_err(|e| Error::other(format!("Invalid pattern parameters: {}", e)))?;

        if self.palette.colors.len() < self.pattern.num_colors {
            return Err(Error::other(format!(
                "Palette has {} colors but the pattern uses {}",
                self.palette.colors.len(),
                self.pattern.num_colors
            )));
        }

        if self.sheet.width <= 0.0 || self.sheet.height <= 0.0 {
            return Err(Error::other("Sheet dimensions must be > 0"));
        }

        if self.sheet.spacing < 0.0 {
            return Err(Error::other("Sheet spacing must be >= 0"));
        }

        if self.output.file_name.is_empty() {
            return Err(Error::other("Output file name must not be empty"));
        }

        Ok(())
    }

    /// Palette entries used by the current color count.
    pub fn active_palette(&self) -> Vec<String> {
        self.palette
            .colors
            .iter()
            .take(self.pattern.num_colors)
            .cloned()
            .collect()
    }

    /// Add file to recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|f| f != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.output.recent_files_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.pattern, PatternParameters::default());
        assert_eq!(config.active_palette().len(), 3);
    }

    #[test]
    fn test_short_palette_rejected() {
        let mut config = Config::default();
        config.palette.colors.truncate(2);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Palette has 2 colors"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut config = Config::default();
        config.pattern.rows = 40;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid pattern parameters"));
    }

    #[test]
    fn test_invalid_sheet_rejected() {
        let mut config = Config::default();
        config.sheet.width = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = Config::default()
            .save_to_file(Path::new("config.yaml"))
            .unwrap_err();
        assert!(err.to_string().contains(".json or .toml"));
    }

    #[test]
    fn test_recent_files() {
        let mut config = Config::default();
        config.output.recent_files_count = 2;
        config.add_recent_file(PathBuf::from("a.json"));
        config.add_recent_file(PathBuf::from("b.json"));
        config.add_recent_file(PathBuf::from("a.json"));
        config.add_recent_file(PathBuf::from("c.json"));
        assert_eq!(
            config.recent_files,
            vec![PathBuf::from("c.json"), PathBuf::from("a.json")]
        );
    }

    #[test]
    fn test_default_path_layout() {
        let path = default_config_path();
        assert!(path.ends_with("quiltkit/config.toml"));
        assert_eq!(
            OutputSettings::default().default_path(),
            PathBuf::from("./pattern.json")
        );
    }
}
