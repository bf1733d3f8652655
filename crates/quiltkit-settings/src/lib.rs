//! QuiltKit Settings Crate
//!
//! Handles configuration files: pattern parameters, palette, nesting sheet
//! and output preferences.

pub mod config;

pub use config::{default_config_path, Config, OutputSettings, PaletteSettings};
