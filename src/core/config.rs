//! Viewer configuration
//!
//! [`ViewerConfig`] gathers every tunable of the viewer: where the board and
//! piece models come from, the canonical square size, the template naming
//! convention, the piece scale policy and the material colors.
//!
//! # File Location
//!
//! The config is read from `viewer.json` in the user's configuration directory
//! (e.g. `~/.config/chessboardviewer/viewer.json`) unless an explicit path is
//! given on the command line.
//!
//! # Error Handling
//!
//! Loading never aborts the viewer:
//! - A missing file falls back to defaults
//! - An unreadable or malformed file is logged and falls back to defaults
//! - Individual invalid values are replaced by their default with a warning

use super::error::{ConfigError, ConfigResult};
use crate::assets::AssetSource;
use crate::rendering::board::BoardGeometry;
use crate::rendering::pieces::{NamingConvention, PieceScale};
use bevy::color::Srgba;
use bevy::prelude::*;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config filename inside the project config directory
const CONFIG_FILENAME: &str = "viewer.json";

const DEFAULT_BOARD_URL: &str = "https://gokulio77.github.io/Chess_game/models/chessboard.obj";
const DEFAULT_PIECES_URL: &str = "https://gokulio77.github.io/Chess_game/models/chess.obj";

/// All viewer settings, inserted as a resource before any plugin runs
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Board model (OBJ), URL or local path
    pub board_source: AssetSource,
    /// One or more piece model files (OBJ)
    pub piece_sources: Vec<AssetSource>,
    /// Edge length of a single board square in world units
    pub square_size: f32,
    /// How template names are derived from piece kind and color
    pub naming: NamingConvention,
    /// How placed pieces are scaled
    pub piece_scale: PieceScale,
    /// Material colors as `#rrggbb` hex strings
    pub colors: ColorConfig,
    /// Seconds the status line stays visible after placement
    pub status_hide_secs: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            board_source: AssetSource::from(DEFAULT_BOARD_URL),
            piece_sources: vec![AssetSource::from(DEFAULT_PIECES_URL)],
            square_size: 10.0,
            naming: NamingConvention::default(),
            piece_scale: PieceScale::default(),
            colors: ColorConfig::default(),
            status_hide_secs: 2.0,
        }
    }
}

impl ViewerConfig {
    /// Canonical board geometry derived from `square_size`
    pub fn board_geometry(&self) -> BoardGeometry {
        BoardGeometry::new(self.square_size)
    }

    /// Total number of fetch attempts one scene load performs
    pub fn attempts_total(&self) -> usize {
        1 + self.piece_sources.len()
    }

    /// Reads and parses a config file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the config from `explicit` or the default location, falling back
    /// to defaults on any failure
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };

        if explicit.is_none() && !path.exists() {
            info!("[CONFIG] No config file at {:?}. Using defaults.", path);
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                info!("[CONFIG] Loaded config from {:?}", path);
                config.sanitized()
            }
            Err(e) => {
                warn!("[CONFIG] {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Checks every value that serde cannot constrain
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut problems = Vec::new();
        if !(self.square_size.is_finite() && self.square_size > 0.0) {
            problems.push(ConfigError::InvalidValue {
                field: "square_size",
                message: format!("must be a positive number, got {}", self.square_size),
            });
        }
        if let Some(message) = self.piece_scale.validate() {
            problems.push(ConfigError::InvalidValue {
                field: "piece_scale",
                message,
            });
        }
        if !(self.status_hide_secs.is_finite() && self.status_hide_secs >= 0.0) {
            problems.push(ConfigError::InvalidValue {
                field: "status_hide_secs",
                message: format!("must be zero or positive, got {}", self.status_hide_secs),
            });
        }
        problems
    }

    /// Replaces every invalid value with its default, logging each one
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for problem in self.validate() {
            warn!("[CONFIG] {}. Using default.", problem);
            if let ConfigError::InvalidValue { field, .. } = problem {
                match field {
                    "square_size" => self.square_size = defaults.square_size,
                    "piece_scale" => self.piece_scale = defaults.piece_scale.clone(),
                    "status_hide_secs" => self.status_hide_secs = defaults.status_hide_secs,
                    _ => {}
                }
            }
        }
        self
    }
}

/// Returns `viewer.json` in the user's configuration directory, or in the
/// working directory when no such directory exists
pub fn default_config_path() -> PathBuf {
    match ProjectDirs::from("com", "trilltino", "ChessboardViewer") {
        Some(dirs) => dirs.config_dir().join(CONFIG_FILENAME),
        None => PathBuf::from(CONFIG_FILENAME),
    }
}

/// Material colors, kept as hex strings so the JSON stays hand-editable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub light_piece: String,
    pub dark_piece: String,
    pub highlight: String,
    pub highlight_emissive: String,
    pub board: String,
    pub fallback_board: String,
    pub background: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light_piece: "#ffffff".into(),
            dark_piece: "#333333".into(),
            highlight: "#ffff00".into(),
            highlight_emissive: "#aaaa00".into(),
            board: "#aaaaaa".into(),
            fallback_board: "#888888".into(),
            background: "#eeeeee".into(),
        }
    }
}

/// Parsed colors ready for material creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneColors {
    pub light_piece: Color,
    pub dark_piece: Color,
    pub highlight: Color,
    pub highlight_emissive: Color,
    pub board: Color,
    pub fallback_board: Color,
    pub background: Color,
}

impl ColorConfig {
    /// Parses every color, substituting the default for invalid entries
    pub fn resolve(&self) -> SceneColors {
        let defaults = ColorConfig::default();
        let pick = |value: &str, fallback: &str, context: &str| -> Color {
            let fallback = Srgba::hex(fallback).unwrap_or(Srgba::WHITE);
            Self::parse_hex(value, fallback, context).into()
        };
        SceneColors {
            light_piece: pick(&self.light_piece, &defaults.light_piece, "light_piece"),
            dark_piece: pick(&self.dark_piece, &defaults.dark_piece, "dark_piece"),
            highlight: pick(&self.highlight, &defaults.highlight, "highlight"),
            highlight_emissive: pick(
                &self.highlight_emissive,
                &defaults.highlight_emissive,
                "highlight_emissive",
            ),
            board: pick(&self.board, &defaults.board, "board"),
            fallback_board: pick(&self.fallback_board, &defaults.fallback_board, "fallback_board"),
            background: pick(&self.background, &defaults.background, "background"),
        }
    }

    /// Parses one hex color, returning `fallback` (and logging) when invalid
    fn parse_hex(hex: &str, fallback: Srgba, context: &str) -> Srgba {
        match Srgba::hex(hex) {
            Ok(color) => color,
            Err(e) => {
                error!(
                    "[CONFIG] Failed to parse hex color '{}' for {}: {:?}",
                    hex, context, e
                );
                warn!("[CONFIG] Using fallback color: {:?}", fallback);
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_reference_board() {
        //! The default config describes an 80x80 board of 10-unit squares
        //! fed by one board file and one pieces file.
        let config = ViewerConfig::default();
        assert_eq!(config.square_size, 10.0);
        assert_eq!(config.board_geometry().dimension(), 80.0);
        assert_eq!(config.attempts_total(), 2);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        //! Fields missing from the JSON keep their default values.
        let config: ViewerConfig =
            serde_json::from_str(r#"{ "square_size": 2.5, "piece_sources": ["a.obj", "b.obj"] }"#)
                .unwrap();
        assert_eq!(config.square_size, 2.5);
        assert_eq!(config.attempts_total(), 3);
        assert_eq!(config.status_hide_secs, 2.0);
        assert_eq!(config.colors, ColorConfig::default());
    }

    #[test]
    fn test_sanitized_replaces_invalid_values() {
        //! A non-positive square size is rejected and replaced by the default.
        let config = ViewerConfig {
            square_size: -4.0,
            status_hide_secs: f32::NAN,
            ..default()
        };
        assert_eq!(config.validate().len(), 2);

        let fixed = config.sanitized();
        assert_eq!(fixed.square_size, 10.0);
        assert_eq!(fixed.status_hide_secs, 2.0);
    }

    #[test]
    fn test_invalid_hex_color_falls_back() {
        //! Invalid hex strings never fail; they resolve to the default color.
        let colors = ColorConfig {
            highlight: "not-a-color".into(),
            ..default()
        };
        let resolved = colors.resolve();
        assert_eq!(resolved.highlight, Color::from(Srgba::hex("#ffff00").unwrap()));
        assert_eq!(resolved.dark_piece, Color::from(Srgba::hex("#333333").unwrap()));
    }

    #[test]
    fn test_parse_hex_accepts_short_and_long_forms() {
        let fallback = Srgba::RED;
        assert_eq!(ColorConfig::parse_hex("#fff", fallback, "short"), Srgba::WHITE);
        assert_eq!(ColorConfig::parse_hex("000000", fallback, "bare"), Srgba::BLACK);
        assert_eq!(ColorConfig::parse_hex("#12345", fallback, "odd"), fallback);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        //! Reading a path that does not exist reports an I/O error with the path.
        let path = std::env::temp_dir().join("chessboard-viewer-missing-config.json");
        let _ = std::fs::remove_file(&path);
        match ViewerConfig::load_from(&path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_or_default_survives_malformed_file() {
        //! A malformed explicit config file yields the defaults.
        let path = std::env::temp_dir().join("chessboard-viewer-malformed-config.json");
        std::fs::write(&path, "{ this is not json").unwrap();
        let config = ViewerConfig::load_or_default(Some(&path));
        assert_eq!(config, ViewerConfig::default());
        let _ = std::fs::remove_file(&path);
    }
}
