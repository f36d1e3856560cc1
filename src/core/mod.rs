//! Core module - configuration, errors and the scene phase state machine
//!
//! # Architecture Overview
//!
//! - [`ViewerConfig`] - every tunable of the viewer, loaded from JSON
//! - [`ScenePhase`] - `Loading -> Settled` state driving placement
//! - [`CorePlugin`] - installs the config resource, the state and the panic hook
//!
//! # Usage Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use chessboard_viewer::core::{CorePlugin, ViewerConfig};
//!
//! App::new()
//!     .insert_resource(ViewerConfig::load_or_default(None))
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(CorePlugin);
//! ```

pub mod config;
pub mod error;
pub mod plugin;
pub mod states;

// Re-export commonly used items
pub use config::{ColorConfig, SceneColors, ViewerConfig};
pub use error::{ConfigError, ConfigResult};
pub use plugin::CorePlugin;
pub use states::ScenePhase;
