//! Interactive 3D chessboard viewer
//!
//! Loads a board model and one or more piece packs (Wavefront OBJ, from URLs
//! or local files), normalizes the board onto a canonical 8x8 grid, places
//! the 32 starting pieces and lets the user select a piece by clicking it.
//! There is no rules engine; selecting only highlights.
//!
//! # Plugin Order
//!
//! Insert a [`core::ViewerConfig`] (optional) and add `DefaultPlugins` before
//! [`ChessboardPlugins`].

pub mod assets;
pub mod core;
pub mod input;
pub mod rendering;
pub mod ui;

use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

/// Every viewer plugin, in dependency order
pub struct ChessboardPlugins;

impl PluginGroup for ChessboardPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(core::CorePlugin)
            .add(ui::StatusUiPlugin)
            .add(assets::AssetLoadingPlugin)
            .add(rendering::BoardPlugin)
            .add(rendering::PiecePlugin)
            .add(rendering::CameraPlugin)
            .add(input::SelectionPlugin)
    }
}
