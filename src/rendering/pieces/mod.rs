//! Chess pieces - identity, templates, starting layout and placement
//!
//! Templates are recorded as piece OBJ files settle; placement runs once on
//! entering [`ScenePhase::Settled`], after every fetch attempt has concluded.

pub mod layout;
pub mod pieces;
pub mod placement;
pub mod registry;

pub use layout::*;
pub use pieces::*;
pub use placement::*;
pub use registry::*;

use crate::assets::{FetchRole, LoadingSystems, ModelFetched};
use crate::core::ScenePhase;
use crate::rendering::materials::SceneMaterials;
use bevy::prelude::*;

pub struct PiecePlugin;

impl Plugin for PiecePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TemplateRegistry>()
            .init_resource::<PlacementSummary>()
            .init_resource::<SceneMaterials>()
            .register_type::<PlacedPiece>()
            .add_systems(Startup, spawn_piece_collection)
            .add_systems(
                Update,
                record_piece_templates.in_set(LoadingSystems::Apply),
            )
            .add_systems(OnEnter(ScenePhase::Settled), place_pieces);
    }
}

/// Root entity every placed piece hangs from
pub fn spawn_piece_collection(mut commands: Commands) {
    commands.spawn((
        PieceCollection,
        Transform::default(),
        Visibility::default(),
        Name::new("Pieces"),
    ));
}

/// Feeds every successfully fetched pieces model into the registry
pub fn record_piece_templates(
    mut fetched: MessageReader<ModelFetched>,
    mut registry: ResMut<TemplateRegistry>,
) {
    for message in fetched.read() {
        if message.role != FetchRole::Pieces {
            continue;
        }
        if let Some(model) = &message.model {
            let recorded = registry.register_model(model);
            debug!(
                "[TEMPLATES] {} templates from {}",
                recorded, message.source
            );
        }
    }
}
