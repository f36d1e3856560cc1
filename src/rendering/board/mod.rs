pub mod board;
pub mod coordinates;

pub use board::*;
pub use coordinates::*;

use crate::assets::{FetchRole, LoadingSystems, ModelFetched};
use crate::core::ViewerConfig;
use crate::rendering::materials::SceneMaterials;
use bevy::prelude::*;

pub struct BoardPlugin;

impl Plugin for BoardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneMaterials>()
            .register_type::<BoardRoot>()
            .add_systems(Update, spawn_fetched_board.in_set(LoadingSystems::Apply));
    }
}

/// Spawns the board once its fetch settles; a failed fetch gets the fallback
/// plane instead
pub fn spawn_fetched_board(
    mut commands: Commands,
    mut fetched: MessageReader<ModelFetched>,
    mut meshes: ResMut<Assets<Mesh>>,
    materials: Res<SceneMaterials>,
    config: Res<ViewerConfig>,
) {
    let geometry = config.board_geometry();
    for message in fetched.read() {
        if message.role != FetchRole::Board {
            continue;
        }
        match &message.model {
            Some(model) => {
                spawn_board(&mut commands, &mut meshes, &materials, model, &geometry);
            }
            None => {
                spawn_fallback_board(&mut commands, &mut meshes, &materials, &geometry);
            }
        }
    }
}
