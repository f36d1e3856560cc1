//! Shared scene materials
//!
//! All placed pieces of one color share a single material handle, the board
//! and the fallback plane each have one, and the highlight material is the
//! only thing selection ever swaps in.
//!
//! Built through `FromWorld` so the colors come from [`ViewerConfig`] and the
//! handles from `Assets<StandardMaterial>` at initialization time.

use crate::core::{SceneColors, ViewerConfig};
use crate::rendering::pieces::PieceColor;
use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct SceneMaterials {
    pub light_piece: Handle<StandardMaterial>,
    pub dark_piece: Handle<StandardMaterial>,
    /// Applied to the selected piece
    pub highlight: Handle<StandardMaterial>,
    /// Applied to every part of a loaded board model
    pub board: Handle<StandardMaterial>,
    /// Applied to the flat plane substituted for a missing board
    pub fallback_board: Handle<StandardMaterial>,
}

impl SceneMaterials {
    /// Creates the materials for `colors` in `materials`
    pub fn new(colors: &SceneColors, materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            light_piece: materials.add(StandardMaterial {
                base_color: colors.light_piece,
                perceptual_roughness: 0.5,
                metallic: 0.3,
                ..default()
            }),
            dark_piece: materials.add(StandardMaterial {
                base_color: colors.dark_piece,
                perceptual_roughness: 0.5,
                metallic: 0.3,
                ..default()
            }),
            highlight: materials.add(StandardMaterial {
                base_color: colors.highlight,
                emissive: colors.highlight_emissive.to_linear(),
                perceptual_roughness: 0.4,
                metallic: 0.1,
                ..default()
            }),
            board: materials.add(StandardMaterial {
                base_color: colors.board,
                perceptual_roughness: 0.8,
                ..default()
            }),
            fallback_board: materials.add(StandardMaterial {
                base_color: colors.fallback_board,
                ..default()
            }),
        }
    }

    /// Color-appropriate material for a placed piece
    pub fn piece(&self, color: PieceColor) -> Handle<StandardMaterial> {
        match color {
            PieceColor::White => self.light_piece.clone(),
            PieceColor::Black => self.dark_piece.clone(),
        }
    }
}

impl FromWorld for SceneMaterials {
    fn from_world(world: &mut World) -> Self {
        let colors = world
            .get_resource::<ViewerConfig>()
            .map(|config| config.colors.resolve())
            .unwrap_or_else(|| ViewerConfig::default().colors.resolve());
        let mut materials = world
            .get_resource_mut::<Assets<StandardMaterial>>()
            .expect("Assets<StandardMaterial> should be initialized before SceneMaterials");
        SceneMaterials::new(&colors, &mut materials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_material_follows_color() {
        //! Light pieces get the light material and dark pieces the dark one;
        //! neither ever shares the highlight handle.
        let mut assets = Assets::<StandardMaterial>::default();
        let colors = ViewerConfig::default().colors.resolve();
        let materials = SceneMaterials::new(&colors, &mut assets);

        assert_eq!(materials.piece(PieceColor::White), materials.light_piece);
        assert_eq!(materials.piece(PieceColor::Black), materials.dark_piece);
        assert_ne!(materials.light_piece, materials.highlight);
        assert_ne!(materials.dark_piece, materials.highlight);
    }

    #[test]
    fn test_highlight_is_emissive() {
        let mut assets = Assets::<StandardMaterial>::default();
        let colors = ViewerConfig::default().colors.resolve();
        let materials = SceneMaterials::new(&colors, &mut assets);

        let highlight = assets.get(&materials.highlight).unwrap();
        assert_ne!(highlight.emissive, LinearRgba::BLACK);
    }
}
