//! Board normalization and spawning
//!
//! Externally authored board models come in any scale and with any pivot.
//! Normalization fits the larger horizontal extent to the canonical board
//! dimension, centres the model on the origin and rests its lowest point on
//! Y = 0. When the board cannot be fetched a flat plane of the same footprint
//! stands in, so placement and picking always have a reference surface.

use super::coordinates::BoardGeometry;
use crate::assets::ObjModel;
use crate::rendering::bounds::Bounds3;
use crate::rendering::materials::SceneMaterials;
use bevy::light::NotShadowCaster;
use bevy::prelude::*;

/// Root entity of the board, loaded or fallback
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct BoardRoot {
    /// True when the flat fallback plane was substituted
    pub fallback: bool,
}

/// Transform that maps a raw board model onto the canonical board
///
/// Uniform scale = `dimension / max(size.x, size.z)`, or 1 when the model
/// has no horizontal extent. The translation then moves the scaled box's
/// horizontal centre to the origin and its lowest point to Y = 0. A model
/// without any vertex is left untouched.
pub fn board_normalization(bounds: Option<Bounds3>, dimension: f32) -> Transform {
    let Some(bounds) = bounds else {
        return Transform::IDENTITY;
    };

    let size = bounds.size();
    let extent = size.x.max(size.z);
    let scale = if extent > 0.0 { dimension / extent } else { 1.0 };

    let scaled = bounds.transformed(&Transform::from_scale(Vec3::splat(scale)));
    let center = scaled.center();

    Transform::from_translation(Vec3::new(-center.x, -scaled.min.y, -center.z))
        .with_scale(Vec3::splat(scale))
}

/// Spawns a loaded board model, normalized onto the canonical board
///
/// Every part gets the board material, receives shadows and casts none.
pub fn spawn_board(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &SceneMaterials,
    model: &ObjModel,
    geometry: &BoardGeometry,
) -> Entity {
    let transform = board_normalization(model.bounds(), geometry.dimension());
    info!(
        "[BOARD] Board model has {} parts, normalized with scale {:.4}",
        model.objects.len(),
        transform.scale.x
    );

    commands
        .spawn((
            transform,
            Visibility::default(),
            BoardRoot { fallback: false },
            Name::new("Board"),
        ))
        .with_children(|parent| {
            for object in &model.objects {
                let name = if object.name.trim().is_empty() {
                    "Board Part".to_string()
                } else {
                    format!("Board Part {}", object.name.trim())
                };
                parent.spawn((
                    Mesh3d(meshes.add(object.mesh.to_mesh())),
                    MeshMaterial3d(materials.board.clone()),
                    NotShadowCaster,
                    Name::new(name),
                ));
            }
        })
        .id()
}

/// Spawns the flat `dimension x dimension` plane used when the board is missing
pub fn spawn_fallback_board(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &SceneMaterials,
    geometry: &BoardGeometry,
) -> Entity {
    let dimension = geometry.dimension();
    info!(
        "[BOARD] Adding fallback plane {}x{} at Y=0",
        dimension, dimension
    );

    // Plane3d already lies in the XZ plane facing +Y
    commands
        .spawn((
            Mesh3d(meshes.add(Plane3d::default().mesh().size(dimension, dimension))),
            MeshMaterial3d(materials.fallback_board.clone()),
            Transform::IDENTITY,
            Visibility::default(),
            NotShadowCaster,
            BoardRoot { fallback: true },
            Name::new("Fallback Board"),
        ))
        .id()
}
