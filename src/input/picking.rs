//! Ray picking against piece meshes
//!
//! Rays are cast with Bevy's [`MeshRayCast`], restricted to the entities a
//! filter accepts. Hits land on mesh parts, so [`find_tagged_ancestor`] walks
//! the hierarchy up to the entity that carries the piece identity.

use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;

/// Nearest entity accepted by `is_candidate` that the ray hits
///
/// Visibility is ignored: every placed piece is pickable whether or not a
/// camera has computed its view visibility yet.
pub fn nearest_candidate(
    ray_cast: &mut MeshRayCast,
    ray: Ray3d,
    is_candidate: &impl Fn(Entity) -> bool,
) -> Option<Entity> {
    let settings = MeshRayCastSettings::default()
        .with_filter(is_candidate)
        .with_visibility(RayCastVisibility::Any);
    ray_cast
        .cast_ray(ray, &settings)
        .first()
        .map(|(entity, _)| *entity)
}

/// First entity, starting at `start` itself, for which `is_tagged` holds
pub fn find_tagged_ancestor(
    start: Entity,
    parent_of: impl Fn(Entity) -> Option<Entity>,
    is_tagged: impl Fn(Entity) -> bool,
) -> Option<Entity> {
    let mut current = Some(start);
    while let Some(entity) = current {
        if is_tagged(entity) {
            return Some(entity);
        }
        current = parent_of(entity);
    }
    None
}
