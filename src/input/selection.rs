//! Piece selection
//!
//! A left click casts a ray from the camera through the cursor. The nearest
//! piece mesh hit becomes the selection and wears the highlight material;
//! clicking another piece moves the highlight, clicking empty space or the
//! board clears it. At most one piece is highlighted at any time.
//!
//! [`SelectionState::click`] is the whole state machine and touches no ECS
//! data: it answers with the [`MaterialOp`]s to apply, which
//! [`apply_selection_click`] then writes to the mesh parts.

use super::picking::{find_tagged_ancestor, nearest_candidate};
use crate::rendering::materials::SceneMaterials;
use crate::rendering::pieces::{PiecePart, PlacedPiece};
use bevy::picking::mesh_picking::ray_cast::MeshRayCast;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use std::collections::HashMap;

/// Material handles of a piece's mesh parts
pub type PartMaterials = Vec<(Entity, Handle<StandardMaterial>)>;

/// Material change requested by a click
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialOp {
    /// Put back the part's material from before it was highlighted
    Restore {
        part: Entity,
        material: Handle<StandardMaterial>,
    },
    /// Swap in the highlight material
    Highlight { part: Entity },
}

/// Current selection; a selected piece always keeps its original materials
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected { piece: Entity, saved: PartMaterials },
}

impl SelectionState {
    pub fn selected(&self) -> Option<Entity> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected { piece, .. } => Some(*piece),
        }
    }

    /// Handles one click
    ///
    /// `hit` is the piece under the cursor together with its parts' current
    /// materials, or `None` when nothing selectable was hit. Any existing
    /// selection is restored first; a hit piece is then selected.
    pub fn click(&mut self, hit: Option<(Entity, PartMaterials)>) -> Vec<MaterialOp> {
        let mut ops = Vec::new();
        let mut originals = HashMap::new();

        if let SelectionState::Selected { saved, .. } = std::mem::take(self) {
            for (part, material) in saved {
                ops.push(MaterialOp::Restore {
                    part,
                    material: material.clone(),
                });
                originals.insert(part, material);
            }
        }

        let Some((piece, parts)) = hit else {
            return ops;
        };
        if parts.is_empty() {
            return ops;
        }

        // Parts just restored still report the highlight as their current material
        let saved: PartMaterials = parts
            .into_iter()
            .map(|(part, current)| (part, originals.remove(&part).unwrap_or(current)))
            .collect();
        ops.extend(saved.iter().map(|(part, _)| MaterialOp::Highlight { part: *part }));
        *self = SelectionState::Selected { piece, saved };
        ops
    }
}

/// A left click, with the world ray under the cursor when there is one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionClick {
    pub ray: Option<Ray3d>,
}

/// Emits a [`SelectionClick`] on the frame the left button goes down
///
/// A cursor outside the window or a missing camera gives a click without a
/// ray, which clears the selection.
pub fn click_ray_system(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
) -> Option<SelectionClick> {
    if !mouse.just_pressed(MouseButton::Left) {
        return None;
    }

    let cursor = windows.single().ok().and_then(Window::cursor_position);
    let ray = cursor.and_then(|cursor| {
        let (camera, transform) = cameras.iter().next()?;
        camera.viewport_to_world(transform, cursor).ok()
    });
    Some(SelectionClick { ray })
}

/// Resolves a click to a piece and applies the resulting material changes
pub fn apply_selection_click(
    In(click): In<Option<SelectionClick>>,
    mut selection: ResMut<SelectionState>,
    scene_materials: Res<SceneMaterials>,
    mut ray_cast: MeshRayCast,
    part_entities: Query<(), With<PiecePart>>,
    parents: Query<&ChildOf>,
    children: Query<&Children>,
    pieces: Query<&PlacedPiece>,
    mut part_materials: Query<&mut MeshMaterial3d<StandardMaterial>, With<PiecePart>>,
) {
    let Some(click) = click else {
        return;
    };

    let is_part = |entity: Entity| part_entities.contains(entity);
    let hit_part = click
        .ray
        .and_then(|ray| nearest_candidate(&mut ray_cast, ray, &is_part));

    let hit_piece = hit_part.and_then(|part| {
        find_tagged_ancestor(
            part,
            |e| parents.get(e).ok().map(ChildOf::parent),
            |e| pieces.contains(e),
        )
    });

    let hit = hit_piece.map(|piece| {
        let piece_parts: PartMaterials = std::iter::once(piece)
            .chain(children.iter_descendants(piece))
            .filter_map(|e| part_materials.get(e).ok().map(|m| (e, m.0.clone())))
            .collect();
        (piece, piece_parts)
    });

    let had_selection = selection.selected().is_some();
    for op in selection.click(hit) {
        match op {
            MaterialOp::Restore { part, material } => {
                if let Ok(mut current) = part_materials.get_mut(part) {
                    current.0 = material;
                }
            }
            MaterialOp::Highlight { part } => {
                if let Ok(mut current) = part_materials.get_mut(part) {
                    current.0 = scene_materials.highlight.clone();
                }
            }
        }
    }

    match selection.selected().and_then(|piece| pieces.get(piece).ok()) {
        Some(piece) => info!(
            "[SELECTION] Selected {} at ({}, {})",
            piece.display_name, piece.file, piece.rank
        ),
        None if had_selection => debug!("[SELECTION] Selection cleared"),
        None => {}
    }
}

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SelectionState>()
            .init_resource::<SceneMaterials>()
            .add_systems(Update, click_ray_system.pipe(apply_selection_click));
    }
}
