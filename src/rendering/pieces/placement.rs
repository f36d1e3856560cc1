//! Piece placement - turning templates into pieces on the board
//!
//! Placement runs once, after every fetch attempt has settled. For each of
//! the 32 layout entries, in table order:
//!
//! 1. Derive the template key and resolve the template (missing: skip)
//! 2. Reject empty or malformed geometry (skip, with vertex counts logged)
//! 3. Scale uniformly according to [`PieceScale`]
//! 4. Centre the scaled box on the mapped square and rest its lowest point on
//!    Y = 0, whatever the pivot the asset was authored with
//! 5. Spawn a root entity with [`PlacedPiece`] identity and a child mesh part
//!    using the color-appropriate material
//!
//! Planning is pure ([`plan_placement`]); spawning shares one mesh handle per
//! template while every piece owns its own `Transform`. Skipped entries never
//! abort the others, and an empty registry aborts placement as a reported
//! condition rather than a crash.

use super::layout::{LayoutEntry, STARTING_LAYOUT};
use super::pieces::{PieceCollection, PiecePart, PlacedPiece};
use super::registry::{PieceTemplate, TemplateKeys, TemplateRegistry};
use crate::core::ViewerConfig;
use crate::rendering::board::BoardGeometry;
use crate::rendering::materials::SceneMaterials;
use crate::ui::StatusLine;
use bevy::camera::primitives::{Aabb, MeshAabb};
use bevy::light::NotShadowReceiver;
use bevy::picking::mesh_picking::ray_cast::RayCastBackfaces;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// How a template's model-space size becomes its on-board size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PieceScale {
    /// Same factor for every template
    Fixed { factor: f32 },
    /// Every template scaled to exactly `target_height`
    FitTemplateHeight { target_height: f32 },
    /// One factor for the pack, bringing its tallest template to
    /// `target_height` and keeping relative proportions
    FitTallest { target_height: f32 },
}

impl Default for PieceScale {
    fn default() -> Self {
        PieceScale::FitTemplateHeight { target_height: 9.0 }
    }
}

impl PieceScale {
    /// Describes what is wrong with the parameters, if anything
    pub fn validate(&self) -> Option<String> {
        let (name, value) = match self {
            PieceScale::Fixed { factor } => ("factor", *factor),
            PieceScale::FitTemplateHeight { target_height }
            | PieceScale::FitTallest { target_height } => ("target_height", *target_height),
        };
        if value.is_finite() && value > 0.0 {
            None
        } else {
            Some(format!("{} must be a positive number, got {}", name, value))
        }
    }

    /// Uniform factor for `template`; `tallest` is the largest raw height
    /// in the registry
    pub fn factor_for(&self, template: &PieceTemplate, tallest: f32) -> f32 {
        let fit = |target: f32, height: f32| if height > 0.0 { target / height } else { 1.0 };
        match self {
            PieceScale::Fixed { factor } => *factor,
            PieceScale::FitTemplateHeight { target_height } => {
                fit(*target_height, template.raw_height())
            }
            PieceScale::FitTallest { target_height } => fit(*target_height, tallest),
        }
    }
}

/// Placement cannot start at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("No piece templates loaded, cannot place pieces.")]
    NoTemplates,
}

/// Why a single layout entry produced no piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingTemplate { key: String },
    DegenerateGeometry { expected_min: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub entry: LayoutEntry,
    pub reason: SkipReason,
}

/// One piece ready to spawn
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub entry: LayoutEntry,
    pub template: String,
    pub transform: Transform,
}

/// Outcome of planning the whole layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementPlan {
    pub placements: Vec<Placement>,
    pub skipped: Vec<SkippedEntry>,
}

/// Counts from the last placement pass, kept for inspection
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PlacementSummary {
    pub placed: usize,
    pub skipped: Vec<SkippedEntry>,
}

/// Smallest vertex count of a usable triangle list
const MIN_TEMPLATE_VERTICES: usize = 3;

/// Transform placing a scaled template on square (`file`, `rank`)
///
/// The box is recomputed after scaling; the piece is then moved so the box's
/// horizontal centre sits on the square centre and its minimum Y on 0.
/// Any pivot offset the asset was authored with is cancelled horizontally as
/// well as vertically, so off-centre pivots still land mid-square.
pub fn piece_transform(
    template: &PieceTemplate,
    scale: f32,
    geometry: &BoardGeometry,
    file: u8,
    rank: u8,
) -> Transform {
    let scaled = Transform::from_scale(Vec3::splat(scale));
    let Some(bounds) = template.bounds else {
        return scaled.with_translation(geometry.square_center(file, rank));
    };

    let scaled_bounds = bounds.transformed(&scaled);
    let center = scaled_bounds.center();
    scaled.with_translation(Vec3::new(
        geometry.world_x(file) - center.x,
        -scaled_bounds.min.y,
        geometry.world_z(rank) - center.z,
    ))
}

/// Plans placement of `layout` without touching the world
pub fn plan_placement(
    registry: &TemplateRegistry,
    keys: &impl TemplateKeys,
    scale: &PieceScale,
    geometry: &BoardGeometry,
    layout: &[LayoutEntry],
) -> Result<PlacementPlan, PlacementError> {
    if registry.is_empty() {
        return Err(PlacementError::NoTemplates);
    }

    let tallest = registry
        .templates()
        .map(PieceTemplate::raw_height)
        .fold(0.0_f32, f32::max);

    let mut plan = PlacementPlan::default();
    for entry in layout {
        let key = keys.key(entry.kind, entry.color);
        let Some(template) = registry.get(&key) else {
            plan.skipped.push(SkippedEntry {
                entry: *entry,
                reason: SkipReason::MissingTemplate { key },
            });
            continue;
        };

        if !template.geometry.is_renderable() {
            plan.skipped.push(SkippedEntry {
                entry: *entry,
                reason: SkipReason::DegenerateGeometry {
                    expected_min: MIN_TEMPLATE_VERTICES,
                    actual: template.geometry.vertex_count(),
                },
            });
            continue;
        }

        let factor = scale.factor_for(template, tallest);
        plan.placements.push(Placement {
            entry: *entry,
            template: key,
            transform: piece_transform(template, factor, geometry, entry.file, entry.rank),
        });
    }
    Ok(plan)
}

/// Logs each skipped entry the way placement reports it
fn log_skipped(skipped: &SkippedEntry) {
    let e = &skipped.entry;
    match &skipped.reason {
        SkipReason::MissingTemplate { key } => warn!(
            "[PLACEMENT] Template not found for name: {}. Skipping piece at {},{}",
            key, e.file, e.rank
        ),
        SkipReason::DegenerateGeometry {
            expected_min,
            actual,
        } => warn!(
            "[PLACEMENT] Degenerate geometry for {} {} at {},{}: expected a non-zero multiple of {} vertices, found {}",
            e.color, e.kind, e.file, e.rank, expected_min, actual
        ),
    }
}

/// Spawns every planned piece under `collection`, returning how many
pub fn spawn_placed_pieces(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &SceneMaterials,
    registry: &TemplateRegistry,
    plan: &PlacementPlan,
    collection: Entity,
) -> usize {
    let mut mesh_cache: HashMap<&str, (Handle<Mesh>, Option<Aabb>)> = HashMap::new();
    let mut spawned = 0;

    for placement in &plan.placements {
        let Some(template) = registry.get(&placement.template) else {
            continue;
        };
        let (mesh, aabb) = mesh_cache
            .entry(template.name.as_str())
            .or_insert_with(|| {
                let mesh = template.geometry.to_mesh();
                let aabb = mesh.compute_aabb();
                (meshes.add(mesh), aabb)
            })
            .clone();

        let e = placement.entry;
        let piece = PlacedPiece::new(e.kind, e.color, e.file, e.rank);
        let name = format!("{} {}", piece.display_name, piece.square_name());
        let material = materials.piece(e.color);

        commands
            .spawn((
                placement.transform,
                Visibility::default(),
                Name::new(name.clone()),
                piece,
                ChildOf(collection),
            ))
            .with_children(|parent| {
                let mut part = parent.spawn((
                    Mesh3d(mesh),
                    MeshMaterial3d(material),
                    PiecePart,
                    Visibility::default(),
                    RayCastBackfaces,
                    NotShadowReceiver,
                    Name::new(format!("{} Mesh", name)),
                ));
                // Ray casts cull by bounds before testing triangles
                if let Some(aabb) = aabb {
                    part.insert(aabb);
                }
            });
        spawned += 1;
    }
    spawned
}

/// Places the starting layout once loading has settled
pub fn place_pieces(
    mut commands: Commands,
    registry: Res<TemplateRegistry>,
    config: Res<ViewerConfig>,
    materials: Res<SceneMaterials>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut status: ResMut<StatusLine>,
    collections: Query<Entity, With<PieceCollection>>,
) {
    let plan = match plan_placement(
        &registry,
        &config.naming,
        &config.piece_scale,
        &config.board_geometry(),
        &STARTING_LAYOUT,
    ) {
        Ok(plan) => plan,
        Err(e) => {
            error!("[PLACEMENT] {}", e);
            status.show(e.to_string());
            commands.insert_resource(PlacementSummary::default());
            return;
        }
    };

    status.show("Models loaded. Placing pieces...");
    status.hide_after(config.status_hide_secs);

    plan.skipped.iter().for_each(log_skipped);

    let collection = match collections.iter().next() {
        Some(entity) => entity,
        None => commands
            .spawn((
                PieceCollection,
                Transform::default(),
                Visibility::default(),
                Name::new("Pieces"),
            ))
            .id(),
    };

    let placed = spawn_placed_pieces(
        &mut commands,
        &mut meshes,
        &materials,
        &registry,
        &plan,
        collection,
    );
    info!(
        "[PLACEMENT] Finished placing pieces from templates: {}/{} placed",
        placed,
        STARTING_LAYOUT.len()
    );

    commands.insert_resource(PlacementSummary {
        placed,
        skipped: plan.skipped,
    });
}
