//! Camera, lighting and orbit controls
//!
//! The scene is framed for the canonical board: a perspective camera above
//! the near edge looking at the origin, soft ambient light and one
//! shadow-casting directional light.
//!
//! # Controls
//!
//! - **Right mouse drag**: orbit around the board centre
//! - **Mouse wheel**: zoom toward / away from the centre
//!
//! Left click is left to selection. Input only moves the goal; the camera
//! eases toward it every frame, and the elevation never drops below the
//! board plane.

use crate::core::ViewerConfig;
use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll},
    prelude::*,
};
use std::f32::consts::FRAC_PI_2;

/// Radians per mouse movement dot
pub const RADIANS_PER_DOT: f32 = 1.0 / 180.0;

/// Closest the camera gets to the horizon, in radians of elevation
pub const MIN_ELEVATION: f32 = 0.05;

/// Keeps the camera from reaching the exact pole, where `looking_at` flips
const MAX_ELEVATION: f32 = FRAC_PI_2 - 0.01;

/// Light direction source for the key light
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(40.0, 60.0, 30.0);

/// Orbit state of a camera circling `focus`
///
/// `yaw`/`elevation`/`distance` are the current values; the `target_*`
/// fields are the goal that input moves and the camera eases toward.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub yaw: f32,
    /// Angle above the board plane
    pub elevation: f32,
    pub distance: f32,
    pub target_yaw: f32,
    pub target_elevation: f32,
    pub target_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of the remaining gap closed each frame
    pub damping: f32,
    pub rotation_sensitivity: f32,
    /// Fraction of the distance changed per scroll unit
    pub zoom_speed: f32,
}

impl OrbitCamera {
    /// Orbit matching a camera placed at `position` looking at `focus`,
    /// with distance limits scaled to the board `dimension`
    pub fn from_position(position: Vec3, focus: Vec3, dimension: f32) -> Self {
        let offset = position - focus;
        let distance = offset.length();
        let elevation = if distance > 0.0 {
            (offset.y / distance).clamp(-1.0, 1.0).asin()
        } else {
            MIN_ELEVATION
        }
        .clamp(MIN_ELEVATION, MAX_ELEVATION);
        let yaw = offset.x.atan2(offset.z);

        Self {
            focus,
            yaw,
            elevation,
            distance,
            target_yaw: yaw,
            target_elevation: elevation,
            target_distance: distance,
            min_distance: 0.3 * dimension,
            max_distance: 2.5 * dimension,
            damping: 0.1,
            rotation_sensitivity: 1.0,
            zoom_speed: 0.1,
        }
    }

    /// Applies a drag of `delta` dots to the goal
    pub fn rotate(&mut self, delta: Vec2) {
        let step = RADIANS_PER_DOT * self.rotation_sensitivity;
        self.target_yaw -= delta.x * step;
        self.target_elevation =
            (self.target_elevation + delta.y * step).clamp(MIN_ELEVATION, MAX_ELEVATION);
    }

    /// Applies `scroll` wheel units to the goal; positive zooms in
    pub fn zoom(&mut self, scroll: f32) {
        let factor = (1.0 - scroll * self.zoom_speed).max(0.1);
        self.target_distance =
            (self.target_distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Moves the current values one damping step toward the goal
    pub fn step(&mut self) {
        self.yaw = self.yaw.lerp(self.target_yaw, self.damping);
        self.elevation = self.elevation.lerp(self.target_elevation, self.damping);
        self.distance = self.distance.lerp(self.target_distance, self.damping);
    }

    /// World-space camera position for the current values
    pub fn position(&self) -> Vec3 {
        let horizontal = self.distance * self.elevation.cos();
        self.focus
            + Vec3::new(
                horizontal * self.yaw.sin(),
                self.distance * self.elevation.sin(),
                horizontal * self.yaw.cos(),
            )
    }
}

/// Camera, clear color and lights sized for the configured board
pub fn setup_scene(mut commands: Commands, config: Res<ViewerConfig>) {
    let dimension = config.board_geometry().dimension();
    let colors = config.colors.resolve();

    commands.insert_resource(ClearColor(colors.background));
    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_translation(KEY_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("Key Light"),
    ));

    let position = Vec3::new(0.0, 0.8 * dimension, 1.1 * dimension);
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::from_position(position, Vec3::ZERO, dimension),
        Name::new("Main Camera"),
    ));

    info!(
        "[CAMERA] Camera at {:?} framing a {}x{} board",
        position, dimension, dimension
    );
}

/// Turns right-drag and wheel input into orbit goals
pub fn orbit_input_system(
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut cameras: Query<&mut OrbitCamera>,
) {
    let dragging = mouse_button.pressed(MouseButton::Right) && mouse_motion.delta != Vec2::ZERO;
    let scrolling = mouse_scroll.delta.y != 0.0;
    if !dragging && !scrolling {
        return;
    }

    for mut orbit in &mut cameras {
        if dragging {
            orbit.rotate(mouse_motion.delta);
        }
        if scrolling {
            orbit.zoom(mouse_scroll.delta.y);
        }
    }
}

/// Eases every orbit camera toward its goal
pub fn orbit_apply_system(mut cameras: Query<(&mut Transform, &mut OrbitCamera)>) {
    for (mut transform, mut orbit) in &mut cameras {
        orbit.step();
        *transform = Transform::from_translation(orbit.position()).looking_at(orbit.focus, Vec3::Y);
    }
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<OrbitCamera>()
            .add_systems(Startup, setup_scene)
            .add_systems(Update, (orbit_input_system, orbit_apply_system).chain());
    }
}
