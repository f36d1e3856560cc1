//! Status line overlay
//!
//! A single line of text in the top-left corner reporting load progress,
//! fetch failures and placement. Load progress arrives as
//! [`LoadProgressed`] messages, placement writes to the [`StatusLine`]
//! resource directly; the UI node mirrors it whenever it changes.

use crate::assets::LoadProgressed;
use bevy::prelude::*;
use std::time::Duration;

/// Current status message and its visibility
#[derive(Resource, Debug, Clone, Default)]
pub struct StatusLine {
    message: String,
    visible: bool,
    hide_timer: Option<Timer>,
}

impl StatusLine {
    /// Shows `message`, cancelling any pending hide
    pub fn show(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.visible = true;
        self.hide_timer = None;
        debug!("[STATUS] {}", self.message);
    }

    /// Hides the line once `secs` have elapsed
    pub fn hide_after(&mut self, secs: f32) {
        self.hide_timer = Some(Timer::from_seconds(secs.max(0.0), TimerMode::Once));
    }

    /// Advances the hide timer; true when this call hid the line
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(timer) = self.hide_timer.as_mut() else {
            return false;
        };
        if !timer.tick(delta).is_finished() {
            return false;
        }
        self.hide_timer = None;
        self.visible = false;
        true
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hide_pending(&self) -> bool {
        self.hide_timer.is_some()
    }
}

/// Root node of the overlay
#[derive(Component)]
pub struct StatusPanel;

/// Text entity showing the message
#[derive(Component)]
pub struct StatusText;

pub fn spawn_status_ui(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            Visibility::Hidden,
            StatusPanel,
            Name::new("Status Line"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                StatusText,
            ));
        });
}

/// Shows the latest load progress, or the source whose fetch just failed
pub fn show_load_progress(
    mut progressed: MessageReader<LoadProgressed>,
    mut status: ResMut<StatusLine>,
) {
    let Some(latest) = progressed.read().last() else {
        return;
    };
    match &latest.failed {
        Some(source) => status.show(format!("Error loading: {}", source)),
        None => status.show(latest.progress.status_text()),
    }
}

pub fn tick_status_line(time: Res<Time>, mut status: ResMut<StatusLine>) {
    if !status.is_hide_pending() {
        return;
    }
    if status.tick(time.delta()) {
        debug!("[STATUS] Hidden");
    }
}

/// Copies the resource into the overlay when it changed
pub fn sync_status_ui(
    status: Res<StatusLine>,
    mut panels: Query<&mut Visibility, With<StatusPanel>>,
    mut texts: Query<&mut Text, With<StatusText>>,
) {
    if !status.is_changed() {
        return;
    }
    for mut visibility in &mut panels {
        *visibility = if status.is_visible() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    for mut text in &mut texts {
        **text = status.message().to_string();
    }
}

pub struct StatusUiPlugin;

impl Plugin for StatusUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StatusLine>()
            .add_systems(Startup, spawn_status_ui)
            .add_systems(PostUpdate, (tick_status_line, sync_status_ui).chain());
    }
}
