//! Core plugin for the chessboard viewer
//!
//! Provides fundamental application setup:
//! - Panic hook that reports the current scene phase
//! - [`ViewerConfig`] resource (defaults unless the binary inserted one)
//! - [`ScenePhase`] state and transition logging
//!
//! # Plugin Order
//!
//! Add [`CorePlugin`] after `DefaultPlugins` (it needs the state plugin) and
//! before every other viewer plugin; they all read [`ViewerConfig`].

use super::{config::ViewerConfig, states::log_phase_transitions, ScenePhase};
use bevy::prelude::*;
use std::panic;
use std::sync::{Mutex, OnceLock};

/// Last known phase, readable from the panic hook outside ECS context
static PANIC_PHASE_TRACKER: OnceLock<Mutex<Option<ScenePhase>>> = OnceLock::new();

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<ViewerConfig>() {
            info!("[CORE] No ViewerConfig inserted, using defaults");
            app.insert_resource(ViewerConfig::default());
        }

        app.init_state::<ScenePhase>()
            .register_type::<ScenePhase>()
            .add_systems(Update, (log_phase_transitions, update_panic_phase_tracker));
    }

    fn finish(&self, _app: &mut App) {
        setup_panic_hook();
    }
}

/// Chains a hook in front of the default one that names the scene phase
fn setup_panic_hook() {
    PANIC_PHASE_TRACKER.get_or_init(|| Mutex::new(None));

    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let phase = PANIC_PHASE_TRACKER
            .get()
            .and_then(|tracker| tracker.lock().ok().and_then(|phase| *phase))
            .map(|phase| format!("{:?}", phase))
            .unwrap_or_else(|| "<unknown>".to_string());

        eprintln!("[PANIC] Scene phase at panic: {}", phase);
        default_hook(panic_info);
    }));
}

fn update_panic_phase_tracker(phase: Option<Res<State<ScenePhase>>>) {
    let (Some(tracker), Some(phase)) = (PANIC_PHASE_TRACKER.get(), phase) else {
        return;
    };
    if let Ok(mut slot) = tracker.lock() {
        *slot = Some(*phase.get());
    }
}
