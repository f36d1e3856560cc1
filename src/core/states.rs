//! Scene phase state machine
//!
//! The viewer has a single linear flow:
//!
//! ```text
//! [Loading] -> [Settled]
//! ```
//!
//! - **Loading**: board and piece fetches are in flight
//! - **Settled**: every fetch attempt concluded (success or failure); pieces
//!   are placed on entry and click selection becomes meaningful
//!
//! There is no way back to `Loading`; a new scene means a new app.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

/// Primary scene state
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, States, Reflect)]
pub enum ScenePhase {
    /// Asset fetches are outstanding
    #[default]
    Loading,

    /// All fetch attempts concluded
    Settled,
}

/// Returns true if the transition follows the linear scene flow
pub fn is_valid_phase_transition(from: ScenePhase, to: ScenePhase) -> bool {
    matches!((from, to), (ScenePhase::Loading, ScenePhase::Settled))
}

/// Logs every phase transition and flags the ones the flow does not allow
pub fn log_phase_transitions(mut transitions: MessageReader<StateTransitionEvent<ScenePhase>>) {
    for event in transitions.read() {
        match (event.exited, event.entered) {
            (Some(exited), Some(entered)) if is_valid_phase_transition(exited, entered) => {
                info!("[TRANSITION] {:?} -> {:?}", exited, entered);
            }
            (Some(exited), Some(entered)) => {
                error!("[TRANSITION] INVALID: {:?} -> {:?}", exited, entered);
            }
            (None, Some(entered)) => {
                info!("[TRANSITION] Initial phase: {:?}", entered);
            }
            _ => {}
        }
    }
}
