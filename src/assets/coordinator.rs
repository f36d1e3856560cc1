//! Load coordination - counting settled fetch attempts
//!
//! Every fetch attempt, successful or not, reports exactly once. When the
//! last expected attempt reports, the coordinator signals "all settled"
//! exactly once; that signal is what unlocks piece placement.
//!
//! The coordinator itself is plain state so it can be exercised without an
//! app. The loading systems turn its answers into [`LoadProgressed`] and
//! [`AssetsSettled`] messages and a transition to `ScenePhase::Settled`; the
//! transition applies on the following state-transition pass, so placement
//! never runs inside the frame that polled the last task.

use super::source::AssetSource;
use bevy::ecs::message::Message;
use bevy::prelude::*;

/// Counters for one scene load
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadCoordinator {
    attempts_total: usize,
    attempts_completed: usize,
    settled_fired: bool,
}

/// Snapshot of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub completed: usize,
    pub total: usize,
}

/// What a counter update means for the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadUpdate {
    pub progress: LoadProgress,
    /// True only for the single update that completes the load
    pub settled: bool,
}

impl LoadProgress {
    /// Status line text for these counters
    pub fn status_text(&self) -> String {
        format!("Loading... ({}/{})", self.completed, self.total)
    }
}

/// Progress notification, written when a load begins and after every attempt
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct LoadProgressed {
    pub progress: LoadProgress,
    /// Source of the attempt that just failed
    pub failed: Option<AssetSource>,
}

/// Written once per scene load when every attempt has concluded
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetsSettled(pub LoadProgress);

impl LoadCoordinator {
    /// Resets the counters for a new load of `attempts_total` fetches
    ///
    /// A load with zero attempts settles immediately.
    pub fn begin_load(&mut self, attempts_total: usize) -> LoadUpdate {
        self.attempts_total = attempts_total;
        self.attempts_completed = 0;
        self.settled_fired = attempts_total == 0;
        LoadUpdate {
            progress: self.progress(),
            settled: self.settled_fired,
        }
    }

    /// Records one settled attempt
    ///
    /// Reports beyond the expected total are ignored with a warning so the
    /// counters never exceed the total and the settled signal never repeats.
    pub fn attempt_completed(&mut self) -> LoadUpdate {
        if self.attempts_completed >= self.attempts_total {
            warn!(
                "[ASSETS] Extra attempt report ignored ({}/{} already settled)",
                self.attempts_completed, self.attempts_total
            );
            return LoadUpdate {
                progress: self.progress(),
                settled: false,
            };
        }

        self.attempts_completed += 1;
        let settled = !self.settled_fired && self.attempts_completed == self.attempts_total;
        if settled {
            self.settled_fired = true;
        }
        LoadUpdate {
            progress: self.progress(),
            settled,
        }
    }

    pub fn progress(&self) -> LoadProgress {
        LoadProgress {
            completed: self.attempts_completed,
            total: self.attempts_total,
        }
    }

    /// True once every expected attempt has reported
    pub fn is_settled(&self) -> bool {
        self.settled_fired
    }

    /// Status line text for the current counters
    pub fn status_text(&self) -> String {
        self.progress().status_text()
    }
}
