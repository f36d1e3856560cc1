//! Asset loading systems
//!
//! One fetch task per configured source (the board plus every pieces file)
//! runs on the `AsyncComputeTaskPool`. The poll system drains finished tasks,
//! announces each outcome as a [`ModelFetched`] message for the board and
//! piece plugins, and reports the attempt to the [`LoadCoordinator`]. The
//! attempt that completes the load moves the app to `ScenePhase::Settled`.
//!
//! Progress reaches the status line only through [`LoadProgressed`]: one
//! message when the load begins and one per finished attempt.

use super::coordinator::{AssetsSettled, LoadCoordinator, LoadProgressed, LoadUpdate};
use super::error::AssetResult;
use super::obj::ObjModel;
use super::source::AssetSource;
use crate::core::{ScenePhase, ViewerConfig};
use crate::ui::show_load_progress;
use bevy::ecs::message::Message;
use bevy::prelude::*;
use bevy::tasks::{block_on, AsyncComputeTaskPool, Task, TaskPool};
use futures::future::join_all;
use futures_lite::future;
use std::sync::Arc;

/// What a fetched model is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchRole {
    Board,
    Pieces,
}

/// Outcome of one fetch attempt; `model` is `None` when the attempt failed
#[derive(Message, Debug, Clone)]
pub struct ModelFetched {
    pub role: FetchRole,
    pub source: AssetSource,
    pub model: Option<Arc<ObjModel>>,
}

/// Ordering inside `Update`: consumers of [`ModelFetched`] run after the poll
/// that wrote it, within the same frame
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoadingSystems {
    Poll,
    Apply,
}

/// An in-flight fetch
#[derive(Component)]
pub struct FetchTask {
    pub role: FetchRole,
    pub source: AssetSource,
    task: Task<AssetResult<ObjModel>>,
}

pub struct AssetLoadingPlugin;

impl Plugin for AssetLoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadCoordinator>()
            .add_message::<ModelFetched>()
            .add_message::<LoadProgressed>()
            .add_message::<AssetsSettled>()
            .configure_sets(Update, (LoadingSystems::Poll, LoadingSystems::Apply).chain())
            .add_systems(Startup, start_asset_loading)
            .add_systems(
                Update,
                (
                    poll_fetch_tasks.in_set(LoadingSystems::Poll),
                    show_load_progress.in_set(LoadingSystems::Apply),
                )
                    .run_if(in_state(ScenePhase::Loading)),
            );
    }
}

/// Every fetch the configuration asks for, board first
pub fn planned_fetches(config: &ViewerConfig) -> Vec<(FetchRole, AssetSource)> {
    std::iter::once((FetchRole::Board, config.board_source.clone()))
        .chain(
            config
                .piece_sources
                .iter()
                .map(|source| (FetchRole::Pieces, source.clone())),
        )
        .collect()
}

/// Starts every fetch and primes the coordinator
pub fn start_asset_loading(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    mut coordinator: ResMut<LoadCoordinator>,
    mut progressed: MessageWriter<LoadProgressed>,
    mut settled: MessageWriter<AssetsSettled>,
    mut next_phase: ResMut<NextState<ScenePhase>>,
) {
    let fetches = planned_fetches(&config);
    let update = coordinator.begin_load(fetches.len());
    progressed.write(LoadProgressed {
        progress: update.progress,
        failed: None,
    });
    info!("[ASSETS] Starting {} fetches", fetches.len());

    let pool = AsyncComputeTaskPool::get_or_init(TaskPool::new);
    for (role, source) in fetches {
        let fetch_source = source.clone();
        let task = pool.spawn(async move { fetch_source.fetch_model().await });
        commands.spawn((
            FetchTask { role, source, task },
            Name::new(format!("Fetch {:?}", role)),
        ));
    }

    if update.settled {
        finish_load(update, &mut settled, &mut next_phase);
    }
}

/// Drains finished fetch tasks and reports them
pub fn poll_fetch_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut FetchTask)>,
    mut coordinator: ResMut<LoadCoordinator>,
    mut fetched: MessageWriter<ModelFetched>,
    mut progressed: MessageWriter<LoadProgressed>,
    mut settled: MessageWriter<AssetsSettled>,
    mut next_phase: ResMut<NextState<ScenePhase>>,
) {
    for (entity, mut fetch) in &mut tasks {
        let Some(result) = block_on(future::poll_once(&mut fetch.task)) else {
            continue;
        };
        commands.entity(entity).despawn();

        let model = match result {
            Ok(model) => {
                info!(
                    "[ASSETS] Loaded {} ({} objects, {} vertices)",
                    fetch.source,
                    model.objects.len(),
                    model.vertex_count()
                );
                Some(Arc::new(model))
            }
            Err(e) => {
                error!("[ASSETS] {}", e);
                None
            }
        };

        let failed = model.is_none().then(|| fetch.source.clone());
        fetched.write(ModelFetched {
            role: fetch.role,
            source: fetch.source.clone(),
            model,
        });

        let update = coordinator.attempt_completed();
        progressed.write(LoadProgressed {
            progress: update.progress,
            failed,
        });

        if update.settled {
            finish_load(update, &mut settled, &mut next_phase);
        }
    }
}

fn finish_load(
    update: LoadUpdate,
    settled: &mut MessageWriter<AssetsSettled>,
    next_phase: &mut NextState<ScenePhase>,
) {
    info!(
        "[ASSETS] All {} fetch attempts settled",
        update.progress.total
    );
    settled.write(AssetsSettled(update.progress));
    next_phase.set(ScenePhase::Settled);
}

/// Fetches every source concurrently outside the app, in input order
///
/// Used by the headless `inspect` command.
pub async fn fetch_all(sources: Vec<AssetSource>) -> Vec<(AssetSource, AssetResult<ObjModel>)> {
    let pool = AsyncComputeTaskPool::get_or_init(TaskPool::new);
    let fetches = sources.into_iter().map(|source| {
        let fetch_source = source.clone();
        let task = pool.spawn(async move { fetch_source.fetch_model().await });
        async move { (source, task.await) }
    });
    join_all(fetches).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planned_fetches_put_board_first() {
        let config = ViewerConfig {
            board_source: AssetSource::from("board.obj"),
            piece_sources: vec![AssetSource::from("a.obj"), AssetSource::from("b.obj")],
            ..default()
        };
        let fetches = planned_fetches(&config);
        assert_eq!(fetches.len(), config.attempts_total());
        assert_eq!(fetches[0], (FetchRole::Board, AssetSource::from("board.obj")));
        assert!(fetches[1..].iter().all(|(role, _)| *role == FetchRole::Pieces));
    }

    #[test]
    fn test_fetch_all_keeps_order_and_failures() {
        //! Every source yields exactly one outcome, in input order; a missing
        //! file is an error for that source only.
        let path = std::env::temp_dir().join("chessboard-viewer-fetch-all.obj");
        std::fs::write(&path, "o Pawn\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let sources = vec![
            AssetSource::Path(path.clone()),
            AssetSource::from("/no/such/pieces.obj"),
        ];
        let results = future::block_on(fetch_all(sources.clone()));
        let _ = std::fs::remove_file(&path);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, sources[0]);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
    }
}
