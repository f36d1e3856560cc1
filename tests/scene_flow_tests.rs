//! Integration tests for the load -> place -> select flow
//!
//! Runs the viewer plugins headless (no window, no renderer) against OBJ
//! files written to the temp directory, waits for the fetch tasks to settle
//! and checks the resulting scene.

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::transform::TransformPlugin;
use chessboard_viewer::assets::{
    AssetLoadingPlugin, AssetSource, AssetsSettled, LoadCoordinator, LoadProgressed, LoadingSystems,
};
use chessboard_viewer::core::{CorePlugin, ScenePhase, ViewerConfig};
use chessboard_viewer::input::{apply_selection_click, SelectionClick, SelectionPlugin, SelectionState};
use chessboard_viewer::rendering::{
    BoardPlugin, BoardRoot, Bounds3, NamingConvention, PieceColor, PieceKind, PiecePart,
    PiecePlugin, PlacedPiece, PlacementSummary, SceneMaterials, SkipReason, TemplateKeys,
};
use chessboard_viewer::ui::{StatusLine, StatusUiPlugin};
use std::path::PathBuf;
use std::time::Duration;

/// Axis-aligned box object whose base sits at `base_y`, as OBJ text
///
/// `first` is the 1-based index of the box's first vertex in the file.
fn box_object(name: &str, first: usize, half: f32, height: f32, base_y: f32) -> String {
    let (lo, hi) = (base_y, base_y + height);
    let mut text = format!("o {}\n", name);
    for (y, label) in [(lo, "bottom"), (hi, "top")] {
        text.push_str(&format!("# {}\n", label));
        for (x, z) in [(-half, -half), (half, -half), (half, half), (-half, half)] {
            text.push_str(&format!("v {} {} {}\n", x, y, z));
        }
    }
    let i = |k: usize| first + k - 1;
    for face in [
        [1, 2, 3, 4],
        [5, 6, 7, 8],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 4, 8, 7],
        [4, 1, 5, 8],
    ] {
        text.push_str(&format!(
            "f {} {} {} {}\n",
            i(face[0]),
            i(face[1]),
            i(face[2]),
            i(face[3])
        ));
    }
    text
}

/// A pieces pack with one box per template key, pivots 3 units below the base
fn pieces_obj(skip: &[&str]) -> String {
    let naming = NamingConvention::ColorPrefixed;
    let mut text = String::from("# generated pieces\nmtllib pieces.mtl\n");
    let mut first = 1;
    for color in [PieceColor::White, PieceColor::Black] {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            let name = naming.key(*kind, color);
            if skip.contains(&name.as_str()) {
                continue;
            }
            text.push_str(&box_object(&name, first, 0.5, 1.0 + i as f32 * 0.2, 3.0));
            first += 8;
        }
    }
    text
}

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("chessboard-viewer-{}", name));
    std::fs::write(&path, contents).unwrap();
    path
}

fn missing_path(name: &str) -> AssetSource {
    AssetSource::Path(std::env::temp_dir().join(format!("chessboard-viewer-missing-{}.obj", name)))
}

fn scene_app(config: ViewerConfig) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, TransformPlugin, StatesPlugin));
    app.init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .init_resource::<ButtonInput<MouseButton>>()
        .insert_resource(config);
    app.add_plugins((
        CorePlugin,
        StatusUiPlugin,
        AssetLoadingPlugin,
        BoardPlugin,
        PiecePlugin,
        SelectionPlugin,
    ));
    app
}

/// Updates until the scene has settled, plus a couple of frames for commands
fn run_until_settled(app: &mut App) {
    for _ in 0..1000 {
        app.update();
        if *app.world().resource::<State<ScenePhase>>().get() == ScenePhase::Settled {
            app.update();
            app.update();
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("scene never settled");
}

/// Load messages seen so far, in arrival order
#[derive(Resource, Default, Debug)]
struct LoadMessages {
    progressed: Vec<LoadProgressed>,
    settled: usize,
}

fn record_load_messages(
    mut progressed: MessageReader<LoadProgressed>,
    mut settled: MessageReader<AssetsSettled>,
    mut seen: ResMut<LoadMessages>,
) {
    seen.progressed.extend(progressed.read().cloned());
    seen.settled += settled.read().count();
}

fn placed_pieces(app: &mut App) -> Vec<(Entity, PlacedPiece)> {
    let mut query = app.world_mut().query::<(Entity, &PlacedPiece)>();
    query
        .iter(app.world())
        .map(|(entity, piece)| (entity, piece.clone()))
        .collect()
}

/// World-space box of every piece part
fn part_bounds(app: &mut App) -> Vec<Bounds3> {
    let mut query = app
        .world_mut()
        .query_filtered::<(&Mesh3d, &GlobalTransform), With<PiecePart>>();
    let meshes = app.world().resource::<Assets<Mesh>>();
    query
        .iter(app.world())
        .map(|(mesh, global)| {
            Bounds3::from_mesh(meshes.get(&mesh.0).unwrap())
                .unwrap()
                .transformed(&global.compute_transform())
        })
        .collect()
}

fn click(app: &mut App, ray: Option<Ray3d>) {
    let click = SelectionClick { ray };
    app.world_mut()
        .run_system_once((move || Some(click)).pipe(apply_selection_click))
        .unwrap();
}

fn part_material(app: &mut App, piece: Entity) -> Handle<StandardMaterial> {
    let children = app.world().get::<Children>(piece).unwrap();
    let part = children[0];
    app.world()
        .get::<MeshMaterial3d<StandardMaterial>>(part)
        .unwrap()
        .0
        .clone()
}

#[test]
fn test_missing_board_full_pieces_then_select_king() {
    //! Board fetch fails, pieces fetch succeeds with all twelve keys:
    //! a fallback 80x80 plane appears at Y = 0, 32 pieces stand on it,
    //! a downward click over e1 selects the White King and a click on
    //! empty space clears the selection again.
    let pieces = write_temp("flow-full.obj", &pieces_obj(&[]));
    let mut app = scene_app(ViewerConfig {
        board_source: missing_path("board-flow-full"),
        piece_sources: vec![AssetSource::Path(pieces.clone())],
        ..default()
    });
    run_until_settled(&mut app);
    let _ = std::fs::remove_file(&pieces);

    let coordinator = app.world().resource::<LoadCoordinator>();
    assert!(coordinator.is_settled());
    assert_eq!(coordinator.progress().completed, 2);

    // Fallback board
    let mut boards = app
        .world_mut()
        .query::<(&BoardRoot, &Mesh3d, &Transform)>();
    let (root, mesh, transform) = boards.single(app.world()).unwrap();
    assert!(root.fallback);
    assert_eq!(transform.translation, Vec3::ZERO);
    let plane = Bounds3::from_mesh(app.world().resource::<Assets<Mesh>>().get(&mesh.0).unwrap())
        .unwrap();
    assert!((plane.size() - Vec3::new(80.0, 0.0, 80.0)).length() < 1e-4);

    // 32 pieces resting on the board
    let pieces = placed_pieces(&mut app);
    assert_eq!(pieces.len(), 32);
    let bounds = part_bounds(&mut app);
    assert_eq!(bounds.len(), 32);
    for b in &bounds {
        assert!(b.min.y.abs() < 1e-3, "piece floats or sinks: min y {}", b.min.y);
    }
    assert_eq!(app.world().resource::<PlacementSummary>().placed, 32);

    // Select the White King from above e1
    let (king, _) = pieces
        .iter()
        .find(|(_, p)| p.kind == PieceKind::King && p.color == PieceColor::White)
        .cloned()
        .unwrap();
    let above_e1 = Vec3::new(5.0, 100.0, -35.0);
    click(&mut app, Some(Ray3d::new(above_e1, Dir3::NEG_Y)));

    let highlight = app.world().resource::<SceneMaterials>().highlight.clone();
    let light = app.world().resource::<SceneMaterials>().light_piece.clone();
    assert_eq!(app.world().resource::<SelectionState>().selected(), Some(king));
    assert_eq!(part_material(&mut app, king), highlight);
    let highlighted = pieces
        .iter()
        .filter(|(entity, _)| part_material(&mut app, *entity) == highlight)
        .count();
    assert_eq!(highlighted, 1);

    // Empty space clears it
    click(&mut app, Some(Ray3d::new(Vec3::new(500.0, 100.0, 500.0), Dir3::NEG_Y)));
    assert_eq!(app.world().resource::<SelectionState>().selected(), None);
    assert_eq!(part_material(&mut app, king), light);
}

#[test]
fn test_click_on_board_only_selects_nothing() {
    //! A ray that only meets the board (an empty square) never selects it.
    let pieces = write_temp("flow-board-click.obj", &pieces_obj(&[]));
    let mut app = scene_app(ViewerConfig {
        board_source: missing_path("board-flow-click"),
        piece_sources: vec![AssetSource::Path(pieces.clone())],
        ..default()
    });
    run_until_settled(&mut app);
    let _ = std::fs::remove_file(&pieces);

    // e4 is empty at the start
    click(&mut app, Some(Ray3d::new(Vec3::new(5.0, 100.0, -5.0), Dir3::NEG_Y)));
    assert_eq!(app.world().resource::<SelectionState>().selected(), None);

    // No ray at all (cursor outside the window) is also a click on nothing
    click(&mut app, None);
    assert_eq!(*app.world().resource::<SelectionState>(), SelectionState::Idle);
}

#[test]
fn test_missing_queen_template_places_31_pieces() {
    let pieces = write_temp("flow-no-queen.obj", &pieces_obj(&["White_Queen"]));
    let mut app = scene_app(ViewerConfig {
        board_source: missing_path("board-flow-no-queen"),
        piece_sources: vec![AssetSource::Path(pieces.clone())],
        ..default()
    });
    run_until_settled(&mut app);
    let _ = std::fs::remove_file(&pieces);

    let placed = placed_pieces(&mut app);
    assert_eq!(placed.len(), 31);
    assert!(!placed
        .iter()
        .any(|(_, p)| p.kind == PieceKind::Queen && p.color == PieceColor::White));

    let summary = app.world().resource::<PlacementSummary>();
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(
        summary.skipped[0].reason,
        SkipReason::MissingTemplate {
            key: "White_Queen".into()
        }
    );
}

#[test]
fn test_load_messages_report_every_attempt_and_settle_once() {
    //! One progress message when loading begins, one per attempt (failures
    //! name their source), and exactly one settle message for the load.
    let pieces = write_temp("flow-messages.obj", &pieces_obj(&[]));
    let board = missing_path("board-flow-messages");
    let mut app = scene_app(ViewerConfig {
        board_source: board.clone(),
        piece_sources: vec![AssetSource::Path(pieces.clone())],
        ..default()
    });
    app.init_resource::<LoadMessages>().add_systems(
        Update,
        record_load_messages.after(LoadingSystems::Poll),
    );
    run_until_settled(&mut app);
    for _ in 0..5 {
        app.update();
    }
    let _ = std::fs::remove_file(&pieces);

    let seen = app.world().resource::<LoadMessages>();
    assert_eq!(seen.settled, 1);

    let counts: Vec<(usize, usize)> = seen
        .progressed
        .iter()
        .map(|m| (m.progress.completed, m.progress.total))
        .collect();
    assert_eq!(counts, vec![(0, 2), (1, 2), (2, 2)]);
    assert_eq!(seen.progressed[0].failed, None);
    let failures: Vec<&AssetSource> = seen
        .progressed
        .iter()
        .filter_map(|m| m.failed.as_ref())
        .collect();
    assert_eq!(failures, vec![&board]);
}

#[test]
fn test_all_fetches_fail_reports_no_templates() {
    //! With neither file available the scene still settles: the fallback
    //! board is there, no piece is placed and the status line says why.
    let mut app = scene_app(ViewerConfig {
        board_source: missing_path("board-flow-none"),
        piece_sources: vec![missing_path("pieces-flow-none")],
        ..default()
    });
    run_until_settled(&mut app);

    assert!(placed_pieces(&mut app).is_empty());
    let status = app.world().resource::<StatusLine>();
    assert_eq!(status.message(), "No piece templates loaded, cannot place pieces.");
    assert!(status.is_visible());

    let mut boards = app.world_mut().query::<&BoardRoot>();
    assert!(boards.single(app.world()).unwrap().fallback);
}

#[test]
fn test_loaded_board_is_normalized_onto_canonical_footprint() {
    //! A 4x4 box board, 1 unit tall and authored 20 units below the origin,
    //! is scaled to span 80 units and lifted so its base lies on Y = 0.
    let board = write_temp("flow-board.obj", &box_object("Board", 1, 2.0, 1.0, -20.0));
    let pieces = write_temp("flow-board-pieces.obj", &pieces_obj(&[]));
    let mut app = scene_app(ViewerConfig {
        board_source: AssetSource::Path(board.clone()),
        piece_sources: vec![AssetSource::Path(pieces.clone())],
        ..default()
    });
    run_until_settled(&mut app);
    let _ = std::fs::remove_file(&board);
    let _ = std::fs::remove_file(&pieces);

    let mut roots = app.world_mut().query::<(Entity, &BoardRoot)>();
    let (root, board_root) = roots.single(app.world()).unwrap();
    assert!(!board_root.fallback);

    let part = app.world().get::<Children>(root).unwrap()[0];
    let mesh = app.world().get::<Mesh3d>(part).unwrap().0.clone();
    let global = app.world().get::<GlobalTransform>(part).unwrap().compute_transform();
    let bounds = Bounds3::from_mesh(app.world().resource::<Assets<Mesh>>().get(&mesh).unwrap())
        .unwrap()
        .transformed(&global);

    assert!((bounds.size().x - 80.0).abs() < 1e-3);
    assert!((bounds.size().z - 80.0).abs() < 1e-3);
    assert!(bounds.min.y.abs() < 1e-3);
    assert!(bounds.center().x.abs() < 1e-3 && bounds.center().z.abs() < 1e-3);
}
