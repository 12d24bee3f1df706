//! Bevy plugins for the voyage presentation.
//!
//! Provides:
//! - `VoyageHeadlessPlugin`: Logic-only plugin (no rendering/window dependencies) for headless testing
//! - `VoyagePresentationPlugin`: `VoyageHeadlessPlugin` + camera, lights and tile meshes

use bevy::prelude::*;

use crate::bevy::components::{BoardTile, MainCamera};
use crate::bevy::events::*;
use crate::bevy::resources::*;
use crate::bevy::state_store::StateStores;
use crate::bevy::systems;
use crate::config::PresentationConfig;
use crate::game::{GameSnapshot, TileKind};

/// Whether the board is on screen and the ship is being followed.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhaseState {
    #[default]
    Inactive,
    Active,
}

impl PhaseState {
    pub fn from_snapshot(snapshot: Option<&GameSnapshot>) -> Self {
        if snapshot.is_some_and(|s| s.phase.is_active()) {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// Per-frame ordering. Every stage reads what the previous ones wrote.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PresentationSet {
    Input,
    Clock,
    Board,
    Camera,
    Notifications,
    Publish,
}

// ============================================================================
// Headless Plugin (logic only, no rendering/window dependencies)
// ============================================================================

/// Headless plugin containing all presentation logic.
///
/// Use this plugin in tests with `MinimalPlugins` + `StatesPlugin` to run
/// the systems without a windowing or rendering backend.
#[derive(Default)]
pub struct VoyageHeadlessPlugin {
    pub config: PresentationConfig,
    pub command_queue: Option<CommandQueue>,
    pub state_stores: Option<StateStores>,
}

impl Plugin for VoyageHeadlessPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // States
        // ====================================================================
        app.init_state::<PhaseState>();

        // ====================================================================
        // Resources
        // ====================================================================
        let config = PresentationConfigRes(self.config);
        app.insert_resource(config.tracker())
            .insert_resource(config.notification_queue())
            .insert_resource(BoardPresenterRes(self.config.board))
            .insert_resource(config)
            .insert_resource(CurrentSnapshot::default())
            .insert_resource(ViewportClass::default())
            .insert_resource(PlayerAddress::default())
            .insert_resource(PresentationClock::default())
            .insert_resource(AchievementGateRes::default())
            .insert_resource(self.command_queue.clone().unwrap_or_default())
            .insert_resource(self.state_stores.clone().unwrap_or_default());

        // ====================================================================
        // Messages
        // ====================================================================
        app.add_message::<BoardChangedEvent>()
            .add_message::<AchievementsReceivedEvent>()
            .add_message::<DismissNotificationsEvent>()
            .add_message::<NotificationsCompleteEvent>()
            .add_message::<AchievementCheckRequestedEvent>();

        // ====================================================================
        // Systems
        // ====================================================================
        app.configure_sets(
            Update,
            (
                PresentationSet::Input,
                PresentationSet::Clock,
                PresentationSet::Board,
                PresentationSet::Camera,
                PresentationSet::Notifications,
                PresentationSet::Publish,
            )
                .chain(),
        );

        app.add_systems(Startup, spawn_main_camera);

        app.add_systems(
            Update,
            (systems::process_commands, systems::sync_phase_state)
                .chain()
                .in_set(PresentationSet::Input),
        )
        .add_systems(
            Update,
            systems::advance_presentation_clock.in_set(PresentationSet::Clock),
        )
        .add_systems(
            Update,
            (systems::sync_board_tiles, systems::animate_board_tiles)
                .chain()
                .in_set(PresentationSet::Board),
        )
        .add_systems(
            Update,
            systems::track_camera.in_set(PresentationSet::Camera),
        )
        .add_systems(
            Update,
            (
                systems::accept_achievement_results,
                systems::tick_notifications,
            )
                .chain()
                .in_set(PresentationSet::Notifications),
        )
        .add_systems(
            Update,
            (
                systems::request_achievement_checks,
                systems::sync_notifications_to_store,
            )
                .in_set(PresentationSet::Publish),
        );

        app.add_systems(OnEnter(PhaseState::Active), systems::show_board_tiles)
            .add_systems(OnEnter(PhaseState::Inactive), systems::hide_board_tiles);

        // WASM exit system
        #[cfg(target_arch = "wasm32")]
        app.add_systems(Update, crate::bevy::wasm_entry::check_exit_system);
    }
}

/// Spawns the camera entity the tracker drives. Rendering components are
/// added by [`VoyagePresentationPlugin`].
fn spawn_main_camera(mut commands: Commands, config: Res<PresentationConfigRes>) {
    let camera = &config.0.camera;
    commands.spawn((
        MainCamera,
        Transform::from_translation(camera.neutral_eye())
            .looking_at(camera.neutral_look_at(), Vec3::Y),
    ));
    tracing::info!("[voyage] main camera spawned");
}

// ============================================================================
// Presentation Plugin (headless + rendering)
// ============================================================================

/// Full plugin for the browser: headless logic plus the 3D scene.
#[derive(Default)]
pub struct VoyagePresentationPlugin {
    pub config: PresentationConfig,
    pub command_queue: Option<CommandQueue>,
    pub state_stores: Option<StateStores>,
}

impl VoyagePresentationPlugin {
    pub fn new(
        config: PresentationConfig,
        command_queue: CommandQueue,
        state_stores: StateStores,
    ) -> Self {
        Self {
            config,
            command_queue: Some(command_queue),
            state_stores: Some(state_stores),
        }
    }
}

impl Plugin for VoyagePresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(VoyageHeadlessPlugin {
            config: self.config,
            command_queue: self.command_queue.clone(),
            state_stores: self.state_stores.clone(),
        });

        app.add_systems(Startup, setup_scene.after(spawn_main_camera));
        app.add_systems(
            Update,
            attach_tile_meshes
                .after(systems::sync_board_tiles)
                .in_set(PresentationSet::Board),
        );
    }
}

/// Shared mesh and per-kind materials for board tiles.
#[derive(Resource)]
struct TileAssets {
    mesh: Handle<Mesh>,
    start: Handle<StandardMaterial>,
    safe: Handle<StandardMaterial>,
    hazard: Handle<StandardMaterial>,
    bonus: Handle<StandardMaterial>,
    penalty: Handle<StandardMaterial>,
    finish: Handle<StandardMaterial>,
}

impl TileAssets {
    fn material(&self, kind: TileKind) -> Handle<StandardMaterial> {
        match kind {
            TileKind::Start => self.start.clone(),
            TileKind::Safe => self.safe.clone(),
            TileKind::Hazard => self.hazard.clone(),
            TileKind::Bonus => self.bonus.clone(),
            TileKind::Penalty => self.penalty.clone(),
            TileKind::Finish => self.finish.clone(),
        }
    }
}

fn setup_scene(
    mut commands: Commands,
    config: Res<PresentationConfigRes>,
    cameras: Query<Entity, With<MainCamera>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for entity in &cameras {
        commands.entity(entity).insert(Camera3d::default());
    }

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(4.0, 12.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let size = config.0.board.layout.tile_size * 0.9;
    let mut material = |color: Color| materials.add(StandardMaterial::from(color));
    commands.insert_resource(TileAssets {
        mesh: meshes.add(Cuboid::new(size, size * 0.15, size)),
        start: material(Color::srgb(0.35, 0.55, 0.9)),
        safe: material(Color::srgb(0.75, 0.78, 0.82)),
        hazard: material(Color::srgb(0.9, 0.3, 0.25)),
        bonus: material(Color::srgb(0.95, 0.8, 0.25)),
        penalty: material(Color::srgb(0.6, 0.3, 0.75)),
        finish: material(Color::srgb(0.3, 0.85, 0.45)),
    });
    tracing::info!("[voyage] scene ready");
}

fn attach_tile_meshes(
    mut commands: Commands,
    assets: Option<Res<TileAssets>>,
    tiles: Query<(Entity, &BoardTile), Added<BoardTile>>,
) {
    let Some(assets) = assets else {
        return;
    };
    for (entity, board_tile) in &tiles {
        commands.entity(entity).insert((
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(assets.material(board_tile.tile.kind)),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bevy::state_store::NotificationSummary;
    use crate::bevy::test_utils::TestApp;
    use crate::camera::CameraProfiles;
    use crate::game::{GamePhase, Tile};
    use crate::notify::SequencerState;

    fn board(len: u32) -> Vec<Tile> {
        (0..len).map(|p| Tile::new(p, TileKind::Safe)).collect()
    }

    fn snapshot(phase: GamePhase, position: u32) -> GameSnapshot {
        GameSnapshot {
            phase,
            position,
            board: board(30),
            is_moving: false,
            instance: Some("game-1".to_string()),
        }
    }

    fn camera_transform(app: &mut TestApp) -> Transform {
        let world = app.world_mut();
        let mut query = world.query_filtered::<&Transform, With<MainCamera>>();
        *query.single(world).unwrap()
    }

    #[derive(Resource, Default)]
    struct CompletionCount(usize);

    fn count_completions(
        mut events: MessageReader<NotificationsCompleteEvent>,
        mut count: ResMut<CompletionCount>,
    ) {
        count.0 += events.read().count();
    }

    #[test]
    fn test_camera_settles_on_active_profile() {
        let mut app = TestApp::new();
        let neutral = camera_transform(&mut app).translation;

        app.set_snapshot(snapshot(GamePhase::Playing, 5));
        app.run_frames(400);

        let transform = camera_transform(&mut app);
        let expected = CameraProfiles::default().standard_active.height;
        assert_ne!(transform.translation, neutral);
        assert!((transform.translation.y - expected).abs() < 1e-2);
        // Looking down the board
        assert!(transform.forward().y < 0.0);
    }

    #[test]
    fn test_notifications_complete_once() {
        let mut app = TestApp::new();
        app.app
            .init_resource::<CompletionCount>()
            .add_systems(Update, count_completions.after(PresentationSet::Notifications));

        app.push_command(PresentationCommand::SetPlayerAddress {
            address: Some("0xabc".to_string()),
        });
        app.set_snapshot(snapshot(GamePhase::Playing, 3));
        app.set_snapshot(snapshot(GamePhase::Won, 29));

        let requests = app.stores().achievements.take_requests();
        assert_eq!(requests.len(), 1);
        let ticket = requests[0].ticket;

        // A stale answer is ignored
        app.push_command(PresentationCommand::SubmitAchievements {
            ticket: ticket + 99,
            ids: vec!["bogus".to_string()],
        });
        app.push_command(PresentationCommand::SubmitAchievements {
            ticket,
            ids: vec!["first_voyage".to_string(), "high_roller".to_string()],
        });
        app.update();

        let summary = app.stores().notifications.get_summary();
        assert_eq!(summary.current.as_deref(), Some("first_voyage"));
        assert!(summary.visible);
        assert_eq!(summary.total, 2);

        // 2 * 3500ms dwell + 400ms exit, at 50ms per frame
        app.run_frames(200);

        assert_eq!(app.world().resource::<CompletionCount>().0, 1);
        let summary: NotificationSummary = app.stores().notifications.get_summary();
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.state, SequencerState::Idle);
        assert!(!summary.visible);

        // Staying in the terminal phase does not request again
        assert!(app.stores().achievements.take_requests().is_empty());
    }

    #[test]
    fn test_dismiss_cancels_without_completion() {
        let mut app = TestApp::new();
        app.app
            .init_resource::<CompletionCount>()
            .add_systems(Update, count_completions.after(PresentationSet::Notifications));

        app.push_command(PresentationCommand::SetPlayerAddress {
            address: Some("0xabc".to_string()),
        });
        app.set_snapshot(snapshot(GamePhase::Playing, 3));
        app.set_snapshot(snapshot(GamePhase::Lost, 4));
        let ticket = app.stores().achievements.take_requests()[0].ticket;

        app.push_command(PresentationCommand::SubmitAchievements {
            ticket,
            ids: vec!["unlucky".to_string()],
        });
        app.update();
        app.push_command(PresentationCommand::DismissNotifications);
        app.run_frames(200);

        assert_eq!(app.world().resource::<CompletionCount>().0, 0);
        assert_eq!(app.stores().notifications.completed(), 0);
    }

    #[test]
    fn test_board_tiles_follow_phase() {
        let mut app = TestApp::new();
        app.set_snapshot(snapshot(GamePhase::Menu, 0));

        let world = app.world_mut();
        let mut query = world.query::<(&BoardTile, &Visibility)>();
        let tiles: Vec<_> = query.iter(world).collect();
        assert_eq!(tiles.len(), 30);
        assert!(tiles.iter().all(|(_, v)| **v == Visibility::Hidden));

        app.set_snapshot(snapshot(GamePhase::Playing, 12));
        app.update();

        let world = app.world_mut();
        let mut query = world.query::<(&BoardTile, &Visibility)>();
        assert!(query.iter(world).all(|(_, v)| *v == Visibility::Inherited));
        let highlighted: Vec<u32> = query
            .iter(world)
            .filter(|(t, _)| t.highlighted)
            .map(|(t, _)| t.tile.position)
            .collect();
        assert_eq!(highlighted, vec![12]);
        assert_eq!(world.resource::<State<PhaseState>>().get(), &PhaseState::Active);
    }

    #[test]
    fn test_new_board_replaces_tiles() {
        let mut app = TestApp::new();
        app.set_snapshot(snapshot(GamePhase::Playing, 0));
        let mut next = snapshot(GamePhase::Playing, 0);
        next.board = board(12);
        app.set_snapshot(next);
        app.update();

        let world = app.world_mut();
        let mut query = world.query::<&BoardTile>();
        assert_eq!(query.iter(world).count(), 12);
    }
}
