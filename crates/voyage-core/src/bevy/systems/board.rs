//! Board tile systems.
//!
//! Tile entities are rebuilt whenever the snapshot carries a new board and
//! are repositioned every frame from the layout plus their idle motion.
//! Meshes are attached by the rendering plugin.

use bevy::prelude::*;

use crate::bevy::{
    BoardChangedEvent, BoardPresenterRes, BoardTile, CurrentSnapshot, PhaseState,
    PresentationClock,
};

fn tile_visibility(phase: PhaseState) -> Visibility {
    match phase {
        PhaseState::Active => Visibility::Inherited,
        PhaseState::Inactive => Visibility::Hidden,
    }
}

/// Despawn the old tiles and spawn one entity per tile of the new board.
pub fn sync_board_tiles(
    mut commands: Commands,
    mut board_events: MessageReader<BoardChangedEvent>,
    snapshot: Res<CurrentSnapshot>,
    presenter: Res<BoardPresenterRes>,
    phase: Res<State<PhaseState>>,
    existing: Query<Entity, With<BoardTile>>,
) {
    // Several changes in one frame collapse into one rebuild
    if board_events.read().last().is_none() {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let Some(snapshot) = snapshot.get() else {
        return;
    };
    let visibility = tile_visibility(*phase.get());
    for tile in &snapshot.board {
        let origin = presenter.0.layout.tile_origin(tile.position);
        commands.spawn((
            BoardTile::new(tile.clone()),
            Transform::from_translation(origin),
            visibility,
        ));
    }
    tracing::info!("[voyage] spawned {} board tiles", snapshot.board.len());
}

/// Apply layout and idle motion to every tile.
pub fn animate_board_tiles(
    clock: Res<PresentationClock>,
    snapshot: Res<CurrentSnapshot>,
    presenter: Res<BoardPresenterRes>,
    mut tiles: Query<(&mut BoardTile, &mut Transform)>,
) {
    let elapsed = clock.tick().elapsed_secs();
    let occupied = snapshot.position();

    for (mut board_tile, mut transform) in &mut tiles {
        let is_occupied = occupied == Some(board_tile.tile.position);
        let presentation = presenter.0.present(&board_tile.tile, is_occupied, elapsed);
        transform.translation = presentation.translation;
        if board_tile.highlighted != presentation.decor.highlighted {
            board_tile.highlighted = presentation.decor.highlighted;
        }
    }
}

pub fn show_board_tiles(mut tiles: Query<&mut Visibility, With<BoardTile>>) {
    for mut visibility in &mut tiles {
        *visibility = tile_visibility(PhaseState::Active);
    }
}

pub fn hide_board_tiles(mut tiles: Query<&mut Visibility, With<BoardTile>>) {
    for mut visibility in &mut tiles {
        *visibility = tile_visibility(PhaseState::Inactive);
    }
}
