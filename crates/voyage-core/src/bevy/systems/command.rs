//! Command processing system.
//!
//! Processes commands from the JavaScript/WASM interface.

use bevy::prelude::*;

use crate::bevy::{
    AchievementsReceivedEvent, BoardChangedEvent, CommandQueue, CurrentSnapshot,
    DismissNotificationsEvent, PhaseState, PlayerAddress, PresentationCommand, ViewportClass,
};

/// Drain the external command queue.
pub fn process_commands(
    command_queue: Res<CommandQueue>,
    mut snapshot: ResMut<CurrentSnapshot>,
    mut viewport: ResMut<ViewportClass>,
    mut player: ResMut<PlayerAddress>,
    mut board_events: MessageWriter<BoardChangedEvent>,
    mut achievement_events: MessageWriter<AchievementsReceivedEvent>,
    mut dismiss_events: MessageWriter<DismissNotificationsEvent>,
) {
    for command in command_queue.drain() {
        match command {
            PresentationCommand::SetSnapshot { snapshot: next } => {
                let board_changed = snapshot.get().is_none_or(|prev| prev.board != next.board);
                if board_changed {
                    tracing::info!("[command] SetSnapshot: new board with {} tiles", next.board.len());
                    board_events.write(BoardChangedEvent {
                        tiles: next.board.len(),
                    });
                }
                snapshot.0 = Some(next);
            }
            PresentationCommand::SetDeviceClass { device } => {
                tracing::info!("[command] SetDeviceClass: {:?}", device);
                viewport.0 = device;
            }
            PresentationCommand::SetPlayerAddress { address } => {
                tracing::info!("[command] SetPlayerAddress: {:?}", address);
                player.0 = address;
            }
            PresentationCommand::SubmitAchievements { ticket, ids } => {
                tracing::info!("[command] SubmitAchievements: ticket={} ({} ids)", ticket, ids.len());
                achievement_events.write(AchievementsReceivedEvent { ticket, ids });
            }
            PresentationCommand::DismissNotifications => {
                tracing::info!("[command] DismissNotifications");
                dismiss_events.write(DismissNotificationsEvent);
            }
        }
    }
}

/// Mirror the snapshot phase into [`PhaseState`].
pub fn sync_phase_state(
    snapshot: Res<CurrentSnapshot>,
    state: Res<State<PhaseState>>,
    mut next_state: ResMut<NextState<PhaseState>>,
) {
    let target = PhaseState::from_snapshot(snapshot.get());
    if *state.get() != target {
        tracing::info!("[voyage] phase state {:?} -> {:?}", state.get(), target);
        next_state.set(target);
    }
}
