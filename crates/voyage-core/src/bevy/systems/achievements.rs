//! Achievement check systems.
//!
//! The check itself runs in the host page. These systems decide when to ask
//! for it and feed accepted results into the notification queue.

use bevy::prelude::*;

use crate::bevy::{
    AchievementCheckRequestedEvent, AchievementGateRes, AchievementsReceivedEvent,
    CurrentSnapshot, NotificationQueue, PlayerAddress, PresentationClock, StateStores,
};

/// Ask for a check when the round ends.
pub fn request_achievement_checks(
    snapshot: Res<CurrentSnapshot>,
    player: Res<PlayerAddress>,
    stores: Res<StateStores>,
    mut gate: ResMut<AchievementGateRes>,
    mut requested_events: MessageWriter<AchievementCheckRequestedEvent>,
) {
    let Some(snapshot) = snapshot.get() else {
        return;
    };
    let request = gate.0.observe(
        snapshot.phase,
        snapshot.instance.as_deref(),
        player.0.as_deref(),
    );
    if let Some(request) = request {
        stores.achievements.push(request.clone());
        requested_events.write(AchievementCheckRequestedEvent { request });
    }
}

/// Start the toast sequence with a result whose ticket is still current.
pub fn accept_achievement_results(
    clock: Res<PresentationClock>,
    mut received_events: MessageReader<AchievementsReceivedEvent>,
    mut gate: ResMut<AchievementGateRes>,
    mut queue: ResMut<NotificationQueue>,
) {
    for event in received_events.read() {
        if let Some(ids) = gate.0.accept(event.ticket, event.ids.clone()) {
            tracing::info!("[achievements] {} unlocked", ids.len());
            queue.0.replace(ids, clock.now_ms());
        }
    }
}
