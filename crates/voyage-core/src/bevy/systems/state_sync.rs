//! State synchronization systems.
//!
//! Syncs Bevy ECS state to the shared stores for Yew UI access.

use bevy::prelude::*;

use crate::bevy::{NotificationQueue, NotificationSummary, NotificationsCompleteEvent, StateStores};

/// Publish the toast state. Runs every frame; the store only bumps its
/// version when something changed.
pub fn sync_notifications_to_store(
    queue: Res<NotificationQueue>,
    stores: Res<StateStores>,
    mut complete_events: MessageReader<NotificationsCompleteEvent>,
) {
    let completed = stores.notifications.completed() + complete_events.read().count() as u64;
    stores
        .notifications
        .set_summary(NotificationSummary::from_sequencer(&queue.0, completed));
}
