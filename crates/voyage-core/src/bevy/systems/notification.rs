//! Notification sequencing system.

use bevy::prelude::*;

use crate::bevy::{
    DismissNotificationsEvent, NotificationQueue, NotificationsCompleteEvent, PresentationClock,
};
use crate::notify::SequencerEvent;

/// Advance the toast sequence and announce its completion.
pub fn tick_notifications(
    clock: Res<PresentationClock>,
    mut queue: ResMut<NotificationQueue>,
    mut dismiss_events: MessageReader<DismissNotificationsEvent>,
    mut complete_events: MessageWriter<NotificationsCompleteEvent>,
) {
    if dismiss_events.read().count() > 0 {
        queue.0.cancel();
    }

    let shown = queue.0.indicator().total;
    for event in queue.0.tick(clock.now_ms()) {
        match event {
            SequencerEvent::Advanced(index) => {
                tracing::debug!("[notify] showing item {}/{}", index + 1, shown);
            }
            SequencerEvent::Exiting => {
                tracing::debug!("[notify] last item exiting");
            }
            SequencerEvent::Completed => {
                tracing::info!("[notify] sequence of {} complete", shown);
                complete_events.write(NotificationsCompleteEvent { shown });
            }
        }
    }
}
