//! ECS messages for the presentation app.
//!
//! Note: In Bevy 0.18+, buffered events use the Message trait instead of Event.

use bevy::prelude::*;

use crate::achievements::AchievementRequest;

/// The board in the snapshot changed and tile entities must be rebuilt.
#[derive(Message, Debug, Clone)]
pub struct BoardChangedEvent {
    pub tiles: usize,
}

/// Result of an external achievement check arrived.
#[derive(Message, Debug, Clone)]
pub struct AchievementsReceivedEvent {
    pub ticket: u64,
    pub ids: Vec<String>,
}

/// Stop the notification sequence without completing it.
#[derive(Message, Debug, Clone, Default)]
pub struct DismissNotificationsEvent;

/// Fired exactly once when a notification sequence finishes its exit.
#[derive(Message, Debug, Clone)]
pub struct NotificationsCompleteEvent {
    /// Number of notifications that were shown.
    pub shown: usize,
}

/// An achievement check should be run by the host.
#[derive(Message, Debug, Clone)]
pub struct AchievementCheckRequestedEvent {
    pub request: AchievementRequest,
}
