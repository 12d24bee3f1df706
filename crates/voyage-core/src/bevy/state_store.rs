//! Shared state stores for Bevy-Yew communication.
//!
//! Each store holds one slice of presentation state and a version counter,
//! so Yew hooks can poll cheaply and re-render only on change.

use std::sync::Arc;

use bevy::prelude::Resource;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::achievements::AchievementRequest;
use crate::notify::{NotificationSequencer, SequencerState};

/// What the toast overlay needs to render.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSummary {
    pub items: Vec<String>,
    pub current: Option<String>,
    pub index: usize,
    pub total: usize,
    pub visible: bool,
    pub state: SequencerState,
    /// Sequences completed so far.
    pub completed: u64,
}

impl NotificationSummary {
    pub fn from_sequencer(sequencer: &NotificationSequencer, completed: u64) -> Self {
        let indicator = sequencer.indicator();
        Self {
            items: sequencer.items().to_vec(),
            current: sequencer.current().map(str::to_string),
            index: indicator.current,
            total: indicator.total,
            visible: sequencer.is_visible(),
            state: sequencer.state(),
            completed,
        }
    }
}

#[derive(Debug, Default)]
pub struct NotificationStore {
    summary: RwLock<NotificationSummary>,
    version: RwLock<u64>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_summary(&self) -> NotificationSummary {
        self.summary.read().clone()
    }

    pub fn get_version(&self) -> u64 {
        *self.version.read()
    }

    pub fn completed(&self) -> u64 {
        self.summary.read().completed
    }

    /// Store `summary`, bumping the version only if it differs.
    pub fn set_summary(&self, summary: NotificationSummary) {
        let mut current = self.summary.write();
        if *current != summary {
            *current = summary;
            *self.version.write() += 1;
        }
    }
}

/// Achievement checks waiting to be picked up by the host.
#[derive(Debug, Default)]
pub struct AchievementRequestStore {
    pending: RwLock<Vec<AchievementRequest>>,
    version: RwLock<u64>,
}

impl AchievementRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, request: AchievementRequest) {
        self.pending.write().push(request);
        *self.version.write() += 1;
    }

    /// Take and clear all pending requests.
    pub fn take_requests(&self) -> Vec<AchievementRequest> {
        std::mem::take(&mut *self.pending.write())
    }

    pub fn get_version(&self) -> u64 {
        *self.version.read()
    }
}

/// All stores, cloned into the Bevy world and the WASM globals.
#[derive(Resource, Clone, Default)]
pub struct StateStores {
    pub notifications: Arc<NotificationStore>,
    pub achievements: Arc<AchievementRequestStore>,
}

impl StateStores {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SequencerTiming;

    #[test]
    fn test_version_bumps_only_on_change() {
        let store = NotificationStore::new();
        store.set_summary(NotificationSummary::default());
        assert_eq!(store.get_version(), 0);

        let summary = NotificationSummary {
            items: vec!["a".into()],
            current: Some("a".into()),
            total: 1,
            visible: true,
            ..Default::default()
        };
        store.set_summary(summary.clone());
        store.set_summary(summary);
        assert_eq!(store.get_version(), 1);
    }

    #[test]
    fn test_summary_keeps_last_item_while_exiting() {
        let mut sequencer = NotificationSequencer::new(SequencerTiming::default());
        sequencer.replace(vec!["first_voyage".into()], 0.0);
        sequencer.tick(3_500.0);

        let summary = NotificationSummary::from_sequencer(&sequencer, 0);
        assert_eq!(summary.state, SequencerState::Exiting);
        assert!(!summary.visible);
        assert_eq!(summary.current.as_deref(), Some("first_voyage"));
    }

    #[test]
    fn test_take_requests_clears() {
        let store = AchievementRequestStore::new();
        store.push(AchievementRequest {
            ticket: 1,
            player_address: "0x1".into(),
            instance: "g".into(),
        });
        assert_eq!(store.take_requests().len(), 1);
        assert!(store.take_requests().is_empty());
        assert_eq!(store.get_version(), 1);
    }
}
