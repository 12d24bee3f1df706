//! ECS resources for the presentation app.

use std::collections::VecDeque;
use std::sync::Arc;

use bevy::prelude::*;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::achievements::AchievementGate;
use crate::board::BoardPresenter;
use crate::camera::CameraTracker;
use crate::clock::{FrameClock, Tick};
use crate::config::PresentationConfig;
use crate::game::{DeviceClass, GameSnapshot};
use crate::notify::NotificationSequencer;

/// Latest game-state snapshot from the external store.
#[derive(Resource, Debug, Clone, Default)]
pub struct CurrentSnapshot(pub Option<GameSnapshot>);

impl CurrentSnapshot {
    pub fn get(&self) -> Option<&GameSnapshot> {
        self.0.as_ref()
    }

    /// Ship position, if a snapshot exists.
    pub fn position(&self) -> Option<u32> {
        self.0.as_ref().map(|s| s.position)
    }
}

/// Viewport class reported by the host page.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ViewportClass(pub DeviceClass);

/// Wallet address of the local player, used to key achievement checks.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerAddress(pub Option<String>);

/// Presentation time, advanced once per frame from Bevy's virtual clock.
#[derive(Resource, Debug, Clone, Default)]
pub struct PresentationClock {
    clock: FrameClock,
    tick: Tick,
}

impl PresentationClock {
    pub fn advance(&mut self, delta_ms: f64) -> Tick {
        self.tick = self.clock.advance_by(delta_ms);
        self.tick
    }

    /// The tick of the current frame.
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn now_ms(&self) -> f64 {
        self.tick.elapsed_ms
    }
}

#[derive(Resource, Debug, Clone)]
pub struct CameraTrackerRes(pub CameraTracker);

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct BoardPresenterRes(pub BoardPresenter);

#[derive(Resource, Debug, Clone, Default)]
pub struct NotificationQueue(pub NotificationSequencer);

#[derive(Resource, Debug, Clone, Default)]
pub struct AchievementGateRes(pub AchievementGate);

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PresentationConfigRes(pub PresentationConfig);

impl PresentationConfigRes {
    /// Fresh per-app state built from this configuration.
    pub fn tracker(&self) -> CameraTrackerRes {
        CameraTrackerRes(CameraTracker::new(self.0.camera, self.0.board.layout))
    }

    pub fn notification_queue(&self) -> NotificationQueue {
        NotificationQueue(NotificationSequencer::new(self.0.notifications))
    }
}

/// Commands that can be sent from JavaScript to the Bevy app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationCommand {
    /// Replace the game-state snapshot.
    SetSnapshot { snapshot: GameSnapshot },
    SetDeviceClass { device: DeviceClass },
    SetPlayerAddress { address: Option<String> },
    /// Answer to an achievement check, echoing the request's ticket.
    SubmitAchievements { ticket: u64, ids: Vec<String> },
    /// Stop the notification sequence without completing it.
    DismissNotifications,
}

/// Thread-safe command queue for WASM interop.
///
/// JavaScript pushes commands that Bevy systems drain on the next frame.
#[derive(Resource, Clone, Default)]
pub struct CommandQueue {
    inner: Arc<Mutex<VecDeque<PresentationCommand>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: PresentationCommand) {
        self.inner.lock().push_back(command);
    }

    pub fn drain(&self) -> Vec<PresentationCommand> {
        self.inner.lock().drain(..).collect()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GamePhase;

    #[test]
    fn test_command_json() {
        let json = r#"{"type":"submit_achievements","ticket":3,"ids":["first_voyage"]}"#;
        let command: PresentationCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            command,
            PresentationCommand::SubmitAchievements {
                ticket: 3,
                ids: vec!["first_voyage".to_string()],
            }
        );

        let json = r#"{"type":"set_snapshot","snapshot":{"phase":"playing","position":2}}"#;
        let PresentationCommand::SetSnapshot { snapshot } = serde_json::from_str(json).unwrap()
        else {
            panic!("expected set_snapshot");
        };
        assert_eq!(snapshot.phase, GamePhase::Playing);
        assert!(snapshot.board.is_empty());
    }

    #[test]
    fn test_queue_is_shared_between_clones() {
        let queue = CommandQueue::new();
        let js_side = queue.clone();
        js_side.push(PresentationCommand::DismissNotifications);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain(), vec![PresentationCommand::DismissNotifications]);
        assert!(js_side.is_empty());
    }
}
