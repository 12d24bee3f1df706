//! Camera tracking for the 3D board view.
//!
//! Every tick the tracker picks a target pose from the game phase, the device
//! class and the ship's tile, then eases the live pose toward it:
//! - Horizontal position follows a smoothed accumulator of the ship's lane.
//! - Height and depth come from one of four fixed profiles.
//! - The look-at point snaps to its target; smoothing it produced judder.
//! - A vertical bob is layered on top while the ship moves and is never
//!   written back into the pose.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::board::{BoardLayout, visible_tiles};
use crate::clock::Tick;
use crate::game::{DeviceClass, GameSnapshot};

/// Fixed framing for one (device, phase activity) combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraProfile {
    /// Eye height while the ship is idle.
    pub height: f32,
    /// Eye height while the ship is moving.
    pub moving_height: f32,
    /// Eye distance behind the ship's tile.
    pub depth: f32,
    /// How far ahead of the ship the camera looks.
    pub look_ahead: f32,
}

/// Lookup key for [`CameraProfiles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileKey {
    pub device: DeviceClass,
    pub active: bool,
}

/// The four framing profiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraProfiles {
    pub compact_idle: CameraProfile,
    pub compact_active: CameraProfile,
    pub standard_idle: CameraProfile,
    pub standard_active: CameraProfile,
}

impl Default for CameraProfiles {
    fn default() -> Self {
        Self {
            compact_idle: CameraProfile {
                height: 18.0,
                moving_height: 18.0,
                depth: 20.0,
                look_ahead: 6.0,
            },
            compact_active: CameraProfile {
                height: 9.0,
                moving_height: 11.5,
                depth: 12.0,
                look_ahead: 4.0,
            },
            standard_idle: CameraProfile {
                height: 14.0,
                moving_height: 14.0,
                depth: 16.0,
                look_ahead: 6.0,
            },
            standard_active: CameraProfile {
                height: 7.0,
                moving_height: 9.0,
                depth: 9.0,
                look_ahead: 4.0,
            },
        }
    }
}

impl CameraProfiles {
    pub fn lookup(&self, key: ProfileKey) -> CameraProfile {
        match (key.device, key.active) {
            (DeviceClass::Compact, false) => self.compact_idle,
            (DeviceClass::Compact, true) => self.compact_active,
            (DeviceClass::Standard, false) => self.standard_idle,
            (DeviceClass::Standard, true) => self.standard_active,
        }
    }
}

/// Tracker tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraSettings {
    /// Exponential smoothing rate per second.
    pub smoothing: f32,
    /// Largest `dt` (seconds) fed into the smoothing step.
    pub max_dt: f32,
    pub bob_amplitude: f32,
    /// Angular frequency of the bob in rad/s.
    pub bob_frequency: f32,
    /// Half-width of the lane jitter added to the ship's x.
    pub jitter_amplitude: f32,
    pub visible_behind: u32,
    pub visible_ahead: u32,
    pub neutral_eye: [f32; 3],
    pub neutral_look_at: [f32; 3],
    pub profiles: CameraProfiles,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            smoothing: 1.5,
            max_dt: 0.1,
            bob_amplitude: 0.15,
            bob_frequency: 6.0,
            jitter_amplitude: 0.6,
            visible_behind: 3,
            visible_ahead: 6,
            neutral_eye: [0.0, 16.0, 18.0],
            neutral_look_at: [0.0, 0.0, 0.0],
            profiles: CameraProfiles::default(),
        }
    }
}

impl CameraSettings {
    pub fn neutral_eye(&self) -> Vec3 {
        Vec3::from_array(self.neutral_eye)
    }

    pub fn neutral_look_at(&self) -> Vec3 {
        Vec3::from_array(self.neutral_look_at)
    }
}

/// Live camera state. Only [`CameraTracker`] writes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target_position: Vec3,
    pub look_at: Vec3,
    /// Smoothed horizontal offset that follows the ship's lane.
    pub smoothed_x: f32,
}

/// What the renderer receives for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub eye: Vec3,
    pub look_at: Vec3,
}

/// Deterministic lane offset in `[-amplitude, amplitude]` for a ship at
/// `position` occupying `slot` among the visible tiles.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn lane_jitter(position: u32, slot: usize, amplitude: f32) -> f32 {
    let mut h = position.wrapping_mul(0x9E37_79B9) ^ (slot as u32).wrapping_mul(0x85EB_CA6B);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    let unit = (h % 1001) as f32 / 1000.0;
    (unit * 2.0 - 1.0) * amplitude
}

/// Follows the ship across the board.
#[derive(Debug, Clone)]
pub struct CameraTracker {
    settings: CameraSettings,
    layout: BoardLayout,
    pose: CameraPose,
    seeded: bool,
    was_active: bool,
}

impl CameraTracker {
    pub fn new(settings: CameraSettings, layout: BoardLayout) -> Self {
        Self {
            pose: Self::neutral_pose(&settings),
            settings,
            layout,
            seeded: false,
            was_active: false,
        }
    }

    fn neutral_pose(settings: &CameraSettings) -> CameraPose {
        CameraPose {
            position: settings.neutral_eye(),
            target_position: settings.neutral_eye(),
            look_at: settings.neutral_look_at(),
            smoothed_x: 0.0,
        }
    }

    pub fn pose(&self) -> &CameraPose {
        &self.pose
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Snap back to the neutral overview pose.
    pub fn reseed(&mut self) {
        tracing::debug!("[camera] reseeding to neutral pose");
        self.pose = Self::neutral_pose(&self.settings);
    }

    /// Ship's target x (tile centre plus lane jitter) and tile depth.
    fn subject(&self, snapshot: &GameSnapshot) -> Option<(f32, f32)> {
        snapshot.occupied_index()?;
        let slot = visible_tiles(
            &snapshot.board,
            snapshot.position,
            self.settings.visible_behind,
            self.settings.visible_ahead,
        )
        .position(|t| t.position == snapshot.position)
        .unwrap_or(0);

        let origin = self.layout.tile_origin(snapshot.position);
        let target_x =
            origin.x + lane_jitter(snapshot.position, slot, self.settings.jitter_amplitude);
        Some((target_x, origin.z))
    }

    /// Advance one tick and return the pose to render.
    pub fn update(
        &mut self,
        tick: Tick,
        snapshot: Option<&GameSnapshot>,
        device: DeviceClass,
    ) -> CameraFrame {
        let active = snapshot.is_some_and(|s| s.phase.is_active());
        if !self.seeded || (self.was_active && !active) {
            self.reseed();
            self.seeded = true;
        }
        self.was_active = active;

        let dt = tick.dt_secs.clamp(0.0, self.settings.max_dt);
        let alpha = (dt * self.settings.smoothing).clamp(0.0, 1.0);
        let moving = snapshot.is_some_and(|s| s.is_moving);

        match snapshot.and_then(|s| self.subject(s)) {
            Some((target_x, subject_z)) => {
                self.pose.smoothed_x += (target_x - self.pose.smoothed_x) * alpha;
                let profile = self.settings.profiles.lookup(ProfileKey { device, active });
                let height = if moving { profile.moving_height } else { profile.height };
                let x = self.pose.smoothed_x;
                self.pose.target_position = Vec3::new(x, height, subject_z + profile.depth);
                self.pose.look_at = Vec3::new(x, 0.0, subject_z - profile.look_ahead);
            }
            None => {
                self.pose.smoothed_x += (0.0 - self.pose.smoothed_x) * alpha;
                self.pose.target_position = self.settings.neutral_eye();
                self.pose.look_at = self.settings.neutral_look_at();
            }
        }

        // Incremental form stays put once position equals the target.
        self.pose.position += (self.pose.target_position - self.pose.position) * alpha;

        let mut eye = self.pose.position;
        if moving {
            eye.y += (tick.elapsed_secs() * self.settings.bob_frequency).sin()
                * self.settings.bob_amplitude;
        }
        CameraFrame {
            eye,
            look_at: self.pose.look_at,
        }
    }
}

impl Default for CameraTracker {
    fn default() -> Self {
        Self::new(CameraSettings::default(), BoardLayout::default())
    }
}
