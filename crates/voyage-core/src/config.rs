//! Presentation configuration.
//!
//! Every section falls back to its defaults, so an empty JSON object is a
//! valid configuration.

use serde::{Deserialize, Serialize};

use crate::board::BoardPresenter;
use crate::camera::CameraSettings;
use crate::error::ConfigError;
use crate::notify::SequencerTiming;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpriteSettings {
    /// Logical frame rate for sprites that don't specify one.
    pub default_fps: f64,
}

impl Default for SpriteSettings {
    fn default() -> Self {
        Self { default_fps: 12.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresentationConfig {
    pub sprite: SpriteSettings,
    pub notifications: SequencerTiming,
    pub camera: CameraSettings,
    pub board: BoardPresenter,
}

impl PresentationConfig {
    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sprite.default_fps.is_finite() && self.sprite.default_fps > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "sprite.defaultFps must be positive, got {}",
                self.sprite.default_fps
            )));
        }

        self.notifications.validate()?;

        let camera = &self.camera;
        if !(camera.smoothing.is_finite() && camera.smoothing >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.smoothing must be non-negative, got {}",
                camera.smoothing
            )));
        }
        if !(camera.max_dt.is_finite() && camera.max_dt > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.maxDt must be positive, got {}",
                camera.max_dt
            )));
        }

        let profiles = &camera.profiles;
        let motion = &self.board.motion;
        let mut finite = vec![
            ("camera.bobAmplitude", camera.bob_amplitude),
            ("camera.bobFrequency", camera.bob_frequency),
            ("camera.jitterAmplitude", camera.jitter_amplitude),
            ("board.ambientAmplitude", motion.ambient_amplitude),
            ("board.ambientFrequency", motion.ambient_frequency),
            ("board.ambientPhaseStep", motion.ambient_phase_step),
            ("board.occupiedAmplitude", motion.occupied_amplitude),
            ("board.occupiedFrequency", motion.occupied_frequency),
        ];
        finite.extend(camera.neutral_eye.map(|v| ("camera.neutralEye", v)));
        finite.extend(camera.neutral_look_at.map(|v| ("camera.neutralLookAt", v)));
        for profile in [
            &profiles.compact_idle,
            &profiles.compact_active,
            &profiles.standard_idle,
            &profiles.standard_active,
        ] {
            finite.extend([
                ("camera.profiles.height", profile.height),
                ("camera.profiles.movingHeight", profile.moving_height),
                ("camera.profiles.depth", profile.depth),
                ("camera.profiles.lookAhead", profile.look_ahead),
            ]);
        }
        if let Some((name, value)) = finite.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")));
        }

        let layout = &self.board.layout;
        if layout.columns == 0 {
            return Err(ConfigError::Invalid("board.columns must be at least 1".into()));
        }
        if !(layout.tile_size.is_finite() && layout.tile_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "board.tileSize must be positive, got {}",
                layout.tile_size
            )));
        }

        Ok(())
    }
}
