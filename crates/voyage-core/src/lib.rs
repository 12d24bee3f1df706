//! Voyage Core Library
//!
//! Real-time presentation logic for the voyage board game: sprite frame
//! animation over async-loaded textures, timed achievement notifications, a
//! camera that follows the ship across a serpentine board, and the board
//! layout itself.
//!
//! The top-level modules are framework-agnostic and driven by explicit
//! [`clock::Tick`]s. The [`bevy`] module wires them into an ECS app.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod achievements;
pub mod board;
pub mod camera;
pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod notify;
pub mod scheduler;
pub mod sprite;

// Bevy integration
pub mod bevy;

pub use achievements::{AchievementGate, AchievementRequest};
pub use board::{BoardLayout, BoardPresenter, GridCell, TileDecor, TileMotion};
pub use camera::{CameraFrame, CameraPose, CameraProfile, CameraSettings, CameraTracker};
pub use clock::{FrameClock, Tick};
pub use config::PresentationConfig;
pub use error::{ConfigError, LoadError};
pub use game::{DeviceClass, GamePhase, GameSnapshot, Tile, TileKind};
pub use notify::{NotificationSequencer, SequencerEvent, SequencerState, SequencerTiming};
pub use scheduler::{Generation, GenerationCounter, Scheduler, TimerHandle};
pub use sprite::{FrameAnimator, FrameCursor, FrameSetSpec, ImagePreloader, LoadState, TextureLoader};
