//! Systems for the presentation app.
//!
//! Organized by functionality:
//! - command: Command queue processing from WASM
//! - clock: Presentation time
//! - board: Tile entity lifecycle and idle motion
//! - camera: Camera tracking
//! - notification: Achievement toast sequencing
//! - achievements: Eligibility check requests and results
//! - state_sync: Sync ECS state to shared stores for UI

pub mod achievements;
pub mod board;
pub mod camera;
pub mod clock;
pub mod command;
pub mod notification;
pub mod state_sync;

pub use achievements::*;
pub use board::*;
pub use camera::*;
pub use clock::*;
pub use command::*;
pub use notification::*;
pub use state_sync::*;
