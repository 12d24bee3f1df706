//! Bevy integration for the voyage presentation.
//!
//! Wraps the framework-agnostic presentation logic in ECS resources and
//! systems, plus the command queue and state stores that connect the app to
//! the Yew frontend.

pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod state_store;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(target_arch = "wasm32")]
pub mod wasm_entry;

#[cfg(target_arch = "wasm32")]
pub use wasm_entry::*;

pub use components::*;
pub use events::*;
pub use plugin::{PhaseState, PresentationSet, VoyageHeadlessPlugin, VoyagePresentationPlugin};
pub use resources::*;
pub use state_store::{
    AchievementRequestStore, NotificationStore, NotificationSummary, StateStores,
};
