//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `VoyageHeadlessPlugin` for testing presentation logic
//! without a rendering or windowing backend.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::bevy::plugin::VoyageHeadlessPlugin;
use crate::bevy::resources::{CommandQueue, PresentationCommand};
use crate::bevy::state_store::StateStores;
use crate::game::GameSnapshot;

/// A headless Bevy app wrapper for testing.
///
/// Every `update` advances time by a fixed step, so runs are deterministic.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    /// Create a new test app stepping 50ms per update.
    pub fn new() -> Self {
        Self::with_step(Duration::from_millis(50))
    }

    pub fn with_step(step: Duration) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::state::app::StatesPlugin);
        app.add_plugins(VoyageHeadlessPlugin::default());
        app.insert_resource(TimeUpdateStrategy::ManualDuration(step));
        // Run one update to initialize all resources and state
        app.update();
        Self { app }
    }

    /// Run a single frame update.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Run `n` frame updates.
    pub fn run_frames(&mut self, n: usize) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Push a command to the command queue.
    pub fn push_command(&mut self, cmd: PresentationCommand) {
        self.app.world().resource::<CommandQueue>().push(cmd);
    }

    /// Replace the snapshot and apply it.
    pub fn set_snapshot(&mut self, snapshot: GameSnapshot) {
        self.push_command(PresentationCommand::SetSnapshot { snapshot });
        self.update();
    }

    pub fn stores(&self) -> StateStores {
        self.app.world().resource::<StateStores>().clone()
    }

    /// Get a reference to the World.
    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Get a mutable reference to the World.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
