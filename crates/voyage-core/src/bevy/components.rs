//! ECS components for the presentation app.

use bevy::prelude::*;

use crate::game::Tile;

/// Marker for the camera driven by the tracker.
#[derive(Component, Debug, Clone, Default)]
pub struct MainCamera;

/// One board tile. Its `Transform` is rewritten every frame from the layout.
#[derive(Component, Debug, Clone)]
pub struct BoardTile {
    pub tile: Tile,
    /// True while the ship stands on this tile.
    pub highlighted: bool,
}

impl BoardTile {
    pub fn new(tile: Tile) -> Self {
        Self {
            tile,
            highlighted: false,
        }
    }
}
