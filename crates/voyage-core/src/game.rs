//! Game-state signal consumed by the presentation layer.
//!
//! These types mirror what the external game store publishes. The
//! presentation core only reads them; it never mutates game state.

use serde::{Deserialize, Serialize};

/// Phase of the current game round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Menu,
    Betting,
    Playing,
    Won,
    Lost,
    CashedOut,
}

impl GamePhase {
    /// Phases in which the board is on screen and the ship is tracked.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Won | Self::Lost | Self::CashedOut)
    }

    /// Phases that end a game instance.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost | Self::CashedOut)
    }
}

/// Step type assigned to a tile by the board generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Start,
    #[default]
    Safe,
    Hazard,
    Bonus,
    Penalty,
    Finish,
}

impl TileKind {
    /// Tiles that pulse even when the ship is elsewhere.
    pub fn is_ambient(self) -> bool {
        matches!(self, Self::Hazard | Self::Bonus | Self::Penalty | Self::Finish)
    }
}

/// A single board tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub position: u32,
    #[serde(rename = "type")]
    pub kind: TileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f32>,
}

impl Tile {
    pub fn new(position: u32, kind: TileKind) -> Self {
        Self {
            position,
            kind,
            multiplier: None,
        }
    }

    pub fn with_multiplier(mut self, multiplier: f32) -> Self {
        self.multiplier = Some(multiplier);
        self
    }
}

/// Snapshot of the external game store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub position: u32,
    #[serde(default)]
    pub board: Vec<Tile>,
    #[serde(default)]
    pub is_moving: bool,
    /// Identifier of the game instance, used to key achievement checks.
    #[serde(default)]
    pub instance: Option<String>,
}

impl GameSnapshot {
    /// Index of the occupied tile within `board`, if the board has one at `position`.
    pub fn occupied_index(&self) -> Option<usize> {
        self.board.iter().position(|t| t.position == self.position)
    }

    /// Whether there is anything for the camera to follow.
    pub fn has_subject(&self) -> bool {
        self.occupied_index().is_some()
    }
}

/// Viewport class, computed once by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Compact,
    #[default]
    Standard,
}

impl DeviceClass {
    pub fn from_compact(is_compact: bool) -> Self {
        if is_compact { Self::Compact } else { Self::Standard }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_activity() {
        assert!(!GamePhase::Menu.is_active());
        assert!(!GamePhase::Betting.is_active());
        assert!(GamePhase::Playing.is_active());
        assert!(GamePhase::CashedOut.is_active());
        assert!(GamePhase::Lost.is_terminal());
        assert!(!GamePhase::Playing.is_terminal());
    }

    #[test]
    fn test_snapshot_json() {
        let json = r#"{
            "phase": "cashed_out",
            "position": 3,
            "board": [
                {"position": 2, "type": "safe"},
                {"position": 3, "type": "bonus", "multiplier": 1.5}
            ],
            "isMoving": true
        }"#;
        let snapshot: GameSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.phase, GamePhase::CashedOut);
        assert!(snapshot.is_moving);
        assert_eq!(snapshot.occupied_index(), Some(1));
        assert_eq!(snapshot.board[1].multiplier, Some(1.5));
        assert_eq!(snapshot.instance, None);
    }

    #[test]
    fn test_missing_subject() {
        let snapshot = GameSnapshot {
            position: 7,
            board: vec![Tile::new(0, TileKind::Start)],
            ..Default::default()
        };
        assert!(!snapshot.has_subject());
    }
}
