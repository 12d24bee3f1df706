//! Board presentation.
//!
//! Maps linear board positions onto a serpentine (boustrophedon) grid and
//! derives the per-tile idle motion. Everything here is a pure function of
//! its inputs and is called for every visible tile on every tick.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::game::Tile;

/// Row/column of a board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
}

/// Grid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardLayout {
    /// Tiles per row.
    pub columns: u32,
    /// World-space edge length of a tile.
    pub tile_size: f32,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            columns: 10,
            tile_size: 2.0,
        }
    }
}

impl BoardLayout {
    pub fn new(columns: u32, tile_size: f32) -> Self {
        Self { columns, tile_size }
    }

    fn column_count(&self) -> u32 {
        self.columns.max(1)
    }

    /// Grid cell of a linear position. Even rows run left to right, odd rows
    /// right to left.
    pub fn grid_cell(&self, position: u32) -> GridCell {
        let columns = self.column_count();
        let row = position / columns;
        let offset = position % columns;
        let col = if row % 2 == 0 { offset } else { columns - 1 - offset };
        GridCell { row, col }
    }

    /// Horizontal world coordinate of a cell's centre, centred on x = 0.
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_x(&self, cell: GridCell) -> f32 {
        let half_span = (self.column_count() - 1) as f32 / 2.0;
        (cell.col as f32 - half_span) * self.tile_size
    }

    /// Depth coordinate of a cell's centre. Rows advance away from the camera.
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_z(&self, cell: GridCell) -> f32 {
        -(cell.row as f32) * self.tile_size
    }

    /// World-space centre of the tile at `position`, on the board plane.
    pub fn tile_origin(&self, position: u32) -> Vec3 {
        let cell = self.grid_cell(position);
        Vec3::new(self.cell_x(cell), 0.0, self.cell_z(cell))
    }
}

/// Idle motion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileMotion {
    pub ambient_amplitude: f32,
    /// Angular frequency in rad/s.
    pub ambient_frequency: f32,
    /// Phase offset per board position so neighbouring tiles don't pulse in unison.
    pub ambient_phase_step: f32,
    pub occupied_amplitude: f32,
    pub occupied_frequency: f32,
}

impl Default for TileMotion {
    fn default() -> Self {
        Self {
            ambient_amplitude: 0.08,
            ambient_frequency: 2.0,
            ambient_phase_step: 0.7,
            occupied_amplitude: 0.18,
            occupied_frequency: 4.0,
        }
    }
}

/// Decorative state of one tile for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TileDecor {
    /// Vertical offset above the board plane.
    pub lift: f32,
    pub highlighted: bool,
}

impl TileMotion {
    #[allow(clippy::cast_precision_loss)]
    pub fn decorate(&self, tile: &Tile, occupied: bool, elapsed_secs: f32) -> TileDecor {
        if occupied {
            return TileDecor {
                lift: (elapsed_secs * self.occupied_frequency).sin() * self.occupied_amplitude,
                highlighted: true,
            };
        }
        if tile.kind.is_ambient() {
            let phase = tile.position as f32 * self.ambient_phase_step;
            return TileDecor {
                lift: (elapsed_secs * self.ambient_frequency + phase).sin() * self.ambient_amplitude,
                highlighted: false,
            };
        }
        TileDecor::default()
    }
}

/// Final placement of a tile for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePresentation {
    pub translation: Vec3,
    pub decor: TileDecor,
}

/// Layout plus motion: everything needed to place a tile.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardPresenter {
    #[serde(flatten)]
    pub layout: BoardLayout,
    #[serde(flatten)]
    pub motion: TileMotion,
}

impl BoardPresenter {
    pub fn new(layout: BoardLayout, motion: TileMotion) -> Self {
        Self { layout, motion }
    }

    pub fn present(&self, tile: &Tile, occupied: bool, elapsed_secs: f32) -> TilePresentation {
        let decor = self.motion.decorate(tile, occupied, elapsed_secs);
        let mut translation = self.layout.tile_origin(tile.position);
        translation.y += decor.lift;
        TilePresentation { translation, decor }
    }
}

/// Tiles within `behind` positions before and `ahead` positions after `position`,
/// in board order.
pub fn visible_tiles(
    board: &[Tile],
    position: u32,
    behind: u32,
    ahead: u32,
) -> impl Iterator<Item = &Tile> {
    let low = position.saturating_sub(behind);
    let high = position.saturating_add(ahead);
    board
        .iter()
        .filter(move |t| t.position >= low && t.position <= high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TileKind;

    #[test]
    fn test_serpentine_cells() {
        let layout = BoardLayout::new(10, 1.0);
        assert_eq!(layout.grid_cell(0), GridCell { row: 0, col: 0 });
        assert_eq!(layout.grid_cell(9), GridCell { row: 0, col: 9 });
        assert_eq!(layout.grid_cell(10), GridCell { row: 1, col: 9 });
        assert_eq!(layout.grid_cell(19), GridCell { row: 1, col: 0 });
        assert_eq!(layout.grid_cell(20), GridCell { row: 2, col: 0 });
    }

    #[test]
    fn test_row_turn_keeps_neighbours_adjacent() {
        let layout = BoardLayout::default();
        // Stepping across a row boundary stays in the same column
        let a = layout.tile_origin(9);
        let b = layout.tile_origin(10);
        assert_eq!(a.x, b.x);
        assert!(((a.z - b.z).abs() - layout.tile_size).abs() < 1e-6);
    }

    #[test]
    fn test_centred_columns() {
        let layout = BoardLayout::new(10, 2.0);
        let left = layout.tile_origin(0);
        let right = layout.tile_origin(9);
        assert!((left.x + right.x).abs() < 1e-6);
        assert!((left.x + 9.0).abs() < 1e-6);
        assert_eq!(left.y, 0.0);
    }

    #[test]
    fn test_zero_columns_degrades_to_single_column() {
        let layout = BoardLayout::new(0, 1.0);
        assert_eq!(layout.grid_cell(3), GridCell { row: 3, col: 0 });
        assert_eq!(layout.tile_origin(3).x, 0.0);
    }

    #[test]
    fn test_coordinates_are_bit_identical() {
        let presenter = BoardPresenter::default();
        let tile = Tile::new(37, TileKind::Hazard);
        let a = presenter.present(&tile, false, 12.345);
        let b = presenter.present(&tile, false, 12.345);
        assert_eq!(a.translation.x.to_bits(), b.translation.x.to_bits());
        assert_eq!(a.translation.y.to_bits(), b.translation.y.to_bits());
        assert_eq!(a.translation.z.to_bits(), b.translation.z.to_bits());
    }

    #[test]
    fn test_safe_tiles_are_still() {
        let motion = TileMotion::default();
        let decor = motion.decorate(&Tile::new(4, TileKind::Safe), false, 0.9);
        assert_eq!(decor, TileDecor::default());
    }

    #[test]
    fn test_ambient_tiles_are_out_of_phase() {
        let motion = TileMotion::default();
        let t = 0.0;
        let a = motion.decorate(&Tile::new(1, TileKind::Hazard), false, t);
        let b = motion.decorate(&Tile::new(2, TileKind::Hazard), false, t);
        assert!((a.lift - b.lift).abs() > 1e-3);
        assert!(!a.highlighted);
    }

    #[test]
    fn test_occupied_tile_bobs_harder() {
        let motion = TileMotion::default();
        let tile = Tile::new(5, TileKind::Safe);
        let peak_occupied = (0..200)
            .map(|i| motion.decorate(&tile, true, i as f32 * 0.01).lift.abs())
            .fold(0.0_f32, f32::max);
        let peak_ambient = (0..400)
            .map(|i| {
                motion
                    .decorate(&Tile::new(5, TileKind::Finish), false, i as f32 * 0.01)
                    .lift
                    .abs()
            })
            .fold(0.0_f32, f32::max);
        assert!(peak_occupied > peak_ambient);
        assert!(motion.decorate(&tile, true, 0.1).highlighted);
    }

    #[test]
    fn test_visible_window() {
        let board: Vec<Tile> = (0..20).map(|p| Tile::new(p, TileKind::Safe)).collect();
        let visible: Vec<u32> = visible_tiles(&board, 1, 3, 2).map(|t| t.position).collect();
        assert_eq!(visible, vec![0, 1, 2, 3]);
        let visible: Vec<u32> = visible_tiles(&board, 10, 2, 2).map(|t| t.position).collect();
        assert_eq!(visible, vec![8, 9, 10, 11, 12]);
    }
}
