use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Terrain code for one grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    /// Blocks movement and bullets; destroyed by a bullet.
    Brick,
    /// Blocks movement and bullets; absorbs bullets and is never removed.
    Steel,
    /// Decorative overlay drawn above entities. Blocks nothing.
    Bush,
}

impl Tile {
    pub fn blocks(self) -> bool {
        matches!(self, Tile::Brick | Tile::Steel)
    }

    /// Parse the single-character code used in layout rows.
    pub fn from_code(code: char) -> Option<Tile> {
        match code {
            '.' | ' ' => Some(Tile::Empty),
            'B' => Some(Tile::Brick),
            'S' => Some(Tile::Steel),
            'G' => Some(Tile::Bush),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Brick => 'B',
            Tile::Steel => 'S',
            Tile::Bush => 'G',
        }
    }
}

/// Fixed-size terrain grid. Tile data is stored row-major (y * width + x).
///
/// The outer ring is always steel, so nothing can leave the world and no
/// bullet can ever open a hole in the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct TileWorld {
    width: u32,
    height: u32,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl TileWorld {
    /// Build a world from raw tile data, validating the boundary ring.
    pub fn new(
        width: u32,
        height: u32,
        tiles: Vec<Tile>,
        tile_size: f32,
    ) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::EmptyGrid);
        }
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(WorldError::InvalidConfig("tile_size must be positive"));
        }
        let expected = width as usize * height as usize;
        if tiles.len() != expected {
            return Err(WorldError::RaggedRow {
                row: tiles.len() / width as usize,
                expected: width as usize,
                found: tiles.len() % width as usize,
            });
        }
        let world = Self {
            width,
            height,
            tile_size,
            tiles,
        };
        for ty in 0..height {
            for tx in 0..width {
                if world.is_boundary(tx, ty) && world.tile(tx, ty) != Tile::Steel {
                    return Err(WorldError::OpenBoundary { tx, ty });
                }
            }
        }
        Ok(world)
    }

    /// Parse layout rows (one string per row, one code per tile).
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Result<Self, WorldError> {
        let Some(first) = rows.first() else {
            return Err(WorldError::EmptyGrid);
        };
        let width = first.as_ref().chars().count();
        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(WorldError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, code) in line.chars().enumerate() {
                let tile = Tile::from_code(code)
                    .ok_or(WorldError::UnknownTileCode { row, col, code })?;
                tiles.push(tile);
            }
        }
        Self::new(width as u32, rows.len() as u32, tiles, tile_size)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World extent in pixels.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    /// Tile at signed coordinates; `None` outside the grid.
    pub fn get(&self, tx: i32, ty: i32) -> Option<Tile> {
        if tx < 0 || ty < 0 || tx >= self.width as i32 || ty >= self.height as i32 {
            return None;
        }
        Some(self.tiles[ty as usize * self.width as usize + tx as usize])
    }

    /// Tile at in-grid coordinates. Out-of-grid reads return steel.
    pub fn tile(&self, tx: u32, ty: u32) -> Tile {
        self.get(tx as i32, ty as i32).unwrap_or(Tile::Steel)
    }

    pub fn in_bounds(&self, tx: u32, ty: u32) -> bool {
        tx < self.width && ty < self.height
    }

    pub fn is_boundary(&self, tx: u32, ty: u32) -> bool {
        tx == 0 || ty == 0 || tx + 1 == self.width || ty + 1 == self.height
    }

    /// Tile index containing a world-space point, if inside the grid.
    pub fn tile_at_point(&self, p: Vec2) -> Option<(u32, u32)> {
        let tx = (p.x / self.tile_size).floor() as i32;
        let ty = (p.y / self.tile_size).floor() as i32;
        self.get(tx, ty).map(|_| (tx as u32, ty as u32))
    }

    /// Top-left corner of a tile in world space.
    pub fn tile_origin(&self, tx: u32, ty: u32) -> Vec2 {
        Vec2::new(tx as f32 * self.tile_size, ty as f32 * self.tile_size)
    }

    /// Turn a brick into empty ground. Returns false (and changes nothing)
    /// for any other tile.
    pub(crate) fn destroy_brick(&mut self, tx: u32, ty: u32) -> bool {
        if !self.in_bounds(tx, ty) {
            return false;
        }
        let idx = ty as usize * self.width as usize + tx as usize;
        if self.tiles[idx] != Tile::Brick {
            return false;
        }
        self.tiles[idx] = Tile::Empty;
        true
    }

    /// Iterate every cell as `(tx, ty, tile)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Tile)> + '_ {
        let w = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &t)| (i as u32 % w, i as u32 / w, t))
    }

    /// Encode back to layout rows.
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|t| t.code()).collect())
            .collect()
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_all_tile_codes() {
        let world = TileWorld::from_rows(&rows(&["SSSSS", "S.BGS", "SSSSS"]), 32.0).unwrap();
        assert_eq!(world.width(), 5);
        assert_eq!(world.height(), 3);
        assert_eq!(world.tile(1, 1), Tile::Empty);
        assert_eq!(world.tile(2, 1), Tile::Brick);
        assert_eq!(world.tile(3, 1), Tile::Bush);
        assert_eq!(world.tile(0, 0), Tile::Steel);
    }

    #[test]
    fn rows_roundtrip() {
        let src = rows(&["SSSS", "SB.S", "SGBS", "SSSS"]);
        let world = TileWorld::from_rows(&src, 16.0).unwrap();
        assert_eq!(world.to_rows(), src);
    }

    #[test]
    fn open_boundary_rejected() {
        let err = TileWorld::from_rows(&rows(&["SSSS", "...S", "SSSS"]), 32.0).unwrap_err();
        assert_eq!(err, WorldError::OpenBoundary { tx: 0, ty: 1 });
    }

    #[test]
    fn brick_or_bush_boundary_rejected() {
        assert!(TileWorld::from_rows(&rows(&["SBSS", "S..S", "SSSS"]), 32.0).is_err());
        assert!(TileWorld::from_rows(&rows(&["SSSS", "S..G", "SSSS"]), 32.0).is_err());
    }

    #[test]
    fn ragged_row_rejected() {
        let err = TileWorld::from_rows(&rows(&["SSSS", "S.S", "SSSS"]), 32.0).unwrap_err();
        assert!(matches!(err, WorldError::RaggedRow { row: 1, .. }));
    }

    #[test]
    fn unknown_code_rejected() {
        let err = TileWorld::from_rows(&rows(&["SSS", "SxS", "SSS"]), 32.0).unwrap_err();
        assert_eq!(
            err,
            WorldError::UnknownTileCode {
                row: 1,
                col: 1,
                code: 'x'
            }
        );
    }

    #[test]
    fn empty_grid_rejected() {
        let none: Vec<String> = Vec::new();
        assert_eq!(TileWorld::from_rows(&none, 32.0).unwrap_err(), WorldError::EmptyGrid);
    }

    #[test]
    fn destroy_brick_only_touches_bricks() {
        let mut world = TileWorld::from_rows(&rows(&["SSSS", "SBGS", "SSSS"]), 32.0).unwrap();
        assert!(world.destroy_brick(1, 1));
        assert_eq!(world.tile(1, 1), Tile::Empty);
        assert!(!world.destroy_brick(1, 1), "already empty");
        assert!(!world.destroy_brick(2, 1), "bush is not a brick");
        assert!(!world.destroy_brick(0, 0), "steel is not a brick");
        assert!(!world.destroy_brick(99, 99));
        assert_eq!(world.tile(0, 0), Tile::Steel);
    }

    #[test]
    fn point_to_tile() {
        let world = TileWorld::from_rows(&rows(&["SSSS", "S..S", "SSSS"]), 32.0).unwrap();
        assert_eq!(world.tile_at_point(Vec2::new(40.0, 40.0)), Some((1, 1)));
        assert_eq!(world.tile_at_point(Vec2::new(64.0, 0.0)), Some((2, 0)));
        assert_eq!(world.tile_at_point(Vec2::new(-1.0, 10.0)), None);
        assert_eq!(world.tile_at_point(Vec2::new(128.0, 10.0)), None);
    }

    #[test]
    fn out_of_grid_reads() {
        let world = TileWorld::from_rows(&rows(&["SSS", "S.S", "SSS"]), 32.0).unwrap();
        assert_eq!(world.get(-1, 0), None);
        assert_eq!(world.get(3, 1), None);
        assert_eq!(world.tile(7, 7), Tile::Steel);
    }
}
