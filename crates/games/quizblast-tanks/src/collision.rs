use glam::Vec2;

use crate::projectile::Bullet;
use crate::world::{Tile, TileWorld};

/// Axis-aligned rectangle in world pixels, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of edge `size` with its top-left corner at `pos`.
    pub fn square(pos: Vec2, size: f32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict AABB overlap: rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x + self.w <= other.x
            || other.x + other.w <= self.x
            || self.y + self.h <= other.y
            || other.y + other.h <= self.y)
    }
}

/// Result of resolving one bullet against the tile it is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileImpact {
    NoImpact,
    BrickDestroyed { tx: u32, ty: u32 },
    AbsorbedBySteel { tx: u32, ty: u32 },
}

/// Whether a candidate rectangle touches blocking terrain or leaves the grid.
///
/// Covered cells run from `floor(edge / tile)` on the near edges to
/// `ceil(edge / tile)` exclusive on the far edges, so a rectangle flush
/// against a tile boundary does not test the neighbour.
pub fn is_blocked(world: &TileWorld, x: f32, y: f32, w: f32, h: f32) -> bool {
    if !(x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite()) {
        return true;
    }
    let extent = world.pixel_size();
    if x < 0.0 || y < 0.0 || x + w > extent.x || y + h > extent.y {
        return true;
    }

    let ts = world.tile_size();
    let min_tx = (x / ts).floor() as i32;
    let max_tx = ((x + w) / ts).ceil() as i32;
    let min_ty = (y / ts).floor() as i32;
    let max_ty = ((y + h) / ts).ceil() as i32;

    for ty in min_ty..max_ty {
        for tx in min_tx..max_tx {
            if world.get(tx, ty).is_none_or(Tile::blocks) {
                return true;
            }
        }
    }
    false
}

/// [`is_blocked`] for a [`Rect`].
pub fn rect_blocked(world: &TileWorld, rect: &Rect) -> bool {
    is_blocked(world, rect.x, rect.y, rect.w, rect.h)
}

/// Resolve a bullet against the single tile under its centre.
///
/// Brick: the cell becomes empty and the bullet dies. Steel: the bullet dies
/// and the grid is untouched. Anything else (including a point outside the
/// grid) leaves both alone. Dead bullets never resolve.
pub fn resolve_bullet_tile_impact(world: &mut TileWorld, bullet: &mut Bullet) -> TileImpact {
    if !bullet.alive {
        return TileImpact::NoImpact;
    }
    let Some((tx, ty)) = world.tile_at_point(bullet.rect().center()) else {
        return TileImpact::NoImpact;
    };
    match world.tile(tx, ty) {
        Tile::Brick => {
            world.destroy_brick(tx, ty);
            bullet.alive = false;
            TileImpact::BrickDestroyed { tx, ty }
        },
        Tile::Steel => {
            bullet.alive = false;
            TileImpact::AbsorbedBySteel { tx, ty }
        },
        Tile::Empty | Tile::Bush => TileImpact::NoImpact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: f32 = 32.0;

    fn world(lines: &[&str]) -> TileWorld {
        TileWorld::from_rows(lines, TS).unwrap()
    }

    fn bullet_centered_on(tx: u32, ty: u32) -> Bullet {
        let size = 6.0;
        let c = Vec2::new(tx as f32 * TS + TS / 2.0, ty as f32 * TS + TS / 2.0);
        Bullet {
            pos: c - Vec2::splat(size / 2.0),
            vel: Vec2::new(1.0, 0.0),
            size,
            alive: true,
        }
    }

    #[test]
    fn empty_and_bush_do_not_block() {
        let w = world(&["SSSSS", "S.G.S", "S...S", "SSSSS"]);
        assert!(!is_blocked(&w, TS, TS, TS * 3.0, TS * 2.0));
        assert!(!is_blocked(&w, 40.0, 36.0, 20.0, 20.0));
    }

    #[test]
    fn brick_and_steel_block() {
        let w = world(&["SSSSS", "S.B.S", "S.S.S", "SSSSS"]);
        // Overlaps the brick at (2,1) by one pixel.
        assert!(is_blocked(&w, 2.0 * TS - 1.0, TS, 10.0, 10.0));
        // Fully inside the steel at (2,2).
        assert!(is_blocked(&w, 2.0 * TS + 4.0, 2.0 * TS + 4.0, 8.0, 8.0));
        // Touching the steel ring.
        assert!(is_blocked(&w, TS - 0.5, TS, 10.0, 10.0));
    }

    #[test]
    fn flush_edge_does_not_test_neighbour() {
        let w = world(&["SSSSS", "S.B.S", "SSSSS"]);
        // Right edge exactly on the brick's left boundary.
        assert!(!is_blocked(&w, TS, TS, TS, TS));
        // Left edge exactly on the brick's right boundary.
        assert!(!is_blocked(&w, 3.0 * TS, TS, TS, TS));
    }

    #[test]
    fn out_of_bounds_blocks() {
        let w = world(&["SSS", "S.S", "SSS"]);
        assert!(is_blocked(&w, -1.0, 40.0, 4.0, 4.0));
        assert!(is_blocked(&w, 40.0, 3.0 * TS - 2.0, 4.0, 4.0));
        assert!(is_blocked(&w, f32::NAN, 40.0, 4.0, 4.0));
    }

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(9.0, 9.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)), "shared edge");
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)), "shared edge");
        assert!(!a.overlaps(&Rect::new(20.0, 20.0, 1.0, 1.0)));
        assert!(a.overlaps(&Rect::new(2.0, 2.0, 1.0, 1.0)), "contained");
    }

    #[test]
    fn brick_impact_clears_cell_and_kills_bullet() {
        let mut w = world(&["SSSS", "S.BS", "SSSS"]);
        let mut b = bullet_centered_on(2, 1);
        assert_eq!(
            resolve_bullet_tile_impact(&mut w, &mut b),
            TileImpact::BrickDestroyed { tx: 2, ty: 1 }
        );
        assert!(!b.alive);
        assert_eq!(w.tile(2, 1), Tile::Empty);
    }

    #[test]
    fn steel_impact_keeps_grid() {
        let mut w = world(&["SSSS", "S.SS", "SSSS"]);
        let before = w.clone();
        let mut b = bullet_centered_on(2, 1);
        assert_eq!(
            resolve_bullet_tile_impact(&mut w, &mut b),
            TileImpact::AbsorbedBySteel { tx: 2, ty: 1 }
        );
        assert!(!b.alive);
        assert_eq!(w, before);
    }

    #[test]
    fn empty_and_bush_pass_through() {
        let mut w = world(&["SSSS", "S.GS", "SSSS"]);
        for tx in [1, 2] {
            let mut b = bullet_centered_on(tx, 1);
            assert_eq!(resolve_bullet_tile_impact(&mut w, &mut b), TileImpact::NoImpact);
            assert!(b.alive);
        }
    }

    #[test]
    fn dead_bullet_never_resolves() {
        let mut w = world(&["SSSS", "S.BS", "SSSS"]);
        let mut b = bullet_centered_on(2, 1);
        b.alive = false;
        assert_eq!(resolve_bullet_tile_impact(&mut w, &mut b), TileImpact::NoImpact);
        assert_eq!(w.tile(2, 1), Tile::Brick);
    }
}
