use std::f32::consts::TAU;

use quizblast_core::game_trait::GameMode;
use quizblast_core::input::Direction;
use quizblast_tanks::TankQuizState;
use quizblast_tanks::collision::Rect;
use quizblast_tanks::player::Player;
use quizblast_tanks::projectile::Bullet;
use quizblast_tanks::trigger::TriggerZone;
use quizblast_tanks::world::{Tile, TileWorld};

use crate::framebuffer::{Framebuffer, Pixel, pack};
use crate::theme::{Theme, rgb, shade};

/// Trigger opacity at wall-clock time `t`, oscillating between `min` and `max`.
pub fn pulse_alpha(t: f32, min: f32, max: f32, period: f32) -> f32 {
    if !(period.is_finite() && period > 0.0) {
        return max;
    }
    min + (max - min) * (0.5 + 0.5 * (TAU * t / period).sin())
}

/// Stable per-tile hash driving procedural patterns.
pub fn tile_hash(tx: u32, ty: u32) -> u32 {
    let mut h = tx.wrapping_mul(0x9E37_79B1) ^ ty.wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    h
}

/// Pixel size of the surface needed to show a whole world.
pub fn frame_size(world: &TileWorld) -> (u32, u32) {
    let size = world.pixel_size();
    (size.x.round() as u32, size.y.round() as u32)
}

fn to_px(r: &Rect) -> (i32, i32, u32, u32) {
    (
        r.x.round() as i32,
        r.y.round() as i32,
        r.w.round().max(0.0) as u32,
        r.h.round().max(0.0) as u32,
    )
}

/// Draws a [`TankQuizState`] into a [`Framebuffer`].
///
/// Read-only over the game state. Layers, back to front: solid terrain,
/// active triggers, the tank, bullets, then the bush canopy. A paused frame
/// gets a dim veil on top of everything.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Render one frame. `wall_clock_secs` only drives cosmetic animation.
    pub fn render(&self, fb: &mut Framebuffer, state: &TankQuizState, wall_clock_secs: f32) {
        fb.clear(pack(rgb(&self.theme.arena.background)));

        self.draw_terrain(fb, &state.world);
        self.draw_triggers(fb, &state.triggers, wall_clock_secs);
        self.draw_player(fb, &state.player);
        self.draw_bullets(fb, state.projectiles.bullets());
        self.draw_bushes(fb, &state.world);

        if state.mode == GameMode::QuizPaused {
            let (w, h) = (fb.width(), fb.height());
            fb.blend_rect(0, 0, w, h, pack(self.theme.quiz.paused_veil), 1.0);
        }
    }

    fn tile_px(world: &TileWorld, tx: u32, ty: u32) -> (i32, i32, u32) {
        let origin = world.tile_origin(tx, ty);
        (
            origin.x.round() as i32,
            origin.y.round() as i32,
            world.tile_size().round() as u32,
        )
    }

    /// Brightness factor in `1 ± jitter` from a hash.
    fn jitter(&self, h: u32) -> f32 {
        let j = self.theme.arena.pattern_jitter;
        1.0 - j + 2.0 * j * (h & 0xFF) as f32 / 255.0
    }

    fn draw_terrain(&self, fb: &mut Framebuffer, world: &TileWorld) {
        for (tx, ty, tile) in world.iter() {
            match tile {
                Tile::Brick => self.draw_brick(fb, world, tx, ty),
                Tile::Steel => self.draw_steel(fb, world, tx, ty),
                Tile::Empty | Tile::Bush => {},
            }
        }
    }

    fn draw_brick(&self, fb: &mut Framebuffer, world: &TileWorld, tx: u32, ty: u32) {
        let arena = &self.theme.arena;
        let (x, y, ts) = Self::tile_px(world, tx, ty);
        fb.fill_rect(x, y, ts, ts, pack(rgb(&arena.brick_mortar)));

        let course_h = (ts / 4).max(1);
        let brick_w = (ts / 2).max(1);
        let hash = tile_hash(tx, ty);
        for course in 0..4u32 {
            let cy = y + (course * course_h) as i32;
            // Odd courses are offset by half a brick.
            let offset = if course % 2 == 1 { -(brick_w as i32 / 2) } else { 0 };
            for i in 0..3u32 {
                let bx = x + offset + (i * brick_w) as i32;
                // Clip to this tile so offset bricks do not spill over.
                let left = bx.max(x);
                let right = (bx + brick_w as i32).min(x + ts as i32);
                if right - left <= 1 {
                    continue;
                }
                let factor = self.jitter(hash.rotate_left(course * 8 + i * 3));
                fb.fill_rect(
                    left + 1,
                    cy + 1,
                    (right - left - 1) as u32,
                    course_h.saturating_sub(1),
                    pack(shade(&arena.brick, factor)),
                );
            }
        }
    }

    fn draw_steel(&self, fb: &mut Framebuffer, world: &TileWorld, tx: u32, ty: u32) {
        let arena = &self.theme.arena;
        let (x, y, ts) = Self::tile_px(world, tx, ty);
        let factor = self.jitter(tile_hash(tx, ty));
        fb.fill_rect(x, y, ts, ts, pack(shade(&arena.steel, factor)));

        // Bevel: light top/left, dark bottom/right.
        let edge = (ts / 16).max(1);
        let highlight = pack(rgb(&arena.steel_highlight));
        let shadow = pack(rgb(&arena.steel_shadow));
        fb.fill_rect(x, y, ts, edge, highlight);
        fb.fill_rect(x, y, edge, ts, highlight);
        fb.fill_rect(x, y + (ts - edge) as i32, ts, edge, shadow);
        fb.fill_rect(x + (ts - edge) as i32, y, edge, ts, shadow);

        // Rivets
        let inset = (ts / 5) as i32;
        let far = ts as i32 - inset - 2;
        for (rx, ry) in [(inset, inset), (far, inset), (inset, far), (far, far)] {
            fb.fill_rect(x + rx, y + ry, 2, 2, shadow);
        }
    }

    fn draw_triggers(&self, fb: &mut Framebuffer, zones: &[TriggerZone], t: f32) {
        let quiz = &self.theme.quiz;
        let alpha = pulse_alpha(
            t,
            quiz.pulse_min_alpha,
            quiz.pulse_max_alpha,
            quiz.pulse_period_secs,
        );
        let color = pack(rgb(&quiz.trigger));
        for zone in zones.iter().filter(|z| z.active) {
            let (x, y, w, h) = to_px(&zone.rect);
            fb.blend_rect(x, y, w, h, color, alpha);
        }
    }

    fn draw_player(&self, fb: &mut Framebuffer, player: &Player) {
        let tank = &self.theme.tank;
        let (x, y, w, h) = to_px(&player.rect());
        fb.fill_rect(x, y, w, h, pack(rgb(&tank.tread)));
        let inset = (w / 6).max(1);
        fb.fill_rect(
            x + inset as i32,
            y + inset as i32,
            w.saturating_sub(2 * inset),
            h.saturating_sub(2 * inset),
            pack(rgb(&tank.body)),
        );

        // Barrel stub from the centre out past the hull edge.
        let c = player.rect().center();
        let (cx, cy) = (c.x.round() as i32, c.y.round() as i32);
        let len = (w / 2 + 4) as i32;
        let thick = 4;
        let (bx, by, bw, bh) = match player.facing {
            Direction::Up => (cx - thick / 2, cy - len, thick, len),
            Direction::Down => (cx - thick / 2, cy, thick, len),
            Direction::Left => (cx - len, cy - thick / 2, len, thick),
            Direction::Right => (cx, cy - thick / 2, len, thick),
        };
        fb.fill_rect(bx, by, bw as u32, bh as u32, pack(rgb(&tank.barrel)));
    }

    fn draw_bullets(&self, fb: &mut Framebuffer, bullets: &[Bullet]) {
        let color: Pixel = pack(rgb(&self.theme.tank.bullet));
        for bullet in bullets.iter().filter(|b| b.alive) {
            let (x, y, w, h) = to_px(&bullet.rect());
            fb.fill_rect(x, y, w.max(1), h.max(1), color);
        }
    }

    fn draw_bushes(&self, fb: &mut Framebuffer, world: &TileWorld) {
        let arena = &self.theme.arena;
        let canopy = pack(arena.bush);
        let leaf = pack(arena.bush_leaf);
        for (tx, ty, tile) in world.iter() {
            if tile != Tile::Bush {
                continue;
            }
            let (x, y, ts) = Self::tile_px(world, tx, ty);
            fb.blend_rect(x, y, ts, ts, canopy, 1.0);

            let hash = tile_hash(tx, ty);
            let span = ts.saturating_sub(4).max(1);
            for i in 0..5u32 {
                let h = hash.rotate_left(i * 6);
                let lx = (h % span) as i32;
                let ly = ((h >> 8) % span) as i32;
                fb.blend_rect(x + lx, y + ly, 4, 4, leaf, 1.0);
            }
        }
    }
}
