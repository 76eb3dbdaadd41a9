use glam::Vec2;

use quizblast_core::input::Direction;
use quizblast_core::question::QuizOutcome;

use crate::collision::{Rect, rect_blocked};
use crate::config::TankQuizConfig;
use crate::error::WorldError;
use crate::world::TileWorld;

/// The player's tank.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner of the square hitbox.
    pub pos: Vec2,
    pub facing: Direction,
    /// Pixels per second.
    pub speed: f32,
    pub size: f32,
}

impl Player {
    /// Place the player centred in a tile, rejecting spawns on blocking terrain.
    pub fn spawn_at_tile(
        world: &TileWorld,
        tx: u32,
        ty: u32,
        facing: Direction,
        config: &TankQuizConfig,
    ) -> Result<Self, WorldError> {
        if !world.in_bounds(tx, ty) {
            return Err(WorldError::SpawnOutOfBounds { tx, ty });
        }
        let inset = (world.tile_size() - config.player_size) / 2.0;
        let player = Self {
            pos: world.tile_origin(tx, ty) + Vec2::splat(inset),
            facing,
            speed: config.player_speed,
            size: config.player_size,
        };
        if rect_blocked(world, &player.rect()) {
            return Err(WorldError::SpawnBlocked { tx, ty });
        }
        Ok(player)
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }
}

/// Apply one tick of movement.
///
/// Facing follows the intent even when the move is blocked, so bumping a
/// wall still turns the barrel. The step is taken only if the whole
/// candidate hitbox is clear; there is no slide-to-contact. Returns whether
/// the player moved.
pub fn step_player(
    player: &mut Player,
    intent: Option<Direction>,
    world: &TileWorld,
    dt: f32,
) -> bool {
    let Some(dir) = intent else {
        return false;
    };
    player.facing = dir;

    let candidate = player.pos + dir.unit() * player.speed * dt;
    if rect_blocked(world, &Rect::square(candidate, player.size)) {
        return false;
    }
    player.pos = candidate;
    true
}

/// Ammo and hearts. Only quiz outcomes change these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    pub ammo: u32,
    pub hearts: u32,
}

impl PlayerStats {
    pub fn new(config: &TankQuizConfig) -> Self {
        Self {
            ammo: config.starting_ammo,
            hearts: config.starting_hearts,
        }
    }

    /// Correct: +reward ammo. Incorrect: one heart lost, floored at zero.
    /// Dismissed: nothing.
    pub fn apply_outcome(&mut self, outcome: QuizOutcome, ammo_reward: u32) {
        match outcome {
            QuizOutcome::Correct => self.ammo = self.ammo.saturating_add(ammo_reward),
            QuizOutcome::Incorrect => self.hearts = self.hearts.saturating_sub(1),
            QuizOutcome::Dismissed => {},
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hearts == 0
    }
}
