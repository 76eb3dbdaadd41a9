use glam::Vec2;

use crate::collision::{Rect, TileImpact, resolve_bullet_tile_impact};
use crate::config::TankQuizConfig;
use crate::player::Player;
use crate::world::TileWorld;

/// A shell in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    /// Top-left corner of the square hitbox.
    pub pos: Vec2,
    /// Pixels per second.
    pub vel: Vec2,
    pub size: f32,
    pub alive: bool,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }
}

/// Owned set of live bullets plus the weapon's rate limiter.
#[derive(Debug, Clone, Default)]
pub struct Projectiles {
    bullets: Vec<Bullet>,
    /// Session time of the last successful shot.
    last_fire: Option<f32>,
}

impl Projectiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn alive_count(&self) -> usize {
        self.bullets.iter().filter(|b| b.alive).count()
    }

    /// Both weapon guards: cooldown elapsed and below the concurrency cap.
    pub fn can_fire(&self, now: f32, config: &TankQuizConfig) -> bool {
        let cooled = self
            .last_fire
            .is_none_or(|last| now - last > config.fire_cooldown_secs);
        cooled && self.alive_count() < config.max_bullets
    }

    /// Spawn a bullet just outside the player's hitbox in the facing direction.
    ///
    /// Returns false without side effects when on cooldown or at the cap.
    pub fn fire(&mut self, player: &Player, now: f32, config: &TankQuizConfig) -> bool {
        if !self.can_fire(now, config) {
            return false;
        }
        let dir = player.facing.unit();
        let size = config.bullet_size;
        let center = player.rect().center() + dir * (player.size + size) / 2.0;
        self.bullets.push(Bullet {
            pos: center - Vec2::splat(size / 2.0),
            vel: dir * config.bullet_speed,
            size,
            alive: true,
        });
        self.last_fire = Some(now);
        true
    }

    /// Advance every live bullet, cull strays and resolve tile hits.
    ///
    /// Returns the impacts that changed something, in bullet order.
    pub fn update(&mut self, dt: f32, world: &mut TileWorld) -> Vec<TileImpact> {
        let extent = world.pixel_size();
        let mut impacts = Vec::new();

        for bullet in &mut self.bullets {
            if !bullet.alive {
                continue;
            }
            bullet.pos += bullet.vel * dt;

            let margin = bullet.size;
            if bullet.pos.x < -margin
                || bullet.pos.y < -margin
                || bullet.pos.x > extent.x + margin
                || bullet.pos.y > extent.y + margin
            {
                bullet.alive = false;
                continue;
            }

            let impact = resolve_bullet_tile_impact(world, bullet);
            if impact != TileImpact::NoImpact {
                impacts.push(impact);
            }
        }

        self.bullets.retain(|b| b.alive);
        impacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Tile;
    use quizblast_core::input::Direction;

    const DT: f32 = 1.0 / 60.0;

    fn open_world() -> TileWorld {
        let rows = [
            "SSSSSSSSSS",
            "S........S",
            "S........S",
            "S...B....S",
            "S........S",
            "SSSSSSSSSS",
        ];
        TileWorld::from_rows(&rows, 32.0).unwrap()
    }

    fn player_at_tile(world: &TileWorld, tx: u32, ty: u32, facing: Direction) -> Player {
        Player::spawn_at_tile(world, tx, ty, facing, &TankQuizConfig::default()).unwrap()
    }

    #[test]
    fn bullet_spawns_outside_hitbox() {
        let world = open_world();
        let config = TankQuizConfig::default();
        for dir in Direction::ALL {
            let player = player_at_tile(&world, 4, 2, dir);
            let mut p = Projectiles::new();
            assert!(p.fire(&player, 0.0, &config));
            let b = &p.bullets()[0];
            assert!(!b.rect().overlaps(&player.rect()), "{dir:?} spawn overlaps player");
            assert_eq!(b.vel, dir.unit() * config.bullet_speed);
            // Touches the hitbox edge along the facing axis.
            let gap = (b.rect().center() - player.rect().center()).abs();
            let along = if dir.is_horizontal() { gap.x } else { gap.y };
            assert!((along - (player.size + b.size) / 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cooldown_blocks_second_shot() {
        let world = open_world();
        let config = TankQuizConfig::default();
        let player = player_at_tile(&world, 1, 1, Direction::Right);
        let mut p = Projectiles::new();
        assert!(p.fire(&player, 0.0, &config));
        assert!(!p.fire(&player, config.fire_cooldown_secs * 0.5, &config));
        assert!(!p.fire(&player, config.fire_cooldown_secs, &config), "must exceed");
        assert_eq!(p.bullets().len(), 1);
        assert!(p.fire(&player, config.fire_cooldown_secs + 0.01, &config));
        assert_eq!(p.bullets().len(), 2);
    }

    #[test]
    fn cap_blocks_extra_bullets() {
        let world = open_world();
        let config = TankQuizConfig {
            fire_cooldown_secs: 0.0,
            max_bullets: 2,
            ..Default::default()
        };
        let player = player_at_tile(&world, 1, 1, Direction::Right);
        let mut p = Projectiles::new();
        assert!(p.fire(&player, 0.1, &config));
        assert!(p.fire(&player, 0.2, &config));
        assert!(!p.fire(&player, 0.3, &config));
        assert_eq!(p.alive_count(), 2);
    }

    #[test]
    fn bullet_destroys_brick_then_path_is_clear() {
        let mut world = open_world();
        let config = TankQuizConfig::default();
        let player = player_at_tile(&world, 1, 3, Direction::Right);
        let mut p = Projectiles::new();

        assert!(p.fire(&player, 0.0, &config));
        let mut impacts = Vec::new();
        for _ in 0..60 {
            impacts.extend(p.update(DT, &mut world));
        }
        assert_eq!(impacts, vec![TileImpact::BrickDestroyed { tx: 4, ty: 3 }]);
        assert_eq!(world.tile(4, 3), Tile::Empty);
        assert_eq!(p.alive_count(), 0, "the brick hit removed the bullet");

        // The next shot flies through (4,3) and only stops at the steel ring.
        assert!(p.fire(&player, 1.0, &config));
        let mut impacts = Vec::new();
        for _ in 0..120 {
            impacts.extend(p.update(DT, &mut world));
        }
        assert_eq!(impacts, vec![TileImpact::AbsorbedBySteel { tx: 9, ty: 3 }]);
        assert!(p.bullets().is_empty());
    }

    #[test]
    fn steel_absorbs_without_changing_grid() {
        let mut world = open_world();
        let before = world.clone();
        let config = TankQuizConfig::default();
        let player = player_at_tile(&world, 1, 1, Direction::Up);
        let mut p = Projectiles::new();
        assert!(p.fire(&player, 0.0, &config));
        let impacts: Vec<_> = (0..30).flat_map(|_| p.update(DT, &mut world)).collect();
        assert_eq!(impacts, vec![TileImpact::AbsorbedBySteel { tx: 1, ty: 0 }]);
        assert_eq!(world, before);
        assert_eq!(p.alive_count(), 0);
    }

    #[test]
    fn stray_bullet_outside_world_is_culled() {
        let mut world = open_world();
        let mut p = Projectiles::new();
        p.bullets.push(Bullet {
            pos: Vec2::new(-20.0, 40.0),
            vel: Vec2::new(-100.0, 0.0),
            size: 6.0,
            alive: true,
        });
        let impacts = p.update(DT, &mut world);
        assert!(impacts.is_empty());
        assert!(p.bullets().is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn alive_bullets_never_exceed_cap(
                shots in proptest::collection::vec(any::<bool>(), 1..200),
                cap in 1usize..6,
            ) {
                let mut world = open_world();
                let config = TankQuizConfig {
                    max_bullets: cap,
                    fire_cooldown_secs: 0.0,
                    ..Default::default()
                };
                let player = player_at_tile(&world, 1, 2, Direction::Right);
                let mut p = Projectiles::new();
                for (i, fire) in shots.iter().enumerate() {
                    if *fire {
                        p.fire(&player, i as f32 * DT, &config);
                    }
                    p.update(DT, &mut world);
                    prop_assert!(p.alive_count() <= cap);
                }
            }
        }
    }
}
