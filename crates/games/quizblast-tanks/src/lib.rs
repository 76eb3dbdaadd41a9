pub mod collision;
pub mod config;
pub mod error;
pub mod layout;
pub mod player;
pub mod projectile;
pub mod trigger;
pub mod world;

use quizblast_core::game_trait::{ArcadeGame, GameEvent, GameMetadata, GameMode};
use quizblast_core::hud::HudSnapshot;
use quizblast_core::input::TickInput;
use quizblast_core::question::{QuestionId, QuizOutcome};

use collision::TileImpact;
use config::TankQuizConfig;
use error::WorldError;
use layout::{WorldLayout, load_layout};
use player::{Player, PlayerStats, step_player};
use projectile::Projectiles;
use trigger::{TriggerZone, build_triggers, scan_triggers};
use world::{Tile, TileWorld};

/// Everything the simulation mutates, owned in one place.
#[derive(Debug, Clone)]
pub struct TankQuizState {
    pub world: TileWorld,
    pub player: Player,
    pub stats: PlayerStats,
    pub projectiles: Projectiles,
    pub triggers: Vec<TriggerZone>,
    pub mode: GameMode,
    pub pending_question: Option<QuestionId>,
    /// Simulated seconds spent in Playing. Drives the fire cooldown.
    pub elapsed: f32,
    pub tick: u64,
    pub game_over: bool,
}

/// Single-player tank arena where driving into a trigger pauses for a quiz.
pub struct TankQuiz {
    state: TankQuizState,
    config: TankQuizConfig,
}

impl TankQuiz {
    /// Build a session from a layout, validating config, terrain, triggers
    /// and spawn before anything runs.
    pub fn from_layout(layout: &WorldLayout, config: TankQuizConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let world = TileWorld::from_rows(&layout.rows, config.tile_size)?;
        let triggers = build_triggers(&world, &layout.triggers)?;
        let player =
            Player::spawn_at_tile(&world, layout.spawn.tx, layout.spawn.ty, layout.facing, &config)?;

        tracing::info!(
            layout = %layout.name,
            width = world.width(),
            height = world.height(),
            bricks = world.count(Tile::Brick),
            triggers = triggers.len(),
            "World loaded"
        );

        Ok(Self {
            state: TankQuizState {
                world,
                player,
                stats: PlayerStats::new(&config),
                projectiles: Projectiles::new(),
                triggers,
                mode: GameMode::Playing,
                pending_question: None,
                elapsed: 0.0,
                tick: 0,
                game_over: false,
            },
            config,
        })
    }

    /// Build a session from the on-disk config and the named layout.
    pub fn load(layout_name: &str) -> Result<Self, WorldError> {
        Self::from_layout(&load_layout(layout_name), TankQuizConfig::load())
    }

    pub fn state(&self) -> &TankQuizState {
        &self.state
    }

    pub fn config(&self) -> &TankQuizConfig {
        &self.config
    }
}

impl ArcadeGame for TankQuiz {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Quizblast Tanks".to_string(),
            description: "Drive a tank through a brick maze; trigger tiles stop play for a quiz"
                .to_string(),
        }
    }

    fn update(&mut self, dt: f32, input: &TickInput) -> Vec<GameEvent> {
        if self.state.mode == GameMode::QuizPaused || self.state.game_over {
            return Vec::new();
        }
        let mut events = Vec::new();
        let state = &mut self.state;
        state.elapsed += dt;
        state.tick += 1;

        // Movement
        step_player(&mut state.player, input.move_dir, &state.world, dt);

        // Bullets
        if input.fire
            && state
                .projectiles
                .fire(&state.player, state.elapsed, &self.config)
        {
            events.push(GameEvent::ShotFired);
        }
        for impact in state.projectiles.update(dt, &mut state.world) {
            match impact {
                TileImpact::BrickDestroyed { tx, ty } => {
                    events.push(GameEvent::BrickDestroyed { tx, ty });
                },
                TileImpact::AbsorbedBySteel { tx, ty } => {
                    events.push(GameEvent::BulletAbsorbed { tx, ty });
                },
                TileImpact::NoImpact => {},
            }
        }

        // Trigger scan
        if let Some(zone) = scan_triggers(&mut state.triggers, &state.player.rect()) {
            let question = zone.question;
            tracing::info!(question = %question, tx = zone.tx, ty = zone.ty, "Quiz triggered");
            state.mode = GameMode::QuizPaused;
            state.pending_question = Some(question);
            events.push(GameEvent::QuizStarted { question });
        }

        events
    }

    fn mode(&self) -> GameMode {
        self.state.mode
    }

    fn pending_question(&self) -> Option<QuestionId> {
        self.state.pending_question
    }

    fn resolve_question(&mut self, outcome: QuizOutcome) -> Vec<GameEvent> {
        let Some(question) = self.state.pending_question else {
            tracing::debug!(?outcome, "Ignored outcome with no pending question");
            return Vec::new();
        };

        self.state
            .stats
            .apply_outcome(outcome, self.config.ammo_reward);
        self.state.pending_question = None;
        self.state.mode = GameMode::Playing;
        tracing::info!(
            question = %question,
            ?outcome,
            ammo = self.state.stats.ammo,
            hearts = self.state.stats.hearts,
            "Quiz resolved"
        );

        let mut events = vec![GameEvent::QuizResolved { question, outcome }];
        if self.state.stats.is_dead() && !self.state.game_over {
            self.state.game_over = true;
            tracing::info!(tick = self.state.tick, "Game over");
            events.push(GameEvent::GameOver);
        }
        events
    }

    fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            ammo: self.state.stats.ammo,
            hearts: self.state.stats.hearts,
            mode: self.state.mode,
            game_over: self.state.game_over,
        }
    }

    fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    fn tick_rate(&self) -> f32 {
        self.config.tick_rate_hz
    }
}
