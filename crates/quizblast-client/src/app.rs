use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use quizblast_core::game_trait::{ArcadeGame, GameEvent, GameMode};
use quizblast_core::hud::HudSink;
use quizblast_core::input::{Direction, TickInput};
use quizblast_core::question::{QuestionId, QuestionSubsystem, QuizOutcome};
use quizblast_tanks::TankQuiz;

use crate::framebuffer::Framebuffer;
use crate::renderer::{Renderer, frame_size};

/// Produces one [`TickInput`] per frame.
pub trait InputSource {
    fn sample(&mut self) -> TickInput;
}

impl<F: FnMut() -> TickInput> InputSource for F {
    fn sample(&mut self) -> TickInput {
        self()
    }
}

/// Seeded autopilot for headless runs: holds a heading for a while, then
/// picks another, firing now and then.
#[derive(Debug, Clone)]
pub struct WanderPilot {
    rng: StdRng,
    heading: Direction,
    hold: u32,
}

impl WanderPilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            heading: Direction::Right,
            hold: 0,
        }
    }
}

impl InputSource for WanderPilot {
    fn sample(&mut self) -> TickInput {
        if self.hold == 0 {
            self.heading = Direction::ALL[self.rng.random_range(0..Direction::ALL.len())];
            self.hold = self.rng.random_range(20..90);
        }
        self.hold -= 1;
        TickInput {
            move_dir: Some(self.heading),
            fire: self.rng.random_bool(0.05),
        }
    }
}

/// Tallies of a headless session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub shots: u32,
    pub bricks_destroyed: u32,
    pub quizzes: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub dismissed: u32,
    pub ammo: u32,
    pub hearts: u32,
    pub game_over: bool,
}

impl RunSummary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ShotFired => self.shots += 1,
            GameEvent::BrickDestroyed { .. } => self.bricks_destroyed += 1,
            GameEvent::QuizStarted { .. } => self.quizzes += 1,
            GameEvent::QuizResolved { outcome, .. } => match outcome {
                QuizOutcome::Correct => self.correct += 1,
                QuizOutcome::Incorrect => self.incorrect += 1,
                QuizOutcome::Dismissed => self.dismissed += 1,
            },
            GameEvent::GameOver => self.game_over = true,
            GameEvent::BulletAbsorbed { .. } => {},
        }
    }
}

/// Host that owns the game and wires it to the question subsystem, the HUD
/// and the renderer.
///
/// Per frame: simulate if playing; hand a newly pending question to the
/// subsystem; forward its outcome once one is ready; publish the HUD; draw.
pub struct App<Q, H> {
    game: TankQuiz,
    questions: Q,
    hud: H,
    renderer: Renderer,
    framebuffer: Framebuffer,
    presented: Option<QuestionId>,
    frames: u64,
}

impl<Q: QuestionSubsystem, H: HudSink> App<Q, H> {
    pub fn new(game: TankQuiz, questions: Q, hud: H, renderer: Renderer) -> Self {
        let (w, h) = frame_size(&game.state().world);
        Self {
            game,
            questions,
            hud,
            renderer,
            framebuffer: Framebuffer::new(w, h),
            presented: None,
            frames: 0,
        }
    }

    pub fn game(&self) -> &TankQuiz {
        &self.game
    }

    pub fn questions(&self) -> &Q {
        &self.questions
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame. `wall_clock_secs` feeds render-time animation only.
    pub fn frame(&mut self, input: &TickInput, wall_clock_secs: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let dt = 1.0 / self.game.tick_rate();

        if self.game.mode() == GameMode::Playing {
            events.extend(self.game.update(dt, input));
        }

        if self.game.mode() == GameMode::QuizPaused {
            if let Some(id) = self.game.pending_question()
                && self.presented != Some(id)
            {
                self.questions.present_question(id);
                self.presented = Some(id);
            }
            if let Some(outcome) = self.questions.poll_outcome() {
                events.extend(self.game.resolve_question(outcome));
                self.presented = None;
            }
        }

        self.hud.publish(&self.game.hud());
        self.renderer
            .render(&mut self.framebuffer, self.game.state(), wall_clock_secs);
        self.frames += 1;
        events
    }

    /// Drive up to `max_frames` frames, stopping early on game over.
    pub fn run<I: InputSource>(
        &mut self,
        input: &mut I,
        max_frames: u64,
        mut clock: impl FnMut() -> f32,
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        for _ in 0..max_frames {
            let sample = input.sample();
            for event in self.frame(&sample, clock()) {
                summary.record(&event);
            }
            if self.game.is_game_over() {
                tracing::info!(frame = self.frames, "Session ended");
                break;
            }
        }
        let hud = self.game.hud();
        summary.frames = self.frames;
        summary.ammo = hud.ammo;
        summary.hearts = hud.hearts;
        summary.game_over = hud.game_over;
        summary
    }
}
