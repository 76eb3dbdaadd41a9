use serde::{Deserialize, Serialize};

use crate::hud::HudSnapshot;
use crate::input::{InputError, TickInput, decode_input};
use crate::question::{QuestionId, QuizOutcome};

/// Core trait the host runtime drives once per frame.
///
/// The host owns input sampling, the question UI and the HUD; the game only
/// handles simulation. Rendering reads game state after `update` returns.
pub trait ArcadeGame {
    /// Metadata for the host's game picker.
    fn metadata(&self) -> GameMetadata;

    /// Advance the simulation by `dt` seconds with this tick's sampled input.
    ///
    /// While the game is in [`GameMode::QuizPaused`] (or over) this is a no-op
    /// and returns no events.
    fn update(&mut self, dt: f32, input: &TickInput) -> Vec<GameEvent>;

    /// [`ArcadeGame::update`] with input shipped as MessagePack bytes.
    ///
    /// Malformed bytes leave the game untouched and return the decode error;
    /// the host decides whether to tick again with idle input.
    fn update_encoded(&mut self, dt: f32, data: &[u8]) -> Result<Vec<GameEvent>, InputError> {
        let input = decode_input(data)?;
        Ok(self.update(dt, &input))
    }

    /// Current mode of the Playing/QuizPaused state machine.
    fn mode(&self) -> GameMode;

    /// Question waiting for an answer, if the game is paused on one.
    fn pending_question(&self) -> Option<QuestionId>;

    /// Deliver the outcome for the pending question and resume play.
    ///
    /// Outcomes received while no question is pending are ignored.
    fn resolve_question(&mut self, outcome: QuizOutcome) -> Vec<GameEvent>;

    /// Read-only stats snapshot for the status bar.
    fn hud(&self) -> HudSnapshot;

    /// Whether the session has ended (hearts exhausted).
    fn is_game_over(&self) -> bool;

    /// Simulation tick rate in Hz the host should schedule frames at.
    fn tick_rate(&self) -> f32 {
        60.0
    }
}

/// Game metadata for the host's game picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
}

/// The two-valued mode gating whether simulation phases run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Playing,
    QuizPaused,
}

/// Events emitted by a game during update or question resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired,
    BrickDestroyed { tx: u32, ty: u32 },
    BulletAbsorbed { tx: u32, ty: u32 },
    QuizStarted { question: QuestionId },
    QuizResolved { question: QuestionId, outcome: QuizOutcome },
    GameOver,
}
