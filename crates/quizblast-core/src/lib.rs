pub mod game_trait;
pub mod hud;
pub mod input;
pub mod question;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::VecDeque;

    use crate::game_trait::{ArcadeGame, GameEvent, GameMode};
    use crate::hud::{HudSink, HudSnapshot};
    use crate::input::TickInput;
    use crate::question::{QuestionId, QuestionSubsystem, QuizOutcome};

    /// Question subsystem that answers from a queue and records what it was shown.
    #[derive(Debug, Default)]
    pub struct RecordingQuestions {
        pub presented: Vec<QuestionId>,
        pub answers: VecDeque<QuizOutcome>,
        awaiting: bool,
    }

    impl RecordingQuestions {
        pub fn with_answers(answers: impl IntoIterator<Item = QuizOutcome>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
                ..Default::default()
            }
        }
    }

    impl QuestionSubsystem for RecordingQuestions {
        fn present_question(&mut self, id: QuestionId) {
            self.presented.push(id);
            self.awaiting = true;
        }

        fn poll_outcome(&mut self) -> Option<QuizOutcome> {
            if !self.awaiting {
                return None;
            }
            let outcome = self.answers.pop_front()?;
            self.awaiting = false;
            Some(outcome)
        }
    }

    /// HUD sink that keeps every published snapshot.
    #[derive(Debug, Default)]
    pub struct RecordingHud {
        pub snapshots: Vec<HudSnapshot>,
    }

    impl HudSink for RecordingHud {
        fn publish(&mut self, hud: &HudSnapshot) {
            self.snapshots.push(*hud);
        }
    }

    /// Run N ticks with the same input, returning all accumulated events.
    pub fn run_ticks(
        game: &mut dyn ArcadeGame,
        n: usize,
        dt: f32,
        input: &TickInput,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt, input));
        }
        all_events
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Every ArcadeGame implementation must pass these. Game crates call
    // them from their own #[cfg(test)] modules after driving the game
    // into the required mode.

    /// A paused game must not change on update, whatever the input.
    pub fn contract_paused_update_is_inert(game: &mut dyn ArcadeGame) {
        assert_eq!(game.mode(), GameMode::QuizPaused, "precondition: paused");
        let hud_before = game.hud();
        let pending_before = game.pending_question();
        let input = TickInput {
            move_dir: Some(crate::input::Direction::Right),
            fire: true,
        };
        let events = run_ticks(game, 30, 1.0 / 60.0, &input);
        assert!(events.is_empty(), "paused update must emit no events");
        assert_eq!(game.hud(), hud_before, "paused update must not touch stats");
        assert_eq!(game.pending_question(), pending_before);
        assert_eq!(game.mode(), GameMode::QuizPaused);
    }

    /// Resolving the pending question must return the game to Playing.
    pub fn contract_resolve_resumes(game: &mut dyn ArcadeGame, outcome: QuizOutcome) {
        assert_eq!(game.mode(), GameMode::QuizPaused, "precondition: paused");
        let question = game
            .pending_question()
            .expect("paused game must have a pending question");
        let events = game.resolve_question(outcome);
        assert!(
            events.contains(&GameEvent::QuizResolved { question, outcome }),
            "resolution must be reported"
        );
        assert_eq!(game.mode(), GameMode::Playing);
        assert!(game.pending_question().is_none());
        assert_eq!(game.hud().mode, GameMode::Playing);
    }

    /// Dismissing a question must not change stats.
    pub fn contract_dismiss_is_free(game: &mut dyn ArcadeGame) {
        assert_eq!(game.mode(), GameMode::QuizPaused, "precondition: paused");
        let before = game.hud();
        game.resolve_question(QuizOutcome::Dismissed);
        let after = game.hud();
        assert_eq!(before.ammo, after.ammo);
        assert_eq!(before.hearts, after.hearts);
        assert_eq!(game.mode(), GameMode::Playing);
    }

    /// An outcome with nothing pending must be ignored.
    pub fn contract_stray_outcome_ignored(game: &mut dyn ArcadeGame) {
        assert_eq!(game.mode(), GameMode::Playing, "precondition: playing");
        let before = game.hud();
        for outcome in [
            QuizOutcome::Correct,
            QuizOutcome::Incorrect,
            QuizOutcome::Dismissed,
        ] {
            let events = game.resolve_question(outcome);
            assert!(events.is_empty(), "stray outcome must emit no events");
        }
        assert_eq!(game.hud(), before, "stray outcome must not touch stats");
    }
}
