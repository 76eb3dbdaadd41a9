use serde::{Deserialize, Serialize};

/// Identifier of a question in the external question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u32);

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// How a presented question was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizOutcome {
    Correct,
    Incorrect,
    /// Closed without an answer. Resumes play with no stat change.
    Dismissed,
}

impl QuizOutcome {
    pub fn from_answer(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }
}

/// The external question-answering subsystem.
///
/// The host calls `present_question` when the game enters quiz mode, then
/// polls `poll_outcome` once per frame until it yields. Each presented
/// question must yield exactly one outcome.
pub trait QuestionSubsystem {
    fn present_question(&mut self, id: QuestionId);

    fn poll_outcome(&mut self) -> Option<QuizOutcome>;
}
