use std::collections::VecDeque;
use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use quizblast_core::question::{QuestionId, QuestionSubsystem, QuizOutcome};

use crate::error::{ClientError, read_file};

/// A multiple-choice question linked to trigger zones by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub choices: Vec<String>,
    /// Index into `choices`.
    pub answer: usize,
}

/// Question content keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn from_json(json: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &str) -> Result<Self, ClientError> {
        let bank = Self::from_json(&read_file(path)?)?;
        tracing::info!(path, count = bank.questions.len(), "Question bank loaded");
        Ok(bank)
    }

    /// Small general-knowledge set matching the default layout's trigger ids.
    pub fn builtin() -> Self {
        let q = |id, prompt: &str, choices: &[&str], answer| Question {
            id: QuestionId(id),
            prompt: prompt.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            answer,
        };
        Self {
            questions: vec![
                q(1, "What is 7 x 8?", &["54", "56", "64"], 1),
                q(2, "Which planet is closest to the Sun?", &["Venus", "Mars", "Mercury"], 2),
                q(3, "How many sides does a hexagon have?", &["6", "8", "5"], 0),
                q(4, "What is the chemical symbol for iron?", &["Ir", "Fe", "In"], 1),
                q(5, "What is 2 to the power of 10?", &["1000", "1024", "2048"], 1),
            ],
        }
    }

    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Answers from a fixed script. Once the script runs out every question gets
/// `fallback`.
#[derive(Debug, Clone)]
pub struct ScriptedAnswers {
    script: VecDeque<QuizOutcome>,
    fallback: QuizOutcome,
    pending: Option<QuestionId>,
    presented: Vec<QuestionId>,
}

impl ScriptedAnswers {
    pub fn new(script: impl IntoIterator<Item = QuizOutcome>, fallback: QuizOutcome) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback,
            pending: None,
            presented: Vec::new(),
        }
    }

    /// Every question answered correctly.
    pub fn always_correct() -> Self {
        Self::new([], QuizOutcome::Correct)
    }

    pub fn presented(&self) -> &[QuestionId] {
        &self.presented
    }
}

impl QuestionSubsystem for ScriptedAnswers {
    fn present_question(&mut self, id: QuestionId) {
        self.presented.push(id);
        self.pending = Some(id);
    }

    fn poll_outcome(&mut self) -> Option<QuizOutcome> {
        self.pending.take()?;
        Some(self.script.pop_front().unwrap_or(self.fallback))
    }
}

/// Text prompt on a writer, answer read as a 1-based choice from a reader.
///
/// An empty line dismisses the question. Polling blocks on the reader, so
/// this is only suitable for interactive terminal sessions.
pub struct ConsoleQuestions<R, W> {
    bank: QuestionBank,
    reader: R,
    writer: W,
    pending: Option<QuestionId>,
}

impl<R: BufRead, W: Write> ConsoleQuestions<R, W> {
    pub fn new(bank: QuestionBank, reader: R, writer: W) -> Self {
        Self {
            bank,
            reader,
            writer,
            pending: None,
        }
    }

    fn grade(&self, id: QuestionId, line: &str) -> QuizOutcome {
        let line = line.trim();
        if line.is_empty() {
            return QuizOutcome::Dismissed;
        }
        let Some(question) = self.bank.get(id) else {
            return QuizOutcome::Dismissed;
        };
        let picked = line.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
        QuizOutcome::from_answer(picked == Some(question.answer))
    }
}

impl<R: BufRead, W: Write> QuestionSubsystem for ConsoleQuestions<R, W> {
    fn present_question(&mut self, id: QuestionId) {
        self.pending = Some(id);
        let Some(question) = self.bank.get(id) else {
            tracing::warn!(question = %id, "No question in bank for trigger, will dismiss");
            return;
        };
        let mut text = format!("\n[{id}] {}\n", question.prompt);
        for (i, choice) in question.choices.iter().enumerate() {
            text.push_str(&format!("  {}) {choice}\n", i + 1));
        }
        text.push_str("Answer (empty to skip): ");
        if let Err(e) = self
            .writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.flush())
        {
            tracing::warn!(error = %e, "Failed to write question prompt");
        }
    }

    fn poll_outcome(&mut self) -> Option<QuizOutcome> {
        let id = self.pending.take()?;
        if self.bank.get(id).is_none() {
            return Some(QuizOutcome::Dismissed);
        }
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(_) => Some(self.grade(id, &line)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read answer, dismissing");
                Some(QuizOutcome::Dismissed)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn bank_parses_and_looks_up() {
        let json = r#"{"questions":[{"id":4,"prompt":"2+2?","choices":["3","4"],"answer":1}]}"#;
        let bank = QuestionBank::from_json(json).unwrap();
        assert_eq!(bank.get(QuestionId(4)).unwrap().choices[1], "4");
        assert!(bank.get(QuestionId(5)).is_none());
    }

    #[test]
    fn bank_rejects_bad_json() {
        assert!(matches!(
            QuestionBank::from_json("{\"questions\": 7}"),
            Err(ClientError::Json(_))
        ));
    }

    #[test]
    fn missing_bank_file_is_io_error() {
        assert!(matches!(
            QuestionBank::load_from_file("/nonexistent/questions.json"),
            Err(ClientError::Io { .. })
        ));
    }

    #[test]
    fn builtin_answers_are_in_range() {
        let bank = QuestionBank::builtin();
        for q in &bank.questions {
            assert!(q.answer < q.choices.len(), "{}", q.id);
        }
    }

    #[test]
    fn scripted_answers_once_per_question() {
        let mut s = ScriptedAnswers::new([QuizOutcome::Incorrect], QuizOutcome::Correct);
        assert_eq!(s.poll_outcome(), None, "nothing presented");

        s.present_question(QuestionId(1));
        assert_eq!(s.poll_outcome(), Some(QuizOutcome::Incorrect));
        assert_eq!(s.poll_outcome(), None, "delivered exactly once");

        s.present_question(QuestionId(2));
        assert_eq!(s.poll_outcome(), Some(QuizOutcome::Correct));
        assert_eq!(s.presented(), &[QuestionId(1), QuestionId(2)]);
    }

    fn console(input: &str) -> ConsoleQuestions<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleQuestions::new(
            QuestionBank::builtin(),
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        )
    }

    #[test]
    fn console_grades_choices() {
        let mut c = console("2\n1\n\nbanana\n");
        c.present_question(QuestionId(1));
        assert_eq!(c.poll_outcome(), Some(QuizOutcome::Correct));
        c.present_question(QuestionId(1));
        assert_eq!(c.poll_outcome(), Some(QuizOutcome::Incorrect));
        c.present_question(QuestionId(1));
        assert_eq!(c.poll_outcome(), Some(QuizOutcome::Dismissed));
        c.present_question(QuestionId(1));
        assert_eq!(c.poll_outcome(), Some(QuizOutcome::Incorrect));

        let shown = String::from_utf8(c.writer.clone()).unwrap();
        assert!(shown.contains("What is 7 x 8?"));
        assert!(shown.contains("2) 56"));
    }

    #[test]
    fn console_eof_dismisses() {
        let mut c = console("");
        c.present_question(QuestionId(2));
        assert_eq!(c.poll_outcome(), Some(QuizOutcome::Dismissed));
    }

    #[test]
    fn console_unknown_question_dismisses_without_reading() {
        let mut c = console("1\n");
        c.present_question(QuestionId(99));
        assert_eq!(c.poll_outcome(), Some(QuizOutcome::Dismissed));
        c.present_question(QuestionId(3));
        assert_eq!(c.poll_outcome(), Some(QuizOutcome::Correct));
    }
}
