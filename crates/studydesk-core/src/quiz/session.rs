use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::TestResult;
use crate::error::{DataError, Result};

/// One multiple-choice question, in its stored shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "q")]
    pub statement: String,
    #[serde(rename = "opts")]
    pub options: Vec<String>,
    /// Index of the right option.
    #[serde(rename = "a")]
    pub answer: usize,
    #[serde(rename = "expl", default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(rename = "periodo", default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl Question {
    pub fn explanation(&self) -> &str {
        self.explanation
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or("No explanation available.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question: usize,
    pub selected: usize,
    pub correct: bool,
}

/// What `next` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(usize),
    Finished,
}

/// A finished test, ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub result: TestResult,
    pub review: Vec<AnswerRecord>,
}

/// State of a running test.
#[derive(Debug, Clone)]
pub struct QuizSession {
    subject: String,
    questions: Vec<Question>,
    current: usize,
    selected: Option<usize>,
    revealed: bool,
    answers: Vec<AnswerRecord>,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn start(
        subject: impl Into<String>,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self> {
        if questions.is_empty() {
            return Err(DataError::NoQuestions);
        }
        Ok(Self {
            subject: subject.into(),
            questions,
            current: 0,
            selected: None,
            revealed: false,
            answers: Vec::new(),
            started_at,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether the current answer was confirmed and its explanation shown.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Pick an option. Ignored once the answer is confirmed.
    pub fn select(&mut self, option: usize) -> Result<bool> {
        if self.revealed {
            return Ok(false);
        }
        if option >= self.current().options.len() {
            return Err(DataError::Quiz(format!("no option {}", option)));
        }
        self.selected = Some(option);
        Ok(true)
    }

    /// Record the selected option and reveal the explanation.
    pub fn confirm(&mut self) -> Result<&AnswerRecord> {
        if self.revealed {
            return Err(DataError::Quiz("answer already confirmed".into()));
        }
        let selected = self
            .selected
            .ok_or_else(|| DataError::Quiz("no option selected".into()))?;
        let record = AnswerRecord {
            question: self.current,
            selected,
            correct: selected == self.current().answer,
        };
        self.answers.push(record);
        self.revealed = true;
        Ok(&self.answers[self.answers.len() - 1])
    }

    pub fn next(&mut self) -> Result<Advance> {
        if !self.revealed {
            return Err(DataError::Quiz("confirm the answer first".into()));
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            self.selected = None;
            self.revealed = false;
            Ok(Advance::Next(self.current))
        } else {
            Ok(Advance::Finished)
        }
    }

    /// Score the test. Unanswered questions count as wrong.
    pub fn finish(self, now: DateTime<Utc>) -> Result<QuizOutcome> {
        let duration = (now - self.started_at).num_seconds().max(0) as u64;
        let correct = self.answers.iter().filter(|a| a.correct).count() as u32;
        let result = TestResult::from_answers(
            self.subject,
            correct,
            self.questions.len() as u32,
            duration,
        )?;
        Ok(QuizOutcome {
            result,
            review: self.answers,
        })
    }
}
