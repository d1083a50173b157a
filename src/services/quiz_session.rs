use std::collections::HashMap;

use serde::Serialize;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        question::OPTION_COUNT, Question, QuestionResult, QuizScore,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Empty,
    InProgress,
    Graded,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Empty => write!(f, "empty"),
            SessionPhase::InProgress => write!(f, "in progress"),
            SessionPhase::Graded => write!(f, "graded"),
        }
    }
}

/// Navigation, answer capture and grading for one quiz at a time.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    questions: Vec<Question>,
    current_index: usize,
    answers: HashMap<u32, usize>,
    results: Option<Vec<QuestionResult>>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.results.is_some() {
            SessionPhase::Graded
        } else if self.questions.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::InProgress
        }
    }

    pub fn is_completed(&self) -> bool {
        self.phase() == SessionPhase::Graded
    }

    /// Starts a new quiz, discarding any previous answers and results.
    pub fn load(&mut self, questions: Vec<Question>) -> AppResult<()> {
        if self.phase() == SessionPhase::InProgress {
            return Err(AppError::InvalidState(
                "Cannot load a quiz while another is in progress".to_string(),
            ));
        }
        if questions.is_empty() {
            return Err(AppError::ValidationError(
                "Cannot load a quiz without questions".to_string(),
            ));
        }

        log::debug!("Loading quiz with {} questions", questions.len());
        self.questions = questions;
        self.current_index = 0;
        self.answers.clear();
        self.results = None;
        Ok(())
    }

    /// Discards the current quiz, whatever its phase.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn select_option(&mut self, question_id: u32, option_index: usize) -> AppResult<()> {
        self.require(SessionPhase::InProgress, "select an option")?;

        if !self.questions.iter().any(|q| q.id() == question_id) {
            return Err(AppError::ValidationError(format!(
                "Question {} is not part of this quiz",
                question_id
            )));
        }
        if option_index >= OPTION_COUNT {
            return Err(AppError::ValidationError(format!(
                "Option index {} is out of range",
                option_index
            )));
        }

        self.answers.insert(question_id, option_index);
        Ok(())
    }

    pub fn advance(&mut self) -> AppResult<()> {
        self.require(SessionPhase::InProgress, "advance")?;
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        }
        Ok(())
    }

    pub fn retreat(&mut self) -> AppResult<()> {
        self.require(SessionPhase::InProgress, "go back")?;
        self.current_index = self.current_index.saturating_sub(1);
        Ok(())
    }

    /// Grades every question in quiz order; unanswered questions are wrong.
    pub fn submit(&mut self) -> AppResult<&[QuestionResult]> {
        self.require(SessionPhase::InProgress, "submit")?;

        let results: Vec<QuestionResult> = self
            .questions
            .iter()
            .map(|question| QuestionResult::grade(question, self.answers.get(&question.id()).copied()))
            .collect();

        let score = QuizScore::from_results(&results);
        log::info!(
            "Quiz graded: {}/{} correct, {} unanswered",
            score.correct,
            score.total,
            self.unanswered_count()
        );

        Ok(self.results.insert(results))
    }

    /// The only change allowed to a graded result.
    pub fn attach_explanation(&mut self, question_id: u32, explanation: String) -> AppResult<()> {
        let results = self.results.as_mut().ok_or_else(|| {
            AppError::InvalidState("Cannot attach an explanation before grading".to_string())
        })?;

        let result = results
            .iter_mut()
            .find(|r| r.question_id == question_id)
            .ok_or_else(|| {
                AppError::ValidationError(format!("No graded result for question {}", question_id))
            })?;

        result.explanation = Some(explanation);
        Ok(())
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn selected_option(&self, question_id: u32) -> Option<usize> {
        self.answers.get(&question_id).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn unanswered_count(&self) -> usize {
        self.questions.len() - self.answers.len()
    }

    pub fn is_fully_answered(&self) -> bool {
        !self.questions.is_empty() && self.unanswered_count() == 0
    }

    pub fn results(&self) -> Option<&[QuestionResult]> {
        self.results.as_deref()
    }

    pub fn result(&self, question_id: u32) -> Option<&QuestionResult> {
        self.results()?.iter().find(|r| r.question_id == question_id)
    }

    pub fn score(&self) -> Option<QuizScore> {
        self.results().map(QuizScore::from_results)
    }

    fn require(&self, expected: SessionPhase, action: &str) -> AppResult<()> {
        let phase = self.phase();
        if phase != expected {
            return Err(AppError::InvalidState(format!(
                "Cannot {} while the quiz is {}",
                action, phase
            )));
        }
        Ok(())
    }
}
