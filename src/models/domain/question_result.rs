use serde::{Serialize, Serializer};

use crate::models::domain::question::{Question, OPTION_COUNT};

/// Graded outcome of one question. Holds its own copy of the question text
/// and options so later changes to the live quiz cannot alter it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: u32,
    pub question_text: String,
    pub options: [String; OPTION_COUNT],
    /// `None` when the question was skipped; serialised as `-1`.
    #[serde(serialize_with = "serialize_selection")]
    pub selected_option_index: Option<usize>,
    pub correct_option_index: usize,
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

fn serialize_selection<S: Serializer>(
    selected: &Option<usize>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match selected {
        Some(index) => serializer.serialize_i64(*index as i64),
        None => serializer.serialize_i64(-1),
    }
}

impl QuestionResult {
    pub fn grade(question: &Question, selected_option_index: Option<usize>) -> Self {
        let is_correct = selected_option_index
            .map(|index| question.is_correct(index))
            .unwrap_or(false);

        QuestionResult {
            question_id: question.id(),
            question_text: question.question_text().to_string(),
            options: question.options().clone(),
            selected_option_index,
            correct_option_index: question.correct_option_index(),
            is_correct,
            explanation: None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.selected_option_index.is_none()
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected_option_index
            .and_then(|index| self.options.get(index))
            .map(String::as_str)
    }

    pub fn correct_text(&self) -> &str {
        &self.options[self.correct_option_index]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
}

impl QuizScore {
    pub fn from_results(results: &[QuestionResult]) -> Self {
        QuizScore {
            correct: results.iter().filter(|r| r.is_correct).count(),
            total: results.len(),
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 * 100.0 / self.total as f64
    }
}
