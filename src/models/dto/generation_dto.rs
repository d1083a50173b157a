use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, AppResult};
use crate::models::domain::question::{Question, OPTION_COUNT};
use crate::models::domain::QuestionResult;

/// Shape the provider is asked to emit for each quiz item.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    #[validate(length(min = 1))]
    pub question_text: String,

    #[validate(length(equal = 4))]
    pub options: Vec<String>,

    #[validate(range(min = 0, max = 3))]
    pub correct_option_index: i64,
}

impl GeneratedQuestion {
    /// Validates the draft and turns it into a session question. Any
    /// identifier the provider may have supplied is ignored; `id` is the
    /// 1-based position in the batch.
    pub fn into_question(self, id: u32) -> AppResult<Question> {
        self.validate().map_err(|e| {
            AppError::SchemaError(format!("Question {} does not match the declared shape: {}", id, e))
        })?;

        if self.question_text.trim().is_empty() {
            return Err(AppError::SchemaError(format!(
                "Question {} has blank question text",
                id
            )));
        }

        let options: [String; OPTION_COUNT] = self.options.try_into().map_err(|_| {
            AppError::SchemaError(format!("Question {} must have exactly {} options", id, OPTION_COUNT))
        })?;

        Ok(Question::new(
            id,
            self.question_text,
            options,
            self.correct_option_index as usize,
        ))
    }
}

/// One missed question sent for explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissedQuestion {
    pub question_text: String,
    pub selected_text: String,
    pub correct_text: String,
}

const NO_ANSWER: &str = "No answer selected";

impl From<&QuestionResult> for MissedQuestion {
    fn from(result: &QuestionResult) -> Self {
        MissedQuestion {
            question_text: result.question_text.clone(),
            selected_text: result.selected_text().unwrap_or(NO_ANSWER).to_string(),
            correct_text: result.correct_text().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(options: Vec<&str>, index: i64) -> GeneratedQuestion {
        GeneratedQuestion {
            question_text: "Solve $x + 1 = 3$".to_string(),
            options: options.into_iter().map(String::from).collect(),
            correct_option_index: index,
        }
    }

    #[test]
    fn valid_draft_becomes_question_with_given_id() {
        let question = draft(vec!["1", "2", "3", "4"], 1).into_question(7).unwrap();

        assert_eq!(question.id(), 7);
        assert_eq!(question.correct_option(), "2");
    }

    #[test]
    fn wrong_option_count_is_a_schema_error() {
        let err = draft(vec!["1", "2", "3"], 0).into_question(1).unwrap_err();
        assert_eq!(err.error_code(), "SCHEMA_ERROR");
    }

    #[test]
    fn out_of_range_answer_index_is_a_schema_error() {
        assert!(draft(vec!["1", "2", "3", "4"], 4).into_question(1).is_err());
        assert!(draft(vec!["1", "2", "3", "4"], -1).into_question(1).is_err());
    }

    #[test]
    fn blank_question_text_is_rejected() {
        let mut question = draft(vec!["1", "2", "3", "4"], 0);
        question.question_text = "  ".to_string();

        assert!(question.into_question(1).is_err());
    }

    #[test]
    fn deserializes_camel_case_and_ignores_provider_ids() {
        let value = json!({
            "id": 99,
            "questionText": "Which is a noble gas?",
            "options": ["Neon", "Nitrogen", "Oxygen", "Sodium"],
            "correctOptionIndex": 0
        });

        let parsed: GeneratedQuestion = serde_json::from_value(value).unwrap();
        let question = parsed.into_question(1).unwrap();

        assert_eq!(question.id(), 1);
        assert_eq!(question.correct_option(), "Neon");
    }

    #[test]
    fn schema_declares_the_three_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(GeneratedQuestion)).unwrap();
        let properties = &schema["properties"];

        assert!(properties.get("questionText").is_some());
        assert!(properties.get("options").is_some());
        assert!(properties.get("correctOptionIndex").is_some());
    }

    #[test]
    fn skipped_result_is_described_as_no_answer() {
        let question = Question::new(
            2,
            "2 + 2".to_string(),
            ["3".into(), "4".into(), "5".into(), "6".into()],
            1,
        );
        let missed = MissedQuestion::from(&QuestionResult::grade(&question, None));

        assert_eq!(missed.selected_text, "No answer selected");
        assert_eq!(missed.correct_text, "4");
    }
}
