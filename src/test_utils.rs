#[cfg(test)]
pub mod fixtures {
    use serde_json::json;

    use crate::models::domain::{ExamConfig, ExamType, Question, Subject};
    use crate::models::dto::MissedQuestion;

    /// WAEC 2025 Mathematics with no topic
    pub fn waec_maths() -> ExamConfig {
        ExamConfig::new(ExamType::Waec, "2025", Subject::Mathematics)
    }

    fn correct_index(number: u32) -> usize {
        ((number - 1) % 4) as usize
    }

    /// Options for question `number`; the right answer moves round the four
    /// positions as the number grows.
    fn options(number: u32) -> [String; 4] {
        let answer = 2 * number as i64;
        let correct = correct_index(number) as i64;
        [0i64, 1, 2, 3].map(|k| (answer + k - correct).to_string())
    }

    fn question_text(number: u32) -> String {
        format!("Question {}: what is {} + {}?", number, number, number)
    }

    /// A well-formed quiz payload of `count` items, as a provider returns it
    pub fn quiz_payload(count: usize) -> String {
        let items: Vec<_> = (1..=count as u32)
            .map(|number| {
                json!({
                    "questionText": question_text(number),
                    "options": options(number),
                    "correctOptionIndex": correct_index(number),
                })
            })
            .collect();
        serde_json::Value::Array(items).to_string()
    }

    /// Questions with ids `1..=count`, matching `quiz_payload`
    pub fn sample_questions(count: usize) -> Vec<Question> {
        (1..=count as u32)
            .map(|number| {
                Question::new(
                    number,
                    question_text(number),
                    options(number),
                    correct_index(number),
                )
            })
            .collect()
    }

    pub fn explanation_payload(explanations: &[&str]) -> String {
        json!(explanations).to_string()
    }

    pub fn missed(question_text: &str) -> MissedQuestion {
        MissedQuestion {
            question_text: question_text.to_string(),
            selected_text: "1".to_string(),
            correct_text: "2".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn sample_questions_rotate_the_correct_option() {
        let questions = sample_questions(5);

        let positions: Vec<usize> = questions.iter().map(|q| q.correct_option_index()).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 0]);
        assert_eq!(questions[0].correct_option(), "2");
        assert_eq!(questions[3].correct_option(), "8");
    }

    #[test]
    fn quiz_payload_matches_sample_questions() {
        let items: Vec<serde_json::Value> = serde_json::from_str(&quiz_payload(3)).unwrap();
        let questions = sample_questions(3);

        for (item, question) in items.iter().zip(&questions) {
            assert_eq!(item["questionText"], question.question_text());
            assert_eq!(item["correctOptionIndex"], question.correct_option_index());
        }
    }
}
