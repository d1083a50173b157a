use serde::Serialize;

pub const OPTION_COUNT: usize = 4;

/// A generated multiple-choice question. Only the content pipeline creates
/// questions, and they never change afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: u32,
    question_text: String,
    options: [String; OPTION_COUNT],
    correct_option_index: usize,
}

impl Question {
    pub(crate) fn new(
        id: u32,
        question_text: String,
        options: [String; OPTION_COUNT],
        correct_option_index: usize,
    ) -> Self {
        debug_assert!(id > 0);
        debug_assert!(correct_option_index < OPTION_COUNT);
        Question {
            id,
            question_text,
            options,
            correct_option_index,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_option_index]
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_option_index
    }
}
