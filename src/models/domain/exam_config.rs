use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const DEFAULT_TOPIC: &str = "general";
const YEAR_WINDOW: i32 = 16;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Copy)]
pub enum ExamType {
    #[serde(rename = "WAEC")]
    Waec,
    #[serde(rename = "NECO")]
    Neco,
    #[serde(rename = "JAMB")]
    Jamb,
}

impl ExamType {
    pub const ALL: [ExamType; 3] = [ExamType::Waec, ExamType::Neco, ExamType::Jamb];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExamType::Waec => "WAEC",
            ExamType::Neco => "NECO",
            ExamType::Jamb => "JAMB",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExamType::ALL
            .into_iter()
            .find(|exam| exam.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::ValidationError(format!("Unknown exam type '{}'", s)))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Copy)]
pub enum Subject {
    Mathematics,
    #[serde(rename = "English Language")]
    EnglishLanguage,
    Physics,
    Chemistry,
    Biology,
    Economics,
    Government,
    #[serde(rename = "Literature in English")]
    LiteratureInEnglish,
    Geography,
}

impl Subject {
    pub const ALL: [Subject; 9] = [
        Subject::Mathematics,
        Subject::EnglishLanguage,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::Economics,
        Subject::Government,
        Subject::LiteratureInEnglish,
        Subject::Geography,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Mathematics => "Mathematics",
            Subject::EnglishLanguage => "English Language",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
            Subject::Economics => "Economics",
            Subject::Government => "Government",
            Subject::LiteratureInEnglish => "Literature in English",
            Subject::Geography => "Geography",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::ValidationError(format!("Unknown subject '{}'", s)))
    }
}

/// The exam context a learner studies under. Replaced wholesale, never
/// edited in place.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExamConfig {
    pub exam_type: ExamType,
    pub year: String,
    pub subject: Subject,
    pub topic: String,
}

impl ExamConfig {
    pub fn new(exam_type: ExamType, year: &str, subject: Subject) -> Self {
        ExamConfig {
            exam_type,
            year: year.to_string(),
            subject,
            topic: String::new(),
        }
    }

    pub fn with_topic(mut self, topic: &str) -> Self {
        self.topic = topic.to_string();
        self
    }

    pub fn topic_or_default(&self) -> &str {
        let topic = self.topic.trim();
        if topic.is_empty() {
            DEFAULT_TOPIC
        } else {
            topic
        }
    }

    /// Years offered for selection, newest first.
    pub fn year_options(current_year: i32) -> Vec<String> {
        (0..YEAR_WINDOW)
            .map(|offset| (current_year - offset).to_string())
            .collect()
    }
}
