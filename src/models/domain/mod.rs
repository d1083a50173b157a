pub mod exam_config;
pub mod question;
pub mod question_result;
pub use exam_config::{ExamConfig, ExamType, Subject};
pub use question::Question;
pub use question_result::{QuestionResult, QuizScore};
