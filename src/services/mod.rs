pub mod content_service;
pub mod explanation_cache;
pub mod generation_provider;
pub mod openai_provider;
pub mod quiz_session;

pub use content_service::ContentService;
pub use explanation_cache::{ExplanationCache, ExplanationStatus};
pub use generation_provider::{GenerationOptions, GenerationProvider, TextStream};
pub use openai_provider::OpenAiProvider;
pub use quiz_session::{QuizSession, SessionPhase};
