use std::env;

use chrono::{Datelike, Utc};
use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};
use crate::models::domain::{ExamConfig, ExamType, Subject};

#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: SecretString,
    pub openai_api_base: String,
    pub generation_model: String,
    pub generation_temperature: f32,
    pub exam_type: String,
    pub exam_year: String,
    pub exam_subject: String,
    pub exam_topic: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: SecretString::from(env::var("OPENAI_API_KEY").unwrap_or_default()),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            generation_temperature: env::var("GENERATION_TEMPERATURE")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(0.7),
            exam_type: env::var("EXAM_TYPE").unwrap_or_else(|_| "WAEC".to_string()),
            exam_year: env::var("EXAM_YEAR").unwrap_or_else(|_| Utc::now().year().to_string()),
            exam_subject: env::var("EXAM_SUBJECT").unwrap_or_else(|_| "Mathematics".to_string()),
            exam_topic: env::var("EXAM_TOPIC").unwrap_or_default(),
        }
    }

    /// Checks settings the provider cannot work without.
    pub fn validate(&self) -> AppResult<()> {
        if self.openai_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ConfigError(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.generation_temperature) {
            return Err(AppError::ConfigError(format!(
                "GENERATION_TEMPERATURE must be between 0 and 2, got {}",
                self.generation_temperature
            )));
        }

        Ok(())
    }

    /// Initial exam context for the session.
    pub fn exam_config(&self) -> AppResult<ExamConfig> {
        let exam_type: ExamType = self.exam_type.parse()?;
        let subject: Subject = self.exam_subject.parse()?;
        Ok(ExamConfig::new(exam_type, &self.exam_year, subject).with_topic(&self.exam_topic))
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            openai_api_key: SecretString::from("test-api-key".to_string()),
            openai_api_base: "http://127.0.0.1:8080/v1".to_string(),
            generation_model: "test-model".to_string(),
            generation_temperature: 0.5,
            exam_type: "WAEC".to_string(),
            exam_year: "2025".to_string(),
            exam_subject: "Mathematics".to_string(),
            exam_topic: String::new(),
        }
    }
}
