use std::sync::Arc;

use async_stream::stream;
use chrono::Utc;
use futures::StreamExt;
use once_cell::sync::Lazy;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    constants::prompts::{self, EXPLANATION_UNAVAILABLE, QUIZ_QUESTION_COUNT},
    errors::{AppError, AppResult},
    models::{
        domain::{ExamConfig, Question},
        dto::{GeneratedQuestion, MissedQuestion},
    },
    services::generation_provider::{GenerationOptions, GenerationProvider, TextStream},
};

static QUIZ_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::to_value(schemars::schema_for!(Vec<GeneratedQuestion>)).unwrap_or(Value::Null)
});

static EXPLANATION_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::to_value(schemars::schema_for!(Vec<String>)).unwrap_or(Value::Null)
});

/// Turns an exam context into tutorial text, quiz questions and
/// explanations through the generation provider.
#[derive(Clone)]
pub struct ContentService {
    provider: Arc<dyn GenerationProvider>,
    options: GenerationOptions,
}

impl ContentService {
    pub fn new(provider: Arc<dyn GenerationProvider>, options: GenerationOptions) -> Self {
        Self { provider, options }
    }

    /// Lazily streams a tutorial. Nothing is sent to the provider until the
    /// stream is first polled. The first error ends the stream.
    pub fn generate_tutorial(&self, config: &ExamConfig) -> TextStream {
        let provider = Arc::clone(&self.provider);
        let options = self.options.clone();
        let prompt = prompts::tutorial_prompt(config, &freshness_token());
        let subject = config.subject;

        Box::pin(stream! {
            log::info!("Starting tutorial stream for {}", subject);

            let mut fragments = match provider.stream_text(&prompt, &options).await {
                Ok(fragments) => fragments,
                Err(err) => {
                    log::error!("Tutorial stream could not start: {}", err);
                    yield Err(err.into_generation_failure());
                    return;
                }
            };

            let mut delivered = 0usize;
            while let Some(fragment) = fragments.next().await {
                match fragment {
                    Ok(text) => {
                        delivered += 1;
                        yield Ok(text);
                    }
                    Err(err) => {
                        log::error!("Tutorial stream failed after {} fragments: {}", delivered, err);
                        yield Err(err.into_generation_failure());
                        return;
                    }
                }
            }

            log::info!("Tutorial stream finished after {} fragments", delivered);
        })
    }

    /// Generates a full quiz or fails; a partial quiz is never returned.
    pub async fn generate_quiz(&self, config: &ExamConfig) -> AppResult<Vec<Question>> {
        let prompt = prompts::quiz_prompt(config, QUIZ_QUESTION_COUNT, &freshness_token());
        log::info!(
            "Generating {} {} questions on '{}'",
            config.exam_type,
            config.subject,
            config.topic_or_default()
        );

        let raw = self
            .provider
            .generate_structured(&prompt, &QUIZ_SCHEMA, &self.options)
            .await
            .map_err(AppError::into_generation_failure)?;

        let questions = parse_quiz_payload(&raw).map_err(|err| {
            log::error!("Rejected quiz payload: {}", err);
            err.into_generation_failure()
        })?;

        log::info!("Generated {} questions", questions.len());
        Ok(questions)
    }

    /// Always returns one string per input, in input order. Provider or
    /// payload failures degrade to the fallback text instead of an error.
    pub async fn generate_explanations(
        &self,
        config: &ExamConfig,
        missed: &[MissedQuestion],
    ) -> Vec<String> {
        if missed.is_empty() {
            return Vec::new();
        }

        match self.request_explanations(config, missed).await {
            Ok(explanations) => explanations,
            Err(err) => {
                log::warn!(
                    "Explanations unavailable for {} question(s): {}",
                    missed.len(),
                    err
                );
                vec![EXPLANATION_UNAVAILABLE.to_string(); missed.len()]
            }
        }
    }

    async fn request_explanations(
        &self,
        config: &ExamConfig,
        missed: &[MissedQuestion],
    ) -> AppResult<Vec<String>> {
        let prompt = prompts::explanation_prompt(config, missed);
        let raw = self
            .provider
            .generate_structured(&prompt, &EXPLANATION_SCHEMA, &self.options)
            .await?;

        let explanations: Vec<String> = serde_json::from_str(strip_code_fences(&raw))?;
        if explanations.len() != missed.len() {
            return Err(AppError::SchemaError(format!(
                "Expected {} explanations, got {}",
                missed.len(),
                explanations.len()
            )));
        }

        Ok(explanations)
    }
}

/// Opaque per-request value that keeps the provider from replaying a cached
/// answer. Only its uniqueness matters.
pub fn freshness_token() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple())
}

/// Removes a surrounding Markdown code fence (with or without a language
/// tag) that providers sometimes add around JSON.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Validates a quiz payload and assigns ids by position. Surplus items past
/// the quiz length are dropped; too few is an error.
pub fn parse_quiz_payload(raw: &str) -> AppResult<Vec<Question>> {
    let drafts: Vec<GeneratedQuestion> = serde_json::from_str(strip_code_fences(raw))?;

    if drafts.len() < QUIZ_QUESTION_COUNT {
        return Err(AppError::SchemaError(format!(
            "Expected {} questions, got {}",
            QUIZ_QUESTION_COUNT,
            drafts.len()
        )));
    }
    if drafts.len() > QUIZ_QUESTION_COUNT {
        log::warn!(
            "Provider returned {} questions, keeping the first {}",
            drafts.len(),
            QUIZ_QUESTION_COUNT
        );
    }

    drafts
        .into_iter()
        .take(QUIZ_QUESTION_COUNT)
        .enumerate()
        .map(|(index, draft)| draft.into_question(index as u32 + 1))
        .collect()
}
