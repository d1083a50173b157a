use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_stream::stream;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    markup::{BlockNode, TutorialDocument},
    models::{
        domain::{ExamConfig, Question},
        dto::MissedQuestion,
    },
    services::{
        ContentService, ExplanationCache, ExplanationStatus, GenerationOptions,
        GenerationProvider, QuizSession,
    },
};

/// Progressive tutorial state after one more fragment has arrived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorialUpdate {
    pub fragment: String,
    pub text: String,
    pub blocks: Vec<BlockNode>,
}

/// One learner's session: the exam context, the current quiz and its
/// explanations. Starting any generation supersedes an older tutorial stream.
pub struct ExamSession {
    id: Uuid,
    config: ExamConfig,
    /// Context the current quiz was generated for.
    quiz_config: ExamConfig,
    content: ContentService,
    quiz: QuizSession,
    explanations: Arc<ExplanationCache>,
    generation: Arc<AtomicU64>,
}

impl ExamSession {
    pub fn new(
        provider: Arc<dyn GenerationProvider>,
        options: GenerationOptions,
        config: ExamConfig,
    ) -> Self {
        let id = Uuid::new_v4();
        log::info!(
            "Session {} created for {} {} {}",
            id,
            config.exam_type,
            config.year,
            config.subject
        );

        Self {
            id,
            quiz_config: config.clone(),
            config,
            content: ContentService::new(provider, options),
            quiz: QuizSession::new(),
            explanations: Arc::new(ExplanationCache::new()),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_config(config: &Config, provider: Arc<dyn GenerationProvider>) -> AppResult<Self> {
        config.validate()?;
        Ok(Self::new(
            provider,
            GenerationOptions::from(config),
            config.exam_config()?,
        ))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    pub fn quiz(&self) -> &QuizSession {
        &self.quiz
    }

    pub fn quiz_mut(&mut self) -> &mut QuizSession {
        &mut self.quiz
    }

    /// Replaces the exam context for future generations.
    pub fn configure(&mut self, config: ExamConfig) {
        self.supersede();
        log::info!(
            "Session {} reconfigured to {} {} {} ({})",
            self.id,
            config.exam_type,
            config.year,
            config.subject,
            config.topic_or_default()
        );
        self.config = config;
    }

    /// Streams the tutorial as progressively parsed updates. The stream ends
    /// early, without an error, once a newer generation has started.
    pub fn start_tutorial(&self) -> BoxStream<'static, AppResult<TutorialUpdate>> {
        let epoch = self.supersede();
        let generation = Arc::clone(&self.generation);
        let mut fragments = self.content.generate_tutorial(&self.config);
        let session_id = self.id;

        Box::pin(stream! {
            let mut document = TutorialDocument::new();

            while let Some(fragment) = fragments.next().await {
                if generation.load(Ordering::SeqCst) != epoch {
                    log::warn!(
                        "Session {}: tutorial superseded, dropping remaining fragments",
                        session_id
                    );
                    return;
                }

                match fragment {
                    Ok(fragment) => {
                        let blocks = document.append(&fragment).to_vec();
                        yield Ok(TutorialUpdate {
                            fragment,
                            text: document.text().to_string(),
                            blocks,
                        });
                    }
                    Err(err) => {
                        yield Err(err);
                        return;
                    }
                }
            }
        })
    }

    /// Generates and loads a new quiz. On failure the previous quiz, if any,
    /// is left as it was.
    pub async fn start_quiz(&mut self) -> AppResult<&[Question]> {
        self.supersede();
        let config = self.config.clone();
        let questions = self.content.generate_quiz(&config).await?;

        self.explanations.clear().await;
        self.quiz_config = config;
        self.quiz.reset();
        self.quiz.load(questions)?;

        log::info!(
            "Session {} started a quiz of {} questions",
            self.id,
            self.quiz.questions().len()
        );
        Ok(self.quiz.questions())
    }

    /// Explanation for a missed question of the graded quiz, generated at
    /// most once per question.
    pub async fn explain(&self, question_id: u32) -> AppResult<String> {
        if !self.quiz.is_completed() {
            return Err(AppError::InvalidState(
                "Explanations are available after the quiz is submitted".to_string(),
            ));
        }

        let result = self.quiz.result(question_id).ok_or_else(|| {
            AppError::ValidationError(format!("Question {} is not part of this quiz", question_id))
        })?;
        if result.is_correct {
            return Err(AppError::ValidationError(format!(
                "Question {} was answered correctly",
                question_id
            )));
        }

        let missed = MissedQuestion::from(result);
        let content = self.content.clone();
        let config = self.quiz_config.clone();

        let text = self
            .explanations
            .ensure(question_id, move || async move {
                content
                    .generate_explanations(&config, std::slice::from_ref(&missed))
                    .await
                    .into_iter()
                    .next()
                    .ok_or_else(|| AppError::SchemaError("No explanation returned".to_string()))
            })
            .await;

        Ok(text)
    }

    /// Like [`explain`](Self::explain), and records the text on the result.
    pub async fn analyze(&mut self, question_id: u32) -> AppResult<String> {
        let text = self.explain(question_id).await?;
        self.quiz.attach_explanation(question_id, text.clone())?;
        Ok(text)
    }

    pub async fn explanation_status(&self, question_id: u32) -> ExplanationStatus {
        self.explanations.status(question_id).await
    }

    fn supersede(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}
