use std::collections::HashMap;
use std::future::Future;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

use crate::constants::prompts::EXPLANATION_UNAVAILABLE;
use crate::errors::AppResult;

type Slot = Shared<BoxFuture<'static, String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplanationStatus {
    Missing,
    Pending,
    Ready(String),
}

/// At-most-once explanation generation per question id. Concurrent callers
/// for the same id await one shared generation.
#[derive(Default)]
pub struct ExplanationCache {
    slots: Mutex<HashMap<u32, Slot>>,
}

impl ExplanationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached or in-flight explanation for `question_id`, calling
    /// `generator` only when the id has never been requested. A failed
    /// generation is stored as the fallback text so the slot always settles.
    pub async fn ensure<F, Fut>(&self, question_id: u32, generator: F) -> String
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<String>> + Send + 'static,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            match slots.get(&question_id) {
                Some(slot) => {
                    log::debug!("Explanation for question {} already requested", question_id);
                    slot.clone()
                }
                None => {
                    log::info!("Generating explanation for question {}", question_id);
                    let pending = generator();
                    let slot = async move {
                        match pending.await {
                            Ok(text) => text,
                            Err(err) => {
                                log::warn!(
                                    "Explanation for question {} failed: {}",
                                    question_id,
                                    err
                                );
                                EXPLANATION_UNAVAILABLE.to_string()
                            }
                        }
                    }
                    .boxed()
                    .shared();
                    slots.insert(question_id, slot.clone());
                    slot
                }
            }
        };

        slot.await
    }

    pub async fn status(&self, question_id: u32) -> ExplanationStatus {
        let slots = self.slots.lock().await;
        match slots.get(&question_id) {
            None => ExplanationStatus::Missing,
            Some(slot) => match slot.peek() {
                Some(text) => ExplanationStatus::Ready(text.clone()),
                None => ExplanationStatus::Pending,
            },
        }
    }

    /// Question ids are only unique within one quiz, so a new quiz must start
    /// from an empty cache.
    pub async fn clear(&self) {
        let mut slots = self.slots.lock().await;
        if !slots.is_empty() {
            log::debug!("Clearing {} cached explanation(s)", slots.len());
        }
        slots.clear();
    }

    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.lock().await.is_empty()
    }
}
