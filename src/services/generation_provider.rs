use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::config::Config;
use crate::errors::AppResult;

/// Fragments of a streamed completion, in arrival order.
pub type TextStream = BoxStream<'static, AppResult<String>>;

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f32,
}

impl From<&Config> for GenerationOptions {
    fn from(config: &Config) -> Self {
        GenerationOptions {
            model: config.generation_model.clone(),
            temperature: config.generation_temperature,
        }
    }
}

/// External text-generation capability. Implementations report transport
/// failures as `ProviderError` and never retry on their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn stream_text(&self, prompt: &str, options: &GenerationOptions)
        -> AppResult<TextStream>;

    /// Returns the raw payload text; callers strip fences and parse it
    /// against `schema` themselves.
    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        options: &GenerationOptions,
    ) -> AppResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_config() {
        let options = GenerationOptions::from(&Config::test_config());

        assert_eq!(options.model, "test-model");
        assert_eq!(options.temperature, 0.5);
    }

    #[test]
    fn provider_trait_objects_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GenerationProvider>();
    }
}
