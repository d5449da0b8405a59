mod gemini;
pub mod prompt;

pub use gemini::GeminiClient;

use crate::error::MealMateError;
use async_trait::async_trait;

/// Low-level transport to a text/vision completion service.
///
/// Implemented by `GeminiClient`; tests substitute their own
/// implementations to avoid network calls.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Submit a text prompt and return the raw completion text
    async fn complete(&self, prompt: &str) -> Result<String, MealMateError>;

    /// Submit an image plus a text prompt and return the raw completion text
    async fn complete_with_image(
        &self,
        prompt: &str,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, MealMateError>;
}

/// Thin façade over the completion service.
///
/// Each verb is a prompt-construction plus completion-call round trip.
/// Errors propagate as a single generic service-unavailable condition; the
/// gateway does not retry or distinguish upstream failure subtypes.
pub struct GenerationGateway<C: CompletionClient> {
    client: C,
}

impl<C: CompletionClient> GenerationGateway<C> {
    pub fn new(client: C) -> Self {
        GenerationGateway { client }
    }

    /// Extract a recipe from an image, in the labeled-section format.
    pub async fn recipe_from_image(
        &self,
        image_bytes: &[u8],
        mime_type: &str,
    ) -> Result<String, MealMateError> {
        self.client
            .complete_with_image(prompt::RECIPE_FORMAT_PROMPT, image_bytes, mime_type)
            .await
    }

    /// Extract a recipe from a free-text request, as strict JSON.
    pub async fn recipe_from_text(&self, user_prompt: &str) -> Result<String, MealMateError> {
        self.client
            .complete(&prompt::structured_recipe_prompt(user_prompt))
            .await
    }

    /// Extract a recipe from raw webpage text, as strict JSON.
    pub async fn recipe_from_page_text(&self, page_text: &str) -> Result<String, MealMateError> {
        self.client
            .complete(&prompt::webpage_content_prompt(page_text))
            .await
    }

    /// Generate a multi-day meal plan seeded with saved recipe titles.
    pub async fn meal_plan_from_titles(
        &self,
        titles: &[String],
        day_count: u32,
    ) -> Result<String, MealMateError> {
        if titles.is_empty() {
            return Err(MealMateError::InvalidInput(
                "No recipes provided for meal plan generation.".to_string(),
            ));
        }
        self.client
            .complete(&prompt::meal_plan_prompt(titles, day_count))
            .await
    }

    /// Open-ended conversational reply with the assistant persona.
    pub async fn chat_reply(&self, user_message: &str) -> Result<String, MealMateError> {
        if user_message.trim().is_empty() {
            return Err(MealMateError::InvalidInput(
                "Cannot generate reply for an empty message.".to_string(),
            ));
        }
        self.client.complete(&prompt::chat_prompt(user_message)).await
    }
}
