//! Recipe source resolution.
//!
//! Raw user input is an image, a URL, or a text prompt. The resolver
//! dispatches to the right extraction strategy and degrades gracefully:
//! a failed fetch or an unusable page falls through to the next strategy,
//! and when everything fails the caller still gets a well-formed sentinel
//! recipe to render an error state from.

mod json_ld;

pub use json_ld::extract_from_document;

use crate::config::FetchConfig;
use crate::error::MealMateError;
use crate::gateway::{CompletionClient, GenerationGateway};
use crate::model::Recipe;
use crate::parsers::recipe::parse_recipe;
use log::{info, warn};
use reqwest::header::{HeaderMap, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Url};
use scraper::Html;
use std::time::Duration;

const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"];

/// Character budget for page text submitted to the model
const PAGE_TEXT_BUDGET: usize = 4000;

/// Raw input from the caller: at most one of an image or a prompt is used.
/// Supplied image bytes always win over any accompanying prompt text.
#[derive(Debug, Clone, Default)]
pub struct RecipeInput {
    pub prompt: Option<String>,
    pub image_bytes: Option<Vec<u8>>,
    pub image_mime_type: Option<String>,
}

impl RecipeInput {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        RecipeInput {
            prompt: Some(prompt.into()),
            ..Default::default()
        }
    }

    pub fn from_image(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        RecipeInput {
            image_bytes: Some(bytes),
            image_mime_type: Some(mime_type.into()),
            prompt: None,
        }
    }
}

/// Dispatches raw user input to the right extraction strategy.
pub struct RecipeSourceResolver<'a, C: CompletionClient> {
    gateway: &'a GenerationGateway<C>,
    http: Client,
}

impl<'a, C: CompletionClient> RecipeSourceResolver<'a, C> {
    pub fn new(
        gateway: &'a GenerationGateway<C>,
        fetch_config: &FetchConfig,
    ) -> Result<Self, MealMateError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, fetch_config.user_agent.parse()?);

        let http = Client::builder()
            .timeout(Duration::from_secs(fetch_config.timeout))
            .default_headers(headers)
            .build()?;

        Ok(RecipeSourceResolver { gateway, http })
    }

    /// Resolve raw input into a recipe.
    ///
    /// Never returns an error: exhausted strategies yield the sentinel
    /// recipe named "Error" so the caller's UI always has a valid object.
    pub async fn resolve(&self, input: &RecipeInput) -> Recipe {
        // Image bytes beat any accompanying prompt
        if let Some(bytes) = &input.image_bytes {
            let mime = input.image_mime_type.as_deref().unwrap_or("image/png");
            return self.from_image(bytes, mime).await;
        }

        let Some(prompt) = input.prompt.as_deref().map(str::trim).filter(|p| !p.is_empty())
        else {
            return Recipe::error_sentinel();
        };

        match parse_http_url(prompt) {
            Some(url) => self.from_url(&url).await,
            None => self.from_text(prompt).await,
        }
    }

    async fn from_image(&self, bytes: &[u8], mime_type: &str) -> Recipe {
        match self.gateway.recipe_from_image(bytes, mime_type).await {
            Ok(raw) => parse_recipe(&raw),
            Err(e) => {
                warn!("Image extraction failed: {e}");
                Recipe::error_sentinel()
            }
        }
    }

    async fn from_text(&self, prompt: &str) -> Recipe {
        match self.gateway.recipe_from_text(prompt).await {
            Ok(raw) => parse_recipe(&raw),
            Err(e) => {
                warn!("Text extraction failed: {e}");
                Recipe::error_sentinel()
            }
        }
    }

    async fn from_url(&self, url: &Url) -> Recipe {
        if is_image_url(url) {
            match self.fetch_image(url).await {
                Ok((bytes, mime)) => return self.from_image(&bytes, &mime).await,
                Err(e) => {
                    warn!("Image URL fetch failed, trying page extraction: {e}");
                }
            }
        }

        let body = match self.fetch_page(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Page fetch failed for {url}: {e}");
                return Recipe::error_sentinel();
            }
        };

        // The parsed document is processed synchronously and dropped before
        // the next await point
        let (structured, page_text) = {
            let document = Html::parse_document(&body);
            (extract_from_document(&document), extract_body_text(&document))
        };

        // Structured markup needs no model call
        if let Some(recipe) = structured {
            info!("Extracted structured recipe from {url}");
            return recipe;
        }

        let truncated: String = page_text.chars().take(PAGE_TEXT_BUDGET).collect();
        match self.gateway.recipe_from_page_text(&truncated).await {
            Ok(raw) => parse_recipe(&raw),
            Err(e) => {
                warn!("Page text extraction failed for {url}: {e}");
                Recipe::error_sentinel()
            }
        }
    }

    async fn fetch_page(&self, url: &Url) -> Result<String, MealMateError> {
        let response = self.http.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(MealMateError::ParseError(format!(
                "Fetch returned {} for {url}",
                response.status()
            )));
        }
        Ok(response.text().await?)
    }

    async fn fetch_image(&self, url: &Url) -> Result<(Vec<u8>, String), MealMateError> {
        let response = self.http.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(MealMateError::ParseError(format!(
                "Image fetch returned {} for {url}",
                response.status()
            )));
        }
        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();
        let bytes = response.bytes().await?.to_vec();
        Ok((bytes, mime))
    }
}

/// Parse the prompt as a URL with an http/https scheme.
fn parse_http_url(prompt: &str) -> Option<Url> {
    let url = Url::parse(prompt).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

/// Whether the URL path carries a known image extension.
fn is_image_url(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Extract the visible text of the document body, markup stripped.
fn extract_body_text(document: &Html) -> String {
    let selector = scraper::Selector::parse("body").unwrap();
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}
