use thiserror::Error;

/// Errors that can occur during recipe extraction and meal plan generation
#[derive(Error, Debug)]
pub enum MealMateError {
    /// Failed to fetch a webpage or image over HTTP
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The generative language service failed or returned an unusable response
    #[error("Generation service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Failed to parse structured data out of model output or page markup
    #[error("Failed to parse recipe: {0}")]
    ParseError(String),

    /// Caller-supplied input is missing or empty
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Missing credential for the generation service
    #[error("Missing Gemini API key. Set MEALMATE__GATEWAY__API_KEY or GEMINI_API_KEY.")]
    MissingApiKey,
}
