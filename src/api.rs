//! Handler-shaped entry points.
//!
//! These functions mirror the call shapes of the externally-owned request
//! handlers: plain request structs in, serializable response structs out.
//! Every failure path still produces a well-formed response with a
//! human-readable message; a raw error never reaches the end user.

use crate::error::MealMateError;
use crate::gateway::{CompletionClient, GenerationGateway};
use crate::model::{ConversationContext, ConversationDecision, MealPlan, Recipe};
use crate::parsers::meal_plan::parse_meal_plan;
use crate::policy;
use crate::resolver::{RecipeInput, RecipeSourceResolver};
use chrono::{NaiveDate, Utc, Weekday};
use log::{error, warn};
use serde::{Deserialize, Serialize};

const CHAT_FALLBACK_MESSAGE: &str = "I'd love to help plan meals! Ask me for a weekly meal plan and I'll share ideas for breakfast, lunch, dinner, and snacks.";
const EMPTY_CHAT_GUIDANCE: &str =
    "Try sending me a question about meals or nutrition and I'll do my best to help!";
const PLAN_FAILURE_MESSAGE: &str =
    "Failed to generate meal plan. Ensure your Gemini API key is configured.";

const DEFAULT_SEED_RECIPES: [&str; 7] = [
    "biryani", "pasta", "oatmeal", "salad", "pizza", "soup", "sandwich",
];

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractResponse {
    pub recipe: Recipe,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(default)]
    pub seed_titles: Vec<String>,
    /// Free-text request, mined for seed recipes when no titles are given
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default)]
    pub day_count: Option<u32>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub meal_plan: MealPlan,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub recipe_count: Option<usize>,
    #[serde(default)]
    pub has_existing_plan: Option<bool>,
}

/// A conversation decision rendered as response flags for the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_action: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_days: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_generate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl ChatResponse {
    fn plain(message: impl Into<String>) -> Self {
        ChatResponse {
            message: message.into(),
            needs_action: None,
            needs_days: None,
            should_generate: None,
            number_of_days: None,
            start_date: None,
        }
    }
}

/// Extract a recipe from a text message (free text, URL, or image URL).
///
/// # Errors
/// Returns `MealMateError::InvalidInput` when the message is blank; the
/// check runs before any network call.
pub async fn extract_recipe<C: CompletionClient>(
    resolver: &RecipeSourceResolver<'_, C>,
    request: &ExtractRequest,
) -> Result<ExtractResponse, MealMateError> {
    if request.message.trim().is_empty() {
        return Err(MealMateError::InvalidInput(
            "Please provide a prompt, image URL, or recipe link.".to_string(),
        ));
    }

    let recipe = resolver
        .resolve(&RecipeInput::from_prompt(request.message.trim()))
        .await;

    Ok(ExtractResponse {
        recipe,
        message: "Recipe extracted successfully! Review and save it to your library.".to_string(),
    })
}

/// Extract a recipe from uploaded image bytes.
pub async fn extract_recipe_from_image<C: CompletionClient>(
    resolver: &RecipeSourceResolver<'_, C>,
    image_bytes: Vec<u8>,
    mime_type: &str,
) -> Result<ExtractResponse, MealMateError> {
    if image_bytes.is_empty() {
        return Err(MealMateError::InvalidInput("No image provided".to_string()));
    }

    let recipe = resolver
        .resolve(&RecipeInput::from_image(image_bytes, mime_type))
        .await;

    Ok(ExtractResponse {
        recipe,
        message: "Recipe extracted from image! Review and save it to your library.".to_string(),
    })
}

/// Generate a meal plan seeded with saved recipe titles.
///
/// Seeds fall back from supplied titles, to a comma/newline-split user
/// message, to a fixed default list, so generation always has something to
/// work with. Defaults: 7 days starting on the current week's Sunday.
pub async fn generate_meal_plan<C: CompletionClient>(
    gateway: &GenerationGateway<C>,
    request: &PlanRequest,
) -> Result<PlanResponse, MealMateError> {
    let seeds = resolve_seed_titles(request);
    let day_count = request.day_count.unwrap_or(7).max(1);
    let start_date = request
        .start_date
        .unwrap_or_else(|| Utc::now().date_naive().week(Weekday::Sun).first_day());

    let plan_text = gateway
        .meal_plan_from_titles(&seeds, day_count)
        .await
        .map_err(|e| {
            error!("Meal plan generation failed: {e}");
            MealMateError::ServiceUnavailable(PLAN_FAILURE_MESSAGE.to_string())
        })?;

    let meal_plan = parse_meal_plan(&plan_text, start_date, day_count);

    Ok(PlanResponse {
        meal_plan,
        message: "Your personalized meal plan has been created!".to_string(),
    })
}

fn resolve_seed_titles(request: &PlanRequest) -> Vec<String> {
    let titles: Vec<String> = request
        .seed_titles
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if !titles.is_empty() {
        return titles;
    }

    if let Some(message) = &request.user_message {
        let from_message: Vec<String> = message
            .split([',', '\n'])
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
        if !from_message.is_empty() {
            return from_message;
        }
    }

    DEFAULT_SEED_RECIPES.iter().map(|s| s.to_string()).collect()
}

/// Handle one conversational turn.
///
/// The policy decides the next action; only a freeform reply actually calls
/// the generation service. Service failures degrade to a static fallback
/// message rather than surfacing an error.
pub async fn chat<C: CompletionClient>(
    gateway: &GenerationGateway<C>,
    request: &ChatRequest,
) -> ChatResponse {
    if request.message.trim().is_empty() {
        return ChatResponse::plain(EMPTY_CHAT_GUIDANCE);
    }

    let context = ConversationContext {
        latest_message: request.message.clone(),
        saved_recipe_count: request.recipe_count.unwrap_or(0),
        has_existing_plan: request.has_existing_plan.unwrap_or(false),
    };

    match policy::decide(&context) {
        ConversationDecision::AskEditOrNew => ChatResponse {
            needs_action: Some(true),
            ..ChatResponse::plain(
                "You already have a meal plan. Would you like to edit it or create a new one? Reply with \"edit\" or \"new\".",
            )
        },
        ConversationDecision::AskDayCount { editing } => {
            let message = if editing {
                "Sure, let's update your plan. How many days should it cover? (e.g., 7 or 14)"
            } else {
                "How many days should your meal plan cover? (e.g., 7 or 14)"
            };
            ChatResponse {
                needs_days: Some(true),
                ..ChatResponse::plain(message)
            }
        }
        ConversationDecision::Generate {
            day_count,
            start_date,
        } => ChatResponse {
            should_generate: Some(true),
            number_of_days: Some(day_count),
            start_date,
            ..ChatResponse::plain(format!(
                "Creating your personalized {day_count}-day meal plan using your saved recipes..."
            ))
        },
        ConversationDecision::FreeformReply => match gateway.chat_reply(&request.message).await {
            Ok(reply) => ChatResponse::plain(reply),
            Err(e) => {
                warn!("Chat generation unavailable: {e}");
                ChatResponse::plain(CHAT_FALLBACK_MESSAGE)
            }
        },
    }
}
