//! Meal Mate core: recipe extraction and AI-assisted meal planning.
//!
//! The crate turns free-form user input (text descriptions, webpage URLs,
//! images) into normalized recipes, generates multi-day meal plans seeded
//! with saved recipe titles, and drives a small per-turn conversation
//! policy for collecting plan parameters. The generative language service
//! and all persistence are external collaborators behind the
//! [`gateway::CompletionClient`] and [`store`] trait seams.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod parsers;
pub mod policy;
pub mod resolver;
pub mod store;

pub use api::{
    chat, extract_recipe, extract_recipe_from_image, generate_meal_plan, ChatRequest,
    ChatResponse, ExtractRequest, ExtractResponse, PlanRequest, PlanResponse,
};
pub use config::AppConfig;
pub use error::MealMateError;
pub use gateway::{CompletionClient, GeminiClient, GenerationGateway};
pub use model::{
    ConversationContext, ConversationDecision, DayMeals, Meal, MealPlan, MealPlanDay, Recipe,
};
pub use parsers::{parse_meal_plan, parse_recipe};
pub use resolver::{RecipeInput, RecipeSourceResolver};
pub use store::{MealPlanStore, MemoryStore, RecipeStore};
