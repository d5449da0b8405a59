use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A normalized recipe produced by the parsers.
///
/// `ingredients` and `steps` are never empty after parsing: a parser that
/// finds no items substitutes a single sentinel entry so downstream
/// consumers always have something to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub duration: String,
}

impl Recipe {
    /// Sentinel recipe returned when every extraction strategy has failed.
    pub fn error_sentinel() -> Self {
        Recipe {
            name: "Error".to_string(),
            ingredients: vec![],
            steps: vec![],
            duration: "Not specified".to_string(),
        }
    }
}

/// A single meal slot within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub description: String,
}

/// Breakfast, lunch and dinner assignments for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMeals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
}

/// One dated day within a meal plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanDay {
    /// Weekday label derived from `date`, e.g. "Monday"
    pub day: String,
    pub date: NaiveDate,
    pub meals: DayMeals,
}

/// A dated sequence of days with meal assignments.
///
/// Plans are immutable once constructed; an edit produces a new plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: String,
    pub period_start_date: NaiveDate,
    pub period_end_date: NaiveDate,
    pub days: Vec<MealPlanDay>,
    pub created_at: DateTime<Utc>,
}

/// Per-turn context supplied by the caller to the conversation policy.
///
/// The policy re-derives everything from this struct on every call; there
/// is no hidden session state.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    pub latest_message: String,
    pub saved_recipe_count: usize,
    pub has_existing_plan: bool,
}

/// The next action decided by the conversation policy for a single turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationDecision {
    /// An existing plan exists and the request is ambiguous between
    /// editing it and starting over
    AskEditOrNew,
    /// Meal plan intent recognized but no day count supplied yet
    AskDayCount { editing: bool },
    /// All parameters resolved; the caller should trigger generation
    Generate {
        day_count: u32,
        start_date: Option<NaiveDate>,
    },
    /// No meal plan intent; delegate to open-ended chat
    FreeformReply,
}
