pub mod meal_plan;
pub mod recipe;

pub use meal_plan::parse_meal_plan;
pub use recipe::parse_recipe;
