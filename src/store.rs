//! Storage collaborator seams.
//!
//! Persistence is externally owned (a hosted relational backend with
//! row-level authorization). The core only depends on these traits; the
//! in-memory implementation backs the CLI and tests.

use crate::error::MealMateError;
use crate::model::{MealPlan, Recipe};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Owner-scoped recipe persistence.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn save_recipe(&self, owner_id: &str, recipe: Recipe) -> Result<String, MealMateError>;
    async fn list_recipes(&self, owner_id: &str) -> Result<Vec<Recipe>, MealMateError>;
    async fn delete_recipe(&self, owner_id: &str, id: &str) -> Result<(), MealMateError>;
}

/// Owner-scoped meal plan persistence.
#[async_trait]
pub trait MealPlanStore: Send + Sync {
    async fn save_meal_plan(
        &self,
        owner_id: &str,
        plan: MealPlan,
    ) -> Result<String, MealMateError>;
    async fn list_meal_plans(&self, owner_id: &str) -> Result<Vec<MealPlan>, MealMateError>;
    async fn delete_meal_plan(&self, owner_id: &str, id: &str) -> Result<(), MealMateError>;
}

/// In-memory store keyed by owner id.
#[derive(Default)]
pub struct MemoryStore {
    recipes: Mutex<HashMap<String, Vec<(String, Recipe)>>>,
    plans: Mutex<HashMap<String, Vec<MealPlan>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn save_recipe(&self, owner_id: &str, recipe: Recipe) -> Result<String, MealMateError> {
        let id = Uuid::new_v4().to_string();
        self.recipes
            .lock()
            .expect("store mutex poisoned")
            .entry(owner_id.to_string())
            .or_default()
            .push((id.clone(), recipe));
        Ok(id)
    }

    async fn list_recipes(&self, owner_id: &str) -> Result<Vec<Recipe>, MealMateError> {
        Ok(self
            .recipes
            .lock()
            .expect("store mutex poisoned")
            .get(owner_id)
            .map(|entries| entries.iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default())
    }

    async fn delete_recipe(&self, owner_id: &str, id: &str) -> Result<(), MealMateError> {
        if let Some(entries) = self
            .recipes
            .lock()
            .expect("store mutex poisoned")
            .get_mut(owner_id)
        {
            entries.retain(|(entry_id, _)| entry_id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl MealPlanStore for MemoryStore {
    async fn save_meal_plan(
        &self,
        owner_id: &str,
        plan: MealPlan,
    ) -> Result<String, MealMateError> {
        let id = plan.id.clone();
        self.plans
            .lock()
            .expect("store mutex poisoned")
            .entry(owner_id.to_string())
            .or_default()
            .push(plan);
        Ok(id)
    }

    async fn list_meal_plans(&self, owner_id: &str) -> Result<Vec<MealPlan>, MealMateError> {
        Ok(self
            .plans
            .lock()
            .expect("store mutex poisoned")
            .get(owner_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_meal_plan(&self, owner_id: &str, id: &str) -> Result<(), MealMateError> {
        if let Some(entries) = self
            .plans
            .lock()
            .expect("store mutex poisoned")
            .get_mut(owner_id)
        {
            entries.retain(|plan| plan.id != id);
        }
        Ok(())
    }
}
