//! schema.org Recipe discovery in embedded JSON-LD.
//!
//! Pages embed recipe metadata in `<script type="application/ld+json">`
//! blocks, sometimes as a bare object, sometimes inside arrays or an
//! `@graph` collection, and occasionally nested arbitrarily deep. The
//! search is a depth-first visitor over the parsed JSON value; the data is
//! a freshly parsed finite tree, so no cycle protection is needed.

use crate::model::Recipe;
use html_escape::decode_html_entities;
use log::debug;
use scraper::{Html, Selector};
use serde_json::Value;

/// Search an HTML document for an embedded schema.org Recipe.
///
/// This path never calls the language model; the data is already
/// structured. Returns `None` when no script block yields a recipe.
pub fn extract_from_document(document: &Html) -> Option<Recipe> {
    let selector = Selector::parse("script[type='application/ld+json']").unwrap();

    for script in document.select(&selector) {
        // Raw text nodes, not inner_html(): re-serializing would re-escape
        // entities and skew the decode below
        let json_text: String = script.text().collect();
        if json_text.trim().is_empty() {
            continue;
        }

        let Ok(data) = serde_json::from_str::<Value>(&json_text) else {
            continue;
        };

        if let Some(recipe) = find_recipe(&data) {
            debug!("Found schema.org recipe: {}", recipe.name);
            return Some(recipe);
        }
    }

    None
}

/// Depth-first search for a node whose `@type` is "Recipe".
fn find_recipe(data: &Value) -> Option<Recipe> {
    match data {
        Value::Array(items) => items.iter().find_map(find_recipe),
        Value::Object(map) => {
            if is_recipe_node(map.get("@type")) {
                return Some(map_recipe(map));
            }
            map.values().find_map(find_recipe)
        }
        _ => None,
    }
}

/// `@type` may be a string or an array of type names; match "Recipe"
/// case-insensitively either way.
fn is_recipe_node(node_type: Option<&Value>) -> bool {
    match node_type {
        Some(Value::String(t)) => t.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .any(|t| t.as_str().is_some_and(|t| t.eq_ignore_ascii_case("recipe"))),
        _ => false,
    }
}

fn map_recipe(map: &serde_json::Map<String, Value>) -> Recipe {
    let name = map
        .get("name")
        .and_then(|v| v.as_str())
        .map(decode)
        .unwrap_or_else(|| "Unknown Recipe".to_string());

    let ingredients = map
        .get("recipeIngredient")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(decode)
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let duration = map
        .get("totalTime")
        .and_then(|v| v.as_str())
        .map(decode)
        .unwrap_or_else(|| "Not specified".to_string());

    Recipe {
        name,
        ingredients,
        steps: normalize_instructions(map.get("recipeInstructions")),
        duration,
    }
}

/// `recipeInstructions` comes in several shapes: a plain string, a string
/// array, or HowToStep objects carrying `text` (or only `name`).
fn normalize_instructions(instructions: Option<&Value>) -> Vec<String> {
    match instructions {
        Some(Value::String(text)) => text
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(decode)
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(step) => Some(step.as_str()),
                Value::Object(obj) => obj
                    .get("text")
                    .and_then(|v| v.as_str())
                    .filter(|t| !t.trim().is_empty())
                    .or_else(|| obj.get("name").and_then(|v| v.as_str())),
                _ => None,
            })
            .map(decode)
            .filter(|step| !step.is_empty())
            .collect(),
        _ => vec![],
    }
}

// Some sites double-encode entities in their JSON-LD
fn decode(text: impl AsRef<str>) -> String {
    decode_html_entities(&decode_html_entities(text.as_ref()).into_owned())
        .trim()
        .to_string()
}
