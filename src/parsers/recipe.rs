//! Structured-text recipe parser.
//!
//! The upstream model is asked for strict JSON but is not contractually
//! guaranteed to return it. Parsing is therefore two-tier: locate and
//! deserialize a JSON object first, and on a structured "not JSON" signal
//! fall back to the labeled-section format the image prompt requests
//! (RECIPE NAME / DURATION / INGREDIENTS / STEPS).

use crate::model::Recipe;
use log::warn;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

const NO_INGREDIENTS: &str = "No ingredients found";
const NO_STEPS: &str = "No steps found";
const DEFAULT_NAME: &str = "Generated Recipe";
const DEFAULT_DURATION: &str = "Not specified";

/// Raw JSON shape emitted by the structured extraction prompt.
/// Every field is optional; the model occasionally reports an error instead.
#[derive(Debug, Deserialize)]
struct RawRecipeResponse {
    recipe_name: Option<String>,
    ingredients: Option<Vec<String>>,
    steps: Option<Vec<String>>,
    duration: Option<String>,
    #[allow(dead_code)]
    error: Option<String>,
}

/// Parse raw model output into a normalized `Recipe`.
///
/// Pure function: identical input always yields an identical recipe. The
/// returned `ingredients` and `steps` are never empty.
pub fn parse_recipe(raw_text: &str) -> Recipe {
    let cleaned = raw_text.trim();

    match try_parse_json(cleaned) {
        Some(recipe) => recipe,
        None => {
            warn!("Model returned no usable JSON, falling back to labeled-section parsing");
            parse_labeled_sections(cleaned)
        }
    }
}

/// Attempt the JSON tier. `None` means "not JSON" and selects the fallback;
/// it is never an error condition.
fn try_parse_json(text: &str) -> Option<Recipe> {
    let json_section = extract_json(text)?;
    let raw: RawRecipeResponse = serde_json::from_str(&json_section).ok()?;
    Some(normalize(raw))
}

/// Locate a JSON object in the text, preferring a fenced ```json block,
/// otherwise the widest `{...}` span.
fn extract_json(text: &str) -> Option<String> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new(r"(?is)```json\s*(.*?)```").unwrap());

    if let Some(captures) = fence.captures(text) {
        return Some(captures[1].trim().to_string());
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(text[start..=end].to_string())
}

fn normalize(raw: RawRecipeResponse) -> Recipe {
    let name = raw
        .recipe_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_NAME.to_string());

    let duration = raw
        .duration
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DEFAULT_DURATION.to_string());

    Recipe {
        name,
        ingredients: non_empty(clean_list(raw.ingredients), NO_INGREDIENTS),
        steps: non_empty(clean_list(raw.steps), NO_STEPS),
        duration,
    }
}

fn clean_list(items: Option<Vec<String>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn non_empty(items: Vec<String>, sentinel: &str) -> Vec<String> {
    if items.is_empty() {
        vec![sentinel.to_string()]
    } else {
        items
    }
}

/// Fallback tier: mine the labeled-section format out of semi-structured
/// prose.
fn parse_labeled_sections(text: &str) -> Recipe {
    let name = extract_single(
        text,
        &[r"(?i)RECIPE NAME:\s*(.+)", r"(.+?)(?:\n|$)", r"#\s*(.+)"],
    )
    .unwrap_or_else(|| DEFAULT_NAME.to_string());

    let duration = extract_single(
        text,
        &[
            r"(?i)DURATION:\s*(.+)",
            r"(?i)TOTAL TIME:\s*(.+)",
            r"(?i)COOKING TIME:\s*(.+)",
        ],
    )
    .unwrap_or_else(|| DEFAULT_DURATION.to_string());

    Recipe {
        name,
        ingredients: non_empty(extract_list_section(text, "INGREDIENTS"), NO_INGREDIENTS),
        steps: non_empty(extract_list_section(text, "STEPS"), NO_STEPS),
        duration,
    }
}

/// Take the first non-empty match across an ordered list of patterns,
/// rejecting candidates that are themselves section headers (a broad
/// pattern like "first line" can otherwise swallow the INGREDIENTS header).
fn extract_single(text: &str, patterns: &[&str]) -> Option<String> {
    static HEADER_GUARD: OnceLock<Regex> = OnceLock::new();
    let guard = HEADER_GUARD.get_or_init(|| Regex::new(r"(?i)^(INGREDIENTS|STEPS)").unwrap());

    for pattern in patterns {
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(_) => continue,
        };
        if let Some(captures) = regex.captures(text) {
            if let Some(group) = captures.get(1) {
                let candidate = group.as_str().trim();
                if !candidate.is_empty() && !guard.is_match(candidate) {
                    return Some(candidate.to_string());
                }
            }
        }
    }
    None
}

/// Capture every non-empty line after a section header until a blank line
/// or the next ALL-CAPS header, stripping leading bullet/number markers.
fn extract_list_section(text: &str, section_title: &str) -> Vec<String> {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    // Strip "- ", "* ", "\u{2022} ", "1. ", "2) " but leave quantity digits
    // ("500g chicken") alone.
    let bullet = BULLET.get_or_init(|| Regex::new(r"^(?:[-*\u{2022}]\s*|\d+[.)]\s+)+").unwrap());

    // Case-insensitive only on the header itself; the ALL-CAPS terminator
    // must not match prose lines like "Salt: to taste"
    let pattern = format!(
        r"(?ms)^(?i:{section_title}):?[ \t]*\n(.*?)(?:\n[ \t]*\n|\n[A-Z][A-Z ]+:|\z)"
    );
    let regex = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(_) => return vec![],
    };

    let Some(captures) = regex.captures(text) else {
        return vec![];
    };

    captures[1]
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| bullet.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict_json() {
        let raw = r#"{
            "recipe_name": "Pasta Carbonara",
            "ingredients": ["200g spaghetti", "2 eggs", " 100g bacon "],
            "steps": ["Cook pasta", "Fry bacon", "Combine"],
            "duration": "30 minutes"
        }"#;

        let recipe = parse_recipe(raw);
        assert_eq!(recipe.name, "Pasta Carbonara");
        assert_eq!(
            recipe.ingredients,
            vec!["200g spaghetti", "2 eggs", "100g bacon"]
        );
        assert_eq!(recipe.steps, vec!["Cook pasta", "Fry bacon", "Combine"]);
        assert_eq!(recipe.duration, "30 minutes");
    }

    #[test]
    fn test_parse_fenced_json_block() {
        let raw = "Here is your recipe:\n```json\n{\"recipe_name\": \"Soup\", \"ingredients\": [\"water\"], \"steps\": [\"boil\"], \"duration\": \"10 minutes\"}\n```\nEnjoy!";
        let recipe = parse_recipe(raw);
        assert_eq!(recipe.name, "Soup");
        assert_eq!(recipe.ingredients, vec!["water"]);
    }

    #[test]
    fn test_json_with_surrounding_prose() {
        let raw = "Sure! {\"recipe_name\": \"Toast\", \"ingredients\": [\"bread\"], \"steps\": [\"toast it\"], \"duration\": \"5 minutes\"} Hope that helps.";
        let recipe = parse_recipe(raw);
        assert_eq!(recipe.name, "Toast");
    }

    #[test]
    fn test_json_missing_fields_gets_sentinels() {
        let raw = r#"{"recipe_name": "Mystery Dish"}"#;
        let recipe = parse_recipe(raw);
        assert_eq!(recipe.name, "Mystery Dish");
        assert_eq!(recipe.ingredients, vec!["No ingredients found"]);
        assert_eq!(recipe.steps, vec!["No steps found"]);
        assert_eq!(recipe.duration, "Not specified");
    }

    #[test]
    fn test_json_empty_lists_get_sentinels() {
        let raw = r#"{"recipe_name": "Empty", "ingredients": ["  ", ""], "steps": [], "duration": ""}"#;
        let recipe = parse_recipe(raw);
        assert_eq!(recipe.ingredients, vec!["No ingredients found"]);
        assert_eq!(recipe.steps, vec!["No steps found"]);
        assert_eq!(recipe.duration, "Not specified");
    }

    #[test]
    fn test_labeled_section_fallback() {
        let raw = "RECIPE NAME: Chicken Curry\n\nDURATION: 45 minutes\n\nINGREDIENTS:\n- 500g chicken\n- 2 onions\n- 1 tbsp curry powder\n\nSTEPS:\n1. Dice the onions\n2. Brown the chicken\n3. Simmer with curry powder";

        let recipe = parse_recipe(raw);
        assert_eq!(recipe.name, "Chicken Curry");
        assert_eq!(recipe.duration, "45 minutes");
        assert_eq!(
            recipe.ingredients,
            vec!["500g chicken", "2 onions", "1 tbsp curry powder"]
        );
        assert_eq!(
            recipe.steps,
            vec![
                "Dice the onions",
                "Brown the chicken",
                "Simmer with curry powder"
            ]
        );
    }

    #[test]
    fn test_fallback_equivalent_to_json_for_same_content() {
        let json = r#"{"recipe_name": "Omelette", "ingredients": ["3 eggs", "butter"], "steps": ["Whisk eggs", "Cook in butter"], "duration": "10 minutes"}"#;
        let labeled = "RECIPE NAME: Omelette\n\nDURATION: 10 minutes\n\nINGREDIENTS:\n- 3 eggs\n- butter\n\nSTEPS:\n1. Whisk eggs\n2. Cook in butter";

        assert_eq!(parse_recipe(json), parse_recipe(labeled));
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let raw = "{not valid json at all\n\nRECIPE NAME: Rescue Dish\n\nINGREDIENTS:\n- something\n\nSTEPS:\n1. do it";
        let recipe = parse_recipe(raw);
        assert_eq!(recipe.name, "Rescue Dish");
        assert_eq!(recipe.ingredients, vec!["something"]);
    }

    #[test]
    fn test_first_line_name_guard_rejects_section_header() {
        // When text starts directly with a section header, the broad
        // first-line pattern must not claim it as the recipe name.
        let raw = "INGREDIENTS:\n- flour\n\nSTEPS:\n1. mix";
        let recipe = parse_recipe(raw);
        assert_eq!(recipe.name, "Generated Recipe");
        assert_eq!(recipe.ingredients, vec!["flour"]);
    }

    #[test]
    fn test_total_time_label_accepted_for_duration() {
        let raw = "My Dish\n\nTOTAL TIME: 1 hour\n\nINGREDIENTS:\n- a thing\n\nSTEPS:\n1. step";
        let recipe = parse_recipe(raw);
        assert_eq!(recipe.duration, "1 hour");
        assert_eq!(recipe.name, "My Dish");
    }

    #[test]
    fn test_section_stops_at_next_header() {
        let raw = "RECIPE NAME: Stacked\nINGREDIENTS:\n- first\n- second\nSTEPS:\n1. only step";
        let recipe = parse_recipe(raw);
        assert_eq!(recipe.ingredients, vec!["first", "second"]);
        assert_eq!(recipe.steps, vec!["only step"]);
    }

    #[test]
    fn test_bullet_and_number_markers_stripped() {
        let raw = "RECIPE NAME: Markers\n\nINGREDIENTS:\n* starred\n\u{2022} dotted\n- dashed\n\nSTEPS:\n1. first\n2. second\n10. tenth";
        let recipe = parse_recipe(raw);
        assert_eq!(recipe.ingredients, vec!["starred", "dotted", "dashed"]);
        assert_eq!(recipe.steps, vec!["first", "second", "tenth"]);
    }

    #[test]
    fn test_idempotent() {
        let raw = "RECIPE NAME: Twice\n\nINGREDIENTS:\n- x\n\nSTEPS:\n1. y";
        assert_eq!(parse_recipe(raw), parse_recipe(raw));
    }

    #[test]
    fn test_empty_input_gets_all_sentinels() {
        let recipe = parse_recipe("");
        assert_eq!(recipe.name, "Generated Recipe");
        assert_eq!(recipe.ingredients, vec!["No ingredients found"]);
        assert_eq!(recipe.steps, vec!["No steps found"]);
        assert_eq!(recipe.duration, "Not specified");
    }
}
