//! Per-turn conversation policy.
//!
//! The policy is a pure function of the caller-supplied turn context: it
//! never holds session state of its own, which keeps every decision
//! reproducible in tests. Ordering of the rules matters; meal plan intent
//! keywords are checked before the bare-number fallback so "plan for 5
//! days" is captured as a plan request rather than a number answer.

use crate::model::{ConversationContext, ConversationDecision};
use chrono::{Datelike, NaiveDate, Utc};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

const MEAL_PLAN_KEYWORDS: [&str; 7] = [
    "meal plan",
    "weekly plan",
    "week",
    "plan for",
    "create plan",
    "generate plan",
    "days",
];

/// Decide the next assistant action for one turn.
pub fn decide(context: &ConversationContext) -> ConversationDecision {
    decide_with_today(context, Utc::now().date_naive())
}

/// Same as [`decide`], with an explicit reference date for resolving
/// year-less start dates ("from Oct 10").
pub fn decide_with_today(
    context: &ConversationContext,
    today: NaiveDate,
) -> ConversationDecision {
    let message = context.latest_message.trim();
    if message.is_empty() {
        return ConversationDecision::FreeformReply;
    }

    let lower = message.to_lowercase();
    let day_count = parse_day_count(&lower);

    if has_meal_plan_intent(&lower) {
        let start_date = parse_start_date(&lower, today);
        let mentions_new = lower.contains("new");
        let mentions_edit = lower.contains("edit");

        let decision = if context.has_existing_plan
            && !mentions_new
            && !mentions_edit
            && day_count.is_none()
        {
            ConversationDecision::AskEditOrNew
        } else if let Some(day_count) = day_count {
            ConversationDecision::Generate {
                day_count,
                start_date,
            }
        } else {
            ConversationDecision::AskDayCount {
                editing: mentions_edit,
            }
        };
        debug!("meal plan intent resolved to {:?}", decision);
        return decision;
    }

    if lower.contains("edit") && context.has_existing_plan {
        return ConversationDecision::AskDayCount { editing: true };
    }

    if lower.contains("new") {
        return ConversationDecision::AskDayCount { editing: false };
    }

    // A bare "7" / "2 weeks" / "5 days" answers a previously asked
    // day-count question, provided the caller has recipes to plan with.
    if context.saved_recipe_count > 0 {
        if let Some(day_count) = parse_bare_count(&lower) {
            return ConversationDecision::Generate {
                day_count,
                start_date: None,
            };
        }
    }

    ConversationDecision::FreeformReply
}

fn has_meal_plan_intent(lower: &str) -> bool {
    static CREATE_PATTERN: OnceLock<Regex> = OnceLock::new();
    let create = CREATE_PATTERN
        .get_or_init(|| Regex::new(r"(?:create|make|plan).*\d+\s*days?").unwrap());

    MEAL_PLAN_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
        || create.is_match(lower)
}

/// Parse an explicit day count, preferring "N week(s)" (times 7) over
/// "N day(s)".
fn parse_day_count(lower: &str) -> Option<u32> {
    static WEEKS: OnceLock<Regex> = OnceLock::new();
    static DAYS: OnceLock<Regex> = OnceLock::new();
    let weeks = WEEKS.get_or_init(|| Regex::new(r"(\d+)\s*weeks?").unwrap());
    let days = DAYS.get_or_init(|| Regex::new(r"(\d+)\s*days?").unwrap());

    if let Some(captures) = weeks.captures(lower) {
        if let Ok(n) = captures[1].parse::<u32>() {
            return Some(n * 7);
        }
    }
    if let Some(captures) = days.captures(lower) {
        if let Ok(n) = captures[1].parse::<u32>() {
            return Some(n);
        }
    }
    None
}

/// Parse a message that is purely a number or "N week(s)" / "N day(s)".
fn parse_bare_count(lower: &str) -> Option<u32> {
    static BARE: OnceLock<Regex> = OnceLock::new();
    let bare = BARE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*(weeks?|days?)?\s*$").unwrap());

    let captures = bare.captures(lower)?;
    let n: u32 = captures[1].parse().ok()?;
    match captures.get(2).map(|m| m.as_str()) {
        Some(unit) if unit.starts_with("week") => Some(n * 7),
        _ => Some(n),
    }
}

/// Parse an optional start date from a "from|starting|start <date>" clause.
/// An unparseable date is discarded, not an error.
fn parse_start_date(lower: &str, today: NaiveDate) -> Option<NaiveDate> {
    static FROM: OnceLock<Regex> = OnceLock::new();
    let from = FROM.get_or_init(|| {
        Regex::new(r"(?:from|starting|start)\s+([a-z0-9 /,.-]+)").unwrap()
    });

    let clause = from.captures(lower)?[1].trim().to_string();

    // The clause runs to the end of the matchable span, so trailing words
    // after the date ("from oct 10 and keep it healthy") are tried away
    // token by token.
    let tokens: Vec<&str> = clause.split_whitespace().collect();
    for take in (1..=tokens.len().min(3)).rev() {
        if let Some(date) = parse_flexible_date(&tokens[..take].join(" "), today) {
            return Some(date);
        }
    }
    None
}

/// Try a fixed set of date formats, with and without a year. Year-less
/// dates resolve against the reference date's year.
fn parse_flexible_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim().trim_end_matches(['.', ',']);

    for format in ["%Y-%m-%d", "%m/%d/%Y", "%B %d %Y", "%b %d %Y", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&text.replace(',', ""), format) {
            return Some(date);
        }
    }

    // Year-less forms: "oct 10", "october 10", "10 october", "10/5"
    let with_year = format!("{} {}", text.replace(',', ""), today.year());
    for format in ["%B %d %Y", "%b %d %Y", "%d %B %Y", "%d %b %Y", "%m/%d %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, format) {
            return Some(date);
        }
    }

    None
}
