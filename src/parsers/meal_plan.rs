//! Meal plan text parser.
//!
//! The model's plan text is loosely structured prose. Date arithmetic is
//! authoritative: the plan always has exactly the requested number of days,
//! dated consecutively from the start date, and the text is only mined for
//! meal names. Days or meals the text never mentions fall back to generic
//! placeholders rather than being omitted.

use crate::model::{DayMeals, Meal, MealPlan, MealPlanDay};
use chrono::{Duration, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

const MEAL_TYPES: [(&str, &str, &str); 3] = [
    ("breakfast", "Breakfast", "Delicious morning meal"),
    ("lunch", "Lunch", "Satisfying midday meal"),
    ("dinner", "Dinner", "Hearty evening meal"),
];

/// Parse free-form meal plan text into a normalized `MealPlan`.
///
/// Weekday labels recur across calendar weeks, so the text search keeps a
/// cursor and each day's section is looked up from where the previous day's
/// section was found. A 14-day plan therefore maps its second "Monday" to
/// the second textual Monday section when the model produced one, instead
/// of silently reusing the first.
pub fn parse_meal_plan(raw_text: &str, start_date: NaiveDate, day_count: u32) -> MealPlan {
    let day_count = day_count.max(1);
    let mut days = Vec::with_capacity(day_count as usize);
    let mut cursor = 0usize;

    for i in 0..day_count {
        let date = start_date + Duration::days(i as i64);
        let day_name = date.format("%A").to_string();

        let day_section = find_ignore_ascii_case(raw_text, &day_name, cursor);
        if let Some(found_at) = day_section {
            cursor = found_at + day_name.len();
        }

        let meals = extract_day_meals(raw_text, day_section);
        days.push(MealPlanDay {
            day: day_name,
            date,
            meals,
        });
    }

    MealPlan {
        id: Uuid::new_v4().to_string(),
        period_start_date: start_date,
        period_end_date: start_date + Duration::days(day_count as i64 - 1),
        days,
        created_at: Utc::now(),
    }
}

fn extract_day_meals(text: &str, day_section: Option<usize>) -> DayMeals {
    let mut meals = MEAL_TYPES.iter().map(|(keyword, label, filler)| {
        day_section
            .and_then(|from| extract_meal_name(text, keyword, from))
            .map(|name| Meal {
                name,
                description: filler.to_string(),
            })
            .unwrap_or_else(|| Meal {
                name: label.to_string(),
                description: filler.to_string(),
            })
    });

    // Iterator order follows MEAL_TYPES
    DayMeals {
        breakfast: meals.next().unwrap(),
        lunch: meals.next().unwrap(),
        dinner: meals.next().unwrap(),
    }
}

/// Find the meal-type keyword after the day's position and capture the text
/// following a colon/dash up to the end of the line.
fn extract_meal_name(text: &str, meal_keyword: &str, from: usize) -> Option<String> {
    static AFTER_MEAL: OnceLock<Regex> = OnceLock::new();
    let after_meal = AFTER_MEAL.get_or_init(|| Regex::new(r"^[^:\-\r\n]*[:\-]\s*([^\r\n]+)").unwrap());

    let meal_at = find_ignore_ascii_case(text, meal_keyword, from)?;
    let tail = &text[meal_at + meal_keyword.len()..];

    let name = after_meal.captures(tail)?[1].trim().to_string();
    // Markdown emphasis markers leak through model output
    let name = name.trim_matches('*').trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Byte-index search for an ASCII needle ignoring case, starting at `from`.
///
/// The needles here (weekday names, meal keywords) are pure ASCII, so a
/// byte-wise comparison is safe even in text with multi-byte characters.
fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || from + needle.len() > haystack.len() {
        return None;
    }

    (from..=haystack.len() - needle.len())
        .find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2025-06-02 is a Monday
    const MONDAY: (i32, u32, u32) = (2025, 6, 2);

    #[test]
    fn test_day_count_is_exact_and_dates_contiguous() {
        let start = date(MONDAY.0, MONDAY.1, MONDAY.2);
        for count in [1u32, 3, 7, 14] {
            let plan = parse_meal_plan("no structure here", start, count);
            assert_eq!(plan.days.len(), count as usize);
            assert_eq!(plan.period_start_date, start);
            assert_eq!(
                plan.period_end_date,
                start + Duration::days(count as i64 - 1)
            );
            for (i, day) in plan.days.iter().enumerate() {
                assert_eq!(day.date, start + Duration::days(i as i64));
            }
        }
    }

    #[test]
    fn test_weekday_labels_derive_from_dates() {
        let plan = parse_meal_plan("", date(MONDAY.0, MONDAY.1, MONDAY.2), 3);
        assert_eq!(plan.days[0].day, "Monday");
        assert_eq!(plan.days[1].day, "Tuesday");
        assert_eq!(plan.days[2].day, "Wednesday");
    }

    #[test]
    fn test_meal_names_mined_from_text() {
        let text = "WEEKLY MEAL PLAN:\n\
            Monday:\n\
            - Breakfast: Oatmeal with berries\n\
            - Lunch: Chicken salad\n\
            - Dinner: Beef stir fry\n\
            Tuesday:\n\
            - Breakfast: Scrambled eggs\n\
            - Lunch: Leftover stir fry\n\
            - Dinner: Pasta carbonara\n";

        let plan = parse_meal_plan(text, date(MONDAY.0, MONDAY.1, MONDAY.2), 2);
        assert_eq!(plan.days[0].meals.breakfast.name, "Oatmeal with berries");
        assert_eq!(plan.days[0].meals.lunch.name, "Chicken salad");
        assert_eq!(plan.days[0].meals.dinner.name, "Beef stir fry");
        assert_eq!(plan.days[1].meals.breakfast.name, "Scrambled eggs");
        assert_eq!(plan.days[1].meals.dinner.name, "Pasta carbonara");
    }

    #[test]
    fn test_missing_weekday_falls_back_to_bare_labels() {
        // Wednesday never appears in the text
        let text = "Monday:\n- Breakfast: Toast\nTuesday:\n- Breakfast: Eggs\n";
        let plan = parse_meal_plan(text, date(MONDAY.0, MONDAY.1, MONDAY.2), 3);

        let wednesday = &plan.days[2];
        assert_eq!(wednesday.day, "Wednesday");
        assert_eq!(wednesday.meals.breakfast.name, "Breakfast");
        assert_eq!(wednesday.meals.lunch.name, "Lunch");
        assert_eq!(wednesday.meals.dinner.name, "Dinner");
        assert_eq!(wednesday.meals.breakfast.description, "Delicious morning meal");
        assert_eq!(wednesday.meals.lunch.description, "Satisfying midday meal");
        assert_eq!(wednesday.meals.dinner.description, "Hearty evening meal");
    }

    #[test]
    fn test_missing_meal_type_falls_back() {
        let text = "Monday:\n- Breakfast: Pancakes\n";
        let plan = parse_meal_plan(text, date(MONDAY.0, MONDAY.1, MONDAY.2), 1);
        assert_eq!(plan.days[0].meals.breakfast.name, "Pancakes");
        assert_eq!(plan.days[0].meals.lunch.name, "Lunch");
        assert_eq!(plan.days[0].meals.dinner.name, "Dinner");
    }

    #[test]
    fn test_case_insensitive_day_and_meal_lookup() {
        let text = "MONDAY:\nBREAKFAST - Smoothie bowl\n";
        let plan = parse_meal_plan(text, date(MONDAY.0, MONDAY.1, MONDAY.2), 1);
        assert_eq!(plan.days[0].meals.breakfast.name, "Smoothie bowl");
    }

    #[test]
    fn test_two_week_plan_advances_past_first_monday() {
        let text = "Week 1\n\
            Monday:\n- Breakfast: Oatmeal\n\
            Week 2\n\
            Monday:\n- Breakfast: Waffles\n";

        let plan = parse_meal_plan(text, date(MONDAY.0, MONDAY.1, MONDAY.2), 14);
        assert_eq!(plan.days[0].meals.breakfast.name, "Oatmeal");
        // The second Monday (index 7) must pick up the second section
        assert_eq!(plan.days[7].meals.breakfast.name, "Waffles");
    }

    #[test]
    fn test_two_week_plan_without_second_section_uses_placeholders() {
        let text = "Monday:\n- Breakfast: Oatmeal\n- Lunch: Salad\n- Dinner: Curry\n";
        let plan = parse_meal_plan(text, date(MONDAY.0, MONDAY.1, MONDAY.2), 14);
        assert_eq!(plan.days[0].meals.breakfast.name, "Oatmeal");
        // No second Monday section exists; never reuse the first
        assert_eq!(plan.days[7].meals.breakfast.name, "Breakfast");
    }

    #[test]
    fn test_markdown_emphasis_stripped_from_meal_names() {
        let text = "Monday:\n- **Breakfast:** Granola parfait\n";
        let plan = parse_meal_plan(text, date(MONDAY.0, MONDAY.1, MONDAY.2), 1);
        assert_eq!(plan.days[0].meals.breakfast.name, "Granola parfait");
    }

    #[test]
    fn test_zero_day_count_clamps_to_one() {
        let plan = parse_meal_plan("", date(MONDAY.0, MONDAY.1, MONDAY.2), 0);
        assert_eq!(plan.days.len(), 1);
        assert_eq!(plan.period_end_date, plan.period_start_date);
    }

    #[test]
    fn test_plan_id_is_unique_per_generation() {
        let start = date(MONDAY.0, MONDAY.1, MONDAY.2);
        let a = parse_meal_plan("", start, 1);
        let b = parse_meal_plan("", start, 1);
        assert_ne!(a.id, b.id);
    }
}
