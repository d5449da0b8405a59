//! Prompt construction for the generation gateway.
//!
//! The labeled-section format prompt is loaded from `recipe_format.txt` at
//! compile time using the `include_str!` macro, making it easy to edit
//! without dealing with Rust string syntax.

/// Prompt instructing the model to emit the labeled-section recipe format
/// (RECIPE NAME / DURATION / INGREDIENTS / STEPS). Used for image inputs,
/// where strict JSON output is less reliable.
pub const RECIPE_FORMAT_PROMPT: &str = include_str!("recipe_format.txt");

/// Build the strict-JSON extraction prompt for a free-text recipe request.
pub fn structured_recipe_prompt(user_prompt: &str) -> String {
    format!(
        r#"You are a professional chef. Using the user request below, produce a JSON object with this exact shape:
{{
  "recipe_name": string,
  "ingredients": string[],
  "steps": string[],
  "duration": string
}}

Rules:
- Only output JSON. Do not wrap in backticks.
- Each ingredient must include quantities when possible.
- Steps must be detailed instructions.
- Duration must be a total time string like "30 minutes".

User request: {user_prompt}"#
    )
}

/// Build the open-ended chat prompt with the assistant persona.
pub fn chat_prompt(user_message: &str) -> String {
    format!(
        r#"You are Meal Mate, a friendly AI meal planning assistant.

User message: "{}"

Respond conversationally and helpfully. Keep the tone friendly and concise. Encourage the user to explore meal planning features when relevant."#,
        user_message.trim()
    )
}

/// Weekday labels used for the day-by-day plan outline.
const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Build the meal plan generation prompt seeded with saved recipe titles.
///
/// Days beyond the first week get generic "Day N" labels since weekday
/// names would repeat.
pub fn meal_plan_prompt(titles: &[String], day_count: u32) -> String {
    let recipe_list = titles.join(", ");

    let mut day_lines = String::new();
    for i in 0..day_count {
        let label = if (i as usize) < WEEKDAYS.len() {
            WEEKDAYS[i as usize].to_string()
        } else {
            format!("Day {}", i + 1)
        };
        day_lines.push_str(&format!("   - {label}: Breakfast, Lunch, Dinner, Snacks\n"));
    }

    format!(
        r#"Create a comprehensive meal plan using these recipes: {recipe_list}.

Please create a detailed {day_count}-day meal plan that includes:

1. RECIPE LIST: {recipe_list}

2. MEAL PLAN:
{day_lines}
3. MEAL PREP TIPS:
   - Suggestions for preparing meals in advance
   - Storage recommendations
   - Time-saving strategies

4. SHOPPING LIST:
   - Organized by food categories
   - Quantities for the entire period

5. NUTRITIONAL NOTES:
   - Key nutrients and health benefits
   - Portion size recommendations
   - Dietary considerations

Make sure to incorporate the provided recipes throughout the plan in a balanced and practical way."#
    )
}

/// Framing prompt for raw webpage text submitted for recipe extraction.
pub fn webpage_content_prompt(page_text: &str) -> String {
    structured_recipe_prompt(&format!("Webpage content: {page_text}"))
}
