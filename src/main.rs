use std::env;

use meal_mate::{
    extract_recipe, AppConfig, ExtractRequest, GeminiClient, GenerationGateway,
    RecipeSourceResolver,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Input is a recipe URL, an image URL, or a free-text description
    let args: Vec<String> = env::args().collect();
    let input = args
        .get(1)
        .ok_or("Please provide a URL or recipe description as an argument")?;

    let config = AppConfig::load()?;
    let client = GeminiClient::new(&config.gateway)?;
    let gateway = GenerationGateway::new(client);
    let resolver = RecipeSourceResolver::new(&gateway, &config.fetch)?;

    let response = extract_recipe(
        &resolver,
        &ExtractRequest {
            message: input.clone(),
        },
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&response.recipe)?);
    Ok(())
}
