pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;

pub use client::{MealDbClient, RecipeSource, DEFAULT_BASE_URL};
pub use crate::config::{AppConfig, OverlapPolicy};
pub use controller::{Controller, SearchState, Status};
pub use error::{AppError, FailureKind, FetchError};
pub use model::{Ingredient, Recipe};
pub use render::{render_slot, RecipeView};

/// Client built from the loaded configuration, so `RECIPE_FINDER__*`
/// overrides apply to the convenience functions too.
fn configured_client() -> Option<MealDbClient> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Falling back to default configuration: {}", e);
        AppConfig::default()
    });

    match MealDbClient::from_config(&config) {
        Ok(client) => Some(client),
        Err(e) => {
            log::warn!("Failed to create client: {}", e);
            None
        }
    }
}

/// Fetch a random recipe from the configured API.
///
/// Returns `None` when nothing could be fetched, whatever the reason.
pub async fn random_recipe() -> Option<Recipe> {
    let client = configured_client()?;
    client.fetch_random().await
}

/// Fetch a recipe whose name starts with the first letter of `query`.
pub async fn search_recipe(query: &str) -> Option<Recipe> {
    let client = configured_client()?;
    client
        .search_by_letter(&controller::first_letter(query))
        .await
}
