use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use rand::Rng;
use reqwest::Client;
use serde_json::Value;

use super::meal::{decode_meal, MealsEnvelope};
use super::RecipeSource;
use crate::config::AppConfig;
use crate::error::FetchError;
use crate::model::Recipe;

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1/";

/// HTTP client for TheMealDB's JSON API
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    /// Create a client against `base_url` with a 30 second timeout
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_options(base_url, Duration::from_secs(30), "recipe-finder/0.1")
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::with_options(
            config.base_url.clone(),
            Duration::from_secs(config.timeout),
            &config.user_agent,
        )
    }

    fn with_options(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `random.php` and decode the first meal
    pub async fn try_fetch_random(&self) -> Result<Recipe, FetchError> {
        let url = format!("{}/random.php", self.base_url);
        let meals = self.get_meals(&url, &[]).await?;

        let first = meals.into_iter().next().ok_or(FetchError::NoResults)?;
        let recipe = decode_meal(first)?;
        debug!("Fetched random recipe: {}", recipe.name);
        Ok(recipe)
    }

    /// GET `search.php?f=<letter>` and decode one match chosen at random
    pub async fn try_search_by_letter(&self, letter: &str) -> Result<Recipe, FetchError> {
        if letter.is_empty() {
            return Err(FetchError::NoResults);
        }

        let url = format!("{}/search.php", self.base_url);
        let mut meals = self.get_meals(&url, &[("f", letter)]).await?;
        if meals.is_empty() {
            return Err(FetchError::NoResults);
        }

        let picked = rand::thread_rng().gen_range(0..meals.len());
        debug!("Picked match {} of {} for '{}'", picked + 1, meals.len(), letter);
        let recipe = decode_meal(meals.swap_remove(picked))?;
        debug!("Fetched recipe: {}", recipe.name);
        Ok(recipe)
    }

    /// Random recipe, with every failure folded into `None`
    pub async fn fetch_random(&self) -> Option<Recipe> {
        collapse("random", self.try_fetch_random().await)
    }

    /// Recipe starting with `letter`, with every failure folded into `None`
    pub async fn search_by_letter(&self, letter: &str) -> Option<Recipe> {
        collapse("search", self.try_search_by_letter(letter).await)
    }

    async fn get_meals(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<Value>, FetchError> {
        debug!("GET {} {:?}", url, query);
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        debug!("API response: {}", status);
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        Ok(MealsEnvelope::parse(&body)?.into_meals())
    }
}

fn collapse(operation: &str, result: Result<Recipe, FetchError>) -> Option<Recipe> {
    match result {
        Ok(recipe) => Some(recipe),
        Err(FetchError::NoResults) => {
            info!("{}: no recipe found", operation);
            None
        }
        Err(e) => {
            warn!("{} failed: {}", operation, e);
            None
        }
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn random(&self) -> Result<Recipe, FetchError> {
        self.try_fetch_random().await
    }

    async fn by_first_letter(&self, letter: &str) -> Result<Recipe, FetchError> {
        self.try_search_by_letter(letter).await
    }
}
