mod meal;
mod meal_db;

pub use meal::INGREDIENT_SLOTS;
pub use meal_db::{MealDbClient, DEFAULT_BASE_URL};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::Recipe;

/// Anything that can produce recipes for the controller
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Fetch one random recipe
    async fn random(&self) -> Result<Recipe, FetchError>;

    /// Fetch one recipe whose name starts with `letter`
    async fn by_first_letter(&self, letter: &str) -> Result<Recipe, FetchError>;
}
