use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::FetchError;
use crate::model::{non_blank, Ingredient, Recipe};

/// Upstream exposes ingredients as `strIngredient1..20` / `strMeasure1..20`
pub const INGREDIENT_SLOTS: usize = 20;

/// Top-level payload for both `random.php` and `search.php`.
///
/// Entries are kept as raw values so a malformed meal only fails when it is
/// the one picked.
#[derive(Debug, Deserialize)]
pub(crate) struct MealsEnvelope {
    #[serde(default)]
    pub meals: Option<Vec<Value>>,
}

impl MealsEnvelope {
    pub fn parse(body: &str) -> Result<Self, FetchError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Meals in the payload, empty when upstream sent `null`
    pub fn into_meals(self) -> Vec<Value> {
        self.meals.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Meal {
    id_meal: Option<String>,
    str_meal: Option<String>,
    str_instructions: Option<String>,
    str_meal_thumb: Option<String>,
    str_youtube: Option<String>,
    str_source: Option<String>,
    #[serde(flatten)]
    slots: HashMap<String, Value>,
}

impl Meal {
    fn slot(&self, prefix: &str, index: usize) -> Option<&str> {
        self.slots
            .get(&format!("{prefix}{index}"))
            .and_then(Value::as_str)
    }

    fn ingredients(&self) -> Vec<Ingredient> {
        (1..=INGREDIENT_SLOTS)
            .filter_map(|i| {
                Ingredient::from_slot(self.slot("strIngredient", i), self.slot("strMeasure", i))
            })
            .collect()
    }
}

impl TryFrom<Meal> for Recipe {
    type Error = FetchError;

    fn try_from(meal: Meal) -> Result<Self, Self::Error> {
        let ingredients = meal.ingredients();
        let name = non_blank(meal.str_meal.as_deref())
            .ok_or_else(|| FetchError::Decode("meal has no name".to_string()))?;

        Ok(Recipe {
            id: meal.id_meal.unwrap_or_default(),
            name,
            instructions: meal.str_instructions.unwrap_or_default(),
            image_url: non_blank(meal.str_meal_thumb.as_deref()),
            video_url: non_blank(meal.str_youtube.as_deref()),
            ingredients,
            source_url: non_blank(meal.str_source.as_deref()),
        })
    }
}

/// Decodes one raw meal entry into a recipe
pub(crate) fn decode_meal(value: Value) -> Result<Recipe, FetchError> {
    let meal: Meal = serde_json::from_value(value)?;
    Recipe::try_from(meal)
}
