use std::fmt;

use crate::model::{Ingredient, Recipe};

pub const INGREDIENTS_HEADER: &str = "Ingredients";

/// Text rendering of a single recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    lines: Vec<String>,
    ingredients_start: usize,
}

impl RecipeView {
    pub fn new(recipe: &Recipe) -> Self {
        let mut lines = vec![format!("Recipe: {}", recipe.name)];

        if let Some(image) = &recipe.image_url {
            lines.push(format!("Image: {image}"));
        }
        if let Some(video) = &recipe.video_url {
            lines.push(format!("Watch on YouTube: {video}"));
        }
        lines.push(format!("Instructions: {}", recipe.instructions));
        if let Some(source) = &recipe.source_url {
            lines.push(format!("Source: {source}"));
        }
        lines.push(String::new());

        let ingredients_start = lines.len();
        lines.push(INGREDIENTS_HEADER.to_string());
        lines.extend(recipe.ingredients.iter().map(ingredient_line));

        Self {
            lines,
            ingredients_start,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Index of the ingredients header line
    pub fn ingredients_start(&self) -> usize {
        self.ingredients_start
    }

    /// Lines from the ingredients header to the end
    pub fn jump_to_ingredients(&self) -> &[String] {
        &self.lines[self.ingredients_start..]
    }
}

impl fmt::Display for RecipeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn ingredient_line(ingredient: &Ingredient) -> String {
    match &ingredient.measure {
        Some(measure) => format!("- {} of {}", measure, ingredient.name),
        None => format!("- {}", ingredient.name),
    }
}

/// Renders the display slot; an empty slot renders as nothing
pub fn render_slot(recipe: Option<&Recipe>) -> String {
    recipe
        .map(|r| RecipeView::new(r).to_string())
        .unwrap_or_default()
}
