use serde::Serialize;

/// A normalised recipe built from one upstream meal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    /// Opaque upstream id, only used as a rendering key
    pub id: String,
    pub name: String,
    pub instructions: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    /// Ingredients in upstream slot order, blank slots dropped
    pub ingredients: Vec<Ingredient>,
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub name: String,
    pub measure: Option<String>,
}

impl Ingredient {
    /// Builds an ingredient from a raw slot pair, or `None` if the name is blank
    pub fn from_slot(name: Option<&str>, measure: Option<&str>) -> Option<Self> {
        let name = non_blank(name)?;
        Some(Ingredient {
            name,
            measure: non_blank(measure),
        })
    }
}

impl Recipe {
    /// Case-insensitive substring match against the recipe name
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Trims a value and drops it if nothing is left
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
