//! Unscaled recipe metadata: ice, technique, glassware, garnish, syrups and
//! associated resources.

use ingredient_classifier::Classifier;
use serde::{Deserialize, Serialize};

use crate::scaling::ScaledRecipe;
use crate::store::RecipeStore;
use crate::types::Recipe;

const AFFIRMATIVE: &[&str] = &["yes", "y", "sí", "si", "true", "1", "1.0"];

/// Whether an ice flag cell means "yes". Missing or unrecognized is "no".
pub fn is_affirmative(flag: Option<&str>) -> bool {
    flag.map(|f| f.trim().to_lowercase())
        .is_some_and(|f| AFFIRMATIVE.contains(&f.as_str()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IcePolicy {
    WithIce,
    WithoutIce,
}

impl IcePolicy {
    pub fn for_recipe(recipe: &Recipe) -> Self {
        if is_affirmative(recipe.ice_flag.as_deref()) {
            IcePolicy::WithIce
        } else {
            IcePolicy::WithoutIce
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            IcePolicy::WithIce => {
                "Serve in a glass with ice. Prefer larger cubes to slow down dilution."
            }
            IcePolicy::WithoutIce => {
                "Serve in a glass without ice; the drink was chilled during preparation."
            }
        }
    }
}

/// A row of the technique table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technique {
    pub code: String,
    /// Localized name, e.g. "Agitado" for "Shake".
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Technique {
    /// "Shake (Agitado) – description"
    pub fn display_line(&self) -> String {
        let mut line = self.code.clone();
        if let Some(name) = &self.name {
            line.push_str(&format!(" ({name})"));
        }
        if let Some(description) = &self.description {
            line.push_str(&format!(" – {description}"));
        }
        line
    }
}

/// A syrup sub-recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Syrup {
    pub name: String,
    pub preparation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlassInfo {
    pub glass: String,
    pub capacity_ml: Option<f64>,
}

impl GlassInfo {
    pub fn for_recipe(recipe: &Recipe) -> Option<Self> {
        recipe.glass.as_ref().map(|glass| GlassInfo {
            glass: glass.clone(),
            capacity_ml: recipe.glass_capacity_ml,
        })
    }

    pub fn display_line(&self) -> String {
        match self.capacity_ml {
            Some(ml) => format!("{} – {} ml", self.glass, ml.round() as i64),
            None => self.glass.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// Optional media and notes attached to a cocktail.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    /// Free text; the first line is its title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub music_links: Vec<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}

/// Title and body of a narrative block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSection {
    pub title: String,
    pub body: String,
}

impl Resource {
    /// Split the narrative into a title (first line) and body (the rest).
    pub fn narrative_section(&self) -> Option<NarrativeSection> {
        let narrative = self.narrative.as_deref()?.trim();
        if narrative.is_empty() {
            return None;
        }
        let (title, body) = narrative.split_once('\n').unwrap_or((narrative, ""));
        Some(NarrativeSection {
            title: title.trim().to_string(),
            body: body.trim().to_string(),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Resource::default()
    }
}

/// Join the recipe's technique code against the technique table.
pub fn resolve_technique<'a>(recipe: &Recipe, store: &'a RecipeStore) -> Option<&'a Technique> {
    let code = recipe.technique_code.as_deref()?;
    let technique = store.technique(code);
    if technique.is_none() {
        tracing::warn!("{}: unknown technique {}", recipe.name, code);
    }
    technique
}

/// Garnishes whose flag is exactly 1, in column order.
pub fn resolve_garnishes(cocktail: &str, store: &RecipeStore) -> Vec<String> {
    store
        .garnish_flags(cocktail)
        .iter()
        .filter(|(_, flag)| *flag == Some(1.0))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Preparation instructions for every syrup used by the scaled recipe.
pub fn resolve_syrups<'a>(
    scaled: &ScaledRecipe,
    classifier: &Classifier,
    store: &'a RecipeStore,
) -> Vec<&'a Syrup> {
    scaled
        .ingredients
        .iter()
        .filter(|(name, value)| *value > 0.0 && classifier.is_syrup(name))
        .filter_map(|(name, _)| store.syrup(name))
        .collect()
}
