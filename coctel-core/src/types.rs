use ingredient_classifier::DisplayCategory;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One ingredient column of a recipe row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    /// Raw quantity: milliliters for volume ingredients, a count or sentinel
    /// for categorical ones. `None` when the cell is empty.
    pub amount: Option<f64>,
}

/// A cocktail row from the recipe table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    /// Finished-drink volume the raw quantities were authored for.
    pub base_volume_ml: Option<f64>,
    /// Ingredient columns in dataset order, including unused ones.
    pub ingredients: Vec<RecipeIngredient>,
    pub glass: Option<String>,
    pub technique_code: Option<String>,
    pub ice_flag: Option<String>,
    pub ice_amount: Option<f64>,
    pub glass_capacity_ml: Option<f64>,
    pub glass_capacity_with_ice_ml: Option<f64>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, base_volume_ml: f64) -> Self {
        Self {
            name: name.into(),
            base_volume_ml: Some(base_volume_ml),
            ..Default::default()
        }
    }

    pub fn with_ingredient(mut self, name: impl Into<String>, amount: f64) -> Self {
        self.ingredients.push(RecipeIngredient {
            name: name.into(),
            amount: Some(amount),
        });
        self
    }

    /// Ingredients that are part of this recipe: present, finite and nonzero.
    pub fn used_ingredients(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ingredients.iter().filter_map(|i| match i.amount {
            Some(a) if a.is_finite() && a != 0.0 => Some((i.name.as_str(), a)),
            _ => None,
        })
    }

    /// Raw amount of an ingredient, if it is used.
    pub fn amount_of(&self, ingredient: &str) -> Option<f64> {
        self.used_ingredients()
            .find(|(name, _)| *name == ingredient)
            .map(|(_, a)| a)
    }
}

/// Unit used to display volume-convertible ingredients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    #[default]
    Ml,
    Oz,
}

impl DisplayUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayUnit::Ml => "ml",
            DisplayUnit::Oz => "oz",
        }
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ml" => Ok(DisplayUnit::Ml),
            "oz" => Ok(DisplayUnit::Oz),
            other => Err(format!("unknown unit {other:?} (expected ml or oz)")),
        }
    }
}

/// How much to make.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    /// A number of drinks, each of the recipe's base volume.
    Servings(u32),
    /// A total volume to fill, independent of the base volume.
    TargetVolume { ml: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingRequest {
    pub quantity: Quantity,
    pub unit: DisplayUnit,
}

impl ScalingRequest {
    pub fn servings(count: u32, unit: DisplayUnit) -> Self {
        Self {
            quantity: Quantity::Servings(count),
            unit,
        }
    }

    pub fn target_volume_ml(ml: f64, unit: DisplayUnit) -> Self {
        Self {
            quantity: Quantity::TargetVolume { ml },
            unit,
        }
    }
}

/// A scaled ingredient ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaledIngredient {
    pub name: String,
    pub category: DisplayCategory,
    /// Scaled quantity before unit conversion.
    pub scaled_ml: f64,
    /// Rounded quantity as displayed; `None` for presence-only categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<f64>,
    pub line: String,
}
