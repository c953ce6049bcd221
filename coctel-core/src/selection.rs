//! Resolving which cocktail is selected from the user's filters.
//!
//! Selection state is explicit: callers keep a [`Session`] per user and pass
//! it in on every interaction.

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::store::RecipeStore;
use crate::types::{DisplayUnit, Recipe, ScalingRequest};

/// Filters applied to the cocktail list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    /// Keep cocktails that use this base spirit.
    pub base_spirit: Option<String>,
    /// Case-insensitive substring over name, glass, technique and ingredients.
    pub keyword: Option<String>,
}

fn matches_keyword(recipe: &Recipe, keyword: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(keyword);
    contains(&recipe.name)
        || recipe.glass.as_deref().is_some_and(contains)
        || recipe.technique_code.as_deref().is_some_and(contains)
        || recipe.used_ingredients().any(|(name, _)| contains(name))
}

/// Cocktails matching `filters`, sorted by name.
pub fn candidates<'a>(
    store: &'a RecipeStore,
    filters: &Filters,
) -> Result<Vec<&'a Recipe>, SelectionError> {
    let keyword = filters
        .keyword
        .as_deref()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty());

    // Only spirits from the manifest filter, matched case-insensitively.
    let spirit = match filters.base_spirit.as_deref().map(str::trim) {
        Some(wanted) if !wanted.is_empty() => Some(
            store
                .base_spirit(wanted)
                .ok_or_else(|| SelectionError::UnknownBaseSpirit(wanted.to_string()))?,
        ),
        _ => None,
    };

    let matched: Vec<&Recipe> = store
        .recipes()
        .iter()
        .filter(|r| match spirit {
            Some(spirit) => r.amount_of(spirit).is_some_and(|a| a > 0.0),
            None => true,
        })
        .filter(|r| match &keyword {
            Some(k) => matches_keyword(r, k),
            None => true,
        })
        .collect();

    if matched.is_empty() {
        tracing::info!("No cocktails match {:?}", filters);
        return Err(SelectionError::NoResults);
    }
    Ok(matched)
}

/// Per-user selection state carried between interactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub selected: Option<String>,
}

impl Session {
    /// Resolve the selected cocktail under `filters`.
    ///
    /// The previous selection is kept while it is still a candidate;
    /// otherwise the first candidate becomes the selection.
    pub fn resolve<'a>(
        &mut self,
        store: &'a RecipeStore,
        filters: &Filters,
    ) -> Result<&'a Recipe, SelectionError> {
        let candidates = candidates(store, filters)?;
        let recipe = self
            .selected
            .as_deref()
            .and_then(|name| candidates.iter().find(|r| r.name == name))
            .copied()
            .unwrap_or(candidates[0]);
        self.selected = Some(recipe.name.clone());
        Ok(recipe)
    }

    /// Record an explicit choice from the cocktail list.
    pub fn select(&mut self, name: impl Into<String>) {
        self.selected = Some(name.into());
    }
}

/// Target volume presets, in liters.
pub const TARGET_LITER_STEP: f64 = 0.5;
pub const MAX_TARGET_LITERS: f64 = 10.0;

/// A preset total volume: 0.5 to 10 liters in 0.5 steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetLiters(f64);

impl TargetLiters {
    pub fn new(liters: f64) -> Result<Self, SelectionError> {
        let steps = liters / TARGET_LITER_STEP;
        let valid = liters.is_finite()
            && liters >= TARGET_LITER_STEP
            && liters <= MAX_TARGET_LITERS
            && (steps - steps.round()).abs() < 1e-9;
        if valid {
            Ok(Self(steps.round() * TARGET_LITER_STEP))
        } else {
            Err(SelectionError::UnsupportedTargetLiters(liters))
        }
    }

    /// All presets in ascending order.
    pub fn presets() -> Vec<TargetLiters> {
        (1..=20)
            .map(|i| TargetLiters(f64::from(i) * TARGET_LITER_STEP))
            .collect()
    }

    pub fn liters(&self) -> f64 {
        self.0
    }

    pub fn ml(&self) -> f64 {
        self.0 * 1000.0
    }
}

impl Default for TargetLiters {
    fn default() -> Self {
        Self(1.0)
    }
}

/// "1" for whole liters, "1,5" otherwise.
pub fn format_liters(liters: f64) -> String {
    if liters.fract() == 0.0 {
        format!("{:.0}", liters)
    } else {
        liters.to_string().replace('.', ",")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityMode {
    #[default]
    Servings,
    TargetVolume,
}

/// Raw quantity inputs from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiSelection {
    pub mode: QuantityMode,
    pub servings: u32,
    pub liters: TargetLiters,
    pub unit: DisplayUnit,
}

impl Default for UiSelection {
    fn default() -> Self {
        Self {
            mode: QuantityMode::Servings,
            servings: 1,
            liters: TargetLiters::default(),
            unit: DisplayUnit::Ml,
        }
    }
}

impl UiSelection {
    /// Build the scaling request. Target-volume mode always displays ml.
    pub fn to_request(&self) -> ScalingRequest {
        match self.mode {
            QuantityMode::Servings => ScalingRequest::servings(self.servings, self.unit),
            QuantityMode::TargetVolume => {
                ScalingRequest::target_volume_ml(self.liters.ml(), DisplayUnit::Ml)
            }
        }
    }
}
