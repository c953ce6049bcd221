//! Recipe scaling.
//!
//! Every used ingredient is multiplied by the same factor, the ratio of the
//! requested volume to the recipe's base volume. Display categories play no
//! part here; rounding and unit conversion happen later.

use serde::Serialize;

use crate::error::ScaleError;
use crate::types::{Quantity, Recipe, ScalingRequest};

/// Scaled quantities for one recipe, in recipe order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledRecipe {
    pub factor: f64,
    pub target_volume_ml: f64,
    /// (ingredient name, scaled milliliter-equivalent quantity)
    pub ingredients: Vec<(String, f64)>,
}

impl ScaledRecipe {
    pub fn total_volume_ml(&self) -> f64 {
        self.ingredients.iter().map(|(_, v)| v).sum()
    }

    pub fn get(&self, ingredient: &str) -> Option<f64> {
        self.ingredients
            .iter()
            .find(|(name, _)| name == ingredient)
            .map(|(_, v)| *v)
    }
}

fn base_volume(recipe: &Recipe) -> Result<f64, ScaleError> {
    match recipe.base_volume_ml {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => {
            tracing::warn!(
                "Recipe {} has invalid base volume {:?}",
                recipe.name,
                recipe.base_volume_ml
            );
            Err(ScaleError::InvalidBaseVolume {
                recipe: recipe.name.clone(),
            })
        }
    }
}

/// Total volume to produce for the requested quantity.
pub fn target_volume_ml(recipe: &Recipe, quantity: &Quantity) -> Result<f64, ScaleError> {
    match *quantity {
        Quantity::Servings(0) => Err(ScaleError::InvalidServings),
        Quantity::Servings(n) => Ok(f64::from(n) * base_volume(recipe)?),
        Quantity::TargetVolume { ml } if ml.is_finite() && ml > 0.0 => Ok(ml),
        Quantity::TargetVolume { ml } => Err(ScaleError::InvalidTargetVolume(ml)),
    }
}

/// Ratio of the target volume to the recipe's base volume.
pub fn scale_factor(recipe: &Recipe, quantity: &Quantity) -> Result<f64, ScaleError> {
    let target = target_volume_ml(recipe, quantity)?;
    Ok(target / base_volume(recipe)?)
}

/// Scale every used ingredient of `recipe` by the requested factor.
///
/// Ingredients that are empty or zero in the recipe row are left out. No
/// rounding is applied.
pub fn scale(recipe: &Recipe, request: &ScalingRequest) -> Result<ScaledRecipe, ScaleError> {
    let target_volume_ml = target_volume_ml(recipe, &request.quantity)?;
    let factor = target_volume_ml / base_volume(recipe)?;

    let ingredients = recipe
        .used_ingredients()
        .map(|(name, amount)| (name.to_string(), amount * factor))
        .collect();

    tracing::debug!(
        "Scaled {} to {} ml (factor {:.4})",
        recipe.name,
        target_volume_ml,
        factor
    );

    Ok(ScaledRecipe {
        factor,
        target_volume_ml,
        ingredients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DisplayUnit, RecipeIngredient};

    fn daiquiri() -> Recipe {
        Recipe::new("Daiquiri", 90.0)
            .with_ingredient("Ron", 60.0)
            .with_ingredient("Jugo de Limón", 30.0)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_scale_servings() {
        let scaled = scale(&daiquiri(), &ScalingRequest::servings(2, DisplayUnit::Ml)).unwrap();
        assert_close(scaled.factor, 2.0);
        assert_close(scaled.target_volume_ml, 180.0);
        assert_eq!(
            scaled.ingredients,
            vec![
                ("Ron".to_string(), 120.0),
                ("Jugo de Limón".to_string(), 60.0)
            ]
        );
    }

    #[test]
    fn test_scale_target_volume() {
        let request = ScalingRequest::target_volume_ml(1000.0, DisplayUnit::Ml);
        let scaled = scale(&daiquiri(), &request).unwrap();
        assert_close(scaled.factor, 1000.0 / 90.0);
        assert_close(scaled.get("Ron").unwrap(), 60.0 * 1000.0 / 90.0);
        assert_close(scaled.get("Jugo de Limón").unwrap(), 30.0 * 1000.0 / 90.0);
        assert_close(scaled.total_volume_ml(), 1000.0);
    }

    #[test]
    fn test_servings_total_matches_base_volume() {
        let recipe = daiquiri();
        for n in 1..=12 {
            let scaled = scale(&recipe, &ScalingRequest::servings(n, DisplayUnit::Ml)).unwrap();
            assert!((scaled.total_volume_ml() - f64::from(n) * 90.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_target_volume_depends_only_on_ratio() {
        // Same proportions, different base volumes.
        let small = daiquiri();
        let large = Recipe::new("Daiquiri doble", 180.0)
            .with_ingredient("Ron", 120.0)
            .with_ingredient("Jugo de Limón", 60.0);
        let request = ScalingRequest::target_volume_ml(750.0, DisplayUnit::Ml);

        let a = scale(&small, &request).unwrap();
        let b = scale(&large, &request).unwrap();
        for ((_, x), (_, y)) in a.ingredients.iter().zip(&b.ingredients) {
            assert_close(*x, *y);
        }
    }

    #[test]
    fn test_zero_and_missing_excluded() {
        let mut recipe = daiquiri().with_ingredient("Gin", 0.0);
        recipe.ingredients.push(RecipeIngredient {
            name: "Vodka".to_string(),
            amount: None,
        });
        let scaled = scale(&recipe, &ScalingRequest::servings(3, DisplayUnit::Ml)).unwrap();
        assert_eq!(scaled.ingredients.len(), 2);
        assert!(scaled.get("Gin").is_none());
        assert!(scaled.get("Vodka").is_none());
    }

    #[test]
    fn test_categorical_sentinel_scales_like_everything_else() {
        let recipe = daiquiri().with_ingredient("Sal", 1.0);
        let request = ScalingRequest::target_volume_ml(450.0, DisplayUnit::Ml);
        let scaled = scale(&recipe, &request).unwrap();
        assert_close(scaled.get("Sal").unwrap(), scaled.factor);
    }

    #[test]
    fn test_invalid_base_volume() {
        let request = ScalingRequest::servings(1, DisplayUnit::Ml);
        for base in [Some(0.0), Some(-5.0), Some(f64::NAN), None] {
            let mut recipe = daiquiri();
            recipe.base_volume_ml = base;
            assert_eq!(
                scale(&recipe, &request),
                Err(ScaleError::InvalidBaseVolume {
                    recipe: "Daiquiri".to_string()
                })
            );
        }

        // Target-volume mode still divides by the base volume.
        let mut recipe = daiquiri();
        recipe.base_volume_ml = Some(0.0);
        assert!(scale_factor(&recipe, &Quantity::TargetVolume { ml: 500.0 }).is_err());
        assert_eq!(
            target_volume_ml(&recipe, &Quantity::TargetVolume { ml: 500.0 }),
            Ok(500.0)
        );
    }

    #[test]
    fn test_invalid_request() {
        let recipe = daiquiri();
        assert_eq!(
            target_volume_ml(&recipe, &Quantity::Servings(0)),
            Err(ScaleError::InvalidServings)
        );
        assert_eq!(
            target_volume_ml(&recipe, &Quantity::TargetVolume { ml: -1.0 }),
            Err(ScaleError::InvalidTargetVolume(-1.0))
        );
        assert!(target_volume_ml(&recipe, &Quantity::TargetVolume { ml: f64::INFINITY }).is_err());
    }

    #[test]
    fn test_fractional_factor_not_rounded() {
        let request = ScalingRequest::target_volume_ml(100.0, DisplayUnit::Ml);
        let scaled = scale(&daiquiri(), &request).unwrap();
        assert_close(scaled.get("Ron").unwrap(), 66.666_666_666_666_67);
    }
}
