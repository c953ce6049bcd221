//! Ingredient line formatting.
//!
//! The display category decides both how a scaled quantity is rounded and
//! how the line is phrased. "To taste" and drops ingredients never show a
//! number; everything else is rounded to a whole count, except ounces which
//! keep two decimals.

use ingredient_classifier::{Classification, Classifier, DisplayCategory};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScaleError;
use crate::scaling::{scale, ScaledRecipe};
use crate::types::{DisplayUnit, Recipe, ScaledIngredient, ScalingRequest};
use crate::unit_conversion::convert;

/// Language of the generated ingredient lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            other => Err(format!("unknown locale {other:?} (expected en or es)")),
        }
    }
}

/// Statistics about classifier coverage while formatting.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ClassificationStats {
    pub classified: usize,
    pub defaulted: usize,
    /// Ingredients with no classifier entry, formatted as volume-convertible.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unclassified: Vec<String>,
}

/// Round a count-like quantity to a whole number, never below 1.
///
/// Uses round-half-away-from-zero, so 2.5 teaspoons become 3.
pub fn round_count(value: f64) -> u64 {
    let rounded = value.round();
    if rounded < 1.0 {
        1
    } else {
        rounded as u64
    }
}

/// Round a converted volume for display.
///
/// Milliliters round to whole numbers; ounces to two decimals.
pub fn round_volume(value: f64, unit: DisplayUnit) -> f64 {
    match unit {
        DisplayUnit::Ml => value.round(),
        DisplayUnit::Oz => (value * 100.0).round() / 100.0,
    }
}

/// Format a converted volume: "667" for ml, "1.5" or "2" for oz.
pub fn format_quantity(value: f64, unit: DisplayUnit) -> String {
    let rounded = round_volume(value, unit);
    if rounded.fract() == 0.0 {
        return format!("{:.0}", rounded);
    }
    let s = format!("{:.2}", rounded);
    s.trim_end_matches('0').to_string()
}

fn plural(n: u64, singular: &str, plural: &str) -> String {
    if n == 1 {
        singular.to_string()
    } else {
        plural.to_string()
    }
}

/// Render one line plus the number shown in it, if any.
fn render(
    name: &str,
    classification: &Classification,
    scaled_ml: f64,
    unit: DisplayUnit,
    locale: Locale,
) -> (String, Option<f64>) {
    let friendly = classification.friendly_name(name);

    // Fixed-unit categories: (count, English noun, Spanish noun)
    let counted = |n: u64, en: (&str, &str), es: (&str, &str)| match locale {
        Locale::En => format!("{n} {} of {friendly}", plural(n, en.0, en.1)),
        Locale::Es => format!("{n} {} de {friendly}", plural(n, es.0, es.1)),
    };

    match classification.category {
        DisplayCategory::ToTaste => {
            let line = match locale {
                Locale::En => format!("Add {friendly} to taste"),
                Locale::Es => format!("Agregar {friendly} a gusto"),
            };
            (line, None)
        }
        DisplayCategory::Drops => {
            let line = match locale {
                Locale::En => format!("A few drops of {friendly}"),
                Locale::Es => format!("Agregar algunas gotas de {friendly}"),
            };
            (line, None)
        }
        DisplayCategory::Units => {
            let n = round_count(scaled_ml);
            let line = format!("{n} {}", classification.unit_noun_for(name, n));
            (line, Some(n as f64))
        }
        DisplayCategory::Teaspoons => {
            let n = round_count(scaled_ml);
            let line = counted(n, ("teaspoon", "teaspoons"), ("cucharadita", "cucharaditas"));
            (line, Some(n as f64))
        }
        DisplayCategory::Tablespoons => {
            let n = round_count(scaled_ml);
            let line = counted(n, ("tablespoon", "tablespoons"), ("cucharada", "cucharadas"));
            (line, Some(n as f64))
        }
        DisplayCategory::Cups => {
            let n = round_count(scaled_ml);
            let line = counted(n, ("cup", "cups"), ("taza", "tazas"));
            (line, Some(n as f64))
        }
        DisplayCategory::Grams => {
            let n = round_count(scaled_ml);
            let line = counted(n, ("g", "g"), ("g", "g"));
            (line, Some(n as f64))
        }
        DisplayCategory::VolumeConvertible => {
            let converted = convert(scaled_ml, classification.category, unit);
            let quantity = format_quantity(converted, unit);
            let line = match locale {
                Locale::En => format!("{quantity} {unit} of {name}"),
                Locale::Es => format!("{quantity} {unit} de {name}"),
            };
            (line, Some(round_volume(converted, unit)))
        }
    }
}

/// Format a single scaled ingredient as a display line.
pub fn format_line(
    name: &str,
    classification: &Classification,
    scaled_ml: f64,
    unit: DisplayUnit,
    locale: Locale,
) -> String {
    render(name, classification, scaled_ml, unit, locale).0
}

/// Scale a recipe and format every used ingredient, in recipe order.
pub fn scale_and_format(
    recipe: &Recipe,
    request: &ScalingRequest,
    classifier: &Classifier,
    locale: Locale,
) -> Result<Vec<ScaledIngredient>, ScaleError> {
    let mut stats = ClassificationStats::default();
    scale_and_format_with_stats(recipe, request, classifier, locale, &mut stats)
}

/// Like [`scale_and_format`], also recording which ingredients had no
/// classifier entry.
pub fn scale_and_format_with_stats(
    recipe: &Recipe,
    request: &ScalingRequest,
    classifier: &Classifier,
    locale: Locale,
    stats: &mut ClassificationStats,
) -> Result<Vec<ScaledIngredient>, ScaleError> {
    let scaled = scale(recipe, request)?;
    Ok(format_scaled(&recipe.name, &scaled, request.unit, classifier, locale, stats))
}

/// Format ingredients that were already scaled, in their scaled order.
pub fn format_scaled(
    recipe_name: &str,
    scaled: &ScaledRecipe,
    unit: DisplayUnit,
    classifier: &Classifier,
    locale: Locale,
    stats: &mut ClassificationStats,
) -> Vec<ScaledIngredient> {
    let mut unclassified = Vec::new();
    let lines = scaled
        .ingredients
        .iter()
        .map(|(name, scaled_ml)| {
            let classification = match classifier.lookup(name) {
                Some(c) => {
                    stats.classified += 1;
                    c
                }
                None => {
                    stats.defaulted += 1;
                    unclassified.push(name.clone());
                    classifier.classify(name)
                }
            };
            let (line, display_value) = render(name, classification, *scaled_ml, unit, locale);
            ScaledIngredient {
                name: name.clone(),
                category: classification.category,
                scaled_ml: *scaled_ml,
                display_value,
                line,
            }
        })
        .collect();

    if !unclassified.is_empty() {
        tracing::debug!(
            "{}: no classifier entry for {:?}, using volume",
            recipe_name,
            unclassified
        );
        stats.unclassified.extend(unclassified);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(category: DisplayCategory, alias: Option<&str>) -> Classification {
        Classification {
            category,
            alias: alias.map(str::to_string),
            ..Default::default()
        }
    }

    fn volume() -> Classification {
        Classification::default()
    }

    #[test]
    fn test_format_quantity_ml() {
        assert_eq!(format_quantity(120.0, DisplayUnit::Ml), "120");
        assert_eq!(format_quantity(666.666, DisplayUnit::Ml), "667");
        assert_eq!(format_quantity(333.333, DisplayUnit::Ml), "333");
        assert_eq!(format_quantity(22.5, DisplayUnit::Ml), "23");
    }

    #[test]
    fn test_format_quantity_oz() {
        assert_eq!(format_quantity(1.5, DisplayUnit::Oz), "1.5");
        assert_eq!(format_quantity(2.0, DisplayUnit::Oz), "2");
        assert_eq!(format_quantity(1.999, DisplayUnit::Oz), "2");
        assert_eq!(format_quantity(1.0 / 3.0, DisplayUnit::Oz), "0.33");
        assert_eq!(format_quantity(0.25, DisplayUnit::Oz), "0.25");
        assert_eq!(format_quantity(1.104, DisplayUnit::Oz), "1.1");
    }

    #[test]
    fn test_round_count() {
        assert_eq!(round_count(2.0), 2);
        assert_eq!(round_count(2.5), 3);
        assert_eq!(round_count(2.49), 2);
        assert_eq!(round_count(0.2), 1);
    }

    #[test]
    fn test_volume_line() {
        let c = volume();
        assert_eq!(
            format_line("Ron", &c, 45.0, DisplayUnit::Oz, Locale::En),
            "1.5 oz of Ron"
        );
        assert_eq!(
            format_line("Ron", &c, 45.0, DisplayUnit::Ml, Locale::En),
            "45 ml of Ron"
        );
        assert_eq!(
            format_line("Jugo de Limón", &c, 60.0, DisplayUnit::Ml, Locale::Es),
            "60 ml de Jugo de Limón"
        );
    }

    #[test]
    fn test_to_taste_ignores_value() {
        let c = classification(DisplayCategory::ToTaste, Some("sal"));
        for value in [0.01, 1.0, 11.11, 250.0] {
            assert_eq!(
                format_line("Sal", &c, value, DisplayUnit::Ml, Locale::En),
                "Add sal to taste"
            );
        }
        assert_eq!(
            format_line("Sal", &c, 3.0, DisplayUnit::Oz, Locale::Es),
            "Agregar sal a gusto"
        );
    }

    #[test]
    fn test_drops_unaffected_by_unit() {
        let c = classification(DisplayCategory::Drops, None);
        let ml = format_line("Salsa Tabasco", &c, 4.0, DisplayUnit::Ml, Locale::En);
        let oz = format_line("Salsa Tabasco", &c, 4.0, DisplayUnit::Oz, Locale::En);
        assert_eq!(ml, "A few drops of Salsa Tabasco");
        assert_eq!(ml, oz);
        assert_eq!(
            format_line("Salsa Tabasco", &c, 4.0, DisplayUnit::Ml, Locale::Es),
            "Agregar algunas gotas de Salsa Tabasco"
        );
    }

    #[test]
    fn test_counted_categories() {
        let tsp = classification(DisplayCategory::Teaspoons, Some("cacao"));
        assert_eq!(
            format_line("Cacao", &tsp, 2.0, DisplayUnit::Oz, Locale::En),
            "2 teaspoons of cacao"
        );
        assert_eq!(
            format_line("Cacao", &tsp, 1.2, DisplayUnit::Ml, Locale::En),
            "1 teaspoon of cacao"
        );
        assert_eq!(
            format_line("Cacao", &tsp, 2.0, DisplayUnit::Ml, Locale::Es),
            "2 cucharaditas de cacao"
        );

        let tbsp = classification(DisplayCategory::Tablespoons, Some("miel"));
        assert_eq!(
            format_line("Miel", &tbsp, 1.0, DisplayUnit::Ml, Locale::En),
            "1 tablespoon of miel"
        );
        assert_eq!(
            format_line("Miel", &tbsp, 3.4, DisplayUnit::Ml, Locale::Es),
            "3 cucharadas de miel"
        );

        let cups = classification(DisplayCategory::Cups, None);
        assert_eq!(
            format_line("Fruta Picada", &cups, 4.0, DisplayUnit::Ml, Locale::En),
            "4 cups of Fruta Picada"
        );

        let grams = classification(DisplayCategory::Grams, Some("jengibre fresco"));
        assert_eq!(
            format_line("Jengibre Fresco", &grams, 12.6, DisplayUnit::Oz, Locale::En),
            "13 g of jengibre fresco"
        );
    }

    #[test]
    fn test_units_line() {
        let c = Classification {
            category: DisplayCategory::Units,
            unit_noun: Some("hoja de menta".to_string()),
            unit_noun_plural: Some("hojas de menta".to_string()),
            ..Default::default()
        };
        assert_eq!(
            format_line("Hojas de Menta", &c, 16.0, DisplayUnit::Oz, Locale::En),
            "16 hojas de menta"
        );
        assert_eq!(
            format_line("Hojas de Menta", &c, 0.6, DisplayUnit::Ml, Locale::En),
            "1 hoja de menta"
        );
    }

    #[test]
    fn test_scale_and_format_daiquiri() {
        let recipe = Recipe::new("Daiquiri", 90.0)
            .with_ingredient("Ron", 60.0)
            .with_ingredient("Jugo de Limón", 30.0);
        let classifier = Classifier::default();

        let lines = scale_and_format(
            &recipe,
            &ScalingRequest::servings(2, DisplayUnit::Ml),
            &classifier,
            Locale::Es,
        )
        .unwrap();
        let text: Vec<&str> = lines.iter().map(|l| l.line.as_str()).collect();
        assert_eq!(text, vec!["120 ml de Ron", "60 ml de Jugo de Limón"]);

        let lines = scale_and_format(
            &recipe,
            &ScalingRequest::target_volume_ml(1000.0, DisplayUnit::Ml),
            &classifier,
            Locale::En,
        )
        .unwrap();
        assert_eq!(lines[0].display_value, Some(667.0));
        assert_eq!(lines[1].display_value, Some(333.0));
    }

    #[test]
    fn test_stats_record_unclassified() {
        let recipe = Recipe::new("Margarita", 95.0)
            .with_ingredient("Tequila", 50.0)
            .with_ingredient("Sal", 1.0);
        let mut stats = ClassificationStats::default();
        let lines = scale_and_format_with_stats(
            &recipe,
            &ScalingRequest::servings(1, DisplayUnit::Ml),
            Classifier::builtin(),
            Locale::En,
            &mut stats,
        )
        .unwrap();

        assert_eq!(lines[1].line, "Add sal to taste");
        assert_eq!(lines[1].display_value, None);
        assert_eq!(stats.classified, 1);
        assert_eq!(stats.defaulted, 1);
        assert_eq!(stats.unclassified, vec!["Tequila".to_string()]);
    }

    #[test]
    fn test_format_scaled_matches_scale_and_format() {
        let recipe = Recipe::new("Mojito", 155.0)
            .with_ingredient("Ron", 50.0)
            .with_ingredient("Hojas de Menta", 8.0)
            .with_ingredient("Azúcar", 2.0);
        let request = ScalingRequest::servings(3, DisplayUnit::Oz);
        let classifier = Classifier::builtin();

        let scaled = scale(&recipe, &request).unwrap();
        let mut stats = ClassificationStats::default();
        let lines = format_scaled(
            &recipe.name,
            &scaled,
            request.unit,
            classifier,
            Locale::En,
            &mut stats,
        );

        assert_eq!(
            lines,
            scale_and_format(&recipe, &request, classifier, Locale::En).unwrap()
        );
        assert_eq!(lines[0].line, "5 oz of Ron");
        assert_eq!(lines[1].line, "24 hojas de menta");
        assert_eq!(stats.classified, 2);
        assert_eq!(stats.unclassified, vec!["Ron".to_string()]);
    }

    #[test]
    fn test_scale_error_propagates() {
        let mut recipe = Recipe::new("Roto", 90.0).with_ingredient("Ron", 60.0);
        recipe.base_volume_ml = None;
        let result = scale_and_format(
            &recipe,
            &ScalingRequest::servings(1, DisplayUnit::Ml),
            Classifier::builtin(),
            Locale::En,
        );
        assert!(matches!(result, Err(ScaleError::InvalidBaseVolume { .. })));
    }
}
