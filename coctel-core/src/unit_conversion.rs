//! Milliliter to ounce conversion for display.
//!
//! Only volume-convertible ingredients follow the requested unit. Drops,
//! teaspoons, grams and the other categories keep their own unit.

use ingredient_classifier::DisplayCategory;

use crate::types::DisplayUnit;

/// Bar-measure ounce, not the US fluid ounce (29.57 ml).
pub const ML_PER_OZ: f64 = 30.0;

/// Multiplier from milliliters to the display unit.
pub fn conversion_factor(unit: DisplayUnit) -> f64 {
    match unit {
        DisplayUnit::Ml => 1.0,
        DisplayUnit::Oz => 1.0 / ML_PER_OZ,
    }
}

/// Convert a scaled quantity to the display unit if its category allows it.
pub fn convert(scaled_ml: f64, category: DisplayCategory, unit: DisplayUnit) -> f64 {
    if category.is_volume_convertible() {
        scaled_ml * conversion_factor(unit)
    } else {
        scaled_ml
    }
}

pub fn oz_to_ml(oz: f64) -> f64 {
    oz * ML_PER_OZ
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_volume() {
        assert_eq!(convert(45.0, DisplayCategory::VolumeConvertible, DisplayUnit::Ml), 45.0);
        assert!((convert(45.0, DisplayCategory::VolumeConvertible, DisplayUnit::Oz) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_categorical_ignores_unit() {
        for category in DisplayCategory::ALL {
            if category.is_volume_convertible() {
                continue;
            }
            assert_eq!(convert(2.0, *category, DisplayUnit::Oz), 2.0);
            assert_eq!(convert(2.0, *category, DisplayUnit::Ml), 2.0);
        }
    }

    #[test]
    fn test_round_trip() {
        for ml in [7.5, 15.0, 22.0, 60.0, 333.333, 1000.0] {
            let oz = convert(ml, DisplayCategory::VolumeConvertible, DisplayUnit::Oz);
            assert!((oz_to_ml(oz) - ml).abs() < 1.0);
        }
    }
}
