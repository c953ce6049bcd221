//! Ingredient name -> display category mapping.
//!
//! Categories are resolved once per ingredient and dispatched on by the
//! formatter. Names are matched case-insensitively after trimming.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

// =============================================================================
// Data structures
// =============================================================================

/// How a scaled ingredient quantity is rounded and phrased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayCategory {
    ToTaste,
    Drops,
    Units,
    Teaspoons,
    Tablespoons,
    Cups,
    Grams,
    #[default]
    VolumeConvertible,
}

impl DisplayCategory {
    pub const ALL: &'static [DisplayCategory] = &[
        DisplayCategory::ToTaste,
        DisplayCategory::Drops,
        DisplayCategory::Units,
        DisplayCategory::Teaspoons,
        DisplayCategory::Tablespoons,
        DisplayCategory::Cups,
        DisplayCategory::Grams,
        DisplayCategory::VolumeConvertible,
    ];

    /// Only this category follows the requested ml/oz display unit.
    pub fn is_volume_convertible(&self) -> bool {
        matches!(self, DisplayCategory::VolumeConvertible)
    }

    /// Categories whose scaled value is never shown, only whether the
    /// ingredient is used at all.
    pub fn is_presence_only(&self) -> bool {
        matches!(self, DisplayCategory::ToTaste | DisplayCategory::Drops)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayCategory::ToTaste => "to_taste",
            DisplayCategory::Drops => "drops",
            DisplayCategory::Units => "units",
            DisplayCategory::Teaspoons => "teaspoons",
            DisplayCategory::Tablespoons => "tablespoons",
            DisplayCategory::Cups => "cups",
            DisplayCategory::Grams => "grams",
            DisplayCategory::VolumeConvertible => "volume_convertible",
        }
    }
}

impl fmt::Display for DisplayCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single ingredient.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Classification {
    pub category: DisplayCategory,
    /// Display alias used in phrases like "Add sal to taste".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Counted noun for the `units` category, e.g. "hoja de menta".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_noun: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_noun_plural: Option<String>,
    /// Syrups have a preparation sub-recipe.
    #[serde(default)]
    pub syrup: bool,
}

impl Classification {
    /// The alias if one is configured, otherwise the raw ingredient name.
    pub fn friendly_name<'a>(&'a self, raw: &'a str) -> &'a str {
        self.alias.as_deref().unwrap_or(raw)
    }

    /// Noun for `count` items of this ingredient.
    ///
    /// Falls back to the friendly name when no noun is configured; the plural
    /// defaults to the singular with an "s" appended.
    pub fn unit_noun_for(&self, raw: &str, count: u64) -> String {
        let singular = self
            .unit_noun
            .as_deref()
            .unwrap_or_else(|| self.friendly_name(raw));
        if count == 1 {
            return singular.to_string();
        }
        match &self.unit_noun_plural {
            Some(plural) => plural.clone(),
            None if self.unit_noun.is_some() => format!("{singular}s"),
            None => singular.to_string(),
        }
    }
}

/// One entry of the classifier data file.
#[derive(Deserialize)]
struct ClassifierEntry {
    name: String,
    #[serde(flatten)]
    classification: Classification,
}

#[derive(Deserialize)]
struct ClassifierDataFile {
    ingredients: Vec<ClassifierEntry>,
}

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Invalid classifier data: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Ingredient \"{key}\" is classified as both {first} and {second}")]
    ConflictingEntries {
        key: String,
        first: DisplayCategory,
        second: DisplayCategory,
    },
}

// =============================================================================
// Data loading
// =============================================================================

static CLASSIFIER_JSON: &str = include_str!("data/classifier.json");

static BUILTIN: LazyLock<Classifier> = LazyLock::new(|| {
    Classifier::from_json(CLASSIFIER_JSON).expect("classifier.json should be valid")
});

static DEFAULT_CLASSIFICATION: Classification = Classification {
    category: DisplayCategory::VolumeConvertible,
    alias: None,
    unit_noun: None,
    unit_noun_plural: None,
    syrup: false,
};

/// Normalize an ingredient name for matching.
fn normalize_ingredient_name(s: &str) -> String {
    s.trim().to_lowercase()
}

// =============================================================================
// Public API
// =============================================================================

/// Lookup table from ingredient name to [`Classification`].
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    /// Normalized name -> (name as written in the data file, classification)
    entries: HashMap<String, (String, Classification)>,
}

impl Classifier {
    /// The classifier bundled with this crate.
    pub fn builtin() -> &'static Classifier {
        &BUILTIN
    }

    /// Parse classifier data.
    ///
    /// Two entries that normalize to the same name must agree on the
    /// category; the first entry wins otherwise.
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let data: ClassifierDataFile = serde_json::from_str(json)?;
        let mut classifier = Classifier::default();
        for entry in data.ingredients {
            classifier.insert(&entry.name, entry.classification)?;
        }
        Ok(classifier)
    }

    /// Add an entry, rejecting a category conflict with an existing one.
    pub fn insert(
        &mut self,
        name: &str,
        classification: Classification,
    ) -> Result<(), ClassifierError> {
        let key = normalize_ingredient_name(name);
        if let Some((_, existing)) = self.entries.get(&key) {
            if existing.category != classification.category {
                return Err(ClassifierError::ConflictingEntries {
                    key,
                    first: existing.category,
                    second: classification.category,
                });
            }
            return Ok(());
        }
        self.entries
            .insert(key, (name.trim().to_string(), classification));
        Ok(())
    }

    /// Explicit lookup; `None` means the name has no entry.
    pub fn lookup(&self, name: &str) -> Option<&Classification> {
        self.entries
            .get(&normalize_ingredient_name(name))
            .map(|(_, c)| c)
    }

    /// Classify an ingredient. Names without an entry are volume-convertible.
    pub fn classify(&self, name: &str) -> &Classification {
        self.lookup(name).unwrap_or(&DEFAULT_CLASSIFICATION)
    }

    pub fn is_syrup(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|c| c.syrup)
    }

    /// All entries as (name, classification), sorted by name.
    pub fn entries(&self) -> Vec<(&str, &Classification)> {
        let mut entries: Vec<_> = self
            .entries
            .values()
            .map(|(name, c)| (name.as_str(), c))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
