//! Display-category lookup for cocktail ingredients.
//!
//! Every ingredient column in the recipe dataset is either measured in
//! milliliters (and may be shown in ounces) or belongs to a fixed display
//! category such as drops, teaspoons or "to taste". This crate holds that
//! mapping and resolves ingredient names against it.
//!
//! # Example
//!
//! ```
//! use ingredient_classifier::{Classifier, DisplayCategory};
//!
//! let classifier = Classifier::builtin();
//! assert_eq!(classifier.classify("Salsa Tabasco").category, DisplayCategory::Drops);
//!
//! // Names without an entry are measured by volume.
//! assert_eq!(classifier.classify("Ron").category, DisplayCategory::VolumeConvertible);
//! ```

mod classifier;

pub use classifier::{Classification, Classifier, ClassifierError, DisplayCategory};
