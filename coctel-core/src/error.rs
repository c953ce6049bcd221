use ingredient_classifier::ClassifierError;
use thiserror::Error;

use crate::config::ConfigError;

/// Failure to compute a scale factor.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    /// The base volume is missing, zero, negative or not a number, so the
    /// scale factor cannot be divided out.
    #[error("Cannot compute \"{recipe}\": base volume is missing or not positive")]
    InvalidBaseVolume { recipe: String },

    #[error("Number of servings must be at least 1")]
    InvalidServings,

    #[error("Target volume must be a positive number of milliliters, got {0}")]
    InvalidTargetVolume(f64),
}

/// The requested cocktail does not exist in the store.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("No such recipe: {0}")]
pub struct LookupError(pub String);

/// Failure to load the recipe dataset.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("{path} is missing required column: {column}")]
    MissingColumn { path: String, column: String },

    #[error("Invalid number {value:?} in column \"{column}\" of \"{row}\"")]
    InvalidNumber {
        row: String,
        column: String,
        value: String,
    },

    #[error("Negative quantity {value} for \"{column}\" in \"{row}\"")]
    NegativeQuantity {
        row: String,
        column: String,
        value: f64,
    },

    #[error("Recipe \"{0}\" appears more than once")]
    DuplicateRecipe(String),
}

/// Failure to resolve a selection from the user's filters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("No cocktails match the current filters")]
    NoResults,

    #[error("\"{0}\" is not one of the base spirits")]
    UnknownBaseSpirit(String),

    #[error("Unsupported target of {0} liters (choose 0.5 to 10 in steps of 0.5)")]
    UnsupportedTargetLiters(f64),
}

/// Any error surfaced by this crate.
#[derive(Error, Debug)]
pub enum CoctelError {
    #[error(transparent)]
    Scale(#[from] ScaleError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
