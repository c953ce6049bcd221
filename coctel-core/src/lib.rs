pub mod card;
pub mod config;
pub mod error;
pub mod formatter;
pub mod metadata;
pub mod scaling;
pub mod selection;
pub mod store;
pub mod types;
pub mod unit_conversion;

pub use card::{build_card, CocktailCard};
pub use config::{Config, ConfigError};
pub use error::{CoctelError, LookupError, ScaleError, SelectionError, StoreError};
pub use formatter::{
    format_line, format_scaled, scale_and_format, scale_and_format_with_stats,
    ClassificationStats, Locale,
};
pub use ingredient_classifier::{Classification, Classifier, DisplayCategory};
pub use scaling::{scale, scale_factor, target_volume_ml, ScaledRecipe};
pub use selection::{Filters, QuantityMode, Session, TargetLiters, UiSelection};
pub use store::RecipeStore;
pub use types::{
    DisplayUnit, Quantity, Recipe, RecipeIngredient, ScaledIngredient, ScalingRequest,
};
pub use unit_conversion::{convert, ML_PER_OZ};
