//! Everything shown for one cocktail under one scaling request.

use ingredient_classifier::Classifier;
use serde::Serialize;

use crate::error::CoctelError;
use crate::formatter::{format_scaled, ClassificationStats, Locale};
use crate::metadata::{
    resolve_garnishes, resolve_syrups, resolve_technique, GlassInfo, IcePolicy,
    NarrativeSection, Resource, Syrup, Technique,
};
use crate::scaling::scale;
use crate::selection::format_liters;
use crate::store::RecipeStore;
use crate::types::{Quantity, ScaledIngredient, ScalingRequest};

/// Presentation-neutral view of a cocktail.
#[derive(Debug, Clone, Serialize)]
pub struct CocktailCard {
    pub name: String,
    pub request: ScalingRequest,
    pub scale_factor: f64,
    pub target_volume_ml: f64,
    /// e.g. "2 servings (210 ml)" or "1,5 liters (1500 ml)"
    pub quantity_summary: String,
    pub ingredients: Vec<ScaledIngredient>,
    pub syrups: Vec<Syrup>,
    pub ice: IcePolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technique: Option<Technique>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glass: Option<GlassInfo>,
    pub garnishes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<NarrativeSection>,
}

fn quantity_summary(quantity: &Quantity, target_volume_ml: f64, locale: Locale) -> String {
    let ml = target_volume_ml.round() as i64;
    match (*quantity, locale) {
        (Quantity::Servings(1), Locale::En) => format!("1 serving ({ml} ml)"),
        (Quantity::Servings(n), Locale::En) => format!("{n} servings ({ml} ml)"),
        (Quantity::Servings(1), Locale::Es) => format!("1 cóctel ({ml} ml)"),
        (Quantity::Servings(n), Locale::Es) => format!("{n} cócteles ({ml} ml)"),
        (Quantity::TargetVolume { ml: v }, Locale::En) => {
            format!("Total volume: {} liters ({ml} ml)", format_liters(v / 1000.0))
        }
        (Quantity::TargetVolume { ml: v }, Locale::Es) => {
            format!("Volumen total: {} litros ({ml} ml)", format_liters(v / 1000.0))
        }
    }
}

/// Build the card for `name` under `request`.
pub fn build_card(
    store: &RecipeStore,
    classifier: &Classifier,
    name: &str,
    request: &ScalingRequest,
    locale: Locale,
) -> Result<CocktailCard, CoctelError> {
    let recipe = store.get(name)?;
    let scaled = scale(recipe, request)?;
    let mut stats = ClassificationStats::default();
    let ingredients = format_scaled(
        &recipe.name,
        &scaled,
        request.unit,
        classifier,
        locale,
        &mut stats,
    );

    let resource = store.resource(&recipe.name).filter(|r| !r.is_empty()).cloned();
    // The narrative block only shows when there is no music link.
    let narrative = resource
        .as_ref()
        .filter(|r| r.music_links.is_empty())
        .and_then(Resource::narrative_section);

    Ok(CocktailCard {
        name: recipe.name.clone(),
        request: *request,
        scale_factor: scaled.factor,
        target_volume_ml: scaled.target_volume_ml,
        quantity_summary: quantity_summary(&request.quantity, scaled.target_volume_ml, locale),
        syrups: resolve_syrups(&scaled, classifier, store)
            .into_iter()
            .cloned()
            .collect(),
        ingredients,
        ice: IcePolicy::for_recipe(recipe),
        technique: resolve_technique(recipe, store).cloned(),
        glass: GlassInfo::for_recipe(recipe),
        garnishes: resolve_garnishes(&recipe.name, store),
        resource,
        narrative,
    })
}
