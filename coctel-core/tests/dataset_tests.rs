//! Tests against the bundled dataset in `data/`.

use coctel_core::card::build_card;
use coctel_core::metadata::IcePolicy;
use coctel_core::selection::{candidates, Filters, Session};
use coctel_core::{
    scale, Classifier, DisplayCategory, DisplayUnit, Locale, RecipeStore, ScalingRequest,
    SelectionError,
};
use std::path::Path;

fn load_store() -> RecipeStore {
    // coctel-core/tests/dataset_tests.rs -> up to the workspace root
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("data");
    RecipeStore::load_dir(&data_dir).expect("bundled dataset should load")
}

#[test]
fn test_dataset_loads() {
    let store = load_store();
    assert_eq!(store.len(), 10);
    assert_eq!(store.names()[0], "Bloody Mary");
    assert!(store.is_base_spirit("Ron"));
    assert!(!store.is_base_spirit("Jugo de Limón"));
}

#[test]
fn test_every_recipe_has_positive_base_volume() {
    let store = load_store();
    for recipe in store.recipes() {
        let base = recipe.base_volume_ml.unwrap_or(0.0);
        assert!(base > 0.0, "{} has base volume {:?}", recipe.name, recipe.base_volume_ml);
    }
}

#[test]
fn test_servings_total_equals_multiple_of_base_volume() {
    let store = load_store();
    for recipe in store.recipes() {
        for n in [1, 2, 7] {
            let scaled = scale(recipe, &ScalingRequest::servings(n, DisplayUnit::Ml)).unwrap();
            let expected = f64::from(n) * recipe.base_volume_ml.unwrap();
            assert!(
                (scaled.target_volume_ml - expected).abs() < 1e-9,
                "{} x{}",
                recipe.name,
                n
            );
        }
    }
}

/// Every ingredient column either has a classifier entry or is measured by
/// volume, and each name resolves to a single category.
#[test]
fn test_classifier_consistent_with_dataset() {
    let store = load_store();
    let classifier = Classifier::builtin();

    for name in store.ingredient_names() {
        let category = classifier.classify(name).category;
        // The same name differently cased or padded must agree.
        assert_eq!(classifier.classify(&name.to_uppercase()).category, category);
        assert_eq!(classifier.classify(&format!(" {name} ")).category, category);
    }

    // Presence-only ingredients are authored as the sentinel 1.
    for recipe in store.recipes() {
        for (name, amount) in recipe.used_ingredients() {
            if classifier.classify(name).category.is_presence_only() {
                assert_eq!(amount, 1.0, "{}: {}", recipe.name, name);
            }
        }
    }
}

#[test]
fn test_bloody_mary_card() {
    let store = load_store();
    let card = build_card(
        &store,
        Classifier::builtin(),
        "Bloody Mary",
        &ScalingRequest::servings(1, DisplayUnit::Ml),
        Locale::En,
    )
    .unwrap();

    let lines: Vec<&str> = card.ingredients.iter().map(|i| i.line.as_str()).collect();
    assert_eq!(
        lines,
        vec![
            "45 ml of Vodka",
            "15 ml of Jugo de Limón",
            "90 ml of Jugo de Tomate",
            "A few drops of Salsa Inglesa",
            "A few drops of Salsa Tabasco",
            "Add sal de apio to taste",
            "Add pimienta to taste",
        ]
    );
    assert_eq!(card.ice, IcePolicy::WithIce);
    assert_eq!(card.garnishes, vec!["Rodaja de Limón", "Rama de Apio"]);
    assert_eq!(card.technique.unwrap().name.as_deref(), Some("Rodado"));
}

#[test]
fn test_daiquiri_card_resources() {
    let store = load_store();
    let card = build_card(
        &store,
        Classifier::builtin(),
        "Daiquiri",
        &ScalingRequest::target_volume_ml(1000.0, DisplayUnit::Ml),
        Locale::Es,
    )
    .unwrap();

    assert_eq!(card.syrups.len(), 1);
    assert_eq!(card.syrups[0].name, "Jarabe Simple");
    assert_eq!(card.ice, IcePolicy::WithoutIce);
    let resource = card.resource.unwrap();
    assert_eq!(resource.music_links.len(), 1);
    assert_eq!(resource.image.unwrap().file, "daiquiri.jpg");
    // Music link present, so no narrative block.
    assert!(card.narrative.is_none());
}

#[test]
fn test_negroni_narrative_and_other_link() {
    let store = load_store();
    let card = build_card(
        &store,
        Classifier::builtin(),
        "Negroni",
        &ScalingRequest::servings(1, DisplayUnit::Oz),
        Locale::En,
    )
    .unwrap();

    let narrative = card.narrative.unwrap();
    assert_eq!(narrative.title, "Un poco de historia");
    assert!(narrative.body.starts_with("Se atribuye"));
    assert!(card.resource.unwrap().other_link.is_some());
    assert_eq!(card.ingredients[0].line, "1 oz of Gin");
}

#[test]
fn test_pisco_sour_without_garnish_row() {
    let store = load_store();
    let card = build_card(
        &store,
        Classifier::builtin(),
        "Pisco Sour",
        &ScalingRequest::servings(2, DisplayUnit::Ml),
        Locale::En,
    )
    .unwrap();
    assert!(card.garnishes.is_empty());
    assert_eq!(card.ice, IcePolicy::WithoutIce);
    assert!(card
        .ingredients
        .iter()
        .any(|i| i.category == DisplayCategory::Units && i.line == "2 claras de huevo"));
}

#[test]
fn test_selection_over_dataset() {
    let store = load_store();
    let rum = Filters {
        base_spirit: Some("Ron".to_string()),
        keyword: None,
    };
    let names: Vec<&str> = candidates(&store, &rum)
        .unwrap()
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["Daiquiri", "Mojito", "Piña Colada"]);

    let mut session = Session::default();
    session.select("Mojito");
    assert_eq!(session.resolve(&store, &rum).unwrap().name, "Mojito");

    let nothing = Filters {
        base_spirit: Some("Ron".to_string()),
        keyword: Some("tomate".to_string()),
    };
    assert_eq!(
        session.resolve(&store, &nothing).unwrap_err(),
        SelectionError::NoResults
    );
}
