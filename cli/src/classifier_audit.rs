//! Audit the dataset's ingredient columns against the classifier.

use anyhow::{Context, Result};
use coctel_core::{
    scale_and_format_with_stats, ClassificationStats, Classifier, DisplayUnit, Locale,
    RecipeStore, ScaleError, ScalingRequest,
};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
struct AuditRow {
    ingredient: String,
    category: &'static str,
    /// "classified" when the classifier has an entry, "default" otherwise.
    status: &'static str,
}

fn audit_rows(store: &RecipeStore, classifier: &Classifier) -> Vec<AuditRow> {
    let mut rows: Vec<AuditRow> = store
        .ingredient_names()
        .into_iter()
        .map(|name| {
            let known = classifier.lookup(name).is_some();
            AuditRow {
                ingredient: name.to_string(),
                category: classifier.classify(name).category.as_str(),
                status: if known { "classified" } else { "default" },
            }
        })
        .collect();
    rows.sort_by(|a, b| a.ingredient.cmp(&b.ingredient));
    rows
}

/// Format one serving of every recipe, collecting classifier coverage and
/// the recipes that cannot be scaled.
fn recipe_stats(
    store: &RecipeStore,
    classifier: &Classifier,
) -> (ClassificationStats, Vec<(String, ScaleError)>) {
    let request = ScalingRequest::servings(1, DisplayUnit::Ml);
    let mut stats = ClassificationStats::default();
    let mut failures = Vec::new();
    for recipe in store.recipes() {
        if let Err(e) =
            scale_and_format_with_stats(recipe, &request, classifier, Locale::En, &mut stats)
        {
            failures.push((recipe.name.clone(), e));
        }
    }
    (stats, failures)
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_csv<W: Write>(out: &mut W, rows: &[AuditRow]) -> io::Result<()> {
    writeln!(out, "ingredient,category,status")?;
    for row in rows {
        writeln!(out, "{},{},{}", escape(&row.ingredient), row.category, row.status)?;
    }
    Ok(())
}

/// Write the audit CSV (to `output`, or stdout) and print a summary to stderr.
pub fn audit(store: &RecipeStore, classifier: &Classifier, output: Option<&Path>) -> Result<()> {
    let rows = audit_rows(store, classifier);

    match output {
        Some(path) => {
            let mut file = fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(&mut file, &rows)?;
            eprintln!("Wrote {} ingredients to {}", rows.len(), path.display());
        }
        None => write_csv(&mut io::stdout().lock(), &rows)?,
    }

    let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
    for row in &rows {
        *by_category.entry(row.category).or_default() += 1;
    }
    eprintln!("\nCategories:");
    for (category, count) in by_category {
        eprintln!("  {}: {}", category, count);
    }

    let (stats, failures) = recipe_stats(store, classifier);
    eprintln!(
        "\nRecipe lines: {} classified, {} measured by volume by default",
        stats.classified, stats.defaulted
    );
    let mut defaulted: BTreeMap<&str, usize> = BTreeMap::new();
    for name in &stats.unclassified {
        *defaulted.entry(name.as_str()).or_default() += 1;
    }
    if !defaulted.is_empty() {
        eprintln!("\nNot in the classifier (measured by volume):");
        for (name, recipes) in defaulted {
            eprintln!("  {} ({} recipes)", name, recipes);
        }
    }
    if !failures.is_empty() {
        eprintln!("\nRecipes that cannot be scaled:");
        for (name, e) in &failures {
            eprintln!("  {}: {}", name, e);
        }
    }

    // Entries nobody uses are usually typos in either file.
    let used: Vec<String> = rows.iter().map(|r| r.ingredient.to_lowercase()).collect();
    let unused: Vec<&str> = classifier
        .entries()
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| !used.contains(&name.to_lowercase()))
        .collect();
    if !unused.is_empty() {
        eprintln!("\nClassifier entries not used by any recipe:");
        for name in unused {
            eprintln!("  {}", name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecipeStore {
        RecipeStore::from_recipes_csv(
            "coctel,volumen,Ron,Sal,Licor de Durazno\nPrueba,60,50,1,10\n",
        )
        .unwrap()
    }

    #[test]
    fn test_audit_rows() {
        let rows = audit_rows(&store(), Classifier::builtin());
        let summary: Vec<(&str, &str, &str)> = rows
            .iter()
            .map(|r| (r.ingredient.as_str(), r.category, r.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Licor de Durazno", "volume_convertible", "default"),
                ("Ron", "volume_convertible", "default"),
                ("Sal", "to_taste", "classified"),
            ]
        );
    }

    #[test]
    fn test_recipe_stats() {
        let store = RecipeStore::from_recipes_csv(
            "coctel,volumen,Ron,Sal\nPrueba,60,50,1\nOtra,45,45,\nRota,,30,\n",
        )
        .unwrap();
        let (stats, failures) = recipe_stats(&store, Classifier::builtin());

        // Otra and Prueba format; Rota has no base volume.
        assert_eq!(stats.classified, 1);
        assert_eq!(stats.defaulted, 2);
        assert_eq!(stats.unclassified, vec!["Ron".to_string(), "Ron".to_string()]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "Rota");
        assert!(matches!(failures[0].1, ScaleError::InvalidBaseVolume { .. }));
    }

    #[test]
    fn test_escape_carriage_return() {
        assert_eq!(escape("Ron\r"), "\"Ron\r\"");
        assert_eq!(escape("Ron"), "Ron");
    }

    #[test]
    fn test_write_csv_escapes_fields() {
        let rows = vec![AuditRow {
            ingredient: "Jugo de Limón, fresco".to_string(),
            category: "volume_convertible",
            status: "default",
        }];
        let mut out = Vec::new();
        write_csv(&mut out, &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ingredient,category,status\n\"Jugo de Limón, fresco\",volume_convertible,default\n"
        );
    }
}
