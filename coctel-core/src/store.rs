//! Recipe store backed by a directory of CSV tables.
//!
//! The dataset is one table per file, as exported from the recipe workbook:
//!
//! - `recetas.csv` (required): one row per cocktail, metadata columns plus
//!   one column per ingredient
//! - `complementos.csv`: garnish flags per cocktail
//! - `tecnicas.csv`: technique code -> name and description
//! - `jarabes.csv`: syrup -> preparation
//! - `recursos.csv`: notes, links and image per cocktail
//! - `destilados.csv`: manifest of base-spirit ingredients
//!
//! The store is loaded once and read-only afterwards.

use csv::StringRecord;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{LookupError, StoreError};
use crate::metadata::{ImageRef, Link, Resource, Syrup, Technique};
use crate::types::{Recipe, RecipeIngredient};

pub const RECIPES_FILE: &str = "recetas.csv";
pub const GARNISHES_FILE: &str = "complementos.csv";
pub const TECHNIQUES_FILE: &str = "tecnicas.csv";
pub const SYRUPS_FILE: &str = "jarabes.csv";
pub const RESOURCES_FILE: &str = "recursos.csv";
pub const BASE_SPIRITS_FILE: &str = "destilados.csv";

const COL_COCKTAIL: &str = "coctel";
const COL_GLASS: &str = "vaso";
const COL_TECHNIQUE: &str = "tecnica";
const COL_GLASS_CAPACITY: &str = "capacidad_vaso_sin_hielo";
const COL_ICE_AMOUNT: &str = "cantidad_hielo";
const COL_ICE: &str = "hielo";
const COL_GLASS_CAPACITY_WITH_ICE: &str = "capacidad_vaso_con_hielo";
const COL_VOLUME: &str = "volumen";

/// Recipe columns that are not ingredients.
const RECIPE_METADATA_COLUMNS: &[&str] = &[
    COL_COCKTAIL,
    COL_GLASS,
    COL_TECHNIQUE,
    COL_GLASS_CAPACITY,
    COL_ICE_AMOUNT,
    COL_ICE,
    COL_GLASS_CAPACITY_WITH_ICE,
    COL_VOLUME,
];

// =============================================================================
// Table reading
// =============================================================================

/// A parsed CSV table with header lookup.
struct Table {
    path: String,
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl Table {
    fn read<R: Read>(reader: R, path: &str) -> Result<Self, StoreError> {
        let csv_err = |source| StoreError::Csv {
            path: path.to_string(),
            source,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(str::to_string)
            .collect();
        let rows = rdr
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(csv_err)?;
        Ok(Self {
            path: path.to_string(),
            headers,
            rows,
        })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, name: &str) -> Result<usize, StoreError> {
        self.column(name).ok_or_else(|| StoreError::MissingColumn {
            path: self.path.clone(),
            column: name.to_string(),
        })
    }
}

/// Non-empty text cell.
fn text(row: &StringRecord, idx: Option<usize>) -> Option<String> {
    let value = row.get(idx?)?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Numeric cell; empty is `None`. A decimal comma is accepted.
fn number(
    row: &StringRecord,
    idx: Option<usize>,
    row_name: &str,
    column: &str,
) -> Result<Option<f64>, StoreError> {
    let Some(value) = text(row, idx) else {
        return Ok(None);
    };
    value
        .replace(',', ".")
        .parse::<f64>()
        .map(Some)
        .map_err(|_| StoreError::InvalidNumber {
            row: row_name.to_string(),
            column: column.to_string(),
            value,
        })
}

fn open(dir: &Path, file: &str) -> Result<Option<File>, StoreError> {
    let path = dir.join(file);
    if !path.exists() {
        tracing::debug!("{} not found, using an empty table", path.display());
        return Ok(None);
    }
    File::open(&path).map(Some).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })
}

// =============================================================================
// Store
// =============================================================================

/// In-memory, immutable recipe dataset.
#[derive(Debug, Clone, Default)]
pub struct RecipeStore {
    /// Sorted by name.
    recipes: Vec<Recipe>,
    index: HashMap<String, usize>,
    /// Cocktail -> (garnish, flag) in column order
    garnishes: HashMap<String, Vec<(String, Option<f64>)>>,
    techniques: HashMap<String, Technique>,
    syrups: HashMap<String, Syrup>,
    resources: HashMap<String, Resource>,
    base_spirits: Vec<String>,
}

impl RecipeStore {
    /// Load every table found in `dir`. Only the recipe table is required.
    pub fn load_dir(dir: &Path) -> Result<Self, StoreError> {
        let recipes_path = dir.join(RECIPES_FILE);
        let recipes = File::open(&recipes_path).map_err(|source| StoreError::Io {
            path: recipes_path.display().to_string(),
            source,
        })?;
        let mut store = Self::from_recipes(parse_recipes(recipes, RECIPES_FILE)?)?;

        if let Some(file) = open(dir, GARNISHES_FILE)? {
            store.garnishes = parse_garnishes(file, GARNISHES_FILE)?;
        }
        if let Some(file) = open(dir, TECHNIQUES_FILE)? {
            store.techniques = parse_techniques(file, TECHNIQUES_FILE)?;
        }
        if let Some(file) = open(dir, SYRUPS_FILE)? {
            store.syrups = parse_syrups(file, SYRUPS_FILE)?;
        }
        if let Some(file) = open(dir, RESOURCES_FILE)? {
            store.resources = parse_resources(file, RESOURCES_FILE)?;
        }
        if let Some(file) = open(dir, BASE_SPIRITS_FILE)? {
            store.base_spirits = parse_base_spirits(file, BASE_SPIRITS_FILE)?;
        }

        tracing::info!(
            "Loaded {} recipes, {} techniques, {} syrups, {} resources from {}",
            store.recipes.len(),
            store.techniques.len(),
            store.syrups.len(),
            store.resources.len(),
            dir.display()
        );
        Ok(store)
    }

    /// Build a store from recipes alone; side tables start empty.
    pub fn from_recipes(mut recipes: Vec<Recipe>) -> Result<Self, StoreError> {
        recipes.sort_by(|a, b| a.name.cmp(&b.name));
        let mut index = HashMap::new();
        for (i, recipe) in recipes.iter().enumerate() {
            if index.insert(recipe.name.clone(), i).is_some() {
                return Err(StoreError::DuplicateRecipe(recipe.name.clone()));
            }
        }
        Ok(Self {
            recipes,
            index,
            ..Default::default()
        })
    }

    /// Parse a recipe table from CSV text.
    pub fn from_recipes_csv(csv: &str) -> Result<Self, StoreError> {
        Self::from_recipes(parse_recipes(csv.as_bytes(), RECIPES_FILE)?)
    }

    pub fn with_garnishes_csv(mut self, csv: &str) -> Result<Self, StoreError> {
        self.garnishes = parse_garnishes(csv.as_bytes(), GARNISHES_FILE)?;
        Ok(self)
    }

    pub fn with_techniques_csv(mut self, csv: &str) -> Result<Self, StoreError> {
        self.techniques = parse_techniques(csv.as_bytes(), TECHNIQUES_FILE)?;
        Ok(self)
    }

    pub fn with_syrups_csv(mut self, csv: &str) -> Result<Self, StoreError> {
        self.syrups = parse_syrups(csv.as_bytes(), SYRUPS_FILE)?;
        Ok(self)
    }

    pub fn with_resources_csv(mut self, csv: &str) -> Result<Self, StoreError> {
        self.resources = parse_resources(csv.as_bytes(), RESOURCES_FILE)?;
        Ok(self)
    }

    pub fn with_base_spirits(mut self, spirits: Vec<String>) -> Self {
        self.base_spirits = spirits;
        self
    }

    /// Look up a cocktail by exact name, then case-insensitively.
    pub fn get(&self, name: &str) -> Result<&Recipe, LookupError> {
        if let Some(&i) = self.index.get(name) {
            return Ok(&self.recipes[i]);
        }
        let wanted = name.trim().to_lowercase();
        self.recipes
            .iter()
            .find(|r| r.name.to_lowercase() == wanted)
            .ok_or_else(|| LookupError(name.to_string()))
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Cocktail names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.recipes.iter().map(|r| r.name.as_str()).collect()
    }

    /// Every ingredient column seen in the recipe table, in first-seen order.
    pub fn ingredient_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.recipes
            .iter()
            .flat_map(|r| r.ingredients.iter())
            .map(|i| i.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    pub fn technique(&self, code: &str) -> Option<&Technique> {
        self.techniques.get(code)
    }

    pub fn garnish_flags(&self, cocktail: &str) -> &[(String, Option<f64>)] {
        self.garnishes
            .get(cocktail)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn syrup(&self, name: &str) -> Option<&Syrup> {
        self.syrups.get(name)
    }

    pub fn resource(&self, cocktail: &str) -> Option<&Resource> {
        self.resources.get(cocktail)
    }

    pub fn base_spirits(&self) -> &[String] {
        &self.base_spirits
    }

    /// Manifest spirit matching `name` case-insensitively, as written in the
    /// manifest.
    pub fn base_spirit(&self, name: &str) -> Option<&str> {
        let wanted = name.trim().to_lowercase();
        self.base_spirits
            .iter()
            .find(|s| s.to_lowercase() == wanted)
            .map(String::as_str)
    }

    pub fn is_base_spirit(&self, ingredient: &str) -> bool {
        self.base_spirit(ingredient).is_some()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

// =============================================================================
// Table parsers
// =============================================================================

fn parse_recipes<R: Read>(reader: R, path: &str) -> Result<Vec<Recipe>, StoreError> {
    let table = Table::read(reader, path)?;
    let name_col = table.require(COL_COCKTAIL)?;
    let volume_col = table.require(COL_VOLUME)?;
    let glass_col = table.column(COL_GLASS);
    let technique_col = table.column(COL_TECHNIQUE);
    let capacity_col = table.column(COL_GLASS_CAPACITY);
    let ice_amount_col = table.column(COL_ICE_AMOUNT);
    let ice_col = table.column(COL_ICE);
    let capacity_ice_col = table.column(COL_GLASS_CAPACITY_WITH_ICE);

    let ingredient_cols: Vec<(usize, &str)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_empty() && !RECIPE_METADATA_COLUMNS.contains(&h.as_str()))
        .map(|(i, h)| (i, h.as_str()))
        .collect();

    let mut recipes = Vec::new();
    for row in &table.rows {
        let Some(name) = text(row, Some(name_col)) else {
            continue;
        };

        let mut ingredients = Vec::with_capacity(ingredient_cols.len());
        for &(col, ingredient) in &ingredient_cols {
            let amount = number(row, Some(col), &name, ingredient)?;
            if let Some(value) = amount.filter(|v| *v < 0.0) {
                return Err(StoreError::NegativeQuantity {
                    row: name,
                    column: ingredient.to_string(),
                    value,
                });
            }
            ingredients.push(RecipeIngredient {
                name: ingredient.to_string(),
                amount,
            });
        }

        recipes.push(Recipe {
            base_volume_ml: number(row, Some(volume_col), &name, COL_VOLUME)?,
            glass: text(row, glass_col),
            technique_code: text(row, technique_col),
            ice_flag: text(row, ice_col),
            ice_amount: number(row, ice_amount_col, &name, COL_ICE_AMOUNT)?,
            glass_capacity_ml: number(row, capacity_col, &name, COL_GLASS_CAPACITY)?,
            glass_capacity_with_ice_ml: number(
                row,
                capacity_ice_col,
                &name,
                COL_GLASS_CAPACITY_WITH_ICE,
            )?,
            ingredients,
            name,
        });
    }
    Ok(recipes)
}

type GarnishFlags = HashMap<String, Vec<(String, Option<f64>)>>;

fn parse_garnishes<R: Read>(reader: R, path: &str) -> Result<GarnishFlags, StoreError> {
    let table = Table::read(reader, path)?;
    let name_col = table.require(COL_COCKTAIL)?;

    let mut garnishes = HashMap::new();
    for row in &table.rows {
        let Some(name) = text(row, Some(name_col)) else {
            continue;
        };
        let mut flags = Vec::new();
        for (col, garnish) in table.headers.iter().enumerate() {
            if col == name_col || garnish.is_empty() {
                continue;
            }
            // Anything that is not a number is simply "not a garnish".
            let flag = number(row, Some(col), &name, garnish).unwrap_or_else(|e| {
                tracing::warn!("{}: {}", path, e);
                None
            });
            flags.push((garnish.clone(), flag));
        }
        garnishes.insert(name, flags);
    }
    Ok(garnishes)
}

fn parse_techniques<R: Read>(
    reader: R,
    path: &str,
) -> Result<HashMap<String, Technique>, StoreError> {
    let table = Table::read(reader, path)?;
    let code_col = table.require("tecnica")?;
    let name_col = table.column("nombre_español");
    let description_col = table.column("descripción");

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            let code = text(row, Some(code_col))?;
            let technique = Technique {
                code: code.clone(),
                name: text(row, name_col),
                description: text(row, description_col),
            };
            Some((code, technique))
        })
        .collect())
}

fn parse_syrups<R: Read>(reader: R, path: &str) -> Result<HashMap<String, Syrup>, StoreError> {
    let table = Table::read(reader, path)?;
    let name_col = table.require("jarabe")?;
    let preparation_col = table.require("preparación")?;

    Ok(table
        .rows
        .iter()
        .filter_map(|row| {
            let name = text(row, Some(name_col))?;
            let preparation = text(row, Some(preparation_col))?;
            Some((name.clone(), Syrup { name, preparation }))
        })
        .collect())
}

fn parse_resources<R: Read>(
    reader: R,
    path: &str,
) -> Result<HashMap<String, Resource>, StoreError> {
    let table = Table::read(reader, path)?;
    let name_col = table.require(COL_COCKTAIL)?;

    let link = |row: &StringRecord, text_col: &str, url_col: &str| -> Option<Link> {
        Some(Link {
            text: text(row, table.column(text_col))?,
            url: text(row, table.column(url_col))?,
        })
    };

    let mut resources = HashMap::new();
    for row in &table.rows {
        let Some(name) = text(row, Some(name_col)) else {
            continue;
        };
        let music_links = [("texto_enlace", "url"), ("texto_enlace_2", "url_2")]
            .iter()
            .filter_map(|&(t, u)| link(row, t, u))
            .collect();
        let image = text(row, table.column("imagen")).map(|file| ImageRef {
            file,
            credit: text(row, table.column("credito_imagen")),
            caption: text(row, table.column("pie_imagen")),
        });
        let resource = Resource {
            observations: text(row, table.column("observaciones")),
            narrative: text(row, table.column("recurso")),
            music_links,
            other_link: link(row, "texto_otro_enlace", "url_otro_enlace"),
            image,
        };
        resources.insert(name, resource);
    }
    Ok(resources)
}

fn parse_base_spirits<R: Read>(reader: R, path: &str) -> Result<Vec<String>, StoreError> {
    let table = Table::read(reader, path)?;
    let col = table.require("ingrediente")?;
    Ok(table
        .rows
        .iter()
        .filter_map(|row| text(row, Some(col)))
        .collect())
}
