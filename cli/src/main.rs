mod classifier_audit;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use coctel_core::selection::{candidates, Filters, QuantityMode, TargetLiters, UiSelection};
use coctel_core::{
    build_card, Classifier, CoctelError, Config, DisplayUnit, Locale, RecipeStore, ScaleError,
    SelectionError,
};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "coctel")]
#[command(about = "Club de Licores: cocktail recipe browser", long_about = None)]
struct Cli {
    /// Dataset directory (overrides COCTEL_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Ml,
    Oz,
}

impl From<UnitArg> for DisplayUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Ml => DisplayUnit::Ml,
            UnitArg::Oz => DisplayUnit::Oz,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LocaleArg {
    En,
    Es,
}

impl From<LocaleArg> for Locale {
    fn from(locale: LocaleArg) -> Self {
        match locale {
            LocaleArg::En => Locale::En,
            LocaleArg::Es => Locale::Es,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List cocktails, optionally filtered
    List {
        /// Only cocktails using this base spirit
        #[arg(long)]
        spirit: Option<String>,
        /// Case-insensitive text to look for in name, glass, technique or ingredients
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Show a scaled recipe
    Show {
        /// Cocktail name
        name: String,
        /// Number of cocktails to make
        #[arg(
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..),
            conflicts_with = "liters"
        )]
        servings: u32,
        /// Total volume in liters (0.5 to 10, steps of 0.5); always shown in ml
        #[arg(long)]
        liters: Option<f64>,
        /// Display unit (overrides COCTEL_UNIT)
        #[arg(long, value_enum)]
        unit: Option<UnitArg>,
        /// Language of the ingredient lines (overrides COCTEL_LOCALE)
        #[arg(long, value_enum)]
        locale: Option<LocaleArg>,
        /// Print the card as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the base spirits used for filtering
    Spirits,
    /// Check every dataset ingredient against the classifier
    AuditClassifier {
        /// Write the audit as CSV to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_telemetry();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let store = RecipeStore::load_dir(&config.data_dir).with_context(|| {
        format!("Failed to load recipes from {}", config.data_dir.display())
    })?;
    let classifier = Classifier::builtin();

    match cli.command {
        Commands::List { spirit, keyword } => {
            let filters = Filters {
                base_spirit: spirit,
                keyword,
            };
            list(&store, &filters);
        }
        Commands::Show {
            name,
            servings,
            liters,
            unit,
            locale,
            json,
        } => {
            let ui = UiSelection {
                mode: if liters.is_some() {
                    QuantityMode::TargetVolume
                } else {
                    QuantityMode::Servings
                },
                servings,
                liters: liters
                    .map(TargetLiters::new)
                    .transpose()?
                    .unwrap_or_default(),
                unit: unit.map(DisplayUnit::from).unwrap_or(config.unit),
            };
            let locale = locale.map(Locale::from).unwrap_or(config.locale);
            show(&store, classifier, &name, &ui, locale, json)?;
        }
        Commands::Spirits => {
            for spirit in store.base_spirits() {
                println!("{}", spirit);
            }
        }
        Commands::AuditClassifier { output } => {
            classifier_audit::audit(&store, classifier, output.as_deref())?;
        }
    }

    Ok(())
}

fn list(store: &RecipeStore, filters: &Filters) {
    match candidates(store, filters) {
        Ok(recipes) => {
            for recipe in recipes {
                println!("{}", recipe.name);
            }
        }
        Err(e @ SelectionError::UnknownBaseSpirit(_)) => {
            println!("{}. Run `coctel spirits` to see them.", e)
        }
        Err(e) => println!("{}. Try different filters.", e),
    }
}

fn show(
    store: &RecipeStore,
    classifier: &Classifier,
    name: &str,
    ui: &UiSelection,
    locale: Locale,
    json: bool,
) -> Result<()> {
    let card = match build_card(store, classifier, name, &ui.to_request(), locale) {
        Ok(card) => card,
        Err(CoctelError::Lookup(e)) => {
            println!("{}. Run `coctel list` to see the available cocktails.", e);
            return Ok(());
        }
        Err(CoctelError::Scale(e @ ScaleError::InvalidBaseVolume { .. })) => {
            tracing::error!("{}", e);
            println!("Cannot compute quantities for {}.", name);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&card)?);
    } else {
        print!("{}", render::render_card(&card));
    }
    Ok(())
}
