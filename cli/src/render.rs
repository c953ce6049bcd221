//! Plain-text rendering of a cocktail card.

use coctel_core::CocktailCard;
use std::fmt::Write;

pub fn render_card(card: &CocktailCard) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_card(&mut out, card);
    out
}

fn write_card(out: &mut String, card: &CocktailCard) -> std::fmt::Result {
    writeln!(out, "{}", card.name)?;
    writeln!(out, "{}", "=".repeat(card.name.chars().count()))?;
    writeln!(out, "{}", card.quantity_summary)?;

    if let Some(image) = card.resource.as_ref().and_then(|r| r.image.as_ref()) {
        write!(out, "Image: {}", image.file)?;
        if let Some(credit) = &image.credit {
            write!(out, " ({})", credit)?;
        }
        writeln!(out)?;
        if let Some(caption) = &image.caption {
            writeln!(out, "  {}", caption)?;
        }
    } else {
        writeln!(out, "No image available for this cocktail.")?;
    }

    writeln!(out, "\nIngredients")?;
    for ingredient in &card.ingredients {
        writeln!(out, "- {}", ingredient.line)?;
    }

    for syrup in &card.syrups {
        writeln!(out, "\n{}", syrup.name)?;
        writeln!(out, "{}", syrup.preparation)?;
    }

    writeln!(out, "\nIce")?;
    writeln!(out, "{}", card.ice.description())?;

    if let Some(technique) = &card.technique {
        writeln!(out, "\nTechnique")?;
        writeln!(out, "{}", technique.display_line())?;
    }

    if let Some(glass) = &card.glass {
        writeln!(out, "\nGlassware")?;
        writeln!(out, "{}", glass.display_line())?;
    }

    if !card.garnishes.is_empty() {
        writeln!(out, "\nGarnish")?;
        writeln!(out, "Serve with: {}", card.garnishes.join(", "))?;
    }

    if let Some(resource) = &card.resource {
        if let Some(observations) = &resource.observations {
            writeln!(out, "\nNotes")?;
            writeln!(out, "{}", observations)?;
        }
        if !resource.music_links.is_empty() {
            writeln!(out, "\nSoundtrack")?;
            for link in &resource.music_links {
                writeln!(out, "{} <{}>", link.text, link.url)?;
            }
        }
        if let Some(link) = &resource.other_link {
            writeln!(out, "\n{} <{}>", link.text, link.url)?;
        }
    }

    if let Some(narrative) = &card.narrative {
        writeln!(out, "\n{}", narrative.title)?;
        if !narrative.body.is_empty() {
            writeln!(out, "{}", narrative.body)?;
        }
    }

    Ok(())
}
