//! Explain a surface spelling.
//!
//! ```bash
//! wydra resolve w-div-3
//! wydra resolve wydra-card
//! ```

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use strsim::levenshtein;

use crate::config::EngineConfig;
use crate::registry::{HandlerKind, Registry};

/// Maximum edit distance for a suggestion, as a percentage of the input length.
const SIMILARITY_THRESHOLD_PERCENT: usize = 40;

/// Suggestions shown for an unknown spelling.
const MAX_SUGGESTIONS: usize = 3;

#[derive(Args)]
pub struct ResolveCommand {
    /// Marker name as written in content, e.g. `w-div-2`
    surface: String,
}

impl ResolveCommand {
    /// Print what the spelling resolves to.
    ///
    /// # Errors
    ///
    /// Fails for unknown spellings, listing close matches.
    pub fn execute(self, config: &EngineConfig) -> Result<()> {
        let registry = Registry::from_config(config)?;
        print!("{}", describe(&registry, &self.surface)?);
        Ok(())
    }
}

fn describe(registry: &Registry, surface: &str) -> Result<String> {
    let Some(definition) = registry.lookup(surface) else {
        let suggestions = suggest(registry, surface);
        if suggestions.is_empty() {
            bail!("Unknown marker '{surface}'. Run `wydra list` to see registered markers");
        }
        bail!("Unknown marker '{surface}'. Did you mean: {}?", suggestions.join(", "));
    };

    let mut out = format!("{:<10} {}\n", "Code:".bold(), definition.code);
    out.push_str(&format!("{:<10} {}\n", "Kind:".bold(), definition.kind));

    match definition.kind {
        HandlerKind::Template => {
            if let Some(path) = registry.template_for(&definition.code) {
                out.push_str(&format!("{:<10} {}\n", "Template:".bold(), path.display()));
            }
        }
        HandlerKind::Element => {
            if let Some(tag) = registry.element_tag_for(surface) {
                out.push_str(&format!("{:<10} <{}>\n", "Tag:".bold(), tag));
            }
        }
        HandlerKind::DataDefine => {}
    }

    if let Some(depth) = definition.max_depth {
        out.push_str(&format!("{:<10} 0..={}\n", "Depth:".bold(), depth));
    }
    out.push_str(&format!(
        "{:<10} {}\n",
        "Aliases:".bold(),
        registry.aliases_of(&definition.code).join(", ")
    ));
    Ok(out)
}

/// Closest registered spellings by Levenshtein distance.
fn suggest(registry: &Registry, surface: &str) -> Vec<String> {
    let limit = (surface.len() * SIMILARITY_THRESHOLD_PERCENT / 100).max(1);
    let mut scored: Vec<(usize, &str)> = registry
        .surface_names()
        .map(|name| (levenshtein(surface, name), name))
        .filter(|(distance, _)| *distance <= limit)
        .collect();

    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored.into_iter().take(MAX_SUGGESTIONS).map(|(_, name)| name.to_string()).collect()
}
