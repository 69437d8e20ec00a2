//! Show the marker registry.
//!
//! Template-backed markers come first, then the built-in ones, each with the
//! surface spellings that reach it.
//!
//! ```bash
//! wydra list
//! wydra list --format json
//! ```

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;

use crate::config::EngineConfig;
use crate::registry::{CatalogEntry, Registry};

/// Aliases shown per row in table output before eliding the rest.
const SHOWN_ALIASES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl ListCommand {
    /// Print the catalog.
    ///
    /// # Errors
    ///
    /// Fails if the template directories cannot be scanned.
    pub fn execute(self, config: &EngineConfig) -> Result<()> {
        let registry = Registry::from_config(config)?;
        let catalog = registry.catalog();

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
            OutputFormat::Table => print!("{}", format_table(&catalog, registry.alias_count())),
        }

        Ok(())
    }
}

fn format_table(catalog: &[CatalogEntry], alias_count: usize) -> String {
    if catalog.is_empty() {
        return "No markers registered\n".to_string();
    }

    let mut out = format!(
        "{:<16} {:<12} {:<40} {}\n",
        "Code".bold().cyan(),
        "Kind".bold().cyan(),
        "Aliases".bold().cyan(),
        "Source".bold().cyan()
    );
    out.push_str(&format!("{}\n", "-".repeat(92).bright_black()));

    for entry in catalog {
        let mut aliases = entry.aliases.iter().take(SHOWN_ALIASES).cloned().collect::<Vec<_>>().join(", ");
        if entry.aliases.len() > SHOWN_ALIASES {
            aliases.push_str(&format!(" (+{})", entry.aliases.len() - SHOWN_ALIASES));
        }
        let source = entry
            .source
            .as_ref()
            .map_or_else(|| "built-in".to_string(), |p| p.display().to_string());

        out.push_str(&format!(
            "{:<16} {:<12} {:<40} {}\n",
            entry.code.bright_white(),
            entry.kind.as_str().yellow(),
            aliases,
            source.bright_black()
        ));
    }

    out.push_str(&format!(
        "\n{}: {} markers, {} aliases\n",
        "Total".bold(),
        catalog.len(),
        alias_count
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TemplateFixture, TestSite};

    #[test]
    fn test_table_lists_every_marker() {
        colored::control::set_override(false);
        let site = TestSite::new().unwrap();
        site.fixture(&TemplateFixture::card()).unwrap();
        let registry = Registry::from_config(&site.config()).unwrap();

        let table = format_table(&registry.catalog(), registry.alias_count());
        let rows: Vec<&str> = table.lines().collect();
        assert!(rows[0].starts_with("Code"));
        assert!(rows[2].starts_with("card"));
        assert!(rows[2].contains("template"));
        assert!(rows.iter().any(|r| r.starts_with("div") && r.contains("(+")));
        assert!(rows.iter().any(|r| r.starts_with("define") && r.contains("built-in")));
        assert!(table.contains("Total: 7 markers"));
    }

    #[test]
    fn test_empty_catalog() {
        assert_eq!(format_table(&[], 0), "No markers registered\n");
    }
}
