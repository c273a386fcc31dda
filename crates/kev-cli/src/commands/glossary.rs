use kev_core::glossary::GLOSSARY;
use serde::Serialize;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::{output, table::Table, table_options};

#[derive(Debug, Serialize)]
struct Entry {
    term: &'static str,
    definition: &'static str,
}

/// Handle `kevops glossary`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    match flags.format {
        OutputFormat::Table => {
            let mut table = Table::new(&["Term", "Definition"]);
            for (term, definition) in GLOSSARY {
                table.push(vec![(*term).to_string(), (*definition).to_string()]);
            }
            println!("{}", table.render(table_options()));
            Ok(())
        }
        format => {
            let entries: Vec<Entry> = GLOSSARY
                .iter()
                .map(|&(term, definition)| Entry { term, definition })
                .collect();
            output(&entries, format)
        }
    }
}
