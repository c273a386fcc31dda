use kev_core::WorkItem;
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

use table::{Table, TableOptions};

#[must_use]
pub fn table_options() -> TableOptions {
    let prefs = ui::prefs();
    TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_value_table(value, table_options()),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Print work items. Tables get fixed columns; other formats serialize the
/// records as-is.
pub fn output_items(items: &[WorkItem], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Table {
        println!("{}", items_table(items).render(table_options()));
        return Ok(());
    }
    output(&items, format)
}

#[must_use]
pub fn items_table(items: &[WorkItem]) -> Table {
    let mut table = Table::new(&["ID", "Type", "State", "Assigned To", "Area Path", "Title"]);
    for item in items {
        table.push(vec![
            item.id.to_string(),
            item.work_item_type.clone(),
            item.state.clone(),
            item.assignee_label().to_string(),
            item.area_label().to_string(),
            item.title.clone(),
        ]);
    }
    table
}

/// Generic fallback: arrays of objects become one row per element with the
/// union of keys as columns; an object becomes key/value rows.
fn render_value_table<T: Serialize>(value: &T, options: TableOptions) -> anyhow::Result<String> {
    let table = match serde_json::to_value(value)? {
        Value::Array(items) if items.is_empty() => return Ok(String::from("(no rows)")),
        Value::Array(items) if items.iter().all(Value::is_object) => {
            let mut headers = Vec::<String>::new();
            for key in items.iter().filter_map(Value::as_object).flat_map(|m| m.keys()) {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
            let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
            let mut table = Table::new(&header_refs);
            for map in items.iter().filter_map(Value::as_object) {
                table.push(
                    headers
                        .iter()
                        .map(|h| map.get(h).map_or_else(|| String::from("-"), cell))
                        .collect(),
                );
            }
            table
        }
        Value::Array(items) => {
            let mut table = Table::new(&["value"]);
            for item in &items {
                table.push(vec![cell(item)]);
            }
            table
        }
        Value::Object(map) => {
            let mut table = Table::new(&["key", "value"]);
            for (key, value) in &map {
                table.push(vec![key.clone(), cell(value)]);
            }
            table
        }
        scalar => {
            let mut table = Table::new(&["value"]);
            table.push(vec![cell(&scalar)]);
            table
        }
    };
    Ok(table.render(options))
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(v) => v.clone(),
        other => other.to_string(),
    }
}
