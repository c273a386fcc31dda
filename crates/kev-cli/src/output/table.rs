//! Plain-text aligned tables with optional state coloring.

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_COLUMN: usize = 4;
const SEPARATOR: &str = "  ";

/// A table under construction.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render with a header line, a divider, and one line per row.
    ///
    /// Numeric-looking cells are right-aligned. Cells that would overflow
    /// `max_width` are truncated with an ellipsis, widest column first.
    #[must_use]
    pub fn render(&self, options: TableOptions) -> String {
        let mut widths = self.natural_widths();
        shrink_to_fit(&mut widths, &self.headers, options.max_width);

        let header_line = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(header, width)| pad(&truncate(header, *width), *width, false, 0))
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        let divider = "-".repeat(header_line.chars().count());

        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(header_line);
        lines.push(divider);
        for row in &self.rows {
            let line = widths
                .iter()
                .enumerate()
                .map(|(index, width)| {
                    let cell = truncate(row.get(index).map_or("-", String::as_str), *width);
                    let numeric = is_numeric(&cell);
                    if options.color
                        && let Some(code) = state_color(&cell)
                    {
                        let visible = cell.chars().count();
                        let colored = format!("\u{1b}[{code}m{cell}\u{1b}[0m");
                        return pad(&colored, *width, numeric, colored.len() - visible);
                    }
                    pad(&cell, *width, numeric, 0)
                })
                .collect::<Vec<_>>()
                .join(SEPARATOR);
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    fn natural_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(header.chars().count())
                    .max(MIN_COLUMN)
            })
            .collect()
    }
}

fn shrink_to_fit(widths: &mut [usize], headers: &[String], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let separators = widths.len().saturating_sub(1) * SEPARATOR.len();
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].chars().count().max(MIN_COLUMN))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);
        let Some(idx) = widest else {
            break;
        };
        widths[idx] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '.' | ',' | '%'))
}

/// `escape_len` is the number of invisible bytes (ANSI codes) in `value`.
fn pad(value: &str, width: usize, right_align: bool, escape_len: usize) -> String {
    let visible = value.chars().count().saturating_sub(escape_len);
    let fill = " ".repeat(width.saturating_sub(visible));
    if right_align {
        format!("{fill}{value}")
    } else {
        format!("{value}{fill}")
    }
}

/// ANSI color for well-known work item states.
fn state_color(value: &str) -> Option<&'static str> {
    match value.to_ascii_lowercase().as_str() {
        "closed" | "resolved" | "done" => Some("32"),
        "active" | "in progress" | "committed" => Some("33"),
        "new" | "proposed" | "to do" => Some("36"),
        "removed" | "cancelled" => Some("31"),
        _ => None,
    }
}
