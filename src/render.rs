//! Console presentation: tables, panels and number formatting.
//!
//! Everything here is pure and returns `String`s; the lessons decide when to print.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;

const NOT_AVAILABLE: &str = "N/A";

/// Abbreviates large numbers with a `K`/`M` suffix and one decimal.
///
/// Non-numeric values are shown as they are, so a missing counter stays readable.
pub fn format_number(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if f >= 1_000_000.0 => format!("{:.1}M", f / 1_000_000.0),
            Some(f) if f >= 1_000.0 => format!("{:.1}K", f / 1_000.0),
            _ => n.to_string(),
        },
        other => display(other),
    }
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

/// First `max` chars of `s`, with `...` appended when something was cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", cut(s, max))
    } else {
        s.to_string()
    }
}

/// First `max` chars of `s`.
pub fn cut(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Last `max` chars of `s`.
pub fn tail(s: &str, max: usize) -> String {
    let len = s.chars().count();
    s.chars().skip(len.saturating_sub(max)).collect()
}

/// Strings without quotes, `null` as `N/A`, anything else as JSON.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => NOT_AVAILABLE.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First of `keys` present in `item` with a non-null value.
pub fn field<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| item.get(*k))
        .find(|v| !v.is_null())
}

/// Like [`field`] but only string values.
pub fn str_field<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
    field(item, keys).and_then(Value::as_str)
}

/// Display string of the first present key, or `default`.
pub fn text_field(item: &Value, keys: &[&str], default: &str) -> String {
    field(item, keys).map(display).unwrap_or_else(|| default.to_string())
}

/// Integer counter of the first present key; non-integers count as zero.
pub fn int_field(item: &Value, keys: &[&str]) -> i64 {
    field(item, keys).and_then(Value::as_i64).unwrap_or(0)
}

/// `1,234` for integers, the raw value otherwise.
pub fn grouped_field(item: &Value, keys: &[&str]) -> String {
    match field(item, keys) {
        Some(v) => match v.as_i64() {
            Some(n) => group_thousands(n),
            None => display(v),
        },
        None => "0".to_string(),
    }
}

pub fn date(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn check(flag: bool) -> &'static str {
    if flag {
        "✓"
    } else {
        "✗"
    }
}

/// One star per whole rating point.
pub fn stars(rating: f64) -> String {
    "⭐".repeat(rating.max(0.0) as usize)
}

/// An id shortened to 12 chars with `...`, as used in listing tables.
pub fn short_id(id: &str) -> String {
    format!("{}...", cut(id, 12))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone)]
pub struct Column {
    header: String,
    align: Align,
    width: Option<usize>,
    max_width: Option<usize>,
}

impl Column {
    pub fn new(header: impl Into<String>) -> Self {
        Column {
            header: header.into(),
            align: Align::Left,
            width: None,
            max_width: None,
        }
    }

    /// Fixed width, content is padded or cut.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Upper bound, the column shrinks to its content below it.
    pub fn max_width(mut self, max_width: usize) -> Self {
        self.max_width = Some(max_width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn right(self) -> Self {
        self.align(Align::Right)
    }

    pub fn center(self) -> Self {
        self.align(Align::Center)
    }
}

/// Boxed text table. Rows shorter than the header are padded with empty cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    title: Option<String>,
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cuts to `width` chars, marking the cut with `…`.
fn fit(s: &str, width: usize) -> String {
    if char_len(s) <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    format!("{}…", cut(s, width - 1))
}

fn pad(s: &str, width: usize, align: Align) -> String {
    let fill = width.saturating_sub(char_len(s));
    match align {
        Align::Left => format!("{s}{}", " ".repeat(fill)),
        Align::Right => format!("{}{s}", " ".repeat(fill)),
        Align::Center => {
            let left = fill / 2;
            format!("{}{s}{}", " ".repeat(left), " ".repeat(fill - left))
        }
    }
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        Table {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn cell<'a>(row: &'a [String], i: usize) -> &'a str {
        row.get(i).map(String::as_str).unwrap_or("")
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                if let Some(w) = col.width {
                    return w;
                }
                let content = self
                    .rows
                    .iter()
                    .map(|r| char_len(Self::cell(r, i)))
                    .chain(std::iter::once(char_len(&col.header)))
                    .max()
                    .unwrap_or(0);
                match col.max_width {
                    Some(max) => content.min(max),
                    None => content,
                }
            })
            .collect()
    }

    fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
        let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", inner.join(&mid.to_string()))
    }

    fn line(&self, widths: &[usize], cells: &[String], header: bool) -> String {
        let parts: Vec<String> = self
            .columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (col, w))| {
                let align = if header { Align::Left } else { col.align };
                format!(" {} ", pad(&fit(Self::cell(cells, i), *w), *w, align))
            })
            .collect();
        format!("│{}│", parts.join("│"))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        let total = widths.iter().map(|w| w + 3).sum::<usize>() + 1;

        if let Some(title) = &self.title {
            writeln!(f, "{}", pad(title, total, Align::Center).trim_end())?;
        }
        writeln!(f, "{}", Self::border(&widths, '┌', '┬', '┐'))?;
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        writeln!(f, "{}", self.line(&widths, &headers, true))?;
        writeln!(f, "{}", Self::border(&widths, '├', '┼', '┤'))?;
        for row in &self.rows {
            writeln!(f, "{}", self.line(&widths, row, false))?;
        }
        write!(f, "{}", Self::border(&widths, '└', '┴', '┘'))
    }
}

/// Boxed block of text with an optional title in the top border.
#[derive(Debug, Clone)]
pub struct Panel {
    title: Option<String>,
    body: String,
    width: Option<usize>,
}

impl Panel {
    pub fn new(body: impl Into<String>) -> Self {
        Panel {
            title: None,
            body: body.into(),
            width: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Total width including borders; longer lines are wrapped.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width.max(5));
        self
    }

    fn lines(&self) -> Vec<String> {
        let inner = self.width.map(|w| w - 4);
        let mut lines = Vec::new();
        for raw in self.body.lines() {
            match inner {
                Some(w) if char_len(raw) > w => {
                    let chars: Vec<char> = raw.chars().collect();
                    lines.extend(chars.chunks(w).map(|c| c.iter().collect::<String>()));
                }
                _ => lines.push(raw.to_string()),
            }
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self.lines();
        let title_len = self.title.as_deref().map(|t| char_len(t) + 2).unwrap_or(0);
        let inner = match self.width {
            Some(w) => w - 4,
            None => lines
                .iter()
                .map(|l| char_len(l))
                .max()
                .unwrap_or(0)
                .max(title_len),
        };

        let top = match &self.title {
            Some(t) => {
                let t = fit(t, inner.saturating_sub(1));
                let rest = (inner + 2).saturating_sub(char_len(&t) + 3);
                format!("╭─ {t} {}╮", "─".repeat(rest))
            }
            None => format!("╭{}╮", "─".repeat(inner + 2)),
        };
        writeln!(f, "{top}")?;
        for line in &lines {
            writeln!(f, "│ {} │", pad(line, inner, Align::Left))?;
        }
        write!(f, "╰{}╯", "─".repeat(inner + 2))
    }
}

/// Opening panel of every walkthrough.
pub fn banner(subtitle: &str) -> Panel {
    Panel::new(format!("Apify Learning Lab\n{subtitle}"))
}

/// Closing panel, preceded by a rule.
pub fn summary(title: &str, body: &str) -> String {
    format!("\n{}\n{}", "=".repeat(60), Panel::new(body).title(title))
}
