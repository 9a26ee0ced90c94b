//! Terminal rendering for narrative (non-JSON) output.

pub struct Column<T> {
    pub header: &'static str,
    pub width: usize,
    pub value: fn(&T) -> String,
}

/// Pads or truncates to exactly `width` chars; truncation ends in `…`.
fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        return out;
    }
    format!("{s}{}", " ".repeat(width - len))
}

/// Fixed-width table: header, dashed separator, one line per row.
pub fn render_table<T>(rows: &[T], cols: &[Column<T>]) -> Vec<String> {
    let header = cols
        .iter()
        .map(|c| pad(c.header, c.width))
        .collect::<Vec<_>>()
        .join("  ");
    let sep = cols
        .iter()
        .map(|c| "-".repeat(c.width))
        .collect::<Vec<_>>()
        .join("  ");

    let mut lines = vec![header.trim_end().to_string(), sep];
    lines.extend(rows.iter().map(|row| {
        cols.iter()
            .map(|c| pad(&(c.value)(row), c.width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }));
    lines
}

/// Collapses all whitespace runs to one space.
pub fn safe_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn format_tags(tags: Option<&[String]>) -> String {
    let tags: Vec<&str> = tags
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.join(", ")
    }
}
