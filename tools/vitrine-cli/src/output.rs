//! Output formatting for the CLI.

use console::style;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Whether human-readable lines are printed.
    fn human(&self) -> bool {
        !self.json
    }

    pub fn info(&self, msg: &str) {
        if self.human() {
            println!("{} {}", style("ℹ").blue(), msg);
        }
    }

    pub fn success(&self, msg: &str) {
        if self.human() {
            println!("{} {}", style("✓").green(), msg);
        }
    }

    pub fn warn(&self, msg: &str) {
        if self.human() {
            eprintln!("{} {}", style("⚠").yellow(), msg);
        }
    }

    /// Errors are always printed; as a JSON object in JSON mode.
    pub fn error(&self, msg: &str) {
        if self.human() {
            eprintln!("{} {}", style("✗").red(), style(msg).red());
        } else {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose && self.human() {
            eprintln!("{} {}", style("→").dim(), style(msg).dim());
        }
    }

    pub fn header(&self, msg: &str) {
        if self.human() {
            println!("\n{}", style(msg).bold().underlined());
        }
    }

    /// Pretty-printed JSON on stdout, in either mode.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => self.error(&format!("Failed to encode output: {}", e)),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.human() {
            println!("  {}: {}", style(key).dim(), value);
        }
    }

    /// Columns padded to the given widths.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if !self.human() {
            return;
        }
        let row: Vec<String> = cols
            .iter()
            .zip(widths)
            .map(|(col, width)| format!("{:width$}", col, width = *width))
            .collect();
        println!("  {}", row.join("  ").trim_end());
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Colored badge for a reply status.
pub fn status_badge(status: u16) -> String {
    let text = status.to_string();
    match status {
        200..=299 => style(text).green().to_string(),
        400..=499 => style(text).yellow().to_string(),
        _ => style(text).red().to_string(),
    }
}

/// Pluralize a count: `1 record`, `3 records`.
pub fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count() {
        assert_eq!(count(1, "record"), "1 record");
        assert_eq!(count(0, "record"), "0 records");
        assert_eq!(count(12, "route"), "12 routes");
    }

    #[test]
    fn test_status_badge_keeps_code() {
        assert!(status_badge(404).contains("404"));
        assert!(status_badge(200).contains("200"));
    }
}
