//! Colored step lines for console output.

use std::io::IsTerminal;

use crossterm::style::Stylize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Progress,
    Success,
    Failure,
}

/// Render a step line, colored only when `supports_color` is set.
pub fn render(message: &str, tone: Tone, supports_color: bool) -> String {
    let line = format!("🔍 {}", message);
    if !supports_color {
        return line;
    }

    match tone {
        Tone::Progress => format!("{}", line.as_str().yellow().bold()),
        Tone::Success => format!("{}", line.as_str().green()),
        Tone::Failure => format!("{}", line.as_str().red()),
    }
}

/// Print a step line to stdout.
pub fn step(message: &str, tone: Tone) {
    println!("{}", render(message, tone, std::io::stdout().is_terminal()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_render_has_no_escape_codes() {
        assert_eq!(render("Checking", Tone::Failure, false), "🔍 Checking");
    }

    #[test]
    fn colored_render_wraps_message() {
        let out = render("Step failed: Run Tests", Tone::Failure, true);
        assert!(out.contains("🔍 Step failed: Run Tests"));
    }
}
