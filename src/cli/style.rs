//! Console styling

use owo_colors::{OwoColorize, Stream, Style};
use std::fmt::Display;

/// Check mark for completed items
pub const CHECK: &str = "✓";

/// Cross for blocked items
pub const CROSS: &str = "✗";

/// Semantic styles for console output
///
/// Colors are only applied when stdout supports them.
pub trait Stylize: Display {
    /// Success (green)
    fn success(&self) -> String {
        self.styled(Style::new().green())
    }

    /// Warning (yellow)
    fn warn(&self) -> String {
        self.styled(Style::new().yellow())
    }

    /// Error (red)
    fn error(&self) -> String {
        self.styled(Style::new().red())
    }

    /// Highlighted values (cyan)
    fn accent(&self) -> String {
        self.styled(Style::new().cyan())
    }

    /// Headings (bold)
    fn emphasis(&self) -> String {
        self.styled(Style::new().bold())
    }

    /// Secondary text (dimmed)
    fn muted(&self) -> String {
        self.styled(Style::new().dimmed())
    }

    /// Apply `style` when stdout supports color
    fn styled(&self, style: Style) -> String {
        let text = self.to_string();
        format!(
            "{}",
            text.if_supports_color(Stream::Stdout, |t| t.style(style))
        )
    }
}

impl<T: Display + ?Sized> Stylize for T {}
