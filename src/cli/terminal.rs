//! Colored terminal output

use std::{fmt::Display, sync::OnceLock};

use owo_colors::{colors::css, OwoColorize};

/// Whether stdout understands color. Detected once per process.
fn color_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| supports_color::on(supports_color::Stream::Stdout).is_some())
}

/// How a piece of output should stand out.
#[derive(Debug, Clone, Copy)]
pub enum Tone {
    /// Completed actions (green)
    Success,
    /// Things the user should notice (amber)
    Warning,
    /// Identifiers and headings (bold blue)
    Accent,
    /// Secondary details
    Muted,
}

/// Renders `text` in the given tone, or plain when color is unavailable.
pub fn paint(text: impl Display, tone: Tone) -> String {
    if !color_enabled() {
        return text.to_string();
    }
    match tone {
        Tone::Success => text.fg::<css::Green>().to_string(),
        Tone::Warning => text.fg::<css::Orange>().to_string(),
        Tone::Accent => text.fg::<css::LightBlue>().bold().to_string(),
        Tone::Muted => text.dimmed().to_string(),
    }
}

/// Extension trait for colorizing output
pub trait Colorize: Display {
    fn success(&self) -> String {
        paint(self, Tone::Success)
    }

    fn warning(&self) -> String {
        paint(self, Tone::Warning)
    }

    fn accent(&self) -> String {
        paint(self, Tone::Accent)
    }

    fn dim(&self) -> String {
        paint(self, Tone::Muted)
    }
}

impl Colorize for str {}

impl Colorize for String {}
