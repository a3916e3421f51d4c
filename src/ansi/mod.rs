//! SGR (Select Graphic Rendition) sequences: text styles, the eight standard
//! colors and 256 color approximations of hex colors.

mod quantize;

use std::{fmt, str::FromStr};

pub use quantize::{CUBE_LEVELS, CUBE_OFFSET, Channels, channels, closest};

use crate::{
    error::{GlitterError, Result},
    escape::Escape,
};

/// A named SGR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Reset,
    Bold,
    Faint,
    Underline,
    Blink,
    Black,
    Red,
    Green,
    Brown,
    Blue,
    Magenta,
    Cyan,
    White,
    BgBlack,
    BgRed,
    BgGreen,
    BgBrown,
    BgBlue,
    BgMagenta,
    BgCyan,
    BgWhite,
}

/// Name and code of every style, in catalog order.
pub const STYLES: &[(Style, &str, u8)] = &[
    (Style::Reset, "reset", 0),
    (Style::Bold, "bold", 1),
    (Style::Faint, "faint", 2),
    (Style::Underline, "underline", 4),
    (Style::Blink, "blink", 5),
    (Style::Black, "black", 30),
    (Style::Red, "red", 31),
    (Style::Green, "green", 32),
    (Style::Brown, "brown", 33),
    (Style::Blue, "blue", 34),
    (Style::Magenta, "magenta", 35),
    (Style::Cyan, "cyan", 36),
    (Style::White, "white", 37),
    (Style::BgBlack, "bg_black", 40),
    (Style::BgRed, "bg_red", 41),
    (Style::BgGreen, "bg_green", 42),
    (Style::BgBrown, "bg_brown", 43),
    (Style::BgBlue, "bg_blue", 44),
    (Style::BgMagenta, "bg_magenta", 45),
    (Style::BgCyan, "bg_cyan", 46),
    (Style::BgWhite, "bg_white", 47),
];

impl Style {
    fn entry(self) -> (&'static str, u8) {
        STYLES
            .iter()
            .find(|(style, _, _)| *style == self)
            .map_or(("reset", 0), |(_, name, code)| (*name, *code))
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.entry().0
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self.entry().1
    }

    /// The escape sequence for this style under the current capability.
    #[must_use]
    pub fn sequence(self) -> String {
        sgr(self)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = GlitterError;

    fn from_str(s: &str) -> Result<Self> {
        STYLES
            .iter()
            .find(|(_, name, _)| *name == s)
            .map(|(style, _, _)| *style)
            .ok_or_else(|| GlitterError::invalid(format!("unknown style: {s}")))
    }
}

/// Returns the escape sequence for `style`.
#[must_use]
pub fn sgr(style: Style) -> String {
    Escape::current().sgr(style.code())
}

/// Looks a style up by name and returns its escape sequence.
pub fn styled(name: &str) -> Result<String> {
    name.parse::<Style>().map(sgr)
}

/// Surrounds the produced text with `style` and a trailing reset.
///
/// ```
/// use glitter::ansi::{Style, wrap};
///
/// let text = wrap(Style::Red, || "test".to_string());
/// assert!(text.contains("test"));
/// ```
pub fn wrap<F>(style: Style, content: F) -> String
where
    F: FnOnce() -> String,
{
    format!("{}{}{}", sgr(style), content(), sgr(Style::Reset))
}

/// Foreground escape sequence approximating a 3 or 6 digit hex color.
#[must_use]
pub fn hex_color(hex: &str) -> String {
    Escape::current().sgr(format_args!("38;5;{}", closest(hex)))
}

/// Background escape sequence approximating a 3 or 6 digit hex color.
#[must_use]
pub fn bg_hex_color(hex: &str) -> String {
    Escape::current().sgr(format_args!("48;5;{}", closest(hex)))
}
