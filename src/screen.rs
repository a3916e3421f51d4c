//! Screen clearing, line erasing and scrolling sequences.

use std::{fmt, str::FromStr};

use crate::{
    error::{GlitterError, Result},
    escape::Escape,
};

/// Which part of the screen or line to clear, relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// From the cursor to the end.
    End,
    /// From the cursor to the beginning.
    Beginning,
    /// Everything.
    #[default]
    Both,
}

impl Direction {
    fn selector(self) -> u8 {
        match self {
            Self::End => 0,
            Self::Beginning => 1,
            Self::Both => 2,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::End => "end",
            Self::Beginning => "beginning",
            Self::Both => "both",
        })
    }
}

impl FromStr for Direction {
    type Err = GlitterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.strip_prefix(':').unwrap_or(s) {
            "end" => Ok(Self::End),
            "beginning" => Ok(Self::Beginning),
            "both" => Ok(Self::Both),
            _ => Err(GlitterError::invalid(format!(
                "Expected both, end, or beginning, got {s}."
            ))),
        }
    }
}

/// Clears the screen in the given direction.
#[must_use]
pub fn clear(direction: Direction) -> String {
    Escape::current().emit(format_args!("{}J", direction.selector()))
}

/// Clears the screen in a direction given by name.
pub fn clear_to(direction: &str) -> Result<String> {
    direction.parse().map(clear)
}

#[must_use]
pub fn clear_to_end() -> String {
    clear(Direction::End)
}

#[must_use]
pub fn clear_to_beginning() -> String {
    clear(Direction::Beginning)
}

#[must_use]
pub fn clear_to_both() -> String {
    clear(Direction::Both)
}

#[must_use]
pub fn clear_screen() -> String {
    clear_to_both()
}

/// Erases the current line in the given direction.
#[must_use]
pub fn erase_line(direction: Direction) -> String {
    Escape::current().emit(format_args!("{}K", direction.selector()))
}

/// Erases the current line in a direction given by name.
pub fn erase_line_to(direction: &str) -> Result<String> {
    direction.parse().map(erase_line)
}

#[must_use]
pub fn erase_line_to_end() -> String {
    erase_line(Direction::End)
}

#[must_use]
pub fn erase_line_to_beginning() -> String {
    erase_line(Direction::Beginning)
}

#[must_use]
pub fn erase_line_to_both() -> String {
    erase_line(Direction::Both)
}

/// Scrolls the screen up by `distance` lines.
#[must_use]
pub fn scroll_up(distance: u32) -> String {
    Escape::current().emit(format_args!("{distance}S"))
}

/// Scrolls the screen down by `distance` lines.
#[must_use]
pub fn scroll_down(distance: u32) -> String {
    Escape::current().emit(format_args!("{distance}T"))
}
