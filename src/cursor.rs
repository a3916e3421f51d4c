//! Cursor movement sequences. Positions are 1-based; the top left cell is 1,1.

use crate::escape::Escape;

fn escape(body: String) -> String {
    Escape::current().emit(body)
}

/// Moves the cursor up `distance` rows.
#[must_use]
pub fn up(distance: u32) -> String {
    escape(format!("{distance}A"))
}

/// Moves the cursor down `distance` rows.
#[must_use]
pub fn down(distance: u32) -> String {
    escape(format!("{distance}B"))
}

/// Moves the cursor forward `distance` columns.
#[must_use]
pub fn forward(distance: u32) -> String {
    escape(format!("{distance}C"))
}

#[must_use]
pub fn right(distance: u32) -> String {
    forward(distance)
}

/// Moves the cursor back `distance` columns.
#[must_use]
pub fn back(distance: u32) -> String {
    escape(format!("{distance}D"))
}

#[must_use]
pub fn left(distance: u32) -> String {
    back(distance)
}

/// Moves to the beginning of the line `distance` rows down.
#[must_use]
pub fn next_line(distance: u32) -> String {
    escape(format!("{distance}E"))
}

/// Moves to the beginning of the line `distance` rows up.
#[must_use]
pub fn prev_line(distance: u32) -> String {
    escape(format!("{distance}F"))
}

#[must_use]
pub fn previous_line(distance: u32) -> String {
    prev_line(distance)
}

/// Moves to an absolute column on the current row.
#[must_use]
pub fn column(position: u32) -> String {
    escape(format!("{position}G"))
}

/// Moves to column `x`, row `y`.
#[must_use]
pub fn move_to(x: u32, y: u32) -> String {
    escape(format!("{y};{x}H"))
}

/// Saves the cursor position, replacing any previously saved one.
#[must_use]
pub fn save() -> String {
    escape("s".to_string())
}

/// Returns to the saved position (1,1 if none was saved).
#[must_use]
pub fn restore() -> String {
    escape("u".to_string())
}

#[must_use]
pub fn hide() -> String {
    escape("?25l".to_string())
}

#[must_use]
pub fn show() -> String {
    escape("?25h".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(sequence: &str) -> String {
        Escape::current().emit(sequence)
    }

    #[test]
    fn test_directions() {
        let directions: [(fn(u32) -> String, char); 6] = [
            (up, 'A'),
            (down, 'B'),
            (forward, 'C'),
            (right, 'C'),
            (back, 'D'),
            (left, 'D'),
        ];

        for (op, letter) in directions {
            for n in [1, 2, 17] {
                assert_eq!(op(n), expected(&format!("{n}{letter}")));
            }
        }
    }

    #[test]
    fn test_line_skips() {
        let moves: [(fn(u32) -> String, char); 3] =
            [(next_line, 'E'), (prev_line, 'F'), (previous_line, 'F')];

        for (op, letter) in moves {
            assert_eq!(op(1), expected(&format!("1{letter}")));
            assert_eq!(op(2), expected(&format!("2{letter}")));
        }
    }

    #[test]
    fn test_absolute_movement() {
        assert_eq!(column(3), expected("3G"));
        assert_eq!(move_to(3, 12), expected("12;3H"));
    }

    #[test]
    fn test_save_and_restore() {
        assert_eq!(save(), expected("s"));
        assert_eq!(restore(), expected("u"));
    }

    #[test]
    fn test_hide_and_show() {
        assert_eq!(hide(), expected("?25l"));
        assert_eq!(show(), expected("?25h"));
    }
}
