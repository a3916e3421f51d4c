//! Nearest-match lookup of CSS-style hex colors in the 256 color palette.
//!
//! Indices 16 through 231 of the 256 color palette form a 6x6x6 RGB cube; the
//! remaining 40 entries are the standard/bright colors and a grayscale ramp,
//! which are never produced here.

/// First index of the color cube.
pub const CUBE_OFFSET: u64 = 16;

/// Levels per channel in the color cube.
pub const CUBE_LEVELS: u64 = 6;

/// A decoded hex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channels {
    pub red: u64,
    pub green: u64,
    pub blue: u64,
    /// Bits per channel, 4 or 8.
    pub bpc: u32,
}

impl Channels {
    /// Scales each channel into the six cube levels and returns the palette
    /// index.
    #[must_use]
    pub fn index(&self) -> u64 {
        let step = (channel_mask(self.bpc) / 5).max(1);

        let red = self.red / step;
        let green = self.green / step;
        let blue = self.blue / step;

        red.saturating_mul(CUBE_LEVELS * CUBE_LEVELS)
            .saturating_add(green.saturating_mul(CUBE_LEVELS))
            .saturating_add(blue)
            .saturating_add(CUBE_OFFSET)
    }
}

fn channel_mask(bpc: u32) -> u64 {
    (1u64 << bpc) - 1
}

/// Parses leading hex digits into an integer, stopping at the first
/// character that is not a hex digit. Saturates instead of overflowing.
fn parse_hex_prefix(hex: &str) -> u64 {
    hex.chars()
        .map_while(|c| c.to_digit(16))
        .fold(0u64, |acc, digit| {
            acc.checked_mul(16)
                .and_then(|v| v.checked_add(u64::from(digit)))
                .unwrap_or(u64::MAX)
        })
}

/// Decodes a 3 or 6 digit hex color into its channels.
///
/// The bit depth is derived from the length alone: up to three characters
/// means 4 bits per channel, anything longer 8 bits. Input is not validated;
/// malformed strings still decode to some value.
#[must_use]
pub fn channels(hex: &str) -> Channels {
    let bpc = if hex.chars().count() > 3 { 8 } else { 4 };
    let value = parse_hex_prefix(hex);
    let mask = channel_mask(bpc);

    Channels {
        red: value >> (bpc * 2),
        green: (value >> bpc) & mask,
        blue: value & mask,
        bpc,
    }
}

/// Returns the palette index (16..=231 for well-formed input) closest to
/// the given hex color.
///
/// Malformed input is not rejected: non-hex characters end parsing early and
/// wrong lengths fall through the same arithmetic, which may produce an index
/// outside the cube.
///
/// ```
/// assert_eq!(glitter::ansi::closest("00FFFF"), 51);
/// assert_eq!(glitter::ansi::closest("F0F"), 201);
/// ```
#[must_use]
pub fn closest(hex: &str) -> u64 {
    channels(hex).index()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_8bpc_primaries() {
        let codes = [
            ("000000", 16),
            ("0000FF", 21),
            ("00FF00", 46),
            ("FF0000", 196),
            ("00FFFF", 51),
            ("FF00FF", 201),
            ("FFFF00", 226),
            ("FFFFFF", 231),
        ];

        for (hex, index) in codes {
            assert_eq!(closest(hex), index, "{hex}");
        }
    }

    #[test]
    fn test_closest_4bpc_primaries() {
        let codes = [
            ("000", 16),
            ("00F", 21),
            ("0F0", 46),
            ("F00", 196),
            ("0FF", 51),
            ("F0F", 201),
            ("FF0", 226),
            ("FFF", 231),
        ];

        for (hex, index) in codes {
            assert_eq!(closest(hex), index, "{hex}");
        }
    }

    #[test]
    fn test_closest_is_case_insensitive() {
        assert_eq!(closest("ff00ff"), closest("FF00FF"));
        assert_eq!(closest("0ff"), 51);
    }

    #[test]
    fn test_cube_colors_map_back_to_their_index() {
        for r in 0..6u64 {
            for g in 0..6u64 {
                for b in 0..6u64 {
                    let expected = 16 + 36 * r + 6 * g + b;

                    let wide = format!("{:02X}{:02X}{:02X}", r * 51, g * 51, b * 51);
                    assert_eq!(closest(&wide), expected, "{wide}");

                    let narrow = format!("{:X}{:X}{:X}", r * 3, g * 3, b * 3);
                    assert_eq!(closest(&narrow), expected, "{narrow}");
                }
            }
        }
    }

    #[test]
    fn test_channels_decode() {
        let c = channels("123456");
        assert_eq!((c.red, c.green, c.blue, c.bpc), (0x12, 0x34, 0x56, 8));

        let c = channels("abc");
        assert_eq!((c.red, c.green, c.blue, c.bpc), (0xa, 0xb, 0xc, 4));
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        assert_eq!(closest(""), 16);
        assert_eq!(closest("zzzzzz"), 16);
        // Parsing stops at the first non-hex digit, leaving only blue.
        assert_eq!(closest("FFzzzz"), 21);
        // Wider than 8 bits per channel: red keeps the surplus high bits.
        assert!(closest("FFFFFFFF") > 231);
        let _ = closest("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF");
    }
}
