// SPDX-License-Identifier: Apache-2.0 OR MIT
// Terminal color bitmask and ANSI escape rendering

use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// ANSI sequence restoring the terminal's default attributes
pub const ANSI_RESET: &str = "\x1b[0m";

/// Packed terminal color selection.
///
/// Bit layout: foreground in bits 0-2, foreground-bright in bit 3,
/// background in bits 4-6, background-bright in bit 7. The all-ones
/// value is the sentinel meaning "leave the terminal's current color
/// alone"; it cannot collide with any valid combination since valid
/// colors only occupy the low byte.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u16);

impl Color {
    /// Sentinel: do not override the terminal's current color
    pub const NONE: Color = Color(0xFFFF);

    pub const FG_BLACK: Color = Color(0x0000);
    pub const FG_BLUE: Color = Color(0x0001);
    pub const FG_GREEN: Color = Color(0x0002);
    pub const FG_CYAN: Color = Color(0x0003);
    pub const FG_RED: Color = Color(0x0004);
    pub const FG_MAGENTA: Color = Color(0x0005);
    pub const FG_YELLOW: Color = Color(0x0006);
    pub const FG_WHITE: Color = Color(0x0007);
    pub const FG_BRIGHT: Color = Color(0x0008);

    pub const BG_BLACK: Color = Color(0x0000);
    pub const BG_BLUE: Color = Color(0x0010);
    pub const BG_GREEN: Color = Color(0x0020);
    pub const BG_CYAN: Color = Color(0x0030);
    pub const BG_RED: Color = Color(0x0040);
    pub const BG_MAGENTA: Color = Color(0x0050);
    pub const BG_YELLOW: Color = Color(0x0060);
    pub const BG_WHITE: Color = Color(0x0070);
    pub const BG_BRIGHT: Color = Color(0x0080);

    const FG_MASK: u16 = 0x0007;
    const BG_MASK: u16 = 0x0070;
    const BRIGHT_MASK: u16 = 0x0088;

    /// True for the "no custom color" sentinel
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Color::NONE.0
    }

    /// Raw bitmask value
    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Reconstruct from a raw bitmask value
    #[inline]
    pub const fn from_bits(bits: u16) -> Color {
        Color(bits)
    }

    /// Combine two selections (const-context `|`)
    #[inline]
    pub const fn union(self, other: Color) -> Color {
        Color(self.0 | other.0)
    }

    /// Render this selection as an ANSI escape sequence.
    ///
    /// Foreground maps to codes 30-37, background to 40-47 and either
    /// bright bit to the bold attribute `1`, joined by `;` inside
    /// `ESC[..m`. Returns None when no bit produces a code: the sentinel,
    /// and black-on-black without bright, are both indistinguishable from
    /// "unset" and emit nothing.
    pub fn ansi_sequence(self) -> Option<String> {
        if self.is_none() {
            return None;
        }
        let mut codes: Vec<&'static str> = Vec::with_capacity(3);
        match self.0 & Color::FG_MASK {
            0x0001 => codes.push("34"), // blue
            0x0002 => codes.push("32"), // green
            0x0003 => codes.push("36"), // cyan
            0x0004 => codes.push("31"), // red
            0x0005 => codes.push("35"), // magenta
            0x0006 => codes.push("33"), // yellow
            0x0007 => codes.push("37"), // white
            _ => {}
        }
        match self.0 & Color::BG_MASK {
            0x0010 => codes.push("44"),
            0x0020 => codes.push("42"),
            0x0030 => codes.push("46"),
            0x0040 => codes.push("41"),
            0x0050 => codes.push("45"),
            0x0060 => codes.push("43"),
            0x0070 => codes.push("47"),
            _ => {}
        }
        if self.0 & Color::BRIGHT_MASK != 0 {
            codes.push("1");
        }
        if codes.is_empty() {
            None
        } else {
            Some(format!("\x1b[{}m", codes.join(";")))
        }
    }
}

impl BitOr for Color {
    type Output = Color;

    fn bitor(self, rhs: Color) -> Color {
        self.union(rhs)
    }
}

impl std::fmt::Debug for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "Color::NONE")
        } else {
            write!(f, "Color({:#06x})", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_renders_nothing() {
        assert_eq!(Color::NONE.ansi_sequence(), None);
        assert!(Color::NONE.is_none());
    }

    #[test]
    fn test_black_on_black_is_unset() {
        // indistinguishable from "leave terminal default"
        assert_eq!((Color::FG_BLACK | Color::BG_BLACK).ansi_sequence(), None);
    }

    #[test]
    fn test_foreground_codes() {
        assert_eq!(Color::FG_RED.ansi_sequence().unwrap(), "\x1b[31m");
        assert_eq!(Color::FG_GREEN.ansi_sequence().unwrap(), "\x1b[32m");
        assert_eq!(Color::FG_WHITE.ansi_sequence().unwrap(), "\x1b[37m");
    }

    #[test]
    fn test_background_codes() {
        assert_eq!(Color::BG_RED.ansi_sequence().unwrap(), "\x1b[41m");
        assert_eq!(Color::BG_CYAN.ansi_sequence().unwrap(), "\x1b[46m");
    }

    #[test]
    fn test_bright_only() {
        assert_eq!(Color::FG_BRIGHT.ansi_sequence().unwrap(), "\x1b[1m");
        assert_eq!(Color::BG_BRIGHT.ansi_sequence().unwrap(), "\x1b[1m");
    }

    #[test]
    fn test_combined_sequence() {
        let color = Color::FG_WHITE | Color::FG_BRIGHT;
        assert_eq!(color.ansi_sequence().unwrap(), "\x1b[37;1m");

        let color = Color::BG_RED | Color::FG_WHITE | Color::FG_BRIGHT;
        assert_eq!(color.ansi_sequence().unwrap(), "\x1b[37;41;1m");
    }

    #[test]
    fn test_bits_round_trip() {
        let color = Color::FG_YELLOW | Color::BG_BLUE;
        assert_eq!(Color::from_bits(color.bits()), color);
    }

    #[test]
    fn test_sentinel_does_not_collide() {
        // every valid combination stays within the low byte
        let all = Color::FG_WHITE | Color::FG_BRIGHT | Color::BG_WHITE | Color::BG_BRIGHT;
        assert!(all.bits() < Color::NONE.bits());
    }
}
