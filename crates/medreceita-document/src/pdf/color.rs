// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CSS colour strings to PDF colours.

use printpdf::{Color, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };
    /// Neutral grey used for muted text and field rules.
    pub const MUTED: Self = Self {
        r: 107,
        g: 114,
        b: 128,
    };
    pub const INK: Self = Self {
        r: 31,
        g: 41,
        b: 55,
    };

    /// Parse `#rgb`, `#rrggbb` or a handful of CSS colour names.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        if let Some(hex) = value.strip_prefix('#') {
            if !hex.is_ascii() {
                return None;
            }
            return match hex.len() {
                3 => {
                    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
                    Some(Self {
                        r: digit(0)?,
                        g: digit(1)?,
                        b: digit(2)?,
                    })
                }
                6 => {
                    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                    Some(Self {
                        r: pair(0)?,
                        g: pair(2)?,
                        b: pair(4)?,
                    })
                }
                _ => None,
            };
        }
        let (r, g, b) = match value.as_str() {
            "black" => (0, 0, 0),
            "white" => (255, 255, 255),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "blue" => (0, 0, 255),
            "navy" => (0, 0, 128),
            "gray" | "grey" => (128, 128, 128),
            "teal" => (0, 128, 128),
            "maroon" => (128, 0, 0),
            "purple" => (128, 0, 128),
            _ => return None,
        };
        Some(Self { r, g, b })
    }

    /// Linear mix towards `other` (`t` = 0.0 keeps self).
    pub fn mix(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
        }
    }

    pub fn to_pdf(self) -> Color {
        Color::Rgb(Rgb {
            r: self.r as f32 / 255.0,
            g: self.g as f32 / 255.0,
            b: self.b as f32 / 255.0,
            icc_profile: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(
            Rgb8::parse("#2563eb"),
            Some(Rgb8 {
                r: 0x25,
                g: 0x63,
                b: 0xeb
            })
        );
        assert_eq!(Rgb8::parse("#FFF"), Some(Rgb8::WHITE));
        assert_eq!(Rgb8::parse(" navy "), Some(Rgb8 { r: 0, g: 0, b: 128 }));
    }

    #[test]
    fn rejects_unknown_colours() {
        assert_eq!(Rgb8::parse("#12345"), None);
        assert_eq!(Rgb8::parse("#ggg"), None);
        assert_eq!(Rgb8::parse("rgb(1,2,3)"), None);
        assert_eq!(Rgb8::parse("#ééé"), None);
        assert_eq!(Rgb8::parse("#é1"), None);
    }

    #[test]
    fn mix_moves_towards_target() {
        assert_eq!(Rgb8::WHITE.mix(Rgb8::BLACK, 0.0), Rgb8::WHITE);
        assert_eq!(Rgb8::WHITE.mix(Rgb8::BLACK, 1.0), Rgb8::BLACK);
        assert_eq!(Rgb8::WHITE.mix(Rgb8::BLACK, 0.5).r, 128);
    }
}
