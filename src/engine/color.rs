//! Hex color parsing.

use std::fmt;
use std::str::FromStr;

use image::{Rgb, Rgba};

use crate::error::CarouselError;

/// Opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Parse a 6-hex-digit color such as `ffffff`.
    ///
    /// A leading `#` is tolerated so values copied from CSS work too.
    pub fn from_hex(hex: &str) -> Result<Self, CarouselError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CarouselError::invalid_param(
                "color",
                format!("expected 6 hex digits, got '{hex}'"),
            ));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| CarouselError::invalid_param("color", format!("invalid hex '{hex}'")))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }

    /// RGBA pixel at the given alpha.
    pub fn to_rgba(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }
}

impl FromStr for Color {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rrggbb() {
        assert_eq!(Color::from_hex("ff0000").unwrap(), Color::new(255, 0, 0));
        assert_eq!(Color::from_hex("00FF00").unwrap(), Color::new(0, 255, 0));
        assert_eq!(Color::from_hex("0000ff").unwrap(), Color::new(0, 0, 255));
        assert_eq!(Color::from_hex("ffffff").unwrap(), Color::white());
        assert_eq!(Color::from_hex("000000").unwrap(), Color::black());
    }

    #[test]
    fn test_parse_tolerates_hash_prefix() {
        assert_eq!(Color::from_hex("#1a2b3c").unwrap(), Color::new(0x1a, 0x2b, 0x3c));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Color::from_hex("fff").is_err());
        assert!(Color::from_hex("fffffff").is_err());
        assert!(Color::from_hex("gggggg").is_err());
        assert!(Color::from_hex("").is_err());
        // multi-byte chars must not panic on slicing
        assert!(Color::from_hex("ééé").is_err());
    }

    #[test]
    fn test_display_round_trips_lowercase() {
        let color: Color = "AbCdEf".parse().unwrap();
        assert_eq!(color.to_string(), "abcdef");
    }
}
