//! Hex color decoding.
//!
//! Components configure colors as loosely formatted hex strings
//! (`"BDA12A"`, `"#bda12a"`, `" BDA12A "` are all the same color). This
//! module turns those strings into normalized RGB channels.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// The input did not contain exactly 6 hex digits after filtering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color {input:?}: expected 6 hex digits, found {digit_count}")]
pub struct InvalidHexFormat {
    /// The raw input as given by the caller.
    pub input: String,
    /// How many hex digits survived filtering.
    pub digit_count: usize,
}

/// An opaque RGB color with channels normalized to `[0.0, 1.0]`.
///
/// Alpha is not modeled; every `Rgb` is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Rgb {
    /// Sentinel color for callers that want a fixed fallback when hex
    /// decoding fails (pure red).
    pub const FALLBACK: Rgb = Rgb {
        red: 1.0,
        green: 0.0,
        blue: 0.0,
    };

    /// Decode a 6-hex-digit color string.
    ///
    /// All non-hex characters (`#`, whitespace, anything else) are filtered
    /// out first; the remaining digits must number exactly 6 and are read as
    /// RRGGBB. Letters are case insensitive.
    pub fn from_hex(hex: &str) -> Result<Rgb, InvalidHexFormat> {
        let digits: Vec<u8> = hex
            .chars()
            .filter_map(|c| c.to_digit(16).map(|d| d as u8))
            .collect();

        if digits.len() != 6 {
            return Err(InvalidHexFormat {
                input: hex.to_owned(),
                digit_count: digits.len(),
            });
        }

        // Two digits per channel: high * 16 + low, then normalize by 255.
        let channel = |hi: u8, lo: u8| f32::from(hi * 16 + lo) / 255.0;

        Ok(Rgb {
            red: channel(digits[0], digits[1]),
            green: channel(digits[2], digits[3]),
            blue: channel(digits[4], digits[5]),
        })
    }

    /// Create a color from 8-bit integer channels.
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Rgb {
        Rgb {
            red: f32::from(red) / 255.0,
            green: f32::from(green) / 255.0,
            blue: f32::from(blue) / 255.0,
        }
    }

    /// The channels rounded back to 8-bit integers.
    pub fn channels(&self) -> (u8, u8, u8) {
        (
            (self.red * 255.0).round() as u8,
            (self.green * 255.0).round() as u8,
            (self.blue * 255.0).round() as u8,
        )
    }

    /// A uniformly random opaque color.
    pub fn random() -> Rgb {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        Rgb {
            red: rng.gen_range(0.0..=1.0),
            green: rng.gen_range(0.0..=1.0),
            blue: rng.gen_range(0.0..=1.0),
        }
    }
}

impl FromStr for Rgb {
    type Err = InvalidHexFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}
