//! Color parsing and formatting helpers.

use crate::{PictileError, Result};
use image::{Rgb, Rgba};

/// CSS named colors accepted for the background
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0x00, 0x00, 0x00]),
    ("silver", [0xc0, 0xc0, 0xc0]),
    ("gray", [0x80, 0x80, 0x80]),
    ("grey", [0x80, 0x80, 0x80]),
    ("white", [0xff, 0xff, 0xff]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("red", [0xff, 0x00, 0x00]),
    ("purple", [0x80, 0x00, 0x80]),
    ("fuchsia", [0xff, 0x00, 0xff]),
    ("magenta", [0xff, 0x00, 0xff]),
    ("green", [0x00, 0x80, 0x00]),
    ("lime", [0x00, 0xff, 0x00]),
    ("olive", [0x80, 0x80, 0x00]),
    ("yellow", [0xff, 0xff, 0x00]),
    ("navy", [0x00, 0x00, 0x80]),
    ("blue", [0x00, 0x00, 0xff]),
    ("teal", [0x00, 0x80, 0x80]),
    ("aqua", [0x00, 0xff, 0xff]),
    ("cyan", [0x00, 0xff, 0xff]),
    ("orange", [0xff, 0xa5, 0x00]),
    ("darkgray", [0xa9, 0xa9, 0xa9]),
    ("darkgrey", [0xa9, 0xa9, 0xa9]),
    ("dimgray", [0x69, 0x69, 0x69]),
    ("dimgrey", [0x69, 0x69, 0x69]),
    ("lightgray", [0xd3, 0xd3, 0xd3]),
    ("lightgrey", [0xd3, 0xd3, 0xd3]),
    ("gainsboro", [0xdc, 0xdc, 0xdc]),
    ("whitesmoke", [0xf5, 0xf5, 0xf5]),
];

pub const DEFAULT_BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// Parse `#RRGGBB`, `#RGB` or a CSS color name
pub fn parse_color(spec: &str) -> Result<Rgb<u8>> {
    let trimmed = spec.trim();
    let invalid = || PictileError::InvalidColor(spec.to_string());

    if let Some(hex) = trimmed.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let digits: Vec<u8> = hex
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|d| d as u8)
            .collect();
        return match digits.len() {
            3 => Ok(Rgb([digits[0] * 17, digits[1] * 17, digits[2] * 17])),
            6 => Ok(Rgb([
                digits[0] << 4 | digits[1],
                digits[2] << 4 | digits[3],
                digits[4] << 4 | digits[5],
            ])),
            _ => Err(invalid()),
        };
    }

    let name = trimmed.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, rgb)| Rgb(rgb))
        .ok_or_else(invalid)
}

pub fn to_hex(color: Rgb<u8>) -> String {
    let [r, g, b] = color.0;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Hex form of a cell color; alpha is only written when not opaque
pub fn to_hex_alpha(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

/// Perceptual brightness (BT.709 weights), 0-255
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let weighted = 2126 * r as u32 + 7152 * g as u32 + 722 * b as u32;
    ((weighted + 5000) / 10000) as u8
}

/// Collapse a color to its gray level, keeping alpha
pub fn monochrome(color: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = color.0;
    let l = luminance(r, g, b);
    Rgba([l, l, l, a])
}

/// Foreground that stays readable on the given background
pub fn contrasting(background: Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = background.0;
    if luminance(r, g, b) < 128 {
        Rgb([255, 255, 255])
    } else {
        Rgb([0, 0, 0])
    }
}
