//! Damage value parsing and display formatting.
//!
//! Players report damage as abbreviated tokens ("8.88b", "8880M") or raw
//! integers. Internally everything is stored and compared in raw base units.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("invalid damage value '{0}'")]
pub struct ParseError(pub String);

/// Parses a damage token into raw base units.
///
/// Accepts a case-insensitive `b` suffix (×1e9), `m` suffix (×1e6), or a
/// plain number. Damage is never negative; anything else is rejected.
pub fn parse_damage(token: &str) -> Result<f64, ParseError> {
    let trimmed = token.trim().to_ascii_lowercase();

    let (number, multiplier) = if let Some(rest) = trimmed.strip_suffix('b') {
        (rest, 1e9)
    } else if let Some(rest) = trimmed.strip_suffix('m') {
        (rest, 1e6)
    } else {
        (trimmed.as_str(), 1.0)
    };

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| ParseError(token.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ParseError(token.to_string()));
    }

    Ok(value * multiplier)
}

/// Formats a raw damage value for display.
///
/// Values of a billion and up render as `"{:.2}B"`; everything else renders
/// as a plain integer.
pub fn format_damage(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else {
        format!("{}", value as u64)
    }
}
