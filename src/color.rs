//! Color types and color resolution.
//!
//! Callers describe colors as an RGB tuple, a `#rrggbb` hex string or a CSS
//! color name ([`ColorSpec`]). Everything downstream works on resolved
//! [`Rgb`] triples.

use std::fmt;
use std::str::FromStr;

use crate::color_names;
use crate::error::{Result, ShadeError};
use crate::pixel::Rgba8;

// ============================================================================
// Rgb
// ============================================================================

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from integer components, rejecting anything outside `0..=255`.
    pub fn from_components(r: i64, g: i64, b: i64) -> Result<Self> {
        let check = |v: i64| {
            u8::try_from(v).map_err(|_| {
                ShadeError::color(
                    format!("({r}, {g}, {b})"),
                    "RGB components must be in 0..=255",
                )
            })
        };
        Ok(Self::new(check(r)?, check(g)?, check(b)?))
    }

    /// Parse a `#rrggbb` string. Hex digits are case-insensitive.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ShadeError::color(s, "hex colors start with '#'"))?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ShadeError::color(s, "expected '#' followed by 6 hex digits"));
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Self::new(r, g, b)),
            _ => Err(ShadeError::color(s, "expected '#' followed by 6 hex digits")),
        }
    }

    /// Resolve a CSS color name.
    pub fn from_name(name: &str) -> Result<Self> {
        color_names::lookup(name).ok_or_else(|| ShadeError::color(name, "unknown color name"))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Fully opaque packed pixel of this color.
    pub fn to_pixel(&self) -> u32 {
        Rgba8::opaque(*self).pack()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ShadeError;

    fn from_str(s: &str) -> Result<Self> {
        if s.starts_with('#') {
            Rgb::from_hex(s)
        } else {
            Rgb::from_name(s)
        }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

// ============================================================================
// ColorSpec
// ============================================================================

/// A color as supplied by a caller, before resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ColorSpec {
    /// Integer components, each expected in `0..=255`.
    Tuple(i64, i64, i64),
    /// A `#rrggbb` hex string or a CSS color name.
    Text(String),
}

impl ColorSpec {
    pub fn resolve(&self) -> Result<Rgb> {
        match self {
            ColorSpec::Tuple(r, g, b) => Rgb::from_components(*r, *g, *b),
            ColorSpec::Text(s) => s.parse(),
        }
    }
}

/// Resolve any color specification to an RGB triple.
pub fn resolve(spec: &ColorSpec) -> Result<Rgb> {
    spec.resolve()
}

/// Resolve a list of specifications, failing on the first invalid one.
pub fn resolve_all(specs: &[ColorSpec]) -> Result<Vec<Rgb>> {
    specs.iter().map(ColorSpec::resolve).collect()
}

impl From<&str> for ColorSpec {
    fn from(s: &str) -> Self {
        ColorSpec::Text(s.to_owned())
    }
}

impl From<String> for ColorSpec {
    fn from(s: String) -> Self {
        ColorSpec::Text(s)
    }
}

impl From<(i32, i32, i32)> for ColorSpec {
    fn from((r, g, b): (i32, i32, i32)) -> Self {
        ColorSpec::Tuple(r as i64, g as i64, b as i64)
    }
}

impl From<Rgb> for ColorSpec {
    fn from(c: Rgb) -> Self {
        ColorSpec::Tuple(c.r as i64, c.g as i64, c.b as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_tuple() {
        assert_eq!(resolve(&(255, 0, 0).into()), Ok(Rgb::new(255, 0, 0)));
        assert!(matches!(
            resolve(&(256, 0, 0).into()),
            Err(ShadeError::InvalidColor { .. })
        ));
        assert!(resolve(&(0, -1, 0).into()).is_err());
    }

    #[test]
    fn test_resolve_hex() {
        assert_eq!(resolve(&"#0000FF".into()), Ok(Rgb::new(0, 0, 255)));
        assert_eq!(resolve(&"#ffc0cb".into()), Ok(Rgb::new(255, 192, 203)));
        for bad in ["#fff", "#12345g", "#+12345", "#1234567", "#"] {
            assert!(resolve(&bad.into()).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_resolve_name() {
        assert_eq!(resolve(&"orange".into()), Ok(Rgb::new(255, 165, 0)));
        assert_eq!("pink".parse::<Rgb>(), Ok(Rgb::new(255, 192, 203)));
        let err = resolve(&"blurple".into()).unwrap_err();
        assert_eq!(
            err,
            ShadeError::InvalidColor {
                spec: "blurple".into(),
                reason: "unknown color name".into()
            }
        );
    }

    #[test]
    fn test_resolve_all_fails_fast() {
        let specs: Vec<ColorSpec> = vec![(255, 0, 0).into(), "#0000FF".into(), "orange".into()];
        assert_eq!(
            resolve_all(&specs).unwrap(),
            vec![Rgb::new(255, 0, 0), Rgb::new(0, 0, 255), Rgb::new(255, 165, 0)]
        );
        let specs: Vec<ColorSpec> = vec!["red".into(), "nope".into()];
        assert!(resolve_all(&specs).is_err());
    }

    #[test]
    fn test_hex_roundtrip_and_pixel() {
        let c = Rgb::new(0x12, 0xab, 0xef);
        assert_eq!(c.to_hex(), "#12abef");
        assert_eq!(c.to_string().parse::<Rgb>(), Ok(c));
        assert_eq!(Rgb::new(255, 0, 0).to_pixel(), 0xff00_00ff);
    }
}
