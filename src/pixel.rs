//! Packed 32-bit pixel helpers.
//!
//! A pixel is a single `u32` with alpha in the most significant byte and red
//! in the least significant byte (`0xAABBGGRR` as an integer), which is
//! R, G, B, A byte order in little-endian memory. `0x00000000` is the
//! transparent / no-data value.
//!
//! The compositing math works on channels scaled to `[0, 1]` as `f64`
//! (`byte / 255`) and repacks by truncating `value * 255`.

use crate::color::Rgb;

/// Fully transparent pixel; also the "no data" value.
pub const TRANSPARENT: u32 = 0x0000_0000;

// ============================================================================
// Rgba8
// ============================================================================

/// A pixel unpacked into its four 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque pixel of the given color.
    pub const fn opaque(c: Rgb) -> Self {
        Self::new(c.r, c.g, c.b, 255)
    }

    pub const fn pack(self) -> u32 {
        ((self.a as u32) << 24) | ((self.b as u32) << 16) | ((self.g as u32) << 8) | self.r as u32
    }

    pub const fn unpack(p: u32) -> Self {
        Self {
            r: (p & 0xFF) as u8,
            g: ((p >> 8) & 0xFF) as u8,
            b: ((p >> 16) & 0xFF) as u8,
            a: (p >> 24) as u8,
        }
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    #[inline]
    pub fn to_double(v: u8) -> f64 {
        v as f64 / 255.0
    }

    /// Truncating conversion back to a channel byte, saturating at 255.
    #[inline]
    pub fn from_double(v: f64) -> u8 {
        // `as` saturates: negatives and NaN go to 0.
        let v = (v * 255.0) as u32;
        v.min(255) as u8
    }
}

impl From<u32> for Rgba8 {
    fn from(p: u32) -> Self {
        Rgba8::unpack(p)
    }
}

impl From<Rgba8> for u32 {
    fn from(c: Rgba8) -> Self {
        c.pack()
    }
}

/// Pack channels into a pixel.
#[inline]
pub const fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    Rgba8::new(r, g, b, a).pack()
}

/// Alpha byte of a packed pixel.
#[inline]
pub const fn alpha(p: u32) -> u8 {
    (p >> 24) as u8
}

/// True when the alpha byte is zero.
#[inline]
pub const fn is_transparent(p: u32) -> bool {
    p >> 24 == 0
}

#[inline]
pub const fn is_opaque(p: u32) -> bool {
    p >> 24 == 0xFF
}

// ============================================================================
// Scaled f64 working space
// ============================================================================

/// Straight (non-premultiplied) RGBA in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Scaled {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Scaled {
    #[inline]
    pub fn extract(p: u32) -> Self {
        let c = Rgba8::unpack(p);
        Self {
            r: Rgba8::to_double(c.r),
            g: Rgba8::to_double(c.g),
            b: Rgba8::to_double(c.b),
            a: Rgba8::to_double(c.a),
        }
    }

    #[inline]
    pub fn combine(&self) -> u32 {
        pack(
            Rgba8::from_double(self.r),
            Rgba8::from_double(self.g),
            Rgba8::from_double(self.b),
            Rgba8::from_double(self.a),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        // Red lives in the low byte, alpha in the high byte.
        assert_eq!(pack(255, 0, 0, 255), 4278190335);
        assert_eq!(pack(255, 192, 203, 255), 4291543295);
        assert_eq!(pack(0x12, 0x34, 0x56, 0x78), 0x7856_3412);
    }

    #[test]
    fn test_unpack() {
        let c = Rgba8::unpack(0x7d00_ff00);
        assert_eq!(c, Rgba8::new(0, 255, 0, 0x7d));
        assert_eq!(u32::from(c), 0x7d00_ff00);
        assert_eq!(alpha(0x7d00_ff00), 0x7d);
    }

    #[test]
    fn test_transparency() {
        assert!(is_transparent(TRANSPARENT));
        assert!(is_transparent(0x0000_00ff));
        assert!(!is_transparent(0x0100_0000));
        assert!(is_opaque(0xff00_0000));
        assert!(!is_opaque(0xfe00_0000));
    }

    #[test]
    fn test_from_double_truncates_and_saturates() {
        assert_eq!(Rgba8::from_double(0.5), 127);
        assert_eq!(Rgba8::from_double(1.0), 255);
        assert_eq!(Rgba8::from_double(1.24), 255);
        assert_eq!(Rgba8::from_double(-0.3), 0);
        assert_eq!(Rgba8::from_double(f64::NAN), 0);
    }

    #[test]
    fn test_scaled_roundtrip_is_exact_for_bytes() {
        for p in [0x7d00_007d_u32, 0xff3d_bfbc, 0x0102_0304, 0xffff_ffff] {
            assert_eq!(Scaled::extract(p).combine(), p);
        }
    }
}
