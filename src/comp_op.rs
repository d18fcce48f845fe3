//! Compositing operators on packed pixels.
//!
//! Operators combine a source pixel drawn on top of a destination pixel.
//! Channels are scaled to `[0, 1]`, blended with straight (non-premultiplied)
//! alpha and repacked by truncation, saturating at 255.
//!
//! A fully transparent operand is the identity for every operator, and two
//! transparent operands always produce `0x00000000`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ShadeError};
use crate::pixel::{alpha, is_opaque, is_transparent, Rgba8, Scaled, TRANSPARENT};

// ============================================================================
// CompositeOp
// ============================================================================

/// Pixel combination rule used by [`crate::stack`] and [`crate::spread`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CompositeOp {
    /// Source-over: the source is drawn on top of the destination.
    #[default]
    Over,
    /// Alpha-weighted sum, saturating.
    Add,
    /// Keep the most opaque contributor; equally opaque contributors are
    /// averaged.
    Max,
}

impl CompositeOp {
    pub fn name(self) -> &'static str {
        match self {
            CompositeOp::Over => "over",
            CompositeOp::Add => "add",
            CompositeOp::Max => "max",
        }
    }

    /// Combine `src` drawn on top of `dst`.
    #[inline]
    pub fn blend(self, src: u32, dst: u32) -> u32 {
        match self {
            CompositeOp::Over => blend_over(src, dst),
            CompositeOp::Add => blend_add(src, dst),
            CompositeOp::Max => {
                let mut acc = MaxAccumulator::default();
                acc.push(dst);
                acc.push(src);
                acc.finish()
            }
        }
    }

    /// Combine a sequence of pixels, each drawn on top of the ones before it.
    ///
    /// An empty sequence gives `0x00000000`; a single pixel is returned as is.
    pub fn reduce<I: IntoIterator<Item = u32>>(self, pixels: I) -> u32 {
        let mut iter = pixels.into_iter();
        let Some(first) = iter.next() else {
            return TRANSPARENT;
        };
        match self {
            CompositeOp::Over | CompositeOp::Add => {
                iter.fold(first, |dst, src| self.blend(src, dst))
            }
            CompositeOp::Max => {
                let mut acc = MaxAccumulator::default();
                acc.push(first);
                let mut n = 1;
                for p in iter {
                    acc.push(p);
                    n += 1;
                }
                if n == 1 {
                    first
                } else {
                    acc.finish()
                }
            }
        }
    }
}

impl fmt::Display for CompositeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompositeOp {
    type Err = ShadeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "over" => Ok(CompositeOp::Over),
            "add" => Ok(CompositeOp::Add),
            "max" => Ok(CompositeOp::Max),
            _ => Err(ShadeError::InvalidCompositeOp(s.to_owned())),
        }
    }
}

// ============================================================================
// Operators
// ============================================================================

// ---- Over: a = as + ad.(1 - as); c = (cs.as + cd.ad.(1 - as)) / a
#[inline]
fn blend_over(src: u32, dst: u32) -> u32 {
    if is_transparent(src) {
        return if is_transparent(dst) { TRANSPARENT } else { dst };
    }
    if is_opaque(src) || is_transparent(dst) {
        return src;
    }
    let s = Scaled::extract(src);
    let d = Scaled::extract(dst);
    let factor = 1.0 - s.a;
    let a = s.a + d.a * factor;
    Scaled {
        r: (s.r * s.a + d.r * d.a * factor) / a,
        g: (s.g * s.a + d.g * d.a * factor) / a,
        b: (s.b * s.a + d.b * d.a * factor) / a,
        a,
    }
    .combine()
}

// ---- Add: a = min(as + ad, 1); c = (cs.as + cd.ad) / a
#[inline]
fn blend_add(src: u32, dst: u32) -> u32 {
    if is_transparent(src) {
        return if is_transparent(dst) { TRANSPARENT } else { dst };
    }
    if is_transparent(dst) {
        return src;
    }
    let s = Scaled::extract(src);
    let d = Scaled::extract(dst);
    let a = (s.a + d.a).min(1.0);
    Scaled {
        r: (s.r * s.a + d.r * d.a) / a,
        g: (s.g * s.a + d.g * d.a) / a,
        b: (s.b * s.a + d.b * d.a) / a,
        a,
    }
    .combine()
}

// ---- Max: keep the highest alpha; average the colors of tied contributors
#[derive(Debug, Default)]
struct MaxAccumulator {
    alpha: u8,
    r: u32,
    g: u32,
    b: u32,
    count: u32,
}

impl MaxAccumulator {
    fn push(&mut self, p: u32) {
        let a = alpha(p);
        if a == 0 || a < self.alpha {
            return;
        }
        if a > self.alpha {
            *self = MaxAccumulator {
                alpha: a,
                ..Default::default()
            };
        }
        let c = Rgba8::unpack(p);
        self.r += c.r as u32;
        self.g += c.g as u32;
        self.b += c.b as u32;
        self.count += 1;
    }

    fn finish(&self) -> u32 {
        if self.count == 0 {
            return TRANSPARENT;
        }
        let n = self.count;
        Rgba8::new(
            (self.r / n) as u8,
            (self.g / n) as u8,
            (self.b / n) as u8,
            self.alpha,
        )
        .pack()
    }
}
