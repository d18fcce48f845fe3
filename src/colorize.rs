//! Categorical colorization.
//!
//! Each cell's color is the weight-proportional mix of its categories'
//! colors. The total weight, passed through the [`Scaling`] function and
//! normalized by its largest value, sets the alpha channel between
//! `min_alpha` and 255, so the scaling changes how strongly a cell shows
//! without touching its hue. Cells with zero total weight are transparent.

use std::collections::BTreeMap;

use crate::aggregate::{AggValue, CategoricalAggregate};
use crate::color::{ColorSpec, Rgb};
use crate::error::{Result, ShadeError};
use crate::image::PixelImage;
use crate::pixel::{pack, TRANSPARENT};
use crate::scaling::Scaling;

/// Colors for the categories of an aggregate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ColorKey {
    /// One color per category, in category order.
    List(Vec<ColorSpec>),
    /// Colors by category name. Names not in the aggregate are ignored.
    Map(BTreeMap<String, ColorSpec>),
}

impl ColorKey {
    /// Resolve to one color per category in `categories` order.
    pub fn resolve(&self, categories: &[String]) -> Result<Vec<Rgb>> {
        match self {
            ColorKey::List(specs) => {
                if specs.len() != categories.len() {
                    return Err(ShadeError::ColorCountMismatch {
                        expected: categories.len(),
                        got: specs.len(),
                    });
                }
                specs.iter().map(ColorSpec::resolve).collect()
            }
            ColorKey::Map(map) => categories
                .iter()
                .map(|c| {
                    map.get(c)
                        .ok_or_else(|| ShadeError::UnknownCategory(c.clone()))?
                        .resolve()
                })
                .collect(),
        }
    }
}

impl From<Vec<ColorSpec>> for ColorKey {
    fn from(specs: Vec<ColorSpec>) -> Self {
        ColorKey::List(specs)
    }
}

impl From<BTreeMap<String, ColorSpec>> for ColorKey {
    fn from(map: BTreeMap<String, ColorSpec>) -> Self {
        ColorKey::Map(map)
    }
}

/// Options for [`colorize`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ColorizeOptions {
    pub how: Scaling,
    /// Alpha of the lightest non-empty cell, `0..=255`.
    pub min_alpha: u32,
}

impl Default for ColorizeOptions {
    fn default() -> Self {
        Self {
            how: Scaling::Cbrt,
            min_alpha: 20,
        }
    }
}

impl ColorizeOptions {
    pub fn with_how(mut self, how: Scaling) -> Self {
        self.how = how;
        self
    }

    pub fn with_min_alpha(mut self, min_alpha: u32) -> Self {
        self.min_alpha = min_alpha;
        self
    }
}

/// Shade a categorical aggregate.
pub fn colorize<T: AggValue>(
    agg: &CategoricalAggregate<T>,
    key: &ColorKey,
    opts: &ColorizeOptions,
) -> Result<PixelImage> {
    if opts.min_alpha > 255 {
        return Err(ShadeError::InvalidMinAlpha(opts.min_alpha));
    }
    let colors = key.resolve(agg.categories())?;

    let totals: Vec<f64> = (0..agg.coords().len()).map(|i| agg.total(i)).collect();
    let intensity: Vec<f64> = totals
        .iter()
        .map(|&t| if t == 0.0 { f64::NAN } else { opts.how.apply(t) })
        .collect();
    let a_max = intensity
        .iter()
        .copied()
        .filter(|a| !a.is_nan())
        .fold(f64::NEG_INFINITY, f64::max);
    log::debug!(
        "colorize: {} categories, max intensity {a_max} ({})",
        colors.len(),
        opts.how
    );

    let min_alpha = opts.min_alpha as f64;
    let alpha_span = 255.0 - min_alpha;
    let data = agg
        .cells()
        .zip(totals.iter().zip(&intensity))
        .map(|(weights, (&total, &a))| {
            if total == 0.0 || a.is_nan() {
                return TRANSPARENT;
            }
            let (mut r, mut g, mut b) = (0.0, 0.0, 0.0);
            for (w, c) in weights.iter().zip(&colors) {
                let w = w.to_f64();
                r += w * c.r as f64;
                g += w * c.g as f64;
                b += w * c.b as f64;
            }
            let alpha = if a_max > 0.0 {
                alpha_span * a / a_max + min_alpha
            } else {
                255.0
            };
            pack(
                (r / total) as u8,
                (g / total) as u8,
                (b / total) as u8,
                alpha as u8,
            )
        })
        .collect();
    PixelImage::new(data, agg.coords().clone())
}
