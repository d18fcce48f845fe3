//! Scalar colorization.
//!
//! Maps a [`ScalarAggregate`] onto a [`ColorRamp`]:
//!
//! 1. NaN and zero cells are missing and become transparent.
//! 2. Values are offset by the span minimum and passed through the
//!    [`Scaling`] function, so `log` and `cbrt` start at zero.
//! 3. The transformed values are spread linearly over the ramp between the
//!    smallest and largest transformed value (or the transformed explicit
//!    span) and packed as opaque pixels.
//!
//! A raw zero stays transparent even when an explicit span starts at zero;
//! it never renders as the ramp's low color.

use crate::aggregate::{AggValue, ScalarAggregate};
use crate::color::{ColorSpec, Rgb};
use crate::color_ramp::ColorRamp;
use crate::error::{Result, ShadeError};
use crate::image::PixelImage;
use crate::pixel::TRANSPARENT;
use crate::scaling::Scaling;

/// Options for [`interpolate`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InterpolateOptions {
    /// Colors from lowest to highest value. Defaults to lightblue -> darkblue.
    pub ramp: ColorRamp,
    pub how: Scaling,
    /// Explicit `(min, max)` in data units; values outside are clamped.
    /// Defaults to the range of the non-missing cells.
    pub span: Option<(f64, f64)>,
}

impl InterpolateOptions {
    pub fn new(ramp: ColorRamp, how: Scaling) -> Self {
        Self {
            ramp,
            how,
            span: None,
        }
    }

    pub fn with_colors(mut self, low: Rgb, high: Rgb) -> Self {
        self.ramp = ColorRamp::two(low, high);
        self
    }

    pub fn with_how(mut self, how: Scaling) -> Self {
        self.how = how;
        self
    }

    pub fn with_span(mut self, lo: f64, hi: f64) -> Self {
        self.span = Some((lo, hi));
        self
    }
}

/// Shade a scalar aggregate with a two-color ramp.
pub fn interpolate_colors<T: AggValue>(
    agg: &ScalarAggregate<T>,
    low: impl Into<ColorSpec>,
    high: impl Into<ColorSpec>,
    how: Scaling,
) -> Result<PixelImage> {
    let ramp = ColorRamp::two(low.into().resolve()?, high.into().resolve()?);
    interpolate(agg, &InterpolateOptions::new(ramp, how))
}

/// Shade a scalar aggregate according to `opts`.
pub fn interpolate<T: AggValue>(
    agg: &ScalarAggregate<T>,
    opts: &InterpolateOptions,
) -> Result<PixelImage> {
    let explicit = match opts.span {
        Some((lo, hi)) => {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(ShadeError::InvalidSpan(lo, hi));
            }
            true
        }
        None => false,
    };
    let Some((lo, hi)) = opts.span.or_else(|| agg.value_range()) else {
        log::debug!("interpolate: every cell is missing");
        return Ok(PixelImage::transparent(agg.coords().clone()));
    };

    let how = &opts.how;
    let scaled: Vec<f64> = agg
        .data()
        .iter()
        .map(|&v| {
            if v.is_missing() {
                return f64::NAN;
            }
            let v = v.to_f64();
            let v = if explicit { v.clamp(lo, hi) } else { v };
            how.apply(v - lo)
        })
        .collect();

    let observed = nan_range(&scaled);
    let bounds = if explicit {
        let (a, b) = (how.apply(0.0), how.apply(hi - lo));
        if a.is_finite() && b.is_finite() {
            Some((a.min(b), a.max(b)))
        } else {
            observed
        }
    } else {
        observed
    };
    let Some((tlo, thi)) = bounds else {
        return Ok(PixelImage::transparent(agg.coords().clone()));
    };
    log::debug!("interpolate: span [{lo}, {hi}] scaled by {how} to [{tlo}, {thi}]");

    let ramp = &opts.ramp;
    let data = scaled
        .iter()
        .map(|&t| {
            if t.is_nan() {
                TRANSPARENT
            } else {
                ramp.map_value(t, tlo, thi).to_pixel()
            }
        })
        .collect();
    PixelImage::new(data, agg.coords().clone())
}

/// Min and max ignoring NaN; `None` when every value is NaN.
pub(crate) fn nan_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::pack;

    const BLACK: Rgb = Rgb::new(0, 0, 0);
    const WHITE: Rgb = Rgb::new(255, 255, 255);

    fn gray_opts() -> InterpolateOptions {
        InterpolateOptions::default()
            .with_colors(BLACK, WHITE)
            .with_how(Scaling::Linear)
    }

    fn gray(v: u8) -> u32 {
        pack(v, v, v, 255)
    }

    #[test]
    fn test_missing_cells_are_transparent() {
        let agg = ScalarAggregate::<f32>::from_rows(&[[f32::NAN, 1.0], [0.0, 3.0]]).unwrap();
        for how in [Scaling::Linear, Scaling::Log, Scaling::Cbrt, Scaling::custom(|x| x * x)] {
            let img = interpolate(&agg, &gray_opts().with_how(how)).unwrap();
            assert_eq!(img.pixel(0, 0), TRANSPARENT);
            assert_eq!(img.pixel(1, 0), TRANSPARENT);
            assert_eq!(img.pixel(0, 1), gray(0));
            assert_eq!(img.pixel(1, 1), gray(255));
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let agg = ScalarAggregate::<i32>::from_rows(&[[1, 2, 3]]).unwrap();
        let img = interpolate(&agg, &gray_opts()).unwrap();
        assert_eq!(img.data(), &[gray(0), gray(127), gray(255)]);
    }

    #[test]
    fn test_zero_stays_transparent_at_span_minimum() {
        let agg = ScalarAggregate::<i32>::from_rows(&[[0, 5], [10, 0]]).unwrap();
        let img = interpolate(&agg, &gray_opts().with_span(0.0, 10.0)).unwrap();
        assert_eq!(img.pixel(0, 0), TRANSPARENT);
        assert_eq!(img.pixel(1, 1), TRANSPARENT);
        assert_eq!(img.pixel(0, 1), gray(127));
        assert_eq!(img.pixel(1, 0), gray(255));
    }

    #[test]
    fn test_explicit_span_clamps() {
        let agg = ScalarAggregate::<f64>::from_rows(&[[-4.0, 2.0, 9.0]]).unwrap();
        let img = interpolate(&agg, &gray_opts().with_span(1.0, 3.0)).unwrap();
        assert_eq!(img.data(), &[gray(0), gray(127), gray(255)]);
    }

    #[test]
    fn test_degenerate_span_maps_to_high() {
        let agg = ScalarAggregate::<u16>::from_rows(&[[7, 0, 7]]).unwrap();
        let img = interpolate(&agg, &gray_opts()).unwrap();
        assert_eq!(img.data(), &[gray(255), TRANSPARENT, gray(255)]);
    }

    #[test]
    fn test_all_missing() {
        let agg = ScalarAggregate::<f64>::from_rows(&[[0.0, f64::NAN]]).unwrap();
        let img = interpolate(&agg, &gray_opts()).unwrap();
        assert_eq!(img.data(), &[TRANSPARENT, TRANSPARENT]);
    }

    #[test]
    fn test_invalid_span() {
        let agg = ScalarAggregate::<f64>::from_rows(&[[1.0]]).unwrap();
        let err = interpolate(&agg, &gray_opts().with_span(3.0, 1.0)).unwrap_err();
        assert_eq!(err, ShadeError::InvalidSpan(3.0, 1.0));
        assert!(interpolate(&agg, &gray_opts().with_span(f64::NAN, 1.0)).is_err());
    }

    #[test]
    fn test_interpolate_colors_resolves_specs() {
        let agg = ScalarAggregate::<i32>::from_rows(&[[1, 2]]).unwrap();
        let img = interpolate_colors(&agg, "pink", "#ff0000", Scaling::Linear).unwrap();
        assert_eq!(img.data(), &[4291543295, 4278190335]);
        assert!(interpolate_colors(&agg, "pinkish", "red", Scaling::Linear).is_err());
    }

    #[test]
    fn test_coords_are_kept() {
        let coords = crate::image::Coords::new(["lat", "lon"], vec![0.5, 1.5], vec![10.0]);
        let agg = ScalarAggregate::new(vec![1.0f64, 2.0], coords.clone()).unwrap();
        let img = interpolate(&agg, &gray_opts()).unwrap();
        assert_eq!(img.coords(), &coords);
    }
}
