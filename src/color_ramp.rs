//! Color ramps.
//!
//! A [`ColorRamp`] is an ordered list of two or more color stops sampled by
//! piecewise-linear RGB interpolation. Stops are placed at evenly spaced
//! knots over the input range.

use crate::color::{resolve_all, ColorSpec, Rgb};
use crate::error::{Result, ShadeError};

/// Default number of samples produced by [`build_ramp`].
pub const DEFAULT_RAMP_STEPS: usize = 256;

/// An ordered sequence of at least two colors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Rgb>", into = "Vec<Rgb>"))]
pub struct ColorRamp {
    stops: Vec<Rgb>,
}

impl ColorRamp {
    pub fn new(stops: Vec<Rgb>) -> Result<Self> {
        if stops.len() < 2 {
            return Err(ShadeError::color(
                format!("{stops:?}"),
                "a color ramp needs at least two colors",
            ));
        }
        Ok(Self { stops })
    }

    /// Ramp from `low` to `high`.
    pub fn two(low: Rgb, high: Rgb) -> Self {
        Self {
            stops: vec![low, high],
        }
    }

    pub fn from_specs(specs: &[ColorSpec]) -> Result<Self> {
        Self::new(resolve_all(specs)?)
    }

    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    pub fn low(&self) -> Rgb {
        self.stops[0]
    }

    pub fn high(&self) -> Rgb {
        self.stops[self.stops.len() - 1]
    }

    /// Color at normalized position `p` (clamped to `[0, 1]`).
    pub fn sample(&self, p: f64) -> Rgb {
        self.map_value(p, 0.0, 1.0)
    }

    /// Map a value in data units onto the ramp spread over `[lo, hi]`.
    ///
    /// On each segment the channel is `slope * (x - x0) + y0` with
    /// `slope = (y1 - y0) / (x1 - x0)`, truncated to a byte. `x == hi` is
    /// exactly the last stop; values outside the range clamp to the ends.
    /// A degenerate range (`lo == hi`) maps to the last stop.
    pub fn map_value(&self, x: f64, lo: f64, hi: f64) -> Rgb {
        let knots = linspace(lo, hi, self.stops.len());
        let last = self.stops.len() - 1;
        if x.is_nan() {
            return self.stops[0];
        }
        if x >= hi {
            return self.stops[last];
        }
        if x <= lo {
            return self.stops[0];
        }
        // knots[j] <= x < knots[j + 1]
        let j = knots[1..].partition_point(|&k| k <= x).min(last - 1);
        let (x0, x1) = (knots[j], knots[j + 1]);
        let (c0, c1) = (self.stops[j], self.stops[j + 1]);
        let channel = |y0: u8, y1: u8| {
            let (y0, y1) = (y0 as f64, y1 as f64);
            let slope = (y1 - y0) / (x1 - x0);
            (slope * (x - x0) + y0) as u8
        };
        Rgb::new(channel(c0.r, c1.r), channel(c0.g, c1.g), channel(c0.b, c1.b))
    }

    /// Sample the ramp at `steps` evenly spaced positions in `[0, 1]`.
    pub fn lut(&self, steps: usize) -> Result<Vec<Rgb>> {
        if steps == 0 {
            return Err(ShadeError::color(
                format!("{:?}", self.stops),
                "a color ramp needs at least one step",
            ));
        }
        Ok(linspace(0.0, 1.0, steps)
            .into_iter()
            .map(|p| self.sample(p))
            .collect())
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        // lightblue -> darkblue
        Self::two(Rgb::new(173, 216, 230), Rgb::new(0, 0, 139))
    }
}

impl TryFrom<Vec<Rgb>> for ColorRamp {
    type Error = ShadeError;

    fn try_from(stops: Vec<Rgb>) -> Result<Self> {
        Self::new(stops)
    }
}

impl From<ColorRamp> for Vec<Rgb> {
    fn from(r: ColorRamp) -> Self {
        r.stops
    }
}

/// Build an `steps`-entry lookup table interpolating across `colors`.
pub fn build_ramp(colors: &[ColorSpec], steps: usize) -> Result<Vec<Rgb>> {
    ColorRamp::from_specs(colors)?.lut(steps)
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub(crate) fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut v: Vec<f64> = (0..n).map(|i| i as f64 * step + start).collect();
            v[n - 1] = stop;
            v
        }
    }
}
