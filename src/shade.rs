//! One entry point for every kind of [`Aggregate`].

use crate::aggregate::Aggregate;
use crate::colorize::{colorize, ColorKey, ColorizeOptions};
use crate::error::{Result, ShadeError};
use crate::image::PixelImage;
use crate::interpolate::{interpolate, InterpolateOptions};

/// Options for [`shade`]. Only the part matching the aggregate kind is used.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShadeOptions {
    pub interpolate: InterpolateOptions,
    /// Required for categorical aggregates.
    pub color_key: Option<ColorKey>,
    pub colorize: ColorizeOptions,
}

impl ShadeOptions {
    pub fn with_interpolate(mut self, opts: InterpolateOptions) -> Self {
        self.interpolate = opts;
        self
    }

    pub fn with_color_key(mut self, key: impl Into<ColorKey>) -> Self {
        self.color_key = Some(key.into());
        self
    }

    pub fn with_colorize(mut self, opts: ColorizeOptions) -> Self {
        self.colorize = opts;
        self
    }
}

/// Turn `agg` into an image: scalar grids are interpolated, categorical
/// grids colorized, and images passed through as a copy.
pub fn shade(agg: &Aggregate, opts: &ShadeOptions) -> Result<PixelImage> {
    match agg {
        Aggregate::Scalar(a) => interpolate(a, &opts.interpolate),
        Aggregate::Categorical(a) => {
            let key = opts.color_key.as_ref().ok_or_else(|| {
                ShadeError::UnknownCategory(a.categories().first().cloned().unwrap_or_default())
            })?;
            colorize(a, key, &opts.colorize)
        }
        Aggregate::Image(img) => Ok(img.clone()),
    }
}
