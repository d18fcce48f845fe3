//! # pixshade
//!
//! Shading and compositing kernel for rasterized data. It turns dense 2-D
//! aggregates into packed RGBA pixel images and post-processes them:
//!
//! - Scalar colorization over a color ramp with linear, log, cube-root or
//!   custom scaling (`interpolate`)
//! - Categorical colorization by weighted color mixing (`colorize`)
//! - Alpha compositing of image sequences (`stack`)
//! - Neighbourhood spreading with structuring masks (`spread`, `dynspread`)
//!
//! ## Architecture
//!
//! Data flows through three stages:
//!
//! 1. **Aggregate**: a numeric grid with coordinate labels, produced
//!    elsewhere by a binning step
//! 2. **Shading**: `interpolate` or `colorize` produces a [`PixelImage`]
//! 3. **Post-processing**: any number of `stack` / `spread` passes, each
//!    returning a new image
//!
//! Pixels are `u32` values with alpha in the high byte and red in the low
//! byte; `0x00000000` means no data. See [`pixel`].
//!
//! ## Features
//!
//! - `parallel`: evaluate output pixels with rayon
//! - `serde`: derive `Serialize`/`Deserialize` on option types

// Foundation
pub mod color;
mod color_names;
pub mod error;
pub mod pixel;

// Grids
pub mod aggregate;
pub mod image;
pub mod mask;

// Color mapping
pub mod color_ramp;
pub mod colorize;
pub mod interpolate;
pub mod scaling;

// Compositing
pub mod comp_op;
pub mod shade;
pub mod spread;
pub mod stack;

pub use aggregate::{AggValue, Aggregate, CategoricalAggregate, ScalarAggregate};
pub use color::{ColorSpec, Rgb};
pub use color_ramp::{build_ramp, ColorRamp};
pub use colorize::{colorize, ColorKey, ColorizeOptions};
pub use comp_op::CompositeOp;
pub use error::{Result, ShadeError};
pub use image::{Coords, Origin, PixelImage};
pub use interpolate::{interpolate, interpolate_colors, InterpolateOptions};
pub use mask::{circle_mask, square_mask, MaskShape, StructuringMask};
pub use pixel::Rgba8;
pub use scaling::Scaling;
pub use shade::{shade, ShadeOptions};
pub use spread::{dynspread, spread, DynspreadOptions, SpreadOptions};
pub use stack::{set_background, stack};
