//! Packed-pixel images and their coordinate labels.
//!
//! [`PixelImage`] is a row-major grid of packed `u32` pixels (see
//! [`crate::pixel`]) carrying the same [`Coords`] as the aggregate it was
//! shaded from. Images are values: every transform returns a new image.

use crate::error::{Result, ShadeError};
use crate::pixel::{Rgba8, TRANSPARENT};

// ============================================================================
// Coords
// ============================================================================

/// Dimension names and axis labels of a 2-D grid.
///
/// The grid shape is `(rows.len(), cols.len())`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coords {
    dims: [String; 2],
    rows: Vec<f64>,
    cols: Vec<f64>,
}

impl Coords {
    pub fn new(dims: [&str; 2], rows: Vec<f64>, cols: Vec<f64>) -> Self {
        Self {
            dims: [dims[0].to_owned(), dims[1].to_owned()],
            rows,
            cols,
        }
    }

    /// Integer labels `0..height` / `0..width` on dims `("y", "x")`.
    pub fn with_shape(height: usize, width: usize) -> Self {
        Self::new(
            ["y", "x"],
            (0..height).map(|i| i as f64).collect(),
            (0..width).map(|i| i as f64).collect(),
        )
    }

    pub fn dims(&self) -> [&str; 2] {
        [&self.dims[0], &self.dims[1]]
    }

    pub fn rows(&self) -> &[f64] {
        &self.rows
    }

    pub fn cols(&self) -> &[f64] {
        &self.cols
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.cols.len()
    }

    pub fn len(&self) -> usize {
        self.height() * self.width()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that a buffer of `len` cells (times `depth` per cell) fits.
    pub(crate) fn check_len(&self, len: usize, depth: usize, what: &str) -> Result<()> {
        let expected = self.len() * depth;
        if len != expected {
            return Err(ShadeError::ShapeMismatch(format!(
                "{what} has {len} values but coords describe {} x {}{} = {expected}",
                self.height(),
                self.width(),
                if depth == 1 {
                    String::new()
                } else {
                    format!(" x {depth}")
                },
            )));
        }
        Ok(())
    }
}

// ============================================================================
// PixelImage
// ============================================================================

/// Vertical origin used when exporting rows to a raster buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Origin {
    /// First row of the grid becomes the top scanline.
    Upper,
    /// First row of the grid becomes the bottom scanline.
    #[default]
    Lower,
}

/// A 2-D grid of packed pixels with coordinate labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelImage {
    data: Vec<u32>,
    coords: Coords,
}

impl PixelImage {
    pub fn new(data: Vec<u32>, coords: Coords) -> Result<Self> {
        coords.check_len(data.len(), 1, "pixel buffer")?;
        Ok(Self { data, coords })
    }

    /// Build from nested rows; labels default to [`Coords::with_shape`].
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        if let Some(r) = rows.iter().find(|r| r.as_ref().len() != width) {
            return Err(ShadeError::ShapeMismatch(format!(
                "ragged rows: expected {width} columns, found {}",
                r.as_ref().len()
            )));
        }
        let data = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::new(data, Coords::with_shape(height, width))
    }

    /// Fully transparent image over `coords`.
    pub fn transparent(coords: Coords) -> Self {
        Self::filled(coords, TRANSPARENT)
    }

    pub fn filled(coords: Coords, pixel: u32) -> Self {
        Self {
            data: vec![pixel; coords.len()],
            coords,
        }
    }

    /// Replace the coordinate labels, keeping the pixels.
    pub fn with_coords(self, coords: Coords) -> Result<Self> {
        Self::new(self.data, coords)
    }

    /// Evaluate `f(y, x)` for every pixel of `coords`.
    ///
    /// Pixels are independent, so with the `parallel` feature the grid is
    /// filled by rayon; the result is identical either way.
    pub(crate) fn from_fn<F>(coords: Coords, f: F) -> Self
    where
        F: Fn(usize, usize) -> u32 + Sync,
    {
        let w = coords.width();
        let n = coords.len();
        #[cfg(feature = "parallel")]
        let data: Vec<u32> = {
            use rayon::prelude::*;
            (0..n).into_par_iter().map(|i| f(i / w, i % w)).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let data: Vec<u32> = (0..n).map(|i| f(i / w, i % w)).collect();
        Self { data, coords }
    }

    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u32> {
        self.data
    }

    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    pub fn width(&self) -> usize {
        self.coords.width()
    }

    pub fn height(&self) -> usize {
        self.coords.height()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn pixel(&self, y: usize, x: usize) -> u32 {
        self.data[y * self.width() + x]
    }

    pub fn channels(&self, y: usize, x: usize) -> Rgba8 {
        Rgba8::unpack(self.pixel(y, x))
    }

    pub fn row(&self, y: usize) -> &[u32] {
        let w = self.width();
        &self.data[y * w..(y + 1) * w]
    }

    /// Iterate over rows top to bottom.
    pub fn rows(&self) -> std::slice::Chunks<'_, u32> {
        // chunks(0) panics, so treat zero-width images as having no rows.
        let w = self.width().max(1);
        self.data.chunks(w)
    }

    /// Pixel-for-pixel and label-for-label equality.
    pub fn equals(&self, other: &PixelImage) -> bool {
        self == other
    }

    /// Same shape, labels and dims.
    pub fn same_grid(&self, other: &PixelImage) -> bool {
        self.coords == other.coords
    }

    /// Fraction of pixels that are not fully transparent.
    pub fn coverage(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let n = self.data.iter().filter(|&&p| p >> 24 != 0).count();
        n as f64 / self.data.len() as f64
    }

    /// Row-major RGBA bytes, four per pixel, for handing to an encoder.
    pub fn to_rgba_bytes(&self, origin: Origin) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        let mut push_row = |row: &[u32]| {
            for &p in row {
                // The packed layout is RGBA in little-endian byte order.
                out.extend_from_slice(&p.to_le_bytes());
            }
        };
        match origin {
            Origin::Upper => self.rows().for_each(&mut push_row),
            Origin::Lower => self.rows().rev().for_each(&mut push_row),
        }
        out
    }
}
