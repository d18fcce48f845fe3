//! Numeric aggregates handed in by the binning stage.
//!
//! * [`ScalarAggregate`]: one value per cell. NaN and exact zero mark a
//!   cell as missing.
//! * [`CategoricalAggregate`]: a vector of non-negative category weights
//!   per cell. A cell is missing when its weights sum to zero.
//! * [`Aggregate`]: the closed set of inputs [`crate::shade`] dispatches on.

use crate::error::{Result, ShadeError};
use crate::image::{Coords, PixelImage};

// ============================================================================
// AggValue
// ============================================================================

/// Element type of an aggregate grid.
pub trait AggValue: Copy + PartialOrd + Send + Sync + 'static {
    fn to_f64(self) -> f64;

    /// Missing cells render as transparent.
    #[inline]
    fn is_missing(self) -> bool {
        let v = self.to_f64();
        v.is_nan() || v == 0.0
    }
}

macro_rules! impl_agg_value {
    ($($t:ty),*) => {
        $(
            impl AggValue for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_agg_value!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

// ============================================================================
// ScalarAggregate
// ============================================================================

/// Row-major 2-D grid of numeric values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarAggregate<T> {
    data: Vec<T>,
    coords: Coords,
}

impl<T: AggValue> ScalarAggregate<T> {
    pub fn new(data: Vec<T>, coords: Coords) -> Result<Self> {
        coords.check_len(data.len(), 1, "aggregate")?;
        Ok(Self { data, coords })
    }

    /// Build from nested rows; labels default to [`Coords::with_shape`].
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != width) {
            return Err(ShadeError::ShapeMismatch(format!(
                "ragged rows: expected {width} columns in every row"
            )));
        }
        let data = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::new(data, Coords::with_shape(rows.len(), width))
    }

    pub fn with_coords(self, coords: Coords) -> Result<Self> {
        Self::new(self.data, coords)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.coords.height(), self.coords.width())
    }

    pub fn get(&self, y: usize, x: usize) -> T {
        self.data[y * self.coords.width() + x]
    }

    /// Minimum and maximum of the non-missing cells, or `None` if every
    /// cell is missing.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .filter(|v| !v.is_missing())
            .map(|v| v.to_f64())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Widen the element type to `f64`.
    pub fn to_f64(&self) -> ScalarAggregate<f64> {
        ScalarAggregate {
            data: self.data.iter().map(|v| v.to_f64()).collect(),
            coords: self.coords.clone(),
        }
    }
}

// ============================================================================
// CategoricalAggregate
// ============================================================================

/// Row-major `(row, col, category)` grid of category weights.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalAggregate<T> {
    data: Vec<T>,
    coords: Coords,
    categories: Vec<String>,
}

impl<T: AggValue> CategoricalAggregate<T> {
    pub fn new(data: Vec<T>, coords: Coords, categories: Vec<String>) -> Result<Self> {
        if categories.is_empty() {
            return Err(ShadeError::ShapeMismatch(
                "categorical aggregate needs at least one category".into(),
            ));
        }
        coords.check_len(data.len(), categories.len(), "categorical aggregate")?;
        Ok(Self {
            data,
            coords,
            categories,
        })
    }

    /// Build from nested rows of per-cell weight vectors.
    pub fn from_rows<C, R>(rows: &[R], categories: &[&str]) -> Result<Self>
    where
        C: AsRef<[T]>,
        R: AsRef<[C]>,
    {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let depth = categories.len();
        let mut data = Vec::with_capacity(height * width * depth);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ShadeError::ShapeMismatch(format!(
                    "ragged rows: expected {width} columns in every row"
                )));
            }
            for cell in row {
                let cell = cell.as_ref();
                if cell.len() != depth {
                    return Err(ShadeError::ShapeMismatch(format!(
                        "cell has {} weights but there are {depth} categories",
                        cell.len()
                    )));
                }
                data.extend_from_slice(cell);
            }
        }
        Self::new(
            data,
            Coords::with_shape(height, width),
            categories.iter().map(|c| (*c).to_owned()).collect(),
        )
    }

    pub fn with_coords(self, coords: Coords) -> Result<Self> {
        Self::new(self.data, coords, self.categories)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn coords(&self) -> &Coords {
        &self.coords
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.coords.height(), self.coords.width())
    }

    /// Weights of cell `i` in row-major order.
    pub fn weights(&self, i: usize) -> &[T] {
        let d = self.categories.len();
        &self.data[i * d..(i + 1) * d]
    }

    /// Per-cell weight vectors in row-major order.
    pub fn cells(&self) -> std::slice::Chunks<'_, T> {
        self.data.chunks(self.categories.len())
    }

    /// Sum of the category weights of cell `i`.
    pub fn total(&self, i: usize) -> f64 {
        self.weights(i).iter().map(|w| w.to_f64()).sum()
    }

    pub fn to_f64(&self) -> CategoricalAggregate<f64> {
        CategoricalAggregate {
            data: self.data.iter().map(|v| v.to_f64()).collect(),
            coords: self.coords.clone(),
            categories: self.categories.clone(),
        }
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Any input [`crate::shade`] knows how to turn into an image.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    Scalar(ScalarAggregate<f64>),
    Categorical(CategoricalAggregate<f64>),
    Image(PixelImage),
}

impl Aggregate {
    pub fn coords(&self) -> &Coords {
        match self {
            Aggregate::Scalar(a) => a.coords(),
            Aggregate::Categorical(a) => a.coords(),
            Aggregate::Image(img) => img.coords(),
        }
    }
}

impl From<ScalarAggregate<f64>> for Aggregate {
    fn from(a: ScalarAggregate<f64>) -> Self {
        Aggregate::Scalar(a)
    }
}

impl From<CategoricalAggregate<f64>> for Aggregate {
    fn from(a: CategoricalAggregate<f64>) -> Self {
        Aggregate::Categorical(a)
    }
}

impl From<PixelImage> for Aggregate {
    fn from(img: PixelImage) -> Self {
        Aggregate::Image(img)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing() {
        assert!(0i32.is_missing());
        assert!(0.0f32.is_missing());
        assert!(f64::NAN.is_missing());
        assert!(!3u8.is_missing());
        assert!(!(-2.5f64).is_missing());
    }

    #[test]
    fn test_scalar_shape_checked() {
        assert!(ScalarAggregate::new(vec![1i32; 5], Coords::with_shape(2, 2)).is_err());
        let agg = ScalarAggregate::<i32>::from_rows(&[[1i32, 2, 3], [4, 5, 6]]).unwrap();
        assert_eq!(agg.shape(), (2, 3));
        assert_eq!(agg.get(1, 2), 6);
        assert!(ScalarAggregate::<i32>::from_rows(&[vec![1i32, 2], vec![3]]).is_err());
    }

    #[test]
    fn test_value_range_skips_missing() {
        let agg = ScalarAggregate::<f64>::from_rows(&[[0.0f64, 11.0], [f64::NAN, 17.0]]).unwrap();
        assert_eq!(agg.value_range(), Some((11.0, 17.0)));
        let empty = ScalarAggregate::<u8>::from_rows(&[[0u8, 0]]).unwrap();
        assert_eq!(empty.value_range(), None);
    }

    #[test]
    fn test_categorical() {
        let cats = ["a", "b", "c"];
        let agg = CategoricalAggregate::<i64>::from_rows(&[[[0i64, 12, 0], [3, 0, 3]]], &cats);
        let agg = agg.unwrap();
        assert_eq!(agg.shape(), (1, 2));
        assert_eq!(agg.weights(1), &[3, 0, 3]);
        assert_eq!(agg.total(1), 6.0);
        assert_eq!(agg.cells().count(), 2);

        let bad = CategoricalAggregate::<i64>::from_rows(&[[[1i64, 2]]], &cats);
        assert!(matches!(bad, Err(ShadeError::ShapeMismatch(_))));
        let empty = CategoricalAggregate::<i64>::new(vec![], Coords::with_shape(0, 0), vec![]);
        assert!(empty.is_err());
    }
}
