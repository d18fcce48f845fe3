//! Structuring masks for [`crate::spread`].
//!
//! A mask is a square boolean grid of odd side `2r + 1`. Cell `(i, j)` set
//! means a source pixel at offset `(i - r, j - r)` from an output pixel
//! contributes to it. The centre is always set.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ShadeError};

// ============================================================================
// StructuringMask
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>"))]
pub struct StructuringMask {
    side: usize,
    cells: Vec<bool>,
}

impl StructuringMask {
    /// Row-major `side * side` cells.
    pub fn new(side: usize, cells: Vec<bool>) -> Result<Self> {
        Self::from_shape(&[side, side], cells)
    }

    /// Build from a buffer with an explicit n-dimensional shape. Only
    /// square 2-D shapes with an odd side are accepted.
    pub fn from_shape(shape: &[usize], mut cells: Vec<bool>) -> Result<Self> {
        let &[h, w] = shape else {
            return Err(ShadeError::InvalidMask(format!(
                "mask must be 2-D, got {} dimension(s)",
                shape.len()
            )));
        };
        if h != w || h % 2 == 0 {
            return Err(ShadeError::InvalidMask(format!(
                "mask must be square with an odd side, got {h}x{w}"
            )));
        }
        if h.checked_mul(w) != Some(cells.len()) {
            return Err(ShadeError::InvalidMask(format!(
                "{h}x{w} mask needs {h}*{w} cells, got {}",
                cells.len()
            )));
        }
        let r = h / 2;
        cells[r * h + r] = true;
        Ok(Self { side: h, cells })
    }

    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let h = rows.len();
        let w = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != w) {
            return Err(ShadeError::InvalidMask("mask rows differ in length".into()));
        }
        let cells = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Self::from_shape(&[h, w], cells)
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Half-width `r` of a `2r + 1` mask.
    pub fn radius(&self) -> usize {
        self.side / 2
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.side + j]
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells.chunks(self.side).map(<[bool]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<bool>>> for StructuringMask {
    type Error = ShadeError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<StructuringMask> for Vec<Vec<bool>> {
    fn from(mask: StructuringMask) -> Self {
        mask.to_rows()
    }
}

impl fmt::Display for StructuringMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.side) {
            for &c in row {
                f.write_str(if c { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// Factories
// ============================================================================

/// Shape of the mask [`crate::spread`] builds from a pixel radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MaskShape {
    #[default]
    Circle,
    Square,
}

impl MaskShape {
    pub fn mask(self, r: i64) -> Result<StructuringMask> {
        match self {
            MaskShape::Circle => circle_mask(r),
            MaskShape::Square => square_mask(r),
        }
    }
}

impl FromStr for MaskShape {
    type Err = ShadeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "circle" => Ok(MaskShape::Circle),
            "square" => Ok(MaskShape::Square),
            _ => Err(ShadeError::InvalidMask(format!(
                "unknown shape {s:?}, expected \"circle\" or \"square\""
            ))),
        }
    }
}

/// Side `2r + 1` and cell count of a radius-`r` mask.
fn side_for(r: i64) -> Result<(usize, usize)> {
    usize::try_from(r)
        .ok()
        .and_then(|r| r.checked_mul(2))
        .and_then(|d| d.checked_add(1))
        .and_then(|side| Some((side, side.checked_mul(side)?)))
        .ok_or(ShadeError::InvalidRadius(r))
}

/// All-true mask of side `2r + 1`.
pub fn square_mask(r: i64) -> Result<StructuringMask> {
    let (side, len) = side_for(r)?;
    StructuringMask::new(side, vec![true; len])
}

/// Disc of radius `r`: offset `(dy, dx)` is set when `dy² + dx² < r(r + 1)`,
/// i.e. its distance from the centre rounds to at most `r`.
pub fn circle_mask(r: i64) -> Result<StructuringMask> {
    let (side, len) = side_for(r)?;
    let ri = r as i128;
    let limit = ri * (ri + 1);
    let cells = (0..len)
        .map(|k| {
            let dy = (k / side) as i128 - ri;
            let dx = (k % side) as i128 - ri;
            dy * dy + dx * dx < limit
        })
        .collect();
    StructuringMask::new(side, cells)
}
