//! Spreading pixels over their neighbourhood.
//!
//! Every non-transparent source pixel contributes to each output pixel it
//! reaches through the structuring mask. Contributions to one output pixel
//! are folded in row-major source order with a [`CompositeOp`], so with the
//! default `Over` a later source lands on top of an earlier one.
//!
//! [`dynspread`] picks the radius itself: the smallest one that makes the
//! image dense enough.

use std::borrow::Cow;

use crate::comp_op::CompositeOp;
use crate::error::{Result, ShadeError};
use crate::image::PixelImage;
use crate::mask::{MaskShape, StructuringMask};
use crate::pixel::is_transparent;

// ============================================================================
// spread
// ============================================================================

/// Options for [`spread`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpreadOptions {
    /// Radius in pixels; 0 leaves the image unchanged.
    pub px: i64,
    pub shape: MaskShape,
    pub how: CompositeOp,
    /// Explicit mask; when set, `px` and `shape` are ignored.
    pub mask: Option<StructuringMask>,
}

impl Default for SpreadOptions {
    fn default() -> Self {
        Self {
            px: 1,
            shape: MaskShape::Circle,
            how: CompositeOp::Over,
            mask: None,
        }
    }
}

impl SpreadOptions {
    pub fn with_px(mut self, px: i64) -> Self {
        self.px = px;
        self
    }

    pub fn with_shape(mut self, shape: MaskShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_how(mut self, how: CompositeOp) -> Self {
        self.how = how;
        self
    }

    pub fn with_mask(mut self, mask: StructuringMask) -> Self {
        self.mask = Some(mask);
        self
    }
}

/// Spread each pixel of `img` over a neighbourhood.
pub fn spread(img: &PixelImage, opts: &SpreadOptions) -> Result<PixelImage> {
    let mask = match &opts.mask {
        Some(mask) => Cow::Borrowed(mask),
        None => {
            if opts.px < 0 {
                return Err(ShadeError::InvalidRadius(opts.px));
            }
            if opts.px == 0 {
                return Ok(img.clone());
            }
            Cow::Owned(opts.shape.mask(opts.px)?)
        }
    };
    // Only the centre is set: every pixel maps onto itself.
    if mask.count() == 1 {
        return Ok(img.clone());
    }
    log::debug!(
        "spread: {}x{} mask ({} cells) with {}",
        mask.side(),
        mask.side(),
        mask.count(),
        opts.how
    );
    Ok(apply_mask(img, &mask, opts.how))
}

fn apply_mask(img: &PixelImage, mask: &StructuringMask, how: CompositeOp) -> PixelImage {
    let (h, w) = img.shape();
    let r = mask.radius();
    PixelImage::from_fn(img.coords().clone(), |oy, ox| {
        let (y0, y1) = (oy.saturating_sub(r), (oy + r + 1).min(h));
        let (x0, x1) = (ox.saturating_sub(r), (ox + r + 1).min(w));
        let sources = (y0..y1)
            .flat_map(move |sy| (x0..x1).map(move |sx| (sy, sx)))
            // Source (sy, sx) reaches (oy, ox) through mask offset (oy - sy, ox - sx).
            .filter(|&(sy, sx)| mask.get(oy + r - sy, ox + r - sx))
            .map(|(sy, sx)| img.pixel(sy, sx))
            .filter(|&p| !is_transparent(p));
        how.reduce(sources)
    })
}

// ============================================================================
// dynspread
// ============================================================================

/// Options for [`dynspread`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DynspreadOptions {
    /// Target fraction of non-transparent pixels, in `[0, 1]`.
    pub threshold: f64,
    pub max_px: i64,
    pub shape: MaskShape,
    pub how: CompositeOp,
}

impl Default for DynspreadOptions {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            max_px: 3,
            shape: MaskShape::Circle,
            how: CompositeOp::Over,
        }
    }
}

impl DynspreadOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_px(mut self, max_px: i64) -> Self {
        self.max_px = max_px;
        self
    }
}

/// Spread with the smallest radius in `0..=max_px` whose result covers at
/// least `threshold` of the image, or with `max_px` if none does.
pub fn dynspread(img: &PixelImage, opts: &DynspreadOptions) -> Result<PixelImage> {
    if !(0.0..=1.0).contains(&opts.threshold) {
        return Err(ShadeError::InvalidThreshold(opts.threshold));
    }
    if opts.max_px < 0 {
        return Err(ShadeError::InvalidRadius(opts.max_px));
    }
    let mut out = img.clone();
    for px in 0..=opts.max_px {
        let spread_opts = SpreadOptions {
            px,
            shape: opts.shape,
            how: opts.how,
            mask: None,
        };
        out = spread(img, &spread_opts)?;
        if out.coverage() >= opts.threshold {
            log::debug!("dynspread: px={px} reaches coverage {:.3}", out.coverage());
            return Ok(out);
        }
    }
    log::debug!(
        "dynspread: stopped at max_px={} with coverage {:.3}",
        opts.max_px,
        out.coverage()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::TRANSPARENT;

    const P: u32 = 0x7d00_007d;

    fn dot(h: usize, w: usize, y: usize, x: usize, p: u32) -> PixelImage {
        let mut rows = vec![vec![TRANSPARENT; w]; h];
        rows[y][x] = p;
        PixelImage::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_single_pixel_becomes_plus() {
        let out = spread(&dot(3, 3, 1, 1, P), &SpreadOptions::default()).unwrap();
        assert_eq!(out.data(), &[0, P, 0, P, P, P, 0, P, 0]);
    }

    #[test]
    fn test_square_shape() {
        let opts = SpreadOptions::default().with_shape(MaskShape::Square);
        let out = spread(&dot(3, 3, 1, 1, P), &opts).unwrap();
        assert!(out.data().iter().all(|&p| p == P));
    }

    #[test]
    fn test_edges_are_clipped() {
        let out = spread(&dot(2, 2, 0, 0, P), &SpreadOptions::default()).unwrap();
        assert_eq!(out.data(), &[P, P, P, 0]);
    }

    #[test]
    fn test_overlap_composites() {
        let img = PixelImage::from_rows(&[[P, 0, P]]).unwrap();
        let out = spread(&img, &SpreadOptions::default()).unwrap();
        assert_eq!(out.data(), &[P, 0xbc00_007d, P]);
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let img = dot(3, 4, 2, 1, P);
        let out = spread(&img, &SpreadOptions::default().with_px(0)).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_explicit_mask_overrides_px() {
        let mask = StructuringMask::from_rows(&[
            [true, false, false],
            [false, false, false],
            [false, false, false],
        ])
        .unwrap();
        let opts = SpreadOptions::default().with_px(-5).with_mask(mask);
        let out = spread(&dot(3, 3, 1, 1, P), &opts).unwrap();
        // Offset (-1, -1) means each output pixel takes the source below-right of it.
        assert_eq!(out.data(), &[P, 0, 0, 0, P, 0, 0, 0, 0]);
    }

    #[test]
    fn test_negative_radius() {
        let err = spread(&dot(1, 1, 0, 0, P), &SpreadOptions::default().with_px(-1)).unwrap_err();
        assert_eq!(err, ShadeError::InvalidRadius(-1));
    }

    #[test]
    fn test_oversized_radius_is_an_error() {
        let img = dot(2, 2, 0, 0, P);
        for shape in [MaskShape::Circle, MaskShape::Square] {
            let opts = SpreadOptions::default().with_px(1 << 32).with_shape(shape);
            assert_eq!(spread(&img, &opts), Err(ShadeError::InvalidRadius(1 << 32)));
        }
    }

    #[test]
    fn test_trivial_mask_is_identity() {
        // Zero alpha with color bits survives untouched.
        let img = PixelImage::from_rows(&[[0x0000_00ff_u32, P]]).unwrap();
        let single = StructuringMask::from_rows(&[[true]]).unwrap();
        let empty = StructuringMask::from_rows(&[[false; 3]; 3]).unwrap();
        for mask in [single, empty] {
            let out = spread(&img, &SpreadOptions::default().with_mask(mask)).unwrap();
            assert_eq!(out, img);
        }
    }

    #[test]
    fn test_max_keeps_strongest() {
        let img = PixelImage::from_rows(&[[0x4000_00ff_u32, 0, 0xc0ff_0000]]).unwrap();
        let opts = SpreadOptions::default().with_how(CompositeOp::Max);
        let out = spread(&img, &opts).unwrap();
        assert_eq!(out.data(), &[0x4000_00ff, 0xc0ff_0000, 0xc0ff_0000]);
    }

    #[test]
    fn test_dynspread_stops_at_threshold() {
        let img = dot(3, 3, 1, 1, P);
        let opts = DynspreadOptions::default().with_threshold(0.5);
        let out = dynspread(&img, &opts).unwrap();
        // px = 1 gives a plus covering 5 of 9 pixels.
        assert_eq!(out.coverage(), 5.0 / 9.0);

        let out = dynspread(&img, &opts.with_threshold(0.0)).unwrap();
        assert_eq!(out, img);

        let out = dynspread(&img, &opts.with_threshold(1.0).with_max_px(1)).unwrap();
        assert_eq!(out.coverage(), 5.0 / 9.0);
    }

    #[test]
    fn test_dynspread_validation() {
        let img = dot(1, 1, 0, 0, P);
        let opts = DynspreadOptions::default();
        assert_eq!(
            dynspread(&img, &opts.with_threshold(1.5)),
            Err(ShadeError::InvalidThreshold(1.5))
        );
        assert_eq!(
            dynspread(&img, &opts.with_max_px(-2)),
            Err(ShadeError::InvalidRadius(-2))
        );
    }
}
