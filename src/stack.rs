//! Compositing a sequence of images into one.

use crate::color::ColorSpec;
use crate::comp_op::CompositeOp;
use crate::error::{Result, ShadeError};
use crate::image::PixelImage;
use crate::pixel::Rgba8;

/// Combine `images` pixel by pixel; each image is drawn on top of the ones
/// before it.
///
/// All images must share shape, labels and dimension names.
pub fn stack(images: &[&PixelImage], how: CompositeOp) -> Result<PixelImage> {
    let (first, rest) = images.split_first().ok_or(ShadeError::NoImages)?;
    for (i, img) in rest.iter().enumerate() {
        if !first.same_grid(img) {
            return Err(ShadeError::ShapeMismatch(format!(
                "image {} is {}x{} on {:?} but image 0 is {}x{} on {:?}",
                i + 1,
                img.height(),
                img.width(),
                img.coords().dims(),
                first.height(),
                first.width(),
                first.coords().dims(),
            )));
        }
    }
    if rest.is_empty() {
        return Ok((*first).clone());
    }
    log::trace!("stack: {} images with {how}", images.len());

    Ok(PixelImage::from_fn(first.coords().clone(), |y, x| {
        how.reduce(images.iter().map(|img| img.pixel(y, x)))
    }))
}

/// Draw `img` over a solid opaque `color`. `None` returns a copy.
pub fn set_background(img: &PixelImage, color: Option<&ColorSpec>) -> Result<PixelImage> {
    let Some(spec) = color else {
        return Ok(img.clone());
    };
    let background = Rgba8::opaque(spec.resolve()?).pack();
    Ok(PixelImage::from_fn(img.coords().clone(), |y, x| {
        CompositeOp::Over.blend(img.pixel(y, x), background)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Coords;
    use crate::pixel::TRANSPARENT;

    fn pair() -> (PixelImage, PixelImage) {
        let a = PixelImage::from_rows(&[[0xff00_ffff_u32, 0], [0, 0xff00_ff7d]]).unwrap();
        let b = PixelImage::from_rows(&[[0u32, 0], [0x0000_00ff, 0x7d7d_7dff]]).unwrap();
        (a, b)
    }

    #[test]
    fn test_later_images_on_top() {
        let (a, b) = pair();
        let out = stack(&[&a, &b], CompositeOp::Over).unwrap();
        assert_eq!(out.data(), &[0xff00_ffff, 0, 0, 0xff3d_bfbc]);
        let out = stack(&[&b, &a], CompositeOp::Over).unwrap();
        assert_eq!(out.data(), a.data());
    }

    #[test]
    fn test_single_image_is_copied() {
        let (a, _) = pair();
        assert_eq!(stack(&[&a], CompositeOp::Add).unwrap(), a);
    }

    #[test]
    fn test_empty_and_mismatched_inputs() {
        assert_eq!(stack(&[], CompositeOp::Over), Err(ShadeError::NoImages));
        let (a, _) = pair();
        let wide = PixelImage::transparent(Coords::with_shape(2, 3));
        assert!(matches!(
            stack(&[&a, &wide], CompositeOp::Over),
            Err(ShadeError::ShapeMismatch(_))
        ));
        let relabeled = a
            .clone()
            .with_coords(Coords::new(["lat", "lon"], vec![0.0, 1.0], vec![0.0, 1.0]))
            .unwrap();
        assert!(stack(&[&a, &relabeled], CompositeOp::Over).is_err());
    }

    #[test]
    fn test_three_images() {
        let p = 0x7d00_007d;
        let img = PixelImage::from_rows(&[[p]]).unwrap();
        let out = stack(&[&img, &img, &img], CompositeOp::Over).unwrap();
        assert_eq!(out.data(), &[0xdc00_007d]);
    }

    #[test]
    fn test_set_background() {
        let (a, b) = pair();
        let black = ColorSpec::from("black");
        let out = set_background(&b, Some(&black)).unwrap();
        assert_eq!(out.pixel(0, 0), 0xff00_0000);
        assert_eq!(out.pixel(1, 1), 0xff3d_3d7d);
        assert_eq!(set_background(&a, None).unwrap(), a);
        assert!(set_background(&a, Some(&ColorSpec::from("nope"))).is_err());
        assert!(out.data().iter().all(|&p| p != TRANSPARENT));
    }
}
