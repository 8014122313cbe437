use chanfeat_image::{Image, ImageError};
use rayon::prelude::*;

// ITU-R BT.601 luma weights (full precision).
const RW: f32 = 0.2989360213;
const GW: f32 = 0.5870430745;
const BW: f32 = 0.1140209043;

/// Convert planar RGB to grayscale with a luma-weighted sum.
///
/// The source depth must be a multiple of 3; each RGB triplet produces one
/// output plane, so the destination depth is `src.channels() / 3`. `norm`
/// scales the result, pass `1.0 / 255.0` for 8-bit data.
///
/// # Example
///
/// ```
/// use chanfeat_image::{Image, ImageSize};
/// use chanfeat_imgproc::color::gray_from_rgb;
///
/// let size = ImageSize { width: 2, height: 1 };
/// let src = Image::<f32>::new(size, 3, vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0]).unwrap();
/// let mut dst = Image::<f32>::from_size_val(size, 1, 0.0).unwrap();
///
/// gray_from_rgb(&src, &mut dst, 1.0).unwrap();
/// assert!((dst.as_slice()[0] - 1.0).abs() < 1e-6);
/// ```
pub fn gray_from_rgb(src: &Image<f32>, dst: &mut Image<f32>, norm: f32) -> Result<(), ImageError> {
    if src.channels() % 3 != 0 {
        return Err(ImageError::InvalidChannelDepth(
            src.channels(),
            "a multiple of 3",
        ));
    }
    super::check_shapes(src, dst, src.channels() / 3)?;
    if src.is_empty() {
        return Ok(());
    }

    let (mr, mg, mb) = (RW * norm, GW * norm, BW * norm);
    let h = src.height();

    for k in 0..src.channels() / 3 {
        let r = src.plane(3 * k)?;
        let g = src.plane(3 * k + 1)?;
        let b = src.plane(3 * k + 2)?;
        let out = dst.plane_mut(k)?;

        out.par_chunks_exact_mut(h)
            .enumerate()
            .for_each(|(x, col)| {
                let o = x * h;
                for (y, v) in col.iter_mut().enumerate() {
                    *v = r[o + y] * mr + g[o + y] * mg + b[o + y] * mb;
                }
            });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanfeat_image::{Image, ImageError, ImageSize};

    #[test]
    fn gray_weights_sum_to_one() {
        assert!((RW + GW + BW - 1.0).abs() < 1e-6);
    }

    #[test]
    fn gray_pure_channels() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 1,
        };
        // column-major planar: R plane, G plane, B plane
        let src = Image::new(
            size,
            3,
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        )?;
        let mut dst = Image::from_size_val(size, 1, 0.0)?;
        gray_from_rgb(&src, &mut dst, 1.0)?;

        assert!((dst.as_slice()[0] - RW).abs() < 1e-6);
        assert!((dst.as_slice()[1] - GW).abs() < 1e-6);
        assert!((dst.as_slice()[2] - BW).abs() < 1e-6);

        Ok(())
    }

    #[test]
    fn gray_two_triplets() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 1,
            height: 1,
        };
        let src = Image::new(size, 6, vec![1.0, 1.0, 1.0, 0.0, 0.0, 2.0])?;
        let mut dst = Image::from_size_val(size, 2, 0.0)?;
        gray_from_rgb(&src, &mut dst, 1.0)?;

        assert!((dst.as_slice()[0] - 1.0).abs() < 1e-6);
        assert!((dst.as_slice()[1] - 2.0 * BW).abs() < 1e-6);

        Ok(())
    }

    #[test]
    fn gray_applies_norm() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 1,
            height: 1,
        };
        let src = Image::new(size, 3, vec![255.0, 255.0, 255.0])?;
        let mut dst = Image::from_size_val(size, 1, 0.0)?;
        gray_from_rgb(&src, &mut dst, 1.0 / 255.0)?;

        assert!((dst.as_slice()[0] - 1.0).abs() < 1e-5);

        Ok(())
    }
}
