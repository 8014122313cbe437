//! Colorspace conversions for planar RGB images.
//!
//! Inputs are expected in the `[0, 1]` range after applying the
//! normalization factor; pass `1.0 / 255.0` for 8-bit data.

mod gray;
mod hsv;
mod luv;

pub use gray::gray_from_rgb;
pub use hsv::hsv_from_rgb;
pub use luv::luv_from_rgb;

use chanfeat_image::{Image, ImageError};
use rayon::prelude::*;

/// The target colorspace of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Luma-weighted grayscale; each RGB triplet collapses to one plane.
    Gray,
    /// Scale by the normalization factor only, depth unchanged.
    Normalize,
    /// CIE LUV with offset U/V so all channels are non-negative.
    Luv,
    /// Hue, saturation, value; hue in `[0, 1)`.
    Hsv,
}

impl ColorMode {
    /// Output channel depth for a source of depth `d`, or `None` when the
    /// depth is invalid for this mode.
    pub fn output_channels(&self, d: usize) -> Option<usize> {
        match self {
            ColorMode::Normalize => Some(d),
            ColorMode::Gray if d == 1 => Some(1),
            ColorMode::Gray if d % 3 == 0 => Some(d / 3),
            ColorMode::Luv | ColorMode::Hsv if d % 3 == 0 => Some(d),
            _ => None,
        }
    }
}

/// Convert an image to the given colorspace.
///
/// The source depth must be a multiple of 3 for the triplet-based modes;
/// each consecutive RGB triplet converts independently. As a special case,
/// a single-channel source under [`ColorMode::Gray`] is only normalized.
/// The destination must match the source extent with depth
/// [`ColorMode::output_channels`].
pub fn convert(
    src: &Image<f32>,
    dst: &mut Image<f32>,
    mode: ColorMode,
    norm: f32,
) -> Result<(), ImageError> {
    let expected = match mode.output_channels(src.channels()) {
        Some(d) => d,
        None => {
            return Err(ImageError::InvalidChannelDepth(
                src.channels(),
                "a multiple of 3",
            ))
        }
    };
    if dst.channels() != expected {
        return Err(ImageError::InvalidChannelDepth(
            dst.channels(),
            "the depth implied by the conversion mode",
        ));
    }

    match mode {
        ColorMode::Normalize => normalize(src, dst, norm),
        ColorMode::Gray if src.channels() == 1 => normalize(src, dst, norm),
        ColorMode::Gray => gray_from_rgb(src, dst, norm),
        ColorMode::Luv => luv_from_rgb(src, dst, norm),
        ColorMode::Hsv => hsv_from_rgb(src, dst, norm),
    }
}

/// Copy the image, scaling every value by `norm`.
pub fn normalize(src: &Image<f32>, dst: &mut Image<f32>, norm: f32) -> Result<(), ImageError> {
    check_shapes(src, dst, src.channels())?;
    src.as_slice()
        .par_iter()
        .zip(dst.as_slice_mut().par_iter_mut())
        .for_each(|(&s, d)| *d = s * norm);
    Ok(())
}

pub(crate) fn check_shapes(
    src: &Image<f32>,
    dst: &Image<f32>,
    dst_channels: usize,
) -> Result<(), ImageError> {
    if dst.size() != src.size() {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            src.width(),
            src.height(),
        ));
    }
    if dst.channels() != dst_channels {
        return Err(ImageError::InvalidChannelDepth(
            dst.channels(),
            "the depth implied by the conversion mode",
        ));
    }
    Ok(())
}

// With a unit normalization factor the triplet conversions assume values
// already lie in [0, 1]. Checking a prefix of the data keeps the cost
// negligible while still catching unnormalized 8-bit input.
pub(crate) fn check_unit_range(src: &Image<f32>, norm: f32) -> Result<(), ImageError> {
    if norm != 1.0 {
        return Ok(());
    }
    let n = src.num_pixels();
    let n1 = src.channels() * if n < 1000 { n / 10 } else { 100 };
    const THR: f32 = 1.001;
    for &v in &src.as_slice()[..n1.min(src.as_slice().len())] {
        if v > THR {
            return Err(ImageError::InvalidPixelRange(v, THR));
        }
    }
    Ok(())
}
