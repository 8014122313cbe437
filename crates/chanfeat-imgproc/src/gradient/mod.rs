//! Gradient, orientation histogram, and HOG computation.
//!
//! The stages chain: [`spatial_gradient`] produces per-channel derivatives,
//! [`gradient_mag`] reduces them to a dominant-channel magnitude and
//! unsigned orientation field, [`gradient_hist`] quantizes that field into a
//! block-grid orientation histogram, and [`hog`] block-normalizes the
//! histogram into HOG descriptors.

mod hist;
mod hog;
mod mag;
mod spatial;

pub use hist::gradient_hist;
pub use hog::hog;
pub use mag::{gradient_mag, gradient_mag_norm};
pub use spatial::spatial_gradient;

use chanfeat_image::{Image, ImageError};

pub(crate) fn check_min_extent(src: &Image<f32>, min: usize) -> Result<(), ImageError> {
    if src.height() < min || src.width() < min {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            min,
            min,
        ));
    }
    Ok(())
}

pub(crate) fn check_same_shape(
    src: &Image<f32>,
    other: &Image<f32>,
    channels: usize,
) -> Result<(), ImageError> {
    if other.size() != src.size() {
        return Err(ImageError::InvalidImageSize(
            other.width(),
            other.height(),
            src.width(),
            src.height(),
        ));
    }
    if other.channels() != channels {
        return Err(ImageError::InvalidChannelDepth(
            other.channels(),
            "depth required by the operation",
        ));
    }
    Ok(())
}
