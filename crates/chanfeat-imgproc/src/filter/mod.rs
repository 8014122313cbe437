//! Constant-time separable smoothing filters.
//!
//! All filters here run in O(pixels) independent of the kernel radius by
//! maintaining running sums down each column. Borders reflect the image
//! about the edge (edge sample included) rather than zero-padding, and a
//! stride subsamples the full-resolution result by keeping every s-th
//! row and column.

mod box_filter;
mod max_filter;
mod tri_filter;

pub use box_filter::{box_filter, two_tap_filter};
pub use max_filter::max_filter;
pub use tri_filter::{tri1_filter, tri_filter};

use chanfeat_image::{Image, ImageError};

// smallest spatial extent the column sweeps support
const MIN_DIM: usize = 4;

pub(crate) fn check_filter_args(
    src: &Image<f32>,
    dst: &Image<f32>,
    radius: usize,
    stride: usize,
    max_stride: usize,
) -> Result<(), ImageError> {
    let m = src.height().min(src.width());
    if m < MIN_DIM {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            MIN_DIM,
            MIN_DIM,
        ));
    }
    if stride < 1 || stride > max_stride {
        return Err(ImageError::InvalidStride(stride));
    }
    if radius >= m / 2 {
        return Err(ImageError::InvalidKernelRadius(radius, m));
    }
    let (eh, ew) = (src.height() / stride, src.width() / stride);
    if dst.height() != eh || dst.width() != ew {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            ew,
            eh,
        ));
    }
    if dst.channels() != src.channels() {
        return Err(ImageError::InvalidChannelDepth(
            dst.channels(),
            "same depth as source",
        ));
    }
    Ok(())
}
