//! Integral images for O(1) rectangle sums.

use chanfeat_image::{Image, ImageError, ImageSize};

/// Summed-area tables over a single-channel image.
///
/// Holds both plain and squared sums in `(h+1) x (w+1)` tables with a zero
/// first row and column, so any inclusive pixel rectangle reduces to four
/// corner lookups. Sums accumulate in `f64` to keep large rectangles
/// accurate. A region of interest translates rectangle coordinates and
/// carries the region's mean and standard deviation for normalization.
///
/// # Example
///
/// ```
/// use chanfeat_image::{Image, ImageSize};
/// use chanfeat_imgproc::integral::IntegralImage;
///
/// let img = Image::<f32>::from_size_val(
///     ImageSize { width: 8, height: 8 }, 1, 2.0,
/// ).unwrap();
/// let ii = IntegralImage::new(&img).unwrap();
///
/// // 3x2 rectangle of 2.0-valued pixels
/// assert_eq!(ii.rect_sum(1, 1, 3, 2), 12.0);
/// ```
#[derive(Debug, Clone)]
pub struct IntegralImage {
    ii: Vec<f64>,
    ii_sq: Vec<f64>,
    // table extents, one larger than the image
    h: usize,
    w: usize,
    roi: (usize, usize, usize, usize),
    roi_mu: f64,
    roi_sig: f64,
}

impl IntegralImage {
    /// Build the summed-area tables for a single-channel image.
    pub fn new(src: &Image<f32>) -> Result<Self, ImageError> {
        if src.channels() != 1 {
            return Err(ImageError::InvalidChannelDepth(src.channels(), "1"));
        }
        if src.is_empty() {
            return Err(ImageError::EmptyExtent(src.width(), src.height()));
        }

        let (ih, iw) = (src.height(), src.width());
        let (h, w) = (ih + 1, iw + 1);
        let mut ii = vec![0.0f64; h * w];
        let mut ii_sq = vec![0.0f64; h * w];

        // tables are row-major with the zero row/column at index 0
        let data = src.as_slice();
        for j in 1..h {
            for i in 1..w {
                let v = data[(i - 1) * ih + (j - 1)] as f64;
                let idx = j * w + i;
                ii[idx] = ii[idx - w] + ii[idx - 1] - ii[idx - w - 1] + v;
                ii_sq[idx] = ii_sq[idx - w] + ii_sq[idx - 1] - ii_sq[idx - w - 1] + v * v;
            }
        }

        Ok(Self {
            ii,
            ii_sq,
            h,
            w,
            roi: (0, 0, iw - 1, ih - 1),
            roi_mu: 0.0,
            roi_sig: 1.0,
        })
    }

    /// Height of the underlying image.
    pub fn height(&self) -> usize {
        self.h - 1
    }

    /// Width of the underlying image.
    pub fn width(&self) -> usize {
        self.w - 1
    }

    /// Extent of the underlying image.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width(),
            height: self.height(),
        }
    }

    #[inline]
    fn corners(&self, table: &[f64], lf: usize, tp: usize, rt: usize, bt: usize) -> f64 {
        let (lf, rt) = (lf + self.roi.0, rt + self.roi.0 + 1);
        let (tp, bt) = (tp + self.roi.1, bt + self.roi.1 + 1);
        debug_assert!(bt < self.h && rt < self.w && tp < bt && lf < rt);
        table[tp * self.w + lf] + table[bt * self.w + rt]
            - table[tp * self.w + rt]
            - table[bt * self.w + lf]
    }

    /// Sum of pixel values over the inclusive rectangle `[lf, rt] x [tp, bt]`,
    /// in coordinates relative to the region of interest.
    pub fn rect_sum(&self, lf: usize, tp: usize, rt: usize, bt: usize) -> f64 {
        self.corners(&self.ii, lf, tp, rt, bt)
    }

    /// Sum of squared pixel values over the same rectangle as [`Self::rect_sum`].
    pub fn rect_sum_sq(&self, lf: usize, tp: usize, rt: usize, bt: usize) -> f64 {
        self.corners(&self.ii_sq, lf, tp, rt, bt)
    }

    /// Restrict subsequent rectangle queries to the given region (inclusive,
    /// absolute image coordinates) and cache its mean and deviation.
    pub fn set_roi(&mut self, lf: usize, tp: usize, rt: usize, bt: usize) {
        if self.roi == (lf, tp, rt, bt) {
            return;
        }
        self.roi = (0, 0, 0, 0);
        let area_inv = 1.0 / ((rt - lf + 1) * (bt - tp + 1)) as f64;
        let m1 = self.rect_sum(lf, tp, rt, bt) * area_inv;
        let m2 = self.rect_sum_sq(lf, tp, rt, bt) * area_inv;
        self.roi_mu = m1;
        self.roi_sig = (m2 - m1 * m1).max(0.0).sqrt() + 1e-6;
        self.roi = (lf, tp, rt, bt);
    }

    /// The current region of interest as `(lf, tp, rt, bt)`.
    pub fn roi(&self) -> (usize, usize, usize, usize) {
        self.roi
    }

    /// Mean pixel value of the current region of interest.
    pub fn roi_mean(&self) -> f64 {
        self.roi_mu
    }

    /// Standard deviation of the current region of interest, floored away
    /// from zero so it can be divided by.
    pub fn roi_sigma(&self) -> f64 {
        self.roi_sig
    }
}
