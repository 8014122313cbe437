use chanfeat_image::{Image, ImageError, ImageSize};

use crate::parallel;

/// A border policy for padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingMode {
    /// Fill the border with a single constant value.
    ///
    /// Example: ...d c b a | v v v v...
    Constant,

    /// Repeat the outermost row or column into the border.
    ///
    /// Example: ...d c b a | a a a a...
    Replicate,

    /// Mirror the image about the edge, edge row/column included.
    ///
    /// Example: ...d c b a | a b c d...
    Symmetric,

    /// Wrap the content from the opposite side.
    ///
    /// Example: ...d c b a | w x y z...
    Circular,
}

impl PaddingMode {
    /// Maps a (possibly out-of-range) source coordinate to a valid index in
    /// `[0, len)` according to the padding mode.
    ///
    /// Margins larger than `len` resolve by wrapping or reflecting multiple
    /// times. Returns `None` for out-of-range coordinates under `Constant`.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        let n = len as isize;
        match self {
            PaddingMode::Constant => {
                if i < 0 || i >= n {
                    None
                } else {
                    Some(i as usize)
                }
            }
            PaddingMode::Replicate => Some(i.clamp(0, n - 1) as usize),
            PaddingMode::Symmetric => {
                let z = (i % (2 * n) + 2 * n) % (2 * n);
                Some(if z < n { z as usize } else { (2 * n - z - 1) as usize })
            }
            PaddingMode::Circular => Some(((i % n + n) % n) as usize),
        }
    }
}

/// Per-edge padding margins in pixels; negative values crop instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadShape {
    /// Margin added above the first row.
    pub top: isize,
    /// Margin added below the last row.
    pub bottom: isize,
    /// Margin added left of the first column.
    pub left: isize,
    /// Margin added right of the last column.
    pub right: isize,
}

impl PadShape {
    /// Same margin on all four edges.
    pub fn uniform(p: isize) -> Self {
        Self {
            top: p,
            bottom: p,
            left: p,
            right: p,
        }
    }

    /// The output size resulting from applying these margins to `size`.
    ///
    /// A dimension collapses to zero when the margins produce a negative
    /// extent or when a crop along either edge consumes the whole source
    /// dimension.
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        let clamp_dim = |d: usize, lo: isize, hi: isize| -> usize {
            let d = d as isize;
            let out = d + lo + hi;
            if out < 0 || d <= -lo || d <= -hi {
                0
            } else {
                out as usize
            }
        };
        ImageSize {
            width: clamp_dim(size.width, self.left, self.right),
            height: clamp_dim(size.height, self.top, self.bottom),
        }
    }

    /// The margins that undo these margins (pad becomes crop and vice versa).
    pub fn inverse(&self) -> Self {
        Self {
            top: -self.top,
            bottom: -self.bottom,
            left: -self.left,
            right: -self.right,
        }
    }
}

/// Pad (or crop) an image by per-edge margins with the given border policy.
///
/// The destination must be pre-sized to [`PadShape::padded_size`] with the
/// same channel depth. Negative margins crop; cropping and padding mix freely
/// per edge. Margins larger than the source dimension resolve by repeated
/// wrapping/reflection via precomputed per-axis index lookup tables. An empty
/// destination is a success, not an error. `value` fills the border under
/// [`PaddingMode::Constant`] and is also the fill for an empty source.
///
/// # Example
///
/// ```
/// use chanfeat_image::{Image, ImageSize};
/// use chanfeat_imgproc::padding::{pad, PaddingMode, PadShape};
///
/// let src = Image::<f32>::new(
///     ImageSize { width: 2, height: 2 },
///     1,
///     vec![1.0, 2.0, 3.0, 4.0],
/// ).unwrap();
///
/// let shape = PadShape::uniform(1);
/// let mut dst = Image::<f32>::from_size_val(shape.padded_size(src.size()), 1, 0.0).unwrap();
///
/// pad(&src, &mut dst, &shape, PaddingMode::Replicate, 0.0).unwrap();
/// assert_eq!(dst.get(0, 0, 0), Some(&1.0));
/// ```
pub fn pad<T>(
    src: &Image<T>,
    dst: &mut Image<T>,
    shape: &PadShape,
    mode: PaddingMode,
    value: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let expected = shape.padded_size(src.size());
    if dst.size() != expected {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            expected.width,
            expected.height,
        ));
    }
    if dst.channels() != src.channels() {
        return Err(ImageError::InvalidChannelDepth(
            dst.channels(),
            "same depth as source",
        ));
    }

    if dst.is_empty() {
        return Ok(());
    }

    if src.is_empty() {
        dst.as_slice_mut().fill(value);
        return Ok(());
    }

    let (h, w) = (src.height(), src.width());
    let (hb, wb) = (dst.height(), dst.width());

    // per-axis source index tables; None means constant fill
    let xs: Vec<Option<usize>> = (0..wb)
        .map(|x| mode.map_index(x as isize - shape.left, w))
        .collect();
    let ys: Vec<Option<usize>> = (0..hb)
        .map(|y| mode.map_index(y as isize - shape.top, h))
        .collect();

    parallel::par_iter_planes(src, dst, |_, src_plane, dst_plane| {
        for (x, dst_col) in dst_plane.chunks_exact_mut(hb).enumerate() {
            match xs[x] {
                Some(sx) => {
                    let src_col = &src_plane[sx * h..(sx + 1) * h];
                    for (y, d) in dst_col.iter_mut().enumerate() {
                        *d = match ys[y] {
                            Some(sy) => src_col[sy],
                            None => value,
                        };
                    }
                }
                None => dst_col.fill(value),
            }
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanfeat_image::{Image, ImageError, ImageSize};

    fn make_src_2x2() -> Result<Image<f32>, ImageError> {
        // columns: [1, 2], [3, 4]
        Image::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            1,
            vec![1.0, 2.0, 3.0, 4.0],
        )
    }

    fn padded(src: &Image<f32>, shape: &PadShape, mode: PaddingMode) -> Image<f32> {
        let mut dst =
            Image::from_size_val(shape.padded_size(src.size()), src.channels(), 0.0).unwrap();
        pad(src, &mut dst, shape, mode, 9.0).unwrap();
        dst
    }

    #[test]
    fn pad_constant() -> Result<(), ImageError> {
        let src = make_src_2x2()?;
        let dst = padded(&src, &PadShape::uniform(1), PaddingMode::Constant);

        assert_eq!(dst.size().width, 4);
        assert_eq!(dst.size().height, 4);
        assert_eq!(dst.get(0, 0, 0), Some(&9.0));
        assert_eq!(dst.get(3, 3, 0), Some(&9.0));
        assert_eq!(dst.get(1, 1, 0), Some(&1.0));
        assert_eq!(dst.get(2, 2, 0), Some(&4.0));

        Ok(())
    }

    #[test]
    fn pad_replicate() -> Result<(), ImageError> {
        let src = make_src_2x2()?;
        let dst = padded(&src, &PadShape::uniform(1), PaddingMode::Replicate);

        assert_eq!(dst.get(0, 0, 0), Some(&1.0));
        assert_eq!(dst.get(3, 3, 0), Some(&4.0));
        assert_eq!(dst.get(0, 2, 0), Some(&3.0));

        Ok(())
    }

    #[test]
    fn pad_symmetric_includes_edge() -> Result<(), ImageError> {
        let src = make_src_2x2()?;
        let dst = padded(&src, &PadShape::uniform(1), PaddingMode::Symmetric);

        // mirror with edge duplication: first padded row repeats the edge row
        assert_eq!(dst.get(0, 1, 0), Some(&1.0));
        assert_eq!(dst.get(3, 1, 0), Some(&2.0));
        assert_eq!(dst.get(1, 0, 0), Some(&1.0));
        assert_eq!(dst.get(1, 3, 0), Some(&3.0));

        Ok(())
    }

    #[test]
    fn pad_circular() -> Result<(), ImageError> {
        let src = make_src_2x2()?;
        let dst = padded(&src, &PadShape::uniform(1), PaddingMode::Circular);

        // wrap: the row above row 0 is the last source row
        assert_eq!(dst.get(0, 1, 0), Some(&2.0));
        assert_eq!(dst.get(3, 1, 0), Some(&1.0));
        assert_eq!(dst.get(1, 0, 0), Some(&3.0));

        Ok(())
    }

    #[test]
    fn pad_crop() -> Result<(), ImageError> {
        let src = make_src_2x2()?;
        let shape = PadShape {
            top: -1,
            bottom: 0,
            left: 0,
            right: -1,
        };
        let dst = padded(&src, &shape, PaddingMode::Constant);

        assert_eq!(
            dst.size(),
            ImageSize {
                width: 1,
                height: 1
            }
        );
        assert_eq!(dst.get(0, 0, 0), Some(&2.0));

        Ok(())
    }

    #[test]
    fn pad_round_trip() -> Result<(), ImageError> {
        let src = Image::new(
            ImageSize {
                width: 3,
                height: 4,
            },
            2,
            (0..24).map(|i| i as f32).collect(),
        )?;

        let shape = PadShape {
            top: 2,
            bottom: 1,
            left: 3,
            right: 2,
        };
        for mode in [PaddingMode::Constant, PaddingMode::Replicate] {
            let mut mid = Image::from_size_val(shape.padded_size(src.size()), 2, 0.0)?;
            pad(&src, &mut mid, &shape, mode, 7.0)?;

            let inv = shape.inverse();
            let mut back = Image::from_size_val(inv.padded_size(mid.size()), 2, 0.0)?;
            pad(&mid, &mut back, &inv, mode, 7.0)?;

            assert_eq!(back.as_slice(), src.as_slice());
        }

        Ok(())
    }

    #[test]
    fn pad_margins_larger_than_image() -> Result<(), ImageError> {
        let src = make_src_2x2()?;
        let dst = padded(&src, &PadShape::uniform(5), PaddingMode::Circular);

        // period-2 wrap everywhere
        for y in 0..12 {
            for x in 0..12 {
                let expected = src.get(((y as isize - 5).rem_euclid(2)) as usize,
                    ((x as isize - 5).rem_euclid(2)) as usize, 0);
                assert_eq!(dst.get(y, x, 0), expected);
            }
        }

        let dst = padded(&src, &PadShape::uniform(5), PaddingMode::Symmetric);
        // reflections of a 2x2 tile have period 4
        assert_eq!(dst.get(0, 5, 0), dst.get(4, 5, 0));

        Ok(())
    }

    #[test]
    fn pad_empty_result() -> Result<(), ImageError> {
        let src = make_src_2x2()?;
        let shape = PadShape {
            top: -2,
            bottom: 0,
            left: 1,
            right: 1,
        };
        let size = shape.padded_size(src.size());
        assert_eq!(size.height, 0);

        let mut dst = Image::from_size_val(size, 1, 0.0)?;
        pad(&src, &mut dst, &shape, PaddingMode::Replicate, 0.0)?;
        assert!(dst.is_empty());

        Ok(())
    }

    #[test]
    fn pad_size_mismatch() -> Result<(), ImageError> {
        let src = make_src_2x2()?;
        let mut dst = Image::from_size_val(src.size(), 1, 0.0)?;
        let res = pad(
            &src,
            &mut dst,
            &PadShape::uniform(1),
            PaddingMode::Replicate,
            0.0,
        );
        assert!(res.is_err());

        Ok(())
    }
}
