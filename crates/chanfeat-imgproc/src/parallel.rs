use rayon::prelude::*;

use chanfeat_image::Image;

/// Apply a function to each (source plane, destination plane) pair in
/// parallel.
///
/// The planar column-major layout makes the channel plane the natural unit of
/// parallelism: planes are independent in every pass of the pipeline. Source
/// and destination may have different plane sizes (e.g. resampling) but must
/// have the same channel depth.
pub fn par_iter_planes<T1, T2>(
    src: &Image<T1>,
    dst: &mut Image<T2>,
    f: impl Fn(usize, &[T1], &mut [T2]) + Send + Sync,
) where
    T1: Copy + Send + Sync,
    T2: Copy + Send + Sync,
{
    let src_plane = src.num_pixels();
    let dst_plane = dst.num_pixels();

    src.as_slice()
        .par_chunks_exact(src_plane.max(1))
        .zip(dst.as_slice_mut().par_chunks_exact_mut(dst_plane.max(1)))
        .enumerate()
        .for_each(|(c, (src_chunk, dst_chunk))| {
            f(c, src_chunk, dst_chunk);
        });
}

/// Apply a function to each destination column in parallel.
///
/// Columns are contiguous runs of `height` values; the closure receives the
/// flattened column index `c * width + x` together with the column slice.
pub fn par_iter_cols<T>(dst: &mut Image<T>, f: impl Fn(usize, &mut [T]) + Send + Sync)
where
    T: Copy + Send + Sync,
{
    let h = dst.height();
    dst.as_slice_mut()
        .par_chunks_exact_mut(h.max(1))
        .enumerate()
        .for_each(|(i, col)| {
            f(i, col);
        });
}

/// Apply a function to each pair of same-index destination columns of two
/// images in parallel (e.g. the magnitude and orientation outputs).
pub fn par_iter_cols_two<T>(
    dst1: &mut Image<T>,
    dst2: &mut Image<T>,
    f: impl Fn(usize, &mut [T], &mut [T]) + Send + Sync,
) where
    T: Copy + Send + Sync,
{
    let h = dst1.height();
    dst1.as_slice_mut()
        .par_chunks_exact_mut(h.max(1))
        .zip(dst2.as_slice_mut().par_chunks_exact_mut(h.max(1)))
        .enumerate()
        .for_each(|(i, (col1, col2))| {
            f(i, col1, col2);
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chanfeat_image::{Image, ImageError, ImageSize};

    #[test]
    fn planes_scale() -> Result<(), ImageError> {
        let src = Image::<f32>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            2,
            vec![1., 2., 3., 4., 5., 6., 7., 8.],
        )?;
        let mut dst = Image::<f32>::from_size_val(src.size(), 2, 0.0)?;

        par_iter_planes(&src, &mut dst, |c, s, d| {
            for (si, di) in s.iter().zip(d.iter_mut()) {
                *di = si * (c + 1) as f32;
            }
        });

        assert_eq!(dst.plane(0)?, &[1., 2., 3., 4.]);
        assert_eq!(dst.plane(1)?, &[10., 12., 14., 16.]);

        Ok(())
    }

    #[test]
    fn cols_index() -> Result<(), ImageError> {
        let mut dst = Image::<f32>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            1,
            0.0,
        )?;

        par_iter_cols(&mut dst, |i, col| {
            for v in col.iter_mut() {
                *v = i as f32;
            }
        });

        assert_eq!(dst.as_slice(), &[0., 0., 1., 1., 2., 2.]);

        Ok(())
    }
}
