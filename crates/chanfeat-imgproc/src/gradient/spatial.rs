use chanfeat_image::{Image, ImageError};

use crate::parallel;

// gradients for one column of one plane; interior samples use central
// differences, the first and last row/column a one-sided difference at
// full scale to make up for the missing neighbor
pub(crate) fn grad_col(plane: &[f32], gx: &mut [f32], gy: &mut [f32], h: usize, w: usize, x: usize) {
    let (xp, xn, rx) = if x == 0 {
        (0, 1, 1.0)
    } else if x == w - 1 {
        (w - 2, w - 1, 1.0)
    } else {
        (x - 1, x + 1, 0.5)
    };
    let cp = &plane[xp * h..xp * h + h];
    let cn = &plane[xn * h..xn * h + h];
    for y in 0..h {
        gx[y] = (cn[y] - cp[y]) * rx;
    }

    let c = &plane[x * h..x * h + h];
    gy[0] = c[1] - c[0];
    for y in 1..h - 1 {
        gy[y] = (c[y + 1] - c[y - 1]) * 0.5;
    }
    gy[h - 1] = c[h - 1] - c[h - 2];
}

/// Compute x and y derivatives of every channel.
///
/// `gx` and `gy` must match the source shape and depth; the source must be
/// at least 2x2.
pub fn spatial_gradient(
    src: &Image<f32>,
    gx: &mut Image<f32>,
    gy: &mut Image<f32>,
) -> Result<(), ImageError> {
    super::check_min_extent(src, 2)?;
    super::check_same_shape(src, gx, src.channels())?;
    super::check_same_shape(src, gy, src.channels())?;

    let (h, w) = (src.height(), src.width());
    let src_data = src.as_slice();
    parallel::par_iter_cols_two(gx, gy, |idx, gxc, gyc| {
        let (c, x) = (idx / w, idx % w);
        let plane = &src_data[c * h * w..(c + 1) * h * w];
        grad_col(plane, gxc, gyc, h, w, x);
    });
    Ok(())
}
