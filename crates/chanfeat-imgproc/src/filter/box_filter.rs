use chanfeat_image::{Image, ImageError};

use crate::parallel;

// running-sum pass down one working column, emitting every s-th row
fn conv_box_y(col: &[f32], out: &mut [f32], r: usize, s: usize) {
    let h = col.len();
    let p = r + 1;
    let q = 2 * h - (r + 1);
    let h2 = (h / s) * s;
    let h0 = (r + 1).min(h2);
    let h1 = (h - r).min(h2);

    let mut t: f32 = col[..=r].iter().sum();
    t = 2.0 * t - col[r];

    let mut k = (s - 1) / 2;
    let mut oi = 0;
    let mut emit = |t: f32| {
        k += 1;
        if k == s {
            k = 0;
            out[oi] = t;
            oi += 1;
        }
    };
    for j in 0..h0 {
        t -= col[r - j] - col[r + j];
        emit(t);
    }
    for j in h0..h1 {
        t -= col[j - p] - col[r + j];
        emit(t);
    }
    for j in h1..h2 {
        t -= col[j - p] - col[q - j];
        emit(t);
    }
}

fn conv_box_plane(src: &[f32], dst: &mut [f32], h: usize, w: usize, r: usize, s: usize) {
    let nrm = 1.0 / ((2 * r + 1) * (2 * r + 1)) as f32;
    let hs = h / s;
    let w0 = (w / s) * s;

    // column running sum; normalization folds in here so the row pass is a
    // plain sum
    let mut t = vec![0.0f32; h];
    for i in 0..=r {
        for (tv, &v) in t.iter_mut().zip(&src[i * h..(i + 1) * h]) {
            *tv += v;
        }
    }
    for (tv, &v) in t.iter_mut().zip(&src[r * h..(r + 1) * h]) {
        *tv = nrm * (2.0 * *tv - v);
    }

    let mut k = (s - 1) / 2;
    let mut oc = 0;
    k += 1;
    if k == s {
        k = 0;
        conv_box_y(&t, &mut dst[oc * hs..(oc + 1) * hs], r, s);
        oc += 1;
    }
    for i in 1..w0 {
        let il = if i <= r { r - i } else { i - 1 - r };
        let ir = if i >= w - r { 2 * w - r - i - 1 } else { i + r };
        let (lc, rc) = (&src[il * h..il * h + h], &src[ir * h..ir * h + h]);
        for j in 0..h {
            t[j] -= nrm * (lc[j] - rc[j]);
        }
        k += 1;
        if k == s {
            k = 0;
            conv_box_y(&t, &mut dst[oc * hs..(oc + 1) * hs], r, s);
            oc += 1;
        }
    }
}

/// Smooth with a `(2r+1) x (2r+1)` box kernel, normalized to unit sum.
///
/// Borders mirror the image about the edge (edge sample included), so a
/// constant image stays constant all the way to the corners. `stride`
/// subsamples the result; the destination must be `h/stride x w/stride`
/// with the source depth. Runs in O(pixels) independent of the radius.
///
/// # Example
///
/// ```
/// use chanfeat_image::{Image, ImageSize};
/// use chanfeat_imgproc::filter::box_filter;
///
/// let size = ImageSize { width: 6, height: 6 };
/// let src = Image::<f32>::from_size_val(size, 1, 2.0).unwrap();
/// let mut dst = Image::<f32>::from_size_val(size, 1, 0.0).unwrap();
///
/// box_filter(&src, &mut dst, 1, 1).unwrap();
/// assert!((dst.as_slice()[0] - 2.0).abs() < 1e-5);
/// ```
pub fn box_filter(
    src: &Image<f32>,
    dst: &mut Image<f32>,
    radius: usize,
    stride: usize,
) -> Result<(), ImageError> {
    super::check_filter_args(src, dst, radius, stride, usize::MAX)?;

    let (h, w) = (src.height(), src.width());
    parallel::par_iter_planes(src, dst, |_, sp, dp| {
        conv_box_plane(sp, dp, h, w, radius, stride);
    });
    Ok(())
}

// [1 1] pass down one working column; `shift` selects which neighbor pairs
fn conv11_y(col: &[f32], out: &mut [f32], shift: bool, s: usize) {
    let h = col.len();
    let d = usize::from(shift);
    if s == 2 {
        let h2 = (h - d) / 2;
        for (j, o) in out.iter_mut().enumerate().take(h2) {
            *o = col[2 * j + d] + col[2 * j + d + 1];
        }
        if d == 1 && h % 2 == 0 {
            out[h2] = 2.0 * col[2 * h2 + 1];
        }
    } else {
        let mut j = 0;
        if d == 0 {
            out[0] = 2.0 * col[0];
            j = 1;
        }
        while j < h - d {
            out[j] = col[j - 1 + d] + col[j + d];
            j += 1;
        }
        if d == 1 {
            out[h - 1] = 2.0 * col[h - 1];
        }
    }
}

/// Smooth with a `2 x 2` ones kernel, normalized to unit sum.
///
/// `side` (0..=3) picks which of the four possible half-pixel alignments the
/// kernel takes: bit 0 selects the right rather than left column pair, bit 1
/// the lower rather than upper row pair. The edge pair at the border doubles
/// the edge sample. `stride` may be 1 or 2.
pub fn two_tap_filter(
    src: &Image<f32>,
    dst: &mut Image<f32>,
    side: usize,
    stride: usize,
) -> Result<(), ImageError> {
    super::check_filter_args(src, dst, 0, stride, 2)?;

    let (h, w) = (src.height(), src.width());
    let hs = h / stride;
    let shift = side % 4 >= 2;
    parallel::par_iter_planes(src, dst, |_, sp, dp| {
        let mut t = vec![0.0f32; h];
        for (oc, i) in (stride / 2..w).step_by(stride).enumerate() {
            let (mut i0, mut i1) = (i, i);
            if side % 2 == 1 {
                if i < w - 1 {
                    i1 = i + 1;
                }
            } else if i > 0 {
                i0 = i - 1;
            }
            let (c0, c1) = (&sp[i0 * h..i0 * h + h], &sp[i1 * h..i1 * h + h]);
            for j in 0..h {
                t[j] = 0.25 * (c0[j] + c1[j]);
            }
            conv11_y(&t, &mut dp[oc * hs..(oc + 1) * hs], shift, stride);
        }
    });
    Ok(())
}
