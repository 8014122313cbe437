use chanfeat_image::{Image, ImageError};

use crate::parallel;

// triangle pass down one working column via the double running sum
// `u[j] = u[j-1] + (t[j] = t[j-1] + second difference)`; rr is radius + 1
fn conv_tri_y(col: &[f32], out: &mut [f32], rr: usize, s: usize) {
    let h = col.len();
    let r = rr;
    let r0 = r - 1;
    let r1 = r + 1;
    let r2 = 2 * h - r;
    let h2 = (h / s) * s;
    let h0 = (r + 1).min(h2);
    let h1 = (h - r + 1).min(h2);

    let mut t = col[0];
    let mut u = col[0];
    for &v in &col[1..r] {
        t += v;
        u += t;
    }
    u = 2.0 * u - t;
    t = 0.0;

    let mut k = (s - 1) / 2;
    let mut oi = 0;
    let mut emit = |u: f32| {
        k += 1;
        if k == s {
            k = 0;
            out[oi] = u;
            oi += 1;
        }
    };
    emit(u);
    for j in 1..h0 {
        t += col[r - j] + col[r0 + j] - 2.0 * col[j - 1];
        u += t;
        emit(u);
    }
    for j in h0..h1 {
        t += col[j - r1] + col[r0 + j] - 2.0 * col[j - 1];
        u += t;
        emit(u);
    }
    for j in h1..h2 {
        t += col[j - r1] + col[r2 - j] - 2.0 * col[j - 1];
        u += t;
        emit(u);
    }
}

fn conv_tri_plane(src: &[f32], dst: &mut [f32], h: usize, w: usize, radius: usize, s: usize) {
    let rr = radius + 1;
    let nrm = 1.0 / (rr * rr * rr * rr) as f32;
    let hs = h / s;
    let w0 = (w / s) * s;

    let mut t = src[..h].to_vec();
    let mut u = src[..h].to_vec();
    for i in 1..rr {
        for j in 0..h {
            t[j] += src[i * h + j];
            u[j] += t[j];
        }
    }
    for j in 0..h {
        u[j] = nrm * (2.0 * u[j] - t[j]);
        t[j] = 0.0;
    }

    let mut k = (s - 1) / 2;
    let mut oc = 0;
    k += 1;
    if k == s {
        k = 0;
        conv_tri_y(&u, &mut dst[oc * hs..(oc + 1) * hs], rr, s);
        oc += 1;
    }
    for i in 1..w0 {
        let il = if i <= rr { rr - i } else { i - 1 - rr };
        let im = i - 1;
        let ir = if i > w - rr { 2 * w - rr - i } else { i - 1 + rr };
        for j in 0..h {
            t[j] += src[il * h + j] + src[ir * h + j] - 2.0 * src[im * h + j];
            u[j] += nrm * t[j];
        }
        k += 1;
        if k == s {
            k = 0;
            conv_tri_y(&u, &mut dst[oc * hs..(oc + 1) * hs], rr, s);
            oc += 1;
        }
    }
}

/// Smooth with a separable triangle (tent) kernel of the given radius.
///
/// The 1D kernel is `[1, 2, ..., r+1, ..., 2, 1] / (r+1)^2`, equivalent to
/// two cascaded box filters, and runs in O(pixels) via a double running
/// sum. Borders mirror about the edge as in [`super::box_filter`];
/// `stride` subsamples the result into an `h/stride x w/stride`
/// destination.
pub fn tri_filter(
    src: &Image<f32>,
    dst: &mut Image<f32>,
    radius: usize,
    stride: usize,
) -> Result<(), ImageError> {
    super::check_filter_args(src, dst, radius, stride, usize::MAX)?;

    let (h, w) = (src.height(), src.width());
    parallel::par_iter_planes(src, dst, |_, sp, dp| {
        conv_tri_plane(sp, dp, h, w, radius, stride);
    });
    Ok(())
}

// [1 p 1] pass down one working column, replicating the edge sample
fn conv_tri1_y(col: &[f32], out: &mut [f32], p: f32, s: usize) {
    let h = col.len();
    if s == 2 {
        let h2 = (h - 1) / 2;
        for (j, o) in out.iter_mut().enumerate().take(h2) {
            *o = col[2 * j] + p * col[2 * j + 1] + col[2 * j + 2];
        }
        if h % 2 == 0 {
            out[h2] = col[2 * h2] + (1.0 + p) * col[2 * h2 + 1];
        }
    } else {
        out[0] = (1.0 + p) * col[0] + col[1];
        for j in 1..h - 1 {
            out[j] = col[j - 1] + p * col[j] + col[j + 1];
        }
        out[h - 1] = col[h - 2] + (1.0 + p) * col[h - 1];
    }
}

/// Smooth with a separable 3-tap `[1 p 1] / (p+2)` kernel.
///
/// A cheap approximation of light gaussian smoothing; `p = 2` gives the
/// radius-1 triangle kernel, larger `p` smooths less. Borders replicate the
/// edge sample. `stride` may be 1 or 2.
pub fn tri1_filter(
    src: &Image<f32>,
    dst: &mut Image<f32>,
    p: f32,
    stride: usize,
) -> Result<(), ImageError> {
    super::check_filter_args(src, dst, 0, stride, 2)?;

    let (h, w) = (src.height(), src.width());
    let hs = h / stride;
    let nrm = 1.0 / ((p + 2.0) * (p + 2.0));
    parallel::par_iter_planes(src, dst, |_, sp, dp| {
        let mut t = vec![0.0f32; h];
        for (oc, i) in (stride / 2..w).step_by(stride).enumerate() {
            let il = if i > 0 { i - 1 } else { i };
            let ir = if i < w - 1 { i + 1 } else { i };
            let (cl, cm, cr) = (
                &sp[il * h..il * h + h],
                &sp[i * h..i * h + h],
                &sp[ir * h..ir * h + h],
            );
            for j in 0..h {
                t[j] = nrm * (cl[j] + p * cm[j] + cr[j]);
            }
            conv_tri1_y(&t, &mut dp[oc * hs..(oc + 1) * hs], p, stride);
        }
    });
    Ok(())
}
