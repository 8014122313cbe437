use std::f32::consts::PI;
use std::sync::OnceLock;

use chanfeat_image::{Image, ImageError};
use rayon::prelude::*;

use crate::parallel;
use super::spatial::grad_col;

const ACOS_RES: usize = 25000;
const ACOS_MULT: f32 = ACOS_RES as f32 / 2.02;

// arccos sampled over [-1.01, 1.01]; the slight overshoot absorbs rounding
// in the normalized cosine, and angles within 1e-5 of pi fold to 0 so the
// orientation range stays [0, pi)
fn acos_table() -> &'static [f32] {
    static TABLE: OnceLock<Vec<f32>> = OnceLock::new();
    TABLE.get_or_init(|| {
        log::debug!("building {} entry arccos table", ACOS_RES);
        let ni = 2.02 / ACOS_RES as f32;
        (0..ACOS_RES)
            .map(|i| {
                let t = (i as f32 * ni - 1.01).clamp(-1.0, 1.0).acos();
                if t <= PI - 1e-5 {
                    t
                } else {
                    0.0
                }
            })
            .collect()
    })
}

fn mag_col(
    src: &[f32],
    h: usize,
    w: usize,
    d: usize,
    x: usize,
    mc: &mut [f32],
    oc: Option<&mut [f32]>,
) {
    let mut gx = vec![0.0f32; d * h];
    let mut gy = vec![0.0f32; d * h];
    for c in 0..d {
        let plane = &src[c * h * w..(c + 1) * h * w];
        grad_col(plane, &mut gx[c * h..(c + 1) * h], &mut gy[c * h..(c + 1) * h], h, w, x);
    }

    // keep the channel with the strongest squared response per pixel
    let mut m2: Vec<f32> = (0..h).map(|y| gx[y] * gx[y] + gy[y] * gy[y]).collect();
    for c in 1..d {
        for y in 0..h {
            let y1 = c * h + y;
            let v = gx[y1] * gx[y1] + gy[y1] * gy[y1];
            if v > m2[y] {
                m2[y] = v;
                gx[y] = gx[y1];
                gy[y] = gy[y1];
            }
        }
    }

    // clamping the reciprocal square root pins zero gradients to a tiny
    // positive magnitude instead of NaN
    match oc {
        Some(ocol) => {
            let table = acos_table();
            for y in 0..h {
                let r = (1.0 / m2[y].sqrt()).min(1e10);
                mc[y] = 1.0 / r;
                let mut v = gx[y] * r * ACOS_MULT;
                if gy[y].is_sign_negative() {
                    v = -v;
                }
                let i = (v as isize + (ACOS_RES / 2) as isize).clamp(0, ACOS_RES as isize - 1);
                ocol[y] = table[i as usize];
            }
        }
        None => {
            for y in 0..h {
                mc[y] = 1.0 / (1.0 / m2[y].sqrt()).min(1e10);
            }
        }
    }
}

/// Compute per-pixel gradient magnitude and optional unsigned orientation.
///
/// For multi-channel input, each pixel reports the channel whose gradient
/// has the largest squared magnitude. Orientation is the gradient direction
/// folded into `[0, pi)` via a cached inverse-cosine table; a zero gradient
/// yields a tiny positive magnitude rather than NaN. `m` (and `o`, when
/// requested) are single-channel images of the source extent.
pub fn gradient_mag(
    src: &Image<f32>,
    m: &mut Image<f32>,
    o: Option<&mut Image<f32>>,
) -> Result<(), ImageError> {
    super::check_min_extent(src, 2)?;
    super::check_same_shape(src, m, 1)?;

    let (h, w, d) = (src.height(), src.width(), src.channels());
    let src_data = src.as_slice();
    match o {
        Some(o) => {
            super::check_same_shape(src, o, 1)?;
            parallel::par_iter_cols_two(m, o, |x, mc, ocol| {
                mag_col(src_data, h, w, d, x, mc, Some(ocol));
            });
        }
        None => {
            parallel::par_iter_cols(m, |x, mc| {
                mag_col(src_data, h, w, d, x, mc, None);
            });
        }
    }
    Ok(())
}

/// Normalize a gradient magnitude image in place: `m /= s + norm`.
///
/// `s` is typically a smoothed copy of `m`, making this a local contrast
/// normalization with `norm` guarding the division.
pub fn gradient_mag_norm(
    m: &mut Image<f32>,
    s: &Image<f32>,
    norm: f32,
) -> Result<(), ImageError> {
    super::check_same_shape(s, m, 1)?;
    if s.channels() != 1 {
        return Err(ImageError::InvalidChannelDepth(s.channels(), "1"));
    }
    m.as_slice_mut()
        .par_iter_mut()
        .zip(s.as_slice().par_iter())
        .for_each(|(mv, &sv)| *mv /= sv + norm);
    Ok(())
}
