use std::sync::OnceLock;

use chanfeat_image::{Image, ImageError};
use rayon::prelude::*;

// sRGB -> XYZ row-major matrix, consumed column-by-column below
const MR: [f32; 3] = [0.430574, 0.222015, 0.020183];
const MG: [f32; 3] = [0.341550, 0.706655, 0.129553];
const MB: [f32; 3] = [0.178325, 0.071330, 0.939180];

const UN: f32 = 0.197833;
const VN: f32 = 0.468331;
const MAXI: f32 = 1.0 / 270.0;
const MIN_U: f32 = -88.0 * MAXI;
const MIN_V: f32 = -134.0 * MAXI;

const L_SAMPLES: usize = 1025;
const L_TABLE_LEN: usize = 1064;

// y -> L lookup over [0, 1], sampled at 1/1024 and padded past the end so a
// slightly-out-of-range y from rounding still lands on a valid entry.
fn l_table() -> &'static [f32; L_TABLE_LEN] {
    static TABLE: OnceLock<[f32; L_TABLE_LEN]> = OnceLock::new();
    TABLE.get_or_init(|| {
        log::debug!("building {} entry L* lookup table", L_SAMPLES);
        let y0 = (6.0f64 / 29.0).powi(3);
        let a = (29.0f64 / 3.0).powi(3);
        let mut table = [0.0f32; L_TABLE_LEN];
        for (i, entry) in table.iter_mut().enumerate().take(L_SAMPLES) {
            let y = i as f64 / 1024.0;
            let l = if y > y0 {
                116.0 * y.cbrt() - 16.0
            } else {
                y * a
            };
            *entry = (l * MAXI as f64) as f32;
        }
        for i in L_SAMPLES..L_TABLE_LEN {
            table[i] = table[L_SAMPLES - 1];
        }
        table
    })
}

#[inline]
fn rgb_to_luv(table: &[f32; L_TABLE_LEN], m: &[[f32; 3]; 3], r: f32, g: f32, b: f32) -> [f32; 3] {
    let x = m[0][0] * r + m[1][0] * g + m[2][0] * b;
    let y = m[0][1] * r + m[1][1] * g + m[2][1] * b;
    let z = m[0][2] * r + m[1][2] * g + m[2][2] * b;
    let l = table[((y * 1024.0) as usize).min(L_TABLE_LEN - 1)];
    let d = 1.0 / (x + 15.0 * y + 3.0 * z + 1e-35);
    [
        l,
        l * (13.0 * 4.0 * x * d - 13.0 * UN) - MIN_U,
        l * (13.0 * 9.0 * y * d - 13.0 * VN) - MIN_V,
    ]
}

/// Convert planar RGB to CIE LUV.
///
/// RGB maps through an XYZ intermediate; L comes from a cached piecewise
/// cube-root lookup table and U/V carry fixed offsets so all three output
/// channels are non-negative, scaled into roughly `[0, 1]`. Input values
/// times `norm` must lie in `[0, 1]`; with `norm == 1.0` a prefix of the
/// data is checked and out-of-range values are an error.
pub fn luv_from_rgb(src: &Image<f32>, dst: &mut Image<f32>, norm: f32) -> Result<(), ImageError> {
    if src.channels() % 3 != 0 {
        return Err(ImageError::InvalidChannelDepth(
            src.channels(),
            "a multiple of 3",
        ));
    }
    super::check_shapes(src, dst, src.channels())?;
    super::check_unit_range(src, norm)?;
    if src.is_empty() {
        return Ok(());
    }

    let table = l_table();
    let m = [
        [MR[0] * norm, MR[1] * norm, MR[2] * norm],
        [MG[0] * norm, MG[1] * norm, MG[2] * norm],
        [MB[0] * norm, MB[1] * norm, MB[2] * norm],
    ];

    let h = src.height();
    let n = src.num_pixels();

    for k in 0..src.channels() / 3 {
        let r = src.plane(3 * k)?;
        let g = src.plane(3 * k + 1)?;
        let b = src.plane(3 * k + 2)?;

        // the three output planes of this triplet are contiguous
        let base = 3 * k * n;
        let (lp, rest) = dst.as_slice_mut()[base..base + 3 * n].split_at_mut(n);
        let (up, vp) = rest.split_at_mut(n);

        lp.par_chunks_exact_mut(h)
            .zip(up.par_chunks_exact_mut(h))
            .zip(vp.par_chunks_exact_mut(h))
            .enumerate()
            .for_each(|(x, ((lc, uc), vc))| {
                let o = x * h;
                for y in 0..h {
                    let luv = rgb_to_luv(table, &m, r[o + y], g[o + y], b[o + y]);
                    lc[y] = luv[0];
                    uc[y] = luv[1];
                    vc[y] = luv[2];
                }
            });
    }

    Ok(())
}
