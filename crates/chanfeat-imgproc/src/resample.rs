//! Separable bilinear resampling with box-filter anti-aliasing.
//!
//! Resampling runs as two 1D passes (width then height). Downsampling
//! pre-averages every source sample whose support overlaps the output cell
//! so no information aliases away; upsampling is plain two-tap bilinear
//! interpolation with clamped boundaries. Exact integer downsampling ratios
//! (2x, 3x, 4x) take a closed-form fast path.

use chanfeat_image::{Image, ImageError};

use crate::parallel;

// discard taps lighter than 1e-3 of the cell scale
const WT_MIN_SCALE: f32 = 1e-3;

// per-axis interpolation plan; entries are grouped by output index
struct AxisCoef {
    src: Vec<usize>,
    dst: Vec<usize>,
    wts: Vec<f32>,
    // downsampling: max taps per output cell; upsampling: clamped head/tail counts
    bd: [usize; 2],
    down: bool,
}

impl AxisCoef {
    /// Build the interpolation plan for one axis of length `a` resampled to
    /// `b`. When downsampling, every output cell gets at least `pad` entries
    /// (zero-weight fillers) so a fixed-width inner loop can consume them.
    fn new(a: usize, b: usize, pad: usize) -> Self {
        let s = b as f32 / a as f32;
        let s_inv = 1.0 / s;
        let wt0 = WT_MIN_SCALE * s;
        let down = a > b;
        let mut coef = AxisCoef {
            src: Vec::new(),
            dst: Vec::new(),
            wts: Vec::new(),
            bd: [0, 0],
            down,
        };

        if down {
            for yb in 0..b {
                let ya0f = yb as f32 * s_inv;
                let ya1f = ya0f + s_inv;
                let ya0 = ya0f.ceil() as isize;
                let ya1 = ya1f as isize;
                let mut n1 = 0usize;
                let mut w_sum = 0.0f32;
                for ya in (ya0 - 1)..(ya1 + 1) {
                    let wt = if ya == ya0 - 1 {
                        (ya0 as f32 - ya0f) * s
                    } else if ya == ya1 {
                        (ya1f - ya1 as f32) * s
                    } else {
                        s
                    };
                    if wt > wt0 && ya >= 0 && (ya as usize) < a {
                        coef.dst.push(yb);
                        coef.src.push(ya as usize);
                        coef.wts.push(wt);
                        n1 += 1;
                        w_sum += wt;
                    }
                }
                // partial windows at the ends must not lose energy
                if w_sum > 1.0 {
                    let len = coef.wts.len();
                    for w in &mut coef.wts[len - n1..] {
                        *w /= w_sum;
                    }
                }
                coef.bd[0] = coef.bd[0].max(n1);
                while n1 < pad {
                    coef.dst.push(yb);
                    coef.src.push(*coef.src.last().unwrap_or(&0));
                    coef.wts.push(0.0);
                    n1 += 1;
                }
            }
        } else {
            for yb in 0..b {
                let yaf = (0.5 + yb as f32) * s_inv - 0.5;
                let mut ya = yaf.floor() as isize;
                let mut wt = 1.0;
                if ya >= 0 && (ya as usize) < a - 1 {
                    wt = 1.0 - (yaf - ya as f32);
                }
                if ya < 0 {
                    ya = 0;
                    coef.bd[0] += 1;
                }
                if ya as usize >= a - 1 {
                    ya = a as isize - 1;
                    coef.bd[1] += 1;
                }
                coef.dst.push(yb);
                coef.src.push(ya as usize);
                coef.wts.push(wt);
            }
        }
        coef
    }

    // offset of each output cell's first entry, plus a final sentinel
    fn group_starts(&self, b: usize) -> Vec<usize> {
        let mut starts = vec![0usize; b + 1];
        for &d in &self.dst {
            starts[d + 1] += 1;
        }
        for i in 0..b {
            starts[i + 1] += starts[i];
        }
        starts
    }
}

fn int_ratio(a: usize, b: usize) -> Option<usize> {
    [2usize, 3, 4].into_iter().find(|k| a == k * b)
}

/// Resample an image to the destination's extent with bilinear interpolation.
///
/// Each axis independently downsamples (weighted average over the full
/// source support, weights summing to 1 per output cell) or upsamples
/// (two-tap interpolation with clamped boundaries). `norm` scales every
/// output value; pass `1.0` to preserve intensity. The destination chooses
/// the target extent and must have the source's channel depth.
///
/// # Example
///
/// ```
/// use chanfeat_image::{Image, ImageSize};
/// use chanfeat_imgproc::resample::resample;
///
/// let src = Image::<f32>::from_size_val(
///     ImageSize { width: 4, height: 4 }, 1, 3.0,
/// ).unwrap();
/// let mut dst = Image::<f32>::from_size_val(
///     ImageSize { width: 2, height: 2 }, 1, 0.0,
/// ).unwrap();
///
/// resample(&src, &mut dst, 1.0).unwrap();
/// assert!((dst.as_slice()[0] - 3.0).abs() < 1e-4);
/// ```
pub fn resample(src: &Image<f32>, dst: &mut Image<f32>, norm: f32) -> Result<(), ImageError> {
    if src.is_empty() {
        return Err(ImageError::EmptyExtent(src.width(), src.height()));
    }
    if dst.is_empty() {
        return Err(ImageError::EmptyExtent(dst.width(), dst.height()));
    }
    if dst.channels() != src.channels() {
        return Err(ImageError::InvalidChannelDepth(
            dst.channels(),
            "same depth as source",
        ));
    }

    let (ha, wa) = (src.height(), src.width());
    let (hb, wb) = (dst.height(), dst.width());

    let xc = AxisCoef::new(wa, wb, 0);
    let yc = AxisCoef::new(ha, hb, 4);
    let x_ratio = int_ratio(wa, wb);
    let y_ratio = int_ratio(ha, hb);
    let x_starts = if xc.down && x_ratio.is_none() {
        xc.group_starts(wb)
    } else {
        Vec::new()
    };

    // the x pass is unnormalized; fold its scale into the y weights, with a
    // hair of slack so rounded 8-bit data cannot overflow its range
    let mut r = norm;
    if let Some(k) = x_ratio {
        r /= k as f32;
    }
    r /= 1.0 + 1e-6;
    let ywts: Vec<f32> = yc.wts.iter().map(|w| w * r).collect();

    let src_data = src.as_slice();
    let plane = ha * wa;

    parallel::par_iter_cols(dst, |idx, bcol| {
        let z = idx / wb;
        let x = idx % wb;
        let a_plane = &src_data[z * plane..(z + 1) * plane];
        let mut c = vec![0.0f32; ha];

        // x pass: source plane -> working column c
        if let Some(k) = x_ratio {
            let o = x * k * ha;
            for (y, cv) in c.iter_mut().enumerate() {
                *cv = (0..k).map(|j| a_plane[o + j * ha + y]).sum();
            }
        } else if xc.down {
            for i in x_starts[x]..x_starts[x + 1] {
                let (xa, wt) = (xc.src[i], xc.wts[i]);
                let a_col = &a_plane[xa * ha..(xa + 1) * ha];
                for (cv, &av) in c.iter_mut().zip(a_col) {
                    *cv += av * wt;
                }
            }
        } else {
            let x_bd = x < xc.bd[0] || x >= wb - xc.bd[1];
            let xa = xc.src[x];
            let a0 = &a_plane[xa * ha..(xa + 1) * ha];
            if x_bd {
                c.copy_from_slice(a0);
            } else {
                let (wt, wt1) = (xc.wts[x], 1.0 - xc.wts[x]);
                let a1 = &a_plane[(xa + 1) * ha..(xa + 2) * ha];
                for (y, cv) in c.iter_mut().enumerate() {
                    *cv = a0[y] * wt + a1[y] * wt1;
                }
            }
        }

        // y pass: working column c -> output column
        if let Some(k) = y_ratio {
            let rk = r / k as f32;
            for (y, bv) in bcol.iter_mut().enumerate() {
                *bv = (0..k).map(|j| c[k * y + j]).sum::<f32>() * rk;
            }
        } else if yc.down {
            if yc.bd[0] <= 4 {
                // every cell is padded to exactly 4 entries
                for (y, bv) in bcol.iter_mut().enumerate() {
                    let i = 4 * y;
                    *bv = c[yc.src[i]] * ywts[i]
                        + c[yc.src[i + 1]] * ywts[i + 1]
                        + c[yc.src[i + 2]] * ywts[i + 2]
                        + c[yc.src[i + 3]] * ywts[i + 3];
                }
            } else {
                bcol.fill(0.0);
                for i in 0..yc.src.len() {
                    bcol[yc.dst[i]] += c[yc.src[i]] * ywts[i];
                }
            }
        } else {
            let mut y = 0;
            while y < yc.bd[0].min(hb) {
                bcol[y] = c[yc.src[y]] * ywts[y];
                y += 1;
            }
            while y < hb.saturating_sub(yc.bd[1]) {
                bcol[y] = c[yc.src[y]] * ywts[y] + c[yc.src[y] + 1] * (r - ywts[y]);
                y += 1;
            }
            while y < hb {
                bcol[y] = c[yc.src[y]] * ywts[y];
                y += 1;
            }
        }
    });

    Ok(())
}
