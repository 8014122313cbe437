use std::f32::consts::PI;

use chanfeat_image::{Image, ImageError};

// split one column of magnitudes between the two nearest orientation bins;
// bin indices come out pre-multiplied by the per-orientation plane stride
fn grad_quantize(
    o_col: &[f32],
    m_col: &[f32],
    o0: &mut [usize],
    o1: &mut [usize],
    m0: &mut [f32],
    m1: &mut [f32],
    n_orients: usize,
    nb: usize,
    n: usize,
    norm: f32,
) {
    let o_mult = n_orients as f32 / PI;
    let o_max = n_orients * nb;
    for i in 0..n {
        let o = o_col[i] * o_mult;
        let m = m_col[i] * norm;
        // orientations at or past pi land in the last bin
        let ob = (o as usize).min(n_orients - 1);
        let od = o - ob as f32;
        let b0 = ob * nb;
        let mut b1 = b0 + nb;
        if b1 == o_max {
            b1 = 0;
        }
        o0[i] = b0;
        o1[i] = b1;
        m1[i] = od * m;
        m0[i] = m - m1[i];
    }
}

/// Accumulate an orientation histogram over `bin x bin` pixel blocks.
///
/// Every pixel's magnitude splits linearly between its two nearest
/// orientation bins (wrapping at pi) and, with `soft` binning, bilinearly
/// across the up-to-4 nearest spatial blocks; hard binning votes the whole
/// spatial weight into the containing block. Votes are scaled by
/// `1 / bin^2` so histogram energy is independent of the block size. The
/// destination must be `h/bin x w/bin` with `n_orients` channels and is
/// accumulated into, not overwritten; pixels beyond the last full block are
/// ignored.
pub fn gradient_hist(
    m: &Image<f32>,
    o: &Image<f32>,
    hist: &mut Image<f32>,
    bin: usize,
    n_orients: usize,
    soft: bool,
) -> Result<(), ImageError> {
    if bin < 1 {
        return Err(ImageError::InvalidStride(bin));
    }
    if n_orients < 1 {
        return Err(ImageError::InvalidChannelDepth(n_orients, "at least 1"));
    }
    super::check_same_shape(m, o, 1)?;
    if m.channels() != 1 {
        return Err(ImageError::InvalidChannelDepth(m.channels(), "1"));
    }

    let (h, w) = (m.height(), m.width());
    let (hb, wb) = (h / bin, w / bin);
    if hist.height() != hb || hist.width() != wb || hist.channels() != n_orients {
        return Err(ImageError::InvalidImageSize(
            hist.width(),
            hist.height(),
            wb,
            hb,
        ));
    }
    if hb == 0 || wb == 0 {
        return Ok(());
    }

    let (h0, w0) = (hb * bin, wb * bin);
    let nb = hb * wb;
    let s_inv = 1.0 / bin as f32;
    let s_inv2 = s_inv * s_inv;

    let m_data = m.as_slice();
    let o_data = o.as_slice();
    let hs = hist.as_slice_mut();

    let mut o0 = vec![0usize; h0];
    let mut o1 = vec![0usize; h0];
    let mut m0 = vec![0.0f32; h0];
    let mut m1 = vec![0.0f32; h0];

    // block-column x-coordinate of the current pixel column, tracked
    // incrementally across the loop
    let init = 0.5 * s_inv - 0.5;
    let mut xb = init;

    for x in 0..w0 {
        grad_quantize(
            &o_data[x * h..],
            &m_data[x * h..],
            &mut o0,
            &mut o1,
            &mut m0,
            &mut m1,
            n_orients,
            nb,
            h0,
            s_inv2,
        );

        if !soft || bin == 1 {
            // orientation interpolation only; the whole spatial vote lands
            // in the containing block
            let base = (x / bin) * hb;
            for y in 0..h0 {
                let cell = base + y / bin;
                hs[o0[y] + cell] += m0[y];
                hs[o1[y] + cell] += m1[y];
            }
            continue;
        }

        let has_lf = xb >= 0.0;
        let xb0: isize = if has_lf { xb as isize } else { -1 };
        let has_rt = xb0 < wb as isize - 1;
        let xd = xb - xb0 as f32;
        xb += s_inv;
        let mut yb = init;
        let mut y = 0;

        let hbi = hb as isize;
        // per-row spatial weights over the 2x2 neighboring blocks
        let weights = |xd: f32, yd: f32| {
            let xyd = xd * yd;
            [1.0 - xd - yd + xyd, yd - xyd, xd - xyd, xyd]
        };

        // leading rows: no block above
        while y < bin / 2 {
            let yb0: isize = -1;
            let yd = yb - yb0 as f32;
            yb += s_inv;
            let base = xb0 * hbi + yb0;
            let ms = weights(xd, yd);
            if has_lf {
                let i = (base + 1) as usize;
                hs[o0[y] + i] += ms[1] * m0[y];
                hs[o1[y] + i] += ms[1] * m1[y];
            }
            if has_rt {
                let i = (base + hbi + 1) as usize;
                hs[o0[y] + i] += ms[3] * m0[y];
                hs[o1[y] + i] += ms[3] * m1[y];
            }
            y += 1;
        }
        // interior rows: blocks above and below
        loop {
            let yb0 = yb as isize;
            if yb0 >= hbi - 1 {
                break;
            }
            let yd = yb - yb0 as f32;
            yb += s_inv;
            let base = xb0 * hbi + yb0;
            let ms = weights(xd, yd);
            if has_lf {
                let i = base as usize;
                hs[o0[y] + i] += ms[0] * m0[y];
                hs[o0[y] + i + 1] += ms[1] * m0[y];
                hs[o1[y] + i] += ms[0] * m1[y];
                hs[o1[y] + i + 1] += ms[1] * m1[y];
            }
            if has_rt {
                let i = (base + hbi) as usize;
                hs[o0[y] + i] += ms[2] * m0[y];
                hs[o0[y] + i + 1] += ms[3] * m0[y];
                hs[o1[y] + i] += ms[2] * m1[y];
                hs[o1[y] + i + 1] += ms[3] * m1[y];
            }
            y += 1;
        }
        // trailing rows: no block below
        while y < h0 {
            let yb0 = yb as isize;
            let yd = yb - yb0 as f32;
            yb += s_inv;
            let base = xb0 * hbi + yb0;
            let ms = weights(xd, yd);
            if has_lf {
                let i = base as usize;
                hs[o0[y] + i] += ms[0] * m0[y];
                hs[o1[y] + i] += ms[0] * m1[y];
            }
            if has_rt {
                let i = (base + hbi) as usize;
                hs[o0[y] + i] += ms[2] * m0[y];
                hs[o1[y] + i] += ms[2] * m1[y];
            }
            y += 1;
        }
    }

    Ok(())
}
