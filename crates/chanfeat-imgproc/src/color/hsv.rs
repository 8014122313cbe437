use chanfeat_image::{Image, ImageError};
use rayon::prelude::*;

#[inline]
fn rgb_to_hsv(r: f32, g: f32, b: f32, norm: f32) -> [f32; 3] {
    if r == g && g == b {
        return [0.0, 0.0, r * norm];
    }
    let (maxv, minv, h) = if r >= g && r >= b {
        let minv = g.min(b);
        let mut h = (g - b) / (r - minv) + 6.0;
        if h >= 6.0 {
            h -= 6.0;
        }
        (r, minv, h)
    } else if g >= r && g >= b {
        let minv = r.min(b);
        (g, minv, (b - r) / (g - minv) + 2.0)
    } else {
        let minv = r.min(g);
        (b, minv, (r - g) / (b - minv) + 4.0)
    };
    [h / 6.0, 1.0 - minv / maxv, maxv * norm]
}

/// Convert planar RGB to HSV.
///
/// Classic max/min hexcone conversion; hue lands in `[0, 1)` and saturation
/// in `[0, 1]`, while value is the channel maximum scaled by `norm`. Input
/// values times `norm` must lie in `[0, 1]`; with `norm == 1.0` a prefix of
/// the data is checked and out-of-range values are an error.
pub fn hsv_from_rgb(src: &Image<f32>, dst: &mut Image<f32>, norm: f32) -> Result<(), ImageError> {
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

    let h = src.height();
    let n = src.num_pixels();

    for k in 0..src.channels() / 3 {
        let rp = src.plane(3 * k)?;
        let gp = src.plane(3 * k + 1)?;
        let bp = src.plane(3 * k + 2)?;

        let base = 3 * k * n;
        let (hp, rest) = dst.as_slice_mut()[base..base + 3 * n].split_at_mut(n);
        let (sp, vp) = rest.split_at_mut(n);

        hp.par_chunks_exact_mut(h)
            .zip(sp.par_chunks_exact_mut(h))
            .zip(vp.par_chunks_exact_mut(h))
            .enumerate()
            .for_each(|(x, ((hc, sc), vc))| {
                let o = x * h;
                for y in 0..h {
                    let hsv = rgb_to_hsv(rp[o + y], gp[o + y], bp[o + y], norm);
                    hc[y] = hsv[0];
                    sc[y] = hsv[1];
                    vc[y] = hsv[2];
                }
            });
    }

    Ok(())
}
