use chanfeat_image::{Image, ImageError};

/// Block-normalize an orientation histogram into HOG descriptors.
///
/// Each interior histogram block is normalized four times, once against the
/// energy of each 2x2 block neighborhood it belongs to, and the four copies
/// concatenate along the channel axis (neighborhood-major, so channel
/// `q * n_orients + o` holds orientation `o` under normalization `q`).
/// Values clip at `clip` from above only. The one-block border of the
/// histogram only feeds normalization energies, so the output is
/// `(hb-2) x (wb-2)` with `4 * n_orients` channels; an empty output extent
/// is a success. `bin` must be the block size the histogram was built with,
/// it scales the stabilizing epsilon to match the histogram's energy scale.
pub fn hog(
    hist: &Image<f32>,
    dst: &mut Image<f32>,
    bin: usize,
    clip: f32,
) -> Result<(), ImageError> {
    if bin < 1 {
        return Err(ImageError::InvalidStride(bin));
    }
    let (hb, wb) = (hist.height(), hist.width());
    let n_orients = hist.channels();
    let (out_h, out_w) = (hb.saturating_sub(2), wb.saturating_sub(2));
    if dst.height() != out_h || dst.width() != out_w {
        return Err(ImageError::InvalidImageSize(
            dst.width(),
            dst.height(),
            out_w,
            out_h,
        ));
    }
    if dst.channels() != 4 * n_orients {
        return Err(ImageError::InvalidChannelDepth(
            dst.channels(),
            "4x the histogram depth",
        ));
    }
    if out_h == 0 || out_w == 0 {
        return Ok(());
    }

    let binf = bin as f32;
    let eps = 1e-4 / 4.0 / (binf * binf * binf * binf);
    let nb = hb * wb;
    let hd = hist.as_slice();

    // squared orientation energy per block
    let mut energy = vec![0.0f32; nb];
    for o in 0..n_orients {
        for (e, &v) in energy.iter_mut().zip(&hd[o * nb..(o + 1) * nb]) {
            *e += v * v;
        }
    }

    let outp = out_h * out_w;
    let gd = dst.as_slice_mut();
    for x in 0..out_w {
        for y in 0..out_h {
            let src0 = (x + 1) * hb + (y + 1);
            let mut di = x * out_h + y;
            // the four 2x2 neighborhoods containing block (x+1, y+1),
            // lower-right first
            for (x1, y1) in [(1, 1), (1, 0), (0, 1), (0, 0)] {
                let p = (x + x1) * hb + (y + y1);
                let n = 1.0
                    / (energy[p] + energy[p + 1] + energy[p + hb] + energy[p + hb + 1] + eps)
                        .sqrt();
                for o in 0..n_orients {
                    gd[di] = (hd[o * nb + src0] * n).min(clip);
                    di += outp;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chanfeat_image::{Image, ImageError, ImageSize};

    fn uniform_hist(hb: usize, wb: usize, n: usize, v: f32) -> Image<f32> {
        Image::from_size_val(
            ImageSize {
                width: wb,
                height: hb,
            },
            n,
            v,
        )
        .unwrap()
    }

    fn hog_of(hist: &Image<f32>, bin: usize, clip: f32) -> Image<f32> {
        let mut dst = Image::from_size_val(
            ImageSize {
                width: hist.width().saturating_sub(2),
                height: hist.height().saturating_sub(2),
            },
            4 * hist.channels(),
            0.0,
        )
        .unwrap();
        hog(hist, &mut dst, bin, clip).unwrap();
        dst
    }

    #[test]
    fn uniform_histogram_normalizes_uniformly() -> Result<(), ImageError> {
        let hist = uniform_hist(4, 5, 3, 0.5);
        let dst = hog_of(&hist, 1, 10.0);
        assert_eq!(dst.height(), 2);
        assert_eq!(dst.width(), 3);
        assert_eq!(dst.channels(), 12);

        // every neighborhood has the same energy, so all four normalized
        // copies agree: v / sqrt(4 * n * v^2 + eps)
        let eps: f32 = 1e-4 / 4.0;
        let want = 0.5 / (4.0 * 3.0 * 0.25 + eps).sqrt();
        for &v in dst.as_slice() {
            assert_relative_eq!(v, want, max_relative = 1e-5);
        }
        Ok(())
    }

    #[test]
    fn clip_bounds_output_from_above() -> Result<(), ImageError> {
        let hist = uniform_hist(3, 3, 2, 1.0);
        let dst = hog_of(&hist, 1, 0.2);
        for &v in dst.as_slice() {
            assert_relative_eq!(v, 0.2, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn four_normalizations_differ_near_energy_step() -> Result<(), ImageError> {
        // left half of the histogram is hot, right half cold; the four
        // normalizations of a block on the seam see different energies
        let mut hist = uniform_hist(4, 4, 1, 0.1);
        for x in 0..2 {
            for y in 0..4 {
                hist.as_slice_mut()[x * 4 + y] = 2.0;
            }
        }
        let dst = hog_of(&hist, 1, 100.0);

        let v = |q: usize| *dst.get(0, 0, q).unwrap();
        // q 0/1 normalize against neighborhoods straddling the seam (less
        // energy), q 2/3 against all-hot neighborhoods (more energy)
        assert!(v(0) > v(2));
        assert!(v(1) > v(3));
        Ok(())
    }

    #[test]
    fn small_histogram_yields_empty_output() -> Result<(), ImageError> {
        let hist = uniform_hist(2, 2, 2, 1.0);
        let mut dst = Image::from_size_val(
            ImageSize {
                width: 0,
                height: 0,
            },
            8,
            0.0,
        )?;
        hog(&hist, &mut dst, 1, 0.2)?;
        assert!(dst.is_empty());
        Ok(())
    }
}
