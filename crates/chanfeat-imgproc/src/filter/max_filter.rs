use chanfeat_image::{Image, ImageError};

use crate::parallel;

// sliding max over a 2r+1 window down one column, O(1) amortized per
// output: interior samples go block by block, combining prefix maxima of
// one block with suffix maxima of the next
fn conv_max_y(col: &[f32], out: &mut [f32], t: &mut [f32], r: usize) {
    let h = col.len();
    let m = 2 * r + 1;

    let maxk = |lo: usize, hi: usize| {
        let mut v = col[lo];
        for &c in &col[lo + 1..=hi] {
            if c > v {
                v = c;
            }
        }
        v
    };

    let mut y = 0;
    while y < r {
        out[y] = maxk(0, (y + r).min(h - 1));
        y += 1;
    }
    while y + m + r <= h {
        t[m - 1] = col[y + r];
        for yi in 1..m {
            t[m - 1 - yi] = t[m - yi].max(col[y + r - yi]);
        }
        for yi in 1..m {
            t[m - 1 + yi] = t[m - 2 + yi].max(col[y + r + yi]);
        }
        for yi in 0..m {
            out[y + yi] = t[yi].max(t[yi + m - 1]);
        }
        y += m;
    }
    while y + r < h {
        out[y] = maxk(y - r, y + r);
        y += 1;
    }
    while y < h {
        out[y] = maxk(y.saturating_sub(r), h - 1);
        y += 1;
    }
}

/// Dilate with a `(2r+1) x (2r+1)` max window.
///
/// The window truncates at the borders (no virtual samples), and a radius
/// exceeding an image dimension is clamped to it rather than rejected. The
/// destination matches the source extent and depth.
pub fn max_filter(src: &Image<f32>, dst: &mut Image<f32>, radius: usize) -> Result<(), ImageError> {
    super::check_filter_args(src, dst, 0, 1, 1)?;

    let (h, w) = (src.height(), src.width());
    let r = radius.min(w - 1).min(h - 1);
    let m = 2 * r + 1;

    parallel::par_iter_planes(src, dst, |_, sp, dp| {
        let mut t = vec![0.0f32; 2 * m];
        // column pass, then the same sweep across each row
        for x in 0..w {
            conv_max_y(&sp[x * h..(x + 1) * h], &mut dp[x * h..(x + 1) * h], &mut t, r);
        }
        let mut row = vec![0.0f32; w];
        let mut row_out = vec![0.0f32; w];
        for y in 0..h {
            for x in 0..w {
                row[x] = dp[x * h + y];
            }
            conv_max_y(&row, &mut row_out, &mut t, r);
            for x in 0..w {
                dp[x * h + y] = row_out[x];
            }
        }
    });
    Ok(())
}
