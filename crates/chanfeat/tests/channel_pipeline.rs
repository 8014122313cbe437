use chanfeat::image::{Image, ImageError};
use chanfeat::imgproc::color::{convert, ColorMode};
use chanfeat::imgproc::filter::tri_filter;
use chanfeat::imgproc::gradient::{gradient_hist, gradient_mag, hog};
use chanfeat::imgproc::integral::IntegralImage;
use chanfeat::imgproc::padding::{pad, PadShape, PaddingMode};
use chanfeat::imgproc::resample::resample;

fn argmax_plane(img: &Image<f32>, c: usize) -> Result<(usize, usize), ImageError> {
    let plane = img.plane(c)?;
    let (h, _) = (img.height(), img.width());
    let mut best = (0usize, 0usize);
    let mut best_v = f32::NEG_INFINITY;
    for (i, &v) in plane.iter().enumerate() {
        if v > best_v {
            best_v = v;
            best = (i % h, i / h);
        }
    }
    Ok(best)
}

/// Runs the full channel chain on a bright impulse and checks that its
/// response stays localized through every stage.
#[test]
fn impulse_through_full_chain() -> Result<(), ImageError> {
    let (w, h) = (44usize, 44usize);
    let mut data = vec![0.1f32; w * h * 3];
    for c in 0..3 {
        data[(c * w + 22) * h + 22] = 1.0;
    }
    let rgb = Image::new([w, h].into(), 3, data)?;

    // pad by two pixels on each side
    let shape = PadShape::uniform(2);
    let mut padded = Image::from_size_val(shape.padded_size(rgb.size()), 3, 0.0)?;
    pad(&rgb, &mut padded, &shape, PaddingMode::Replicate, 0.0)?;
    assert_eq!(padded.size().width, 48);
    assert_eq!(padded.size().height, 48);

    // grayscale: the impulse lands at (24, 24) after padding
    let mut gray = Image::from_size_val(padded.size(), 1, 0.0)?;
    convert(&padded, &mut gray, ColorMode::Gray, 1.0)?;
    assert!((gray.get(24, 24, 0).copied().unwrap() - 1.0).abs() < 1e-5);
    assert_eq!(argmax_plane(&gray, 0)?, (24, 24));

    // triangle smoothing keeps the peak in place
    let mut smooth = Image::from_size_val(gray.size(), 1, 0.0)?;
    tri_filter(&gray, &mut smooth, 2, 1)?;
    assert_eq!(argmax_plane(&smooth, 0)?, (24, 24));

    // downsample by two: the peak moves to the block center
    let mut small = Image::from_size_val([24, 24].into(), 1, 0.0)?;
    resample(&smooth, &mut small, 1.0)?;
    let (py, px) = argmax_plane(&small, 0)?;
    assert!(py >= 11 && py <= 12, "peak row {py}");
    assert!(px >= 11 && px <= 12, "peak col {px}");

    // gradient magnitude and orientation
    let mut mag = Image::from_size_val(small.size(), 1, 0.0)?;
    let mut orient = Image::from_size_val(small.size(), 1, 0.0)?;
    gradient_mag(&small, &mut mag, Some(&mut orient))?;
    assert!(mag.as_slice().iter().all(|v| v.is_finite() && *v >= 0.0));
    assert!(orient
        .as_slice()
        .iter()
        .all(|v| *v >= 0.0 && *v < std::f32::consts::PI));

    // orientation histogram over 4x4 blocks, six bins
    let mut hist = Image::from_size_val([6, 6].into(), 6, 0.0)?;
    gradient_hist(&mag, &orient, &mut hist, 4, 6, true)?;
    let mass: f32 = hist.as_slice().iter().sum();
    assert!(mass > 0.0);
    assert!(hist.as_slice().iter().all(|v| *v >= 0.0));

    // normalized HOG over the interior blocks
    let mut descr = Image::from_size_val([4, 4].into(), 24, 0.0)?;
    hog(&hist, &mut descr, 4, 0.2)?;
    assert!(descr
        .as_slice()
        .iter()
        .all(|v| v.is_finite() && *v >= 0.0 && *v <= 0.2));

    // the impulse sits inside block (3, 3), reported by interior cell (2, 2)
    let mut cell_energy = vec![0.0f32; 16];
    for c in 0..24 {
        let plane = descr.plane(c)?;
        for (i, &v) in plane.iter().enumerate() {
            cell_energy[i] += v * v;
        }
    }
    let best = cell_energy
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let (cy, cx) = (best % 4, best / 4);
    assert!((1..=2).contains(&cy), "peak cell row {cy}");
    assert!((1..=2).contains(&cx), "peak cell col {cx}");

    Ok(())
}

/// Integral image statistics agree with direct sums over the padded gray
/// image produced by the same front end.
#[test]
fn integral_matches_direct_sums() -> Result<(), ImageError> {
    let (w, h) = (16usize, 12usize);
    let data: Vec<f32> = (0..w * h * 3).map(|i| (i % 13) as f32 * 0.05).collect();
    let rgb = Image::new([w, h].into(), 3, data)?;

    let mut gray = Image::from_size_val(rgb.size(), 1, 0.0)?;
    convert(&rgb, &mut gray, ColorMode::Gray, 1.0)?;

    let mut table = IntegralImage::new(&gray)?;

    let (lf, tp, rt, bt) = (3usize, 2usize, 10usize, 8usize);
    let mut expected = 0.0f64;
    for y in tp..=bt {
        for x in lf..=rt {
            expected += f64::from(gray.get(y, x, 0).copied().unwrap());
        }
    }
    assert!((table.rect_sum(lf, tp, rt, bt) - expected).abs() < 1e-6);

    table.set_roi(lf, tp, rt, bt);
    let area = ((rt - lf + 1) * (bt - tp + 1)) as f64;
    assert!((table.roi_mean() - expected / area).abs() < 1e-9);
    assert!(table.roi_sigma() > 0.0);

    Ok(())
}
