use image::GrayImage;

/// Used when no threshold ever splits the histogram (uniform image)
const FALLBACK_THRESHOLD: u8 = 128;

/// Binarize with a global Otsu threshold
///
/// Pixels strictly above the threshold become white, the rest black.
pub fn apply(mut image: GrayImage) -> GrayImage {
    let threshold = otsu_threshold(&histogram(&image));
    tracing::debug!("Otsu threshold: {}", threshold);

    for pixel in image.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > threshold { 255 } else { 0 };
    }
    image
}

/// 256-bucket luminance histogram
pub fn histogram(image: &GrayImage) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for &value in image.as_raw() {
        hist[value as usize] += 1;
    }
    hist
}

/// Otsu's method over a luminance histogram
///
/// Background is `<= t`, foreground `> t`. The scan keeps the first threshold
/// reaching the maximum between-class variance: only a strictly greater score
/// replaces the current best, so ties resolve to the lowest `t`.
pub fn otsu_threshold(hist: &[u64; 256]) -> u8 {
    let total: u64 = hist.iter().sum();
    let total_sum: f64 = hist
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let mut best_threshold = FALLBACK_THRESHOLD;
    let mut best_variance = 0.0_f64;
    let mut weight_bg = 0u64;
    let mut sum_bg = 0.0_f64;

    for (t, &count) in hist.iter().enumerate() {
        weight_bg += count;
        if weight_bg == 0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0 {
            break;
        }

        sum_bg += t as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg as f64;
        let mean_fg = (total_sum - sum_bg) / weight_fg as f64;

        let variance = weight_bg as f64 * weight_fg as f64 * (mean_bg - mean_fg).powi(2);
        if variance > best_variance {
            best_variance = variance;
            best_threshold = t as u8;
        }
    }

    best_threshold
}
