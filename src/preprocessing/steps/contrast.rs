use image::GrayImage;

/// Gain applied to each pixel's distance from mid-grey
const CONTRAST_FACTOR: f32 = 1.5;
const MID_GREY: f32 = 128.0;

/// Stretch contrast around mid-grey so faint anti-aliased lines darken
pub fn apply(mut image: GrayImage) -> GrayImage {
    let lut = contrast_table();
    for pixel in image.pixels_mut() {
        pixel.0[0] = lut[pixel.0[0] as usize];
    }
    image
}

fn contrast_table() -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (value, slot) in lut.iter_mut().enumerate() {
        let boosted = MID_GREY + CONTRAST_FACTOR * (value as f32 - MID_GREY);
        *slot = boosted.round().clamp(0.0, 255.0) as u8;
    }
    lut
}
