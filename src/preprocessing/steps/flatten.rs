use crate::loader::RasterImage;
use image::{Rgb, RgbImage};

/// Composite transparent uploads onto opaque white
///
/// Naive alpha dropping turns transparent background black, which inverts the
/// meaning of the whole capture. Opaque uploads are only coerced to RGB.
pub fn apply(raster: RasterImage) -> RgbImage {
    if !raster.mode.has_alpha() {
        return raster.image.into_rgb8();
    }

    let rgba = raster.image.into_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (channel as u32, alpha as u32);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}
