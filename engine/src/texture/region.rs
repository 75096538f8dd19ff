//! Named texture regions cut out of the floor bitmap.

use image::RgbaImage;
use image::imageops;

use crate::floorplan::Bounds;

/// Copy the pixels under `bounds` into a standalone bitmap.
///
/// The rectangle is clipped to the image; `None` when nothing is left.
pub fn crop_region(image: &RgbaImage, bounds: &Bounds) -> Option<RgbaImage> {
    if bounds.is_degenerate() {
        return None;
    }
    let (width, height) = image.dimensions();
    let x0 = bounds.x.max(0.0).floor() as u32;
    let y0 = bounds.y.max(0.0).floor() as u32;
    let x1 = ((bounds.x + bounds.width).ceil().max(0.0) as u32).min(width);
    let y1 = ((bounds.y + bounds.height).ceil().max(0.0) as u32).min(height);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some(imageops::crop_imm(image, x0, y0, x1 - x0, y1 - y0).to_image())
}
