//! Pixel synthesis for the app badge.
//!
//! The badge is a rounded square filled with the base color, with a plate
//! glyph in the center: an opaque white rim and a translucent white inner
//! disc. Every pixel is a pure function of its position, the raster size and
//! the base color.

use image::{ImageBuffer, Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const PLATE_RIM: Rgba<u8> = Rgba([255, 255, 255, 255]);
const PLATE_FILL: Rgba<u8> = Rgba([255, 255, 255, 200]);

/// Compute the color of pixel `(x, y)` of a `width` x `height` badge.
pub fn badge_pixel(x: u32, y: u32, width: u32, height: u32, base: Rgba<u8>) -> Rgba<u8> {
    if outside_rounded_corner(x, y, width, height) {
        return TRANSPARENT;
    }

    let center_x = (width / 2) as f64;
    let center_y = (height / 2) as f64;
    let icon_size = (width.min(height) / 3) as f64;
    let dist_from_center = distance(x as f64, y as f64, center_x, center_y);

    if dist_from_center < icon_size {
        if dist_from_center > icon_size * 0.6 && dist_from_center < icon_size * 0.8 {
            return PLATE_RIM;
        }
        if dist_from_center < icon_size * 0.4 {
            return PLATE_FILL;
        }
    }

    Rgba([base[0], base[1], base[2], 255])
}

/// Render a full `size` x `size` badge.
pub fn render_badge(size: u32, base: Rgba<u8>) -> RgbaImage {
    ImageBuffer::from_fn(size, size, |x, y| badge_pixel(x, y, size, size, base))
}

/// Corner radius used for a `width` x `height` badge.
pub fn corner_radius(width: u32, height: u32) -> u32 {
    width.min(height) / 5
}

/// True when `(x, y)` sits in one of the four corner quadrants and lies
/// farther than the corner radius from that quadrant's anchor.
fn outside_rounded_corner(x: u32, y: u32, width: u32, height: u32) -> bool {
    let radius = corner_radius(width, height);

    let anchor_x = if x < radius {
        radius
    } else if x >= width.saturating_sub(radius) {
        width - radius - 1
    } else {
        return false;
    };
    let anchor_y = if y < radius {
        radius
    } else if y >= height.saturating_sub(radius) {
        height - radius - 1
    } else {
        return false;
    };

    distance(x as f64, y as f64, anchor_x as f64, anchor_y as f64) > radius as f64
}

fn distance(x: f64, y: f64, cx: f64, cy: f64) -> f64 {
    let dx = x - cx;
    let dy = y - cy;
    (dx * dx + dy * dy).sqrt()
}
