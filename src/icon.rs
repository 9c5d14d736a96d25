//! Application icon
//!
//! Renders the built-in window icon (a cloud with a download arrow on a
//! white rounded badge) at startup instead of shipping an image asset.

use egui::IconData;
use image::{ImageBuffer, Rgba, RgbaImage};

/// Icon edge length in pixels
pub const ICON_SIZE: u32 = 128;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const BADGE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BORDER: Rgba<u8> = Rgba([229, 231, 235, 255]);
const CLOUD: Rgba<u8> = Rgba([226, 232, 240, 255]);
const ARROW: Rgba<u8> = Rgba([63, 140, 255, 255]);

/// Render the application icon as viewport icon data
pub fn app_icon() -> IconData {
    let image = render_icon();
    IconData {
        rgba: image.into_raw(),
        width: ICON_SIZE,
        height: ICON_SIZE,
    }
}

/// Render the icon into an RGBA image buffer
fn render_icon() -> RgbaImage {
    let mut image = ImageBuffer::from_pixel(ICON_SIZE, ICON_SIZE, TRANSPARENT);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let (x, y) = (x as i32, y as i32);
        *pixel = if in_arrow(x, y) {
            ARROW
        } else if in_cloud(x, y) {
            CLOUD
        } else if in_badge(x, y) {
            if on_badge_border(x, y) {
                BORDER
            } else {
                BADGE
            }
        } else {
            TRANSPARENT
        };
    }
    image
}

/// Rounded-square badge, 12px padding with 22px corner radius
fn in_badge(x: i32, y: i32) -> bool {
    let (x1, y1, x2, y2, r) = (12, 12, 116, 116, 22);
    if x >= x1 + r && x <= x2 - r && y >= y1 && y <= y2 {
        return true;
    }
    if x >= x1 && x <= x2 && y >= y1 + r && y <= y2 - r {
        return true;
    }
    [(x1 + r, y1 + r), (x2 - r, y1 + r), (x1 + r, y2 - r), (x2 - r, y2 - r)]
        .iter()
        .any(|&(cx, cy)| {
            let (dx, dy) = (x - cx, y - cy);
            dx * dx + dy * dy <= r * r
        })
}

/// 1px badge outline: inside pixels with a 4-neighbor outside
fn on_badge_border(x: i32, y: i32) -> bool {
    [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
        .iter()
        .any(|&(nx, ny)| !in_badge(nx, ny))
}

/// Cloud silhouette as a union of four circles
fn in_cloud(x: i32, y: i32) -> bool {
    let (cx, cy) = (64, 70);
    [
        (cx - 20, cy - 6, 20),
        (cx, cy - 14, 26),
        (cx + 20, cy - 6, 20),
        (cx, cy + 2, 18),
    ]
    .iter()
    .any(|&(ox, oy, r)| {
        let (dx, dy) = (x - ox, y - oy);
        dx * dx + dy * dy <= r * r
    })
}

/// Download arrow: shaft, head and tray line
fn in_arrow(x: i32, y: i32) -> bool {
    let (cx, cy) = (64, 70);
    let base_y = cy + 6;

    // Shaft, 17px wide, ending at the head base
    if y >= cy - 24 && y < base_y && (x - cx).abs() <= 8 {
        return true;
    }

    // Head triangle pointing down
    let t = y - base_y;
    if (0..18).contains(&t) && (x - cx).abs() <= (12 - t).max(0) {
        return true;
    }

    // Tray line under the arrow, 3px thick
    let tray_y = base_y + 18 + 4;
    (y - tray_y).abs() <= 1 && x >= cx - 30 && x < cx + 30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_dimensions() {
        let icon = app_icon();
        assert_eq!(icon.width, ICON_SIZE);
        assert_eq!(icon.height, ICON_SIZE);
        assert_eq!(icon.rgba.len(), (ICON_SIZE * ICON_SIZE * 4) as usize);
    }

    #[test]
    fn test_corners_are_transparent() {
        let image = render_icon();
        for (x, y) in [(0, 0), (127, 0), (0, 127), (127, 127)] {
            assert_eq!(image.get_pixel(x, y)[3], 0, "corner ({x},{y}) not transparent");
        }
    }

    #[test]
    fn test_arrow_shaft_is_blue() {
        let image = render_icon();
        assert_eq!(*image.get_pixel(64, 60), ARROW);
    }

    #[test]
    fn test_badge_background_is_white() {
        let image = render_icon();
        assert_eq!(*image.get_pixel(20, 64), BADGE);
    }

    #[test]
    fn test_cloud_over_badge() {
        let image = render_icon();
        // Left lobe of the cloud, outside the arrow
        assert_eq!(*image.get_pixel(48, 76), CLOUD);
    }
}
