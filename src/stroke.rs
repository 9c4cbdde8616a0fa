//! Brush rasterization for the erase and restore tools.
//!
//! A stroke segment is a capsule: every pixel whose center lies within
//! `radius` of the line between the previous and current pointer sample is
//! affected (inclusive at exactly the radius). A click with no drag is the
//! degenerate segment, a plain filled circle.

use image::RgbaImage;

/// Clear the alpha of every pixel under a capsule from `start` to `end`.
/// Color channels are left alone so a later restore can bring them back.
pub fn erase_segment(buffer: &mut RgbaImage, start: (f32, f32), end: (f32, f32), radius: f32) {
    let (width, height) = buffer.dimensions();
    for_each_capsule_pixel(width, height, start, end, radius, |x, y| {
        buffer.get_pixel_mut(x, y)[3] = 0;
    });
}

/// Copy all four channels from `original` back into `buffer` for every pixel
/// under a capsule from `start` to `end`. Pixel-exact, so restoring the same
/// region twice is a no-op the second time.
pub fn restore_segment(
    buffer: &mut RgbaImage,
    original: &RgbaImage,
    start: (f32, f32),
    end: (f32, f32),
    radius: f32,
) {
    debug_assert_eq!(buffer.dimensions(), original.dimensions());
    let (width, height) = buffer.dimensions();
    for_each_capsule_pixel(width, height, start, end, radius, |x, y| {
        *buffer.get_pixel_mut(x, y) = *original.get_pixel(x, y);
    });
}

/// Walk every buffer pixel whose center is within `radius` of the segment.
/// Scans the segment's padded bounding box, clamped to the buffer.
fn for_each_capsule_pixel(
    width: u32,
    height: u32,
    start: (f32, f32),
    end: (f32, f32),
    radius: f32,
    mut apply: impl FnMut(u32, u32),
) {
    let radius_sq = radius * radius;
    if radius_sq < 0.001 || width == 0 || height == 0 {
        return;
    }

    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let len_sq = dx * dx + dy * dy;

    let min_x = (start.0.min(end.0) - radius).max(0.0) as u32;
    let max_x = ((start.0.max(end.0) + radius) as u32).min(width - 1);
    let min_y = (start.1.min(end.1) - radius).max(0.0) as u32;
    let max_y = ((start.1.max(end.1) + radius) as u32).min(height - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f32;
            let py = y as f32;
            let dist_sq = if len_sq < 0.0001 {
                // Degenerate segment: plain circle around the start point.
                let ddx = px - start.0;
                let ddy = py - start.1;
                ddx * ddx + ddy * ddy
            } else {
                // Distance from the pixel center to the closest point on the segment.
                let t = ((px - start.0) * dx + (py - start.1) * dy) / len_sq;
                let t = t.clamp(0.0, 1.0);
                let ddx = px - (start.0 + t * dx);
                let ddy = py - (start.1 + t * dy);
                ddx * ddx + ddy * ddy
            };
            if dist_sq <= radius_sq {
                apply(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn opaque_red(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([200, 30, 30, 255]))
    }

    fn alpha_at(img: &RgbaImage, x: u32, y: u32) -> u8 {
        img.get_pixel(x, y)[3]
    }

    #[test]
    fn erase_dot_clears_a_circle() {
        let mut buf = opaque_red(20, 20);
        erase_segment(&mut buf, (10.0, 10.0), (10.0, 10.0), 3.0);

        assert_eq!(alpha_at(&buf, 10, 10), 0);
        // Exactly on the radius is included.
        assert_eq!(alpha_at(&buf, 13, 10), 0);
        assert_eq!(alpha_at(&buf, 12, 12), 0); // dist ~2.83
        // Just outside stays opaque.
        assert_eq!(alpha_at(&buf, 14, 10), 255);
        assert_eq!(alpha_at(&buf, 13, 13), 255); // dist ~4.24
    }

    #[test]
    fn erase_keeps_color_channels() {
        let mut buf = opaque_red(8, 8);
        erase_segment(&mut buf, (4.0, 4.0), (4.0, 4.0), 2.0);
        let px = buf.get_pixel(4, 4);
        assert_eq!((px[0], px[1], px[2], px[3]), (200, 30, 30, 0));
    }

    #[test]
    fn erase_segment_sweeps_a_capsule() {
        let mut buf = opaque_red(30, 20);
        erase_segment(&mut buf, (5.0, 10.0), (20.0, 10.0), 2.0);

        // Along the spine and inside the swept band.
        assert_eq!(alpha_at(&buf, 5, 10), 0);
        assert_eq!(alpha_at(&buf, 12, 10), 0);
        assert_eq!(alpha_at(&buf, 20, 10), 0);
        assert_eq!(alpha_at(&buf, 12, 8), 0); // 2 above the spine
        // The round cap extends past the endpoint.
        assert_eq!(alpha_at(&buf, 22, 10), 0);
        // Outside the band.
        assert_eq!(alpha_at(&buf, 12, 7), 255);
        assert_eq!(alpha_at(&buf, 23, 10), 255);
    }

    #[test]
    fn strokes_clip_at_buffer_edges() {
        let mut buf = opaque_red(10, 10);
        erase_segment(&mut buf, (0.0, 0.0), (0.0, 0.0), 5.0);
        assert_eq!(alpha_at(&buf, 0, 0), 0);
        assert_eq!(alpha_at(&buf, 4, 0), 0);
        assert_eq!(alpha_at(&buf, 9, 9), 255);

        // Fully outside the buffer: nothing happens.
        let mut buf = opaque_red(10, 10);
        erase_segment(&mut buf, (-50.0, -50.0), (-40.0, -50.0), 3.0);
        assert!(buf.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn zero_radius_is_a_no_op() {
        let mut buf = opaque_red(10, 10);
        erase_segment(&mut buf, (5.0, 5.0), (5.0, 5.0), 0.0);
        assert!(buf.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn restore_copies_original_pixels_exactly() {
        // Original with a per-pixel gradient so copies are distinguishable.
        let original = RgbaImage::from_fn(16, 16, |x, y| {
            Rgba([x as u8 * 10, y as u8 * 10, 77, 255])
        });
        let mut working = original.clone();
        erase_segment(&mut working, (8.0, 8.0), (8.0, 8.0), 4.0);
        assert_eq!(alpha_at(&working, 8, 8), 0);

        restore_segment(&mut working, &original, (8.0, 8.0), (8.0, 8.0), 4.0);
        assert_eq!(working.get_pixel(8, 8), original.get_pixel(8, 8));
        assert_eq!(working.get_pixel(6, 8), original.get_pixel(6, 8));
    }

    #[test]
    fn restore_twice_equals_restore_once() {
        let original = RgbaImage::from_fn(16, 16, |x, y| {
            Rgba([x as u8 * 9, y as u8 * 9, 50, 255])
        });
        let mut working = original.clone();
        erase_segment(&mut working, (8.0, 8.0), (12.0, 8.0), 3.0);

        restore_segment(&mut working, &original, (8.0, 8.0), (12.0, 8.0), 3.0);
        let once = working.clone();
        restore_segment(&mut working, &original, (8.0, 8.0), (12.0, 8.0), 3.0);
        assert_eq!(working.as_raw(), once.as_raw());
    }

    #[test]
    fn restore_leaves_pixels_outside_the_footprint() {
        let original = opaque_red(16, 16);
        let mut working = original.clone();
        // Erase everything, then restore only a dot.
        erase_segment(&mut working, (8.0, 8.0), (8.0, 8.0), 100.0);
        restore_segment(&mut working, &original, (2.0, 2.0), (2.0, 2.0), 1.0);

        assert_eq!(alpha_at(&working, 2, 2), 255);
        assert_eq!(alpha_at(&working, 12, 12), 0);
    }
}
