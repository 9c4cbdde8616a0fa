//! Magic-wand removal: one click makes a contiguous color-similar region
//! transparent.

use image::RgbaImage;

/// Alpha below this counts as "already removed". Such pixels cannot seed a
/// fill and are never matched into one.
pub const NEGLIGIBLE_ALPHA: u8 = 10;

/// Flood-fill from the seed pixel and clear the alpha of the matched region.
///
/// 4-connected DFS on a `Vec` stack of packed flat indices (`y * width + x`),
/// visited pixels marked as they are pushed so nothing is tested twice. A
/// candidate matches when every one of its four channels is within
/// `tolerance` of the seed's and its own alpha is at least `NEGLIGIBLE_ALPHA`.
///
/// Returns the number of pixels cleared; 0 means the click was a no-op
/// (seed out of bounds or already transparent).
pub fn remove_region(buffer: &mut RgbaImage, seed_x: u32, seed_y: u32, tolerance: u8) -> usize {
    let (width, height) = buffer.dimensions();
    if seed_x >= width || seed_y >= height {
        return 0;
    }

    // Capture the seed before the fill clears it.
    let seed = buffer.get_pixel(seed_x, seed_y).0;
    if seed[3] < NEGLIGIBLE_ALPHA {
        return 0;
    }

    // Per-channel absolute difference, all four channels within tolerance.
    #[inline(always)]
    fn matches(p: [u8; 4], seed: [u8; 4], tol: u8) -> bool {
        if p[3] < NEGLIGIBLE_ALPHA {
            return false;
        }
        p[0].abs_diff(seed[0]) <= tol
            && p[1].abs_diff(seed[1]) <= tol
            && p[2].abs_diff(seed[2]) <= tol
            && p[3].abs_diff(seed[3]) <= tol
    }

    let wu = width as usize;
    let mut visited = vec![false; wu * height as usize];
    let mut stack: Vec<u32> = Vec::with_capacity(4096);
    let mut cleared = 0usize;

    let seed_idx = seed_y as usize * wu + seed_x as usize;
    visited[seed_idx] = true;
    buffer.get_pixel_mut(seed_x, seed_y)[3] = 0;
    cleared += 1;
    stack.push(seed_idx as u32);

    while let Some(idx) = stack.pop() {
        let x = (idx as usize % wu) as u32;
        let y = (idx as usize / wu) as u32;

        // Check 4 neighbors, push unvisited matching ones.
        // Left
        if x > 0 {
            let ni = idx as usize - 1;
            if !visited[ni] && matches(buffer.get_pixel(x - 1, y).0, seed, tolerance) {
                visited[ni] = true;
                buffer.get_pixel_mut(x - 1, y)[3] = 0;
                cleared += 1;
                stack.push(ni as u32);
            }
        }
        // Right
        if x + 1 < width {
            let ni = idx as usize + 1;
            if !visited[ni] && matches(buffer.get_pixel(x + 1, y).0, seed, tolerance) {
                visited[ni] = true;
                buffer.get_pixel_mut(x + 1, y)[3] = 0;
                cleared += 1;
                stack.push(ni as u32);
            }
        }
        // Up
        if y > 0 {
            let ni = idx as usize - wu;
            if !visited[ni] && matches(buffer.get_pixel(x, y - 1).0, seed, tolerance) {
                visited[ni] = true;
                buffer.get_pixel_mut(x, y - 1)[3] = 0;
                cleared += 1;
                stack.push(ni as u32);
            }
        }
        // Down
        if y + 1 < height {
            let ni = idx as usize + wu;
            if !visited[ni] && matches(buffer.get_pixel(x, y + 1).0, seed, tolerance) {
                visited[ni] = true;
                buffer.get_pixel_mut(x, y + 1)[3] = 0;
                cleared += 1;
                stack.push(ni as u32);
            }
        }
    }

    cleared
}
