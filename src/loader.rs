//! Source image acquisition: fetch or read the background-removed image,
//! decode it, and cap its resolution to keep the editing buffers bounded.

use std::path::Path;
use std::time::Duration;

use image::RgbaImage;
use image::imageops::FilterType;
use log::{info, warn};

use crate::config::EditorConfig;
use crate::error::LoadError;

/// Refuse to buffer more than this from a fetch. Source images can be large
/// originals; ureq's own default body limit (10 MB) is too tight.
const MAX_DOWNLOAD_BYTES: u64 = 64 * 1024 * 1024;

/// Blocking HTTP agent shared by the fetch and upload paths. HTTP status
/// codes come back as plain responses so callers own the status handling.
pub(crate) fn build_agent(timeout_secs: u64) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .http_status_as_error(false)
        .build();
    ureq::Agent::new_with_config(config)
}

/// GET the image bytes, retrying once after a transport-level failure when
/// `retry_once` is set. Non-success statuses are never retried.
pub(crate) fn fetch_bytes(
    agent: &ureq::Agent,
    url: &str,
    retry_once: bool,
) -> Result<Vec<u8>, LoadError> {
    let mut response = match agent.get(url).call() {
        Ok(r) => r,
        Err(e) if retry_once => {
            warn!("Image fetch failed, retrying once: {e}");
            agent.get(url).call()?
        }
        Err(e) => return Err(e.into()),
    };

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::FetchStatus(status.as_u16()));
    }

    let bytes = response
        .body_mut()
        .with_config()
        .limit(MAX_DOWNLOAD_BYTES)
        .read_to_vec()?;
    Ok(bytes)
}

/// Decode fetched bytes into an RGBA buffer. Format is sniffed from the
/// bytes, so PNG, JPEG, WebP and BMP sources all land in the same place.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, LoadError> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}

/// Dimensions after applying the resolution cap: if the larger edge exceeds
/// `max_dim`, both edges shrink by the same factor (nearest integer) so the
/// larger edge lands exactly on `max_dim`. In-bounds sizes pass through.
pub fn capped_dimensions(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let larger = width.max(height);
    if larger <= max_dim || larger == 0 {
        return (width, height);
    }
    let scale = max_dim as f64 / larger as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Downscale the decoded image to the resolution cap with bilinear filtering.
pub fn cap_resolution(image: RgbaImage, max_dim: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let (tw, th) = capped_dimensions(w, h, max_dim);
    if (tw, th) == (w, h) {
        return image;
    }
    info!("Capping {w}x{h} source to {tw}x{th}");
    image::imageops::resize(&image, tw, th, FilterType::Triangle)
}

/// Fetch, decode and cap an image from a URL.
pub fn load_url(
    agent: &ureq::Agent,
    url: &str,
    config: &EditorConfig,
) -> Result<RgbaImage, LoadError> {
    let bytes = fetch_bytes(agent, url, config.retry_once)?;
    load_bytes(&bytes, config)
}

/// Read, decode and cap an image from the local filesystem.
pub fn load_path(path: &Path, config: &EditorConfig) -> Result<RgbaImage, LoadError> {
    let bytes = std::fs::read(path)?;
    load_bytes(&bytes, config)
}

/// Decode and cap an already-acquired byte buffer.
pub fn load_bytes(bytes: &[u8], config: &EditorConfig) -> Result<RgbaImage, LoadError> {
    let decoded = decode(bytes)?;
    let capped = cap_resolution(decoded, config.max_dimension);
    let (w, h) = capped.dimensions();
    info!("Loaded {w}x{h} source image");
    Ok(capped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_bounds_dimensions_pass_through() {
        assert_eq!(capped_dimensions(800, 600, 2048), (800, 600));
        assert_eq!(capped_dimensions(2048, 2048, 2048), (2048, 2048));
        assert_eq!(capped_dimensions(1, 1, 2048), (1, 1));
    }

    #[test]
    fn larger_edge_lands_exactly_on_the_cap() {
        assert_eq!(capped_dimensions(4096, 3072, 2048), (2048, 1536));
        assert_eq!(capped_dimensions(3072, 4096, 2048), (1536, 2048));
        assert_eq!(capped_dimensions(4096, 4096, 2048), (2048, 2048));
    }

    #[test]
    fn rounding_is_nearest_integer() {
        // 3000 -> 2048 is a factor of 0.68266..; 2000 * that = 1365.33.
        assert_eq!(capped_dimensions(3000, 2000, 2048), (2048, 1365));
        // 2049 wide: height 3 * (2048/2049) = 2.9985 rounds to 3.
        assert_eq!(capped_dimensions(2049, 3, 2048), (2048, 3));
    }

    #[test]
    fn extreme_aspect_never_collapses_to_zero() {
        let (w, h) = capped_dimensions(100_000, 2, 2048);
        assert_eq!(w, 2048);
        assert!(h >= 1);
    }

    #[test]
    fn cap_resolution_resizes_only_when_needed() {
        let small = RgbaImage::new(100, 60);
        let kept = cap_resolution(small, 2048);
        assert_eq!(kept.dimensions(), (100, 60));

        let big = RgbaImage::new(200, 100);
        let capped = cap_resolution(big, 50);
        assert_eq!(capped.dimensions(), (50, 25));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }
}
