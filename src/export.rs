//! Export pipeline: lossless PNG encoding of the working buffer and the
//! multipart upload handing it to the storage endpoint.

use image::RgbaImage;
use image::codecs::png::PngEncoder;
use log::{debug, info, warn};
use serde::Deserialize;
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::error::SaveError;
use crate::loader::build_agent;

// ============================================================================
// PNG ENCODING
// ============================================================================

/// Encode the buffer as PNG. Lossless and alpha-preserving, so the erased
/// regions stay erased in the persisted file.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, SaveError> {
    let mut bytes = Vec::new();
    let encoder = PngEncoder::new(&mut bytes);
    #[allow(deprecated)]
    encoder.encode(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(bytes)
}

// ============================================================================
// MULTIPART UPLOAD
// ============================================================================

/// A single-part multipart/form-data body carrying the PNG under the `file`
/// field, plus the boundary the Content-Type header has to repeat.
pub(crate) struct MultipartPng {
    pub boundary: String,
    pub filename: String,
    pub body: Vec<u8>,
}

pub(crate) fn multipart_png(png: &[u8]) -> MultipartPng {
    let id = Uuid::new_v4();
    let boundary = format!("----touchup-{}", id.simple());
    let filename = format!("refined-{id}.png");

    let mut body = Vec::with_capacity(png.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(png);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    MultipartPng {
        boundary,
        filename,
        body,
    }
}

/// The storage endpoint answers either `{ success, data: { file: { url } } }`
/// or the flatter `{ success, data: { url } }`.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    file: Option<UploadFile>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadFile {
    url: Option<String>,
}

fn parse_upload_response(body: &str) -> Result<String, SaveError> {
    let parsed: UploadResponse = serde_json::from_str(body)?;
    if !parsed.success {
        return Err(SaveError::BadResponse(
            "endpoint reported success=false".into(),
        ));
    }
    parsed
        .data
        .and_then(|d| d.file.and_then(|f| f.url).or(d.url))
        .ok_or_else(|| SaveError::BadResponse("no file URL in response".into()))
}

/// Posts encoded PNGs to the configured storage endpoint and returns the
/// persisted URL.
pub struct Uploader {
    agent: ureq::Agent,
    endpoint: String,
    retry_once: bool,
}

impl Uploader {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            agent: build_agent(config.timeout_secs),
            endpoint: config.upload_url.clone(),
            retry_once: config.retry_once,
        }
    }

    /// Upload one encoded PNG. Retries once on a transport-level failure
    /// when configured to; HTTP status failures are never retried.
    pub fn upload_png(&self, png: &[u8]) -> Result<String, SaveError> {
        let part = multipart_png(png);
        let content_type = format!("multipart/form-data; boundary={}", part.boundary);
        debug!(
            "Uploading {} as {} bytes of multipart to {}",
            part.filename,
            part.body.len(),
            self.endpoint
        );

        let mut response = match self.post(&content_type, &part.body) {
            Ok(r) => r,
            Err(e) if self.retry_once => {
                warn!("Upload failed, retrying once: {e}");
                self.post(&content_type, &part.body)?
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(SaveError::UploadStatus(status.as_u16()));
        }

        let text = response.body_mut().read_to_string()?;
        let url = parse_upload_response(&text)?;
        info!("Upload complete: {url}");
        Ok(url)
    }

    fn post(
        &self,
        content_type: &str,
        body: &[u8],
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        self.agent
            .post(self.endpoint.as_str())
            .header("Content-Type", content_type)
            .send(body)
    }
}
