use std::fmt::{self, Display};

/// Failure while acquiring or decoding the source image.
///
/// Load errors are terminal: there is no editable buffer until a load
/// succeeds, so callers typically surface these and stop.
#[derive(Debug)]
pub enum LoadError {
    /// The HTTP fetch itself failed (DNS, connect, TLS, timeout).
    Fetch(ureq::Error),
    /// The server answered the fetch with a non-success status.
    FetchStatus(u16),
    /// Reading the image from the local filesystem failed.
    Io(std::io::Error),
    /// The bytes were fetched but could not be decoded as an image.
    Decode(image::ImageError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Fetch(e) => write!(f, "Image fetch failed: {e}"),
            LoadError::FetchStatus(code) => write!(f, "Image fetch returned HTTP {code}"),
            LoadError::Io(e) => write!(f, "Image read failed: {e}"),
            LoadError::Decode(e) => write!(f, "Image decode failed: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Fetch(e) => Some(e),
            LoadError::FetchStatus(_) => None,
            LoadError::Io(e) => Some(e),
            LoadError::Decode(e) => Some(e),
        }
    }
}

impl From<ureq::Error> for LoadError {
    fn from(e: ureq::Error) -> Self {
        LoadError::Fetch(e)
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<image::ImageError> for LoadError {
    fn from(e: image::ImageError) -> Self {
        LoadError::Decode(e)
    }
}

/// Failure while exporting or uploading the refined image.
///
/// Save errors are recoverable: the in-memory session is untouched, so the
/// caller can simply save again.
#[derive(Debug)]
pub enum SaveError {
    /// PNG encoding of the working buffer failed.
    Encode(image::ImageError),
    /// The upload POST failed at the transport level.
    Upload(ureq::Error),
    /// The storage endpoint answered with a non-success status.
    UploadStatus(u16),
    /// The endpoint answered 2xx but the body was not the expected JSON,
    /// reported `success: false`, or carried no file URL.
    BadResponse(String),
}

impl Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Encode(e) => write!(f, "PNG encode failed: {e}"),
            SaveError::Upload(e) => write!(f, "Upload failed: {e}"),
            SaveError::UploadStatus(code) => write!(f, "Upload returned HTTP {code}"),
            SaveError::BadResponse(s) => write!(f, "Unexpected upload response: {s}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Encode(e) => Some(e),
            SaveError::Upload(e) => Some(e),
            SaveError::UploadStatus(_) | SaveError::BadResponse(_) => None,
        }
    }
}

impl From<image::ImageError> for SaveError {
    fn from(e: image::ImageError) -> Self {
        SaveError::Encode(e)
    }
}

impl From<ureq::Error> for SaveError {
    fn from(e: ureq::Error) -> Self {
        SaveError::Upload(e)
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::BadResponse(e.to_string())
    }
}
