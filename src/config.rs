use serde::{Deserialize, Serialize};

/// Largest edge the editing buffers are allowed to have. Larger sources are
/// downscaled at load time, aspect ratio preserved.
pub const MAX_DIMENSION: u32 = 2048;

/// How many full-buffer snapshots the undo history retains.
pub const MAX_HISTORY: usize = 20;

/// Editor tunables. Hosts usually start from `EditorConfig::default()` and
/// override the upload endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old configs
pub struct EditorConfig {
    /// Cap applied to the larger buffer dimension at load time.
    pub max_dimension: u32,
    /// Undo history capacity, in snapshots.
    pub max_history: usize,
    /// Storage endpoint the refined PNG is POSTed to.
    pub upload_url: String,
    /// Global timeout for the fetch and upload calls, in seconds.
    pub timeout_secs: u64,
    /// Retry the fetch/upload once after a transport-level failure.
    pub retry_once: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
            max_history: MAX_HISTORY,
            upload_url: String::new(),
            timeout_secs: 30,
            retry_once: true,
        }
    }
}

impl EditorConfig {
    /// Convenience for the common "defaults plus an endpoint" setup.
    pub fn with_upload_url(url: impl Into<String>) -> Self {
        Self {
            upload_url: url.into(),
            ..Self::default()
        }
    }
}
