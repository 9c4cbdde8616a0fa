//! Interactive refinement of automated background-removal results.
//!
//! A product's background remover gets most pixels right; this crate is the
//! hand-correction pass. It owns two same-sized RGBA buffers (the working
//! surface and the untouched original), applies erase/restore brush strokes
//! and magic-wand flood fills to the working one, keeps a bounded undo/redo
//! history of full-buffer snapshots, and exports the result as PNG straight
//! to a storage endpoint.
//!
//! The crate is headless: the host application owns the event loop and the
//! rendering, measures the on-screen display box, and forwards pointer and
//! keyboard events to an [`EditorSession`].
//!
//! ## Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use touchup::{EditorConfig, EditorSession, Tool};
//!
//! let source = RgbaImage::from_pixel(64, 64, Rgba([180, 40, 40, 255]));
//! let mut session = EditorSession::from_image(source, EditorConfig::default());
//!
//! // Erase a stroke, then change your mind.
//! session.pointer_down(10.0, 10.0);
//! session.pointer_move(40.0, 10.0);
//! session.pointer_up();
//! assert!(session.can_undo());
//! session.undo();
//!
//! // One wand click removes the whole contiguous region.
//! session.set_tool(Tool::MagicWand);
//! session.pointer_down(32.0, 32.0);
//! assert!(session.working().pixels().all(|p| p[3] == 0));
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod loader;
pub mod session;
pub mod stroke;
pub mod viewport;
pub mod wand;

pub use config::{EditorConfig, MAX_DIMENSION, MAX_HISTORY};
pub use error::{LoadError, SaveError};
pub use export::Uploader;
pub use history::History;
pub use session::{
    EditorAction, EditorSession, Key, MAX_BRUSH_SIZE, MAX_TOLERANCE, MIN_BRUSH_SIZE, Modifiers,
    Tool, ToolProperties, action_for_key,
};
pub use viewport::{MAX_ZOOM, MIN_ZOOM, Viewport, ZOOM_STEP};
pub use wand::NEGLIGIBLE_ALPHA;
