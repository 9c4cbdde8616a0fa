//! The editor session: owns the working and original buffers, the undo
//! history, tool state and viewport, and exposes the pointer and keyboard
//! entry points the host drives.

use std::path::Path;

use image::RgbaImage;
use log::debug;

use crate::config::EditorConfig;
use crate::error::{LoadError, SaveError};
use crate::export::{self, Uploader};
use crate::history::History;
use crate::loader;
use crate::stroke;
use crate::viewport::Viewport;
use crate::wand;

// ============================================================================
// TOOLS
// ============================================================================

pub const MIN_BRUSH_SIZE: u32 = 2;
pub const MAX_BRUSH_SIZE: u32 = 100;
pub const MAX_TOLERANCE: u8 = 100;

/// How much one bracket keypress moves the active parameter.
const ADJUST_STEP: i32 = 1;

/// The three correction tools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    /// Clear alpha under the brush.
    Erase,
    /// Copy pixels back from the original under the brush.
    Restore,
    /// One-click contiguous region removal.
    MagicWand,
}

/// Active tool plus its parameters. `size` is the brush diameter in display
/// units for Erase/Restore; `tolerance` drives the Magic Wand match.
#[derive(Clone, Copy, Debug)]
pub struct ToolProperties {
    pub tool: Tool,
    size: u32,
    tolerance: u8,
}

impl Default for ToolProperties {
    fn default() -> Self {
        Self {
            tool: Tool::Erase,
            size: 20,
            tolerance: 30,
        }
    }
}

impl ToolProperties {
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    pub fn set_tolerance(&mut self, tolerance: u8) {
        self.tolerance = tolerance.min(MAX_TOLERANCE);
    }

    /// Step the parameter the active tool cares about: tolerance for the
    /// wand, brush size otherwise. Clamped at the bounds.
    pub fn adjust(&mut self, delta: i32) {
        match self.tool {
            Tool::MagicWand => {
                self.tolerance = (self.tolerance as i32 + delta).clamp(0, MAX_TOLERANCE as i32) as u8;
            }
            Tool::Erase | Tool::Restore => {
                self.size = (self.size as i32 + delta)
                    .clamp(MIN_BRUSH_SIZE as i32, MAX_BRUSH_SIZE as i32)
                    as u32;
            }
        }
    }
}

// ============================================================================
// KEYBOARD ACTIONS
// ============================================================================

/// Session-level commands the keyboard shortcuts map onto. Hosts can also
/// synthesize these directly from their own UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorAction {
    SetTool(Tool),
    Undo,
    Redo,
    AdjustDown,
    AdjustUp,
}

/// Modifier state accompanying a key event. `command` is Ctrl on
/// Linux/Windows and Cmd on macOS.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub command: bool,
    pub shift: bool,
}

/// The keys the editor binds. Anything else never reaches the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    B,
    R,
    M,
    Z,
    LeftBracket,
    RightBracket,
}

/// The shortcut table: B/R/M pick tools, Ctrl/Cmd+Z undoes (plus Shift
/// redoes), brackets step the active tool's parameter.
pub fn action_for_key(key: Key, mods: Modifiers) -> Option<EditorAction> {
    match (key, mods.command, mods.shift) {
        (Key::Z, true, true) => Some(EditorAction::Redo),
        (Key::Z, true, false) => Some(EditorAction::Undo),
        (Key::B, false, _) => Some(EditorAction::SetTool(Tool::Erase)),
        (Key::R, false, _) => Some(EditorAction::SetTool(Tool::Restore)),
        (Key::M, false, _) => Some(EditorAction::SetTool(Tool::MagicWand)),
        (Key::LeftBracket, false, _) => Some(EditorAction::AdjustDown),
        (Key::RightBracket, false, _) => Some(EditorAction::AdjustUp),
        _ => None,
    }
}

// ============================================================================
// EDITOR SESSION
// ============================================================================

/// In-flight brush gesture. Exists only between pointer-down and
/// pointer-up/leave; the tool is captured at the down so switching tools
/// mid-drag cannot change the gesture underway.
#[derive(Clone, Copy, Debug)]
struct StrokeSession {
    tool: Tool,
    last: (f32, f32),
}

/// One editing session over a loaded image.
///
/// The working buffer is the surface all edits mutate; the original buffer
/// is the untouched load-time copy the Restore tool reads from. Dropping
/// the session discards both plus the history, with no side effects.
#[derive(Debug)]
pub struct EditorSession {
    working: RgbaImage,
    original: RgbaImage,
    history: History,
    tools: ToolProperties,
    viewport: Viewport,
    stroke: Option<StrokeSession>,
    config: EditorConfig,
}

impl EditorSession {
    /// Open a session over an already-decoded image. The resolution cap
    /// still applies; the initial state becomes history entry #0.
    pub fn from_image(image: RgbaImage, config: EditorConfig) -> Self {
        let image = loader::cap_resolution(image, config.max_dimension);
        let (w, h) = image.dimensions();
        let mut history = History::new(config.max_history);
        history.push(image.clone());
        debug!("Session opened on a {w}x{h} buffer");
        Self {
            working: image.clone(),
            original: image,
            history,
            tools: ToolProperties::default(),
            viewport: Viewport::new(w, h),
            stroke: None,
            config,
        }
    }

    /// Fetch the source image over HTTP and open a session on it.
    pub fn load_url(url: &str, config: EditorConfig) -> Result<Self, LoadError> {
        let agent = loader::build_agent(config.timeout_secs);
        let image = loader::load_url(&agent, url, &config)?;
        Ok(Self::from_image(image, config))
    }

    /// Read the source image from disk and open a session on it.
    pub fn load_path(path: &Path, config: EditorConfig) -> Result<Self, LoadError> {
        let image = loader::load_path(path, &config)?;
        Ok(Self::from_image(image, config))
    }

    /// Decode already-acquired bytes and open a session on them.
    pub fn load_bytes(bytes: &[u8], config: EditorConfig) -> Result<Self, LoadError> {
        let image = loader::load_bytes(bytes, &config)?;
        Ok(Self::from_image(image, config))
    }

    // ------------------------------------------------------------------
    // Pointer events (display-space coordinates)
    // ------------------------------------------------------------------

    /// Pointer pressed. Magic Wand fires its whole removal here and records
    /// history immediately when it changed anything; the brushes draw their
    /// initial dot and start a drag gesture.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        match self.tools.tool {
            Tool::MagicWand => {
                let (px, py) = self.viewport.to_pixel((x, y));
                let cleared =
                    wand::remove_region(&mut self.working, px, py, self.tools.tolerance());
                if cleared > 0 {
                    self.push_snapshot();
                    debug!("Wand removed {cleared} pixels around ({px}, {py})");
                }
            }
            tool => {
                let p = self.viewport.to_buffer((x, y));
                self.apply_brush(tool, p, p);
                self.stroke = Some(StrokeSession { tool, last: p });
            }
        }
    }

    /// Pointer moved while held: sweep a segment from the last sample.
    /// Without an active gesture this does nothing.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let Some(active) = self.stroke else { return };
        let p = self.viewport.to_buffer((x, y));
        self.apply_brush(active.tool, active.last, p);
        self.stroke = Some(StrokeSession {
            tool: active.tool,
            last: p,
        });
    }

    /// Pointer released: the whole drag becomes one undoable step.
    pub fn pointer_up(&mut self) {
        if self.stroke.take().is_some() {
            self.push_snapshot();
            debug!("Stroke committed");
        }
    }

    /// Pointer left the element mid-drag; ends the gesture like a release.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    fn apply_brush(&mut self, tool: Tool, from: (f32, f32), to: (f32, f32)) {
        let radius = self.brush_radius_px();
        match tool {
            Tool::Erase => stroke::erase_segment(&mut self.working, from, to, radius),
            Tool::Restore => {
                stroke::restore_segment(&mut self.working, &self.original, from, to, radius)
            }
            Tool::MagicWand => {}
        }
    }

    fn push_snapshot(&mut self) {
        self.history.push(self.working.clone());
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Step back one gesture. During a drag the undo consumes itself
    /// aborting the gesture: the stroke never reached history, so rolling
    /// back to the current snapshot removes it (and it cannot be redone).
    /// Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        if self.stroke.take().is_some() {
            if let Some(current) = self.history.current() {
                self.working = current.clone();
            }
            return true;
        }
        if let Some(snapshot) = self.history.undo() {
            self.working = snapshot.clone();
            true
        } else {
            false
        }
    }

    /// Step forward again after an undo. A drag in flight is aborted first,
    /// same as in `undo`. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        if self.stroke.take().is_some() {
            if let Some(current) = self.history.current() {
                self.working = current.clone();
            }
        }
        if let Some(snapshot) = self.history.redo() {
            self.working = snapshot.clone();
            true
        } else {
            false
        }
    }

    /// Throw away every edit and go back to the loaded image. Undoable like
    /// any other gesture.
    pub fn reset(&mut self) {
        self.stroke = None;
        self.working = self.original.clone();
        self.push_snapshot();
    }

    // ------------------------------------------------------------------
    // Keyboard
    // ------------------------------------------------------------------

    /// Feed a raw key event. Returns whether the key mapped to an action.
    pub fn handle_key(&mut self, key: Key, mods: Modifiers) -> bool {
        match action_for_key(key, mods) {
            Some(action) => {
                self.apply_action(action);
                true
            }
            None => false,
        }
    }

    pub fn apply_action(&mut self, action: EditorAction) {
        match action {
            EditorAction::SetTool(tool) => self.tools.tool = tool,
            EditorAction::Undo => {
                self.undo();
            }
            EditorAction::Redo => {
                self.redo();
            }
            EditorAction::AdjustDown => self.tools.adjust(-ADJUST_STEP),
            EditorAction::AdjustUp => self.tools.adjust(ADJUST_STEP),
        }
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Encode the working buffer as PNG without uploading, for hosts that
    /// persist through their own channel.
    pub fn export_png(&self) -> Result<Vec<u8>, SaveError> {
        export::encode_png(&self.working)
    }

    /// Encode and upload the refined image, returning the persisted URL.
    ///
    /// Runs synchronously under the exclusive borrow, so no edit can land
    /// while a save is outstanding. On failure nothing in the session has
    /// changed and the save can simply be retried.
    pub fn save(&mut self) -> Result<String, SaveError> {
        let png = export::encode_png(&self.working)?;
        Uploader::new(&self.config).upload_png(&png)
    }

    // ------------------------------------------------------------------
    // State access
    // ------------------------------------------------------------------

    pub fn working(&self) -> &RgbaImage {
        &self.working
    }

    pub fn original(&self) -> &RgbaImage {
        &self.original
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.working.dimensions()
    }

    pub fn tool(&self) -> Tool {
        self.tools.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tools.tool = tool;
    }

    pub fn brush_size(&self) -> u32 {
        self.tools.size()
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.tools.set_size(size);
    }

    pub fn tolerance(&self) -> u8 {
        self.tools.tolerance()
    }

    pub fn set_tolerance(&mut self, tolerance: u8) {
        self.tools.set_tolerance(tolerance);
    }

    /// Brush footprint radius in buffer pixels. Scales with the intrinsic
    /// buffer/display ratio but not with zoom; the host can use it to draw
    /// a cursor outline.
    pub fn brush_radius_px(&self) -> f32 {
        self.tools.size() as f32 * self.viewport.buffer_scale() / 2.0
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Report the displayed element's measured bounding box (zoom applied).
    pub fn set_display_box(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.viewport.set_display_box(x, y, width, height);
    }

    pub fn zoom(&self) -> f32 {
        self.viewport.zoom()
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.viewport.set_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_memory_bytes(&self) -> usize {
        self.history.memory_bytes()
    }

    pub fn is_dragging(&self) -> bool {
        self.stroke.is_some()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
}
