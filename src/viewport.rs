/// Lowest zoom the editor allows.
pub const MIN_ZOOM: f32 = 0.5;
/// Highest zoom the editor allows.
pub const MAX_ZOOM: f32 = 3.0;
/// Increment used by the zoom-in/zoom-out controls.
pub const ZOOM_STEP: f32 = 0.25;

/// Maps pointer positions from on-screen display units into buffer pixels.
///
/// Two independent scale factors stack: the intrinsic ratio between the
/// buffer resolution and the unzoomed display box (the host may show a
/// 2048px buffer in a 512px box), and the user-controlled zoom applied on
/// top. The display box is reported by the host *with* zoom applied, so the
/// transform first unscales by zoom, then rescales by the intrinsic ratio.
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Top-left corner of the displayed element, display units.
    box_origin: (f32, f32),
    /// On-screen size of the displayed element, measured with zoom applied.
    box_size: (f32, f32),
    /// Buffer resolution the mapped coordinates index into.
    buffer_size: (u32, u32),
    zoom: f32,
}

impl Viewport {
    /// Identity-mapped viewport: the display box starts at the origin with
    /// the buffer's own size, zoom 1. Hosts call `set_display_box` once
    /// layout is known.
    pub fn new(buffer_width: u32, buffer_height: u32) -> Self {
        Self {
            box_origin: (0.0, 0.0),
            box_size: (buffer_width.max(1) as f32, buffer_height.max(1) as f32),
            buffer_size: (buffer_width.max(1), buffer_height.max(1)),
            zoom: 1.0,
        }
    }

    /// Update the displayed element's measured bounding box. `width` and
    /// `height` are the on-screen extent with the current zoom applied.
    pub fn set_display_box(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.box_origin = (x, y);
        self.box_size = (width.max(1.0), height.max(1.0));
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`. The stored display
    /// box scales along so the intrinsic ratio stays put; the host may
    /// overwrite it with fresh measurements afterwards.
    pub fn set_zoom(&mut self, zoom: f32) {
        let old = self.zoom;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let factor = self.zoom / old;
        self.box_size = (self.box_size.0 * factor, self.box_size.1 * factor);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Intrinsic buffer-per-display-unit ratio, zoom factored out. This is
    /// what brush footprints scale by: zooming in magnifies the view, not
    /// the brush.
    ///
    /// The box tracks the buffer's aspect ratio, so the horizontal ratio
    /// serves for both axes.
    pub fn buffer_scale(&self) -> f32 {
        self.buffer_size.0 as f32 / (self.box_size.0 / self.zoom)
    }

    fn buffer_scale_y(&self) -> f32 {
        self.buffer_size.1 as f32 / (self.box_size.1 / self.zoom)
    }

    /// Map a pointer position to sub-pixel buffer coordinates, clamped to
    /// buffer bounds.
    pub fn to_buffer(&self, pointer: (f32, f32)) -> (f32, f32) {
        // Unscale by zoom first, then apply the intrinsic ratio.
        let rel_x = (pointer.0 - self.box_origin.0) / self.zoom;
        let rel_y = (pointer.1 - self.box_origin.1) / self.zoom;
        let bx = rel_x * self.buffer_scale();
        let by = rel_y * self.buffer_scale_y();
        (
            bx.clamp(0.0, (self.buffer_size.0 - 1) as f32),
            by.clamp(0.0, (self.buffer_size.1 - 1) as f32),
        )
    }

    /// Map a pointer position to an integer buffer pixel.
    pub fn to_pixel(&self, pointer: (f32, f32)) -> (u32, u32) {
        let (bx, by) = self.to_buffer(pointer);
        (bx as u32, by as u32)
    }

    /// Inverse of `to_buffer`: where a buffer coordinate lands on screen.
    pub fn to_display(&self, buffer: (f32, f32)) -> (f32, f32) {
        (
            self.box_origin.0 + buffer.0 / self.buffer_scale() * self.zoom,
            self.box_origin.1 + buffer.1 / self.buffer_scale_y() * self.zoom,
        )
    }

    pub fn buffer_size(&self) -> (u32, u32) {
        self.buffer_size
    }
}
