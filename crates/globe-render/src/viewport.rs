//! Drawable-area tracking for window resize and DPI changes.
//!
//! winit reports physical pixels; the GPU surface, depth and MSAA targets are
//! sized in the same units and the camera aspect is derived from them.

/// Physical pixel dimensions of the drawable area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    /// Width in physical pixels.
    pub width: u32,
    /// Height in physical pixels.
    pub height: u32,
}

impl PhysicalSize {
    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Whether either side is zero (minimized or not yet mapped).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A change in drawable size that GPU targets and camera must follow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportResize {
    /// New physical size (never zero-area).
    pub physical: PhysicalSize,
    /// Current scale factor.
    pub scale_factor: f64,
}

/// Tracks the drawable area and filters resize notifications.
///
/// Repeated identical sizes and zero-area sizes produce no [`ViewportResize`],
/// so callers do no GPU work for them.
#[derive(Debug)]
pub struct Viewport {
    size: PhysicalSize,
    scale_factor: f64,
}

impl Viewport {
    /// Create from the window's initial physical size.
    ///
    /// A zero-area initial size (some Wayland compositors report this before
    /// the first configure) is held at 1x1 until a real size arrives.
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            size: PhysicalSize {
                width: width.max(1),
                height: height.max(1),
            },
            scale_factor,
        }
    }

    /// Handle a window resize to `width` x `height` physical pixels.
    pub fn handle_resize(&mut self, width: u32, height: u32) -> Option<ViewportResize> {
        let size = PhysicalSize { width, height };
        if size.is_empty() {
            log::debug!("Ignoring zero-area resize {width}x{height}");
            return None;
        }
        if size == self.size {
            return None;
        }
        self.size = size;
        Some(ViewportResize {
            physical: size,
            scale_factor: self.scale_factor,
        })
    }

    /// Handle a scale factor change, which arrives with a new physical size.
    pub fn handle_scale_factor_changed(
        &mut self,
        scale_factor: f64,
        width: u32,
        height: u32,
    ) -> Option<ViewportResize> {
        self.scale_factor = scale_factor;
        self.handle_resize(width, height)
    }

    /// Current physical size.
    pub fn size(&self) -> PhysicalSize {
        self.size
    }

    /// Current width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.size.aspect_ratio()
    }

    /// Current scale factor (physical pixels per logical pixel).
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}
