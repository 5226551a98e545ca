//! Resize handling that keeps the camera aspect in step with the viewport.

use globe_render::{PerspectiveCamera, PhysicalSize, Viewport};

/// Apply a window resize. Returns the new size when GPU targets must follow;
/// zero-area and unchanged sizes return `None` and leave the camera alone.
pub fn apply_resize(
    viewport: &mut Viewport,
    camera: &mut PerspectiveCamera,
    width: u32,
    height: u32,
) -> Option<PhysicalSize> {
    let resize = viewport.handle_resize(width, height)?;
    sync_camera(camera, resize.physical);
    Some(resize.physical)
}

/// Apply a scale factor change and the physical size that came with it.
pub fn apply_scale_factor(
    viewport: &mut Viewport,
    camera: &mut PerspectiveCamera,
    scale_factor: f64,
    width: u32,
    height: u32,
) -> Option<PhysicalSize> {
    let resize = viewport.handle_scale_factor_changed(scale_factor, width, height)?;
    sync_camera(camera, resize.physical);
    Some(resize.physical)
}

fn sync_camera(camera: &mut PerspectiveCamera, size: PhysicalSize) {
    camera.set_aspect_ratio(size.width as f32, size.height as f32);
    log::debug!(
        "Viewport resized to {}x{} (aspect {:.4})",
        size.width,
        size.height,
        camera.aspect_ratio
    );
}
