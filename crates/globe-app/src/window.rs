//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]: it owns the scene,
//! the camera and its orbit controls, and the GPU resources, and turns every
//! `RedrawRequested` into one animation step plus one draw.

use std::sync::Arc;

use globe_config::Config;
use globe_render::{
    CameraBinding, DepthBuffer, FrameEncoder, MsaaTarget, PerspectiveCamera, PhysicalSize,
    RenderContext, RenderContextError, RenderPassBuilder, ShaderLibrary, TextureError,
    TextureManager, Viewport, init_render_context_blocking, supported_sample_count,
};
use globe_scene::{GlobeRenderer, Scene};
use globe_space::StarfieldRenderer;
use tracing::{debug, error, info, instrument};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::controls::OrbitControls;
use crate::frame_clock::FrameClock;
use crate::input::PointerState;
use crate::resize;

/// Errors that stop the viewer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    RenderContext(#[from] RenderContextError),

    #[error("failed to load scene textures: {0}")]
    Texture(#[from] TextureError),
}

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Background color from configuration.
pub fn clear_color_from_config(config: &Config) -> wgpu::Color {
    let [r, g, b] = config.render.clear_color;
    wgpu::Color { r, g, b, a: 1.0 }
}

/// GPU resources that exist once the window and device do.
struct Graphics {
    queue: Arc<wgpu::Queue>,
    camera_binding: CameraBinding,
    depth: DepthBuffer,
    msaa: Option<MsaaTarget>,
    globe: GlobeRenderer,
    stars: StarfieldRenderer,
    // Owns the texture cache that the renderers' bind groups point into.
    _textures: TextureManager,
    _shaders: ShaderLibrary,
}

impl Graphics {
    fn new(
        gpu: &RenderContext,
        config: &Config,
        scene: &Scene,
        camera: &PerspectiveCamera,
        size: PhysicalSize,
    ) -> Result<Self, TextureError> {
        let device = &gpu.device;
        let format = gpu.surface_format;
        let sample_count =
            supported_sample_count(&gpu.adapter, format, config.render.msaa_samples);

        let camera_binding = CameraBinding::new(device, camera);
        let depth = DepthBuffer::new(device, size.width, size.height, sample_count);
        let msaa = MsaaTarget::new(device, format, size.width, size.height, sample_count);

        let mut textures = TextureManager::new(device);
        let mut shaders = ShaderLibrary::new();
        let globe = GlobeRenderer::new(
            device,
            &gpu.queue,
            &mut textures,
            &mut shaders,
            &camera_binding.layout,
            format,
            sample_count,
            scene,
        )?;
        let stars = StarfieldRenderer::new(
            device,
            &gpu.queue,
            &mut textures,
            &mut shaders,
            &camera_binding.layout,
            format,
            sample_count,
            &scene.stars.points,
            config.starfield.point_size,
            &config.textures.star_sprite,
        )?;

        info!(
            msaa = sample_count,
            stars = stars.star_count(),
            "scene resources ready"
        );

        Ok(Self {
            queue: Arc::new(gpu.queue.clone()),
            camera_binding,
            depth,
            msaa,
            globe,
            stars,
            _textures: textures,
            _shaders: shaders,
        })
    }

    fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize) {
        self.depth.resize(device, size.width, size.height);
        if let Some(msaa) = &mut self.msaa {
            msaa.resize(device, size.width, size.height);
        }
    }

    /// Upload this frame's camera and layer transforms.
    fn upload(&self, camera: &PerspectiveCamera, scene: &Scene) {
        self.camera_binding.update(&self.queue, camera);
        self.globe.update(&self.queue, scene);
    }

    /// Record and present one frame. Opaque globe layers first, then the
    /// stars, then the transparent globe layers over both.
    fn draw(
        &self,
        device: &wgpu::Device,
        surface_texture: wgpu::SurfaceTexture,
        clear_color: wgpu::Color,
    ) {
        let mut frame = FrameEncoder::new(device, Arc::clone(&self.queue), surface_texture);
        let mut builder = RenderPassBuilder::new()
            .clear_color(clear_color)
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("globe-scene");
        if let Some(msaa) = &self.msaa {
            builder = builder.msaa_color(msaa.view.clone());
        }

        {
            let camera_bg = &self.camera_binding.bind_group;
            if let Some(mut pass) = frame.begin_render_pass(&builder) {
                self.globe.render_opaque(&mut pass, camera_bg);
                self.stars.render(&mut pass, camera_bg);
                self.globe.render_transparent(&mut pass, camera_bg);
            }
        }

        frame.submit();
    }
}

/// Application state: window, scene, camera and GPU resources.
pub struct AppState {
    config: Config,
    window: Option<Arc<Window>>,
    viewport: Viewport,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    pointer: PointerState,
    scene: Scene,
    frame_clock: FrameClock,
    gpu: Option<RenderContext>,
    graphics: Option<Graphics>,
}

impl AppState {
    /// Build the scene and camera; GPU work waits for `resumed`.
    pub fn with_config(config: Config) -> Self {
        let viewport = Viewport::new(config.window.width, config.window.height, 1.0);
        let cam = &config.camera;
        let camera = PerspectiveCamera::new(
            cam.fov_y_degrees,
            viewport.aspect_ratio(),
            cam.near,
            cam.far,
            cam.distance,
        );
        let controls = OrbitControls::new(&camera, cam);
        let scene = Scene::compose(&config);

        Self {
            config,
            window: None,
            viewport,
            camera,
            controls,
            pointer: PointerState::new(),
            scene,
            frame_clock: FrameClock::new(),
            gpu: None,
            graphics: None,
        }
    }

    /// Current surface width in physical pixels.
    pub fn surface_width(&self) -> u32 {
        self.viewport.size().width
    }

    /// Current surface height in physical pixels.
    pub fn surface_height(&self) -> u32 {
        self.viewport.size().height
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Create window, device and scene resources. Any failure is returned
    /// so the caller can log it and stop the loop.
    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);

        let inner_size = window.inner_size();
        self.viewport = Viewport::new(inner_size.width, inner_size.height, window.scale_factor());
        let size = self.viewport.size();
        self.camera
            .set_aspect_ratio(size.width as f32, size.height as f32);
        info!(
            "Viewport initialized: {}x{} (scale: {:.2})",
            size.width,
            size.height,
            self.viewport.scale_factor()
        );

        let gpu = init_render_context_blocking(Arc::clone(&window), self.config.window.vsync)?;
        let graphics = Graphics::new(&gpu, &self.config, &self.scene, &self.camera, size)?;

        window.request_redraw();
        self.gpu = Some(gpu);
        self.graphics = Some(graphics);
        self.window = Some(window);
        Ok(())
    }

    /// Follow a viewport change with the surface, depth and MSAA targets.
    fn resize_targets(&mut self, size: PhysicalSize) {
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(size.width, size.height);
            if let Some(graphics) = &mut self.graphics {
                graphics.resize(&gpu.device, size);
            }
        }
    }

    /// One animation step followed by one draw.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(graphics)) = (&self.gpu, &self.graphics) else {
            return;
        };

        self.controls
            .update(&mut self.camera, &self.pointer, self.viewport.size().height);
        self.pointer.clear_transients();
        self.scene.advance_frame();

        if let Some(fps) = self.frame_clock.tick()
            && self.config.debug.show_fps
        {
            info!("{fps:.1} fps");
        }

        graphics.upload(&self.camera, &self.scene);

        let surface_texture = match gpu.get_current_texture() {
            Ok(texture) => texture,
            Err(e) if e.is_recoverable() => {
                debug!("Skipping frame: {e}");
                return;
            }
            Err(e) => {
                error!("Surface acquisition failed ({e}), shutting down");
                event_loop.exit();
                return;
            }
        };

        graphics.draw(
            &gpu.device,
            surface_texture,
            clear_color_from_config(&self.config),
        );
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            error!("Startup failed: {e}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(size) = resize::apply_resize(
                    &mut self.viewport,
                    &mut self.camera,
                    new_size.width,
                    new_size.height,
                ) {
                    self.resize_targets(size);
                    info!("Window resized to {}x{}", size.width, size.height);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                // The new physical size arrives with the scale factor.
                let Some(inner) = self.window.as_ref().map(|w| w.inner_size()) else {
                    return;
                };
                if let Some(size) = resize::apply_scale_factor(
                    &mut self.viewport,
                    &mut self.camera,
                    scale_factor,
                    inner.width,
                    inner.height,
                ) {
                    self.resize_targets(size);
                    info!(
                        "Scale factor changed to {:.2}, resized to {}x{}",
                        scale_factor, size.width, size.height
                    );
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.pointer.on_scroll(delta);
            }
            WindowEvent::CursorEntered { .. } => {
                self.pointer.on_cursor_entered();
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.on_cursor_left();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Creates an event loop and runs the viewer with the given config.
///
/// Blocks until the window is closed.
#[instrument(skip(config))]
pub fn run_with_config(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::with_config(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use globe_scene::LayerKind;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.globe.detail = 2;
        config.starfield.count = 100;
        config.starfield.seed = Some(3);
        config
    }

    #[test]
    fn test_initial_dimensions_follow_config() {
        let state = AppState::with_config(test_config());
        assert_eq!(state.surface_width(), 1280);
        assert_eq!(state.surface_height(), 720);
        assert_eq!(state.camera().aspect_ratio, 1280.0 / 720.0);
    }

    #[test]
    fn test_state_starts_without_window_or_gpu() {
        let state = AppState::with_config(test_config());
        assert!(state.window.is_none());
        assert!(state.gpu.is_none());
        assert!(state.graphics.is_none());
    }

    #[test]
    fn test_camera_starts_on_positive_z() {
        let state = AppState::with_config(test_config());
        let camera = state.camera();
        assert_eq!(camera.position, glam::Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.target, glam::Vec3::ZERO);
        assert!((camera.fov_y - 50f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_resize_tracking() {
        let mut state = AppState::with_config(test_config());
        let size =
            resize::apply_resize(&mut state.viewport, &mut state.camera, 1920, 1080).unwrap();
        state.resize_targets(size);
        assert_eq!(state.surface_width(), 1920);
        assert_eq!(state.surface_height(), 1080);
        assert_eq!(state.camera().aspect_ratio, 1920.0 / 1080.0);
    }

    #[test]
    fn test_scene_composed_from_config() {
        let state = AppState::with_config(test_config());
        assert_eq!(state.scene().stars.points.len(), 100);
        assert_eq!(state.scene().globe.layers().len(), 4);
        assert_eq!(
            state.scene().globe.layer(LayerKind::Surface).spin.angle(),
            0.0
        );
    }

    #[test]
    fn test_clear_color_from_config() {
        let mut config = Config::default();
        config.render.clear_color = [0.1, 0.2, 0.3];
        let color = clear_color_from_config(&config);
        assert_eq!((color.r, color.g, color.b, color.a), (0.1, 0.2, 0.3, 1.0));
    }

    #[test]
    fn test_window_attributes_carry_title_and_fullscreen() {
        let mut config = Config::default();
        config.window.title = "Earth".into();
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Earth");
        assert!(attrs.fullscreen.is_none());

        config.window.fullscreen = true;
        let attrs = window_attributes_from_config(&config);
        assert!(matches!(
            attrs.fullscreen,
            Some(Fullscreen::Borderless(None))
        ));
    }
}
