//! GPU side of the globe group: one shared mesh, one pipeline and uniform per layer.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use globe_render::{
    BufferAllocator, ColorSpace, IndexData, ManagedTexture, MeshBuffer, PipelineDescriptor,
    ShaderLibrary, TextureError, TextureManager, VertexPositionNormalUv, uniform_bind_group,
    uniform_bind_group_layout,
};

use crate::graph::{Layer, LayerKind, Scene};
use crate::light::DirectionalLight;
use crate::material::TextureSlot;

/// WGSL source for every globe layer.
pub const GLOBE_SHADER_SOURCE: &str = include_str!("shaders/globe.wgsl");

/// Name of the globe shader in the [`ShaderLibrary`].
pub const GLOBE_SHADER_NAME: &str = "globe";

/// Texel used when an image is missing; unloaded textures sample black.
pub const MISSING_TEXEL: [u8; 4] = [0, 0, 0, 255];

/// Per-layer uniform, matching `Layer` in `globe.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LayerUniform {
    pub model: [[f32; 4]; 4],
    pub sun_direction: [f32; 4],
    pub sun_radiance: [f32; 4],
    /// rgb rim color, w fresnel bias.
    pub rim_color: [f32; 4],
    /// rgb facing color, w fresnel scale.
    pub facing_color: [f32; 4],
    /// x opacity, y fresnel power.
    pub params: [f32; 4],
}

impl LayerUniform {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(layer: &Layer, model: glam::Mat4, sun: &DirectionalLight) -> Self {
        let mut uniform = Self {
            model: model.to_cols_array_2d(),
            sun_direction: sun.direction().extend(0.0).to_array(),
            sun_radiance: with_w(sun.radiance(), 0.0),
            rim_color: [0.0; 4],
            facing_color: [0.0; 4],
            params: [layer.material.opacity, 0.0, 0.0, 0.0],
        };
        if let Some(fresnel) = layer.material.fresnel_params() {
            uniform.rim_color = with_w(fresnel.rim_color, fresnel.bias);
            uniform.facing_color = with_w(fresnel.facing_color, fresnel.scale);
            uniform.params[1] = fresnel.power;
        }
        uniform
    }
}

fn with_w([x, y, z]: [f32; 3], w: f32) -> [f32; 4] {
    [x, y, z, w]
}

fn load_slot(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    textures: &mut TextureManager,
    slot: &Option<TextureSlot>,
    placeholder: &Arc<ManagedTexture>,
) -> Result<Arc<ManagedTexture>, TextureError> {
    match slot {
        Some(slot) => textures.load_image_or_fallback(
            device,
            queue,
            &slot.path,
            slot.color_space,
            MISSING_TEXEL,
        ),
        None => Ok(Arc::clone(placeholder)),
    }
}

struct LayerGpu {
    kind: LayerKind,
    transparent: bool,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    map: Arc<ManagedTexture>,
    alpha_map: Arc<ManagedTexture>,
}

/// Draws the four globe layers. Opaque layers go first, then the
/// transparent ones, so other opaque objects can be drawn in between.
pub struct GlobeRenderer {
    mesh: MeshBuffer,
    layers: Vec<LayerGpu>,
}

impl GlobeRenderer {
    /// Upload the shared geometry, load every layer's textures and build the
    /// layer pipelines.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        textures: &mut TextureManager,
        shaders: &mut ShaderLibrary,
        camera_layout: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
        scene: &Scene,
    ) -> Result<Self, TextureError> {
        let shader = shaders.load_from_source(device, GLOBE_SHADER_NAME, GLOBE_SHADER_SOURCE);
        let allocator = BufferAllocator::new(device);

        let geometry = scene.globe.geometry();
        let mesh = allocator.create_mesh(
            "globe",
            bytemuck::cast_slice(geometry.vertices()),
            IndexData::U32(geometry.indices()),
        );

        let layer_layout = uniform_bind_group_layout(
            device,
            "globe-layer-bgl",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            LayerUniform::SIZE,
        );
        let placeholder = textures.create_texture(
            device,
            queue,
            "globe-placeholder",
            &MISSING_TEXEL,
            1,
            1,
            ColorSpace::Linear,
            false,
        )?;

        let mut layers = Vec::with_capacity(scene.globe.layers().len());
        for layer in scene.globe.layers() {
            let material = &layer.material;
            let map = load_slot(device, queue, textures, &material.map, &placeholder)?;
            let alpha_map = load_slot(device, queue, textures, &material.alpha_map, &placeholder)?;

            let uniform = LayerUniform::new(
                layer,
                scene.globe.world_matrix(layer.kind),
                &scene.sun,
            );
            let label = format!("globe-{}", layer.kind.label());
            let uniform_buffer = allocator.create_uniform(&label, &uniform);
            let uniform_bind_group =
                uniform_bind_group(device, &label, &layer_layout, &uniform_buffer);

            let buffers = [VertexPositionNormalUv::layout()];
            let (vs_entry, fs_entry) = material.shader_entry_points();
            let bind_group_layouts = [
                camera_layout,
                &layer_layout,
                textures.bind_group_layout(),
                textures.bind_group_layout(),
            ];
            let pipeline = PipelineDescriptor::new(&label, &shader, color_format, sample_count)
                .entry_points(vs_entry, fs_entry)
                .vertex_buffers(&buffers)
                .bind_group_layouts(&bind_group_layouts)
                .blend(material.blend_mode())
                .build(device);

            log::debug!(
                "Built {label} pipeline ({vs_entry}/{fs_entry}, {:?})",
                material.blend_mode()
            );

            layers.push(LayerGpu {
                kind: layer.kind,
                transparent: material.transparent,
                pipeline,
                uniform_buffer,
                uniform_bind_group,
                map,
                alpha_map,
            });
        }

        log::info!(
            "Globe renderer initialized ({} layers, {} triangles)",
            layers.len(),
            geometry.triangle_count()
        );

        Ok(Self { mesh, layers })
    }

    /// Upload the current layer transforms.
    pub fn update(&self, queue: &wgpu::Queue, scene: &Scene) {
        for gpu in &self.layers {
            let layer = scene.globe.layer(gpu.kind);
            let uniform = LayerUniform::new(layer, scene.globe.world_matrix(gpu.kind), &scene.sun);
            queue.write_buffer(&gpu.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }
    }

    /// Draw the layers that are not transparent.
    pub fn render_opaque(&self, pass: &mut wgpu::RenderPass<'_>, camera_bind_group: &wgpu::BindGroup) {
        self.render_where(pass, camera_bind_group, |layer| !layer.transparent);
    }

    /// Draw the transparent layers in group order.
    pub fn render_transparent(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        camera_bind_group: &wgpu::BindGroup,
    ) {
        self.render_where(pass, camera_bind_group, |layer| layer.transparent);
    }

    fn render_where(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        camera_bind_group: &wgpu::BindGroup,
        include: impl Fn(&LayerGpu) -> bool,
    ) {
        pass.set_bind_group(0, camera_bind_group, &[]);
        self.mesh.bind(pass);
        for layer in self.layers.iter().filter(|layer| include(layer)) {
            pass.set_pipeline(&layer.pipeline);
            pass.set_bind_group(1, &layer.uniform_bind_group, &[]);
            pass.set_bind_group(2, &layer.map.bind_group, &[]);
            pass.set_bind_group(3, &layer.alpha_map.bind_group, &[]);
            self.mesh.draw(pass);
        }
    }

    /// Layers in draw order: opaque first, then transparent.
    pub fn draw_order(&self) -> Vec<LayerKind> {
        let opaque = self.layers.iter().filter(|l| !l.transparent);
        let transparent = self.layers.iter().filter(|l| l.transparent);
        opaque.chain(transparent).map(|l| l.kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use globe_config::Config;
    use globe_render::{CameraBinding, PerspectiveCamera};

    fn create_test_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .ok()?;
        pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()
    }

    fn small_scene() -> Scene {
        let mut config = Config::default();
        config.globe.detail = 1;
        config.starfield.count = 10;
        config.starfield.seed = Some(1);
        config.textures.day_map = "missing/day.jpg".into();
        config.textures.night_lights = "missing/night.jpg".into();
        config.textures.cloud_map = "missing/clouds.jpg".into();
        config.textures.cloud_alpha = "missing/clouds_alpha.jpg".into();
        Scene::compose(&config)
    }

    #[test]
    fn test_uniform_layout_size() {
        assert_eq!(LayerUniform::SIZE, 64 + 5 * 16);
        assert_eq!(LayerUniform::SIZE % 16, 0);
    }

    #[test]
    fn test_uniform_packs_fresnel_parameters() {
        let scene = small_scene();
        let glow = scene.globe.layer(LayerKind::Glow);
        let uniform =
            LayerUniform::new(glow, scene.globe.world_matrix(LayerKind::Glow), &scene.sun);
        assert!((uniform.rim_color[3] - 0.1).abs() < 1e-6);
        assert!((uniform.facing_color[3] - 1.0).abs() < 1e-6);
        assert!((uniform.params[1] - 4.0).abs() < 1e-6);
        assert!((uniform.params[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_uniform_carries_opacity_and_sun() {
        let scene = small_scene();
        let clouds = scene.globe.layer(LayerKind::Clouds);
        let uniform =
            LayerUniform::new(clouds, scene.globe.world_matrix(LayerKind::Clouds), &scene.sun);
        assert!((uniform.params[0] - 0.2).abs() < 1e-6);
        let dir = glam::Vec4::from_array(uniform.sun_direction);
        assert!((dir.truncate().length() - 1.0).abs() < 1e-6);
        assert_eq!(uniform.rim_color, [0.0; 4]);
    }

    #[test]
    fn test_renderer_builds_with_missing_textures() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let scene = small_scene();
        let mut textures = TextureManager::new(&device);
        let mut shaders = ShaderLibrary::new();
        let camera = CameraBinding::new(&device, &PerspectiveCamera::default());
        let renderer = GlobeRenderer::new(
            &device,
            &queue,
            &mut textures,
            &mut shaders,
            &camera.layout,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            1,
            &scene,
        )
        .unwrap();

        assert_eq!(
            renderer.draw_order(),
            vec![
                LayerKind::Surface,
                LayerKind::NightLights,
                LayerKind::Clouds,
                LayerKind::Glow
            ]
        );
        assert!(shaders.get(GLOBE_SHADER_NAME).is_ok());
        renderer.update(&queue, &scene);
    }
}
