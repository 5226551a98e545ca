//! GPU renderer drawing every star as a camera-facing textured billboard.

use std::path::Path;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use globe_render::{
    BlendMode, BufferAllocator, ColorSpace, ManagedTexture, PipelineDescriptor, ShaderLibrary,
    TextureError, TextureManager, uniform_bind_group, uniform_bind_group_layout,
};
use wgpu::util::DeviceExt;

use crate::starfield::StarPoint;

/// WGSL source for the star billboards.
pub const STAR_SHADER_SOURCE: &str = include_str!("shaders/stars.wgsl");

/// Name of the star shader in the [`ShaderLibrary`].
pub const STAR_SHADER_NAME: &str = "stars";

/// Edge length of the generated sprite used when the sprite image is unavailable.
pub const FALLBACK_SPRITE_SIZE: u32 = 64;

/// Per-instance star data.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl StarInstance {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 2,
            },
        ],
    };
}

impl From<&StarPoint> for StarInstance {
    fn from(star: &StarPoint) -> Self {
        Self {
            position: star.position.to_array(),
            color: star.color,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct QuadVertex {
    corner: [f32; 2],
}

impl QuadVertex {
    const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: 0,
        }],
    };
}

/// Point sprite parameters, padded to 16 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct StarParams {
    /// Size in world units at unit distance; the on-screen size falls off with depth.
    point_size: f32,
    _pad: [f32; 3],
}

/// RGBA8 disc with a soft edge, white inside and transparent outside.
pub fn circle_sprite(size: u32) -> Vec<u8> {
    let center = size as f32 * 0.5;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            let r = (dx * dx + dy * dy).sqrt() / center;
            // One-texel falloff at the rim.
            let alpha = ((1.0 - r) * center).clamp(0.0, 1.0);
            pixels.extend_from_slice(&[255, 255, 255, (alpha * 255.0).round() as u8]);
        }
    }
    pixels
}

/// Draws the starfield with alpha-blended sprites. Stars test against the
/// globe's depth but never write depth.
pub struct StarfieldRenderer {
    pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    params_bind_group: wgpu::BindGroup,
    sprite: Arc<ManagedTexture>,
}

impl StarfieldRenderer {
    /// Upload `stars` and build the point pipeline.
    ///
    /// A missing or undecodable sprite image is replaced by [`circle_sprite`].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        textures: &mut TextureManager,
        shaders: &mut ShaderLibrary,
        camera_layout: &wgpu::BindGroupLayout,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
        stars: &[StarPoint],
        point_size: f32,
        sprite_path: &Path,
    ) -> Result<Self, TextureError> {
        let sprite = match textures.load_image(device, queue, sprite_path, ColorSpace::Srgb) {
            Ok(sprite) => sprite,
            Err(e @ (TextureError::Io { .. } | TextureError::Decode { .. })) => {
                log::warn!("{e}; using generated star sprite");
                textures.create_texture(
                    device,
                    queue,
                    "generated-star-sprite",
                    &circle_sprite(FALLBACK_SPRITE_SIZE),
                    FALLBACK_SPRITE_SIZE,
                    FALLBACK_SPRITE_SIZE,
                    ColorSpace::Srgb,
                    true,
                )?
            }
            Err(e) => return Err(e),
        };

        let shader = shaders.load_from_source(device, STAR_SHADER_NAME, STAR_SHADER_SOURCE);

        let allocator = BufferAllocator::new(device);
        let params_buffer = allocator.create_uniform(
            "star-params",
            &StarParams {
                point_size,
                _pad: [0.0; 3],
            },
        );
        let params_layout = uniform_bind_group_layout(
            device,
            "star-params-bgl",
            wgpu::ShaderStages::VERTEX,
            std::mem::size_of::<StarParams>() as u64,
        );
        let params_bind_group =
            uniform_bind_group(device, "star-params-bg", &params_layout, &params_buffer);

        let buffers = [QuadVertex::LAYOUT, StarInstance::LAYOUT];
        let layouts = [camera_layout, &params_layout, textures.bind_group_layout()];
        let pipeline = PipelineDescriptor::new("star-pipeline", &shader, color_format, sample_count)
            .entry_points("vs_star", "fs_star")
            .vertex_buffers(&buffers)
            .bind_group_layouts(&layouts)
            .blend(BlendMode::Alpha)
            .depth_write(false)
            .cull_mode(None)
            .build(device);

        let quad = [
            QuadVertex {
                corner: [-1.0, -1.0],
            },
            QuadVertex {
                corner: [1.0, -1.0],
            },
            QuadVertex { corner: [1.0, 1.0] },
            QuadVertex {
                corner: [-1.0, 1.0],
            },
        ];
        let quad_buffer = allocator.create_vertex_buffer("star-quad", bytemuck::cast_slice(&quad));

        let indices: [u16; 6] = [0, 1, 2, 2, 3, 0];
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star-quad-indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instances: Vec<StarInstance> = stars.iter().map(StarInstance::from).collect();
        // A zero-sized vertex buffer is invalid, so an empty field still gets one slot.
        let empty_slot = StarInstance::zeroed();
        let instance_bytes: &[u8] = if instances.is_empty() {
            bytemuck::bytes_of(&empty_slot)
        } else {
            bytemuck::cast_slice(&instances)
        };
        let instance_buffer = allocator.create_vertex_buffer("star-instances", instance_bytes);

        log::info!(
            "Starfield renderer initialized ({} stars, point size {point_size})",
            instances.len()
        );

        Ok(Self {
            pipeline,
            quad_buffer,
            index_buffer,
            instance_buffer,
            instance_count: instances.len() as u32,
            params_bind_group,
            sprite,
        })
    }

    /// Draw all stars. The camera bind group goes in group 0.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>, camera_bind_group: &wgpu::BindGroup) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_bind_group(1, &self.params_bind_group, &[]);
        pass.set_bind_group(2, &self.sprite.bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..6, 0, 0..self.instance_count);
    }

    pub fn star_count(&self) -> u32 {
        self.instance_count
    }
}
