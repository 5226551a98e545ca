//! Render pipeline construction shared by every globe layer and the star points.
//!
//! Each layer differs only in shader entry points, bind groups, blending and
//! depth writes, so a single descriptor-style builder covers all of them.

use crate::depth::DepthBuffer;

/// How a layer's fragments combine with what is already in the color target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// Replace the destination.
    Opaque,
    /// `src * a + dst * (1 - a)`.
    Alpha,
    /// `src * a + dst`, for lights and glows that only brighten.
    Additive,
}

impl BlendMode {
    /// The wgpu blend state, or `None` for opaque output.
    pub fn blend_state(self) -> Option<wgpu::BlendState> {
        match self {
            BlendMode::Opaque => None,
            BlendMode::Alpha => Some(wgpu::BlendState::ALPHA_BLENDING),
            BlendMode::Additive => {
                let additive = wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                };
                Some(wgpu::BlendState {
                    color: additive,
                    alpha: additive,
                })
            }
        }
    }
}

/// Everything needed to build one render pipeline.
pub struct PipelineDescriptor<'a> {
    pub label: &'a str,
    pub shader: &'a wgpu::ShaderModule,
    pub vs_entry: &'a str,
    pub fs_entry: &'a str,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub color_format: wgpu::TextureFormat,
    pub sample_count: u32,
    pub blend: BlendMode,
    pub depth_write: bool,
    pub cull_mode: Option<wgpu::Face>,
}

impl<'a> PipelineDescriptor<'a> {
    /// Triangle-list pipeline with back-face culling, opaque and depth-writing.
    pub fn new(
        label: &'a str,
        shader: &'a wgpu::ShaderModule,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        Self {
            label,
            shader,
            vs_entry: "vs_main",
            fs_entry: "fs_main",
            vertex_buffers: &[],
            bind_group_layouts: &[],
            color_format,
            sample_count,
            blend: BlendMode::Opaque,
            depth_write: true,
            cull_mode: Some(wgpu::Face::Back),
        }
    }

    pub fn entry_points(mut self, vs: &'a str, fs: &'a str) -> Self {
        self.vs_entry = vs;
        self.fs_entry = fs;
        self
    }

    pub fn vertex_buffers(mut self, buffers: &'a [wgpu::VertexBufferLayout<'a>]) -> Self {
        self.vertex_buffers = buffers;
        self
    }

    pub fn bind_group_layouts(mut self, layouts: &'a [&'a wgpu::BindGroupLayout]) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    pub fn blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn depth_write(mut self, enabled: bool) -> Self {
        self.depth_write = enabled;
        self
    }

    pub fn cull_mode(mut self, cull_mode: Option<wgpu::Face>) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    /// Create the pipeline. Depth testing is always on with the reverse-Z compare.
    pub fn build(&self, device: &wgpu::Device) -> wgpu::RenderPipeline {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{}-layout", self.label)),
            bind_group_layouts: self.bind_group_layouts,
            immediate_size: 0,
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(self.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: self.shader,
                entry_point: Some(self.vs_entry),
                buffers: self.vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: self.cull_mode,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthBuffer::stencil_state(self.depth_write)),
            multisample: wgpu::MultisampleState {
                count: self.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: self.shader,
                entry_point: Some(self.fs_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: self.blend.blend_state(),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::VertexPositionNormalUv;
    use crate::depth::create_test_device_queue;

    const POSITION_ONLY_SHADER: &str = r#"
        @vertex
        fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(position, 1.0);
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 1.0, 1.0, 0.5);
        }
    "#;

    #[test]
    fn test_opaque_has_no_blend_state() {
        assert!(BlendMode::Opaque.blend_state().is_none());
    }

    #[test]
    fn test_additive_adds_alpha_weighted_source() {
        let blend = BlendMode::Additive.blend_state().unwrap();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.operation, wgpu::BlendOperation::Add);
    }

    #[test]
    fn test_alpha_uses_standard_over() {
        assert_eq!(
            BlendMode::Alpha.blend_state(),
            Some(wgpu::BlendState::ALPHA_BLENDING)
        );
    }

    #[test]
    fn test_descriptor_defaults() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test"),
            source: wgpu::ShaderSource::Wgsl(POSITION_ONLY_SHADER.into()),
        });
        let desc = PipelineDescriptor::new("test", &shader, wgpu::TextureFormat::Rgba8UnormSrgb, 1);
        assert_eq!(desc.blend, BlendMode::Opaque);
        assert!(desc.depth_write);
        assert_eq!(desc.cull_mode, Some(wgpu::Face::Back));
        assert_eq!(desc.vs_entry, "vs_main");
    }

    #[test]
    fn test_additive_msaa_pipeline_builds() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("test"),
            source: wgpu::ShaderSource::Wgsl(POSITION_ONLY_SHADER.into()),
        });
        let buffers = [VertexPositionNormalUv::layout()];
        let _pipeline =
            PipelineDescriptor::new("glow", &shader, wgpu::TextureFormat::Rgba8UnormSrgb, 4)
                .vertex_buffers(&buffers)
                .blend(BlendMode::Additive)
                .depth_write(false)
                .build(&device);
    }
}
