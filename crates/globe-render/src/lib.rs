//! wgpu rendering primitives for the globe viewer: device and surface setup,
//! viewport tracking, camera, depth/MSAA targets, buffers, textures, shaders,
//! pipelines and per-frame encoding.

pub mod buffer;
pub mod camera;
pub mod color;
pub mod depth;
pub mod gpu;
pub mod msaa;
pub mod pass;
pub mod pipeline;
pub mod shader;
pub mod texture;
pub mod viewport;

pub use buffer::{
    BufferAllocator, IndexData, MeshBuffer, VertexPositionNormalUv, uniform_bind_group,
    uniform_bind_group_layout,
};
pub use camera::{CameraBinding, CameraUniform, PerspectiveCamera};
pub use color::{hex_to_linear, hsl_to_srgb, srgb_to_linear};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use msaa::{MsaaTarget, supported_sample_count};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use pipeline::{BlendMode, PipelineDescriptor};
pub use shader::{ShaderError, ShaderLibrary};
pub use texture::{ColorSpace, ManagedTexture, TextureError, TextureManager};
pub use viewport::{PhysicalSize, Viewport, ViewportResize};
