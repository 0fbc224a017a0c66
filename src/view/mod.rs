// VIEW: Rendering and graphics
pub mod render;
pub mod gpu_init;

pub use render::{OverlayFrame, RenderMesh, RenderState, UnshadedShader};
pub use gpu_init::GpuContext;
