pub mod color;
pub mod framebuffer;
pub mod geometry;
pub mod math;
pub mod normals;
pub mod pipeline;
pub mod rasterizer;
