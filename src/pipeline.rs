pub mod geometry;
pub mod lighting;
pub mod renderer;
pub mod shaders;
