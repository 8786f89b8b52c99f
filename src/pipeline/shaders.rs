pub mod gouraud;
pub mod phong;

use crate::core::geometry::Face;
use crate::core::pipeline::Interpolatable;
use crate::pipeline::geometry::TransformedObject;
use nalgebra::Vector3;

/// Shader represents the programmable stages of the pipeline.
///
/// Implementations must be thread-safe (Send + Sync) because fragments of one
/// triangle are shaded concurrently.
pub trait Shader: Send + Sync {
    /// Per-vertex data interpolated across the triangle and handed to `fragment`.
    type Varying: Interpolatable;

    /// Varying for corner `corner` (0..3) of `face` of a baked object.
    ///
    /// The caller guarantees that the object carries normals.
    fn vertex(
        &self,
        object: &TransformedObject,
        normals: &[Vector3<f32>],
        face: &Face,
        corner: usize,
    ) -> Self::Varying;

    /// Final linear RGB color in [0, 1] for an interpolated varying.
    fn fragment(&self, varying: Self::Varying) -> Vector3<f32>;
}
