use crate::core::math::transform::normal_matrix;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::{Matrix3, Matrix4};
use std::sync::Arc;

/// Represents an instance of a mesh in the scene with its own transformation.
///
/// The base mesh is shared; only the accumulated transform and the material
/// belong to the instance.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub label: String,
    pub mesh: Arc<Mesh>,
    pub transform: Matrix4<f32>,
    pub material: Material,
}

impl SceneObject {
    /// New instance with an identity transform.
    pub fn new(label: impl Into<String>, mesh: Arc<Mesh>, material: Material) -> Self {
        Self {
            label: label.into(),
            mesh,
            transform: Matrix4::identity(),
            material,
        }
    }

    /// Applies `transform` after everything accumulated so far (left-multiplied).
    pub fn add_transformation(&mut self, transform: &Matrix4<f32>) {
        self.transform = transform * self.transform;
    }

    /// Inverse-transpose of the accumulated linear part, `None` if singular.
    pub fn normal_transform(&self) -> Option<Matrix3<f32>> {
        normal_matrix(&self.transform)
    }
}
