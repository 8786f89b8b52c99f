use crate::core::geometry::Face;
use crate::pipeline::geometry::TransformedObject;
use crate::pipeline::lighting::shade;
use crate::pipeline::shaders::Shader;
use crate::scene::light::PointLight;
use crate::scene::material::Material;
use nalgebra::{Point3, Vector3};

/// Lights each vertex once; the rasterizer interpolates the resulting colors.
pub struct GouraudShader<'a> {
    pub material: &'a Material,
    pub lights: &'a [PointLight],
    pub eye: Point3<f32>,
}

impl<'a> GouraudShader<'a> {
    pub fn new(material: &'a Material, lights: &'a [PointLight], eye: Point3<f32>) -> Self {
        Self {
            material,
            lights,
            eye,
        }
    }
}

impl Shader for GouraudShader<'_> {
    type Varying = Vector3<f32>;

    fn vertex(
        &self,
        object: &TransformedObject,
        normals: &[Vector3<f32>],
        face: &Face,
        corner: usize,
    ) -> Vector3<f32> {
        let position = object.world_vertices[face.vertices[corner]];
        let normal = normals[face.normals[corner]];
        shade(&position, &normal, self.material, self.lights, &self.eye)
    }

    fn fragment(&self, color: Vector3<f32>) -> Vector3<f32> {
        color
    }
}
