use crate::core::geometry::Face;
use crate::core::pipeline::Interpolatable;
use crate::pipeline::geometry::TransformedObject;
use crate::pipeline::lighting::shade;
use crate::pipeline::shaders::Shader;
use crate::scene::light::PointLight;
use crate::scene::material::Material;
use nalgebra::{Point3, Vector3};
use std::ops::{Add, Mul};

/// Data that needs to be interpolated across the triangle surface.
/// Passed from Vertex Shader -> Rasterizer -> Fragment Shader.
#[derive(Clone, Copy, Debug)]
pub struct PhongVarying {
    /// Normal vector in World Space.
    pub normal: Vector3<f32>,
    /// Position in World Space (needed for calculating View Vector and Light Vector).
    pub world_pos: Point3<f32>,
}

// Implement math operations required for barycentric interpolation.
// Note: nalgebra's Point3 doesn't support addition with Point3 directly,
// so we handle it via coordinates.
impl Add for PhongVarying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            normal: self.normal + other.normal,
            world_pos: Point3::from(self.world_pos.coords + other.world_pos.coords),
        }
    }
}

impl Mul<f32> for PhongVarying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            normal: self.normal * scalar,
            world_pos: Point3::from(self.world_pos.coords * scalar),
        }
    }
}

impl Interpolatable for PhongVarying {}

/// Per-pixel Blinn-Phong: position and normal are interpolated, lighting is
/// evaluated for every fragment.
pub struct PhongShader<'a> {
    pub material: &'a Material,
    pub lights: &'a [PointLight],
    pub eye: Point3<f32>,
}

impl<'a> PhongShader<'a> {
    pub fn new(material: &'a Material, lights: &'a [PointLight], eye: Point3<f32>) -> Self {
        Self {
            material,
            lights,
            eye,
        }
    }
}

impl Shader for PhongShader<'_> {
    type Varying = PhongVarying;

    fn vertex(
        &self,
        object: &TransformedObject,
        normals: &[Vector3<f32>],
        face: &Face,
        corner: usize,
    ) -> PhongVarying {
        PhongVarying {
            normal: normals[face.normals[corner]],
            world_pos: object.world_vertices[face.vertices[corner]],
        }
    }

    fn fragment(&self, varying: PhongVarying) -> Vector3<f32> {
        // `shade` renormalizes; a zero interpolated normal leaves only the ambient term.
        shade(
            &varying.world_pos,
            &varying.normal,
            self.material,
            self.lights,
            &self.eye,
        )
    }
}
