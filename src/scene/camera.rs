use crate::core::math::transform::TransformFactory;
use crate::error::{RenderError, Result};
use nalgebra::{Matrix4, Point3, Vector3};

/// Off-center view volume in camera space. `near`/`far` are positive distances along -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub near: f32,
    pub far: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            near: 1.0,
            far: 10.0,
            left: -0.5,
            right: 0.5,
            top: 0.5,
            bottom: -0.5,
        }
    }
}

/// Manages the View and Projection matrices.
///
/// The camera is placed in the world by `translation(position) * rotation(axis, angle)`
/// and looks down its local -Z axis.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub axis: Vector3<f32>,
    /// Rotation about `axis`, radians.
    pub angle: f32,
    pub frustum: Frustum,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            axis: Vector3::new(0.0, 1.0, 0.0),
            angle: 0.0,
            frustum: Frustum::default(),
        }
    }
}

impl Camera {
    pub fn new(position: Point3<f32>, axis: Vector3<f32>, angle: f32, frustum: Frustum) -> Self {
        Self {
            position,
            axis,
            angle,
            frustum,
        }
    }

    /// Rejects camera parameters that would produce a meaningless projection.
    pub fn validate(&self) -> Result<()> {
        let f = &self.frustum;
        let all_finite = [f.near, f.far, f.left, f.right, f.top, f.bottom, self.angle]
            .iter()
            .chain(self.position.coords.iter())
            .chain(self.axis.iter())
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(RenderError::DegenerateFrustum(
                "camera parameters must be finite".into(),
            ));
        }
        if f.near <= 0.0 {
            return Err(RenderError::DegenerateFrustum(format!(
                "near plane must be positive, got {}",
                f.near
            )));
        }
        if f.near >= f.far {
            return Err(RenderError::DegenerateFrustum(format!(
                "near ({}) must be less than far ({})",
                f.near, f.far
            )));
        }
        if f.left >= f.right {
            return Err(RenderError::DegenerateFrustum(format!(
                "left ({}) must be less than right ({})",
                f.left, f.right
            )));
        }
        if f.bottom >= f.top {
            return Err(RenderError::DegenerateFrustum(format!(
                "bottom ({}) must be less than top ({})",
                f.bottom, f.top
            )));
        }
        if self.axis.norm_squared() == 0.0 {
            return Err(RenderError::DegenerateFrustum(
                "camera rotation axis must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        TransformFactory::world_to_camera(&self.position, &self.axis, self.angle)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let f = &self.frustum;
        TransformFactory::perspective(f.left, f.right, f.bottom, f.top, f.near, f.far)
    }

    /// Projection * view.
    pub fn world_to_ndc(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}
