use crate::error::{RenderError, Result};
use nalgebra::{Point3, Vector3};

/// A light source at a specific position that radiates in all directions.
///
/// Intensity falls off as `1 / (1 + attenuation * d^2)`.
#[derive(Debug, Clone)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub color: Vector3<f32>,
    /// Quadratic attenuation coefficient, `k >= 0`.
    pub attenuation: f32,
}

impl PointLight {
    pub fn new(position: Point3<f32>, color: Vector3<f32>, attenuation: f32) -> Self {
        Self {
            position,
            color,
            attenuation,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.attenuation.is_finite() || self.attenuation < 0.0 {
            return Err(RenderError::InvalidLight(format!(
                "attenuation must be a finite non-negative number, got {}",
                self.attenuation
            )));
        }
        Ok(())
    }

    /// Calculates the direction vector FROM the surface point TO the light source (not normalized).
    pub fn get_direction_to_light(&self, surface_point: &Point3<f32>) -> Vector3<f32> {
        self.position - surface_point
    }

    /// Calculates the light color arriving at the surface point.
    pub fn get_intensity(&self, surface_point: &Point3<f32>) -> Vector3<f32> {
        let distance_sq = self.get_direction_to_light(surface_point).norm_squared();
        self.color / (1.0 + self.attenuation * distance_sq)
    }
}
