use crate::core::color::clamp_color;
use crate::scene::light::PointLight;
use crate::scene::material::Material;
use nalgebra::{Point3, Vector3};

const EPSILON: f32 = 1e-8;

/// Blinn-Phong illumination at a surface point.
///
/// `ambient + diffuse ⊙ Σ max(0, N·L) c + specular ⊙ Σ max(0, N·H)^shininess c`, where
/// `c` is each light's attenuated color and `H` the half vector between the eye and
/// light directions. Every channel is clamped to [0, 1].
pub fn shade(
    point: &Point3<f32>,
    normal: &Vector3<f32>,
    material: &Material,
    lights: &[PointLight],
    eye: &Point3<f32>,
) -> Vector3<f32> {
    let n = normal.try_normalize(EPSILON).unwrap_or_else(Vector3::zeros);
    let view_dir = (eye - point).try_normalize(EPSILON).unwrap_or_else(Vector3::zeros);

    let mut diffuse_sum = Vector3::zeros();
    let mut specular_sum = Vector3::zeros();

    for light in lights {
        // A light sitting on the surface has no direction.
        let Some(light_dir) = light.get_direction_to_light(point).try_normalize(EPSILON) else {
            continue;
        };
        let intensity = light.get_intensity(point);

        diffuse_sum += intensity * n.dot(&light_dir).max(0.0);

        if let Some(half) = (view_dir + light_dir).try_normalize(EPSILON) {
            specular_sum += intensity * n.dot(&half).max(0.0).powf(material.shininess);
        }
    }

    clamp_color(
        material.ambient
            + material.diffuse.component_mul(&diffuse_sum)
            + material.specular.component_mul(&specular_sum),
    )
}
