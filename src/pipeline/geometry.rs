use crate::core::math::transform::transform_point;
use crate::error::{RenderError, Result};
use crate::scene::camera::Camera;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::scene_object::SceneObject;
use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};
use rayon::prelude::*;
use std::sync::Arc;

/// An instance with its geometry baked into world and NDC space.
///
/// Arrays keep the mesh's sentinel slot so face indices address them unchanged.
#[derive(Debug, Clone)]
pub struct TransformedObject {
    pub label: String,
    pub mesh: Arc<Mesh>,
    pub world_vertices: Vec<Point3<f32>>,
    pub ndc_vertices: Vec<Point3<f32>>,
    /// World-space normals, `None` when the mesh has no normals.
    pub normals: Option<Vec<Vector3<f32>>>,
    pub material: Material,
}

/// World-space and NDC-space positions of every vertex of `object`.
pub fn apply_transform(
    object: &SceneObject,
    world_to_ndc: &Matrix4<f32>,
) -> (Vec<Point3<f32>>, Vec<Point3<f32>>) {
    let full = world_to_ndc * object.transform;
    let vertices = &object.mesh.vertices;

    let mut world = Vec::with_capacity(vertices.len());
    let mut ndc = Vec::with_capacity(vertices.len());
    if let Some(sentinel) = vertices.first() {
        world.push(*sentinel);
        ndc.push(*sentinel);
    }
    for v in vertices.iter().skip(1) {
        world.push(transform_point(&object.transform, v));
        ndc.push(transform_point(&full, v));
    }
    (world, ndc)
}

/// World-space normals of `object` under the inverse-transpose of its linear transform.
/// Normals are not renormalized here.
pub fn apply_normal_transform(object: &SceneObject) -> Result<Vec<Vector3<f32>>> {
    let normal_matrix = object
        .normal_transform()
        .ok_or_else(|| RenderError::SingularTransform(object.label.clone()))?;

    let normals = &object.mesh.normals;
    let mut out = Vec::with_capacity(normals.len());
    if let Some(sentinel) = normals.first() {
        out.push(*sentinel);
    }
    out.extend(normals.iter().skip(1).map(|n| normal_matrix * n));
    Ok(out)
}

/// Bakes every instance for `camera`. Instances are independent, so they are
/// transformed in parallel; the output keeps the input order.
///
/// Normals are only transformed when `with_normals` is set; otherwise every
/// `TransformedObject::normals` is `None` and singular transforms are accepted.
pub fn transform_objects(
    objects: &[SceneObject],
    camera: &Camera,
    with_normals: bool,
) -> Result<Vec<TransformedObject>> {
    let world_to_ndc = camera.world_to_ndc();

    objects
        .par_iter()
        .map(|object| -> Result<TransformedObject> {
            let (world_vertices, ndc_vertices) = apply_transform(object, &world_to_ndc);
            let normals = if with_normals && object.mesh.has_normals() {
                Some(apply_normal_transform(object)?)
            } else {
                None
            };
            debug!(
                "Transformed '{}': {} vertices",
                object.label,
                world_vertices.len().saturating_sub(1)
            );
            Ok(TransformedObject {
                label: object.label.clone(),
                mesh: Arc::clone(&object.mesh),
                world_vertices,
                ndc_vertices,
                normals,
                material: object.material.clone(),
            })
        })
        .collect()
}
