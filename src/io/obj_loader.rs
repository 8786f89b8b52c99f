use crate::core::geometry::Face;
use crate::error::Result;
use crate::scene::mesh::Mesh;
use log::{info, warn};
use nalgebra::{Point3, Vector3};
use std::path::Path;

/// Loads an OBJ file and returns a unified Mesh.
///
/// Polygons are triangulated. Position and normal indices are kept separate, and all
/// sub-models are merged into one mesh with offset indices. If any sub-model lacks
/// normals, the merged mesh is returned without normals so they can be estimated.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    info!("Loading OBJ file: {}", path.display());

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ..Default::default()
    };

    // Materials (MTL) are ignored; materials come from the scene description.
    let (models, _materials) = tobj::load_obj(path, &load_options)?;

    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut faces = Vec::new();
    let mut all_have_normals = true;

    // Iterate over all models found in the OBJ file
    for model in &models {
        let mesh = &model.mesh;
        let vertex_offset = vertices.len();
        let normal_offset = normals.len();

        let has_normals =
            !mesh.normals.is_empty() && mesh.normal_indices.len() == mesh.indices.len();
        if !has_normals {
            warn!(
                "Mesh '{}' is missing normals. They will be estimated.",
                model.name
            );
            all_have_normals = false;
        }

        vertices.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0], p[1], p[2])),
        );
        if has_normals {
            normals.extend(
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| Vector3::new(n[0], n[1], n[2])),
            );
        }

        // OBJ indices from tobj are 0-based; faces are 1-based past the sentinel.
        for (tri, corner) in mesh.indices.chunks_exact(3).enumerate() {
            let v = |i: usize| corner[i] as usize + vertex_offset + 1;
            let vertex_indices = [v(0), v(1), v(2)];
            let normal_indices = if has_normals {
                let n = &mesh.normal_indices[tri * 3..tri * 3 + 3];
                [
                    n[0] as usize + normal_offset + 1,
                    n[1] as usize + normal_offset + 1,
                    n[2] as usize + normal_offset + 1,
                ]
            } else {
                vertex_indices
            };
            faces.push(Face::new(vertex_indices, normal_indices));
        }
    }

    if !all_have_normals {
        normals.clear();
    }

    info!(
        "OBJ loaded successfully. Total vertices: {}, Total faces: {}",
        vertices.len(),
        faces.len()
    );

    Ok(Mesh::new(vertices, normals, faces))
}
