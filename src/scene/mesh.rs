use crate::core::geometry::Face;
use crate::core::normals::{NormalLayout, estimate_normals};
use crate::error::{RenderError, Result};
use nalgebra::{Point3, Vector3};

/// Base triangle geometry shared by every instance that references it.
///
/// `vertices` and `normals` keep an unused sentinel at index 0 so that the 1-based
/// indices stored in `faces` address them directly.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Builds a mesh from 0-based position and normal lists and 1-based faces.
    /// An empty `normals` list means the mesh carries no normals.
    pub fn new(vertices: Vec<Point3<f32>>, normals: Vec<Vector3<f32>>, faces: Vec<Face>) -> Self {
        let mut with_sentinel = Vec::with_capacity(vertices.len() + 1);
        with_sentinel.push(Point3::origin());
        with_sentinel.extend(vertices);

        let mut normals_with_sentinel = Vec::with_capacity(normals.len() + 1);
        normals_with_sentinel.push(Vector3::zeros());
        normals_with_sentinel.extend(normals);

        Self {
            vertices: with_sentinel,
            normals: normals_with_sentinel,
            faces,
        }
    }

    /// Number of real vertices (sentinel excluded).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    pub fn has_normals(&self) -> bool {
        self.normals.len() > 1
    }

    /// Checks that every face index addresses an existing vertex, and an existing
    /// normal when the mesh has normals.
    pub fn validate(&self) -> Result<()> {
        for (face_idx, face) in self.faces.iter().enumerate() {
            check_indices(face_idx, "vertex", &face.vertices, self.vertices.len())?;
            if self.has_normals() {
                check_indices(face_idx, "normal", &face.normals, self.normals.len())?;
            }
        }
        Ok(())
    }

    /// Replaces the normal array with normals estimated from the closed surface.
    pub fn with_estimated_normals(self, layout: NormalLayout) -> Result<Self> {
        self.validate()?;
        let (normals, faces) = estimate_normals(&self.vertices, &self.faces, layout)?;
        Ok(Self {
            vertices: self.vertices,
            normals,
            faces,
        })
    }

    /// Creates a simple triangle mesh for testing purposes.
    ///
    /// Vertices are arranged in Counter-Clockwise (CCW) order, normals face Z+.
    pub fn create_test_triangle() -> Self {
        let vertices = vec![
            Point3::new(0.0, 0.5, 0.0),   // Top
            Point3::new(-0.5, -0.5, 0.0), // Bottom Left
            Point3::new(0.5, -0.5, 0.0),  // Bottom Right
        ];
        let normals = vec![Vector3::z(); 3];
        Self::new(vertices, normals, vec![Face::with_shared_indices([1, 2, 3])])
    }

    /// Regular tetrahedron centered at the origin, outward winding, no normals.
    pub fn create_tetrahedron() -> Self {
        let vertices = vec![
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
        ];
        let faces = [[1, 2, 3], [1, 4, 2], [1, 3, 4], [2, 4, 3]]
            .into_iter()
            .map(Face::with_shared_indices)
            .collect();
        Self::new(vertices, Vec::new(), faces)
    }

    /// Axis-aligned cube spanning [-1, 1]^3, outward winding, no normals.
    pub fn create_cube() -> Self {
        let vertices = vec![
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
        ];
        #[rustfmt::skip]
        let faces = [
            [5, 6, 7], [5, 7, 8], // +Z
            [1, 3, 2], [1, 4, 3], // -Z
            [2, 3, 7], [2, 7, 6], // +X
            [1, 5, 8], [1, 8, 4], // -X
            [4, 8, 7], [4, 7, 3], // +Y
            [1, 2, 6], [1, 6, 5], // -Y
        ]
        .into_iter()
        .map(Face::with_shared_indices)
        .collect();
        Self::new(vertices, Vec::new(), faces)
    }

    /// Looks up one of the built-in meshes by its `builtin:` name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "builtin:triangle" => Some(Self::create_test_triangle()),
            "builtin:tetrahedron" => Some(Self::create_tetrahedron()),
            "builtin:cube" => Some(Self::create_cube()),
            _ => None,
        }
    }
}

fn check_indices(face: usize, kind: &'static str, indices: &[usize; 3], len: usize) -> Result<()> {
    for &index in indices {
        if index == 0 || index >= len {
            return Err(RenderError::IndexOutOfRange {
                face,
                kind,
                index,
                available: len.saturating_sub(1),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normals::face_normal;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_inserts_sentinels() {
        let mesh = Mesh::create_test_triangle();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.normals.len(), 4);
        assert_eq!(mesh.vertex_count(), 3);
        assert!(mesh.has_normals());
        assert!(!Mesh::create_tetrahedron().has_normals());
    }

    #[test]
    fn test_validate_reports_bad_indices() {
        let mut mesh = Mesh::create_test_triangle();
        assert!(mesh.validate().is_ok());

        mesh.faces.push(Face::with_shared_indices([1, 2, 9]));
        match mesh.validate() {
            Err(RenderError::IndexOutOfRange {
                face, kind, index, ..
            }) => {
                assert_eq!((face, kind, index), (1, "vertex", 9));
            }
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }

        let mut mesh = Mesh::create_test_triangle();
        mesh.faces[0].normals = [1, 2, 4];
        assert!(matches!(
            mesh.validate(),
            Err(RenderError::IndexOutOfRange { kind: "normal", .. })
        ));
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let cube = Mesh::create_cube();
        assert!(cube.validate().is_ok());
        for face in &cube.faces {
            let n = face_normal(&cube.vertices, face);
            let centroid = face
                .vertices
                .iter()
                .map(|&v| cube.vertices[v].coords)
                .sum::<Vector3<f32>>()
                / 3.0;
            assert!(n.dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_estimated_cube_normals_point_to_corners() {
        let cube = Mesh::create_cube()
            .with_estimated_normals(NormalLayout::PerVertex)
            .unwrap();
        assert!(cube.has_normals());
        assert!(cube.validate().is_ok());
        for v in 1..cube.vertices.len() {
            let n = cube.normals[v].normalize();
            let corner = cube.vertices[v].coords.normalize();
            assert!(n.dot(&corner) > 0.5, "normal at vertex {v} points inward");
        }
    }

    #[test]
    fn test_per_corner_layout_rewrites_normal_indices() {
        let tetra = Mesh::create_tetrahedron()
            .with_estimated_normals(NormalLayout::PerCorner)
            .unwrap();
        assert_eq!(tetra.normals.len(), 13);
        assert_eq!(tetra.faces[3].normals, [10, 11, 12]);
        for face in &tetra.faces {
            for corner in 0..3 {
                let n = tetra.normals[face.normals[corner]];
                let v = tetra.vertices[face.vertices[corner]];
                assert_relative_eq!(n.normalize(), v.coords.normalize(), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_builtin_lookup() {
        assert!(Mesh::builtin("builtin:cube").is_some());
        assert!(Mesh::builtin("cube").is_none());
    }
}
