use crate::core::geometry::Face;
use crate::error::{RenderError, Result};
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

/// How estimated normals are laid out in the output array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalLayout {
    /// Three normals per face, face-major in in-face vertex order.
    #[default]
    PerCorner,
    /// One normal per unique vertex; normal indices equal vertex indices.
    PerVertex,
}

impl std::str::FromStr for NormalLayout {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "corner" => Ok(Self::PerCorner),
            "vertex" => Ok(Self::PerVertex),
            other => Err(RenderError::UnknownNormalLayout(other.to_string())),
        }
    }
}

/// One directed side of a mesh edge.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// Vertex this half-edge starts from (1-based mesh index).
    pub origin: usize,
    /// Face this half-edge belongs to (0-based face index).
    pub face: usize,
    /// Next half-edge around the same face.
    pub next: usize,
    /// Opposite-direction half-edge across the shared edge.
    pub twin: usize,
}

/// Index-based half-edge arena.
///
/// Face `f` owns half-edges `3f`, `3f + 1`, `3f + 2`.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    pub half_edges: Vec<HalfEdge>,
    /// One outgoing half-edge per vertex; `None` for unreferenced vertices and the sentinel.
    pub outgoing: Vec<Option<usize>>,
}

impl HalfEdgeMesh {
    /// Builds the adjacency structure for a triangle mesh with `vertex_count` slots
    /// (sentinel included).
    ///
    /// Rejects meshes that are not closed, consistently oriented 2-manifolds: every
    /// directed edge must occur once and its reverse must exist.
    pub fn build(vertex_count: usize, faces: &[Face]) -> Result<Self> {
        let mut half_edges = Vec::with_capacity(faces.len() * 3);
        let mut outgoing = vec![None; vertex_count];
        let mut directed: HashMap<(usize, usize), usize> = HashMap::with_capacity(faces.len() * 3);

        for (face_idx, face) in faces.iter().enumerate() {
            let base = face_idx * 3;

            for corner in 0..3 {
                let origin = face.vertices[corner];
                let dest = face.vertices[(corner + 1) % 3];
                for index in [origin, dest] {
                    if index == 0 || index >= vertex_count {
                        return Err(RenderError::IndexOutOfRange {
                            face: face_idx,
                            kind: "vertex",
                            index,
                            available: vertex_count.saturating_sub(1),
                        });
                    }
                }

                let he_idx = base + corner;
                if directed.insert((origin, dest), he_idx).is_some() {
                    return Err(RenderError::NonManifoldMesh(format!(
                        "directed edge {origin}->{dest} appears in more than one face"
                    )));
                }
                outgoing[origin].get_or_insert(he_idx);

                half_edges.push(HalfEdge {
                    origin,
                    face: face_idx,
                    next: base + (corner + 1) % 3,
                    twin: usize::MAX,
                });
            }
        }

        for he_idx in 0..half_edges.len() {
            let origin = half_edges[he_idx].origin;
            let dest = half_edges[half_edges[he_idx].next].origin;
            match directed.get(&(dest, origin)) {
                Some(&twin) => half_edges[he_idx].twin = twin,
                None => {
                    return Err(RenderError::NonManifoldMesh(format!(
                        "edge {origin}->{dest} has no opposite half-edge"
                    )));
                }
            }
        }

        Ok(Self {
            half_edges,
            outgoing,
        })
    }

    /// Half-edges leaving `vertex`, walking the ring `he -> next(twin(he))`.
    pub fn vertex_ring(&self, vertex: usize) -> Vec<usize> {
        let mut ring = Vec::new();
        let Some(start) = self.outgoing.get(vertex).copied().flatten() else {
            return ring;
        };
        let mut he = start;
        loop {
            ring.push(he);
            he = self.half_edges[self.half_edges[he].twin].next;
            // next(twin(.)) permutes the outgoing half-edges of a vertex, so this returns.
            if he == start {
                break;
            }
        }
        ring
    }
}

/// Un-normalized face normal `(v2 - v1) x (v3 - v1)`; its length is twice the area.
#[inline]
pub fn face_normal(vertices: &[Point3<f32>], face: &Face) -> Vector3<f32> {
    let v1 = vertices[face.vertices[0]];
    let v2 = vertices[face.vertices[1]];
    let v3 = vertices[face.vertices[2]];
    (v2 - v1).cross(&(v3 - v1))
}

/// Area-weighted sum of incident face normals for every vertex slot.
/// Slot 0 and unreferenced vertices get a zero vector.
pub fn vertex_normals(vertices: &[Point3<f32>], faces: &[Face]) -> Result<Vec<Vector3<f32>>> {
    let topology = HalfEdgeMesh::build(vertices.len(), faces)?;

    let weighted: Vec<Vector3<f32>> = faces
        .iter()
        .map(|face| {
            let n = face_normal(vertices, face);
            let area = 0.5 * n.norm();
            n * area
        })
        .collect();

    let normals: Vec<Vector3<f32>> = (0..vertices.len())
        .map(|v| {
            topology
                .vertex_ring(v)
                .into_iter()
                .map(|he| weighted[topology.half_edges[he].face])
                .sum::<Vector3<f32>>()
        })
        .collect();

    Ok(normals)
}

/// Estimates normals for a mesh that has none.
///
/// Returns the new normal array (sentinel at index 0) and the faces with their normal
/// indices rewritten for the chosen layout.
pub fn estimate_normals(
    vertices: &[Point3<f32>],
    faces: &[Face],
    layout: NormalLayout,
) -> Result<(Vec<Vector3<f32>>, Vec<Face>)> {
    let per_vertex = vertex_normals(vertices, faces)?;

    match layout {
        NormalLayout::PerVertex => {
            let faces = faces
                .iter()
                .map(|f| Face::with_shared_indices(f.vertices))
                .collect();
            Ok((per_vertex, faces))
        }
        NormalLayout::PerCorner => {
            let mut normals = Vec::with_capacity(faces.len() * 3 + 1);
            normals.push(Vector3::zeros());
            let mut out_faces = Vec::with_capacity(faces.len());
            for face in faces {
                let base = normals.len();
                for &v in &face.vertices {
                    normals.push(per_vertex[v]);
                }
                out_faces.push(Face::new(face.vertices, [base, base + 1, base + 2]));
            }
            Ok((normals, out_faces))
        }
    }
}
