/// A triangle referencing its owner's vertex and normal arrays.
///
/// Indices are 1-based; slot 0 of every array is an unused sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub vertices: [usize; 3],
    pub normals: [usize; 3],
}

impl Face {
    pub fn new(vertices: [usize; 3], normals: [usize; 3]) -> Self {
        Self { vertices, normals }
    }

    /// A face whose normal indices mirror its vertex indices.
    pub fn with_shared_indices(vertices: [usize; 3]) -> Self {
        Self {
            vertices,
            normals: vertices,
        }
    }
}
