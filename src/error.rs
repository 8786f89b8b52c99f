use thiserror::Error;

/// Errors raised at the scene-construction boundary and by the render entry points.
///
/// The geometry and lighting math itself never recovers from bad numeric input;
/// everything here is detected before rasterization starts.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Degenerate camera frustum: {0}")]
    DegenerateFrustum(String),
    #[error("Face {face} references {kind} index {index}, but only {available} are available")]
    IndexOutOfRange {
        face: usize,
        kind: &'static str,
        index: usize,
        available: usize,
    },
    #[error("Mesh is not a closed, consistently oriented manifold: {0}")]
    NonManifoldMesh(String),
    #[error("Object '{0}' has no normals; shaded rendering requires normals")]
    MissingNormals(String),
    #[error("Transform of object '{0}' is not invertible")]
    SingularTransform(String),
    #[error("Unknown mesh '{0}'")]
    UnknownMesh(String),
    #[error("Invalid light: {0}")]
    InvalidLight(String),
    #[error("Unknown render mode '{0}' (expected wireframe, gouraud or phong)")]
    UnknownRenderMode(String),
    #[error("Unknown normal layout '{0}' (expected corner or vertex)")]
    UnknownNormalLayout(String),
    #[error("Unknown cull mode '{0}' (expected back, front or none)")]
    UnknownCullMode(String),
    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: usize, height: usize },
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to load OBJ: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
