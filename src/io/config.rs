use crate::core::color::from_rgb8;
use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lights: Vec<LightConfig>,
    #[serde(default)]
    pub meshes: Vec<MeshConfig>,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            lights: vec![LightConfig {
                position: [2.0, 3.0, 5.0],
                color: [1.0, 1.0, 1.0],
                attenuation: 0.0,
            }],
            meshes: vec![MeshConfig {
                name: "tetrahedron".to_string(),
                path: "builtin:tetrahedron".to_string(),
            }],
            objects: vec![ObjectConfig {
                mesh: "tetrahedron".to_string(),
                label: None,
                transforms: vec![
                    TransformConfig::Rotate([1.0, 1.0, 0.0, 0.5]),
                    TransformConfig::Scale([0.8, 0.8, 0.8]),
                ],
                ambient: default_ambient(),
                diffuse: [0.2, 0.6, 0.9],
                specular: default_specular(),
                shininess: default_shininess(),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,

    // --- Pipeline ---
    #[serde(default = "default_mode")]
    pub mode: String, // "wireframe", "gouraud", "phong"
    #[serde(default = "default_normals")]
    pub normals: String, // "corner", "vertex"
    #[serde(default = "default_cull_mode")]
    pub cull_mode: String, // "back", "front", "none"

    // --- Palette ---
    #[serde(default = "default_background")]
    pub background: [f32; 3],
    #[serde(default = "default_wireframe_color")]
    pub wireframe_color: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            mode: default_mode(),
            normals: default_normals(),
            cull_mode: default_cull_mode(),
            background: default_background(),
            wireframe_color: default_wireframe_color(),
        }
    }
}

fn default_width() -> usize {
    512
}
fn default_height() -> usize {
    512
}
fn default_output() -> String {
    "output.ppm".to_string()
}
fn default_mode() -> String {
    "phong".to_string()
}
fn default_normals() -> String {
    "corner".to_string()
}
fn default_cull_mode() -> String {
    "back".to_string()
}
fn default_background() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}
fn default_wireframe_color() -> [f32; 3] {
    from_rgb8([253, 185, 39]).into()
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Axis-angle placement: `[x, y, z, theta]`, theta in radians.
    #[serde(default = "default_orientation")]
    pub orientation: [f32; 4],
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_left")]
    pub left: f32,
    #[serde(default = "default_right")]
    pub right: f32,
    #[serde(default = "default_top")]
    pub top: f32,
    #[serde(default = "default_bottom")]
    pub bottom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            orientation: default_orientation(),
            near: default_near(),
            far: default_far(),
            left: default_left(),
            right: default_right(),
            top: default_top(),
            bottom: default_bottom(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, 5.0]
}
fn default_orientation() -> [f32; 4] {
    [0.0, 1.0, 0.0, 0.0]
}
fn default_near() -> f32 {
    1.0
}
fn default_far() -> f32 {
    10.0
}
fn default_left() -> f32 {
    -0.5
}
fn default_right() -> f32 {
    0.5
}
fn default_top() -> f32 {
    0.5
}
fn default_bottom() -> f32 {
    -0.5
}

#[derive(Debug, Deserialize)]
pub struct LightConfig {
    pub position: [f32; 3],
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    #[serde(default)]
    pub attenuation: f32,
}

fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Deserialize)]
pub struct MeshConfig {
    pub name: String,
    /// OBJ file relative to the config file, or a `builtin:` mesh name.
    pub path: String,
}

/// One step of an instance's transform list, applied in file order.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformConfig {
    Translate([f32; 3]),
    /// `[x, y, z, theta]`, theta in radians.
    Rotate([f32; 4]),
    Scale([f32; 3]),
}

#[derive(Debug, Deserialize)]
pub struct ObjectConfig {
    pub mesh: String,
    #[serde(default)]
    pub label: Option<String>,

    // --- Transform ---
    #[serde(default)]
    pub transforms: Vec<TransformConfig>,

    // --- Material Values ---
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
    #[serde(default = "default_diffuse")]
    pub diffuse: [f32; 3],
    #[serde(default = "default_specular")]
    pub specular: [f32; 3],
    #[serde(default = "default_shininess")]
    pub shininess: f32,
}

fn default_ambient() -> [f32; 3] {
    [0.1, 0.1, 0.1]
}
fn default_diffuse() -> [f32; 3] {
    [0.8, 0.8, 0.8]
}
fn default_specular() -> [f32; 3] {
    [0.5, 0.5, 0.5]
}
fn default_shininess() -> f32 {
    20.0
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.render.width, 512);
        assert_eq!(config.render.mode, "phong");
        assert_eq!(config.render.cull_mode, "back");
        assert_eq!(config.camera.near, 1.0);
        assert!(config.lights.is_empty());
        assert!(config.objects.is_empty());
    }

    #[test]
    fn test_full_scene_parses() {
        let config = Config::from_toml_str(
            r#"
            [render]
            width = 64
            height = 48
            mode = "gouraud"
            normals = "vertex"

            [camera]
            position = [0.0, 1.0, 6.0]
            orientation = [1.0, 0.0, 0.0, -0.2]
            near = 2.0
            far = 20.0

            [[lights]]
            position = [0.0, 5.0, 5.0]
            attenuation = 0.01

            [[meshes]]
            name = "box"
            path = "builtin:cube"

            [[objects]]
            mesh = "box"
            transforms = [
                { scale = [2.0, 1.0, 1.0] },
                { rotate = [0.0, 1.0, 0.0, 0.785] },
                { translate = [0.0, 0.0, -1.0] },
            ]
            diffuse = [1.0, 0.0, 0.0]
            shininess = 5.0
            "#,
        )
        .unwrap();

        assert_eq!((config.render.width, config.render.height), (64, 48));
        assert_eq!(config.render.normals, "vertex");
        assert_eq!(config.camera.orientation, [1.0, 0.0, 0.0, -0.2]);
        assert_eq!(config.camera.left, -0.5);
        assert_eq!(config.lights[0].color, [1.0, 1.0, 1.0]);
        assert_eq!(config.meshes[0].path, "builtin:cube");

        let object = &config.objects[0];
        assert_eq!(
            object.transforms,
            vec![
                TransformConfig::Scale([2.0, 1.0, 1.0]),
                TransformConfig::Rotate([0.0, 1.0, 0.0, 0.785]),
                TransformConfig::Translate([0.0, 0.0, -1.0]),
            ]
        );
        assert_eq!(object.ambient, [0.1, 0.1, 0.1]);
        assert_eq!(object.shininess, 5.0);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(Config::from_toml_str("[render\nwidth = 3").is_err());
        assert!(Config::from_toml_str("[[objects]]\ntransforms = [{ shear = 1.0 }]").is_err());
    }
}
