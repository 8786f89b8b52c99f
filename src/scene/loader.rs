use crate::core::math::transform::TransformFactory;
use crate::core::normals::NormalLayout;
use crate::error::{RenderError, Result};
use crate::io::config::{CameraConfig, Config, ObjectConfig, TransformConfig};
use crate::io::obj_loader::load_obj;
use crate::pipeline::renderer::RenderMode;
use crate::scene::camera::{Camera, Frustum};
use crate::scene::context::Scene;
use crate::scene::light::PointLight;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use log::{debug, info};
use nalgebra::{Matrix4, Point3, Vector3};
use std::path::Path;

/// Builds a validated scene from the configuration.
///
/// Mesh paths are resolved against `base_dir` (normally the directory of the config
/// file). In shaded modes, meshes without normals get estimated ones in the configured
/// layout; wireframe scenes keep them as loaded.
pub fn build_scene(config: &Config, base_dir: &Path) -> Result<Scene> {
    let camera = build_camera(&config.camera);
    camera.validate()?;

    let mut scene = Scene::new(camera);
    for light in build_lights(config)? {
        scene.add_light(light);
    }

    let layout: NormalLayout = config.render.normals.parse()?;
    let mode: RenderMode = config.render.mode.parse()?;
    let estimate = (mode != RenderMode::Wireframe).then_some(layout);
    for mesh_conf in &config.meshes {
        let mesh = load_mesh(&mesh_conf.path, base_dir, estimate)?;
        info!(
            "Mesh '{}': {} vertices, {} faces",
            mesh_conf.name,
            mesh.vertex_count(),
            mesh.faces.len()
        );
        scene.add_mesh(mesh_conf.name.clone(), mesh);
    }

    for obj_conf in &config.objects {
        add_object(&mut scene, obj_conf)?;
    }

    info!(
        "Scene ready: {} meshes, {} objects, {} lights",
        scene.meshes.len(),
        scene.objects.len(),
        scene.lights.len()
    );
    Ok(scene)
}

pub fn build_camera(conf: &CameraConfig) -> Camera {
    let [x, y, z, theta] = conf.orientation;
    Camera::new(
        Point3::from(conf.position),
        Vector3::new(x, y, z),
        theta,
        Frustum {
            near: conf.near,
            far: conf.far,
            left: conf.left,
            right: conf.right,
            top: conf.top,
            bottom: conf.bottom,
        },
    )
}

/// Helper to build the light list from config.
pub fn build_lights(config: &Config) -> Result<Vec<PointLight>> {
    config
        .lights
        .iter()
        .map(|l| {
            let light =
                PointLight::new(Point3::from(l.position), Vector3::from(l.color), l.attenuation);
            light.validate()?;
            Ok(light)
        })
        .collect()
}

/// Loads a `builtin:` mesh or an OBJ file. A mesh without normals gets estimated ones
/// when `estimate` names a layout.
fn load_mesh(path: &str, base_dir: &Path, estimate: Option<NormalLayout>) -> Result<Mesh> {
    let mesh = if path.starts_with("builtin:") {
        Mesh::builtin(path).ok_or_else(|| RenderError::UnknownMesh(path.to_string()))?
    } else {
        load_obj(base_dir.join(path))?
    };

    match estimate {
        Some(layout) if !mesh.has_normals() => {
            debug!("Estimating {:?} normals for '{}'", layout, path);
            mesh.with_estimated_normals(layout)
        }
        _ => {
            mesh.validate()?;
            Ok(mesh)
        }
    }
}

fn add_object(scene: &mut Scene, conf: &ObjectConfig) -> Result<()> {
    let material = Material::new(
        Vector3::from(conf.ambient),
        Vector3::from(conf.diffuse),
        Vector3::from(conf.specular),
        conf.shininess,
    );
    let object = scene.instantiate(&conf.mesh, material)?;
    if let Some(label) = &conf.label {
        object.label = label.clone();
    }
    for transform in &conf.transforms {
        object.add_transformation(&transform_matrix(transform));
    }
    debug!("Instantiated '{}'", object.label);
    Ok(())
}

pub fn transform_matrix(transform: &TransformConfig) -> Matrix4<f32> {
    match *transform {
        TransformConfig::Translate(t) => TransformFactory::translation(&Vector3::from(t)),
        TransformConfig::Rotate([x, y, z, theta]) => {
            TransformFactory::rotation(&Vector3::new(x, y, z), theta)
        }
        TransformConfig::Scale(s) => TransformFactory::scaling(&Vector3::from(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::transform::transform_point;
    use approx::assert_relative_eq;
    use std::fs;

    #[test]
    fn test_default_config_builds_demo_scene() {
        let scene = build_scene(&Config::default(), Path::new(".")).unwrap();
        assert_eq!(scene.objects.len(), 1);
        assert_eq!(scene.objects[0].label, "tetrahedron_copy1");
        assert!(scene.objects[0].mesh.has_normals());
        assert_eq!(scene.lights.len(), 1);
    }

    #[test]
    fn test_transforms_follow_file_order() {
        let config = Config::from_toml_str(
            r#"
            [[meshes]]
            name = "tri"
            path = "builtin:triangle"

            [[objects]]
            mesh = "tri"
            label = "moved"
            transforms = [{ scale = [2.0, 2.0, 2.0] }, { translate = [1.0, 0.0, 0.0] }]
            "#,
        )
        .unwrap();
        let scene = build_scene(&config, Path::new(".")).unwrap();
        let object = &scene.objects[0];
        assert_eq!(object.label, "moved");
        let p = transform_point(&object.transform, &Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Point3::new(3.0, 2.0, 2.0), epsilon = 1e-6);
    }

    #[test]
    fn test_vertex_layout_is_honored() {
        let config = Config::from_toml_str(
            r#"
            [render]
            normals = "vertex"

            [[meshes]]
            name = "box"
            path = "builtin:cube"
            "#,
        )
        .unwrap();
        let scene = build_scene(&config, Path::new(".")).unwrap();
        let cube = &scene.meshes["box"];
        assert_eq!(cube.normals.len(), cube.vertices.len());
    }

    #[test]
    fn test_boundary_errors() {
        let unknown_layout = Config::from_toml_str("[render]\nnormals = \"face\"").unwrap();
        assert!(matches!(
            build_scene(&unknown_layout, Path::new(".")),
            Err(RenderError::UnknownNormalLayout(_))
        ));

        let bad_camera = Config::from_toml_str("[camera]\nnear = 5.0\nfar = 1.0").unwrap();
        assert!(matches!(
            build_scene(&bad_camera, Path::new(".")),
            Err(RenderError::DegenerateFrustum(_))
        ));

        let bad_light =
            Config::from_toml_str("[[lights]]\nposition = [0.0, 0.0, 0.0]\nattenuation = -1.0")
                .unwrap();
        assert!(matches!(
            build_scene(&bad_light, Path::new(".")),
            Err(RenderError::InvalidLight(_))
        ));

        let unknown_mesh = Config::from_toml_str("[[objects]]\nmesh = \"nope\"").unwrap();
        assert!(matches!(
            build_scene(&unknown_mesh, Path::new(".")),
            Err(RenderError::UnknownMesh(_))
        ));

        let unknown_builtin =
            Config::from_toml_str("[[meshes]]\nname = \"x\"\npath = \"builtin:torus\"").unwrap();
        assert!(build_scene(&unknown_builtin, Path::new(".")).is_err());
    }

    #[test]
    fn test_open_mesh_without_normals_only_fails_when_shaded() {
        let dir = std::env::temp_dir().join("phong_raster_loader_open_mesh");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("tri.obj"), "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let scene_toml = |mode: &str| {
            format!(
                "[render]\nmode = \"{mode}\"\n\n[[meshes]]\nname = \"tri\"\npath = \"tri.obj\"\n\n\
                 [[objects]]\nmesh = \"tri\"\n"
            )
        };

        let wire = Config::from_toml_str(&scene_toml("wireframe")).unwrap();
        let scene = build_scene(&wire, &dir).unwrap();
        assert!(!scene.meshes["tri"].has_normals());
        assert_eq!(scene.objects[0].label, "tri_copy1");

        let shaded = Config::from_toml_str(&scene_toml("gouraud")).unwrap();
        assert!(matches!(
            build_scene(&shaded, &dir),
            Err(RenderError::NonManifoldMesh(_))
        ));
    }

    #[test]
    fn test_unknown_render_mode_is_rejected() {
        let config = Config::from_toml_str("[render]\nmode = \"flat\"").unwrap();
        assert!(matches!(
            build_scene(&config, Path::new(".")),
            Err(RenderError::UnknownRenderMode(_))
        ));
    }
}
