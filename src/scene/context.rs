use crate::error::{RenderError, Result};
use crate::scene::camera::Camera;
use crate::scene::light::PointLight;
use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use crate::scene::scene_object::SceneObject;
use std::collections::HashMap;
use std::sync::Arc;

/// Holds all scene resources required for rendering.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub camera: Camera,
    pub lights: Vec<PointLight>,
    /// Named base meshes.
    pub meshes: HashMap<String, Arc<Mesh>>,
    /// Instances in draw order.
    pub objects: Vec<SceneObject>,
    copies: HashMap<String, usize>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: Mesh) -> Arc<Mesh> {
        let mesh = Arc::new(mesh);
        self.meshes.insert(name.into(), Arc::clone(&mesh));
        mesh
    }

    /// Appends a new instance of the named mesh, labelled `<mesh>_copy<N>` where `N`
    /// counts the instances of that mesh so far (starting at 1).
    pub fn instantiate(&mut self, mesh_name: &str, material: Material) -> Result<&mut SceneObject> {
        let mesh = self
            .meshes
            .get(mesh_name)
            .cloned()
            .ok_or_else(|| RenderError::UnknownMesh(mesh_name.to_string()))?;

        let count = self.copies.entry(mesh_name.to_string()).or_insert(0);
        *count += 1;
        let label = format!("{mesh_name}_copy{count}");

        self.objects.push(SceneObject::new(label, mesh, material));
        let last = self.objects.len() - 1;
        Ok(&mut self.objects[last])
    }

    /// Validates the camera and every light.
    pub fn validate(&self) -> Result<()> {
        self.camera.validate()?;
        for light in &self.lights {
            light.validate()?;
        }
        Ok(())
    }
}
