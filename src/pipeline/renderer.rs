use crate::core::color::from_rgb8;
use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::{CullMode, Rasterizer};
use crate::error::{RenderError, Result};
use crate::pipeline::geometry::{TransformedObject, transform_objects};
use crate::pipeline::shaders::Shader;
use crate::pipeline::shaders::gouraud::GouraudShader;
use crate::pipeline::shaders::phong::PhongShader;
use crate::scene::context::Scene;
use log::{debug, info};
use nalgebra::Vector3;
use std::time::Instant;

/// How shaded triangles interpolate lighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    /// Light the vertices, interpolate colors.
    Gouraud,
    /// Interpolate position and normal, light every pixel.
    Phong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Wireframe,
    Shaded(ShadingMode),
}

impl std::str::FromStr for RenderMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "wireframe" => Ok(Self::Wireframe),
            "gouraud" => Ok(Self::Shaded(ShadingMode::Gouraud)),
            "phong" => Ok(Self::Shaded(ShadingMode::Phong)),
            other => Err(RenderError::UnknownRenderMode(other.to_string())),
        }
    }
}

/// Per-render settings that are not part of the scene itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub background: Vector3<f32>,
    pub wireframe_color: Vector3<f32>,
    pub cull_mode: CullMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            background: Vector3::zeros(),
            wireframe_color: from_rgb8([253, 185, 39]),
            cull_mode: CullMode::Back,
        }
    }
}

/// The high-level renderer that orchestrates the pipeline stages.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }
        Ok(Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
        })
    }

    /// Clears the framebuffer.
    pub fn clear(&mut self, color: Vector3<f32>) {
        self.framebuffer.clear(color, f32::INFINITY);
    }

    /// Draws every edge of every face of `object`.
    pub fn draw_wireframe(&self, object: &TransformedObject, color: Vector3<f32>) {
        for face in &object.mesh.faces {
            let ndc = face.vertices.map(|v| object.ndc_vertices[v]);
            self.rasterizer.draw_wireframe(&self.framebuffer, &ndc, color);
        }
    }

    /// Scan-converts every face of `object` with `shader`, in face order.
    ///
    /// Returns the number of pixels written.
    pub fn draw_shaded<S: Shader>(
        &self,
        object: &TransformedObject,
        shader: &S,
    ) -> Result<usize> {
        let normals = object
            .normals
            .as_deref()
            .ok_or_else(|| RenderError::MissingNormals(object.label.clone()))?;

        let mut written = 0;
        for face in &object.mesh.faces {
            let ndc = face.vertices.map(|v| object.ndc_vertices[v]);
            let varyings = [
                shader.vertex(object, normals, face, 0),
                shader.vertex(object, normals, face, 1),
                shader.vertex(object, normals, face, 2),
            ];
            written += self.rasterizer.rasterize_triangle(
                &self.framebuffer,
                &ndc,
                &varyings,
                |varying| shader.fragment(varying),
            );
        }
        Ok(written)
    }

    /// Renders the whole scene into the framebuffer.
    pub fn render(
        &mut self,
        scene: &Scene,
        mode: RenderMode,
        options: &RenderOptions,
    ) -> Result<()> {
        scene.validate()?;
        for object in &scene.objects {
            object.mesh.validate()?;
        }

        self.rasterizer.set_cull_mode(options.cull_mode);
        self.clear(options.background);

        let start_time = Instant::now();
        let with_normals = matches!(mode, RenderMode::Shaded(_));
        let objects = transform_objects(&scene.objects, &scene.camera, with_normals)?;
        debug!(
            "Geometry stage: {} objects in {:.2?}",
            objects.len(),
            start_time.elapsed()
        );

        let eye = scene.camera.position;
        for object in &objects {
            match mode {
                RenderMode::Wireframe => self.draw_wireframe(object, options.wireframe_color),
                RenderMode::Shaded(ShadingMode::Gouraud) => {
                    let shader = GouraudShader::new(&object.material, &scene.lights, eye);
                    let written = self.draw_shaded(object, &shader)?;
                    debug!("'{}': {} pixels written", object.label, written);
                }
                RenderMode::Shaded(ShadingMode::Phong) => {
                    let shader = PhongShader::new(&object.material, &scene.lights, eye);
                    let written = self.draw_shaded(object, &shader)?;
                    debug!("'{}': {} pixels written", object.label, written);
                }
            }
        }

        info!(
            "Rendered {} objects ({:?}) in {:.2?}",
            objects.len(),
            mode,
            start_time.elapsed()
        );
        Ok(())
    }

    pub fn into_framebuffer(self) -> FrameBuffer {
        self.framebuffer
    }
}

/// Renders `scene` at `width` x `height` with the default palette and back-face culling.
pub fn render_scene(
    scene: &Scene,
    width: usize,
    height: usize,
    mode: RenderMode,
) -> Result<FrameBuffer> {
    render_scene_with(scene, width, height, mode, &RenderOptions::default())
}

pub fn render_scene_with(
    scene: &Scene,
    width: usize,
    height: usize,
    mode: RenderMode,
    options: &RenderOptions,
) -> Result<FrameBuffer> {
    let mut renderer = Renderer::new(width, height)?;
    renderer.render(scene, mode, options)?;
    Ok(renderer.into_framebuffer())
}
