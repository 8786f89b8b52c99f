use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the homogeneous 4x4 matrices used by the pipeline.
/// Right-handed; the camera looks down its local -Z axis.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a rotation matrix around an arbitrary axis using Rodrigues' rotation formula.
    /// The axis is normalized internally.
    pub fn rotation(axis: &Vector3<f32>, angle_rad: f32) -> Matrix4<f32> {
        let axis_unit = axis.normalize();
        let x = axis_unit.x;
        let y = axis_unit.y;
        let z = axis_unit.z;
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        let t = 1.0 - c;

        Matrix4::new(
            t * x * x + c,     t * x * y - z * s, t * x * z + y * s, 0.0,
            t * x * y + z * s, t * y * y + c,     t * y * z - x * s, 0.0,
            t * x * z - y * s, t * y * z + x * s, t * z * z + c,     0.0,
            0.0,               0.0,               0.0,               1.0,
        )
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// World-to-camera matrix for a camera placed by
    /// `translation(position) * rotation(axis, angle)`.
    ///
    /// The placement is rigid, so its inverse is `R^T * T(-position)`.
    pub fn world_to_camera(
        position: &Point3<f32>,
        axis: &Vector3<f32>,
        angle_rad: f32,
    ) -> Matrix4<f32> {
        let inverse_rotation = Self::rotation(axis, angle_rad).transpose();
        inverse_rotation * Self::translation(&-position.coords)
    }

    /// Creates an off-center Perspective Projection matrix (OpenGL `glFrustum` layout).
    /// Maps the view frustum to homogeneous clip space; after the divide the frustum is [-1, 1]^3.
    pub fn perspective(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Matrix4<f32> {
        let rl = 1.0 / (right - left);
        let tb = 1.0 / (top - bottom);
        let fn_ = 1.0 / (far - near);

        Matrix4::new(
            2.0 * near * rl, 0.0,             (right + left) * rl,  0.0,
            0.0,             2.0 * near * tb, (top + bottom) * tb,  0.0,
            0.0,             0.0,             -(far + near) * fn_,  -2.0 * far * near * fn_,
            0.0,             0.0,             -1.0,                 0.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs perspective division: Clip Space -> NDC.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Point3<f32> {
    let w = clip.w;
    Point3::new(clip.x / w, clip.y / w, clip.z / w)
}

/// Applies a homogeneous transform to a point and divides by w.
#[inline]
pub fn transform_point(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Point3<f32> {
    apply_perspective_division(&(matrix * point.to_homogeneous()))
}

/// Converts NDC coordinates to integer screen coordinates `(col, row)`.
///
/// Each axis maps as `floor(((c + 1) / 2) * resolution)` clamped to `[0, resolution - 1]`.
/// Row 0 is the bottom of the image (NDC y = -1).
#[inline]
pub fn ndc_to_screen(ndc_x: f32, ndc_y: f32, width: usize, height: usize) -> (usize, usize) {
    (ndc_to_pixel(ndc_x, width), ndc_to_pixel(ndc_y, height))
}

#[inline]
fn ndc_to_pixel(coord: f32, resolution: usize) -> usize {
    let max_index = resolution.saturating_sub(1) as f32;
    let scaled = ((coord + 1.0) * 0.5 * resolution as f32).floor();
    // NaN casts to 0.
    scaled.clamp(0.0, max_index) as usize
}

/// Inverse-transpose of the linear (upper-left 3x3) part of `matrix`.
/// Returns `None` when the linear part is singular.
pub fn normal_matrix(matrix: &Matrix4<f32>) -> Option<Matrix3<f32>> {
    let linear: Matrix3<f32> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    linear.try_inverse().map(|inverse| inverse.transpose())
}
