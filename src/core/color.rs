use nalgebra::Vector3;

/// Clamps every channel of a linear color to [0, 1].
#[inline]
pub fn clamp_color(color: Vector3<f32>) -> Vector3<f32> {
    color.map(|c| c.clamp(0.0, 1.0))
}

/// Converts a [0, 1] color to 8-bit channels (`255 * c`, truncated).
#[inline]
pub fn to_rgb8(color: Vector3<f32>) -> [u8; 3] {
    let c = clamp_color(color);
    [
        (c.x * 255.0) as u8,
        (c.y * 255.0) as u8,
        (c.z * 255.0) as u8,
    ]
}

/// Converts 8-bit channels to a linear [0, 1] color.
#[inline]
pub fn from_rgb8(rgb: [u8; 3]) -> Vector3<f32> {
    Vector3::new(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32) / 255.0
}
