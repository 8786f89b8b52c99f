use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{
    barycentric_coordinates, in_ndc_cube, interpolate, interpolate_point, is_inside_triangle,
    signed_area_x2,
};
use crate::core::math::transform::ndc_to_screen;
use crate::core::pipeline::Interpolatable;
use crate::error::RenderError;
use nalgebra::{Point2, Point3, Vector3};
use rayon::prelude::*;

/// The Rasterizer is responsible for drawing geometric primitives onto the FrameBuffer.
pub struct Rasterizer {
    pub cull_mode: CullMode,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum CullMode {
    /// Drop triangles that are clockwise on screen.
    #[default]
    Back,
    Front,
    None,
}

impl std::str::FromStr for CullMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "back" => Ok(Self::Back),
            "front" => Ok(Self::Front),
            "none" => Ok(Self::None),
            other => Err(RenderError::UnknownCullMode(other.to_string())),
        }
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
        }
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    /// Draws a line between two screen pixels `(col, row)` with Bresenham's algorithm.
    pub fn draw_line(
        &self,
        framebuffer: &FrameBuffer,
        start: (usize, usize),
        end: (usize, usize),
        color: Vector3<f32>,
    ) {
        for (col, row) in bresenham_line(
            start.0 as i64,
            start.1 as i64,
            end.0 as i64,
            end.1 as i64,
        ) {
            if col >= 0 && row >= 0 {
                framebuffer.set_pixel(col as usize, row as usize, color);
            }
        }
    }

    /// Draws the three edges of an NDC-space triangle. No culling, no depth test.
    pub fn draw_wireframe(
        &self,
        framebuffer: &FrameBuffer,
        ndc: &[Point3<f32>; 3],
        color: Vector3<f32>,
    ) {
        let screen = ndc.map(|p| ndc_to_screen(p.x, p.y, framebuffer.width, framebuffer.height));
        self.draw_line(framebuffer, screen[0], screen[1], color);
        self.draw_line(framebuffer, screen[1], screen[2], color);
        self.draw_line(framebuffer, screen[2], screen[0], color);
    }

    /// Scan-converts one NDC-space triangle with a depth test.
    ///
    /// Pixels in the screen bounding box are tested against the barycentric weights of
    /// the triangle; accepted pixels interpolate NDC position (clipped to the view cube)
    /// and the varyings, and `fragment` turns the interpolated varying into a color.
    /// A pixel is only written when the fragment is strictly closer than what is stored.
    ///
    /// Returns the number of pixels written.
    pub fn rasterize_triangle<V, F>(
        &self,
        framebuffer: &FrameBuffer,
        ndc: &[Point3<f32>; 3],
        varyings: &[V; 3],
        fragment: F,
    ) -> usize
    where
        V: Interpolatable,
        F: Fn(V) -> Vector3<f32> + Sync,
    {
        // 1. Viewport Transform
        let pixels = ndc.map(|p| ndc_to_screen(p.x, p.y, framebuffer.width, framebuffer.height));
        let screen = pixels.map(|(col, row)| Point2::new(col as f32, row as f32));

        // 2. Backface Culling
        let signed_area = signed_area_x2(screen[0], screen[1], screen[2]);
        match self.cull_mode {
            CullMode::Back if signed_area < 0.0 => return 0,
            CullMode::Front if signed_area > 0.0 => return 0,
            _ => {}
        }

        // Zero-area triangles cover nothing.
        if barycentric_coordinates(screen[0], screen[0], screen[1], screen[2]).is_none() {
            return 0;
        }

        // 3. Compute Bounding Box (already clamped to the framebuffer by the viewport map)
        let (min_col, min_row, max_col, max_row) = compute_bounding_box(&pixels);

        // 4. Pixel Loop
        // Rows of one triangle never alias, so they can be shaded in parallel.
        (min_row..=max_row)
            .into_par_iter()
            .map(|row| {
                let mut written = 0;
                for col in min_col..=max_col {
                    let p = Point2::new(col as f32, row as f32);
                    let Some(bary) = barycentric_coordinates(p, screen[0], screen[1], screen[2])
                    else {
                        continue;
                    };
                    if !is_inside_triangle(bary) {
                        continue;
                    }

                    let ndc_point = interpolate_point(bary, ndc);
                    if !in_ndc_cube(&ndc_point) {
                        continue;
                    }

                    // Early reject before paying for the fragment.
                    match framebuffer.depth_at(col, row) {
                        Some(stored) if ndc_point.z < stored => {}
                        _ => continue,
                    }

                    let color = fragment(interpolate(bary, varyings));
                    if framebuffer.depth_test_and_set(col, row, ndc_point.z, color) {
                        written += 1;
                    }
                }
                written
            })
            .sum()
    }
}

/// Pixels visited by Bresenham's line algorithm from `(x0, y0)` to `(x1, y1)`, both ends included.
///
/// The line is first reduced to a slope in [0, 1] by swapping the axes when
/// |dy| > |dx| and the endpoints when the major axis runs backwards. The integer
/// error grows by `2 * |d_minor|` per step; once it reaches `d_major`, the minor
/// coordinate advances and the error drops by `2 * d_major`.
pub fn bresenham_line(x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<(i64, i64)> {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (mut major0, mut minor0, mut major1, mut minor1) = if steep {
        (y0, x0, y1, x1)
    } else {
        (x0, y0, x1, y1)
    };
    if major0 > major1 {
        std::mem::swap(&mut major0, &mut major1);
        std::mem::swap(&mut minor0, &mut minor1);
    }

    let plot = |major: i64, minor: i64| if steep { (minor, major) } else { (major, minor) };
    let d_major = major1 - major0;
    let d_minor = (minor1 - minor0).abs();
    let minor_step = if minor1 >= minor0 { 1 } else { -1 };

    if d_major == 0 {
        return (minor0.min(minor1)..=minor0.max(minor1))
            .map(|minor| plot(major0, minor))
            .collect();
    }

    let mut pixels = Vec::with_capacity(d_major as usize + 1);
    let mut error = 0;
    let mut minor = minor0;
    for major in major0..=major1 {
        pixels.push(plot(major, minor));
        error += 2 * d_minor;
        if error >= d_major {
            minor += minor_step;
            error -= 2 * d_major;
        }
    }
    pixels
}

fn compute_bounding_box(points: &[(usize, usize); 3]) -> (usize, usize, usize, usize) {
    let min_col = points[0].0.min(points[1].0).min(points[2].0);
    let min_row = points[0].1.min(points[1].1).min(points[2].1);
    let max_col = points[0].0.max(points[1].0).max(points[2].0);
    let max_row = points[0].1.max(points[1].1).max(points[2].1);
    (min_col, min_row, max_col, max_row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const RED: Vector3<f32> = Vector3::new(1.0, 0.0, 0.0);
    const BLUE: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

    /// Counter-clockwise triangle covering the center of the screen at depth `z`.
    fn ccw_triangle(z: f32) -> [Point3<f32>; 3] {
        [
            Point3::new(-0.5, -0.5, z),
            Point3::new(0.5, -0.5, z),
            Point3::new(0.0, 0.5, z),
        ]
    }

    fn flat(color: Vector3<f32>) -> [Vector3<f32>; 3] {
        [color; 3]
    }

    #[test]
    fn test_bresenham_shallow_line() {
        assert_eq!(
            bresenham_line(0, 0, 4, 2),
            vec![(0, 0), (1, 1), (2, 1), (3, 2), (4, 2)]
        );
        // Same pixels when drawn backwards.
        let forward: HashSet<_> = bresenham_line(0, 0, 4, 2).into_iter().collect();
        let backward: HashSet<_> = bresenham_line(4, 2, 0, 0).into_iter().collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_bresenham_horizontal_vertical_diagonal() {
        assert_eq!(
            bresenham_line(1, 3, 5, 3),
            vec![(1, 3), (2, 3), (3, 3), (4, 3), (5, 3)]
        );
        assert_eq!(bresenham_line(2, 0, 2, 3), vec![(2, 0), (2, 1), (2, 2), (2, 3)]);
        assert_eq!(
            bresenham_line(0, 0, 3, 3),
            vec![(0, 0), (1, 1), (2, 2), (3, 3)]
        );
        assert_eq!(
            bresenham_line(0, 3, 3, 0),
            vec![(0, 3), (1, 2), (2, 1), (3, 0)]
        );
    }

    #[test]
    fn test_bresenham_steep_and_negative_slopes() {
        assert_eq!(
            bresenham_line(0, 0, 2, 4),
            vec![(0, 0), (1, 1), (1, 2), (2, 3), (2, 4)]
        );
        // The first minor step happens at error == d_major. A strict threshold would
        // keep (1, 2) instead of (1, 1).
        assert_eq!(
            bresenham_line(0, 2, 4, 0),
            vec![(0, 2), (1, 1), (2, 1), (3, 0), (4, 0)]
        );
        let falling: HashSet<_> = bresenham_line(0, 2, 4, 0).into_iter().collect();
        let mirrored: HashSet<_> = bresenham_line(0, 0, 4, 2)
            .into_iter()
            .map(|(x, y)| (x, 2 - y))
            .collect();
        assert_eq!(falling, mirrored);
    }

    #[test]
    fn test_bresenham_single_point() {
        assert_eq!(bresenham_line(7, 7, 7, 7), vec![(7, 7)]);
    }

    #[test]
    fn test_wireframe_marks_edges_only() {
        let fb = FrameBuffer::new(10, 10);
        let rasterizer = Rasterizer::new();
        // Screen vertices (0,0), (8,0), (0,8).
        let tri = [
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(0.625, -1.0, 0.0),
            Point3::new(-1.0, 0.625, 0.0),
        ];
        rasterizer.draw_wireframe(&fb, &tri, RED);
        for i in 0..=8 {
            assert_eq!(fb.get_pixel(i, 0), Some(RED));
            assert_eq!(fb.get_pixel(0, i), Some(RED));
            assert_eq!(fb.get_pixel(i, 8 - i), Some(RED));
        }
        assert_eq!(fb.get_pixel(2, 2), Some(Vector3::zeros()));
        assert_eq!(fb.get_pixel(9, 9), Some(Vector3::zeros()));
    }

    #[test]
    fn test_filled_triangle_writes_pixels() {
        let fb = FrameBuffer::new(20, 20);
        let written =
            Rasterizer::new().rasterize_triangle(&fb, &ccw_triangle(0.0), &flat(RED), |c| c);
        assert!(written > 0);
        assert_eq!(fb.get_pixel(10, 8), Some(RED));
        assert_eq!(fb.depth_at(10, 8), Some(0.0));
        assert_eq!(fb.get_pixel(0, 19), Some(Vector3::zeros()));
    }

    #[test]
    fn test_clockwise_triangle_is_culled() {
        let fb = FrameBuffer::new(20, 20);
        let [a, b, c] = ccw_triangle(0.0);
        let written = Rasterizer::new().rasterize_triangle(&fb, &[a, c, b], &flat(RED), |c| c);
        assert_eq!(written, 0);
        for row in 0..20 {
            for col in 0..20 {
                assert_eq!(fb.get_pixel(col, row), Some(Vector3::zeros()));
            }
        }

        let mut no_cull = Rasterizer::new();
        no_cull.set_cull_mode(CullMode::None);
        assert!(no_cull.rasterize_triangle(&fb, &[a, c, b], &flat(RED), |c| c) > 0);
    }

    #[test]
    fn test_nearer_triangle_wins_regardless_of_order() {
        let rasterizer = Rasterizer::new();
        for near_first in [true, false] {
            let fb = FrameBuffer::new(20, 20);
            let near = (ccw_triangle(-0.5), RED);
            let far = (ccw_triangle(0.5), BLUE);
            let order = if near_first { [near, far] } else { [far, near] };
            for (tri, color) in order {
                rasterizer.rasterize_triangle(&fb, &tri, &flat(color), |c| c);
            }
            assert_eq!(fb.get_pixel(10, 8), Some(RED));
            assert_eq!(fb.depth_at(10, 8), Some(-0.5));
        }
    }

    #[test]
    fn test_equal_depth_keeps_first_writer() {
        let fb = FrameBuffer::new(20, 20);
        let rasterizer = Rasterizer::new();
        rasterizer.rasterize_triangle(&fb, &ccw_triangle(0.1), &flat(RED), |c| c);
        let written = rasterizer.rasterize_triangle(&fb, &ccw_triangle(0.1), &flat(BLUE), |c| c);
        assert_eq!(written, 0);
        assert_eq!(fb.get_pixel(10, 8), Some(RED));
    }

    #[test]
    fn test_degenerate_triangle_contributes_nothing() {
        let fb = FrameBuffer::new(20, 20);
        let tri = [
            Point3::new(-0.5, -0.5, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
        ];
        let mut rasterizer = Rasterizer::new();
        rasterizer.set_cull_mode(CullMode::None);
        assert_eq!(rasterizer.rasterize_triangle(&fb, &tri, &flat(RED), |c| c), 0);
    }

    #[test]
    fn test_fragments_outside_view_cube_are_clipped() {
        let fb = FrameBuffer::new(20, 20);
        let rasterizer = Rasterizer::new();
        assert_eq!(
            rasterizer.rasterize_triangle(&fb, &ccw_triangle(1.5), &flat(RED), |c| c),
            0
        );
        // Partially beyond the far plane: only the near part survives.
        let tri = [
            Point3::new(-0.5, -0.5, 0.0),
            Point3::new(0.5, -0.5, 0.0),
            Point3::new(0.0, 0.5, 3.0),
        ];
        let written = rasterizer.rasterize_triangle(&fb, &tri, &flat(RED), |c| c);
        assert!(written > 0);
        assert_eq!(fb.get_pixel(10, 5), Some(RED));
        assert_eq!(fb.get_pixel(10, 14), Some(Vector3::zeros()));
    }

    #[test]
    fn test_gouraud_colors_interpolate() {
        let fb = FrameBuffer::new(20, 20);
        let colors = [RED, Vector3::new(0.0, 1.0, 0.0), BLUE];
        Rasterizer::new().rasterize_triangle(&fb, &ccw_triangle(0.0), &colors, |c| c);
        let c = fb.get_pixel(10, 8).unwrap();
        assert!(c.x > 0.0 && c.y > 0.0 && c.z > 0.0);
        approx::assert_relative_eq!(c.x + c.y + c.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_cull_mode_from_str() {
        assert_eq!("back".parse::<CullMode>().unwrap(), CullMode::Back);
        assert_eq!("none".parse::<CullMode>().unwrap(), CullMode::None);
        assert!("both".parse::<CullMode>().is_err());
    }
}
