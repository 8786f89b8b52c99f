use crate::core::pipeline::Interpolatable;
use nalgebra::{Point2, Point3, Vector3};

const EPSILON: f32 = 1e-5;

/// Edge function of the line through `(xi, yi)` and `(xj, yj)` evaluated at `(x, y)`.
///
/// Zero on the line; its sign tells which side `(x, y)` lies on.
#[inline(always)]
pub fn edge_function(x: f32, y: f32, xi: f32, yi: f32, xj: f32, yj: f32) -> f32 {
    (yi - yj) * x + (xj - xi) * y + xi * yj - xj * yi
}

/// Calculates the barycentric coordinates (alpha, beta, gamma) of point p
/// with respect to triangle (a, b, c).
///
/// Each weight is the ratio of the edge function at `p` to the edge function at the
/// opposite vertex. Returns `None` if the triangle is degenerate (area is near zero).
///
/// # Returns
/// A Vector3 where:
/// - x: alpha (weight for a)
/// - y: beta  (weight for b)
/// - z: gamma (weight for c)
pub fn barycentric_coordinates(
    p: Point2<f32>,
    a: Point2<f32>,
    b: Point2<f32>,
    c: Point2<f32>,
) -> Option<Vector3<f32>> {
    let alpha_denom = edge_function(a.x, a.y, b.x, b.y, c.x, c.y);
    let beta_denom = edge_function(b.x, b.y, c.x, c.y, a.x, a.y);
    let gamma_denom = edge_function(c.x, c.y, a.x, a.y, b.x, b.y);

    if alpha_denom.abs() < EPSILON || beta_denom.abs() < EPSILON || gamma_denom.abs() < EPSILON {
        return None; // Degenerate triangle
    }

    let alpha = edge_function(p.x, p.y, b.x, b.y, c.x, c.y) / alpha_denom;
    let beta = edge_function(p.x, p.y, c.x, c.y, a.x, a.y) / beta_denom;
    let gamma = edge_function(p.x, p.y, a.x, a.y, b.x, b.y) / gamma_denom;

    Some(Vector3::new(alpha, beta, gamma))
}

/// Checks if the barycentric coordinates represent a point inside the triangle
/// (edges included): every weight lies in [0, 1].
#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    let in_unit = |w: f32| (-EPSILON..=1.0 + EPSILON).contains(&w);
    in_unit(bary.x) && in_unit(bary.y) && in_unit(bary.z)
}

/// Twice the signed area of the 2D triangle; positive for counter-clockwise winding (y up).
#[inline(always)]
pub fn signed_area_x2(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
    let e1 = b - a;
    let e2 = c - a;
    e1.x * e2.y - e1.y * e2.x
}

/// Linearly combines three per-vertex values with barycentric weights.
#[inline(always)]
pub fn interpolate<T: Interpolatable>(bary: Vector3<f32>, values: &[T; 3]) -> T {
    values[0] * bary.x + values[1] * bary.y + values[2] * bary.z
}

/// Linearly combines three points with barycentric weights.
#[inline(always)]
pub fn interpolate_point(bary: Vector3<f32>, points: &[Point3<f32>; 3]) -> Point3<f32> {
    Point3::from(points[0].coords * bary.x + points[1].coords * bary.y + points[2].coords * bary.z)
}

/// True when the point lies in the canonical view cube [-1, 1]^3.
#[inline(always)]
pub fn in_ndc_cube(p: &Point3<f32>) -> bool {
    let in_range = |c: f32| (-1.0..=1.0).contains(&c);
    in_range(p.x) && in_range(p.y) && in_range(p.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_edge_function_sign() {
        // Line from (0,0) to (1,0); a point above is on the positive side.
        assert!(edge_function(0.5, 1.0, 0.0, 0.0, 1.0, 0.0) > 0.0);
        assert!(edge_function(0.5, -1.0, 0.0, 0.0, 1.0, 0.0) < 0.0);
        assert_eq!(edge_function(0.5, 0.0, 0.0, 0.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        let c = Point2::new(0.0, 10.0);
        assert_relative_eq!(
            barycentric_coordinates(a, a, b, c).unwrap(),
            Vector3::new(1.0, 0.0, 0.0)
        );
        assert_relative_eq!(
            barycentric_coordinates(b, a, b, c).unwrap(),
            Vector3::new(0.0, 1.0, 0.0)
        );
        assert_relative_eq!(
            barycentric_coordinates(c, a, b, c).unwrap(),
            Vector3::new(0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn test_barycentric_partition_of_unity() {
        let a = Point2::new(3.0, 1.0);
        let b = Point2::new(17.0, 4.0);
        let c = Point2::new(8.0, 15.0);
        for y in 0..20 {
            for x in 0..20 {
                let bary =
                    barycentric_coordinates(Point2::new(x as f32, y as f32), a, b, c).unwrap();
                assert_relative_eq!(bary.x + bary.y + bary.z, 1.0, epsilon = 1e-5);
                if is_inside_triangle(bary) {
                    for w in [bary.x, bary.y, bary.z] {
                        assert!((-1e-5..=1.0 + 1e-5).contains(&w));
                    }
                }
            }
        }
        // The centroid is inside with equal weights.
        let centroid = Point2::new(28.0 / 3.0, 20.0 / 3.0);
        let bary = barycentric_coordinates(centroid, a, b, c).unwrap();
        assert!(is_inside_triangle(bary));
        assert_relative_eq!(bary, Vector3::repeat(1.0 / 3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_triangle_has_no_barycentrics() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 1.0);
        let c = Point2::new(2.0, 2.0);
        assert!(barycentric_coordinates(Point2::new(1.0, 1.0), a, b, c).is_none());
    }

    #[test]
    fn test_outside_point_rejected() {
        let bary = barycentric_coordinates(
            Point2::new(9.0, 9.0),
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
        )
        .unwrap();
        assert!(!is_inside_triangle(bary));
    }

    #[test]
    fn test_signed_area_orientation() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert!(signed_area_x2(a, b, c) > 0.0);
        assert!(signed_area_x2(a, c, b) < 0.0);
    }

    #[test]
    fn test_ndc_cube() {
        assert!(in_ndc_cube(&Point3::new(1.0, -1.0, 0.0)));
        assert!(!in_ndc_cube(&Point3::new(0.0, 0.0, 1.01)));
        assert!(!in_ndc_cube(&Point3::new(f32::NAN, 0.0, 0.0)));
    }
}
