/// 4x4 homogeneous transform matrices
use nalgebra::{Matrix4, Vector3};

use crate::geometry::Point;

/// Row-major 4x4 homogeneous matrix; translation lives in the last column
/// of the first three rows.
pub type Mat4 = Matrix4<f64>;

/// The 4x4 identity matrix.
pub fn identity() -> Mat4 {
    Mat4::identity()
}

/// Rotation about the X axis by the given degrees.
pub fn rotate_x(degrees: f64) -> Mat4 {
    Mat4::new_rotation(Vector3::new(degrees.to_radians(), 0.0, 0.0))
}

/// Rotation about the Y axis by the given degrees.
pub fn rotate_y(degrees: f64) -> Mat4 {
    Mat4::new_rotation(Vector3::new(0.0, degrees.to_radians(), 0.0))
}

/// Rotation about the Z axis by the given degrees.
pub fn rotate_z(degrees: f64) -> Mat4 {
    Mat4::new_rotation(Vector3::new(0.0, 0.0, degrees.to_radians()))
}

/// Non-uniform scale. Zero or negative factors are accepted and collapse
/// or mirror geometry; callers get exactly what they ask for.
pub fn scale(sx: f64, sy: f64, sz: f64) -> Mat4 {
    Mat4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
}

/// Translation by the given X, Y, and Z offsets.
pub fn translate(tx: f64, ty: f64, tz: f64) -> Mat4 {
    Mat4::new_translation(&Vector3::new(tx, ty, tz))
}

/// Composes two matrices, applying `a` after `b` (result = a * b).
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    a * b
}

/// Transforms a point's coordinates using the upper 3x4 block of `m`.
/// The bottom row is never read; label fields pass through unchanged.
pub fn apply(m: &Mat4, p: &Point) -> Point {
    Point {
        x: m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)] * p.z + m[(0, 3)],
        y: m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)] * p.z + m[(1, 3)],
        z: m[(2, 0)] * p.x + m[(2, 1)] * p.y + m[(2, 2)] * p.z + m[(2, 3)],
        label: p.label.clone(),
        align: p.align,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LabelAlign;
    use approx::{assert_relative_eq, relative_eq};

    #[test]
    fn multiply_identity_laws() {
        let m = multiply(&rotate_y(30.0), &translate(1.0, -2.0, 3.0));
        assert!(relative_eq!(multiply(&identity(), &m), m, epsilon = 1e-12));
        assert!(relative_eq!(multiply(&m, &identity()), m, epsilon = 1e-12));
    }

    #[test]
    fn apply_identity_is_noop() {
        let p = Point::new(1.5, -2.25, 0.75);
        let q = apply(&identity(), &p);
        assert_eq!(q.x, p.x);
        assert_eq!(q.y, p.y);
        assert_eq!(q.z, p.z);
    }

    #[test]
    fn split_rotation_composes_back() {
        // n per-step rotations of theta/n must reproduce one rotation of theta.
        let theta = 25.0;
        let steps = 12;
        let axes: [fn(f64) -> Mat4; 3] = [rotate_x, rotate_y, rotate_z];
        for rotation in axes {
            let full = rotation(theta);
            let step = rotation(theta / steps as f64);
            let mut composed = identity();
            for _ in 0..steps {
                composed = multiply(&step, &composed);
            }
            assert!(relative_eq!(composed, full, max_relative = 1e-9));
        }
    }

    #[test]
    fn split_translation_sums_exactly() {
        let (tx, ty, tz) = (3.0, -1.5, 0.25);
        let steps = 8;
        let step = translate(tx / steps as f64, ty / steps as f64, tz / steps as f64);
        let mut p = Point::new(0.0, 0.0, 0.0);
        for _ in 0..steps {
            p = apply(&step, &p);
        }
        assert_relative_eq!(p.x, tx, epsilon = 1e-12);
        assert_relative_eq!(p.y, ty, epsilon = 1e-12);
        assert_relative_eq!(p.z, tz, epsilon = 1e-12);
    }

    #[test]
    fn rotate_y_sign_convention() {
        // +25 degrees about Y carries (1,0,0) toward negative Z.
        let p = apply(&rotate_y(25.0), &Point::new(1.0, 0.0, 0.0));
        let rad = 25.0_f64.to_radians();
        assert_relative_eq!(p.x, rad.cos(), epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, -rad.sin(), epsilon = 1e-12);
    }

    #[test]
    fn degenerate_scale_collapses() {
        let p = apply(&scale(0.0, 1.0, -2.0), &Point::new(4.0, 5.0, 6.0));
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 5.0);
        assert_eq!(p.z, -12.0);
    }

    #[test]
    fn labels_pass_through() {
        let p = Point::labeled(1.0, 2.0, 3.0, "X", LabelAlign::Center);
        let q = apply(&rotate_z(90.0), &p);
        assert_eq!(q.label.as_deref(), Some("X"));
        assert_eq!(q.align, LabelAlign::Center);
    }
}
