//! 3x3 rotation matrix utilities
//!
//! Module orientations are stored as plain column-major 3x3 arrays.
//! Lattice rotations (90°, 180°, 120° about the cube or RD symmetry axes)
//! only ever produce entries of -1, 0 and 1, which [`snap`] exploits to keep
//! committed orientations free of accumulated floating-point drift.

use crate::Vec3;

/// 3x3 matrix type (column-major: `m[col][row]`)
pub type Mat3 = [[f32; 3]; 3];

/// Identity matrix
pub const IDENTITY: Mat3 = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

/// Rotation of `angle` radians about `axis` (right-hand rule)
///
/// The axis is normalized first. A zero axis yields the identity, so a
/// degenerate pivot never scales or collapses the module.
pub fn rotation_axis(axis: Vec3, angle: f32) -> Mat3 {
    let k = axis.normalized();
    if k == Vec3::ZERO {
        return IDENTITY;
    }

    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    let (x, y, z) = (k.x, k.y, k.z);

    [
        [t * x * x + c,     t * x * y + s * z, t * x * z - s * y],
        [t * x * y - s * z, t * y * y + c,     t * y * z + s * x],
        [t * x * z + s * y, t * y * z - s * x, t * z * z + c],
    ]
}

/// Multiply two 3x3 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat3, b: Mat3) -> Mat3 {
    let mut result = [[0.0f32; 3]; 3];

    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Transform a Vec3 by a 3x3 matrix: result = M * v
pub fn transform(m: Mat3, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
        m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
        m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
    )
}

/// Transpose a matrix (the inverse, for rotations)
pub fn transpose(m: Mat3) -> Mat3 {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Replace entries within `epsilon` of -1, 0 or 1 with that exact value
///
/// Entries further away are left untouched.
pub fn snap(m: Mat3, epsilon: f32) -> Mat3 {
    let mut result = m;
    for col in result.iter_mut() {
        for value in col.iter_mut() {
            let nearest = value.round();
            if nearest.abs() <= 1.0 && (*value - nearest).abs() <= epsilon {
                *value = nearest;
            }
        }
    }
    result
}

/// Check that every entry is within `epsilon` of the corresponding entry of `b`
pub fn approx_eq(a: Mat3, b: Mat3, epsilon: f32) -> bool {
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .all(|(x, y)| (x - y).abs() <= epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_rotation_z_quarter_turn() {
        let m = rotation_axis(Vec3::Z, FRAC_PI_2);
        assert!(transform(m, Vec3::X).approx_eq(Vec3::Y, EPSILON));
        assert!(transform(m, Vec3::Y).approx_eq(-Vec3::X, EPSILON));
        assert!(transform(m, Vec3::Z).approx_eq(Vec3::Z, EPSILON));
    }

    #[test]
    fn test_rotation_about_negative_axis_is_clockwise() {
        let m = rotation_axis(-Vec3::Z, FRAC_PI_2);
        assert!(transform(m, Vec3::X).approx_eq(-Vec3::Y, EPSILON));
    }

    #[test]
    fn test_rotation_body_diagonal_permutes_axes() {
        // 120° about (1,1,1) cycles x -> y -> z
        let m = rotation_axis(Vec3::ONE, 2.0 * PI / 3.0);
        assert!(transform(m, Vec3::X).approx_eq(Vec3::Y, EPSILON));
        assert!(transform(m, Vec3::Y).approx_eq(Vec3::Z, EPSILON));
        assert!(transform(m, Vec3::Z).approx_eq(Vec3::X, EPSILON));
    }

    #[test]
    fn test_zero_axis_is_identity() {
        assert_eq!(rotation_axis(Vec3::ZERO, 1.0), IDENTITY);
    }

    #[test]
    fn test_mul_inverse_is_identity() {
        let m = rotation_axis(Vec3::new(1.0, -1.0, 0.0), 1.1);
        assert!(approx_eq(mul(transpose(m), m), IDENTITY, EPSILON));
        let back = rotation_axis(Vec3::new(-1.0, 1.0, 0.0), 1.1);
        assert!(approx_eq(mul(back, m), IDENTITY, EPSILON));
    }

    #[test]
    fn test_mul_order_applies_right_first() {
        let rx = rotation_axis(Vec3::X, FRAC_PI_2);
        let rz = rotation_axis(Vec3::Z, FRAC_PI_2);
        // rz * rx: rotate about x first (Y -> Z), then z leaves Z alone
        let composed = mul(rz, rx);
        assert!(transform(composed, Vec3::Y).approx_eq(Vec3::Z, EPSILON));
    }

    #[test]
    fn test_snap_cleans_lattice_rotation() {
        let m = rotation_axis(Vec3::Z, PI);
        let snapped = snap(m, EPSILON);
        assert_eq!(snapped, [[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_snap_leaves_general_entries() {
        let m = rotation_axis(Vec3::Z, 0.3);
        let snapped = snap(m, EPSILON);
        assert_eq!(snapped[0][0], m[0][0]);
        assert_eq!(snapped[0][1], m[0][1]);
        assert_eq!(snapped[2][2], 1.0);
    }
}
