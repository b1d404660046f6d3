//! 2D vector and matrix helpers for collision response
//!
//! Thin layer over `glam` so the resolver can talk about bases explicitly:
//! a basis matrix has the collision normal and tangent as its columns, so
//! `basis * components` gives world space and `inverse(basis) * world` gives
//! (normal, tangent) components.

use glam::{Mat2, Vec2};

/// 90 degree counter-clockwise rotation: (x, y) -> (-y, x)
pub const ROTATE_90_CCW: Mat2 = Mat2::from_cols(Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0));

/// Unit vector in the direction of `v`, or zero when `v` is zero
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Apply a 2x2 linear map to a vector
#[inline]
pub fn matrix_multiply(v: Vec2, m: Mat2) -> Vec2 {
    m * v
}

/// Matrix whose columns are `norm` and `tan`
#[inline]
pub fn basis_matrix(norm: Vec2, tan: Vec2) -> Mat2 {
    Mat2::from_cols(norm, tan)
}

/// Inverse of a 2x2 matrix, `None` when the determinant is exactly zero
pub fn inverse(m: Mat2) -> Option<Mat2> {
    let det = m.determinant();
    if det == 0.0 {
        return None;
    }
    Some(m.inverse())
}
