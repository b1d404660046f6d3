//! Collision detection and elastic response
//!
//! Detection is a plain circle-circle overlap test over every pair; there is
//! no spatial partitioning. Response treats the impact as a 1D elastic
//! collision along the line of centers, worked out in a rotated
//! (normal, tangent) basis so tangential motion passes through untouched.

use glam::Vec2;

use super::body::{Circle, Motion};
use crate::math::{ROTATE_90_CCW, basis_matrix, inverse, matrix_multiply, normalize};

/// True if two circles overlap (touching does not count)
#[inline]
pub fn if_collide<A: Circle + ?Sized, B: Circle + ?Sized>(a: &A, b: &B) -> bool {
    let diff = a.pos() - b.pos();
    let r_total = a.radius() + b.radius();
    diff.x * diff.x + diff.y * diff.y < r_total * r_total
}

/// Index pairs `(i, j)` where `left[i]` overlaps `right[j]`, in scan order
pub fn cross_pairs<A: Circle, B: Circle>(left: &[A], right: &[B]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in left.iter().enumerate() {
        for (j, b) in right.iter().enumerate() {
            if if_collide(a, b) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Index pairs `(i, j)` with `i < j` where two bodies of one set overlap
pub fn self_pairs<A: Circle>(bodies: &[A]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            if if_collide(&bodies[i], &bodies[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Resolve a perfectly elastic collision between two bodies in place
///
/// Returns the head-on velocity difference `a.normal - b.normal` measured
/// before the collision (the signed closing speed along the line of
/// centers). Bodies whose squared center distance is at most `epsilon` are
/// left alone and report zero impact; this is the usual case right after a
/// burst of meteors spawns on one point.
pub fn clank(a: &mut Motion, b: &mut Motion, epsilon: f32) -> f32 {
    let delta = a.pos - b.pos;
    if delta.length_squared() <= epsilon {
        return 0.0;
    }
    let norm = normalize(delta);

    let tan = matrix_multiply(norm, ROTATE_90_CCW);
    let basis = basis_matrix(norm, tan);
    let Some(basis_inverse) = inverse(basis) else {
        return 0.0;
    };

    // x is the normal component, y the tangential one
    let mut a_components = matrix_multiply(a.vel, basis_inverse);
    let mut b_components = matrix_multiply(b.vel, basis_inverse);

    let head_on_diff = a_components.x - b_components.x;

    let (a_normal, b_normal) = elastic_1d(a.mass, a_components.x, b.mass, b_components.x);
    a_components.x = a_normal;
    b_components.x = b_normal;

    a.vel = matrix_multiply(a_components, basis);
    b.vel = matrix_multiply(b_components, basis);

    head_on_diff
}

/// Final velocities of a 1D elastic collision
#[inline]
fn elastic_1d(m1: f32, v1: f32, m2: f32, v2: f32) -> (f32, f32) {
    let d = 1.0 / (m1 + m2);
    let v1_new = (m1 - m2) * d * v1 + 2.0 * m2 * d * v2;
    let v2_new = (m2 - m1) * d * v2 + 2.0 * m1 * d * v1;
    (v1_new, v2_new)
}

/// Velocity components of `vel` along `norm` and its CCW tangent
pub fn normal_tangent(vel: Vec2, norm: Vec2) -> Vec2 {
    Vec2::new(vel.dot(norm), vel.dot(matrix_multiply(norm, ROTATE_90_CCW)))
}
