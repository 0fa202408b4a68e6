//! Inertialization of vectors and rotations.
//!
//! Every function here takes the two most recent blended samples `prev` and `curr`
//! (taken `dt` seconds apart), the live `target`,
//! the remaining window length `tf` and the time `t` to sample at,
//! and returns the blended value.
//!
//! *Magnitude* variants decay the distance to the target along one direction
//! (or the angle to the target about one axis),
//! which keeps the motion on a straight line / a single rotation axis.
//! *Direct* variants decay every component separately,
//! which is cheaper but can drift off the straight path.

use super::interpolation::{inertialize, inertialize_from_samples};
use crate::math::{self as m, Rotor3, Vec3};

/// Decay the distance from `target` along the direction of the current offset.
pub fn inertialize_magnitude_vec3(
    prev: Vec3,
    curr: Vec3,
    target: Vec3,
    dt: f32,
    tf: f32,
    t: f32,
) -> Vec3 {
    let vx0 = curr - target;
    let vxn1 = prev - target;

    let x0 = vx0.mag();
    // if we're already on the target, keep the direction we were coming from
    let dir = if x0 > m::DIRECTION_EPSILON {
        vx0 / x0
    } else {
        m::direction_or(vxn1, Vec3::unit_x())
    };

    let xn1 = vxn1.dot(dir);
    let v0 = (x0 - xn1) / dt;

    let xt = inertialize(x0, v0, dt, tf, t);
    target + dir * xt
}

/// Decay each coordinate separately.
pub fn inertialize_direct_vec3(
    prev: Vec3,
    curr: Vec3,
    target: Vec3,
    dt: f32,
    tf: f32,
    t: f32,
) -> Vec3 {
    target
        + Vec3::new(
            inertialize_from_samples(prev.x, curr.x, target.x, dt, tf, t),
            inertialize_from_samples(prev.y, curr.y, target.y, dt, tf, t),
            inertialize_from_samples(prev.z, curr.z, target.z, dt, tf, t),
        )
}

/// Decay the angle between the current rotation and `target`
/// about the axis of the rotation separating them.
pub fn inertialize_magnitude_rotor3(
    prev: Rotor3,
    curr: Rotor3,
    target: Rotor3,
    dt: f32,
    tf: f32,
    t: f32,
) -> Rotor3 {
    let prev = m::quat_or_identity(m::rotor_to_quat(prev));
    let curr = m::quat_or_identity(m::rotor_to_quat(curr));
    let target = m::quat_or_identity(m::rotor_to_quat(target));

    let target_inv = m::quat_inverse(target);
    // keep both offsets on the short way around so angles stay in [0, π]
    let q0 = m::sync_side(m::quat_mul(curr, target_inv).normalized(), m::quat_identity());
    let qn1 = m::sync_side(m::quat_mul(prev, target_inv).normalized(), m::quat_identity());

    let (axis, x0) = m::quat_to_axis_angle(q0);
    // near the identity the axis comes back unnormalized (or zero);
    // like the vector case, fall back to the direction we were coming from
    let axis = m::direction_or(axis, m::direction_or(m::quat_vector(qn1), Vec3::unit_x()));

    let xn1 = 2.0 * m::quat_vector(qn1).dot(axis).atan2(qn1.w);
    let v0 = (x0 - xn1) / dt;

    let xt = inertialize(x0, v0, dt, tf, t);
    let qt = m::quat_mul(m::quat_from_axis_angle(axis, xt), target);
    m::quat_to_rotor(qt.normalized())
}

/// Decay each quaternion component separately and renormalize.
pub fn inertialize_direct_rotor3(
    prev: Rotor3,
    curr: Rotor3,
    target: Rotor3,
    dt: f32,
    tf: f32,
    t: f32,
) -> Rotor3 {
    let target = m::rotor_to_quat(target);
    let prev = m::sync_side(m::rotor_to_quat(prev), target);
    let curr = m::sync_side(m::rotor_to_quat(curr), target);

    let offset = m::Quat::new(
        inertialize_from_samples(prev.x, curr.x, target.x, dt, tf, t),
        inertialize_from_samples(prev.y, curr.y, target.y, dt, tf, t),
        inertialize_from_samples(prev.z, curr.z, target.z, dt, tf, t),
        inertialize_from_samples(prev.w, curr.w, target.w, dt, tf, t),
    );
    m::quat_to_rotor(m::quat_or_identity(target + offset).normalized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Quat;

    const DT: f32 = 1.0 / 60.0;

    fn rot(axis: Vec3, angle: f32) -> Rotor3 {
        m::quat_to_rotor(m::quat_from_axis_angle(axis, angle))
    }

    /// Angle between two rotations, ignoring representation sign.
    fn angle_between(a: Rotor3, b: Rotor3) -> f32 {
        let d = m::quat_mul(m::rotor_to_quat(a), m::quat_inverse(m::rotor_to_quat(b)));
        2.0 * m::quat_vector(d).mag().atan2(d.w.abs())
    }

    #[test]
    fn vec3_no_offset_returns_target() {
        let target = Vec3::new(0.5, -2.0, 3.0);
        for (tf, t) in [(0.5, DT), (0.2, 0.0), (0.2, 1.0), (1e-4, DT)] {
            assert_eq!(inertialize_magnitude_vec3(target, target, target, DT, tf, t), target);
            assert_eq!(inertialize_direct_vec3(target, target, target, DT, tf, t), target);
        }
    }

    #[test]
    fn vec3_magnitude_stays_on_line() {
        let target = Vec3::new(1.0, 1.0, 0.0);
        let curr = Vec3::new(3.0, 2.0, 0.0);
        let prev = Vec3::new(3.2, 2.1, 0.0);
        let dir = (curr - target).normalized();
        for i in 0..10 {
            let p = inertialize_magnitude_vec3(prev, curr, target, DT, 0.5, i as f32 * 0.05);
            let off = p - target;
            // parallel to the initial offset
            let perp = off - dir * off.dot(dir);
            assert!(perp.mag() < 1e-5);
            assert!(off.dot(dir) >= -1e-5);
        }
    }

    #[test]
    fn vec3_sample_at_start_is_current() {
        let target = Vec3::new(0.0, 0.0, 1.0);
        let curr = Vec3::new(1.0, 0.0, 0.0);
        let prev = Vec3::new(0.9, 0.1, 0.0);
        let p = inertialize_magnitude_vec3(prev, curr, target, DT, 0.3, 0.0);
        assert!((p - curr).mag() < 1e-5);
        let p = inertialize_direct_vec3(prev, curr, target, DT, 0.3, 0.0);
        assert!((p - curr).mag() < 1e-5);
    }

    #[test]
    fn vec3_reaches_target_at_window_end() {
        let target = Vec3::new(1.0, 2.0, 3.0);
        let curr = Vec3::zero();
        let prev = Vec3::new(-0.1, 0.0, 0.0);
        let p = inertialize_magnitude_vec3(prev, curr, target, DT, 0.3, 0.3);
        assert!((p - target).mag() < 1e-4);
        let p = inertialize_direct_vec3(prev, curr, target, DT, 0.3, 0.3);
        assert!((p - target).mag() < 1e-4);
    }

    #[test]
    fn vec3_degenerate_direction_is_finite() {
        let target = Vec3::new(1.0, 1.0, 1.0);
        // on target now but moving: uses the previous direction
        let p = inertialize_magnitude_vec3(Vec3::new(1.0, 1.5, 1.0), target, target, DT, 0.5, DT);
        assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
        assert!((p.x - 1.0).abs() < 1e-6 && (p.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotor3_no_offset_returns_target() {
        let target = rot(Vec3::new(0.2, 1.0, -0.3), 0.8);
        for (tf, t) in [(0.5, DT), (0.2, 0.0), (0.2, 1.0)] {
            let r = inertialize_magnitude_rotor3(target, target, target, DT, tf, t);
            assert!(angle_between(r, target) < 1e-3);
            let r = inertialize_direct_rotor3(target, target, target, DT, tf, t);
            assert!(angle_between(r, target) < 1e-3);
        }
    }

    #[test]
    fn rotor3_magnitude_decays_about_one_axis() {
        let target = rot(Vec3::unit_y(), 0.3);
        let curr = rot(Vec3::unit_y(), 1.3);
        let prev = rot(Vec3::unit_y(), 1.35);
        let tf = 0.5;
        let mut last = angle_between(curr, target);
        assert!((last - 1.0).abs() < 1e-3);
        for i in 1..=10 {
            let r = inertialize_magnitude_rotor3(prev, curr, target, DT, tf, tf * i as f32 / 10.0);
            let angle = angle_between(r, target);
            assert!(angle <= last + 1e-4);
            // rotating about y only
            let q = m::rotor_to_quat(r);
            assert!(q.x.abs() < 1e-4 && q.z.abs() < 1e-4);
            last = angle;
        }
        assert!(last < 1e-3);
    }

    #[test]
    fn rotor3_magnitude_sample_at_start_is_current() {
        let target = rot(Vec3::unit_x(), -0.2);
        let curr = rot(Vec3::new(0.0, 1.0, 1.0), 0.9);
        let prev = rot(Vec3::new(0.0, 1.0, 1.0), 0.85);
        let r = inertialize_magnitude_rotor3(prev, curr, target, DT, 0.4, 0.0);
        assert!(angle_between(r, curr) < 1e-3);
    }

    #[test]
    fn rotor3_degenerate_inputs_are_identity() {
        let zero = m::quat_to_rotor(Quat::zero());
        let r = inertialize_magnitude_rotor3(zero, zero, zero, DT, 0.5, DT);
        assert!(angle_between(r, Rotor3::identity()) < 1e-4);
    }

    #[test]
    fn rotor3_direct_ignores_representation_sign() {
        let target = rot(Vec3::unit_z(), 0.4);
        let curr = rot(Vec3::new(1.0, 0.0, 1.0), 1.1);
        let prev = rot(Vec3::new(1.0, 0.0, 1.0), 1.0);
        let flipped = m::quat_to_rotor(-m::rotor_to_quat(curr));

        let a = m::rotor_to_quat(inertialize_direct_rotor3(prev, curr, target, DT, 0.5, DT));
        let b = m::rotor_to_quat(inertialize_direct_rotor3(prev, flipped, target, DT, 0.5, DT));
        assert!((a - b).mag() < 1e-6);
    }

    #[test]
    fn rotor3_magnitude_ignores_representation_sign() {
        let target = rot(Vec3::unit_z(), 0.4);
        let curr = rot(Vec3::new(1.0, 0.0, 1.0), 1.1);
        let prev = rot(Vec3::new(1.0, 0.0, 1.0), 1.0);
        let flipped = m::quat_to_rotor(-m::rotor_to_quat(curr));

        let a = inertialize_magnitude_rotor3(prev, curr, target, DT, 0.5, DT);
        let b = inertialize_magnitude_rotor3(prev, flipped, target, DT, 0.5, DT);
        assert!(angle_between(a, b) < 1e-4);
    }
}
