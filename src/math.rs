//! Types, aliases and helper operations for doing math with `ultraviolet`.
//!
//! Joint rotations are stored as [`Rotor3`]s like everywhere else in the crate,
//! but the blending code needs a few quaternion-form operations
//! (Hamilton product, axis-angle conversion, hemisphere checks)
//! that are easier to state on plain `[x, y, z, w]` components.
//! Those work on [`Quat`], a quaternion packed into a `uv::Vec4`.
pub use ultraviolet as uv;

pub type Vec3 = uv::Vec3;
pub type Rotor3 = uv::Rotor3;
/// A quaternion stored as `(x, y, z, w)` with `w` the scalar part.
pub type Quat = uv::Vec4;

/// Below this length a direction is considered degenerate.
pub const DIRECTION_EPSILON: f32 = 1e-5;
/// Below this length a quaternion is considered numerically invalid.
pub const QUAT_EPSILON: f32 = 1e-4;
/// Below this `sin(angle / 2)` the axis of a rotation can't be recovered by division.
pub const AXIS_ANGLE_EPSILON: f32 = 1e-3;

#[inline]
pub fn quat_identity() -> Quat {
    Quat::new(0.0, 0.0, 0.0, 1.0)
}

#[inline]
pub fn rotor_to_quat(rot: Rotor3) -> Quat {
    let [x, y, z, w] = rot.into_quaternion_array();
    Quat::new(x, y, z, w)
}

#[inline]
pub fn quat_to_rotor(q: Quat) -> Rotor3 {
    Rotor3::from_quaternion_array([q.x, q.y, q.z, q.w])
}

/// The vector (imaginary) part of a quaternion.
#[inline]
pub fn quat_vector(q: Quat) -> Vec3 {
    Vec3::new(q.x, q.y, q.z)
}

/// Hamilton product `a * b`, i.e. `b` applied first, then `a`.
#[inline]
pub fn quat_mul(a: Quat, b: Quat) -> Quat {
    Quat::new(
        a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
        a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
        a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
    )
}

/// Multiplicative inverse. Not restricted to unit quaternions.
#[inline]
pub fn quat_inverse(q: Quat) -> Quat {
    let mag_sq = q.mag_sq();
    Quat::new(-q.x, -q.y, -q.z, q.w) / mag_sq
}

/// Replace a numerically invalid quaternion with the identity.
#[inline]
pub fn quat_or_identity(q: Quat) -> Quat {
    if q.mag() < QUAT_EPSILON {
        quat_identity()
    } else {
        q
    }
}

/// Flip `q` onto the same hemisphere as `side`.
///
/// `q` and `-q` describe the same orientation,
/// but componentwise operations only make sense between quaternions on the same side.
#[inline]
pub fn sync_side(q: Quat, side: Quat) -> Quat {
    if q.dot(side) < 0.0 {
        -q
    } else {
        q
    }
}

/// Rotation of `angle` radians about `axis`.
///
/// The axis doesn't need to be normalized.
/// A zero axis gives the identity rotation regardless of angle.
pub fn quat_from_axis_angle(axis: Vec3, angle: f32) -> Quat {
    let axis_mag = axis.mag();
    if axis_mag <= f32::EPSILON {
        return quat_identity();
    }
    let (sin, cos) = (angle * 0.5).sin_cos();
    let v = axis * (sin / axis_mag);
    Quat::new(v.x, v.y, v.z, cos)
}

/// Split a rotation into an axis and an angle in `[0, 2π]`.
///
/// The angle is `2 * acos(w)` for unit quaternions,
/// computed with `atan2` so it stays accurate close to the identity.
/// There the axis can't be recovered by dividing with `sin(angle / 2)`,
/// so the raw vector part is returned as the axis instead.
/// That axis is then not unit length, but it points the right way and is never NaN.
pub fn quat_to_axis_angle(q: Quat) -> (Vec3, f32) {
    let v = quat_vector(q);
    let s = v.mag();
    let angle = 2.0 * s.atan2(q.w);
    let axis = if s < AXIS_ANGLE_EPSILON { v } else { v / s };
    (axis, angle)
}

/// Normalize a direction, falling back to `fallback` if it's too short to normalize.
#[inline]
pub fn direction_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let mag = v.mag();
    if mag > DIRECTION_EPSILON {
        v / mag
    } else {
        fallback
    }
}
