//! Unit quaternion rotations.
//!
//! [`Quaternion`] is the engine's composition-friendly rotation type. Chains
//! of rotations should stay in quaternion space and only convert to a
//! [`Rotator`] for display or editing, which avoids gimbal lock.
//!
//! ## Axis convention
//!
//! Vectors handed to and returned from this module are in engine axes: X is
//! the object's left, Y its up and Z its forward direction. The imaginary
//! part of the quaternion is stored in a remapped order,
//!
//! ```text
//! (x, y, z) = sin(θ/2) * (-axis.z, -axis.x, axis.y)
//! ```
//!
//! which is the basis the pitch/yaw/roll conversion formulas are written
//! against. [`Quaternion::rotate_vector`], [`Quaternion::rotation_axis`] and
//! [`Quaternion::find_between`] apply the same mapping, so callers never see
//! it unless they read the raw components.
//!
//! ## Composition order
//!
//! `a * b` applies `b` first, then `a`. Multiplication is associative but not
//! commutative.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::nan_checks_enabled;
use crate::rotator::Rotator;
use crate::scalar::{KINDA_SMALL_NUMBER, QUAT_NORMALIZED_THRESHOLD, SMALL_NUMBER, float_equal};

/// Past this value of the singularity test the pitch is treated as ±90°.
const SINGULARITY_THRESHOLD: f32 = 0.499_999_5;

/// Above this cosine, slerp falls back to a linear blend.
const SLERP_DOT_THRESHOLD: f32 = 0.9999;

/// Engine axes to quaternion storage order.
#[inline]
fn to_quat_space(v: Vec3) -> Vec3 {
    Vec3::new(-v.z, -v.x, v.y)
}

/// Quaternion storage order back to engine axes.
#[inline]
fn from_quat_space(v: Vec3) -> Vec3 {
    Vec3::new(-v.y, v.z, -v.x)
}

/// A rotation stored as `w + xi + yj + zk`.
///
/// Semantically a unit quaternion. Non-unit values are allowed as
/// intermediates (blending, scaling), but [`Quaternion::inverse`] and the
/// vector rotation helpers assume normalised input.
///
/// `==` compares components exactly. Use [`Quaternion::equals`] for a
/// tolerance-based comparison and [`Quaternion::equivalent`] to also accept
/// the negated quaternion, which encodes the same rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a quaternion from raw components.
    #[must_use]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// `axis` must already be normalised; it is not normalised here. See the
    /// module docs for how the axis is laid out in the components.
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (s, c) = (0.5 * angle).sin_cos();
        let mut q = Self {
            w: c,
            x: s * -axis.z,
            y: s * -axis.x,
            z: s * axis.y,
        };
        q.diagnostic_check_nan();
        q
    }

    /// Rotation from Euler angles in degrees, packed as `(pitch, yaw, roll)`.
    #[must_use]
    pub fn from_euler(euler: Vec3) -> Self {
        Rotator::from_euler(euler).to_quaternion()
    }

    /// Convert to pitch/yaw/roll degrees.
    ///
    /// Near ±90° pitch the usual `asin`/`atan2` decomposition is unstable, so
    /// pitch is pinned to ±90 and roll is derived from yaw instead. The result
    /// describes the same orientation, but need not be the triple the
    /// quaternion was built from.
    ///
    /// Prefer staying in quaternion space when composing rotations:
    /// `a * b * c` is both cheaper and safer than chaining
    /// [`Rotator::combine`].
    #[must_use]
    pub fn to_rotator(&self) -> Rotator {
        let mut q = *self;
        q.diagnostic_check_nan();
        let Self { w, x, y, z } = q;

        let yaw_y = 2.0 * (w * z + x * y);
        let yaw_x = 1.0 - 2.0 * (y * y + z * z);
        let singularity_test = z * x - w * y;
        let yaw = yaw_y.atan2(yaw_x).to_degrees();

        let mut result = if singularity_test < -SINGULARITY_THRESHOLD {
            Rotator::new(
                -90.0,
                yaw,
                Rotator::normalize_axis(-yaw - (2.0 * x.atan2(w)).to_degrees()),
            )
        } else if singularity_test > SINGULARITY_THRESHOLD {
            Rotator::new(
                90.0,
                yaw,
                Rotator::normalize_axis(yaw - (2.0 * x.atan2(w)).to_degrees()),
            )
        } else {
            Rotator::new(
                (2.0 * singularity_test).asin().to_degrees(),
                yaw,
                (-2.0 * (w * x + y * z))
                    .atan2(1.0 - 2.0 * (x * x + y * y))
                    .to_degrees(),
            )
        };

        result.diagnostic_check_nan();
        result
    }

    /// This rotation as Euler angles in degrees, `(pitch, yaw, roll)`.
    #[must_use]
    pub fn euler(&self) -> Vec3 {
        self.to_rotator().euler()
    }

    /// Rotation matrix, built through the rotator. Intended for rendering
    /// only; compose rotations as quaternions instead.
    #[must_use]
    pub fn to_matrix(&self) -> Mat3 {
        self.to_rotator().to_matrix()
    }

    /// Inner product.
    #[must_use]
    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[must_use]
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    #[must_use]
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns `true` if `|q|²` is within [`QUAT_NORMALIZED_THRESHOLD`] of one.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        (1.0 - self.length_squared()).abs() < QUAT_NORMALIZED_THRESHOLD
    }

    /// Normalise in place with the default [`SMALL_NUMBER`] cut-off.
    pub fn normalize(&mut self) {
        self.normalize_with_tolerance(SMALL_NUMBER);
    }

    /// Normalise in place if `|q|² >= tolerance`, otherwise reset to
    /// [`Quaternion::IDENTITY`].
    pub fn normalize_with_tolerance(&mut self, tolerance: f32) {
        let square_sum = self.length_squared();
        if square_sum >= tolerance {
            let scale = square_sum.sqrt().recip();
            self.w *= scale;
            self.x *= scale;
            self.y *= scale;
            self.z *= scale;
        } else {
            *self = Self::IDENTITY;
        }
    }

    /// A normalised copy. See [`Quaternion::normalize`].
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Component-wise comparison with the given tolerance.
    #[must_use]
    pub fn equals(&self, other: &Self, tolerance: f32) -> bool {
        float_equal(self.w, other.w, tolerance)
            && float_equal(self.x, other.x, tolerance)
            && float_equal(self.y, other.y, tolerance)
            && float_equal(self.z, other.z, tolerance)
    }

    /// Like [`Quaternion::equals`], but also accepts `-other`.
    #[must_use]
    pub fn equivalent(&self, other: &Self, tolerance: f32) -> bool {
        self.equals(other, tolerance) || self.equals(&-*other, tolerance)
    }

    #[must_use]
    pub fn is_identity(&self, tolerance: f32) -> bool {
        self.equals(&Self::IDENTITY, tolerance)
    }

    /// The inverse rotation.
    ///
    /// Only defined for normalised quaternions; anything else yields
    /// [`Quaternion::IDENTITY`].
    #[must_use]
    pub fn inverse(&self) -> Self {
        if self.is_normalized() {
            Self::new(self.w, -self.x, -self.y, -self.z)
        } else {
            debug!(quat = %self, "inverse of non-normalized quaternion, using identity");
            Self::IDENTITY
        }
    }

    /// Rotation angle in radians.
    #[must_use]
    pub fn angle(&self) -> f32 {
        2.0 * self.w.clamp(-1.0, 1.0).acos()
    }

    /// Rotation axis in engine axes. Falls back to `(1, 0, 0)` when the
    /// rotation is too small to have a meaningful axis.
    #[must_use]
    pub fn rotation_axis(&self) -> Vec3 {
        let s = (1.0 - self.w * self.w).max(0.0).sqrt();
        if s > KINDA_SMALL_NUMBER {
            from_quat_space(Vec3::new(self.x, self.y, self.z) / s)
        } else {
            Vec3::X
        }
    }

    /// Axis and angle (radians) of this rotation.
    #[must_use]
    pub fn to_axis_angle(&self) -> (Vec3, f32) {
        (self.rotation_axis(), self.angle())
    }

    /// Rotate `v` by this quaternion.
    ///
    /// Uses `v' = v + w·t + q×t` with `t = 2·(q×v)` rather than building a
    /// matrix.
    #[must_use]
    pub fn rotate_vector(&self, v: Vec3) -> Vec3 {
        let q = Vec3::new(self.x, self.y, self.z);
        let v = to_quat_space(v);
        let t = 2.0 * q.cross(v);
        from_quat_space(v + self.w * t + q.cross(t))
    }

    /// Rotate `v` by the inverse of this quaternion.
    #[must_use]
    pub fn unrotate_vector(&self, v: Vec3) -> Vec3 {
        let q = Vec3::new(-self.x, -self.y, -self.z);
        let v = to_quat_space(v);
        let t = 2.0 * q.cross(v);
        from_quat_space(v + self.w * t + q.cross(t))
    }

    /// Flip the sign of this quaternion if needed so that the delta to
    /// `other` is the shortest arc.
    pub fn enforce_shortest_arc_with(&mut self, other: &Self) {
        if self.dot(other) < 0.0 {
            *self = -*self;
        }
    }

    /// The rotated X (left) axis.
    #[must_use]
    pub fn axis_x(&self) -> Vec3 {
        self.rotate_vector(Vec3::X)
    }

    /// The rotated Y (up) axis.
    #[must_use]
    pub fn axis_y(&self) -> Vec3 {
        self.rotate_vector(Vec3::Y)
    }

    /// The rotated Z (forward) axis.
    #[must_use]
    pub fn axis_z(&self) -> Vec3 {
        self.rotate_vector(Vec3::Z)
    }

    #[must_use]
    pub fn left_vector(&self) -> Vec3 {
        self.axis_x()
    }

    #[must_use]
    pub fn up_vector(&self) -> Vec3 {
        self.axis_y()
    }

    #[must_use]
    pub fn forward_vector(&self) -> Vec3 {
        self.axis_z()
    }

    /// Angle in radians between two rotations. `q` and `-q` are at distance
    /// zero from each other.
    #[must_use]
    pub fn angular_distance(&self, other: &Self) -> f32 {
        let inner = self.dot(other);
        (2.0 * inner * inner - 1.0).clamp(-1.0, 1.0).acos()
    }

    /// Smallest rotation taking direction `v1` onto direction `v2`. Inputs
    /// may have any non-zero length.
    #[must_use]
    pub fn find_between(v1: Vec3, v2: Vec3) -> Self {
        Self::find_between_vectors(v1, v2)
    }

    /// Same as [`Quaternion::find_between`].
    #[must_use]
    pub fn find_between_vectors(v1: Vec3, v2: Vec3) -> Self {
        let norm = (v1.length_squared() * v2.length_squared()).sqrt();
        Self::find_between_helper(v1, v2, norm)
    }

    /// [`Quaternion::find_between`] for inputs already known to be unit
    /// length.
    #[must_use]
    pub fn find_between_normals(v1: Vec3, v2: Vec3) -> Self {
        Self::find_between_helper(v1, v2, 1.0)
    }

    fn find_between_helper(v1: Vec3, v2: Vec3, norm: f32) -> Self {
        let a = to_quat_space(v1);
        let b = to_quat_space(v2);
        let w = norm + a.dot(b);

        let mut result = if w >= KINDA_SMALL_NUMBER * norm {
            let axis = a.cross(b);
            Self::new(w, axis.x, axis.y, axis.z)
        } else {
            // Opposite directions: any axis perpendicular to `a` gives a
            // half turn.
            debug!(?v1, ?v2, "find_between on antiparallel vectors");
            if a.x.abs() > a.y.abs() {
                Self::new(0.0, -a.z, 0.0, a.x)
            } else {
                Self::new(0.0, 0.0, -a.z, a.y)
            }
        };

        result.normalize();
        result
    }

    /// Spherical interpolation along the shorter arc. Inputs must be
    /// normalised; the result is normalised.
    #[must_use]
    pub fn slerp(q1: &Self, q2: &Self, t: f32) -> Self {
        Self::slerp_not_normalized(q1, q2, t).normalized()
    }

    fn slerp_not_normalized(q1: &Self, q2: &Self, t: f32) -> Self {
        let raw_cos = q1.dot(q2);
        let cos = raw_cos.abs();

        let (scale0, mut scale1) = if cos < SLERP_DOT_THRESHOLD {
            let omega = cos.acos();
            let inv_sin = omega.sin().recip();
            (
                ((1.0 - t) * omega).sin() * inv_sin,
                (t * omega).sin() * inv_sin,
            )
        } else {
            (1.0 - t, t)
        };

        if raw_cos < 0.0 {
            scale1 = -scale1;
        }

        Self::new(
            scale0 * q1.w + scale1 * q2.w,
            scale0 * q1.x + scale1 * q2.x,
            scale0 * q1.y + scale1 * q2.y,
            scale0 * q1.z + scale1 * q2.z,
        )
    }

    /// Returns `true` if any component is NaN or infinite.
    #[must_use]
    pub fn contains_nan(&self) -> bool {
        !(self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite())
    }

    /// Reset to identity if NaN-contaminated and the NaN diagnostic is
    /// enabled. A no-op otherwise.
    pub fn diagnostic_check_nan(&mut self) {
        if nan_checks_enabled() {
            self.reset_if_nan();
        }
    }

    /// Unconditional part of [`Quaternion::diagnostic_check_nan`]. Returns
    /// `true` if a reset happened.
    pub(crate) fn reset_if_nan(&mut self) -> bool {
        if self.contains_nan() {
            warn!(quat = %self, "quaternion contains NaN, resetting to identity");
            *self = Self::IDENTITY;
            true
        } else {
            false
        }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Rotator> for Quaternion {
    fn from(rotator: Rotator) -> Self {
        rotator.to_quaternion()
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w={} x={} y={} z={}", self.w, self.x, self.y, self.z)
    }
}

// Component-wise arithmetic. Combining rotations is done with `*`.

impl Add for Quaternion {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut r = Self::new(self.w + rhs.w, self.x + rhs.x, self.y + rhs.y, self.z + rhs.z);
        r.diagnostic_check_nan();
        r
    }
}

impl AddAssign for Quaternion {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Quaternion {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut r = Self::new(self.w - rhs.w, self.x - rhs.x, self.y - rhs.y, self.z - rhs.z);
        r.diagnostic_check_nan();
        r
    }
}

impl SubAssign for Quaternion {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Hamilton product: `a * b` applies `b` first, then `a`.
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, q: Self) -> Self {
        let mut r = Self::new(
            self.w * q.w - self.x * q.x - self.y * q.y - self.z * q.z,
            self.w * q.x + self.x * q.w + self.y * q.z - self.z * q.y,
            self.w * q.y - self.x * q.z + self.y * q.w + self.z * q.x,
            self.w * q.z + self.x * q.y - self.y * q.x + self.z * q.w,
        );
        r.diagnostic_check_nan();
        r
    }
}

impl MulAssign for Quaternion {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;

    fn mul(self, scale: f32) -> Self {
        let mut r = Self::new(self.w * scale, self.x * scale, self.y * scale, self.z * scale);
        r.diagnostic_check_nan();
        r
    }
}

impl MulAssign<f32> for Quaternion {
    fn mul_assign(&mut self, scale: f32) {
        *self = *self * scale;
    }
}

impl Div<f32> for Quaternion {
    type Output = Self;

    fn div(self, scale: f32) -> Self {
        let mut r = Self::new(self.w / scale, self.x / scale, self.y / scale, self.z / scale);
        r.diagnostic_check_nan();
        r
    }
}

impl DivAssign<f32> for Quaternion {
    fn div_assign(&mut self, scale: f32) {
        *self = *self / scale;
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }
}
