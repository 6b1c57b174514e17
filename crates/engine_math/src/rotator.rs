//! Pitch/yaw/roll rotations in degrees.
//!
//! [`Rotator`] is the editor-facing rotation type. Angles are stored as
//! given, with no implicit wrapping; comparisons normalise first, so
//! `Rotator::new(0.0, 0.0, 360.0)` counts as zero.
//!
//! Pitch turns about the engine's X (left) axis, yaw about Y (up) and roll
//! about Z (forward). As a matrix the rotation is `Ry(yaw) * Rx(pitch) *
//! Rz(roll)`: roll is applied first, yaw last.
//!
//! `+` and `-` on rotators are component-wise and do NOT compose rotations.
//! Use [`Rotator::combine`] for that.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::nan_checks_enabled;
use crate::quaternion::Quaternion;

/// Degrees to radians, halved, for the half-angle products.
const DEG_TO_RAD_HALF: f32 = std::f32::consts::PI / 180.0 / 2.0;

/// A rotation as pitch, yaw and roll in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    /// Rotation about the left (X) axis: looking up and down.
    pub pitch: f32,
    /// Rotation about the up (Y) axis: looking left and right.
    pub yaw: f32,
    /// Rotation about the forward (Z) axis: tilting the head.
    pub roll: f32,
}

impl Rotator {
    /// No rotation.
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };

    #[must_use]
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Rotator from Euler angles packed as `(pitch, yaw, roll)`.
    #[must_use]
    pub const fn from_euler(euler: Vec3) -> Self {
        Self::new(euler.x, euler.y, euler.z)
    }

    /// The angles packed as `(pitch, yaw, roll)`.
    #[must_use]
    pub const fn euler(&self) -> Vec3 {
        Vec3::new(self.pitch, self.yaw, self.roll)
    }

    /// Convert to a quaternion from the half-angle sines and cosines.
    ///
    /// Exact inverse of [`Quaternion::to_rotator`] away from ±90° pitch.
    #[must_use]
    pub fn to_quaternion(&self) -> Quaternion {
        let (sp, cp) = (self.pitch * DEG_TO_RAD_HALF).sin_cos();
        let (sy, cy) = (self.yaw * DEG_TO_RAD_HALF).sin_cos();
        let (sr, cr) = (self.roll * DEG_TO_RAD_HALF).sin_cos();

        let mut q = Quaternion::new(
            cr * cp * cy + sr * sp * sy,
            cr * sp * sy - sr * cp * cy,
            -cr * sp * cy - sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
        );
        q.diagnostic_check_nan();
        q
    }

    /// Rotation matrix for this rotator, `M * v` rotating `v`.
    ///
    /// Only for handing to the renderer; compose rotations as quaternions.
    #[must_use]
    pub fn to_matrix(&self) -> Mat3 {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sr, cr) = self.roll.to_radians().sin_cos();

        // Ry(yaw) * Rx(pitch) * Rz(roll): the only order for which `M * v`
        // equals `self.to_quaternion().rotate_vector(v)` for every rotator.
        // Rows are left, up, forward.
        let m00 = sr * sp * sy + cr * cy;
        let m01 = cr * sp * sy - sr * cy;
        let m02 = cp * sy;

        let m10 = sr * cp;
        let m11 = cr * cp;
        let m12 = -sp;

        let m20 = sr * sp * cy - cr * sy;
        let m21 = cr * sp * cy + sr * sy;
        let m22 = cp * cy;

        Mat3::from_cols(
            Vec3::new(m00, m10, m20),
            Vec3::new(m01, m11, m21),
            Vec3::new(m02, m12, m22),
        )
    }

    /// Unit vector along the rotated forward (Z) axis.
    #[must_use]
    pub fn direction_vector(&self) -> Vec3 {
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        Vec3::new(cp * sy, -sp, cp * cy)
    }

    /// Rotate `v` by this rotator.
    #[must_use]
    pub fn rotate_vector(&self, v: Vec3) -> Vec3 {
        self.to_matrix() * v
    }

    /// Rotate `v` by the inverse of this rotator. Rotation matrices are
    /// orthonormal, so the transpose is the inverse.
    #[must_use]
    pub fn unrotate_vector(&self, v: Vec3) -> Vec3 {
        self.to_matrix().transpose() * v
    }

    /// The inverse rotation.
    #[must_use]
    pub fn inverse(&self) -> Self {
        self.to_quaternion().inverse().to_rotator()
    }

    /// Compose two rotations: `b` is applied first, then `a`.
    ///
    /// Goes through quaternions (`a.q * b.q`). This is not the same as
    /// `a + b`.
    #[must_use]
    pub fn combine(a: &Self, b: &Self) -> Self {
        (a.to_quaternion() * b.to_quaternion()).to_rotator()
    }

    /// `Rotator::combine(self, other)`.
    #[must_use]
    pub fn combined_with(&self, other: &Self) -> Self {
        Self::combine(self, other)
    }

    /// Add to each component. Does NOT compose rotations.
    pub fn add_delta(&mut self, delta_pitch: f32, delta_yaw: f32, delta_roll: f32) -> &mut Self {
        self.pitch += delta_pitch;
        self.yaw += delta_yaw;
        self.roll += delta_roll;
        self
    }

    /// Reduce an angle to `[0, 360)`.
    #[must_use]
    pub fn clamp_axis(angle: f32) -> f32 {
        let mut angle = angle % 360.0;
        if angle < 0.0 {
            angle += 360.0;
        }
        // -1e-8 + 360 rounds to 360.
        if angle >= 360.0 { 0.0 } else { angle }
    }

    /// Reduce an angle to `(-180, 180]`.
    #[must_use]
    pub fn normalize_axis(angle: f32) -> f32 {
        let mut angle = angle % 360.0;
        if angle > 180.0 {
            angle -= 360.0;
        } else if angle <= -180.0 {
            angle += 360.0;
        }
        angle
    }

    /// Wrap every component into `[0, 360)`.
    pub fn clamp(&mut self) -> &mut Self {
        self.pitch = Self::clamp_axis(self.pitch);
        self.yaw = Self::clamp_axis(self.yaw);
        self.roll = Self::clamp_axis(self.roll);
        self
    }

    /// Wrap every component into `(-180, 180]`.
    pub fn normalize(&mut self) -> &mut Self {
        self.pitch = Self::normalize_axis(self.pitch);
        self.yaw = Self::normalize_axis(self.yaw);
        self.roll = Self::normalize_axis(self.roll);
        self
    }

    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.clamp();
        self
    }

    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Returns `true` if every axis is within `tolerance` of a multiple of
    /// 360°.
    #[must_use]
    pub fn is_nearly_zero(&self, tolerance: f32) -> bool {
        Self::normalize_axis(self.pitch).abs() <= tolerance
            && Self::normalize_axis(self.yaw).abs() <= tolerance
            && Self::normalize_axis(self.roll).abs() <= tolerance
    }

    /// Returns `true` if every axis is exactly a multiple of 360°.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        Self::clamp_axis(self.pitch) == 0.0
            && Self::clamp_axis(self.yaw) == 0.0
            && Self::clamp_axis(self.roll) == 0.0
    }

    /// Per-axis comparison modulo 360° with the given tolerance.
    #[must_use]
    pub fn equals(&self, other: &Self, tolerance: f32) -> bool {
        Self::normalize_axis(self.pitch - other.pitch).abs() <= tolerance
            && Self::normalize_axis(self.yaw - other.yaw).abs() <= tolerance
            && Self::normalize_axis(self.roll - other.roll).abs() <= tolerance
    }

    #[must_use]
    pub fn contains_nan(&self) -> bool {
        !(self.pitch.is_finite() && self.yaw.is_finite() && self.roll.is_finite())
    }

    /// Reset to [`Rotator::ZERO`] if NaN-contaminated and the NaN diagnostic
    /// is enabled.
    pub fn diagnostic_check_nan(&mut self) {
        if nan_checks_enabled() {
            self.reset_if_nan();
        }
    }

    pub(crate) fn reset_if_nan(&mut self) -> bool {
        if self.contains_nan() {
            warn!(rotator = %self, "rotator contains NaN, resetting to zero");
            *self = Self::ZERO;
            true
        } else {
            false
        }
    }
}

impl From<Quaternion> for Rotator {
    fn from(q: Quaternion) -> Self {
        q.to_rotator()
    }
}

impl fmt::Display for Rotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p={} y={} r={}", self.pitch, self.yaw, self.roll)
    }
}

impl Add for Rotator {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut r = Self::new(self.pitch + rhs.pitch, self.yaw + rhs.yaw, self.roll + rhs.roll);
        r.diagnostic_check_nan();
        r
    }
}

impl AddAssign for Rotator {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Rotator {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut r = Self::new(self.pitch - rhs.pitch, self.yaw - rhs.yaw, self.roll - rhs.roll);
        r.diagnostic_check_nan();
        r
    }
}

impl SubAssign for Rotator {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Rotator {
    type Output = Self;

    fn mul(self, scale: f32) -> Self {
        let mut r = Self::new(self.pitch * scale, self.yaw * scale, self.roll * scale);
        r.diagnostic_check_nan();
        r
    }
}

impl MulAssign<f32> for Rotator {
    fn mul_assign(&mut self, scale: f32) {
        *self = *self * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_near(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1.0e-4), "{a:?} != {b:?}");
    }

    fn sample_rotators() -> Vec<Rotator> {
        vec![
            Rotator::ZERO,
            Rotator::new(10.0, 20.0, 30.0),
            Rotator::new(-35.0, 70.0, -120.0),
            Rotator::new(5.0, -160.0, 44.0),
            Rotator::new(12.5, -45.0, 0.0),
            Rotator::new(400.0, -725.0, 181.0),
        ]
    }

    const ANGLES: [f32; 12] = [
        0.0, 45.0, 180.0, -180.0, 359.5, 360.0, -360.0, -1.0e-8, 540.0, -540.0, 725.5, -1234.25,
    ];

    #[test]
    fn test_clamp_axis_range() {
        for angle in ANGLES {
            let clamped = Rotator::clamp_axis(angle);
            assert!((0.0..360.0).contains(&clamped), "{angle} -> {clamped}");
        }
        assert_eq!(Rotator::clamp_axis(-90.0), 270.0);
        assert_eq!(Rotator::clamp_axis(370.0), 10.0);
        assert_eq!(Rotator::clamp_axis(360.0), 0.0);
    }

    #[test]
    fn test_normalize_axis_range() {
        for angle in ANGLES {
            let normalized = Rotator::normalize_axis(angle);
            assert!(normalized > -180.0 && normalized <= 180.0, "{angle} -> {normalized}");
        }
        assert_eq!(Rotator::normalize_axis(190.0), -170.0);
        assert_eq!(Rotator::normalize_axis(-190.0), 170.0);
        assert_eq!(Rotator::normalize_axis(180.0), 180.0);
        assert_eq!(Rotator::normalize_axis(-180.0), 180.0);
    }

    #[test]
    fn test_equals_modulo_full_turns() {
        for angle in [0.0, 12.25, -37.5, 179.0, 290.0] {
            let r = Rotator::new(angle, angle * 0.5, -angle);
            for k in -3..=3 {
                let turns = 360.0 * k as f32;
                let shifted = Rotator::new(r.pitch + turns, r.yaw - turns, r.roll + turns);
                assert!(r.equals(&shifted, 1.0e-3), "{r} vs {shifted}");
            }
        }
        assert!(!Rotator::new(10.0, 0.0, 0.0).equals(&Rotator::new(11.0, 0.0, 0.0), 0.5));
    }

    #[test]
    fn test_zero_checks() {
        assert!(Rotator::ZERO.is_zero());
        assert!(Rotator::new(0.0, 0.0, 360.0).is_zero());
        assert!(Rotator::new(0.0, 720.0, -360.0).is_nearly_zero(1.0e-4));
        assert!(Rotator::new(0.00001, 0.0, 0.0).is_nearly_zero(1.0e-4));
        assert!(!Rotator::new(0.00001, 0.0, 0.0).is_zero());
        assert!(!Rotator::new(1.0, 0.0, 0.0).is_nearly_zero(1.0e-4));
    }

    #[test]
    fn test_clamp_and_normalize_in_place() {
        let mut r = Rotator::new(-90.0, 370.0, 190.0);
        r.clamp();
        assert_eq!(r, Rotator::new(270.0, 10.0, 190.0));
        r.normalize();
        assert_eq!(r, Rotator::new(-90.0, 10.0, -170.0));
        assert_eq!(Rotator::new(-90.0, 0.0, 0.0).clamped(), Rotator::new(270.0, 0.0, 0.0));
        assert_eq!(Rotator::new(270.0, 0.0, 0.0).normalized(), Rotator::new(-90.0, 0.0, 0.0));
    }

    #[test]
    fn test_single_axis_matrices() {
        let pitch = Rotator::new(90.0, 0.0, 0.0).to_matrix();
        assert_vec_near(pitch * Vec3::Y, Vec3::Z);
        assert_vec_near(pitch * Vec3::X, Vec3::X);

        let yaw = Rotator::new(0.0, 90.0, 0.0).to_matrix();
        assert_vec_near(yaw * Vec3::Z, Vec3::X);
        assert_vec_near(yaw * Vec3::Y, Vec3::Y);

        let roll = Rotator::new(0.0, 0.0, 90.0).to_matrix();
        assert_vec_near(roll * Vec3::X, Vec3::Y);
        assert_vec_near(roll * Vec3::Z, Vec3::Z);
    }

    #[test]
    fn test_matrix_composition_order() {
        let r = Rotator::new(25.0, -60.0, 110.0);
        let expected = Rotator::new(0.0, r.yaw, 0.0).to_matrix()
            * Rotator::new(r.pitch, 0.0, 0.0).to_matrix()
            * Rotator::new(0.0, 0.0, r.roll).to_matrix();
        assert!(r.to_matrix().abs_diff_eq(expected, 1.0e-5));
    }

    #[test]
    fn test_matrix_is_orthonormal() {
        for r in sample_rotators() {
            let m = r.to_matrix();
            assert!((m * m.transpose()).abs_diff_eq(Mat3::IDENTITY, 1.0e-5), "{r}");
            assert!((m.determinant() - 1.0).abs() < 1.0e-5, "{r}");
        }
    }

    #[test]
    fn test_quaternion_and_matrix_agree() {
        let r = Rotator::new(10.0, 20.0, 30.0);
        assert_vec_near(r.to_quaternion().rotate_vector(Vec3::X), r.to_matrix() * Vec3::X);

        let vectors = [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(0.3, -2.0, 1.5)];
        for r in sample_rotators() {
            let q = r.to_quaternion();
            for v in vectors {
                assert_vec_near(q.rotate_vector(v), r.rotate_vector(v));
                assert_vec_near(q.unrotate_vector(v), r.unrotate_vector(v));
            }
        }
    }

    #[test]
    fn test_direction_vector_is_rotated_forward() {
        for r in sample_rotators() {
            assert_vec_near(r.direction_vector(), r.to_matrix() * Vec3::Z);
        }
        assert_vec_near(Rotator::new(0.0, 90.0, 0.0).direction_vector(), Vec3::X);
    }

    #[test]
    fn test_unrotate_reverses_rotate() {
        let v = Vec3::new(-1.0, 0.25, 4.0);
        for r in sample_rotators() {
            assert_vec_near(r.unrotate_vector(r.rotate_vector(v)), v);
        }
    }

    #[test]
    fn test_combine_applies_second_argument_first() {
        let a = Rotator::new(0.0, 90.0, 0.0);
        let b = Rotator::new(30.0, 0.0, 0.0);
        let v = Vec3::new(0.2, 0.4, 1.0);

        let combined = Rotator::combine(&a, &b);
        assert_vec_near(combined.rotate_vector(v), a.rotate_vector(b.rotate_vector(v)));
        assert_eq!(a.combined_with(&b), combined);

        let other_way = Rotator::combine(&b, &a);
        assert!(!combined.equals(&other_way, 1.0e-2));
    }

    #[test]
    fn test_addition_is_not_composition() {
        let a = Rotator::new(30.0, 40.0, 0.0);
        let b = Rotator::new(0.0, 0.0, 50.0);
        let sum = a + b;
        assert_eq!(sum, Rotator::new(30.0, 40.0, 50.0));
        let v = Vec3::Y;
        assert!(!sum.rotate_vector(v).abs_diff_eq(Rotator::combine(&b, &a).rotate_vector(v), 1.0e-3));
    }

    #[test]
    fn test_inverse() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        for r in sample_rotators() {
            let inv = r.inverse();
            assert_vec_near(inv.rotate_vector(r.rotate_vector(v)), v);
            assert!(Rotator::combine(&r, &inv).is_nearly_zero(1.0e-2), "{r}");
        }
    }

    #[test]
    fn test_component_wise_operators() {
        let mut r = Rotator::new(1.0, 2.0, 3.0);
        r += Rotator::new(1.0, 1.0, 1.0);
        assert_eq!(r, Rotator::new(2.0, 3.0, 4.0));
        r -= Rotator::new(2.0, 2.0, 2.0);
        assert_eq!(r, Rotator::new(0.0, 1.0, 2.0));
        r *= 3.0;
        assert_eq!(r, Rotator::new(0.0, 3.0, 6.0));
        assert_eq!(r - Rotator::new(0.0, 3.0, 6.0), Rotator::ZERO);
        assert_eq!(r * 0.5, Rotator::new(0.0, 1.5, 3.0));

        r.add_delta(10.0, -3.0, 0.0).add_delta(0.0, 0.0, 1.0);
        assert_eq!(r, Rotator::new(10.0, 0.0, 7.0));
    }

    #[test]
    fn test_euler_packing() {
        let r = Rotator::from_euler(Vec3::new(5.0, 10.0, 15.0));
        assert_eq!(r, Rotator::new(5.0, 10.0, 15.0));
        assert_eq!(r.euler(), Vec3::new(5.0, 10.0, 15.0));
        assert!(Quaternion::from_euler(r.euler()).equals(&r.to_quaternion(), 1.0e-6));
        assert!(r.to_quaternion().euler().abs_diff_eq(r.euler(), 1.0e-2));
    }

    #[test]
    fn test_reset_if_nan() {
        let mut r = Rotator::new(1.0, f32::NAN, 0.0);
        assert!(r.contains_nan());
        assert!(r.reset_if_nan());
        assert_eq!(r, Rotator::ZERO);
        assert!(!Rotator::new(1.0, 2.0, 3.0).contains_nan());
    }

    #[test]
    fn test_display() {
        assert_eq!(Rotator::new(1.0, 2.5, -3.0).to_string(), "p=1 y=2.5 r=-3");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let r = Rotator::new(12.5, -45.0, 0.0);
        let bytes = rmp_serde::to_vec(&r).unwrap();
        let restored: Rotator = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(r, restored);
    }
}
