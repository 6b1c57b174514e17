//! 3D transform with a bound quaternion/rotator pair.
//!
//! [`Transform`] owns a position, a non-uniform scale and one rotation held
//! twice: as a [`Quaternion`] for gameplay code and as a [`Rotator`] for the
//! editor. Both must describe the same orientation at all times, so neither
//! is exposed mutably on its own. Every write goes through the transform,
//! which:
//!
//! 1. stores the written representation,
//! 2. recomputes the other one from it (quaternion writes go through
//!    [`Quaternion::to_rotator`], rotator writes through
//!    [`Rotator::to_quaternion`]),
//! 3. recomposes the 4×4 matrix `T * R * S` from the rotator and bumps
//!    [`Transform::revision`].
//!
//! The counterpart is assigned as a plain field, never through the public
//! setters, so there is no round trip back into the written side.
//!
//! In-place edits use [`Transform::rotation_mut`] and
//! [`Transform::rotator_mut`]. They hand out a guard that derefs to the
//! representation and resynchronises when dropped:
//!
//! ```rust
//! use engine_math::{Quaternion, Transform, Vec3};
//!
//! let mut t = Transform::new();
//! *t.rotation_mut() = Quaternion::from_axis_angle(Vec3::Y, 0.5);
//! assert!((t.rotator().yaw - 0.5_f32.to_degrees()).abs() < 1.0e-3);
//!
//! t.rotator_mut().pitch = 30.0;
//! assert!(t.rotation().equivalent(&t.rotator().to_quaternion(), 1.0e-4));
//! ```
//!
//! Near ±90° pitch, converting back and forth may yield a different (but
//! equivalent) pitch/yaw/roll triple than the one written.

use std::ops::{Deref, DerefMut};

use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::quaternion::Quaternion;
use crate::rotator::Rotator;
use crate::tags::Tags;

/// Position, rotation and scale composed into a single matrix.
///
/// Cloning produces an independent transform; nothing is shared with the
/// source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "TransformRecord", into = "TransformRecord")]
pub struct Transform {
    tags: Tags,
    position: Vec3,
    scale: Vec3,
    /// Gameplay-facing rotation. Kept normalised.
    rotation: Quaternion,
    /// Editor-facing rotation. Source of the rotation matrix.
    rotator: Rotator,
    /// `T * R * S`, derived from the fields above.
    matrix: Mat4,
    revision: u64,
}

impl Transform {
    /// The identity transform: origin, no rotation, unit scale.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(Vec3::ZERO, Rotator::ZERO, Vec3::ONE)
    }

    /// Create a transform from its three inputs.
    #[must_use]
    pub fn from_parts(position: Vec3, rotator: Rotator, scale: Vec3) -> Self {
        let mut transform = Self {
            tags: Tags::default(),
            position,
            scale,
            rotation: Quaternion::IDENTITY,
            rotator,
            matrix: Mat4::IDENTITY,
            revision: 0,
        };
        transform.sync_from_rotator();
        transform
    }

    /// Create a new transform with the given position and default rotation/scale.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self::from_parts(position, Rotator::ZERO, Vec3::ONE)
    }

    /// Create a new transform with position and rotation.
    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quaternion) -> Self {
        let mut transform = Self::from_position(position);
        transform.set_rotation(rotation);
        transform
    }

    // -- Position --

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.recompose();
    }

    pub fn set_position_x(&mut self, x: f32) {
        self.position.x = x;
        self.recompose();
    }

    pub fn set_position_y(&mut self, y: f32) {
        self.position.y = y;
        self.recompose();
    }

    pub fn set_position_z(&mut self, z: f32) {
        self.position.z = z;
        self.recompose();
    }

    // -- Scale --

    #[must_use]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.recompose();
    }

    pub fn set_uniform_scale(&mut self, factor: f32) {
        self.set_scale(Vec3::splat(factor));
    }

    pub fn set_scale_x(&mut self, x: f32) {
        self.scale.x = x;
        self.recompose();
    }

    pub fn set_scale_y(&mut self, y: f32) {
        self.scale.y = y;
        self.recompose();
    }

    pub fn set_scale_z(&mut self, z: f32) {
        self.scale.z = z;
        self.recompose();
    }

    // -- Rotation --

    /// The rotation as a quaternion.
    #[must_use]
    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    /// The rotation as pitch/yaw/roll degrees.
    #[must_use]
    pub fn rotator(&self) -> Rotator {
        self.rotator
    }

    /// Set the rotation from a quaternion. The quaternion is normalised
    /// (NaN-contaminated input is left as is) and the rotator is derived
    /// from it.
    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.rotation = rotation;
        self.sync_from_rotation();
    }

    /// Set the rotation from a rotator. The quaternion is derived from it.
    pub fn set_rotator(&mut self, rotator: Rotator) {
        self.rotator = rotator;
        self.sync_from_rotator();
    }

    /// Scoped mutable access to the quaternion. The rotator and matrix are
    /// updated when the guard is dropped.
    pub fn rotation_mut(&mut self) -> RotationMut<'_> {
        RotationMut { transform: self }
    }

    /// Scoped mutable access to the rotator. The quaternion and matrix are
    /// updated when the guard is dropped.
    pub fn rotator_mut(&mut self) -> RotatorMut<'_> {
        RotatorMut { transform: self }
    }

    /// The 3×3 rotation matrix, taken from the rotator. Render use only.
    #[must_use]
    pub fn rotation_matrix(&self) -> Mat3 {
        self.rotator.to_matrix()
    }

    // -- Composed matrix --

    /// The composed `translate * rotate * scale` matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Map a point from local space through the composed matrix.
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }

    /// Incremented every time the composed matrix is rebuilt. Observers
    /// compare it against the last value they saw to detect changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // -- Builders --

    /// Translate the transform by the given offset.
    #[must_use]
    pub fn translated(mut self, offset: Vec3) -> Self {
        self.set_position(self.position + offset);
        self
    }

    /// Apply `rotation` after the current rotation.
    #[must_use]
    pub fn rotated(mut self, rotation: Quaternion) -> Self {
        self.set_rotation(rotation * self.rotation);
        self
    }

    /// Multiply the scale by a uniform factor.
    #[must_use]
    pub fn scaled(mut self, factor: f32) -> Self {
        self.set_scale(self.scale * factor);
        self
    }

    // -- Tags --

    #[must_use]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// The raw tag string, e.g. `"NoSave Plant"`.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.tags.as_str()
    }

    /// Replace all tags with the whitespace-separated list in `raw`.
    pub fn set_tag(&mut self, raw: &str) {
        self.tags = Tags::new(raw);
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn add_tag(&mut self, tag: &str) -> bool {
        self.tags.insert(tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    // -- Synchronisation --

    fn sync_from_rotation(&mut self) {
        self.rotation.diagnostic_check_nan();
        // NaNs pass through untouched; resetting them is the diagnostic's job.
        if !self.rotation.contains_nan() {
            self.rotation.normalize();
        }
        self.rotator = self.rotation.to_rotator();
        self.recompose();
    }

    fn sync_from_rotator(&mut self) {
        self.rotator.diagnostic_check_nan();
        self.rotation = self.rotator.to_quaternion();
        self.recompose();
    }

    fn recompose(&mut self) {
        let rotation = Mat4::from_mat3(self.rotator.to_matrix());
        self.matrix =
            Mat4::from_translation(self.position) * rotation * Mat4::from_scale(self.scale);
        self.revision += 1;
        trace!(revision = self.revision, "transform matrix recomposed");
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable view of a transform's quaternion. See [`Transform::rotation_mut`].
#[derive(Debug)]
pub struct RotationMut<'a> {
    transform: &'a mut Transform,
}

impl Deref for RotationMut<'_> {
    type Target = Quaternion;

    fn deref(&self) -> &Quaternion {
        &self.transform.rotation
    }
}

impl DerefMut for RotationMut<'_> {
    fn deref_mut(&mut self) -> &mut Quaternion {
        &mut self.transform.rotation
    }
}

impl Drop for RotationMut<'_> {
    fn drop(&mut self) {
        self.transform.sync_from_rotation();
    }
}

/// Mutable view of a transform's rotator. See [`Transform::rotator_mut`].
#[derive(Debug)]
pub struct RotatorMut<'a> {
    transform: &'a mut Transform,
}

impl Deref for RotatorMut<'_> {
    type Target = Rotator;

    fn deref(&self) -> &Rotator {
        &self.transform.rotator
    }
}

impl DerefMut for RotatorMut<'_> {
    fn deref_mut(&mut self) -> &mut Rotator {
        &mut self.transform.rotator
    }
}

impl Drop for RotatorMut<'_> {
    fn drop(&mut self) {
        self.transform.sync_from_rotator();
    }
}

/// The persisted inputs of a [`Transform`]; everything else is derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransformRecord {
    tag: Tags,
    position: Vec3,
    scale: Vec3,
    rotator: Rotator,
}

impl From<TransformRecord> for Transform {
    fn from(record: TransformRecord) -> Self {
        let mut transform = Self::from_parts(record.position, record.rotator, record.scale);
        transform.tags = record.tag;
        transform
    }
}

impl From<Transform> for TransformRecord {
    fn from(transform: Transform) -> Self {
        Self {
            tag: transform.tags,
            position: transform.position,
            scale: transform.scale,
            rotator: transform.rotator,
        }
    }
}
