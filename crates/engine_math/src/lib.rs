//! # engine_math
//!
//! Rotation math for the engine. Re-exports [`glam`] for linear algebra and
//! defines the engine's own rotation types:
//!
//! - [`Quaternion`]: unit quaternion, used for composing rotations.
//! - [`Rotator`]: pitch/yaw/roll in degrees, used by the editor.
//! - [`Transform`]: position, scale and a rotation held as both of the above,
//!   kept in sync and composed into a 4×4 matrix.
//!
//! Engine axes are X = left, Y = up, Z = forward.

pub mod config;
pub mod quaternion;
pub mod rotator;
pub mod scalar;
pub mod tags;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{Mat3, Mat4, Vec3, Vec4};

pub use config::{MathConfig, nan_checks_enabled};
pub use quaternion::Quaternion;
pub use rotator::Rotator;
pub use tags::Tags;
pub use transform::{RotationMut, RotatorMut, Transform};
