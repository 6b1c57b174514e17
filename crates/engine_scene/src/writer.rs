//! Scene file writer.

use std::fmt;

use engine_math::Transform;

use crate::{POSITION_FIELD, ROTATION_FIELD, SCALE_FIELD, TAG_FIELD, TRANSFORM_HEADER};

/// Formats one transform as a `[TRANSFORM]` block.
///
/// Only the inputs are written (tags, position, scale and the rotator);
/// the quaternion and matrix are rebuilt on load.
pub struct TransformBlock<'a>(pub &'a Transform);

impl fmt::Display for TransformBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.0;
        let position = t.position();
        let scale = t.scale();
        let rotator = t.rotator();

        writeln!(f, "{TRANSFORM_HEADER}")?;
        writeln!(f, "{TAG_FIELD}:{}", t.tag())?;
        writeln!(f, "{POSITION_FIELD}:{},{},{}", position.x, position.y, position.z)?;
        writeln!(f, "{SCALE_FIELD}:{},{},{}", scale.x, scale.y, scale.z)?;
        writeln!(
            f,
            "{ROTATION_FIELD}: {} {} {}",
            rotator.pitch, rotator.yaw, rotator.roll
        )
    }
}
