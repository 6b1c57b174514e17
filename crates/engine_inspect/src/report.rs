//! Transform reports and rotation edits.

use std::fmt;

use engine_math::{Quaternion, Rotator, Transform};
use engine_scene::SceneDocument;
use serde::Serialize;

/// Everything the inspector prints about one transform.
#[derive(Debug, Clone, Serialize)]
pub struct TransformReport {
    pub index: usize,
    pub tag: String,
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub rotator: Rotator,
    pub quaternion: Quaternion,
    /// Column-major composed matrix.
    pub matrix: [[f32; 4]; 4],
}

impl TransformReport {
    pub fn new(index: usize, transform: &Transform) -> Self {
        Self {
            index,
            tag: transform.tag().to_string(),
            position: transform.position().to_array(),
            scale: transform.scale().to_array(),
            rotator: transform.rotator(),
            quaternion: transform.rotation(),
            matrix: transform.matrix().to_cols_array_2d(),
        }
    }
}

impl fmt::Display for TransformReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [px, py, pz] = self.position;
        let [sx, sy, sz] = self.scale;
        writeln!(f, "transform #{} [{}]", self.index, self.tag)?;
        writeln!(f, "  position   {px} {py} {pz}")?;
        writeln!(f, "  scale      {sx} {sy} {sz}")?;
        writeln!(f, "  rotator    {}", self.rotator)?;
        writeln!(f, "  quaternion {}", self.quaternion)?;
        // Print rows, not columns.
        for row in 0..4 {
            let m = &self.matrix;
            writeln!(
                f,
                "  | {:>9.4} {:>9.4} {:>9.4} {:>9.4} |",
                m[0][row], m[1][row], m[2][row], m[3][row]
            )?;
        }
        Ok(())
    }
}

/// One report per transform, in document order.
pub fn build(document: &SceneDocument) -> Vec<TransformReport> {
    document
        .transforms
        .iter()
        .enumerate()
        .map(|(index, transform)| TransformReport::new(index, transform))
        .collect()
}

/// Apply `delta` after the current rotation of every transform carrying
/// `tag` (all transforms when `tag` is `None`). Returns how many were edited.
pub fn apply_rotation(document: &mut SceneDocument, delta: Rotator, tag: Option<&str>) -> usize {
    let delta = delta.to_quaternion();
    let mut edited = 0;
    for transform in document
        .transforms
        .iter_mut()
        .filter(|t| tag.is_none_or(|tag| t.has_tag(tag)))
    {
        let mut rotation = transform.rotation_mut();
        *rotation = delta * *rotation;
        edited += 1;
    }
    edited
}
