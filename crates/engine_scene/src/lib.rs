//! # engine_scene
//!
//! Text save format for [`Transform`]s. A scene file is a sequence of
//! sections, each introduced by a `[NAME]` header line:
//!
//! ```text
//! [TRANSFORM]
//! TAG:NoSave Plant
//! POSITION:1,2,3
//! SCALE:1,1,1
//! ROTATION: 12.5 -45 0
//! ```
//!
//! Blank lines are ignored and sections other than `[TRANSFORM]` are skipped.
//! Files written before rotations were saved have no `ROTATION:` line; those
//! transforms load with no rotation.

use std::fs;
use std::path::Path;

use engine_math::Transform;
use tracing::info;

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{Result, SceneError};
pub use reader::SceneReader;
pub use writer::TransformBlock;

pub const TRANSFORM_HEADER: &str = "[TRANSFORM]";
pub const TAG_FIELD: &str = "TAG";
pub const POSITION_FIELD: &str = "POSITION";
pub const SCALE_FIELD: &str = "SCALE";
pub const ROTATION_FIELD: &str = "ROTATION";

/// All transforms of one scene file, in file order.
#[derive(Debug, Clone, Default)]
pub struct SceneDocument {
    pub transforms: Vec<Transform>,
}

impl SceneDocument {
    #[must_use]
    pub fn new(transforms: Vec<Transform>) -> Self {
        Self { transforms }
    }

    pub fn parse(input: &str) -> Result<Self> {
        Ok(Self::new(SceneReader::parse(input)?))
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        self.transforms
            .iter()
            .map(|t| TransformBlock(t).to_string())
            .collect()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = Self::parse(&fs::read_to_string(path)?)?;
        info!(
            path = %path.display(),
            transforms = document.transforms.len(),
            "loaded scene"
        );
        Ok(document)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_text())?;
        info!(
            path = %path.display(),
            transforms = self.transforms.len(),
            "saved scene"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use engine_math::{Quaternion, Rotator, Vec3};

    use super::*;

    #[test]
    fn test_text_roundtrip() {
        let mut plant = Transform::from_parts(
            Vec3::new(1.0, 2.0, 3.0),
            Rotator::new(12.5, -45.0, 0.0),
            Vec3::new(1.0, 2.0, 1.0),
        );
        plant.set_tag("NoSave Plant");
        let spun = Transform::from_position_rotation(
            Vec3::new(-0.25, 0.0, 8.0),
            Quaternion::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.75),
        );
        let document = SceneDocument::new(vec![plant, spun]);

        let restored = SceneDocument::parse(&document.to_text()).unwrap();
        assert_eq!(restored.transforms.len(), 2);
        for (a, b) in document.transforms.iter().zip(&restored.transforms) {
            assert_eq!(a.tag(), b.tag());
            assert_eq!(a.position(), b.position());
            assert_eq!(a.scale(), b.scale());
            assert_eq!(a.rotator(), b.rotator());
            assert!(a.rotation().equivalent(&b.rotation(), 1.0e-5));
            assert!(a.matrix().abs_diff_eq(b.matrix(), 1.0e-5));
        }
        assert_eq!(restored.transforms[0].rotator(), Rotator::new(12.5, -45.0, 0.0));
    }

    #[test]
    fn test_empty_document() {
        let document = SceneDocument::default();
        assert_eq!(document.to_text(), "");
        assert!(SceneDocument::parse("").unwrap().transforms.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "engine_scene_test_{}.scene",
            std::process::id()
        ));
        let mut t = Transform::from_position(Vec3::new(3.0, 2.0, 1.0));
        t.set_rotator(Rotator::new(0.0, 30.0, 0.0));
        SceneDocument::new(vec![t]).save(&path).unwrap();

        let loaded = SceneDocument::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.transforms.len(), 1);
        assert_eq!(loaded.transforms[0].position(), Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(loaded.transforms[0].rotator(), Rotator::new(0.0, 30.0, 0.0));
    }

    #[test]
    fn test_load_missing_file() {
        let err = SceneDocument::load("/nonexistent/engine_scene/missing.scene").unwrap_err();
        assert!(matches!(err, SceneError::Io(_)));
    }
}
