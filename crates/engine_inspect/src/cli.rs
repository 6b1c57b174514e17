//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use engine_math::Rotator;

/// Print the transforms of a scene file and optionally rotate them.
#[derive(Parser, Debug, Clone)]
#[command(name = "engine_inspect", version, about)]
pub struct Cli {
    /// Scene file to read
    #[arg(value_name = "SCENE")]
    pub scene: PathBuf,

    /// Rotate transforms by PITCH YAW ROLL degrees, applied after their current rotation
    #[arg(
        long,
        short = 'r',
        num_args = 3,
        value_names = ["PITCH", "YAW", "ROLL"],
        allow_negative_numbers = true
    )]
    pub rotate: Option<Vec<f32>>,

    /// Only edit transforms carrying this tag
    #[arg(long, short = 't', value_name = "TAG")]
    pub tag: Option<String>,

    /// Write the scene back to this file after editing
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Reset NaN-contaminated rotations and log a warning
    #[arg(long)]
    pub nan_checks: bool,
}

impl Cli {
    /// The `--rotate` delta, if given.
    pub fn rotation(&self) -> Option<Rotator> {
        match self.rotate.as_deref() {
            Some(&[pitch, yaw, roll]) => Some(Rotator::new(pitch, yaw, roll)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_only() {
        let cli = Cli::try_parse_from(["engine_inspect", "level.scene"]).unwrap();
        assert_eq!(cli.scene, PathBuf::from("level.scene"));
        assert!(cli.rotation().is_none());
        assert!(cli.output.is_none());
        assert!(!cli.json);
        assert!(!cli.nan_checks);
    }

    #[test]
    fn test_rotate_accepts_negative_angles() {
        let cli = Cli::try_parse_from([
            "engine_inspect",
            "level.scene",
            "--rotate",
            "12.5",
            "-45",
            "0",
            "--tag",
            "Plant",
            "-o",
            "out.scene",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.rotation(), Some(Rotator::new(12.5, -45.0, 0.0)));
        assert_eq!(cli.tag.as_deref(), Some("Plant"));
        assert_eq!(cli.output, Some(PathBuf::from("out.scene")));
        assert!(cli.json);
    }

    #[test]
    fn test_rotate_requires_three_angles() {
        assert!(Cli::try_parse_from(["engine_inspect", "level.scene", "--rotate", "1", "2"]).is_err());
    }
}
