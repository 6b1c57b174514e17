//! Line-oriented reader for the scene text format.

use engine_math::{Rotator, Transform, Vec3};
use tracing::debug;

use crate::error::{Result, SceneError};
use crate::{POSITION_FIELD, ROTATION_FIELD, SCALE_FIELD, TAG_FIELD, TRANSFORM_HEADER};

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    text: &'a str,
}

pub struct SceneReader<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> SceneReader<'a> {
    /// Parse every `[TRANSFORM]` block in `input`, in file order.
    pub fn parse(input: &'a str) -> Result<Vec<Transform>> {
        let lines = input
            .lines()
            .enumerate()
            .map(|(i, text)| Line {
                number: i + 1,
                text: text.trim(),
            })
            .filter(|line| !line.text.is_empty())
            .collect();
        let mut reader = Self { lines, pos: 0 };
        reader.parse_file()
    }

    // -- Helpers --

    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Line<'a>> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// Line number to report when the input ends early.
    fn line_number(&self) -> usize {
        match self.peek() {
            Some(line) => line.number,
            None => self.lines.last().map_or(1, |line| line.number + 1),
        }
    }

    /// The value of a `FIELD:value` line, if the next line is that field.
    fn field_value(&self, field: &str) -> Option<(usize, &'a str)> {
        let line = self.peek()?;
        let value = line.text.strip_prefix(field)?.strip_prefix(':')?;
        Some((line.number, value.trim()))
    }

    fn expect_field(&mut self, field: &'static str) -> Result<(usize, &'a str)> {
        match self.field_value(field) {
            Some(found) => {
                self.advance();
                Ok(found)
            }
            None => Err(SceneError::MissingField {
                line: self.line_number(),
                field,
            }),
        }
    }

    // -- Top-level --

    fn parse_file(&mut self) -> Result<Vec<Transform>> {
        let mut transforms = Vec::new();
        while let Some(line) = self.peek() {
            if line.text == TRANSFORM_HEADER {
                self.advance();
                transforms.push(self.parse_transform()?);
            } else if is_section_header(line.text) {
                self.skip_section();
            } else {
                return Err(SceneError::UnexpectedLine {
                    line: line.number,
                    content: line.text.to_string(),
                });
            }
        }
        debug!(count = transforms.len(), "parsed scene");
        Ok(transforms)
    }

    fn skip_section(&mut self) {
        let Some(header) = self.advance() else {
            return;
        };
        let mut skipped = 0usize;
        while self.peek().is_some_and(|line| !is_section_header(line.text)) {
            self.advance();
            skipped += 1;
        }
        debug!(
            line = header.number,
            section = header.text,
            skipped,
            "skipping unknown scene section"
        );
    }

    // -- Transform block --

    fn parse_transform(&mut self) -> Result<Transform> {
        let (_, tag) = self.expect_field(TAG_FIELD)?;

        let (line, value) = self.expect_field(POSITION_FIELD)?;
        let position = parse_components(line, POSITION_FIELD, value.split(','))?;

        let (line, value) = self.expect_field(SCALE_FIELD)?;
        let scale = parse_components(line, SCALE_FIELD, value.split(','))?;

        let rotator = match self.field_value(ROTATION_FIELD) {
            Some((line, value)) => {
                self.advance();
                let [pitch, yaw, roll] =
                    parse_components(line, ROTATION_FIELD, value.split_whitespace())?;
                Rotator::new(pitch, yaw, roll)
            }
            None => {
                debug!(line = self.line_number(), "transform has no rotation, using identity");
                Rotator::ZERO
            }
        };

        let mut transform = Transform::from_parts(Vec3::from(position), rotator, Vec3::from(scale));
        transform.set_tag(tag);
        Ok(transform)
    }
}

fn is_section_header(text: &str) -> bool {
    text.starts_with('[') && text.ends_with(']')
}

fn parse_components<'s>(
    line: usize,
    field: &'static str,
    parts: impl Iterator<Item = &'s str>,
) -> Result<[f32; 3]> {
    let parts: Vec<&str> = parts.map(str::trim).collect();
    if parts.len() != 3 {
        return Err(SceneError::WrongArity {
            line,
            field,
            expected: 3,
            found: parts.len(),
        });
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|source| SceneError::InvalidNumber {
            line,
            value: (*part).to_string(),
            source,
        })?;
    }
    Ok(out)
}
