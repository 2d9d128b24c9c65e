//! Line-oriented parser for VOC 2005 text annotations.
//!
//! Each line is classified by the first marker token it contains, checked in
//! a fixed priority order. Classified lines are split on their first `:` and
//! the value to the right is decoded according to the marker. Everything
//! else (comments, `Database`, `Pixel mask`, blank lines) is ignored.
//!
//! Labels and boxes are paired by order of appearance, not by the object
//! index written in the line text. Files that list objects out of index
//! order therefore pair by position.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::model::{AnnotationRecord, BoundingBox, BoundingBoxAnnotation, ImageSize};

/// Marker tokens in priority order. The first one contained in a line wins.
const MARKERS: [(&str, Field); 5] = [
    ("filename", Field::FileName),
    ("Image size", Field::ImageSize),
    ("Objects with ground truth", Field::ObjectCount),
    ("Original", Field::Label),
    ("Bounding", Field::BoundingBox),
];

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([^"']*)["']"#).expect("quoted-string pattern is valid"));

static BOX_TUPLES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*\(\s*([^,()\s]+)\s*,\s*([^,()\s]+)\s*\)\s*-\s*\(\s*([^,()\s]+)\s*,\s*([^,()\s]+)\s*\)\s*$",
    )
    .expect("bounding-box pattern is valid")
});

static SIZE_TRIPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+?)\s*x\s*(\S+?)\s*x\s*(\S+?)\s*$").expect("image-size pattern is valid")
});

/// The semantic role of a classified line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    FileName,
    ImageSize,
    ObjectCount,
    Label,
    BoundingBox,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::FileName => "image filename",
            Field::ImageSize => "image size",
            Field::ObjectCount => "object count",
            Field::Label => "original label",
            Field::BoundingBox => "bounding box",
        };
        f.write_str(name)
    }
}

/// Why an annotation block could not be turned into a record.
///
/// Line numbers are 1-based. Object numbers are 1-based positions in
/// declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no 'Image filename' line found")]
    MissingFilename,

    #[error("object {object} has a bounding box but no 'Original label' line")]
    MissingLabel { object: usize },

    #[error("object {object} has a label but no 'Bounding box' line")]
    MissingBoundingBox { object: usize },

    #[error(
        "declared {declared} object(s) but found {labels} label line(s) and {boxes} bounding box line(s)"
    )]
    ObjectCountMismatch {
        declared: u32,
        labels: usize,
        boxes: usize,
    },

    #[error("line {line}: malformed {field} value '{value}' (expected non-negative integers)")]
    MalformedNumber {
        line: usize,
        field: Field,
        value: String,
    },

    #[error("line {line}: {field} has no quoted value")]
    MalformedQuotedString { line: usize, field: Field },

    #[error("line {line}: {field} line has no ':' separator")]
    MissingSeparator { line: usize, field: Field },

    #[error("line {line}: {field} declared more than once")]
    DuplicateField { line: usize, field: Field },

    #[error("object {object}: bounding box {bbox} has min > max")]
    InvalidBoxOrdering { object: usize, bbox: BoundingBox },

    #[error("input is not valid UTF-8: {0}")]
    InvalidUtf8(#[source] std::str::Utf8Error),
}

/// How to treat boxes whose min corner lies past their max corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoxOrderPolicy {
    /// Keep the box as written; validation reports it later.
    #[default]
    Allow,
    /// Fail the parse with [`ParseError::InvalidBoxOrdering`].
    Reject,
}

/// Options for [`parse_with`].
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    pub box_order: BoxOrderPolicy,
}

/// Parses one annotation block with default options.
pub fn parse(text: &str) -> Result<AnnotationRecord, ParseError> {
    parse_with(text, &ParseOptions::default())
}

/// Parses one annotation block.
pub fn parse_with(text: &str, opts: &ParseOptions) -> Result<AnnotationRecord, ParseError> {
    let mut acc = Accumulator::default();
    for (idx, line) in text.lines().enumerate() {
        acc.feed(idx + 1, line)?;
    }
    acc.finish(opts)
}

/// Parses one annotation block from bytes. The input must be valid UTF-8.
///
/// Primarily useful for fuzzing and benchmarks.
pub fn parse_slice(bytes: &[u8]) -> Result<AnnotationRecord, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(ParseError::InvalidUtf8)?;
    parse(text)
}

fn classify(line: &str) -> Option<Field> {
    MARKERS
        .iter()
        .find(|(marker, _)| line.contains(marker))
        .map(|(_, field)| *field)
}

/// Marker results collected during the scan. Only read by `finish`.
#[derive(Debug, Default)]
struct Accumulator {
    file_path: Option<String>,
    image_size: Option<ImageSize>,
    declared: Option<u32>,
    labels: Vec<String>,
    boxes: Vec<BoundingBox>,
}

impl Accumulator {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let Some(field) = classify(line) else {
            return Ok(());
        };

        let (_, value) = line
            .split_once(':')
            .ok_or(ParseError::MissingSeparator {
                line: line_no,
                field,
            })?;

        match field {
            Field::FileName => {
                let path = first_quoted(value, line_no, field)?;
                set_once(&mut self.file_path, path, line_no, field)
            }
            Field::ImageSize => {
                let size = parse_image_size(value, line_no)?;
                set_once(&mut self.image_size, size, line_no, field)
            }
            Field::ObjectCount => {
                let count = parse_object_count(value, line_no)?;
                set_once(&mut self.declared, count, line_no, field)
            }
            Field::Label => {
                let label = first_quoted(value, line_no, field)?;
                self.labels.push(label);
                Ok(())
            }
            Field::BoundingBox => {
                let bbox = parse_bbox(value, line_no)?;
                self.boxes.push(bbox);
                Ok(())
            }
        }
    }

    fn finish(self, opts: &ParseOptions) -> Result<AnnotationRecord, ParseError> {
        let file_path = self.file_path.ok_or(ParseError::MissingFilename)?;

        // Single-object files carry no header and always describe one object.
        let expected = self.declared.unwrap_or(1);
        let expected_len = expected as usize;
        let (labels, boxes) = (self.labels.len(), self.boxes.len());

        if labels != expected_len || boxes != expected_len {
            return Err(if boxes == expected_len && labels < expected_len {
                ParseError::MissingLabel { object: labels + 1 }
            } else if labels == expected_len && boxes < expected_len {
                ParseError::MissingBoundingBox { object: boxes + 1 }
            } else {
                ParseError::ObjectCountMismatch {
                    declared: expected,
                    labels,
                    boxes,
                }
            });
        }

        let mut objects = Vec::with_capacity(expected_len);
        for (idx, (label, bbox)) in self.labels.into_iter().zip(self.boxes).enumerate() {
            if opts.box_order == BoxOrderPolicy::Reject && !bbox.is_ordered() {
                return Err(ParseError::InvalidBoxOrdering {
                    object: idx + 1,
                    bbox,
                });
            }
            objects.push(BoundingBoxAnnotation::new(label, bbox));
        }

        Ok(AnnotationRecord {
            file_path,
            num_objects: self.declared,
            image_size: self.image_size,
            objects,
        })
    }
}

fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    line: usize,
    field: Field,
) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::DuplicateField { line, field });
    }
    *slot = Some(value);
    Ok(())
}

fn first_quoted(value: &str, line: usize, field: Field) -> Result<String, ParseError> {
    QUOTED
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ParseError::MalformedQuotedString { line, field })
}

fn parse_u32(token: &str, line: usize, field: Field) -> Result<u32, ParseError> {
    // `u32::from_str` accepts a leading '+', which never appears in real files.
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(token, line, field));
    }
    token.parse().map_err(|_| malformed(token, line, field))
}

fn malformed(value: &str, line: usize, field: Field) -> ParseError {
    ParseError::MalformedNumber {
        line,
        field,
        value: value.trim().to_string(),
    }
}

fn parse_image_size(value: &str, line: usize) -> Result<ImageSize, ParseError> {
    let field = Field::ImageSize;
    let caps = SIZE_TRIPLE
        .captures(value)
        .ok_or_else(|| malformed(value, line, field))?;

    Ok(ImageSize::new(
        parse_u32(&caps[1], line, field)?,
        parse_u32(&caps[2], line, field)?,
        parse_u32(&caps[3], line, field)?,
    ))
}

fn parse_object_count(value: &str, line: usize) -> Result<u32, ParseError> {
    // The trailing `{ "A", "B" }` name list is informational only.
    let token = value.split_whitespace().next().unwrap_or_default();
    parse_u32(token, line, Field::ObjectCount)
}

fn parse_bbox(value: &str, line: usize) -> Result<BoundingBox, ParseError> {
    let field = Field::BoundingBox;
    let caps = BOX_TUPLES
        .captures(value)
        .ok_or_else(|| malformed(value, line, field))?;

    Ok(BoundingBox::new(
        parse_u32(&caps[1], line, field)?,
        parse_u32(&caps[2], line, field)?,
        parse_u32(&caps[3], line, field)?,
        parse_u32(&caps[4], line, field)?,
    ))
}
