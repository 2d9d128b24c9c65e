//! Record types produced by the annotation parser.
//!
//! Field names on the wire follow the JSON layout that VOC 2005 exports
//! have historically used (`FilePath`, `numobjects`, `imagesize`,
//! `object`, `bndbox`), so existing consumers keep working.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One parsed annotation file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Image path as declared in the `Image filename` line.
    #[serde(rename = "FilePath")]
    pub file_path: String,

    /// Declared object count. `None` for single-object files, which have
    /// no `Objects with ground truth` header.
    #[serde(
        rename = "numobjects",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub num_objects: Option<u32>,

    /// Declared image dimensions, when the file has an `Image size` line.
    #[serde(rename = "imagesize", default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,

    /// Ground-truth objects in declaration order.
    #[serde(rename = "object", default)]
    pub objects: Vec<BoundingBoxAnnotation>,
}

impl AnnotationRecord {
    /// Creates a record with no size, no declared count and no objects.
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            num_objects: None,
            image_size: None,
            objects: Vec::new(),
        }
    }
}

/// Image dimensions from the `Image size (X x Y x C)` line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32, channels: u32) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// A labeled ground-truth box.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBoxAnnotation {
    /// Class name from the `Original label` line.
    pub label: String,

    /// Pixel box from the matching `Bounding box` line.
    pub bndbox: BoundingBox,
}

impl BoundingBoxAnnotation {
    pub fn new(label: impl Into<String>, bndbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            bndbox,
        }
    }
}

/// An axis-aligned box in pixel coordinates.
///
/// VOC 2005 uses 1-based inclusive pixel coordinates: the top-left pixel
/// of an image is `(1, 1)`. Inverted boxes (`xmin > xmax`) can be
/// represented so that validation can report them instead of the parser
/// silently dropping data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

impl BoundingBox {
    pub fn new(xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Returns true if `xmin <= xmax` and `ymin <= ymax`.
    pub fn is_ordered(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }

    /// Horizontal extent, zero for inverted boxes.
    pub fn width(&self) -> u32 {
        self.xmax.saturating_sub(self.xmin)
    }

    /// Vertical extent, zero for inverted boxes.
    pub fn height(&self) -> u32 {
        self.ymax.saturating_sub(self.ymin)
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) - ({}, {})",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}
