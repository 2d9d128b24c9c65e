//! PASCAL VOC 2005 text annotations.
//!
//! The VOC 2005 challenge shipped its ground truth as line-oriented text
//! files rather than XML. A typical multi-object file looks like this:
//!
//! ```text
//! # PASCAL Annotation Version 1.00
//!
//! Image filename : "VOC2005_1/PNGImages/ETHZ_motorbike-testset/motorbikes005.png"
//! Image size (X x Y x C) : 640 x 480 x 3
//! Objects with ground truth : 1 { "PASmotorbikeSide" }
//!
//! # Details for object 1 ("PASmotorbikeSide")
//! Original label for object 1 "PASmotorbikeSide" : "motorbike"
//! Bounding box for object 1 "PASmotorbikeSide" (Xmin, Ymin) - (Xmax, Ymax) : (206, 242) - (427, 365)
//! ```
//!
//! [`parse`] turns one such block into an [`AnnotationRecord`].
//!
//! # Example
//!
//! ```
//! use voctext::annotation::parse;
//!
//! let record = parse(
//!     "Image filename : \"img.png\"\n\
//!      Original label for object 1 \"A\" : \"car\"\n\
//!      Bounding box for object 1 \"A\" (Xmin, Ymin) - (Xmax, Ymax) : (1, 2) - (30, 40)\n",
//! )
//! .unwrap();
//!
//! assert_eq!(record.file_path, "img.png");
//! assert_eq!(record.objects[0].label, "car");
//! assert_eq!(record.objects[0].bndbox.xmax, 30);
//! ```

mod model;
mod parse;

pub use model::{AnnotationRecord, BoundingBox, BoundingBoxAnnotation, ImageSize};
pub use parse::{parse, parse_slice, parse_with, BoxOrderPolicy, Field, ParseError, ParseOptions};
