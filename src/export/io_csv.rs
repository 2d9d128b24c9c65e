//! Flat CSV rendition of export documents.
//!
//! One row per ground-truth object:
//!
//! ```text
//! file_path,width,height,channels,label,xmin,ymin,xmax,ymax
//! ```
//!
//! The header row is always written, even for a document with no objects.
//! Size columns are empty for files without an `Image size` line. Files with
//! no objects produce no rows, so this format is lossy for empty images.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use super::ExportDocument;
use crate::error::VoctextError;

const HEADER: [&str; 9] = [
    "file_path", "width", "height", "channels", "label", "xmin", "ymin", "xmax", "ymax",
];

#[derive(Debug, Serialize)]
struct ObjectRow<'a> {
    file_path: &'a str,
    width: Option<u32>,
    height: Option<u32>,
    channels: Option<u32>,
    label: &'a str,
    xmin: u32,
    ymin: u32,
    xmax: u32,
    ymax: u32,
}

fn rows(document: &ExportDocument) -> impl Iterator<Item = ObjectRow<'_>> {
    document.files.iter().flat_map(|record| {
        record.objects.iter().map(move |object| ObjectRow {
            file_path: &record.file_path,
            width: record.image_size.map(|size| size.width),
            height: record.image_size.map(|size| size.height),
            channels: record.image_size.map(|size| size.channels),
            label: &object.label,
            xmin: object.bndbox.xmin,
            ymin: object.bndbox.ymin,
            xmax: object.bndbox.xmax,
            ymax: object.bndbox.ymax,
        })
    })
}

// serde's automatic header only fires on the first record, so it is
// disabled and written by hand.
fn csv_writer<W: std::io::Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(inner)
}

fn write_rows<W: std::io::Write>(
    csv_writer: &mut csv::Writer<W>,
    document: &ExportDocument,
    path: &Path,
) -> Result<(), VoctextError> {
    let to_error = |source| VoctextError::ExportCsvWrite {
        path: path.to_path_buf(),
        source,
    };

    csv_writer.write_record(HEADER).map_err(to_error)?;
    for row in rows(document) {
        csv_writer.serialize(&row).map_err(to_error)?;
    }
    Ok(())
}

/// Writes an export document to a CSV file.
pub fn write_export_csv(path: &Path, document: &ExportDocument) -> Result<(), VoctextError> {
    let file = File::create(path).map_err(VoctextError::Io)?;
    let mut csv_writer = csv_writer(BufWriter::new(file));

    write_rows(&mut csv_writer, document, path)?;
    csv_writer.flush().map_err(VoctextError::Io)
}

/// Writes an export document to a CSV string.
pub fn to_csv_string(document: &ExportDocument) -> Result<String, VoctextError> {
    let dummy_path = Path::new("<string>");
    let mut csv_writer = csv_writer(Vec::new());

    write_rows(&mut csv_writer, document, dummy_path)?;

    let bytes = csv_writer
        .into_inner()
        .map_err(|e| VoctextError::Io(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| VoctextError::InvalidInput {
        path: dummy_path.to_path_buf(),
        message: format!("Invalid UTF-8 in output: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationRecord, BoundingBox, BoundingBoxAnnotation, ImageSize};

    #[test]
    fn writes_one_row_per_object() {
        let document = ExportDocument::new(vec![
            AnnotationRecord {
                file_path: "a.png".into(),
                num_objects: Some(2),
                image_size: Some(ImageSize::new(640, 480, 3)),
                objects: vec![
                    BoundingBoxAnnotation::new("Class_A", BoundingBox::new(206, 242, 427, 365)),
                    BoundingBoxAnnotation::new("Class_B", BoundingBox::new(112, 112, 333, 333)),
                ],
            },
            AnnotationRecord {
                file_path: "b.png".into(),
                num_objects: None,
                image_size: None,
                objects: vec![BoundingBoxAnnotation::new(
                    "bike, red",
                    BoundingBox::new(1, 2, 3, 4),
                )],
            },
            AnnotationRecord::new("empty.png"),
        ]);

        let csv = to_csv_string(&document).expect("csv");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "file_path,width,height,channels,label,xmin,ymin,xmax,ymax",
                "a.png,640,480,3,Class_A,206,242,427,365",
                "a.png,640,480,3,Class_B,112,112,333,333",
                "b.png,,,,\"bike, red\",1,2,3,4",
            ]
        );
    }

    #[test]
    fn empty_document_writes_only_the_header() {
        let csv = to_csv_string(&ExportDocument::default()).expect("csv");
        assert_eq!(csv, "file_path,width,height,channels,label,xmin,ymin,xmax,ymax\n");
    }

    #[test]
    fn objectless_files_write_only_the_header() {
        let document = ExportDocument::new(vec![AnnotationRecord::new("empty.png")]);
        let csv = to_csv_string(&document).expect("csv");
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("file_path,"));
    }
}
