//! Validation of parsed annotation records.
//!
//! The parser keeps records faithful to their source text, so it does not
//! reject data-quality problems such as inverted or out-of-image boxes.
//! This module reports them instead:
//! - Structural consistency (declared object counts, unique file paths)
//! - Data quality (non-empty paths and labels, valid dimensions)
//! - Geometric validity (ordered boxes, positive area, inside the image)
//! - Optionally, agreement between declared and on-disk image sizes

mod report;

pub use report::{IssueCode, IssueContext, Severity, ValidationIssue, ValidationReport};

use std::collections::HashMap;
use std::path::PathBuf;

use crate::annotation::AnnotationRecord;
use crate::export::ExportDocument;

/// Options for validation behavior.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,

    /// Directory that record file paths are relative to. When set, the real
    /// image dimensions are compared with the declared `Image size`.
    pub images_root: Option<PathBuf>,
}

/// Validates every record of a document and returns a report of all issues.
pub fn validate_document(document: &ExportDocument, opts: &ValidateOptions) -> ValidationReport {
    let mut report = ValidationReport::new();
    let mut seen_paths: HashMap<&str, usize> = HashMap::new();

    if document.num_images != document.files.len() {
        report.add(ValidationIssue::error(
            IssueCode::NumImagesMismatch,
            format!(
                "NumImages is {} but the document lists {} file(s)",
                document.num_images,
                document.files.len()
            ),
            IssueContext::Document,
        ));
    }

    for (idx, record) in document.files.iter().enumerate() {
        if !record.file_path.is_empty() {
            if let Some(first_idx) = seen_paths.get(record.file_path.as_str()) {
                report.add(ValidationIssue::error(
                    IssueCode::DuplicateFilePath,
                    format!(
                        "Duplicate file path (first seen at index {})",
                        first_idx
                    ),
                    IssueContext::file(&record.file_path),
                ));
            } else {
                seen_paths.insert(&record.file_path, idx);
            }
        }

        validate_record(record, &mut report);

        if let Some(root) = &opts.images_root {
            validate_image_on_disk(record, root, &mut report);
        }
    }

    report
}

/// Validates a single record, appending issues to `report`.
pub fn validate_record(record: &AnnotationRecord, report: &mut ValidationReport) {
    let path = record.file_path.as_str();

    if path.is_empty() {
        report.add(ValidationIssue::error(
            IssueCode::EmptyFilePath,
            "Empty file path",
            IssueContext::file(path),
        ));
    }

    if let Some(declared) = record.num_objects {
        if declared as usize != record.objects.len() {
            report.add(ValidationIssue::error(
                IssueCode::ObjectCountMismatch,
                format!(
                    "Declares {} object(s) but lists {}",
                    declared,
                    record.objects.len()
                ),
                IssueContext::file(path),
            ));
        }
    }

    if let Some(size) = record.image_size {
        if size.width == 0 || size.height == 0 {
            report.add(ValidationIssue::error(
                IssueCode::InvalidImageDimensions,
                format!(
                    "Invalid dimensions {}x{} (must be positive)",
                    size.width, size.height
                ),
                IssueContext::file(path),
            ));
        }
    }

    for (idx, object) in record.objects.iter().enumerate() {
        let context = IssueContext::object(path, idx + 1);
        let bbox = object.bndbox;

        if object.label.is_empty() {
            report.add(ValidationIssue::warning(
                IssueCode::EmptyLabel,
                "Empty label",
                context.clone(),
            ));
        }

        if !bbox.is_ordered() {
            report.add(ValidationIssue::error(
                IssueCode::InvalidBBoxOrdering,
                format!(
                    "Invalid ordering: min ({}, {}) should be <= max ({}, {})",
                    bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax
                ),
                context.clone(),
            ));
        } else if bbox.area() == 0 {
            report.add(ValidationIssue::warning(
                IssueCode::DegenerateBBox,
                format!("Zero area box {}", bbox),
                context.clone(),
            ));
        }

        // VOC 2005 pixels are 1-based and inclusive, so xmax == width is fine.
        if let Some(size) = record.image_size {
            if bbox.xmax > size.width || bbox.ymax > size.height {
                report.add(ValidationIssue::warning(
                    IssueCode::BBoxOutOfBounds,
                    format!(
                        "Bounding box {} extends outside image bounds {}x{}",
                        bbox, size.width, size.height
                    ),
                    context,
                ));
            }
        }
    }
}

fn validate_image_on_disk(
    record: &AnnotationRecord,
    root: &std::path::Path,
    report: &mut ValidationReport,
) {
    if record.file_path.is_empty() {
        return;
    }

    let image_path = root.join(&record.file_path);
    let actual = match imagesize::size(&image_path) {
        Ok(actual) => actual,
        Err(err) => {
            report.add(ValidationIssue::warning(
                IssueCode::ImageNotFound,
                format!("Cannot read {}: {}", image_path.display(), err),
                IssueContext::file(&record.file_path),
            ));
            return;
        }
    };

    let Some(declared) = record.image_size else {
        return;
    };

    if actual.width != declared.width as usize || actual.height != declared.height as usize {
        report.add(ValidationIssue::error(
            IssueCode::ImageSizeMismatch,
            format!(
                "Declared size {}x{} but image is {}x{}",
                declared.width, declared.height, actual.width, actual.height
            ),
            IssueContext::file(&record.file_path),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{BoundingBox, BoundingBoxAnnotation, ImageSize};

    fn valid_record(path: &str) -> AnnotationRecord {
        AnnotationRecord {
            file_path: path.into(),
            num_objects: Some(1),
            image_size: Some(ImageSize::new(640, 480, 3)),
            objects: vec![BoundingBoxAnnotation::new(
                "motorbike",
                BoundingBox::new(10, 20, 100, 200),
            )],
        }
    }

    fn valid_document() -> ExportDocument {
        ExportDocument::new(vec![valid_record("a.png"), valid_record("b.png")])
    }

    fn has_code(report: &ValidationReport, code: IssueCode) -> bool {
        report.issues.iter().any(|i| i.code == code)
    }

    #[test]
    fn test_valid_document() {
        let report = validate_document(&valid_document(), &ValidateOptions::default());
        assert!(
            report.is_clean(),
            "Expected no issues, got: {:?}",
            report.issues
        );
    }

    #[test]
    fn test_num_images_mismatch() {
        let json = r#"{"Files":[{"FilePath":"a.png","object":[]}],"NumImages":7}"#;
        let document = crate::export::io_json::from_json_str(json).expect("parse json");

        let report = validate_document(&document, &ValidateOptions::default());
        assert_eq!(report.error_count(), 1);
        assert!(has_code(&report, IssueCode::NumImagesMismatch));
        assert!(matches!(report.issues[0].context, IssueContext::Document));
    }

    #[test]
    fn test_duplicate_file_path() {
        let document = ExportDocument::new(vec![
            valid_record("a.png"),
            valid_record("b.png"),
            valid_record("a.png"),
        ]);

        let report = validate_document(&document, &ValidateOptions::default());
        assert_eq!(report.error_count(), 1);
        assert!(has_code(&report, IssueCode::DuplicateFilePath));
    }

    #[test]
    fn test_empty_file_path() {
        let document = ExportDocument::new(vec![valid_record("")]);

        let report = validate_document(&document, &ValidateOptions::default());
        assert_eq!(report.error_count(), 1);
        assert!(has_code(&report, IssueCode::EmptyFilePath));
    }

    #[test]
    fn test_declared_count_mismatch() {
        let mut record = valid_record("a.png");
        record.num_objects = Some(3);

        let mut report = ValidationReport::new();
        validate_record(&record, &mut report);
        assert!(has_code(&report, IssueCode::ObjectCountMismatch));
    }

    #[test]
    fn test_invalid_image_dimensions() {
        let mut record = valid_record("a.png");
        record.image_size = Some(ImageSize::new(0, 480, 3));
        record.objects.clear();
        record.num_objects = Some(0);

        let mut report = ValidationReport::new();
        validate_record(&record, &mut report);
        assert_eq!(report.error_count(), 1);
        assert!(has_code(&report, IssueCode::InvalidImageDimensions));
    }

    #[test]
    fn test_bbox_invalid_ordering() {
        let mut record = valid_record("a.png");
        record.objects[0].bndbox = BoundingBox::new(100, 20, 10, 200);

        let mut report = ValidationReport::new();
        validate_record(&record, &mut report);
        assert!(has_code(&report, IssueCode::InvalidBBoxOrdering));
        assert!(!has_code(&report, IssueCode::DegenerateBBox));
    }

    #[test]
    fn test_degenerate_bbox() {
        let mut record = valid_record("a.png");
        record.objects[0].bndbox = BoundingBox::new(10, 20, 10, 200);

        let mut report = ValidationReport::new();
        validate_record(&record, &mut report);
        assert_eq!(report.warning_count(), 1);
        assert!(has_code(&report, IssueCode::DegenerateBBox));
    }

    #[test]
    fn test_bbox_out_of_bounds() {
        let mut record = valid_record("a.png");
        record.objects[0].bndbox = BoundingBox::new(600, 400, 641, 480);

        let mut report = ValidationReport::new();
        validate_record(&record, &mut report);
        assert!(has_code(&report, IssueCode::BBoxOutOfBounds));

        record.objects[0].bndbox = BoundingBox::new(600, 400, 640, 480);
        let mut report = ValidationReport::new();
        validate_record(&record, &mut report);
        assert!(report.is_clean());
    }

    #[test]
    fn test_bounds_skipped_without_size() {
        let mut record = valid_record("a.png");
        record.image_size = None;
        record.objects[0].bndbox = BoundingBox::new(1, 1, 5000, 5000);

        let mut report = ValidationReport::new();
        validate_record(&record, &mut report);
        assert!(report.is_clean());
    }

    #[test]
    fn test_empty_label() {
        let mut record = valid_record("a.png");
        record.objects[0].label = String::new();

        let mut report = ValidationReport::new();
        validate_record(&record, &mut report);
        assert_eq!(report.warning_count(), 1);
        assert!(has_code(&report, IssueCode::EmptyLabel));
    }

    #[test]
    fn test_missing_image_on_disk() {
        let temp = tempfile::tempdir().expect("tempdir");
        let opts = ValidateOptions {
            images_root: Some(temp.path().to_path_buf()),
            ..Default::default()
        };

        let report = validate_document(&valid_document(), &opts);
        assert_eq!(report.warning_count(), 2);
        assert!(has_code(&report, IssueCode::ImageNotFound));
    }

    #[test]
    fn test_image_size_mismatch() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::write(temp.path().join("a.png"), png_header(320, 240)).expect("write png");
        std::fs::write(temp.path().join("b.png"), png_header(640, 480)).expect("write png");
        let opts = ValidateOptions {
            images_root: Some(temp.path().to_path_buf()),
            ..Default::default()
        };

        let report = validate_document(&valid_document(), &opts);
        assert_eq!(report.error_count(), 1);
        assert!(has_code(&report, IssueCode::ImageSizeMismatch));
    }

    // Signature plus IHDR chunk: enough for header-only size probing.
    fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&[8, 2, 0, 0, 0]);
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes
    }
}
