#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use voctext::annotation::AnnotationRecord;

/// Renders a record in the VOC 2005 text layout.
///
/// Multi-object records get the `Image size` and `Objects with ground truth`
/// headers; records without a declared count are written in the
/// single-object layout.
pub fn render_annotation(record: &AnnotationRecord) -> String {
    let mut text = String::from("# PASCAL Annotation Version 1.00\n\n");
    writeln!(text, "Image filename : \"{}\"", record.file_path).unwrap();

    if let Some(size) = record.image_size {
        writeln!(
            text,
            "Image size (X x Y x C) : {} x {} x {}",
            size.width, size.height, size.channels
        )
        .unwrap();
    }

    if let Some(count) = record.num_objects {
        let names: Vec<String> = (1..=record.objects.len())
            .map(|i| format!("\"obj{i}\""))
            .collect();
        writeln!(
            text,
            "Objects with ground truth : {} {{ {} }}",
            count,
            names.join(", ")
        )
        .unwrap();
    }

    for (idx, object) in record.objects.iter().enumerate() {
        let n = idx + 1;
        let b = object.bndbox;
        writeln!(text).unwrap();
        writeln!(text, "# Details for object {n} (\"obj{n}\")").unwrap();
        writeln!(
            text,
            "Original label for object {n} \"obj{n}\" : \"{}\"",
            object.label
        )
        .unwrap();
        writeln!(
            text,
            "Bounding box for object {n} \"obj{n}\" (Xmin, Ymin) - (Xmax, Ymax) : ({}, {}) - ({}, {})",
            b.xmin, b.ymin, b.xmax, b.ymax
        )
        .unwrap();
    }

    text
}

pub fn write_annotation(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write annotation file");
}
