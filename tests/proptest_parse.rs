use proptest::prelude::*;
use voctext::annotation::{parse, AnnotationRecord, BoundingBox, BoundingBoxAnnotation, ImageSize};

mod common;

fn arb_object() -> impl Strategy<Value = BoundingBoxAnnotation> {
    (
        "[A-Za-z][A-Za-z0-9_]{0,11}",
        0u32..2000,
        0u32..2000,
        0u32..2000,
        0u32..2000,
    )
        .prop_map(|(label, x0, y0, x1, y1)| {
            BoundingBoxAnnotation::new(label, BoundingBox::new(x0, y0, x1, y1))
        })
}

fn arb_multi_object_record() -> impl Strategy<Value = AnnotationRecord> {
    (
        "[A-Za-z0-9_/]{1,40}\\.png",
        (1u32..4096, 1u32..4096, 1u32..5),
        prop::collection::vec(arb_object(), 0..8),
    )
        .prop_map(|(file_path, (w, h, c), objects)| AnnotationRecord {
            file_path,
            num_objects: Some(objects.len() as u32),
            image_size: Some(ImageSize::new(w, h, c)),
            objects,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn declared_count_matches_parsed_objects(record in arb_multi_object_record()) {
        let parsed = parse(&common::render_annotation(&record)).expect("parse rendered text");
        prop_assert_eq!(parsed.objects.len(), record.objects.len());
        prop_assert_eq!(parsed, record);
    }

    #[test]
    fn dropping_a_box_line_never_parses(record in arb_multi_object_record()) {
        prop_assume!(!record.objects.is_empty());

        let text = common::render_annotation(&record);
        let mut dropped = false;
        let truncated: String = text
            .lines()
            .filter(|line| {
                if !dropped && line.starts_with("Bounding box") {
                    dropped = true;
                    return false;
                }
                true
            })
            .map(|line| format!("{line}\n"))
            .collect();

        prop_assert!(parse(&truncated).is_err());
    }
}
