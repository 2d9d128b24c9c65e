//! Batch export of VOC 2005 annotation trees.
//!
//! The exporter walks a directory (typically `VOC2005_1/Annotations`, which
//! holds one sub-directory per image set), parses every annotation file and
//! aggregates the records into a single [`ExportDocument`].
//!
//! Files are parsed in parallel. Results are merged on the calling thread in
//! path order, so the output is deterministic regardless of scheduling.

pub mod io_csv;
pub mod io_json;
mod report;

pub use report::{ExportReport, SkippedFile};

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::annotation::{self, AnnotationRecord, ParseOptions};
use crate::error::VoctextError;

const DEFAULT_EXTENSION: &str = "txt";

/// All records exported from one annotation tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(rename = "Files")]
    pub files: Vec<AnnotationRecord>,

    /// Always equal to `files.len()` for documents built by this crate.
    #[serde(rename = "NumImages")]
    pub num_images: usize,
}

impl ExportDocument {
    pub fn new(files: Vec<AnnotationRecord>) -> Self {
        let num_images = files.len();
        Self { files, num_images }
    }

    /// Total number of ground-truth objects across all files.
    pub fn object_count(&self) -> usize {
        self.files.iter().map(|record| record.objects.len()).sum()
    }
}

/// What to do when a single file fails to read or parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop at the first failing file (in path order).
    #[default]
    Abort,
    /// Log the failure, record it in the report and carry on.
    Skip,
}

/// Options for [`export_dir`].
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// File extensions to treat as annotation files (case-insensitive).
    /// An empty list selects every regular file.
    pub extensions: Vec<String>,
    pub on_error: ErrorPolicy,
    pub parse: ParseOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            on_error: ErrorPolicy::default(),
            parse: ParseOptions::default(),
        }
    }
}

/// Output encodings for an [`ExportDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_name(name: &str) -> Result<Self, VoctextError> {
        match name {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(VoctextError::UnsupportedFormat(format!(
                "'{}' (supported: json, csv)",
                other
            ))),
        }
    }
}

/// Reads and parses a single annotation file.
pub fn parse_file(path: &Path, opts: &ParseOptions) -> Result<AnnotationRecord, VoctextError> {
    let text = fs::read_to_string(path).map_err(|source| VoctextError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let record =
        annotation::parse_with(&text, opts).map_err(|source| VoctextError::AnnotationParse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        "parsed {} ({} object(s))",
        path.display(),
        record.objects.len()
    );
    Ok(record)
}

/// Lists annotation files under `root`, sorted by their path relative to it.
pub fn collect_annotation_files(
    root: &Path,
    opts: &ExportOptions,
) -> Result<Vec<PathBuf>, VoctextError> {
    if !root.is_dir() {
        return Err(VoctextError::InvalidInput {
            path: root.to_path_buf(),
            message: "annotation root must be a directory".to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| VoctextError::Traverse {
            path: root.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), &opts.extensions) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_by_cached_key(|path| rel_string(root, path));
    Ok(files)
}

/// Parses every annotation file under `root` into one document.
pub fn export_dir(
    root: &Path,
    opts: &ExportOptions,
) -> Result<(ExportDocument, ExportReport), VoctextError> {
    let paths = collect_annotation_files(root, opts)?;
    info!(
        "found {} annotation file(s) under {}",
        paths.len(),
        root.display()
    );

    let outcomes: Vec<Result<AnnotationRecord, VoctextError>> = paths
        .par_iter()
        .map(|path| parse_file(path, &opts.parse))
        .collect();

    let mut report = ExportReport {
        scanned: paths.len(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(paths.len());

    for (path, outcome) in paths.iter().zip(outcomes) {
        match outcome {
            Ok(record) => records.push(record),
            Err(err) => match opts.on_error {
                ErrorPolicy::Abort => return Err(err),
                ErrorPolicy::Skip => {
                    warn!("skipping {}: {}", path.display(), err);
                    report.skipped.push(SkippedFile {
                        path: rel_string(root, path),
                        reason: skip_reason(&err),
                    });
                }
            },
        }
    }

    let document = ExportDocument::new(records);
    report.exported = document.num_images;
    report.objects = document.object_count();
    info!(
        "exported {} file(s), {} object(s), skipped {}",
        report.exported,
        report.objects,
        report.skipped.len()
    );

    Ok((document, report))
}

/// Writes `document` to `path` in the requested format.
pub fn write_export(
    path: &Path,
    document: &ExportDocument,
    format: ExportFormat,
) -> Result<(), VoctextError> {
    match format {
        ExportFormat::Json => io_json::write_export_json(path, document),
        ExportFormat::Csv => io_csv::write_export_csv(path, document),
    }
}

fn skip_reason(err: &VoctextError) -> String {
    // The path is already part of the report entry.
    match err {
        VoctextError::AnnotationParse { source, .. } => source.to_string(),
        VoctextError::Read { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

fn has_extension(path: &Path, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext.trim_start_matches('.')))
}

fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
