//! JSON serialization for export documents.
//!
//! The layout is `{"Files": [...], "NumImages": n}` with one record per
//! annotation file.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::ExportDocument;
use crate::error::VoctextError;

/// Reads an export document from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_export_json(path: &Path) -> Result<ExportDocument, VoctextError> {
    let file = File::open(path).map_err(|source| VoctextError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| VoctextError::ExportJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes an export document to a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_export_json(path: &Path, document: &ExportDocument) -> Result<(), VoctextError> {
    let file = File::create(path).map_err(VoctextError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, document).map_err(|source| {
        VoctextError::ExportJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(VoctextError::Io)
}

/// Reads an export document from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<ExportDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Writes an export document to a JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(document: &ExportDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}
