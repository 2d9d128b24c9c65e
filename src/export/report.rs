//! Summary of a batch export.

use serde::Serialize;
use std::fmt;

/// What happened during [`export_dir`](super::export_dir).
#[derive(Clone, Debug, Default, Serialize)]
pub struct ExportReport {
    /// Annotation files found under the root.
    pub scanned: usize,
    /// Files that made it into the document.
    pub exported: usize,
    /// Ground-truth objects across all exported files.
    pub objects: usize,
    /// Files dropped under the skip policy.
    pub skipped: Vec<SkippedFile>,
}

impl ExportReport {
    /// Returns true if every scanned file was exported.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} file(s) scanned, {} exported, {} object(s)",
            self.scanned, self.exported, self.objects
        )?;

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped ({}):", self.skipped.len())?;
            for skipped in &self.skipped {
                writeln!(f, "  - {}: {}", skipped.path, skipped.reason)?;
            }
        }

        Ok(())
    }
}

/// A file left out of the export.
#[derive(Clone, Debug, Serialize)]
pub struct SkippedFile {
    /// Path relative to the export root, `/`-separated.
    pub path: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_complete() {
        let report = ExportReport::default();
        assert!(report.is_complete());
        assert_eq!(
            report.to_string(),
            "  0 file(s) scanned, 0 exported, 0 object(s)\n"
        );
    }

    #[test]
    fn display_lists_skipped_files() {
        let report = ExportReport {
            scanned: 2,
            exported: 1,
            objects: 3,
            skipped: vec![SkippedFile {
                path: "set/bad.txt".into(),
                reason: "no 'Image filename' line found".into(),
            }],
        };

        let text = report.to_string();
        assert!(!report.is_complete());
        assert!(text.contains("Skipped (1):"));
        assert!(text.contains("  - set/bad.txt: no 'Image filename' line found"));
    }
}
