//! Issues found while checking an export document.
//!
//! Every issue carries a severity, a stable code and the file or object it
//! concerns. The CLI prints the `Display` form or serializes the issues.

use serde::Serialize;
use std::fmt;

/// Everything [`validate_document`](super::validate_document) found.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    /// In the order they were found: document, then per file.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// True when only warnings (or nothing) were found.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s) and {} warning(s):",
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// One problem with a record, an object, or the document itself.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    pub context: IssueContext,
}

impl ValidationIssue {
    pub fn new(
        severity: Severity,
        code: IssueCode,
        message: impl Into<String>,
        context: IssueContext,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            context,
        }
    }

    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Error, code, message, context)
    }

    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self::new(Severity::Warning, code, message, context)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// Errors fail `voctext validate`; warnings only fail it with `--strict`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Suspicious data that is still usable.
    Warning,
    /// Invalid or inconsistent data.
    Error,
}

/// Issue codes, printed verbatim in text and JSON reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Document issues
    /// `NumImages` disagrees with the number of listed files.
    NumImagesMismatch,

    // Record issues
    /// A record has an empty file path.
    EmptyFilePath,
    /// Two records declare the same file path.
    DuplicateFilePath,
    /// `numobjects` disagrees with the number of listed objects.
    ObjectCountMismatch,
    /// Declared image width or height is zero.
    InvalidImageDimensions,

    // Object issues
    /// An object has an empty label.
    EmptyLabel,
    /// A bounding box has min > max on some axis.
    InvalidBBoxOrdering,
    /// A bounding box has zero area.
    DegenerateBBox,
    /// A bounding box extends past the declared image size.
    BBoxOutOfBounds,

    // On-disk image issues
    /// The referenced image could not be read.
    ImageNotFound,
    /// The declared size disagrees with the image file.
    ImageSizeMismatch,
}

/// Where an issue was found.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueContext {
    /// The export document as a whole.
    Document,
    /// Issue with a whole annotation file.
    File { path: String },
    /// Issue with one object (1-based index) of an annotation file.
    Object { path: String, index: usize },
}

impl IssueContext {
    pub fn file(path: impl Into<String>) -> Self {
        IssueContext::File { path: path.into() }
    }

    pub fn object(path: impl Into<String>, index: usize) -> Self {
        IssueContext::Object {
            path: path.into(),
            index,
        }
    }
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Document => write!(f, "document"),
            IssueContext::File { path } => write!(f, "file '{}'", path),
            IssueContext::Object { path, index } => {
                write!(f, "object {} of '{}'", index, path)
            }
        }
    }
}
