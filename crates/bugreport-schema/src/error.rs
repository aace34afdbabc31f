//! # Error Types — Validation Failures
//!
//! One variant per failure class a bug report file can exhibit. Every
//! variant's `Display` text is the diagnostic printed to the user, and
//! embeds the offending value or object as compact JSON so the failing
//! entry can be located in the file.
//!
//! ## Design
//!
//! - Validation is first-failure-wins: a check returns the first
//!   `ReportError` it hits and nothing downstream runs.
//! - Errors carry `String` payloads rather than borrowed JSON so they can
//!   outlive the parsed document.

use thiserror::Error;

/// Error produced while loading or validating a bug report file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The file could not be read.
    #[error("JSON cannot be loaded from {path}: {reason}")]
    Load {
        /// Path of the file that failed to load.
        path: String,
        /// Underlying IO failure.
        reason: String,
    },

    /// The file content is not valid JSON.
    #[error("JSON cannot be loaded: {0}")]
    Parse(String),

    /// A top-level key is neither `metadata` nor `data_v<semver>`.
    #[error("Unexpected object name {0}.")]
    UnexpectedObject(String),

    /// The document has no `metadata` key.
    #[error("No metadata object.")]
    MissingMetadata,

    /// A value has the wrong JSON container or scalar type.
    #[error("{what} should be {expected}.")]
    Shape {
        /// Description of the offending value (e.g. `categories`).
        what: String,
        /// Expected type, with article (e.g. `an array`).
        expected: &'static str,
    },

    /// An object carries a key outside its closed field set.
    #[error("Unexpected option '{field}' in {kind}.")]
    UnknownField {
        /// Object kind (`metadata`, `question`, `category`).
        kind: &'static str,
        /// The unrecognised key.
        field: String,
    },

    /// A required key is absent.
    #[error("Missing {field} in {kind} {object}.")]
    MissingField {
        /// Object kind.
        kind: &'static str,
        /// The required key that was not found.
        field: &'static str,
        /// The offending object, rendered as JSON.
        object: String,
    },

    /// `metadata.version` does not start with `major.minor.patch`.
    #[error("Version ({0}) doesn't match pattern.")]
    VersionPattern(String),

    /// No `data_v<version>` block exists for the declared version.
    #[error("No data object matching version {0}.")]
    MissingDataBlock(String),

    /// Two questions share an id.
    #[error("Question id should be unique ({0}).")]
    DuplicateQuestionId(String),

    /// An open question's `maxChar` exceeds the allowed limit.
    #[error("MaxChar is too damn high in question {object} (limit {limit}).")]
    MaxCharTooHigh {
        /// The offending question, rendered as JSON.
        object: String,
        /// The inclusive upper bound.
        limit: u64,
    },

    /// A field is present that the question's `type` forbids.
    #[error("{field} should not be present in {question_type} question {object}.")]
    DisallowedField {
        /// The forbidden key.
        field: &'static str,
        /// The question type that forbids it.
        question_type: String,
        /// The offending question, rendered as JSON.
        object: String,
    },

    /// The question `type` is not `open`, `choice` or `multichoice`.
    #[error("Wrong type in question {0}.")]
    UnknownQuestionType(String),

    /// A category references a question id that was never declared.
    #[error("Questions referring to non-existing question {id} in category {object}.")]
    DanglingReference {
        /// The unresolved id.
        id: String,
        /// The offending category, rendered as JSON.
        object: String,
    },

    /// A category references the same question id twice.
    #[error("Questions contains duplicate {id} in category {object}.")]
    DuplicateReference {
        /// The repeated id.
        id: String,
        /// The offending category, rendered as JSON.
        object: String,
    },

    /// The document's format version cannot be used by the questionnaire flow.
    #[error("unsupported format version {found} (expected {expected})")]
    UnsupportedFormatVersion {
        /// Version declared in the document.
        found: String,
        /// Version the flow understands.
        expected: &'static str,
    },
}

impl ReportError {
    /// The human-readable diagnostic for this failure.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Collapse a validation result into the `(succeeded, error message)` pair
/// reported by the command-line tool. The message is empty on success.
pub fn validation_outcome<T>(result: &Result<T, ReportError>) -> (bool, String) {
    match result {
        Ok(_) => (true, String::new()),
        Err(e) => (false, e.message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_embeds_object() {
        let err = ReportError::MissingField {
            kind: "question",
            field: "text",
            object: r#"{"id":3}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"Missing text in question {"id":3}."#);
    }

    #[test]
    fn shape_message() {
        let err = ReportError::Shape {
            what: "categories".to_string(),
            expected: "an array",
        };
        assert_eq!(err.message(), "categories should be an array.");
    }

    #[test]
    fn outcome_success_has_empty_message() {
        let ok: Result<(), ReportError> = Ok(());
        assert_eq!(validation_outcome(&ok), (true, String::new()));
    }

    #[test]
    fn outcome_failure_carries_message() {
        let err: Result<(), ReportError> =
            Err(ReportError::MissingDataBlock("2.0.0".to_string()));
        let (ok, msg) = validation_outcome(&err);
        assert!(!ok);
        assert_eq!(msg, "No data object matching version 2.0.0.");
    }
}
