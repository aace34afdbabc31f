//! # bugreport-schema — Bug Report Questionnaire Validation
//!
//! Validates the JSON file that drives the bug report questionnaire and
//! turns it into typed records.
//!
//! ## Document shape
//!
//! ```json
//! {
//!   "metadata": { "version": "1.0.0" },
//!   "data_v1.0.0": {
//!     "categories": [ { "name": "...", "hint": "...", "questions": [0] } ],
//!     "questions":  [ { "id": 0, "text": "...", "type": "open" } ]
//!   }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`validate`] — ordered, first-failure-wins schema checks.
//! - [`model`] — records produced by a successful validation.
//! - [`preview`] — text rendering of a validated questionnaire.
//! - [`flow`] — answer collection over a validated questionnaire.
//! - [`error`] — the single failure type, [`ReportError`].
//!
//! ## Crate Policy
//!
//! - No printing. Callers decide where diagnostics and previews go.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod flow;
pub mod model;
pub mod preview;
pub mod validate;

pub use error::{validation_outcome, ReportError};
pub use flow::{Questionnaire, CURRENT_FORMAT_VERSION};
pub use model::{BugReport, Category, Metadata, Question, QuestionId, QuestionKind};
pub use preview::{render_preview, Preview};
pub use validate::{validate, validate_document, validate_str, ObjectKind, MAX_OPEN_ANSWER_CHARS};
