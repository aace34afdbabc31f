//! # Bug Report Validation
//!
//! Ordered, first-failure-wins validation of a bug report questionnaire
//! document:
//!
//! 1. Top-level keys are `metadata` or `data_v<major>.<minor>.<patch>`.
//! 2. `metadata` is an object with a `version` starting with `d.d.d`.
//! 3. `data_v<version>` exists and holds `categories` and `questions` arrays.
//! 4. Questions are closed objects with unique ids and a type-specific
//!    field policy.
//! 5. Categories are closed objects whose question lists reference
//!    declared ids exactly once.
//!
//! Each step converts the checked JSON into the typed records of
//! [`crate::model`]; a step only sees records produced by the steps
//! before it.
//!
//! ## Version matching
//!
//! Both the `metadata.version` check and the `data_v…` key check are
//! prefix matches. A version such as `1.0.0-rc1` passes step 2 and then
//! fails step 3 unless a `data_v1.0.0-rc1` block exists.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ReportError;
use crate::model::{BugReport, Category, Metadata, Question, QuestionId, QuestionKind};

/// Inclusive upper bound for `maxChar` on open questions.
pub const MAX_OPEN_ANSWER_CHARS: u64 = 1000;

const METADATA_KEY: &str = "metadata";
const DATA_KEY_PREFIX: &str = "data_v";

fn version_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+").expect("version pattern compiles"))
}

fn data_key_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^data_v[0-9]+\.[0-9]+\.[0-9]+").expect("data key pattern compiles")
    })
}

/// Object kinds with a closed field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// The top-level `metadata` block.
    Metadata,
    /// An entry of `questions`.
    Question,
    /// An entry of `categories`.
    Category,
}

impl ObjectKind {
    /// Name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Metadata => "metadata",
            ObjectKind::Question => "question",
            ObjectKind::Category => "category",
        }
    }

    /// Every key an object of this kind may carry.
    pub fn allowed_fields(self) -> &'static [&'static str] {
        match self {
            ObjectKind::Metadata => &["version"],
            ObjectKind::Question => &[
                "id",
                "text",
                "tips",
                "type",
                "mandatory",
                "maxChar",
                "answerList",
            ],
            ObjectKind::Category => &["name", "questions", "hint"],
        }
    }
}

/// Validate the bug report file at `path`.
///
/// # Errors
///
/// Returns [`ReportError::Load`] if the file cannot be read, and the
/// first schema violation otherwise.
pub fn validate(path: impl AsRef<Path>) -> Result<BugReport, ReportError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ReportError::Load {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "loaded bug report file");
    validate_str(&content)
}

/// Validate a bug report held in memory.
pub fn validate_str(content: &str) -> Result<BugReport, ReportError> {
    let document: Value =
        serde_json::from_str(content).map_err(|e| ReportError::Parse(e.to_string()))?;
    validate_document(&document)
}

/// Validate an already parsed bug report document.
pub fn validate_document(document: &Value) -> Result<BugReport, ReportError> {
    let root = document.as_object().ok_or_else(|| ReportError::Shape {
        what: "document root".to_string(),
        expected: "a dictionary",
    })?;

    check_top_level_keys(root)?;
    let metadata = parse_metadata(root)?;
    let (data_key, raw_categories, raw_questions) = parse_data_block(root, &metadata.version)?;
    let questions = parse_questions(raw_questions)?;
    let categories = parse_categories(raw_categories, &questions)?;

    tracing::debug!(
        version = %metadata.version,
        questions = questions.len(),
        categories = categories.len(),
        "bug report validated"
    );

    Ok(BugReport {
        metadata,
        data_key,
        categories,
        questions,
    })
}

fn check_top_level_keys(root: &Map<String, Value>) -> Result<(), ReportError> {
    for key in root.keys() {
        if key != METADATA_KEY && !data_key_pattern().is_match(key) {
            return Err(ReportError::UnexpectedObject(key.clone()));
        }
    }
    Ok(())
}

fn parse_metadata(root: &Map<String, Value>) -> Result<Metadata, ReportError> {
    tracing::trace!("checking metadata");
    let metadata = root.get(METADATA_KEY).ok_or(ReportError::MissingMetadata)?;
    let metadata = metadata.as_object().ok_or_else(|| ReportError::Shape {
        what: METADATA_KEY.to_string(),
        expected: "a dictionary",
    })?;
    check_fields(ObjectKind::Metadata, metadata)?;

    let version = require(ObjectKind::Metadata, metadata, "version")?;
    match version.as_str() {
        Some(v) if version_pattern().is_match(v) => Ok(Metadata {
            version: v.to_string(),
        }),
        Some(v) => Err(ReportError::VersionPattern(v.to_string())),
        None => Err(ReportError::VersionPattern(version.to_string())),
    }
}

fn parse_data_block<'a>(
    root: &'a Map<String, Value>,
    version: &str,
) -> Result<(String, &'a [Value], &'a [Value]), ReportError> {
    let data_key = format!("{DATA_KEY_PREFIX}{version}");
    tracing::trace!(data_key = %data_key, "checking data block");

    let data = root
        .get(&data_key)
        .ok_or_else(|| ReportError::MissingDataBlock(version.to_string()))?;
    let data = data.as_object().ok_or_else(|| ReportError::Shape {
        what: data_key.clone(),
        expected: "a dictionary",
    })?;

    let categories = data_array(data, &data_key, "categories")?;
    let questions = data_array(data, &data_key, "questions")?;
    Ok((data_key, categories, questions))
}

fn data_array<'a>(
    data: &'a Map<String, Value>,
    data_key: &str,
    field: &'static str,
) -> Result<&'a [Value], ReportError> {
    let value = data.get(field).ok_or_else(|| ReportError::MissingField {
        kind: "data",
        field,
        object: data_key.to_string(),
    })?;
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ReportError::Shape {
            what: field.to_string(),
            expected: "an array",
        })
}

fn parse_questions(raw: &[Value]) -> Result<Vec<Question>, ReportError> {
    let mut questions: Vec<Question> = Vec::with_capacity(raw.len());
    for value in raw {
        let question = parse_question(value, &questions)?;
        questions.push(question);
    }
    Ok(questions)
}

fn parse_question(value: &Value, declared: &[Question]) -> Result<Question, ReportError> {
    let kind = ObjectKind::Question;
    let obj = value.as_object().ok_or_else(|| ReportError::Shape {
        what: "Question".to_string(),
        expected: "a dictionary",
    })?;
    check_fields(kind, obj)?;

    let id = QuestionId::new(require(kind, obj, "id")?.clone());
    if declared.iter().any(|q| q.id == id) {
        return Err(ReportError::DuplicateQuestionId(id.as_value().to_string()));
    }

    let text = require(kind, obj, "text")?;
    let question_type = require(kind, obj, "type")?;
    let question_kind = parse_question_kind(question_type, obj, value)?;

    let text = text
        .as_str()
        .ok_or_else(|| field_shape("text", value, "a string"))?
        .to_string();
    let tips = optional_string(obj, "tips", value)?;
    let mandatory = match obj.get("mandatory") {
        None => false,
        Some(m) => m
            .as_bool()
            .ok_or_else(|| field_shape("mandatory", value, "a boolean"))?,
    };

    Ok(Question {
        id,
        text,
        tips,
        mandatory,
        kind: question_kind,
    })
}

fn parse_question_kind(
    question_type: &Value,
    obj: &Map<String, Value>,
    value: &Value,
) -> Result<QuestionKind, ReportError> {
    match question_type.as_str() {
        Some("open") => {
            let max_char = match obj.get("maxChar") {
                None => None,
                Some(m) => {
                    let max = m
                        .as_u64()
                        .ok_or_else(|| field_shape("maxChar", value, "a non-negative integer"))?;
                    if max > MAX_OPEN_ANSWER_CHARS {
                        return Err(ReportError::MaxCharTooHigh {
                            object: value.to_string(),
                            limit: MAX_OPEN_ANSWER_CHARS,
                        });
                    }
                    Some(max)
                }
            };
            if obj.contains_key("answerList") {
                return Err(ReportError::DisallowedField {
                    field: "answerList",
                    question_type: "open".to_string(),
                    object: value.to_string(),
                });
            }
            Ok(QuestionKind::Open { max_char })
        }
        Some(t @ ("choice" | "multichoice")) => {
            let list = require(ObjectKind::Question, obj, "answerList")?
                .as_array()
                .ok_or_else(|| field_shape("answerList", value, "an array"))?;
            if obj.contains_key("maxChar") {
                return Err(ReportError::DisallowedField {
                    field: "maxChar",
                    question_type: t.to_string(),
                    object: value.to_string(),
                });
            }
            let answer_list = list
                .iter()
                .map(|a| a.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| field_shape("answerList entries", value, "strings"))?;
            if t == "choice" {
                Ok(QuestionKind::Choice { answer_list })
            } else {
                Ok(QuestionKind::MultiChoice { answer_list })
            }
        }
        _ => Err(ReportError::UnknownQuestionType(value.to_string())),
    }
}

fn parse_categories(raw: &[Value], questions: &[Question]) -> Result<Vec<Category>, ReportError> {
    raw.iter()
        .map(|value| parse_category(value, questions))
        .collect()
}

fn parse_category(value: &Value, declared: &[Question]) -> Result<Category, ReportError> {
    let kind = ObjectKind::Category;
    let obj = value.as_object().ok_or_else(|| ReportError::Shape {
        what: "category".to_string(),
        expected: "a dictionary",
    })?;
    check_fields(kind, obj)?;

    let name = require(kind, obj, "name")?;
    let refs = require(kind, obj, "questions")?
        .as_array()
        .ok_or_else(|| field_shape("questions", value, "an array"))?;

    let mut questions: Vec<QuestionId> = Vec::with_capacity(refs.len());
    for r in refs {
        let id = QuestionId::new(r.clone());
        if !declared.iter().any(|q| q.id == id) {
            return Err(ReportError::DanglingReference {
                id: r.to_string(),
                object: value.to_string(),
            });
        }
        if questions.contains(&id) {
            return Err(ReportError::DuplicateReference {
                id: r.to_string(),
                object: value.to_string(),
            });
        }
        questions.push(id);
    }

    let name = name
        .as_str()
        .ok_or_else(|| field_shape("name", value, "a string"))?
        .to_string();
    let hint = optional_string(obj, "hint", value)?;

    Ok(Category {
        name,
        hint,
        questions,
    })
}

/// Reject any key outside the allow-list of `kind`.
fn check_fields(kind: ObjectKind, obj: &Map<String, Value>) -> Result<(), ReportError> {
    let allowed = kind.allowed_fields();
    match obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(field) => Err(ReportError::UnknownField {
            kind: kind.name(),
            field: field.clone(),
        }),
        None => Ok(()),
    }
}

fn require<'a>(
    kind: ObjectKind,
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ReportError> {
    obj.get(field).ok_or_else(|| ReportError::MissingField {
        kind: kind.name(),
        field,
        object: Value::Object(obj.clone()).to_string(),
    })
}

fn optional_string(
    obj: &Map<String, Value>,
    field: &'static str,
    value: &Value,
) -> Result<Option<String>, ReportError> {
    match obj.get(field) {
        None => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| field_shape(field, value, "a string")),
    }
}

fn field_shape(field: &str, object: &Value, expected: &'static str) -> ReportError {
    ReportError::Shape {
        what: format!("{field} in {object}"),
        expected,
    }
}
