//! # Data Model — Validated Bug Report Records
//!
//! Plain records built by [`crate::validate`] only after the
//! corresponding schema check has passed. Nothing here is ever populated
//! from an unchecked document, so consumers (the preview renderer, the
//! questionnaire flow) can rely on every invariant without re-checking.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Identifier of a question, as it appears in the document.
///
/// Ids are compared by JSON value equality, so `0` and `"0"` are distinct.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QuestionId(Value);

impl QuestionId {
    /// Wrap a raw JSON id value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<u64> for QuestionId {
    fn from(id: u64) -> Self {
        Self(Value::from(id))
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self(Value::from(id))
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// The `metadata` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// Format version, selecting the active `data_v<version>` block.
    pub version: String,
}

/// Type-specific part of a question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    /// Free-text answer.
    Open {
        /// Maximum answer length, at most [`crate::MAX_OPEN_ANSWER_CHARS`].
        #[serde(rename = "maxChar", skip_serializing_if = "Option::is_none")]
        max_char: Option<u64>,
    },
    /// Exactly one answer picked from a list.
    Choice {
        /// Offered answers, in document order.
        #[serde(rename = "answerList")]
        answer_list: Vec<String>,
    },
    /// Any number of answers picked from a list.
    MultiChoice {
        /// Offered answers, in document order.
        #[serde(rename = "answerList")]
        answer_list: Vec<String>,
    },
}

impl QuestionKind {
    /// The `type` string used in the document.
    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionKind::Open { .. } => "open",
            QuestionKind::Choice { .. } => "choice",
            QuestionKind::MultiChoice { .. } => "multichoice",
        }
    }

    /// Offered answers for choice-type questions; `None` for open questions.
    pub fn answer_list(&self) -> Option<&[String]> {
        match self {
            QuestionKind::Open { .. } => None,
            QuestionKind::Choice { answer_list } | QuestionKind::MultiChoice { answer_list } => {
                Some(answer_list)
            }
        }
    }
}

/// A single question of the questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    /// Unique id, referenced by categories.
    pub id: QuestionId,
    /// Question text shown to the user.
    pub text: String,
    /// Optional hint displayed under the question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
    /// Whether an answer is required.
    pub mandatory: bool,
    /// Type and type-specific fields.
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// A named group of questions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    /// Category name.
    pub name: String,
    /// Optional hint displayed under the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Ids of the questions in this category, in display order.
    pub questions: Vec<QuestionId>,
}

/// A fully validated bug report document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BugReport {
    /// The `metadata` block.
    pub metadata: Metadata,
    /// Key of the active data block (`data_v<version>`).
    pub data_key: String,
    /// Categories in document order.
    pub categories: Vec<Category>,
    /// Questions in document order.
    pub questions: Vec<Question>,
}

impl BugReport {
    /// The declared format version.
    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// Look up a question by id.
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    /// Questions of a category, resolved in category order.
    pub fn category_questions<'a>(
        &'a self,
        category: &'a Category,
    ) -> impl Iterator<Item = &'a Question> + 'a {
        category.questions.iter().filter_map(move |id| self.question(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn question_id_display_strips_string_quotes() {
        assert_eq!(QuestionId::from(7).to_string(), "7");
        assert_eq!(QuestionId::from("os").to_string(), "os");
    }

    #[test]
    fn question_id_equality_is_json_equality() {
        assert_eq!(QuestionId::from(0), QuestionId::new(json!(0)));
        assert_ne!(QuestionId::from(0), QuestionId::from("0"));
    }

    #[test]
    fn question_serializes_with_document_field_names() {
        let q = Question {
            id: QuestionId::from(1),
            text: "Which client?".to_string(),
            tips: None,
            mandatory: true,
            kind: QuestionKind::Choice {
                answer_list: vec!["Thunderbird".to_string(), "Outlook".to_string()],
            },
        };
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["type"], "choice");
        assert_eq!(v["answerList"][1], "Outlook");
        assert_eq!(v["mandatory"], true);
        assert!(v.get("tips").is_none());
    }

    #[test]
    fn open_question_omits_absent_max_char() {
        let q = Question {
            id: QuestionId::from(0),
            text: "What happened?".to_string(),
            tips: Some("Expected behavior".to_string()),
            mandatory: false,
            kind: QuestionKind::Open { max_char: None },
        };
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["type"], "open");
        assert!(v.get("maxChar").is_none());
        assert_eq!(v["tips"], "Expected behavior");
    }

    #[test]
    fn answer_list_only_for_choice_kinds() {
        assert!(QuestionKind::Open { max_char: Some(10) }.answer_list().is_none());
        let kind = QuestionKind::MultiChoice {
            answer_list: vec!["a".to_string()],
        };
        assert_eq!(kind.answer_list(), Some(&["a".to_string()][..]));
        assert_eq!(kind.type_name(), "multichoice");
    }
}
