//! # Questionnaire Flow
//!
//! Answer collection over a validated bug report. The reporting client
//! walks the user through the questions of one category, records the
//! answers, and then concatenates them into the text attached to the
//! submitted report.
//!
//! Only [`CURRENT_FORMAT_VERSION`] documents are accepted. When the format
//! changes, older versions are migrated in [`Questionnaire::from_report`].

use crate::error::ReportError;
use crate::model::{BugReport, Question, QuestionId};

/// The questionnaire format version this flow understands.
pub const CURRENT_FORMAT_VERSION: &str = "1.0.0";

/// Answers being collected for a bug report questionnaire.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    report: BugReport,
    answers: Vec<(QuestionId, String)>,
}

impl Questionnaire {
    /// Build a questionnaire from a validated report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnsupportedFormatVersion`] if the report's
    /// version is not [`CURRENT_FORMAT_VERSION`].
    pub fn from_report(report: BugReport) -> Result<Self, ReportError> {
        if report.version() != CURRENT_FORMAT_VERSION {
            return Err(ReportError::UnsupportedFormatVersion {
                found: report.version().to_string(),
                expected: CURRENT_FORMAT_VERSION,
            });
        }
        Ok(Self {
            report,
            answers: Vec::new(),
        })
    }

    /// Category names in document order.
    pub fn categories(&self) -> Vec<&str> {
        self.report.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Questions in document order.
    pub fn questions(&self) -> &[Question] {
        &self.report.questions
    }

    /// Question ids of the category at `category_index`.
    pub fn question_set(&self, category_index: usize) -> Option<&[QuestionId]> {
        self.report
            .categories
            .get(category_index)
            .map(|c| c.questions.as_slice())
    }

    /// Record the answer to a question, replacing any previous one.
    ///
    /// Returns `false` and records nothing if `question_id` is not declared.
    pub fn set_answer(&mut self, question_id: &QuestionId, answer: impl Into<String>) -> bool {
        if self.report.question(question_id).is_none() {
            return false;
        }
        let answer = answer.into();
        match self.answers.iter_mut().find(|(id, _)| id == question_id) {
            Some((_, existing)) => *existing = answer,
            None => self.answers.push((question_id.clone(), answer)),
        }
        true
    }

    /// The recorded answer to a question, if any.
    pub fn answer(&self, question_id: &QuestionId) -> Option<&str> {
        self.answers
            .iter()
            .find(|(id, _)| id == question_id)
            .map(|(_, a)| a.as_str())
    }

    /// Concatenate the answers given for one category.
    ///
    /// Unanswered and empty answers are skipped. An out-of-range index
    /// yields an empty string.
    pub fn collect_answers(&self, category_index: usize) -> String {
        let Some(category) = self.report.categories.get(category_index) else {
            return String::new();
        };

        let mut out = format!("Category: {}\n", category.name);
        for question in self.report.category_questions(category) {
            match self.answer(&question.id) {
                Some(answer) if !answer.is_empty() => {
                    out.push_str(&format!(" - {}\n{answer}\n", question.text));
                }
                _ => {}
            }
        }
        out
    }

    /// Forget every recorded answer.
    pub fn clear_answers(&mut self) {
        self.answers.clear();
    }
}
