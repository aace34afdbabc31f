//! # Preview Renderer
//!
//! Human-readable rendering of a validated questionnaire. Categories come
//! in document order, each followed by its questions and, for choice-type
//! questions, the offered answers. Indentation reflects nesting depth:
//!
//! ```text
//!  > Category name
//! (category hint)
//! 	 - Question text *
//! 	 (question tips)
//! 		 - Answer option
//! ```
//!
//! `*` marks mandatory questions. A blank line separates categories.

use std::fmt;

use crate::model::{BugReport, Category, Question};

const MANDATORY_MARKER: &str = " *";

/// Display adapter rendering a [`BugReport`] as a text preview.
pub struct Preview<'a> {
    report: &'a BugReport,
}

impl<'a> Preview<'a> {
    /// Wrap a validated report.
    pub fn new(report: &'a BugReport) -> Self {
        Self { report }
    }

    fn write_category(&self, f: &mut fmt::Formatter<'_>, category: &Category) -> fmt::Result {
        writeln!(f, " > {}", category.name)?;
        if let Some(hint) = category.hint.as_deref().filter(|h| !h.is_empty()) {
            writeln!(f, "({hint})")?;
        }
        for question in self.report.category_questions(category) {
            write_question(f, question)?;
        }
        writeln!(f)
    }
}

fn write_question(f: &mut fmt::Formatter<'_>, question: &Question) -> fmt::Result {
    let marker = if question.mandatory { MANDATORY_MARKER } else { "" };
    writeln!(f, "\t - {}{marker}", question.text)?;
    if let Some(tips) = question.tips.as_deref().filter(|t| !t.is_empty()) {
        writeln!(f, "\t ({tips})")?;
    }
    for answer in question.kind.answer_list().unwrap_or_default() {
        writeln!(f, "\t\t - {answer}")?;
    }
    Ok(())
}

impl fmt::Display for Preview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in &self.report.categories {
            self.write_category(f, category)?;
        }
        Ok(())
    }
}

/// Render the preview of `report` into a string.
pub fn render_preview(report: &BugReport) -> String {
    Preview::new(report).to_string()
}
