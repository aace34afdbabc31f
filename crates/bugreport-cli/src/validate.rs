//! # Validate Command
//!
//! Validates a bug report questionnaire file and optionally prints its
//! preview and the answers collected from an answer file.
//! Preserves the interface of `utils/validate_bug_report_file.py`:
//!
//! ```bash
//! validate-bug-report --file bug_report.json --preview
//! ```
//!
//! Exit code 0 on success, 1 on validation failure. The diagnostic names
//! the file and the first violation found.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::Value;

use bugreport_schema::{validate, BugReport, Preview, QuestionId, Questionnaire};

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON file to validate.
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Output a preview of the parsed file.
    #[arg(long)]
    pub preview: bool,

    /// JSON object mapping question ids to answers. Prints the collected
    /// answers of every category after a successful validation.
    #[arg(long, value_name = "PATH")]
    pub answers: Option<PathBuf>,
}

/// Execute the validate command, writing results to standard output.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_validate_to(args, &mut out)
}

/// Execute the validate command, writing results to `out`.
///
/// Returns the process exit code: 0 on success, 1 on validation failure.
/// Operational errors (unreadable answer file, output failure) are
/// returned as `Err`.
pub fn run_validate_to(args: &ValidateArgs, out: &mut impl Write) -> Result<u8> {
    let path = args.file.display();
    let report = match validate(&args.file) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(file = %path, "validation rejected");
            writeln!(out, "Validation FAILED for {path}. Error: {e}")?;
            return Ok(1);
        }
    };

    tracing::info!(
        file = %path,
        version = report.version(),
        questions = report.questions.len(),
        categories = report.categories.len(),
        "validation succeeded"
    );
    writeln!(out, "Validation SUCCEED for {path}.")?;

    if args.preview {
        write!(out, "{}", Preview::new(&report))?;
    }

    if let Some(ref answers_path) = args.answers {
        write_collected_answers(report, answers_path, out)?;
    }

    Ok(0)
}

fn write_collected_answers(
    report: BugReport,
    answers_path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let answers = load_answers(answers_path)?;
    let ids: Vec<QuestionId> = report.questions.iter().map(|q| q.id.clone()).collect();
    let mut questionnaire =
        Questionnaire::from_report(report).context("cannot collect answers for this file")?;

    for (key, answer) in answers {
        let mut matching = ids.iter().filter(|id| id.to_string() == key);
        let Some(id) = matching.next() else {
            bail!("answer file refers to unknown question id '{key}'");
        };
        if matching.next().is_some() {
            bail!("answer file key '{key}' matches more than one question id");
        }
        questionnaire.set_answer(id, answer);
    }

    let category_count = questionnaire.categories().len();
    for index in 0..category_count {
        write!(out, "{}", questionnaire.collect_answers(index))?;
    }
    Ok(())
}

/// Load an answer file: a JSON object mapping question ids to answer strings.
fn load_answers(path: &Path) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("answer file is not valid JSON: {}", path.display()))?;
    let Value::Object(map) = value else {
        bail!("answer file must hold a JSON object: {}", path.display());
    };

    map.into_iter()
        .map(|(id, answer)| match answer {
            Value::String(s) => Ok((id, s)),
            other => bail!("answer to question '{id}' must be a string, got {other}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_json(dir: &Path, name: &str, doc: &Value) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, doc.to_string()).unwrap();
        path
    }

    fn report_doc() -> Value {
        json!({
            "metadata": { "version": "1.0.0" },
            "data_v1.0.0": {
                "categories": [
                    { "name": "I can't receive mail", "hint": "Incoming", "questions": [0, 1] }
                ],
                "questions": [
                    { "id": 0, "text": "What happened?", "type": "open", "mandatory": true },
                    { "id": 1, "text": "Which client?", "type": "choice", "answerList": ["Thunderbird"] }
                ]
            }
        })
    }

    fn run(args: &ValidateArgs) -> (u8, String) {
        let mut out = Vec::new();
        let code = run_validate_to(args, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn success_without_preview() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_json(dir.path(), "report.json", &report_doc());
        let (code, out) = run(&ValidateArgs {
            file: file.clone(),
            preview: false,
            answers: None,
        });
        assert_eq!(code, 0);
        assert_eq!(out, format!("Validation SUCCEED for {}.\n", file.display()));
    }

    #[test]
    fn success_with_preview() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_json(dir.path(), "report.json", &report_doc());
        let (code, out) = run(&ValidateArgs {
            file,
            preview: true,
            answers: None,
        });
        assert_eq!(code, 0);
        assert!(out.contains(" > I can't receive mail\n(Incoming)\n"));
        assert!(out.contains("\t - What happened? *\n"));
        assert!(out.contains("\t\t - Thunderbird\n"));
    }

    #[test]
    fn failure_names_file_and_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = report_doc();
        doc.as_object_mut().unwrap().remove("metadata");
        let file = write_json(dir.path(), "report.json", &doc);
        let (code, out) = run(&ValidateArgs {
            file: file.clone(),
            preview: true,
            answers: None,
        });
        assert_eq!(code, 1);
        assert_eq!(
            out,
            format!(
                "Validation FAILED for {}. Error: No metadata object.\n",
                file.display()
            )
        );
    }

    #[test]
    fn missing_file_is_validation_failure() {
        let (code, out) = run(&ValidateArgs {
            file: PathBuf::from("/nonexistent/report.json"),
            preview: false,
            answers: None,
        });
        assert_eq!(code, 1);
        assert!(out.contains("JSON cannot be loaded"));
    }

    #[test]
    fn answers_are_collected_per_category() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_json(dir.path(), "report.json", &report_doc());
        let answers = write_json(
            dir.path(),
            "answers.json",
            &json!({ "0": "Nothing arrives", "1": "Thunderbird" }),
        );
        let (code, out) = run(&ValidateArgs {
            file,
            preview: false,
            answers: Some(answers),
        });
        assert_eq!(code, 0);
        assert!(out.ends_with(
            "Category: I can't receive mail\n - What happened?\nNothing arrives\n - Which client?\nThunderbird\n"
        ));
    }

    #[test]
    fn answers_for_unknown_question_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_json(dir.path(), "report.json", &report_doc());
        let answers = write_json(dir.path(), "answers.json", &json!({ "9": "?" }));
        let args = ValidateArgs {
            file,
            preview: false,
            answers: Some(answers),
        };
        let err = run_validate_to(&args, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("unknown question id '9'"));
    }

    #[test]
    fn answers_for_ambiguous_question_id_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = report_doc();
        doc["data_v1.0.0"]["questions"] = json!([
            { "id": 0, "text": "Numeric id", "type": "open" },
            { "id": "0", "text": "String id", "type": "open" }
        ]);
        doc["data_v1.0.0"]["categories"] = json!([
            { "name": "Both", "questions": [0, "0"] }
        ]);
        let file = write_json(dir.path(), "report.json", &doc);
        let answers = write_json(dir.path(), "answers.json", &json!({ "0": "which one?" }));
        let args = ValidateArgs {
            file,
            preview: false,
            answers: Some(answers),
        };
        let mut out = Vec::new();
        let err = run_validate_to(&args, &mut out).unwrap_err();
        assert!(err.to_string().contains("matches more than one question id"));
        assert!(!String::from_utf8(out).unwrap().contains("Category: Both"));
    }

    #[test]
    fn answers_must_be_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(dir.path(), "answers.json", &json!({ "0": 5 }));
        let err = load_answers(&path).unwrap_err();
        assert!(err.to_string().contains("must be a string"));
    }

    #[test]
    fn answers_file_must_be_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(dir.path(), "answers.json", &json!(["a"]));
        assert!(load_answers(&path).is_err());
    }
}
