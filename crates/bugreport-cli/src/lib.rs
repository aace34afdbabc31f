//! # bugreport-cli — Bug Report File Validator
//!
//! Provides the `validate-bug-report` command-line tool, replacing
//! `utils/validate_bug_report_file.py` with a Rust implementation over
//! [`bugreport_schema`].
//!
//! ```bash
//! validate-bug-report --file bug_report.json
//! validate-bug-report --file bug_report.json --preview
//! validate-bug-report --file bug_report.json --answers answers.json -v
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; schema rules live in `bugreport-schema`.
//! - Diagnostics and previews go to standard output, logs to standard error.

pub mod validate;

/// Map the repeatable `-v` flag to a default tracing filter directive.
pub fn verbosity_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
