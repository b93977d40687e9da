//! Recover the case collection from its script encoding
//!
//! The simulator ships its cases as a script statement of the form
//! `window.MedSim.Data.CASES = [ ... ];`. Extraction finds the assignment,
//! cuts out the literal between the marker and the trailing `;`, and parses
//! it as JSON. It either yields the whole collection or fails.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value;
use thiserror::Error;

use crate::cases::diagnostics::{generate_help, line_col_to_offset, point_span};

/// Assignment target the case literal is bound to
pub const CASES_MARKER: &str = "window.MedSim.Data.CASES =";

/// Statement terminator that must close the literal
pub const TERMINATOR: char = ';';

/// Case-data text is not the expected assignment statement
#[derive(Debug, Error, Diagnostic)]
pub enum FormatError {
    #[error("Assignment marker not found: expected `{marker}` in {name}")]
    #[diagnostic(
        code(caselint::cases::marker_not_found),
        help("The case file must assign the case list with `window.MedSim.Data.CASES = [...];`")
    )]
    MarkerNotFound { marker: &'static str, name: String },

    #[error("Missing statement terminator: case literal must end with `;`")]
    #[diagnostic(
        code(caselint::cases::missing_terminator),
        help("Close the assignment with `;` and keep nothing but whitespace after it")
    )]
    MissingTerminator {
        #[source_code]
        src: NamedSource<String>,

        #[label("expected `;` after this")]
        span: SourceSpan,
    },

    #[error("Case payload not parseable: {message}")]
    #[diagnostic(code(caselint::cases::unparseable))]
    Unparseable {
        #[source_code]
        src: NamedSource<String>,

        #[label("invalid JSON here")]
        span: SourceSpan,

        message: String,

        #[help]
        help: Option<String>,
    },

    #[error("Case payload is not an array (found {found})")]
    #[diagnostic(
        code(caselint::cases::not_an_array),
        help("CASES must be a list of case objects")
    )]
    NotAnArray {
        #[source_code]
        src: NamedSource<String>,

        #[label("payload starts here")]
        span: SourceSpan,

        found: &'static str,
    },
}

/// Extract the case list from case-data text
pub fn extract_cases(text: &str) -> Result<Vec<Value>, FormatError> {
    extract_cases_named(text, "<cases>")
}

/// Extract the case list; `name` labels the source in diagnostics
pub fn extract_cases_named(text: &str, name: &str) -> Result<Vec<Value>, FormatError> {
    let marker_at = text
        .find(CASES_MARKER)
        .ok_or_else(|| FormatError::MarkerNotFound {
            marker: CASES_MARKER,
            name: name.to_string(),
        })?;

    let rest = &text[marker_at + CASES_MARKER.len()..];
    let body = rest.trim();
    let body_start = marker_at + CASES_MARKER.len() + (rest.len() - rest.trim_start().len());

    let payload = match body.strip_suffix(TERMINATOR) {
        Some(payload) => payload,
        None => {
            let last = body
                .char_indices()
                .last()
                .map_or(body_start, |(i, _)| body_start + i);
            return Err(FormatError::MissingTerminator {
                src: NamedSource::new(name, text.to_string()),
                span: point_span(text, last),
            });
        }
    };

    let value: Value = serde_json::from_str(payload).map_err(|e| {
        let offset = body_start + line_col_to_offset(payload, e.line(), e.column());
        let message = e.to_string();
        FormatError::Unparseable {
            src: NamedSource::new(name, text.to_string()),
            span: point_span(text, offset),
            help: generate_help(&message),
            message,
        }
    })?;

    match value {
        Value::Array(cases) => Ok(cases),
        other => Err(FormatError::NotAnArray {
            src: NamedSource::new(name, text.to_string()),
            span: point_span(text, body_start),
            found: kind_name(&other),
        }),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
