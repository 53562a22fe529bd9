//! Front-matter extraction

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Errors raised while pulling the YAML block off a content file
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("unterminated front-matter block: expected closing '---'")]
    Unterminated,

    #[error("front-matter parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("front-matter must be a YAML mapping, found {0}")]
    InvalidRootType(&'static str),
}

/// Split a content file into its front-matter mapping and the remaining body.
///
/// A file without an opening `---` fence has an empty mapping, so schema
/// validation reports every field as missing instead of the file being
/// silently accepted.
pub fn extract(content: &str) -> Result<(Mapping, &str), FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let content = content.trim_start_matches(['\n', '\r', ' ', '\t']);

    let Some(rest) = strip_fence(content) else {
        return Ok((Mapping::new(), content));
    };

    let (yaml, body) = split_closing_fence(rest).ok_or(FrontMatterError::Unterminated)?;

    if yaml.trim().is_empty() {
        return Ok((Mapping::new(), body));
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(map) => Ok((map, body)),
        Value::Null => Ok((Mapping::new(), body)),
        other => Err(FrontMatterError::InvalidRootType(value_kind(&other))),
    }
}

/// Consume an opening `---` line
fn strip_fence(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    let line_end = rest.find('\n').map(|i| i + 1).unwrap_or(rest.len());
    if rest[..line_end].trim().is_empty() {
        Some(&rest[line_end..])
    } else {
        None
    }
}

/// Find the closing `---` line, returning (yaml, body)
fn split_closing_fence(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((yaml, body.trim_start_matches(['\n', '\r'])));
        }
        offset += line.len();
    }
    None
}

/// Human-readable name of a YAML value's type
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
