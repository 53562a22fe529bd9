//! Content collection schemas
//!
//! Both collections share the same required fields (`title`, `date`, `tags`,
//! `language`, `description`); `work` entries add `href` and `hasBlog`.
//! Validation is all-or-nothing: every failing field is reported and no
//! partial item is returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::date::parse_date;
use super::frontmatter::value_kind;

/// The two content collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Blog,
    Work,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 2] = [CollectionKind::Blog, CollectionKind::Work];

    /// Collection name, also its directory name under the content dir
    pub fn name(self) -> &'static str {
        match self {
            CollectionKind::Blog => "blog",
            CollectionKind::Work => "work",
        }
    }

    /// Fields an entry of this kind must carry
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            CollectionKind::Blog => &COMMON_FIELDS,
            CollectionKind::Work => &WORK_FIELDS,
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CollectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(CollectionKind::Blog),
            "work" | "works" => Ok(CollectionKind::Work),
            _ => Err(format!("unknown collection {:?}, expected blog or work", s)),
        }
    }
}

const COMMON_FIELDS: [&str; 5] = ["title", "date", "tags", "language", "description"];
const WORK_FIELDS: [&str; 7] = [
    "title",
    "date",
    "tags",
    "language",
    "description",
    "href",
    "hasBlog",
];

/// Content language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
}

impl Language {
    pub const CODES: [&'static str; 2] = ["en", "es"];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A validated blog or work entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    pub title: String,
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub language: Language,
    pub description: String,
    #[serde(flatten)]
    pub details: ItemDetails,
}

impl ContentItem {
    pub fn kind(&self) -> CollectionKind {
        match self.details {
            ItemDetails::Blog => CollectionKind::Blog,
            ItemDetails::Work { .. } => CollectionKind::Work,
        }
    }
}

/// Fields that only exist on one collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemDetails {
    Blog,
    Work {
        href: String,
        #[serde(rename = "hasBlog")]
        has_blog: bool,
    },
}

/// Why a single field was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    Empty,
    NotInEnum {
        allowed: &'static [&'static str],
        found: String,
    },
    InvalidDate(String),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Missing => write!(f, "required field is missing"),
            Problem::WrongType { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            Problem::Empty => write!(f, "must not be empty"),
            Problem::NotInEnum { allowed, found } => {
                write!(f, "expected one of {}, found {:?}", allowed.join(", "), found)
            }
            Problem::InvalidDate(reason) => write!(f, "invalid date: {}", reason),
        }
    }
}

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Field path, e.g. `language` or `tags[2]`
    pub path: String,
    pub problem: Problem,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.problem)
    }
}

/// Every field that failed validation for one entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} entry: {}", format_issues(.issues))]
pub struct ValidationError {
    pub kind: CollectionKind,
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Whether `field` (or one of its elements) was rejected
    pub fn mentions(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| {
            issue.path == field
                || issue
                    .path
                    .strip_prefix(field)
                    .is_some_and(|rest| rest.starts_with('['))
        })
    }
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate raw front-matter against the schema of `kind`
pub fn validate(kind: CollectionKind, raw: &Mapping) -> Result<ContentItem, ValidationError> {
    let mut fields = Fields::new(raw);

    let title = fields.non_empty_text("title");
    let date = fields.date("date");
    let tags = fields.text_list("tags");
    let language = fields.language("language");
    let description = fields.non_empty_text("description");

    let details = match kind {
        CollectionKind::Blog => Some(ItemDetails::Blog),
        CollectionKind::Work => {
            let href = fields.text("href");
            let has_blog = fields.boolean("hasBlog");
            href.zip(has_blog)
                .map(|(href, has_blog)| ItemDetails::Work { href, has_blog })
        }
    };

    for key in raw.keys().filter_map(Value::as_str) {
        if !kind.required_fields().contains(&key) {
            tracing::debug!("Ignoring unknown {} field {:?}", kind, key);
        }
    }

    match (title, date, tags, language, description, details) {
        (Some(title), Some(date), Some(tags), Some(language), Some(description), Some(details))
            if fields.issues.is_empty() =>
        {
            Ok(ContentItem {
                title,
                date,
                tags,
                language,
                description,
                details,
            })
        }
        _ => Err(ValidationError {
            kind,
            issues: fields.issues,
        }),
    }
}

/// Typed field access that records an issue for every rejected field
struct Fields<'a> {
    raw: &'a Mapping,
    issues: Vec<FieldIssue>,
}

impl<'a> Fields<'a> {
    fn new(raw: &'a Mapping) -> Self {
        Self {
            raw,
            issues: Vec::new(),
        }
    }

    fn reject(&mut self, path: impl Into<String>, problem: Problem) {
        self.issues.push(FieldIssue {
            path: path.into(),
            problem,
        });
    }

    fn get(&mut self, name: &str) -> Option<&'a Value> {
        let value = self.raw.get(name);
        if value.is_none() {
            self.reject(name, Problem::Missing);
        }
        value
    }

    fn text(&mut self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(s) => Some(s.clone()),
            other => {
                self.reject(
                    name,
                    Problem::WrongType {
                        expected: "string",
                        found: value_kind(other),
                    },
                );
                None
            }
        }
    }

    fn non_empty_text(&mut self, name: &str) -> Option<String> {
        let text = self.text(name)?;
        if text.trim().is_empty() {
            self.reject(name, Problem::Empty);
            return None;
        }
        Some(text)
    }

    fn boolean(&mut self, name: &str) -> Option<bool> {
        match self.get(name)? {
            Value::Bool(b) => Some(*b),
            other => {
                self.reject(
                    name,
                    Problem::WrongType {
                        expected: "boolean",
                        found: value_kind(other),
                    },
                );
                None
            }
        }
    }

    fn text_list(&mut self, name: &str) -> Option<Vec<String>> {
        let seq = match self.get(name)? {
            Value::Sequence(seq) => seq,
            other => {
                self.reject(
                    name,
                    Problem::WrongType {
                        expected: "sequence of strings",
                        found: value_kind(other),
                    },
                );
                return None;
            }
        };

        let mut items = Vec::with_capacity(seq.len());
        let mut valid = true;
        for (i, value) in seq.iter().enumerate() {
            match value {
                Value::String(s) => items.push(s.clone()),
                other => {
                    valid = false;
                    self.reject(
                        format!("{}[{}]", name, i),
                        Problem::WrongType {
                            expected: "string",
                            found: value_kind(other),
                        },
                    );
                }
            }
        }

        valid.then_some(items)
    }

    fn language(&mut self, name: &str) -> Option<Language> {
        let code = self.text(name)?;
        let language = Language::from_code(&code);
        if language.is_none() {
            self.reject(
                name,
                Problem::NotInEnum {
                    allowed: &Language::CODES,
                    found: code,
                },
            );
        }
        language
    }

    fn date(&mut self, name: &str) -> Option<DateTime<Utc>> {
        let text = self.text(name)?;
        match parse_date(&text) {
            Ok(date) => Some(date),
            Err(reason) => {
                self.reject(name, Problem::InvalidDate(reason));
                None
            }
        }
    }
}
