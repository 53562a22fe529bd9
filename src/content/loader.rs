//! Content loader - loads and validates collections from the content directory

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::frontmatter::{self, FrontMatterError};
use super::schema::{self, CollectionKind, ContentItem, ValidationError};
use crate::Site;

/// A failure tied to one content file
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("{path:?}: {source}")]
    Validation {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("{path:?}: slug {slug:?} is already used by {first:?}")]
    DuplicateSlug {
        path: PathBuf,
        slug: String,
        first: PathBuf,
    },
}

/// Every failure found while loading one collection
#[derive(Debug)]
pub struct CollectionError {
    pub kind: CollectionKind,
    pub errors: Vec<ContentError>,
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.errors.len() == 1 { "entry" } else { "entries" };
        write!(f, "{} invalid {} {}:", self.errors.len(), self.kind, plural)?;
        for error in &self.errors {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for CollectionError {}

/// A validated content file
#[derive(Debug, Clone)]
pub struct Entry {
    /// Path relative to the collection directory, without extension
    pub slug: String,
    /// Full source file path
    pub path: PathBuf,
    pub item: ContentItem,
}

/// One named collection, entries ordered by slug
#[derive(Debug, Clone)]
pub struct Collection {
    pub kind: CollectionKind,
    pub entries: Vec<Entry>,
}

impl Collection {
    pub fn find(&self, slug: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.slug == slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Both collections, as handed to the rendering layer
#[derive(Debug, Clone)]
pub struct Collections {
    pub blog: Collection,
    pub work: Collection,
}

impl Collections {
    pub fn get(&self, kind: CollectionKind) -> &Collection {
        match kind {
            CollectionKind::Blog => &self.blog,
            CollectionKind::Work => &self.work,
        }
    }

    pub fn find(&self, kind: CollectionKind, slug: &str) -> Option<&Entry> {
        self.get(kind).find(slug)
    }
}

/// Loads collections from the content directory
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Load and validate both collections
    pub fn load_all(&self) -> Result<Collections, CollectionError> {
        Ok(Collections {
            blog: self.load(CollectionKind::Blog)?,
            work: self.load(CollectionKind::Work)?,
        })
    }

    /// Load one collection from `<content_dir>/<kind>`
    pub fn load(&self, kind: CollectionKind) -> Result<Collection, CollectionError> {
        let dir = self.site.content_dir.join(kind.name());
        load_collection(kind, &dir)
    }
}

/// Load every Markdown file under `dir`; any invalid file fails the collection
pub fn load_collection(kind: CollectionKind, dir: &Path) -> Result<Collection, CollectionError> {
    if !dir.is_dir() {
        tracing::warn!("Collection directory {:?} does not exist, {} is empty", dir, kind);
        return Ok(Collection {
            kind,
            entries: Vec::new(),
        });
    }

    let mut entries: Vec<Entry> = Vec::new();
    let mut errors = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for walk in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let walk = match walk {
            Ok(walk) => walk,
            Err(e) => {
                let path = e.path().unwrap_or(dir).to_path_buf();
                errors.push(ContentError::Io {
                    path,
                    source: e.into(),
                });
                continue;
            }
        };

        let path = walk.path();
        if !path.is_file() || !is_markdown_file(path) {
            continue;
        }

        let slug = entry_slug(dir, path);
        if let Some(first) = seen.get(&slug) {
            errors.push(ContentError::DuplicateSlug {
                path: path.to_path_buf(),
                slug,
                first: first.clone(),
            });
            continue;
        }
        seen.insert(slug.clone(), path.to_path_buf());

        match load_entry(kind, slug, path) {
            Ok(entry) => entries.push(entry),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(CollectionError { kind, errors });
    }

    entries.sort_by(|a, b| a.slug.cmp(&b.slug));
    tracing::info!("Loaded {} {} entries", entries.len(), kind);

    Ok(Collection { kind, entries })
}

/// Read, extract and validate a single file
fn load_entry(kind: CollectionKind, slug: String, path: &Path) -> Result<Entry, ContentError> {
    let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (raw, _body) =
        frontmatter::extract(&content).map_err(|source| ContentError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

    let item = schema::validate(kind, &raw).map_err(|source| ContentError::Validation {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Entry {
        slug,
        path: path.to_path_buf(),
        item,
    })
}

/// Slug from the path relative to the collection dir, extension stripped
fn entry_slug(dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(dir).unwrap_or(path).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Language;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn blog_post(title: &str) -> String {
        format!(
            "---\ntitle: {}\ndate: 2024-01-15\ntags: [rust]\nlanguage: en\ndescription: About {}\n---\n\nBody\n",
            title, title
        )
    }

    #[test]
    fn test_load_collection_sorted_by_slug() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "zeta.md", &blog_post("Zeta"));
        write(dir.path(), "alpha.md", &blog_post("Alpha"));
        write(dir.path(), "2023/recap.md", &blog_post("Recap"));
        write(dir.path(), "notes.txt", "not content");

        let collection = load_collection(CollectionKind::Blog, dir.path()).unwrap();
        let slugs: Vec<_> = collection.entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["2023/recap", "alpha", "zeta"]);
        assert_eq!(collection.find("alpha").unwrap().item.title, "Alpha");
        assert_eq!(collection.find("alpha").unwrap().item.language, Language::En);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let collection = load_collection(CollectionKind::Work, &dir.path().join("work")).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_invalid_entries_fail_collection() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "good.md", &blog_post("Good"));
        write(
            dir.path(),
            "bad-language.md",
            "---\ntitle: Hola\ndate: 2024-01-15\ntags: []\nlanguage: fr\ndescription: x\n---\n",
        );
        write(dir.path(), "unterminated.md", "---\ntitle: Oops\n");

        let err = load_collection(CollectionKind::Blog, dir.path()).unwrap_err();
        assert_eq!(err.errors.len(), 2);

        let message = err.to_string();
        assert!(message.starts_with("2 invalid blog entries"));
        assert!(message.contains("bad-language.md"));
        assert!(message.contains("language: expected one of en, es"));
        assert!(message.contains("unterminated.md"));
    }

    #[test]
    fn test_file_without_front_matter_reports_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "plain.md", "# No front-matter\n");

        let err = load_collection(CollectionKind::Blog, dir.path()).unwrap_err();
        match &err.errors[0] {
            ContentError::Validation { path, source } => {
                assert!(path.ends_with("plain.md"));
                assert_eq!(source.issues.len(), 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_slug_fails_collection() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", &blog_post("Markdown"));
        write(dir.path(), "a.markdown", &blog_post("Long extension"));

        let err = load_collection(CollectionKind::Blog, dir.path()).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        match &err.errors[0] {
            ContentError::DuplicateSlug { path, slug, first } => {
                assert_eq!(slug, "a");
                assert!(path.ends_with("a.md"));
                assert!(first.ends_with("a.markdown"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_entry_slug() {
        let dir = Path::new("/site/src/content/blog");
        assert_eq!(entry_slug(dir, &dir.join("hello.md")), "hello");
        assert_eq!(entry_slug(dir, &dir.join("es/hola.mundo.md")), "es/hola.mundo");
    }
}
