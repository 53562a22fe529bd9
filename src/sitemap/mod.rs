//! Sitemap module - derives the site's public URLs and writes sitemap.xml
//!
//! URLs are the configured base routes followed by one route per content
//! file matched by each section's glob, all prefixed with the site origin.
//! The final list keeps the first occurrence of every URL.

use indexmap::IndexSet;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::Site;

/// Characters escaped in a route segment derived from a file name
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Sitemap building errors
#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("failed to scan {dir:?}: {source}")]
    Io {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("invalid site origin {0:?}: expected http(s)://host with no path")]
    InvalidOrigin(String),

    #[error("invalid route {0:?}: routes must start with '/'")]
    InvalidRoute(String),

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Content routes generated from the files one glob matches
#[derive(Debug, Clone)]
struct Section {
    prefix: String,
    pattern: String,
}

/// Builds the ordered, de-duplicated list of sitemap URLs
#[derive(Debug, Clone)]
pub struct SitemapBuilder {
    origin: String,
    base_routes: Vec<String>,
    sections: Vec<Section>,
    root: Option<PathBuf>,
}

impl SitemapBuilder {
    /// Start a builder for `origin` (protocol + host)
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            base_routes: Vec::new(),
            sections: Vec::new(),
            root: None,
        }
    }

    /// Builder configured from the site's `sitemap` settings
    pub fn for_site(site: &Site) -> Self {
        let sitemap = &site.config.sitemap;
        let mut builder = Self::new(&site.config.site)
            .base_routes(&sitemap.base_routes)
            .root(&site.base_dir)
            .section("/blog", &sitemap.blog_glob);

        if sitemap.include_work_pages {
            builder = builder.section("/works", &sitemap.work_glob);
        }

        builder
    }

    pub fn base_routes<S: AsRef<str>>(mut self, routes: &[S]) -> Self {
        self.base_routes
            .extend(routes.iter().map(|r| r.as_ref().to_string()));
        self
    }

    /// Add one `<prefix>/<stem>` route per file matching `pattern`
    pub fn section(mut self, prefix: &str, pattern: &str) -> Self {
        self.sections.push(Section {
            prefix: prefix.trim_end_matches('/').to_string(),
            pattern: pattern.to_string(),
        });
        self
    }

    /// Directory relative patterns are resolved against
    pub fn root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Site-relative routes, base routes first, in scan order
    pub fn routes(&self) -> Result<Vec<String>, SitemapError> {
        let mut routes = Vec::with_capacity(self.base_routes.len());

        for route in &self.base_routes {
            if !route.starts_with('/') {
                return Err(SitemapError::InvalidRoute(route.clone()));
            }
            routes.push(route.clone());
        }

        for section in &self.sections {
            if !section.prefix.starts_with('/') {
                return Err(SitemapError::InvalidRoute(section.prefix.clone()));
            }

            let files = self.scan(&section.pattern)?;
            tracing::debug!(
                "Matched {} files for {} ({})",
                files.len(),
                section.prefix,
                section.pattern
            );

            for file in files {
                if let Some(stem) = file.file_stem().map(|s| s.to_string_lossy()) {
                    routes.push(format!(
                        "{}/{}",
                        section.prefix,
                        utf8_percent_encode(&stem, SEGMENT)
                    ));
                }
            }
        }

        Ok(routes)
    }

    /// Absolute URLs, first occurrence of each kept
    pub fn build(&self) -> Result<Vec<String>, SitemapError> {
        crate::config::validate_origin(&self.origin)
            .map_err(|_| SitemapError::InvalidOrigin(self.origin.clone()))?;

        let routes = self.routes()?;
        let total = routes.len();

        let urls: IndexSet<String> = routes
            .into_iter()
            .map(|route| format!("{}{}", self.origin, route))
            .collect();

        if urls.len() < total {
            tracing::warn!(
                "Dropped {} duplicate sitemap URLs",
                total - urls.len()
            );
        }

        Ok(urls.into_iter().collect())
    }

    /// Enumerate the files a pattern matches; the pattern's directory must be readable
    fn scan(&self, pattern: &str) -> Result<Vec<PathBuf>, SitemapError> {
        let (dir, full_pattern) = match &self.root {
            Some(root) if !Path::new(pattern).is_absolute() => (
                root.join(literal_base(pattern)),
                format!(
                    "{}/{}",
                    glob::Pattern::escape(&root.to_string_lossy()).trim_end_matches('/'),
                    pattern
                ),
            ),
            _ => (literal_base(pattern), pattern.to_string()),
        };

        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir
        };

        fs::read_dir(&dir).map_err(|source| SitemapError::Io {
            dir: dir.clone(),
            source,
        })?;

        let matches = glob::glob(&full_pattern).map_err(|source| SitemapError::Pattern {
            pattern: full_pattern.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in matches {
            let path = entry.map_err(|e| SitemapError::Io {
                dir: e.path().to_path_buf(),
                source: e.into(),
            })?;
            if path.is_file() {
                files.push(path);
            }
        }

        Ok(files)
    }
}

/// Sitemap URLs for the fixed base routes plus one `/blog/<stem>` per matched file
pub fn build_sitemap_urls<S: AsRef<str>>(
    origin: &str,
    base_routes: &[S],
    blog_glob: &str,
) -> Result<Vec<String>, SitemapError> {
    SitemapBuilder::new(origin)
        .base_routes(base_routes)
        .section("/blog", blog_glob)
        .build()
}

/// Leading directories of a glob that contain no wildcard
fn literal_base(pattern: &str) -> PathBuf {
    let mut parts: Vec<&str> = pattern.split('/').collect();
    parts.pop();

    let mut base = PathBuf::new();
    if pattern.starts_with('/') {
        base.push("/");
    }
    for part in parts {
        if part.contains(['*', '?', '[', ']']) {
            break;
        }
        if !part.is_empty() {
            base.push(part);
        }
    }
    base
}

/// Render a sitemaps.org `urlset` document
pub fn render_xml(urls: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');
    for url in urls {
        xml.push_str(&format!("  <url><loc>{}</loc></url>\n", escape_xml(url)));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Write the sitemap into `public_dir`, returning the file path
pub fn write_sitemap(
    public_dir: &Path,
    filename: &str,
    urls: &[String],
) -> Result<PathBuf, SitemapError> {
    let path = public_dir.join(filename);
    let write_err = |source| SitemapError::Write {
        path: path.clone(),
        source,
    };

    fs::create_dir_all(public_dir).map_err(write_err)?;
    fs::write(&path, render_xml(urls)).map_err(write_err)?;
    tracing::info!("Generated {} with {} URLs", filename, urls.len());

    Ok(path)
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://jane.dev";
    const BASE: [&str; 3] = ["/", "/blog", "/works"];

    fn touch(dir: &Path, name: &str) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "---\n---\n").unwrap();
    }

    fn blog_glob(dir: &Path) -> String {
        format!("{}/**/*.md", dir.display())
    }

    #[test]
    fn test_base_routes_then_blog_routes() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.md");
        touch(dir.path(), "a.md");

        let urls = build_sitemap_urls(ORIGIN, &BASE, &blog_glob(dir.path())).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://jane.dev/",
                "https://jane.dev/blog",
                "https://jane.dev/works",
                "https://jane.dev/blog/a",
                "https://jane.dev/blog/b",
            ]
        );
    }

    #[test]
    fn test_empty_directory_yields_base_urls() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "draft.txt");

        let urls = build_sitemap_urls(ORIGIN, &BASE, &blog_glob(dir.path())).unwrap();
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[2], "https://jane.dev/works");
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("blog");

        let err = build_sitemap_urls(ORIGIN, &BASE, &blog_glob(&missing)).unwrap_err();
        match err {
            SitemapError::Io { dir, .. } => assert_eq!(dir, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nested_files_use_stem_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "2023/recap.md");
        touch(dir.path(), "hello.world.md");

        let urls = build_sitemap_urls(ORIGIN, &BASE, &blog_glob(dir.path())).unwrap();
        assert!(urls.contains(&"https://jane.dev/blog/recap".to_string()));
        assert!(urls.contains(&"https://jane.dev/blog/hello.world".to_string()));
        assert_eq!(urls.len(), 5);
    }

    #[test]
    fn test_duplicate_urls_keep_first_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "en/intro.md");
        touch(dir.path(), "es/intro.md");
        touch(dir.path(), "zz.md");

        let urls = build_sitemap_urls(ORIGIN, &["/", "/blog", "/", "/works"], &blog_glob(dir.path()))
            .unwrap();
        assert_eq!(urls.len(), 5);
        assert_eq!(
            &urls[..3],
            &["https://jane.dev/", "https://jane.dev/blog", "https://jane.dev/works"]
        );
        let intro = urls
            .iter()
            .filter(|u| u.as_str() == "https://jane.dev/blog/intro")
            .count();
        assert_eq!(intro, 1);
        assert!(urls.contains(&"https://jane.dev/blog/zz".to_string()));
    }

    #[test]
    fn test_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "one.md");
        touch(dir.path(), "two.md");

        let builder = SitemapBuilder::new(ORIGIN)
            .base_routes(&BASE)
            .section("/blog", &blog_glob(dir.path()));
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }

    #[test]
    fn test_work_section_and_relative_root() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/content/blog/post.md");
        touch(dir.path(), "src/content/work/portfolio.md");

        let urls = SitemapBuilder::new("https://jane.dev/")
            .base_routes(&BASE)
            .root(dir.path())
            .section("/blog", "src/content/blog/**/*.md")
            .section("/works/", "src/content/work/**/*.md")
            .build()
            .unwrap();

        assert_eq!(urls[3], "https://jane.dev/blog/post");
        assert_eq!(urls[4], "https://jane.dev/works/portfolio");
    }

    #[test]
    fn test_file_names_are_percent_encoded() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "hello world.md");
        touch(dir.path(), "qué-es-rust.md");

        let urls = build_sitemap_urls(ORIGIN, &BASE, &blog_glob(dir.path())).unwrap();
        assert_eq!(urls.len(), 5);
        assert_eq!(urls[3], "https://jane.dev/blog/hello%20world");
        assert_eq!(urls[4], "https://jane.dev/blog/qu%C3%A9-es-rust");
    }

    #[test]
    fn test_invalid_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let glob = blog_glob(dir.path());

        assert!(matches!(
            build_sitemap_urls("jane.dev", &BASE, &glob),
            Err(SitemapError::InvalidOrigin(_))
        ));
        assert!(matches!(
            build_sitemap_urls(ORIGIN, &["about"], &glob),
            Err(SitemapError::InvalidRoute(route)) if route == "about"
        ));
    }

    #[test]
    fn test_literal_base() {
        assert_eq!(
            literal_base("src/content/blog/**/*.md"),
            PathBuf::from("src/content/blog")
        );
        assert_eq!(literal_base("/srv/blog/*.md"), PathBuf::from("/srv/blog"));
        assert_eq!(literal_base("*.md"), PathBuf::new());
        assert_eq!(literal_base("posts/a.md"), PathBuf::from("posts"));
    }

    #[test]
    fn test_render_xml() {
        let xml = render_xml(&["https://jane.dev/?a=1&b=2".to_string()]);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset"));
        assert!(xml.contains("<url><loc>https://jane.dev/?a=1&amp;b=2</loc></url>"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_write_sitemap() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("dist");
        let urls = vec!["https://jane.dev/".to_string()];

        let path = write_sitemap(&public, "sitemap.xml", &urls).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert!(written.contains("<loc>https://jane.dev/</loc>"));
    }
}
