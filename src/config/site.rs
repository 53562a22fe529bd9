//! Site configuration (site.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or checking `site.yml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid site origin {0:?}: expected http(s)://host with no path")]
    InvalidOrigin(String),

    #[error("invalid base route {0:?}: routes must start with '/'")]
    InvalidRoute(String),

    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Deployed origin, e.g. `https://example.com`
    pub site: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    #[serde(default)]
    pub sitemap: SitemapConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: "http://example.com".to_string(),
            content_dir: "src/content".to_string(),
            public_dir: "dist".to_string(),
            sitemap: SitemapConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: SiteConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.site = config.site.trim_end_matches('/').to_string();
        config.validate()?;
        tracing::debug!("Loaded site config from {:?}", path);
        Ok(config)
    }

    /// Check the values the build relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_origin(&self.site)?;

        for route in &self.sitemap.base_routes {
            if !route.starts_with('/') {
                return Err(ConfigError::InvalidRoute(route.clone()));
            }
        }

        if self.content_dir.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "content_dir",
            });
        }
        if self.public_dir.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "public_dir",
            });
        }
        if self.sitemap.filename.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "sitemap.filename",
            });
        }

        Ok(())
    }
}

/// Check that `origin` is `http(s)://host[:port]` with no trailing slash or path
pub fn validate_origin(origin: &str) -> Result<(), ConfigError> {
    let host = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
        .ok_or_else(|| ConfigError::InvalidOrigin(origin.to_string()))?;

    if host.is_empty() || host.contains('/') || host.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidOrigin(origin.to_string()));
    }

    Ok(())
}

/// Sitemap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Static routes listed before any content route
    pub base_routes: Vec<String>,
    /// Glob for blog entries, relative to the site root
    pub blog_glob: String,
    /// Glob for work entries, relative to the site root
    pub work_glob: String,
    /// Also emit `/works/<slug>` for every work entry
    pub include_work_pages: bool,
    /// Output file name inside the public directory
    pub filename: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            base_routes: vec!["/".to_string(), "/blog".to_string(), "/works".to_string()],
            blog_glob: "src/content/blog/**/*.md".to_string(),
            work_glob: "src/content/work/**/*.md".to_string(),
            include_work_pages: false,
            filename: "sitemap.xml".to_string(),
        }
    }
}
