//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::CollectionKind;
use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Site origin, no trailing slash
site: http://example.com

# Directory
content_dir: src/content
public_dir: dist

# Sitemap
sitemap:
  base_routes:
    - /
    - /blog
    - /works
  blog_glob: src/content/blog/**/*.md
  work_glob: src/content/work/**/*.md
  include_work_pages: false
  filename: sitemap.xml
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{:?} already exists", config_path);
    }

    for kind in CollectionKind::ALL {
        fs::create_dir_all(target_dir.join("src/content").join(kind.name()))?;
    }
    fs::write(&config_path, DEFAULT_CONFIG)?;

    let today = chrono::Utc::now().format("%Y-%m-%d");
    let sample_post = format!(
        r#"---
title: Hello World
date: "{}"
tags:
  - meta
language: en
description: The first post on this site.
---

Welcome! Edit or delete this post, then run `folio-rs build`.
"#,
        today
    );
    fs::write(
        target_dir.join("src/content/blog/hello-world.md"),
        sample_post,
    )?;

    Ok(())
}
