//! Build the site artifacts

use anyhow::Result;
use std::path::PathBuf;

use crate::sitemap::{self, SitemapBuilder};
use crate::Site;

/// What a build produced
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub blog_entries: usize,
    pub work_entries: usize,
    pub urls: Vec<String>,
    pub sitemap_path: PathBuf,
}

/// Validate content, then derive and write the sitemap
pub fn run(site: &Site) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let collections = super::check::run(site)?;

    let urls = SitemapBuilder::for_site(site).build()?;
    let sitemap_path =
        sitemap::write_sitemap(&site.public_dir, &site.config.sitemap.filename, &urls)?;

    let duration = start.elapsed();
    tracing::info!("Built in {:.2}s", duration.as_secs_f64());

    Ok(BuildReport {
        blog_entries: collections.blog.len(),
        work_entries: collections.work.len(),
        urls,
        sitemap_path,
    })
}
