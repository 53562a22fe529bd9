//! Validate every content entry

use anyhow::Result;

use crate::content::{Collections, ContentLoader};
use crate::Site;

/// Load both collections; any invalid entry fails the check
pub fn run(site: &Site) -> Result<Collections> {
    let loader = ContentLoader::new(site);
    let collections = loader.load_all()?;

    tracing::info!(
        "Validated {} blog and {} work entries",
        collections.blog.len(),
        collections.work.len()
    );

    Ok(collections)
}
