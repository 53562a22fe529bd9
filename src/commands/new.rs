//! Create a new blog or work entry

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::CollectionKind;
use crate::Site;

/// Scaffold an entry carrying every field its schema requires
pub fn create_entry(
    site: &Site,
    kind: CollectionKind,
    title: &str,
    path: Option<&str>,
) -> Result<PathBuf> {
    let target_dir = site.content_dir.join(kind.name());
    fs::create_dir_all(&target_dir)?;

    let name = match path {
        Some(p) => p.trim_end_matches(".md").to_string(),
        None => slug::slugify(title),
    };
    if name.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let file_path = target_dir.join(format!("{}.md", name));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&file_path, scaffold(kind, title))?;
    tracing::info!("Created {} entry {:?}", kind, file_path);

    Ok(file_path)
}

fn scaffold(kind: CollectionKind, title: &str) -> String {
    let now = chrono::Utc::now();
    let mut content = format!(
        "---\ntitle: {}\ndate: \"{}\"\ntags: []\nlanguage: en\ndescription: {}\n",
        yaml_string(title),
        now.format("%Y-%m-%d"),
        yaml_string(title)
    );

    if kind == CollectionKind::Work {
        content.push_str("href: \"/\"\nhasBlog: false\n");
    }

    content.push_str("---\n");
    content
}

/// Quote a value for a YAML scalar
fn yaml_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{:?}", s))
}
