//! List site content

use anyhow::Result;
use indexmap::IndexMap;

use crate::content::{Collection, CollectionKind, ContentLoader, ItemDetails};
use crate::sitemap::SitemapBuilder;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str, json: bool) -> Result<()> {
    let output = match content_type {
        "blog" | "post" | "posts" => {
            render_collection(&load(site, CollectionKind::Blog)?, json)?
        }
        "work" | "works" => render_collection(&load(site, CollectionKind::Work)?, json)?,
        "route" | "routes" => {
            let urls = SitemapBuilder::for_site(site).build()?;
            if json {
                serde_json::to_string_pretty(&urls)?
            } else {
                let mut out = format!("Routes ({}):\n", urls.len());
                for url in urls {
                    out.push_str(&format!("  {}\n", url));
                }
                out
            }
        }
        "tag" | "tags" => {
            let collections = ContentLoader::new(site).load_all()?;
            let tags = tag_counts(&[&collections.blog, &collections.work]);
            if json {
                serde_json::to_string_pretty(&tags)?
            } else {
                let mut out = format!("Tags ({}):\n", tags.len());
                for (tag, count) in tags {
                    out.push_str(&format!("  {} ({})\n", tag, count));
                }
                out
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: blog, work, route, tag",
                content_type
            );
        }
    };

    print!("{}", output);
    Ok(())
}

fn load(site: &Site, kind: CollectionKind) -> Result<Collection> {
    Ok(ContentLoader::new(site).load(kind)?)
}

/// Text or JSON listing of a collection, newest first
fn render_collection(collection: &Collection, json: bool) -> Result<String> {
    let mut entries: Vec<_> = collection.entries.iter().collect();
    entries.sort_by(|a, b| b.item.date.cmp(&a.item.date));

    if json {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                let mut value = serde_json::to_value(&e.item)?;
                value["slug"] = serde_json::Value::String(e.slug.clone());
                Ok(value)
            })
            .collect::<Result<_, serde_json::Error>>()?;
        return Ok(serde_json::to_string_pretty(&items)?);
    }

    let mut out = format!("{} ({}):\n", collection.kind, entries.len());
    for entry in entries {
        let item = &entry.item;
        out.push_str(&format!(
            "  {} - {} [{}] ({})",
            item.date.format("%Y-%m-%d"),
            item.title,
            entry.slug,
            item.language
        ));
        if let ItemDetails::Work { href, has_blog } = &item.details {
            out.push_str(&format!(" -> {}", href));
            if *has_blog {
                out.push_str(" +blog");
            }
        }
        out.push('\n');
    }
    Ok(out)
}

/// Tag usage across collections, most used first, ties in first-seen order
fn tag_counts(collections: &[&Collection]) -> IndexMap<String, usize> {
    let mut tags: IndexMap<String, usize> = IndexMap::new();
    for collection in collections {
        for entry in &collection.entries {
            for tag in &entry.item.tags {
                *tags.entry(tag.clone()).or_insert(0) += 1;
            }
        }
    }
    tags.sort_by(|_, a, _, b| b.cmp(a));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader::load_collection;
    use std::fs;

    fn collection(
        files: &[(&str, &str)],
        kind: CollectionKind,
    ) -> (tempfile::TempDir, Collection) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let collection = load_collection(kind, dir.path()).unwrap();
        (dir, collection)
    }

    fn post(date: &str, tags: &str) -> String {
        format!(
            "---\ntitle: Post {}\ndate: \"{}\"\ntags: {}\nlanguage: en\ndescription: d\n---\n",
            date, date, tags
        )
    }

    #[test]
    fn test_render_collection_newest_first() {
        let old = post("2023-01-01", "[rust]");
        let new = post("2024-05-01", "[rust]");
        let (_dir, blog) = collection(
            &[("old.md", old.as_str()), ("new.md", new.as_str())],
            CollectionKind::Blog,
        );

        let text = render_collection(&blog, false).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "blog (2):");
        assert_eq!(lines[1], "  2024-05-01 - Post 2024-05-01 [new] (en)");
        assert_eq!(lines[2], "  2023-01-01 - Post 2023-01-01 [old] (en)");
    }

    #[test]
    fn test_render_collection_json() {
        let work = "---\ntitle: Folio\ndate: 2024-01-01\ntags: [web]\nlanguage: es\ndescription: d\nhref: /folio\nhasBlog: true\n---\n";
        let (_dir, works) = collection(&[("folio.md", work)], CollectionKind::Work);

        let json: serde_json::Value =
            serde_json::from_str(&render_collection(&works, true).unwrap()).unwrap();
        assert_eq!(json[0]["slug"], "folio");
        assert_eq!(json[0]["hasBlog"], true);
        assert_eq!(json[0]["href"], "/folio");
        assert_eq!(json[0]["tags"][0], "web");
    }

    #[test]
    fn test_tag_counts() {
        let a = post("2024-01-01", "[rust, astro]");
        let b = post("2024-01-02", "[seo, rust]");
        let (_dir, blog) = collection(
            &[("a.md", a.as_str()), ("b.md", b.as_str())],
            CollectionKind::Blog,
        );

        let tags = tag_counts(&[&blog]);
        let ordered: Vec<_> = tags.iter().map(|(t, c)| (t.as_str(), *c)).collect();
        assert_eq!(ordered, vec![("rust", 2), ("astro", 1), ("seo", 1)]);
    }
}
