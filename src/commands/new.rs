//! Create a new post

use anyhow::{bail, Context, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::PathBuf;

use crate::content::POST_EXTENSION;
use crate::helpers::today;
use crate::Folio;

/// Scaffold `<content_dir>/<slug>.md` and return its path.
///
/// The slug defaults to the slugified title. The summary is left empty for
/// the author to fill in; the post does not validate until they do.
pub fn create_post(
    folio: &Folio,
    title: &str,
    slug: Option<&str>,
    draft: bool,
) -> Result<PathBuf> {
    let title = title.trim();
    if title.is_empty() {
        bail!("A post needs a title");
    }

    let slug = match slug {
        Some(s) => s.trim().to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() || slug.contains(['/', '\\']) || slug.starts_with('.') {
        bail!("Invalid slug: {:?}", slug);
    }

    fs::create_dir_all(&folio.content_dir)
        .with_context(|| format!("Failed to create {:?}", folio.content_dir))?;

    let file_path = folio.content_dir.join(format!("{}{}", slug, POST_EXTENSION));

    // Check if file already exists
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, scaffold(title, &today(), draft)?)
        .with_context(|| format!("Failed to write {:?}", file_path))?;

    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

fn scaffold(title: &str, date: &str, draft: bool) -> Result<String> {
    let mut fm = Mapping::new();
    fm.insert("title".into(), title.into());
    fm.insert("date".into(), date.into());
    fm.insert("description".into(), "".into());
    fm.insert("tags".into(), Value::Sequence(Vec::new()));
    if draft {
        fm.insert("draft".into(), true.into());
    }

    let yaml = serde_yaml::to_string(&fm)?;
    Ok(format!("---\n{}---\n\n", yaml))
}
