//! Initialize a new site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::content::POST_EXTENSION;
use crate::helpers::today;
use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Site
title: My Portfolio
description: ''
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
content_dir: content/blog
public_dir: public

# Home page
latest_posts: 3

# Writing
highlight:
  theme: base16-ocean.dark
  line_number: false
"#;

const SAMPLE_POST: &str = "hello-world";

/// Initialize a new site in the given directory.
///
/// Existing files are left untouched.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)
        .with_context(|| format!("Failed to create {:?}", target_dir))?;

    let config_path = target_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, DEFAULT_CONFIG)?;
        tracing::debug!("Created: {:?}", config_path);
    }

    let config = SiteConfig::load(&config_path)?;
    let content_dir = target_dir.join(&config.content_dir);
    fs::create_dir_all(&content_dir)?;

    let sample = content_dir.join(format!("{}{}", SAMPLE_POST, POST_EXTENSION));
    if !sample.exists() {
        fs::write(&sample, sample_post(&today()))?;
        tracing::debug!("Created: {:?}", sample);
    }

    Ok(())
}

fn sample_post(date: &str) -> String {
    format!(
        r#"---
title: Hello World
date: {}
description: The first post on this site.
tags:
  - meta
---

Welcome! Edit or delete this file in the content directory, then run
`folio generate` to rebuild the site.
"#,
        date
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Folio;

    #[tokio::test]
    async fn test_init_site_is_loadable() {
        let tmp = tempfile::TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();

        let folio = Folio::new(tmp.path()).unwrap();
        assert_eq!(folio.config.title, "My Portfolio");

        let slugs = folio.repository().get_all_published_slugs().await.unwrap();
        assert_eq!(slugs, vec![SAMPLE_POST]);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "title: Mine\n").unwrap();

        init_site(tmp.path()).unwrap();

        let config = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, "title: Mine\n");
        assert!(tmp.path().join("content/blog/hello-world.md").exists());
    }
}
