//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    /// Directory holding `<slug>.md` post files
    pub content_dir: String,
    pub public_dir: String,

    // Home page
    /// Number of posts in the home page "Latest Writing" section
    pub latest_posts: usize,

    // Writing
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content/blog".to_string(),
            public_dir: "public".to_string(),

            latest_posts: 3,

            highlight: HighlightConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {:?}", path))?;
        Ok(config)
    }

    /// `<title> | <author>` style page title
    pub fn page_title(&self, title: &str) -> String {
        format!("{} | {}", title, self.author)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content/blog");
        assert_eq!(config.public_dir, "public");
        assert_eq!(config.latest_posts, 3);
        assert!(!config.highlight.line_number);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: David Novák
author: David Novák
content_dir: posts
latest_posts: 6
highlight:
  line_number: true
analytics: plausible
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "David Novák");
        assert_eq!(config.content_dir, "posts");
        assert_eq!(config.latest_posts, 6);
        assert!(config.highlight.line_number);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert!(config.extra.contains_key("analytics"));
    }

    #[test]
    fn test_load_reports_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("_config.yml");
        fs::write(&path, "latest_posts: many\n").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("_config.yml"));
    }

    #[test]
    fn test_page_title() {
        let config = SiteConfig {
            author: "David Novák".to_string(),
            ..Default::default()
        };
        assert_eq!(config.page_title("Blog"), "Blog | David Novák");
    }
}
