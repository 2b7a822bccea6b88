//! HTML helper functions

use super::url::{is_external, url_for};
use crate::config::SiteConfig;

/// Escape text for use in HTML content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Generate an anchor tag; external links open in a new tab
///
/// # Examples
/// ```ignore
/// link_to(&config, "/blog/", "Blog") // -> <a href="/blog/">Blog</a>
/// ```
pub fn link_to(config: &SiteConfig, path: &str, text: &str) -> String {
    let href = escape_html(&url_for(config, path));
    if is_external(path) {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            href,
            escape_html(text)
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, href, escape_html(text))
    }
}

/// Generate an image tag
pub fn image_tag(config: &SiteConfig, path: &str, alt: &str) -> String {
    format!(
        r#"<img src="{}" alt="{}" loading="lazy">"#,
        escape_html(&url_for(config, path)),
        escape_html(alt)
    )
}

/// Generate a `<time>` element for a post date
pub fn time_tag(date: &str) -> String {
    format!(
        r#"<time datetime="{}">{}</time>"#,
        escape_html(date),
        escape_html(&super::format_blog_date(date))
    )
}

/// Render tags as pill spans; empty when there are none
pub fn tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let items: String = tags
        .iter()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, escape_html(tag)))
        .collect();
    format!(r#"<div class="tags">{}</div>"#, items)
}

/// Generate Open Graph meta tags for a page
pub fn open_graph(title: &str, description: &str, url: &str, image: Option<&str>) -> String {
    let mut tags = vec![
        format!(r#"<meta property="og:title" content="{}">"#, escape_html(title)),
        format!(
            r#"<meta property="og:description" content="{}">"#,
            escape_html(description)
        ),
        format!(r#"<meta property="og:url" content="{}">"#, escape_html(url)),
    ];
    if let Some(image) = image {
        tags.push(format!(
            r#"<meta property="og:image" content="{}">"#,
            escape_html(image)
        ));
    }
    tags.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig::default()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_link_to() {
        let config = test_config();
        assert_eq!(link_to(&config, "/blog/", "Blog"), r#"<a href="/blog/">Blog</a>"#);
        assert!(link_to(&config, "https://github.com", "GitHub").contains(r#"target="_blank""#));
    }

    #[test]
    fn test_time_tag() {
        assert_eq!(
            time_tag("2024-01-05"),
            r#"<time datetime="2024-01-05">January 5, 2024</time>"#
        );
    }

    #[test]
    fn test_tag_list() {
        assert_eq!(tag_list(&[]), "");
        let html = tag_list(&["rust".to_string(), "<web>".to_string()]);
        assert!(html.contains(r#"<span class="tag">rust</span>"#));
        assert!(html.contains("&lt;web&gt;"));
    }

    #[test]
    fn test_open_graph() {
        let html = open_graph("Title", "Desc", "https://example.com/", Some("/a.png"));
        assert!(html.contains(r#"og:image" content="/a.png""#));
        assert!(!open_graph("T", "D", "U", None).contains("og:image"));
    }
}
