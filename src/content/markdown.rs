//! Markdown rendering with syntax highlighting
//!
//! Raw HTML in post bodies is escaped rather than passed through, so the
//! output can be embedded in a page as-is.

use std::collections::HashMap;

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::escape_html;

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // Front-matter is stripped before rendering, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;
        let mut image: Option<(String, String, String)> = None;
        let mut external_link = false;

        for event in parser {
            if let Some((_, code)) = code_block.as_mut() {
                match event {
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((lang, code)) = code_block.take() {
                            let highlighted = self.highlight_code(&code, lang.as_deref());
                            events.push(Event::Html(CowStr::from(highlighted)));
                        }
                    }
                    Event::Text(text) => code.push_str(&text),
                    _ => {}
                }
                continue;
            }

            if let Some((_, _, alt)) = image.as_mut() {
                match event {
                    Event::End(TagEnd::Image) => {
                        if let Some((src, title, alt)) = image.take() {
                            events.push(Event::Html(CowStr::from(image_tag(&src, &title, &alt))));
                        }
                    }
                    Event::Text(text) | Event::Code(text) => alt.push_str(&text),
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    image = Some((dest_url.to_string(), title.to_string(), String::new()));
                }
                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) if dest_url.starts_with("http") => {
                    external_link = true;
                    let title = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, escape_html(&title))
                    };
                    events.push(Event::Html(CowStr::from(format!(
                        r#"<a href="{}"{} target="_blank" rel="noopener noreferrer">"#,
                        escape_html(&dest_url),
                        title
                    ))));
                }
                Event::End(TagEnd::Link) if external_link => {
                    external_link = false;
                    events.push(Event::Html(CowStr::from("</a>")));
                }
                // Author HTML is shown as text, never injected
                Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
                event => events.push(event),
            }
        }

        add_heading_ids(&mut events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme
            .and_then(|theme| {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
            });

        match highlighted {
            Some(highlighted) if self.line_numbers => self.add_line_numbers(&highlighted, lang),
            Some(highlighted) => format!(
                r#"<div class="highlight language-{}">{}</div>"#,
                escape_html(lang),
                highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(code)
            ),
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();

        let gutter = (1..=lines.len())
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            escape_html(lang),
            gutter,
            lines.join("\n")
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn image_tag(src: &str, title: &str, alt: &str) -> String {
    let title = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    format!(
        r#"<img src="{}" alt="{}"{} loading="lazy" />"#,
        escape_html(src),
        escape_html(alt),
        title
    )
}

/// Give every heading without an explicit id a unique slug id
fn add_heading_ids(events: &mut [Event]) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for start in 0..events.len() {
        let needs_id = matches!(&events[start], Event::Start(Tag::Heading { id: None, .. }));
        if !needs_id {
            continue;
        }

        let mut text = String::new();
        for event in &events[start + 1..] {
            match event {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
        }

        let base = slug::slugify(&text);
        let count = seen.entry(base.clone()).or_insert(0);
        let heading_id = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
            *id = Some(CowStr::from(heading_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains("highlight"));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_render_code_block_with_line_numbers() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", true);
        let html = renderer.render("```\na\nb\n```").unwrap();
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("<script>alert(1)</script>\n\nInline <b>bold</b>.")
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_external_links_open_in_new_tab() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("[site](https://example.com) and [local](/blog/)")
            .unwrap();
        assert!(html.contains(
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">site</a>"#
        ));
        assert!(html.contains(r#"<a href="/blog/">local</a>"#));
    }

    #[test]
    fn test_images_are_lazy() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("![A cat](/img/cat.png)").unwrap();
        assert!(html.contains(r#"<img src="/img/cat.png" alt="A cat" loading="lazy" />"#));
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("## Notes\n\n## Notes\n").unwrap();
        assert!(html.contains(r#"<h2 id="notes">"#));
        assert!(html.contains(r#"<h2 id="notes-1">"#));
    }

    #[test]
    fn test_gfm_table() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();
        assert!(html.contains("<table>"));
    }
}
