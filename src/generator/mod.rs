//! Static site generator
//!
//! Builds the home page, the blog list, one page per published post and
//! the not-found page from the content repository.

use anyhow::{Context, Result};
use std::fs;

use crate::content::{ContentRepository, MarkdownRenderer, Post, PostMeta};
use crate::helpers::{
    date_xml, escape_html, full_url_for, image_tag, link_to, open_graph, post_path, tag_list,
    time_tag, url_for,
};
use crate::Folio;

/// What a generation run produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateStats {
    /// Post detail pages written
    pub posts: usize,
    /// Total HTML pages written
    pub pages: usize,
}

/// Site generator
pub struct Generator {
    folio: Folio,
    repository: ContentRepository,
    renderer: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &folio.config.highlight.theme,
            folio.config.highlight.line_number,
        );

        Self {
            folio: folio.clone(),
            repository: folio.repository(),
            renderer,
        }
    }

    /// Generate the entire site.
    ///
    /// Any content error aborts the run before a post page is written.
    pub async fn generate(&self) -> Result<GenerateStats> {
        let posts = self.repository.get_all_posts(false).await?;
        let latest = self
            .repository
            .get_latest_posts(self.folio.config.latest_posts)
            .await?;
        let slugs = self.repository.get_all_published_slugs().await?;

        fs::create_dir_all(&self.folio.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.folio.public_dir))?;

        let mut stats = GenerateStats::default();

        self.write_page("index.html", &self.render_home(&latest))?;
        self.write_page("blog/index.html", &self.render_blog_index(&posts))?;
        self.write_page("404.html", &self.render_not_found())?;
        stats.pages += 3;

        for slug in &slugs {
            let Some(post) = self.repository.get_post_by_slug(slug).await? else {
                tracing::warn!("Post {:?} disappeared during generation, skipping", slug);
                continue;
            };
            let html = self.render_post(&post)?;
            self.write_page(&format!("blog/{}/index.html", slug), &html)?;
            stats.posts += 1;
            stats.pages += 1;
        }

        Ok(stats)
    }

    fn write_page(&self, relative: &str, html: &str) -> Result<()> {
        let output_path = self.folio.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Wrap page content in the shared document layout
    fn layout(&self, title: &str, description: &str, head: &str, body: &str) -> String {
        let config = &self.folio.config;
        format!(
            r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
{head}
</head>
<body>
<nav class="site-nav">{home} {blog}</nav>
{body}
<footer class="site-footer">&copy; {author}</footer>
</body>
</html>
"#,
            lang = escape_html(&config.language),
            title = escape_html(title),
            description = escape_html(description),
            head = head,
            home = link_to(config, "/", &config.title),
            blog = link_to(config, "/blog/", "Blog"),
            body = body,
            author = escape_html(&config.author),
        )
    }

    /// Card for a post in a listing
    fn render_card(&self, post: &PostMeta, heading: &str) -> String {
        format!(
            r#"<article class="post-card">
<a href="{href}">
{time}
<{heading}>{title}</{heading}>
<p>{excerpt}</p>
{tags}
</a>
</article>"#,
            href = escape_html(&url_for(&self.folio.config, &post_path(&post.slug))),
            time = time_tag(&post.date),
            heading = heading,
            title = escape_html(&post.title),
            excerpt = escape_html(post.excerpt()),
            tags = tag_list(post.tags()),
        )
    }

    fn render_home(&self, latest: &[PostMeta]) -> String {
        let config = &self.folio.config;

        let posts = if latest.is_empty() {
            r#"<p class="empty-state">No blog posts published yet. New articles will appear here after the next deploy.</p>"#
                .to_string()
        } else {
            let cards: Vec<_> = latest.iter().map(|p| self.render_card(p, "h3")).collect();
            format!(r#"<div class="post-grid">{}</div>"#, cards.join("\n"))
        };

        let body = format!(
            r#"<main>
<section id="hero" class="hero">
<h1>{title}</h1>
<p>{description}</p>
</section>
<section id="blog" class="blog-preview">
<h2>Latest Writing</h2>
<p>Notes on tech, privacy, product decisions, and practical lessons from projects.</p>
{all}
{posts}
</section>
</main>"#,
            title = escape_html(&config.title),
            description = escape_html(&config.description),
            all = link_to(config, "/blog/", "Browse all posts"),
            posts = posts,
        );

        let og = open_graph(
            &config.title,
            &config.description,
            &full_url_for(config, "/"),
            None,
        );
        self.layout(&config.title, &config.description, &og, &body)
    }

    fn render_blog_index(&self, posts: &[Post]) -> String {
        let config = &self.folio.config;

        let list = if posts.is_empty() {
            r#"<section class="empty-state">
<h2>No posts yet</h2>
<p>Check back soon for new writing.</p>
</section>"#
                .to_string()
        } else {
            let cards: Vec<_> = posts
                .iter()
                .map(|p| self.render_card(&p.meta, "h2"))
                .collect();
            format!(r#"<section class="post-list">{}</section>"#, cards.join("\n"))
        };

        let description = "Thoughts on tech, privacy, and building things.";
        let body = format!(
            r#"<main class="blog">
<header>
<h1>Blog</h1>
<p>{description}</p>
</header>
{list}
</main>"#,
            description = description,
            list = list,
        );

        self.layout(&config.page_title("Blog"), description, "", &body)
    }

    fn render_post(&self, post: &Post) -> Result<String> {
        let config = &self.folio.config;
        let meta = &post.meta;

        let content = self
            .renderer
            .render(&post.content)
            .with_context(|| format!("Failed to render post {:?}", meta.slug))?;

        let cover = meta
            .cover_image
            .as_deref()
            .map(|src| {
                format!(
                    r#"<figure class="cover">{}</figure>"#,
                    image_tag(config, src, &meta.title)
                )
            })
            .unwrap_or_default();

        let body = format!(
            r#"<main>
<article class="post">
<header>
{back}
{time}
<h1>{title}</h1>
<p class="lead">{excerpt}</p>
{tags}
</header>
{cover}
<div class="post-content">
{content}
</div>
</article>
</main>"#,
            back = link_to(config, "/blog/", "\u{2190} Back to blog"),
            time = time_tag(&meta.date),
            title = escape_html(&meta.title),
            excerpt = escape_html(meta.excerpt()),
            tags = tag_list(meta.tags()),
            cover = cover,
            content = content,
        );

        let cover_url = meta
            .cover_image
            .as_deref()
            .map(|src| full_url_for(config, src));
        let mut head = open_graph(
            &meta.title,
            meta.description(),
            &full_url_for(config, &post_path(&meta.slug)),
            cover_url.as_deref(),
        );
        if let Some(published) = date_xml(&meta.date) {
            head.push_str(&format!(
                "\n<meta property=\"article:published_time\" content=\"{}\">",
                published
            ));
        }

        Ok(self.layout(
            &config.page_title(&meta.title),
            meta.description(),
            &head,
            &body,
        ))
    }

    fn render_not_found(&self) -> String {
        let config = &self.folio.config;
        let body = format!(
            r#"<main class="not-found">
<h1>404</h1>
<p>The page you are looking for does not exist.</p>
{home}
</main>"#,
            home = link_to(config, "/", "Go home"),
        );
        self.layout(
            &config.page_title("Page Not Found"),
            "The requested page could not be found.",
            "",
            &body,
        )
    }
}
