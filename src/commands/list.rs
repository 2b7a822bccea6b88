//! List blog posts

use anyhow::Result;

use crate::content::Post;
use crate::Folio;

/// Print posts newest first, as text lines or JSON
pub async fn run(folio: &Folio, include_drafts: bool, json: bool) -> Result<()> {
    let posts = folio.repository().get_all_posts(include_drafts).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    } else {
        println!("Posts ({}):", posts.len());
        for post in &posts {
            println!("  {}", format_line(post));
        }
    }

    Ok(())
}

fn format_line(post: &Post) -> String {
    let meta = &post.meta;
    let mut line = format!("{} - {} [{}]", meta.date, meta.title, meta.slug);
    if meta.draft {
        line.push_str(" (draft)");
    }
    line
}
