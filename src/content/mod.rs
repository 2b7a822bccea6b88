//! Content module - blog posts, front-matter and Markdown rendering

mod error;
mod frontmatter;
mod markdown;
mod post;
pub mod repository;

pub use error::{ContentError, Result};
pub use frontmatter::{FrontMatter, RawFrontMatter};
pub use markdown::MarkdownRenderer;
pub use post::{slug_from_file_name, Post, PostMeta, POST_EXTENSION};
pub use repository::ContentRepository;
