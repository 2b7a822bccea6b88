//! Content repository - read-through queries over the blog directory
//!
//! Every query goes back to disk; nothing is cached between calls.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tokio::fs;

use super::error::{ContentError, Result};
use super::post::POST_EXTENSION;
use super::{Post, PostMeta};

/// Blog posts stored as `<slug>.md` files in a single directory
#[derive(Debug, Clone)]
pub struct ContentRepository {
    root: PathBuf,
}

impl ContentRepository {
    /// Create a repository over the given content directory
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File names of the Markdown sources directly under the root.
    ///
    /// Order is whatever the filesystem enumerates. A missing root is an
    /// empty repository.
    pub async fn list_markdown_sources(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Content directory {:?} does not exist", self.root);
                return Ok(Vec::new());
            }
            Err(e) => return Err(ContentError::io(&self.root, e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ContentError::io(&self.root, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| ContentError::io(entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if !file_name
                .as_encoded_bytes()
                .ends_with(POST_EXTENSION.as_bytes())
            {
                continue;
            }
            // A post whose name is not UTF-8 has no slug and fails the load
            let name = file_name.into_string().map_err(|name| {
                ContentError::io(
                    entry.path(),
                    io::Error::new(
                        ErrorKind::InvalidData,
                        format!("post file name {:?} is not valid UTF-8", name),
                    ),
                )
            })?;
            names.push(name);
        }

        Ok(names)
    }

    /// Load every post, newest first.
    ///
    /// Files are read and parsed concurrently. A single failure fails the
    /// whole load; drafts are dropped unless `include_drafts` is set.
    pub async fn get_all_posts(&self, include_drafts: bool) -> Result<Vec<Post>> {
        let files = self.list_markdown_sources().await?;

        let tasks: Vec<_> = files
            .into_iter()
            .map(|file_name| {
                let path = self.root.join(&file_name);
                tokio::spawn(load_post(path, file_name))
            })
            .collect();

        let mut posts = Vec::with_capacity(tasks.len());
        for task in tasks {
            posts.push(task.await??);
        }

        if !include_drafts {
            posts.retain(|post| !post.is_draft());
        }
        sort_by_date_desc(&mut posts);

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.root);
        Ok(posts)
    }

    /// Look up a single published post by slug without scanning the directory
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let file_name = format!("{}{}", slug, POST_EXTENSION);
        let path = self.root.join(&file_name);

        let source = match fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ContentError::io(path, e)),
        };

        let post = Post::parse(&file_name, &source)?;
        Ok(Some(post).filter(|post| !post.is_draft()))
    }

    /// The `limit` most recent published posts, without bodies
    pub async fn get_latest_posts(&self, limit: usize) -> Result<Vec<PostMeta>> {
        let posts = self.get_all_posts(false).await?;
        Ok(posts
            .into_iter()
            .take(limit)
            .map(Post::into_meta)
            .collect())
    }

    /// Slugs of all published posts, newest first
    pub async fn get_all_published_slugs(&self) -> Result<Vec<String>> {
        let posts = self.get_all_posts(false).await?;
        Ok(posts.into_iter().map(|post| post.meta.slug).collect())
    }
}

async fn load_post(path: PathBuf, file_name: String) -> Result<Post> {
    let source = fs::read_to_string(&path)
        .await
        .map_err(|e| ContentError::io(&path, e))?;
    let post = Post::parse(&file_name, &source)?;
    tracing::debug!("Loaded post: {:?}", path);
    Ok(post)
}

/// Sort by `YYYY-MM-DD` date, newest first; equal dates keep their order
fn sort_by_date_desc(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.meta.date.cmp(&a.meta.date));
}
