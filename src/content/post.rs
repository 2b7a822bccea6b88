//! Post models

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::error::Result;
use super::frontmatter::{FrontMatter, RawFrontMatter};
use super::ContentError;

/// Extension of post source files
pub const POST_EXTENSION: &str = ".md";

/// Listing projection of a post: everything except the body
#[derive(Debug, Clone, PartialEq)]
pub struct PostMeta {
    /// File name without extension, the post's URL key
    pub slug: String,

    pub title: String,

    /// Publication day, `YYYY-MM-DD`
    pub date: String,

    /// Short text shown in listings
    pub summary: String,

    pub tags: Option<Vec<String>>,

    pub cover_image: Option<String>,

    /// Excluded from public queries
    pub draft: bool,
}

impl PostMeta {
    /// The summary under its listing name
    pub fn excerpt(&self) -> &str {
        &self.summary
    }

    /// The summary under its page-metadata name
    pub fn description(&self) -> &str {
        &self.summary
    }

    /// Tags, empty when the post has none
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// A blog post with its Markdown body
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub meta: PostMeta,

    /// Raw Markdown after the front-matter block
    pub content: String,
}

impl Post {
    /// Parse a post from its file name and full source text
    pub fn parse(file_name: &str, source: &str) -> Result<Self> {
        let (raw, body) =
            RawFrontMatter::split(source).map_err(|source| ContentError::FrontMatter {
                file: file_name.to_string(),
                source,
            })?;
        let fm = FrontMatter::validate(&raw, file_name)?;

        Ok(Self {
            meta: PostMeta {
                slug: slug_from_file_name(file_name).to_string(),
                title: fm.title,
                date: fm.date,
                summary: fm.summary,
                tags: fm.tags,
                cover_image: fm.cover_image,
                draft: fm.draft,
            },
            content: body.to_string(),
        })
    }

    pub fn slug(&self) -> &str {
        &self.meta.slug
    }

    pub fn is_draft(&self) -> bool {
        self.meta.draft
    }

    /// Drop the body, keeping the listing fields
    pub fn into_meta(self) -> PostMeta {
        self.meta
    }
}

/// Strip the Markdown extension from a file name
pub fn slug_from_file_name(file_name: &str) -> &str {
    file_name.strip_suffix(POST_EXTENSION).unwrap_or(file_name)
}

impl PostMeta {
    fn serialize_fields<S: SerializeStruct>(
        &self,
        state: &mut S,
    ) -> std::result::Result<(), S::Error> {
        state.serialize_field("slug", &self.slug)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("date", &self.date)?;
        state.serialize_field("excerpt", &self.summary)?;
        state.serialize_field("description", &self.summary)?;
        match &self.tags {
            Some(tags) => state.serialize_field("tags", tags)?,
            None => state.skip_field("tags")?,
        }
        match &self.cover_image {
            Some(image) => state.serialize_field("coverImage", image)?,
            None => state.skip_field("coverImage")?,
        }
        state.serialize_field("draft", &self.draft)
    }
}

// Both `excerpt` and `description` carry the one summary value
impl Serialize for PostMeta {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PostMeta", 8)?;
        self.serialize_fields(&mut state)?;
        state.end()
    }
}

impl Serialize for Post {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Post", 9)?;
        self.meta.serialize_fields(&mut state)?;
        state.serialize_field("content", &self.content)?;
        state.end()
    }
}
