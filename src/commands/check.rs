//! Validate all blog content

use anyhow::Result;

use crate::Folio;

/// Counts from a successful content check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckReport {
    pub published: usize,
    pub drafts: usize,
}

/// Load every post, drafts included; the first invalid file is the error
pub async fn run(folio: &Folio) -> Result<CheckReport> {
    let posts = folio.repository().get_all_posts(true).await?;
    let drafts = posts.iter().filter(|p| p.is_draft()).count();

    let report = CheckReport {
        published: posts.len() - drafts,
        drafts,
    };
    tracing::info!(
        "Checked {:?}: {} published, {} drafts",
        folio.content_dir,
        report.published,
        report.drafts
    );

    Ok(report)
}
