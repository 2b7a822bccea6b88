//! Clean the public directory

use anyhow::{Context, Result};
use std::fs;

use crate::Folio;

/// Delete the generated site
pub fn run(folio: &Folio) -> Result<()> {
    if folio.public_dir.exists() {
        fs::remove_dir_all(&folio.public_dir)
            .with_context(|| format!("Failed to delete {:?}", folio.public_dir))?;
        tracing::info!("Deleted: {:?}", folio.public_dir);
    }

    Ok(())
}
