//! Helper functions for page rendering
//!
//! Date formatting, HTML escaping and URL building shared by the
//! generator and the Markdown renderer.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
