//! Page link extraction
//!
//! This module handles:
//! - Parsing a page's HTML for anchors, images, stylesheets, and scripts
//! - Fetching a page over HTTP and remembering what was extracted from it

mod inspector;
mod parser;

pub use inspector::{HttpPageInspector, PageInspector};
pub use parser::extract_links;

use thiserror::Error;

/// Errors raised while fetching or parsing a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid page URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported page URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Page returned HTTP {0}")]
    HttpStatus(u16),
}
