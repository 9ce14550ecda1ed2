/// Link and outcome definitions
///
/// A `LinkDescriptor` is produced once by link extraction and never mutated.
/// A `ValidationOutcome` is produced exactly once per descriptor per run.
use crate::checker::StatusCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The element kind a reference was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    /// `<a href>`
    #[serde(rename = "a")]
    Anchor,

    /// `<img src>`
    #[serde(rename = "img")]
    Image,

    /// `<link rel="stylesheet" href>`
    #[serde(rename = "link")]
    Stylesheet,

    /// `<script src>`
    #[serde(rename = "script")]
    Script,
}

impl TagKind {
    /// All tag kinds, in extraction order
    pub const ALL: [TagKind; 4] = [Self::Anchor, Self::Image, Self::Stylesheet, Self::Script];

    /// Returns the HTML tag name for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anchor => "a",
            Self::Image => "img",
            Self::Stylesheet => "link",
            Self::Script => "script",
        }
    }

    /// Parses a tag kind from its HTML tag name
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "a" => Some(Self::Anchor),
            "img" => Some(Self::Image),
            "link" => Some(Self::Stylesheet),
            "script" => Some(Self::Script),
            _ => None,
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference found on the page, to be validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    /// Absolute http(s) URL
    pub url: String,

    /// The element kind the URL was found on
    pub kind: TagKind,

    /// Visible text or alt/title attribute, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Stable opaque identifier used to correlate rows with page elements
    pub id: String,
}

impl LinkDescriptor {
    pub fn new(
        url: impl Into<String>,
        kind: TagKind,
        text: Option<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            kind,
            text,
            id: id.into(),
        }
    }
}

/// The classified result of validating one `LinkDescriptor`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub url: String,
    pub kind: TagKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub id: String,

    /// HTTP status code, absent when no response was received
    pub status: Option<u16>,

    pub category: StatusCategory,

    /// Human-readable status description
    pub description: String,

    pub checked_at: DateTime<Utc>,
}

impl ValidationOutcome {
    /// Builds an outcome for `link`, copying its identity fields verbatim
    pub fn for_link(
        link: &LinkDescriptor,
        status: Option<u16>,
        category: StatusCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            url: link.url.clone(),
            kind: link.kind,
            text: link.text.clone(),
            id: link.id.clone(),
            status,
            category,
            description: description.into(),
            checked_at: Utc::now(),
        }
    }

    /// Returns true if the reference is broken (anything but success or redirect)
    pub fn is_broken(&self) -> bool {
        self.category.is_broken()
    }
}
