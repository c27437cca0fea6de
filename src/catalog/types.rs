// Catalog item types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Kind tag attached to every candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Application,
    File,
    Folder,
    Text,
    Contact,
    Url,
    Action,
    Other,
}

/// Set of accepted kinds, used for search filters and action requirements
pub type KindSet = BTreeSet<ItemKind>;

impl ItemKind {
    pub const ALL: [ItemKind; 8] = [
        ItemKind::Application,
        ItemKind::File,
        ItemKind::Folder,
        ItemKind::Text,
        ItemKind::Contact,
        ItemKind::Url,
        ItemKind::Action,
        ItemKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::File => "file",
            Self::Folder => "folder",
            Self::Text => "text",
            Self::Contact => "contact",
            Self::Url => "url",
            Self::Action => "action",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ItemKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| format!("unknown item kind: {}", s))
    }
}

/// Anything the engine can rank.
///
/// `supports_context` lets actions opt out when the paired item is of a kind
/// they cannot act on. Items that are not actions keep the default.
pub trait Searchable {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn kind(&self) -> ItemKind;

    fn supports_context(&self, _context: &dyn Searchable) -> bool {
        true
    }
}

/// Catalog candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_kind")]
    pub kind: ItemKind,
    /// Context kinds this candidate accepts; `None` accepts any context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<KindSet>,
}

fn default_kind() -> ItemKind {
    ItemKind::Other
}

impl Candidate {
    /// Create a candidate with an id derived from its content
    pub fn new(kind: ItemKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut candidate = Self {
            id: String::new(),
            name: name.into(),
            description: description.into(),
            kind,
            requires: None,
        };
        candidate.id = candidate.derived_id();
        candidate
    }

    /// Plain text item, as typed by the user
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ItemKind::Text, text, "")
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Restrict the context kinds this candidate can act on
    pub fn requiring(mut self, kinds: impl IntoIterator<Item = ItemKind>) -> Self {
        self.requires = Some(kinds.into_iter().collect());
        self
    }

    /// Stable id: SHA-256 of kind, name and description
    pub fn derived_id(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.kind.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.name.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.description.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl Searchable for Candidate {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn kind(&self) -> ItemKind {
        self.kind
    }

    fn supports_context(&self, context: &dyn Searchable) -> bool {
        match &self.requires {
            Some(kinds) => kinds.contains(&context.kind()),
            None => true,
        }
    }
}
