//! Rendering of the document tree into output units.
//!
//! ```text
//! DocumentTree + indexes
//!        │
//!        ▼
//!   unit builders ──► Block document ──► MarkupSerializer ──► html_body
//!        │
//!        ▼
//!   table of contents
//! ```

pub mod article;
pub mod assemble;
pub mod document;
pub mod front;
pub mod html;
pub mod title;
pub mod toc;
pub mod units;

pub use assemble::{assemble, AssemblyInput};
pub use html::{MarkupSerializer, XhtmlSerializer};
pub use toc::{TocEntry, TocLink};

use serde::Serialize;

use document::Block;

/// Role of an output unit in the publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Cover and information pages.
    Front,
    /// Introductory, division and fallback units.
    Content,
    /// Article and keyword index pages.
    Index,
    /// Appendices after the index pages.
    Appendix,
}

/// One renderable chapter of the publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    pub id: String,
    pub file_name: String,
    pub title: String,
    pub kind: UnitKind,

    /// Structured content the body was serialized from.
    pub blocks: Vec<Block>,

    /// Serialized body markup; empty until the unit is serialized.
    pub html_body: String,

    /// Second-level table of contents entries pointing into this unit.
    pub toc_children: Vec<TocLink>,

    /// Whether the unit gets a table of contents entry.
    pub in_toc: bool,
}

impl OutputUnit {
    /// Create a unit that is listed in the table of contents.
    pub fn new(
        id: impl Into<String>,
        file_name: impl Into<String>,
        title: impl Into<String>,
        kind: UnitKind,
        blocks: Vec<Block>,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            title: title.into(),
            kind,
            blocks,
            html_body: String::new(),
            toc_children: Vec::new(),
            in_toc: true,
        }
    }

    /// Set the second-level table of contents entries.
    #[must_use]
    pub fn with_toc_children(mut self, children: Vec<TocLink>) -> Self {
        self.toc_children = children;
        self
    }

    /// Exclude the unit from the table of contents.
    #[must_use]
    pub fn hidden_from_toc(mut self) -> Self {
        self.in_toc = false;
        self
    }

    /// Serialize the blocks into the body markup.
    #[must_use]
    pub fn serialized(mut self, serializer: &dyn MarkupSerializer) -> Self {
        self.html_body = serializer.serialize_blocks(&self.blocks);
        self
    }
}
