//! Read-only indexes derived from a finished document tree.
//!
//! Both builders are pure traversals: they borrow the tree, never mutate it,
//! and return new structures. Every article location is computed the same
//! way, so the article index, the keyword index and the rendered units all
//! agree on where an article lives.

pub mod article;
pub mod keyword;

pub use article::{ArticleIndex, ArticleIndexEntry};
pub use keyword::{KeywordHit, KeywordIndex, VOCABULARY};

use crate::config::INTRO_FILE;
use crate::hierarchy::{article_anchor, Division};

/// File name of the unit a division renders into.
#[must_use]
pub fn division_file(ordinal: usize) -> String {
    format!("titulo_{ordinal}.xhtml")
}

/// Output unit and anchor that content is rendered into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// File name of the output unit.
    pub file: String,

    /// Anchor id inside the unit.
    pub anchor: String,
}

impl Location {
    /// Location of an article, given its enclosing division (if any).
    #[must_use]
    pub fn for_article(division: Option<&Division>, number: &str) -> Self {
        let file = division.map_or_else(|| INTRO_FILE.to_string(), |d| division_file(d.ordinal));
        Self {
            file,
            anchor: article_anchor(number),
        }
    }

    /// Relative link target, e.g. `titulo_2.xhtml#art_10bis`.
    #[must_use]
    pub fn href(&self) -> String {
        format!("{}#{}", self.file, self.anchor)
    }
}
