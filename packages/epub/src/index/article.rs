//! Article index: normalized article number to location.

use std::collections::HashMap;

use tracing::debug;

use super::Location;
use crate::hierarchy::DocumentTree;

/// One indexed article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleIndexEntry {
    /// Normalized article number.
    pub number: String,

    /// Article title as written in the source.
    pub title: String,

    pub location: Location,

    /// Heading text of the enclosing division, if any.
    pub division_text: Option<String>,

    /// Heading text of the enclosing sub-division, if any.
    pub subdivision_text: Option<String>,
}

/// Article number lookup table.
///
/// Holds at most one entry per normalized number. When the source repeats a
/// number, the first occurrence wins and later ones stay unindexed.
#[derive(Debug, Clone, Default)]
pub struct ArticleIndex {
    entries: Vec<ArticleIndexEntry>,
    by_number: HashMap<String, usize>,
}

impl ArticleIndex {
    /// Build the index with a single pass over the tree in document order.
    #[must_use]
    pub fn build(tree: &DocumentTree) -> Self {
        let mut index = Self::default();

        for ctx in tree.articles() {
            let Some(number) = ctx.article.number.as_deref() else {
                continue;
            };
            if index.by_number.contains_key(number) {
                debug!(number, "Duplicate article number, keeping first occurrence");
                continue;
            }

            index.by_number.insert(number.to_string(), index.entries.len());
            index.entries.push(ArticleIndexEntry {
                number: number.to_string(),
                title: ctx.article.title.clone(),
                location: Location::for_article(ctx.division, number),
                division_text: ctx.division.map(|d| d.text.clone()),
                subdivision_text: ctx.subdivision.map(|s| s.text.clone()),
            });
        }

        index
    }

    /// Look up an entry by normalized number.
    #[must_use]
    pub fn get(&self, number: &str) -> Option<&ArticleIndexEntry> {
        self.by_number.get(number).map(|&i| &self.entries[i])
    }

    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = &ArticleIndexEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_tree;
    use crate::types::Fragment;

    fn tree(texts: &[&str]) -> DocumentTree {
        let fragments: Vec<Fragment> = texts.iter().map(|t| Fragment::new(*t)).collect();
        build_tree(&fragments)
    }

    #[test]
    fn test_entries_follow_document_order() {
        let index = ArticleIndex::build(&tree(&[
            "TÍTULO I Disposiciones",
            "Artículo 1 Esta ley regula...",
            "Artículo 2 Remítase al artículo 1 para definiciones.",
        ]));

        assert_eq!(index.len(), 2);
        let numbers: Vec<&str> = index.iter().map(|e| e.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2"]);

        let entry = index.get("2").unwrap();
        assert_eq!(entry.location.href(), "titulo_1.xhtml#art_2");
        assert_eq!(entry.division_text.as_deref(), Some("TÍTULO I Disposiciones"));
        assert!(entry.subdivision_text.is_none());
    }

    #[test]
    fn test_duplicate_number_first_wins() {
        let index = ArticleIndex::build(&tree(&[
            "TÍTULO I Primero",
            "Artículo 1 Original.",
            "TÍTULO II Segundo",
            "Artículo 1 Repetido.",
            "Artículo 1 bis Nuevo.",
        ]));

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("1").unwrap().location.file, "titulo_1.xhtml");
        assert_eq!(index.get("1bis").unwrap().location.file, "titulo_2.xhtml");
    }

    #[test]
    fn test_intro_articles_and_subdivision_parent() {
        let index = ArticleIndex::build(&tree(&[
            "Artículo 1 Preliminar.",
            "TÍTULO I Mesas",
            "PÁRRAFO 1 Constitución",
            "Artículo 2 Dentro.",
        ]));

        assert_eq!(index.get("1").unwrap().location.href(), "intro.xhtml#art_1");
        assert_eq!(
            index.get("2").unwrap().subdivision_text.as_deref(),
            Some("PÁRRAFO 1 Constitución")
        );
    }

    #[test]
    fn test_unnumbered_articles_not_indexed() {
        let mut doc = tree(&["TÍTULO I A", "Artículo 1 Uno."]);
        if let crate::hierarchy::Child::Leaf(crate::hierarchy::Leaf::Article(a)) =
            &mut doc.divisions[0].children[0]
        {
            a.number = None;
        }
        assert!(ArticleIndex::build(&doc).is_empty());
        assert!(ArticleIndex::build(&DocumentTree::default()).get("1").is_none());
    }
}
