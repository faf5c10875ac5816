//! Cross-reference resolution.
//!
//! Article bodies are turned into inline content where every citation of a
//! known article becomes a link to its location. Only literal text segments
//! are scanned; existing links are passed through untouched, so resolving
//! already resolved content is a no-op.

use crate::classify::{citation_key, ARTICLE_CITATION};
use crate::index::ArticleIndex;
use crate::render::document::Inline;

/// Class attached to inserted cross-reference links.
pub const CROSS_REF_CLASS: &str = "cross-ref";

/// Result of resolving one piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub content: Vec<Inline>,

    /// Citations found in the text whose article is not indexed.
    pub unresolved: usize,
}

/// Rewrites article citations into links using an [`ArticleIndex`].
#[derive(Debug, Clone, Copy)]
pub struct CrossReferenceResolver<'a> {
    index: &'a ArticleIndex,
}

impl<'a> CrossReferenceResolver<'a> {
    #[must_use]
    pub fn new(index: &'a ArticleIndex) -> Self {
        Self { index }
    }

    /// Resolve citations in plain text.
    ///
    /// # Examples
    /// ```
    /// use leychile_epub::hierarchy::build_tree;
    /// use leychile_epub::index::ArticleIndex;
    /// use leychile_epub::types::Fragment;
    /// use leychile_epub::xref::CrossReferenceResolver;
    ///
    /// let tree = build_tree(&[Fragment::new("TÍTULO I A"), Fragment::new("Artículo 1 Uno.")]);
    /// let index = ArticleIndex::build(&tree);
    /// let resolved = CrossReferenceResolver::new(&index).resolve_text("Ver artículo 1 y artículo 9.");
    /// assert_eq!(resolved.content.len(), 3);
    /// assert_eq!(resolved.unresolved, 1);
    /// ```
    #[must_use]
    pub fn resolve_text(&self, text: &str) -> Resolved {
        self.resolve(vec![Inline::text(text)])
    }

    /// Resolve citations in every text segment of `content`.
    ///
    /// Adjacent text segments are merged; all other inline elements are
    /// kept as they are.
    #[must_use]
    pub fn resolve(&self, content: Vec<Inline>) -> Resolved {
        let mut out: Vec<Inline> = Vec::with_capacity(content.len());
        let mut unresolved = 0;

        for inline in content {
            match inline {
                Inline::Text(text) => unresolved += self.resolve_segment(&text, &mut out),
                other => out.push(other),
            }
        }

        Resolved {
            content: out,
            unresolved,
        }
    }

    fn resolve_segment(&self, text: &str, out: &mut Vec<Inline>) -> usize {
        let mut unresolved = 0;
        let mut last = 0;

        for caps in ARTICLE_CITATION.captures_iter(text) {
            let (Some(citation), Some(key)) = (caps.get(0), citation_key(&caps)) else {
                continue;
            };
            let Some(entry) = self.index.get(&key) else {
                unresolved += 1;
                continue;
            };

            push_text(out, &text[last..citation.start()]);
            out.push(Inline::Link {
                href: entry.location.href(),
                class: Some(CROSS_REF_CLASS.to_string()),
                text: citation.as_str().to_string(),
            });
            last = citation.end();
        }

        push_text(out, &text[last..]);
        unresolved
    }
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text(previous)) = out.last_mut() {
        previous.push_str(text);
    } else {
        out.push(Inline::text(text));
    }
}
