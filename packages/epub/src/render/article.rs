//! Article rendering: heading plus structured body.

use std::sync::LazyLock;

use regex::Regex;

use super::document::{Block, ContainerTag, Inline, List, ListItem};
use crate::hierarchy::Article;
use crate::xref::CrossReferenceResolver;

/// Numbered sub-item ("inciso"): `1.`, `2)`, `3°`, `4-`.
#[allow(clippy::expect_used)]
static NUMERIC_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\d+)[°º.)\-]\s*(.*)$").expect("valid regex"));

/// Lettered sub-item: `a)`, `b.`.
#[allow(clippy::expect_used)]
static ALPHA_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([a-z])[.)]\s+(.*)$").expect("valid regex"));

const LEGAL_LIST_CLASS: &str = "legal-list";
const ALPHA_LIST_CLASS: &str = "legal-list alpha";

/// Rendered blocks of one article and the number of citations that could
/// not be linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArticle {
    pub blocks: Vec<Block>,
    pub unresolved: usize,
}

/// Render an article heading and, unless it is repealed, its body.
///
/// `anchor` is the heading id; callers pass [`Article::anchor`] or a
/// disambiguated variant of it. A repealed article keeps its anchor so that
/// citations and index entries still land on it.
#[must_use]
pub fn render_article(
    article: &Article,
    anchor: Option<String>,
    resolver: &CrossReferenceResolver<'_>,
) -> RenderedArticle {
    let derogated = article.is_derogated();

    let mut content = vec![Inline::text(article.title.clone())];
    let class = if derogated {
        content.push(Inline::Span {
            class: "derogado-notice".to_string(),
            text: "DEROGADO".to_string(),
        });
        "articulo-titulo derogado"
    } else {
        "articulo-titulo"
    };

    let mut blocks = vec![Block::Heading {
        level: 3,
        id: anchor,
        class: Some(class.to_string()),
        content,
    }];

    let mut unresolved = 0;
    if !derogated {
        let body = format_body(&article.body, resolver);
        unresolved = body.unresolved;
        if !body.blocks.is_empty() {
            blocks.push(Block::Container {
                tag: ContainerTag::Div,
                id: None,
                class: Some("articulo-contenido".to_string()),
                children: body.blocks,
            });
        }
    }

    RenderedArticle { blocks, unresolved }
}

/// Structure an article body into paragraphs and legal lists.
///
/// The body is split on blank lines. Numbered items form one ordered list;
/// lettered items nest under the preceding numbered item, or form their own
/// list when no numbered list is open. Any other paragraph closes both lists.
#[must_use]
pub fn format_body(body: &str, resolver: &CrossReferenceResolver<'_>) -> RenderedArticle {
    let mut builder = BodyBuilder::default();

    for paragraph in body.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(rest) = NUMERIC_ITEM.captures(paragraph).and_then(|c| c.get(2)) {
            let content = builder.resolve(rest.as_str(), resolver);
            builder.close_alpha();
            builder
                .numeric
                .get_or_insert_with(|| List::ordered(LEGAL_LIST_CLASS))
                .items
                .push(ListItem::new(content));
        } else if let Some(rest) = ALPHA_ITEM.captures(paragraph).and_then(|c| c.get(2)) {
            let content = builder.resolve(rest.as_str(), resolver);
            builder
                .alpha
                .get_or_insert_with(|| List::ordered(ALPHA_LIST_CLASS))
                .items
                .push(ListItem::new(content));
        } else {
            let content = builder.resolve(paragraph, resolver);
            builder.close_all();
            builder.blocks.push(Block::Paragraph {
                class: None,
                content,
            });
        }
    }

    builder.close_all();
    RenderedArticle {
        blocks: builder.blocks,
        unresolved: builder.unresolved,
    }
}

#[derive(Default)]
struct BodyBuilder {
    blocks: Vec<Block>,
    numeric: Option<List>,
    alpha: Option<List>,
    unresolved: usize,
}

impl BodyBuilder {
    fn resolve(&mut self, text: &str, resolver: &CrossReferenceResolver<'_>) -> Vec<Inline> {
        let resolved = resolver.resolve_text(text);
        self.unresolved += resolved.unresolved;
        resolved.content
    }

    fn close_alpha(&mut self) {
        let Some(alpha) = self.alpha.take() else {
            return;
        };
        match self.numeric.as_mut().and_then(|list| list.items.last_mut()) {
            Some(parent) => parent.sublist = Some(alpha),
            None => self.blocks.push(Block::List(alpha)),
        }
    }

    fn close_all(&mut self) {
        self.close_alpha();
        if let Some(numeric) = self.numeric.take() {
            self.blocks.push(Block::List(numeric));
        }
    }
}
