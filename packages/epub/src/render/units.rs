//! Content and index unit builders.

use std::collections::HashMap;

use super::article::render_article;
use super::document::{Block, ContainerTag, Inline, List, ListItem};
use super::title::{format_section_title, truncate};
use super::toc::TocLink;
use super::{OutputUnit, UnitKind};
use crate::config::{
    ARTICLE_INDEX_FILE, EMPTY_FILE, INDEX_SECTION_TITLE_CHARS, INTRO_FILE, KEYWORD_INDEX_FILE,
    KEYWORD_LINK_LIMIT, TOC_ENTRY_CHARS, UNIT_TITLE_CHARS,
};
use crate::hierarchy::{Child, Division, DocumentTree, Leaf, Preamble};
use crate::index::{division_file, ArticleIndex, ArticleIndexEntry, KeywordIndex};
use crate::types::LawMetadata;
use crate::xref::CrossReferenceResolver;

/// Title of the introductory unit.
pub const INTRO_TITLE: &str = "Disposiciones Preliminares";

/// Section title for articles outside any division in the article index.
pub const GENERAL_SECTION_TITLE: &str = "Disposiciones Generales";

/// Renders the tree into content units, resolving citations on the way.
pub struct ContentRenderer<'a> {
    resolver: CrossReferenceResolver<'a>,
    unresolved: usize,

    /// Article anchors emitted in the current unit, with their use count.
    anchors: HashMap<String, usize>,
}

impl<'a> ContentRenderer<'a> {
    #[must_use]
    pub fn new(index: &'a ArticleIndex) -> Self {
        Self {
            resolver: CrossReferenceResolver::new(index),
            unresolved: 0,
            anchors: HashMap::new(),
        }
    }

    /// Citations seen so far that could not be linked.
    #[must_use]
    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    /// One unit for the pre-division content (if any) plus one per division.
    /// A tree without any content yields the single fallback unit.
    pub fn content_units(&mut self, tree: &DocumentTree, metadata: &LawMetadata) -> Vec<OutputUnit> {
        if tree.is_empty() {
            return vec![empty_unit(metadata)];
        }

        let mut units = Vec::with_capacity(tree.divisions.len() + 1);
        if tree.has_introduction() {
            units.push(self.intro_unit(tree.preamble.as_ref(), &tree.introduction));
        }
        for division in &tree.divisions {
            units.push(self.division_unit(division));
        }
        units
    }

    fn intro_unit(&mut self, preamble: Option<&Preamble>, children: &[Child]) -> OutputUnit {
        self.anchors.clear();
        let mut blocks = vec![Block::heading_with_class(1, "no-break", INTRO_TITLE)];
        if let Some(preamble) = preamble {
            blocks.push(Block::div(
                "encabezado",
                vec![Block::paragraph(preamble.text.clone())],
            ));
        }
        let toc = self.render_children(children, 0, INTRO_FILE, &mut blocks);

        OutputUnit::new("intro", INTRO_FILE, INTRO_TITLE, UnitKind::Content, vec![main(blocks)])
            .with_toc_children(toc)
    }

    fn division_unit(&mut self, division: &Division) -> OutputUnit {
        self.anchors.clear();
        let file = division_file(division.ordinal);
        let title = format_section_title(&division.text);

        let mut blocks = vec![Block::Heading {
            level: 1,
            id: Some(format!("titulo-{}", division.ordinal)),
            class: None,
            content: title.to_inlines(),
        }];
        let toc = self.render_children(&division.children, division.ordinal, &file, &mut blocks);
        if division.children.is_empty() {
            blocks.push(Block::paragraph_with_class("no-indent", "Sin contenido adicional."));
        }

        let article = Block::Container {
            tag: ContainerTag::Article,
            id: None,
            class: None,
            children: blocks,
        };
        OutputUnit::new(
            format!("titulo_{}", division.ordinal),
            file,
            title.short_title(UNIT_TITLE_CHARS),
            UnitKind::Content,
            vec![main(vec![article])],
        )
        .with_toc_children(toc)
    }

    /// Render children in order and return the sub-division entries for the
    /// table of contents.
    fn render_children(
        &mut self,
        children: &[Child],
        scope: usize,
        file: &str,
        blocks: &mut Vec<Block>,
    ) -> Vec<TocLink> {
        let mut toc = Vec::new();
        for child in children {
            match child {
                Child::SubDivision(sub) => {
                    let anchor = format!("par_{scope}_{}", sub.ordinal);
                    if !sub.text.trim().is_empty() {
                        toc.push(TocLink {
                            title: truncate(&sub.text, TOC_ENTRY_CHARS),
                            href: format!("{file}#{anchor}"),
                        });
                    }
                    blocks.push(Block::Heading {
                        level: 2,
                        id: Some(anchor),
                        class: None,
                        content: format_section_title(&sub.text).to_inlines(),
                    });
                    for leaf in &sub.children {
                        self.render_leaf(leaf, blocks);
                    }
                }
                Child::Leaf(leaf) => self.render_leaf(leaf, blocks),
            }
        }
        toc
    }

    fn render_leaf(&mut self, leaf: &Leaf, blocks: &mut Vec<Block>) {
        match leaf {
            Leaf::Article(article) => {
                let anchor = article.anchor().map(|anchor| self.unique_anchor(anchor));
                let rendered = render_article(article, anchor, &self.resolver);
                self.unresolved += rendered.unresolved;
                blocks.extend(rendered.blocks);
            }
            Leaf::PlainText(text) => blocks.push(Block::paragraph(text.text.clone())),
        }
    }
}

impl ContentRenderer<'_> {
    /// First use of an anchor in a unit keeps it; a repeated article number
    /// gets `<anchor>_<n>` so ids stay unique. Citations and index entries
    /// always point at the first one.
    fn unique_anchor(&mut self, anchor: String) -> String {
        let count = self.anchors.entry(anchor.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            anchor
        } else {
            format!("{anchor}_{count}")
        }
    }
}

fn main(children: Vec<Block>) -> Block {
    Block::Container {
        tag: ContainerTag::Main,
        id: Some("main-content".to_string()),
        class: None,
        children,
    }
}

/// Fallback unit for a document without usable content.
#[must_use]
pub fn empty_unit(metadata: &LawMetadata) -> OutputUnit {
    let title = if metadata.title.trim().is_empty() {
        "Documento"
    } else {
        metadata.title.trim()
    };
    let blocks = vec![
        Block::heading_with_class(1, "no-break", title),
        Block::paragraph_with_class("no-indent", "No se pudo extraer el contenido de este documento."),
        Block::paragraph_with_class(
            "no-indent",
            "Por favor, verifique el registro de origen e intente nuevamente.",
        ),
    ];
    OutputUnit::new(
        "contenido",
        EMPTY_FILE,
        truncate(title, UNIT_TITLE_CHARS),
        UnitKind::Content,
        blocks,
    )
}

/// Article index page, grouped by enclosing division. `None` when no
/// article was indexed.
#[must_use]
pub fn article_index_unit(index: &ArticleIndex) -> Option<OutputUnit> {
    if index.is_empty() {
        return None;
    }

    let mut groups: Vec<(&str, Vec<&ArticleIndexEntry>)> = Vec::new();
    for entry in index.iter() {
        let section = entry.division_text.as_deref().unwrap_or(GENERAL_SECTION_TITLE);
        match groups.iter_mut().find(|(title, _)| *title == section) {
            Some((_, entries)) => entries.push(entry),
            None => groups.push((section, vec![entry])),
        }
    }

    let mut children = vec![
        Block::heading_with_class(1, "no-break", "Indice de Articulos"),
        Block::paragraph_with_class("no-indent", format!("Total de articulos: {}", index.len())),
    ];
    for (section, entries) in groups {
        let mut list = List::unordered("index-list");
        list.items = entries
            .iter()
            .map(|entry| {
                ListItem::new(vec![Inline::link(
                    entry.location.href(),
                    format!("Art. {}", entry.number),
                )])
            })
            .collect();
        children.push(Block::div(
            "index-section",
            vec![
                Block::heading(3, truncate(section, INDEX_SECTION_TITLE_CHARS)),
                Block::List(list),
            ],
        ));
    }

    Some(OutputUnit::new(
        "article_index",
        ARTICLE_INDEX_FILE,
        "Indice de Articulos",
        UnitKind::Index,
        vec![Block::div("article-index", children)],
    ))
}

/// Keyword index page, grouped by initial letter. `None` when no term of
/// the vocabulary occurs in any article.
#[must_use]
pub fn keyword_index_unit(index: &KeywordIndex) -> Option<OutputUnit> {
    let mut sections: Vec<(char, Vec<Block>)> = Vec::new();

    for (term, hits) in index.non_empty() {
        let letter = term.chars().next().map_or('#', |c| c.to_ascii_uppercase());

        let mut content = vec![Inline::Strong(capitalize(term)), Inline::text(": ")];
        for (i, hit) in hits.iter().take(KEYWORD_LINK_LIMIT).enumerate() {
            if i > 0 {
                content.push(Inline::text(", "));
            }
            content.push(Inline::link(
                hit.location.href(),
                format!("Art. {}", hit.article_number),
            ));
        }
        let entry = Block::Paragraph {
            class: Some("keyword-entry".to_string()),
            content,
        };

        match sections.last_mut() {
            Some((current, entries)) if *current == letter => entries.push(entry),
            _ => sections.push((letter, vec![entry])),
        }
    }

    if sections.is_empty() {
        return None;
    }

    let mut children = vec![
        Block::heading_with_class(1, "no-break", "Indice de Materias"),
        Block::paragraph_with_class(
            "index-intro",
            "Referencias a los principales conceptos juridicos contenidos en esta norma.",
        ),
    ];
    for (letter, entries) in sections {
        let mut section = vec![Block::heading_with_class(3, "keyword-letter", letter.to_string())];
        section.extend(entries);
        children.push(Block::div("keyword-section", section));
    }

    Some(OutputUnit::new(
        "keyword_index",
        KEYWORD_INDEX_FILE,
        "Indice de Materias",
        UnitKind::Index,
        vec![Block::div("keyword-index", children)],
    ))
}

fn capitalize(term: &str) -> String {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
