//! In-memory block document.
//!
//! Unit builders produce blocks; a [`MarkupSerializer`](super::html::MarkupSerializer)
//! turns them into markup. Text held in the model is always literal text,
//! never markup, so escaping happens in exactly one place.

/// Inline content of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Literal text.
    Text(String),

    /// Hyperlink to another location in the publication.
    Link {
        href: String,
        class: Option<String>,
        text: String,
    },

    /// Styled run of text.
    Span { class: String, text: String },

    /// Emphasized run of text.
    Strong(String),

    /// Forced line break.
    LineBreak,
}

impl Inline {
    /// Literal text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Link without a class.
    pub fn link(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Link {
            href: href.into(),
            class: None,
            text: text.into(),
        }
    }

    /// Visible text, without markup.
    #[must_use]
    pub fn plain_text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Strong(text) => text.as_str(),
            Self::Link { text, .. } | Self::Span { text, .. } => text.as_str(),
            Self::LineBreak => "\n",
        }
    }
}

/// Concatenate the visible text of inline content.
#[must_use]
pub fn plain_text(content: &[Inline]) -> String {
    content.iter().map(Inline::plain_text).collect()
}

/// Element used for a container block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerTag {
    Div,
    Main,
    Article,
    Blockquote,
}

/// Ordered or unordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub class: Option<String>,
    pub items: Vec<ListItem>,
}

impl List {
    /// Empty ordered list.
    pub fn ordered(class: impl Into<String>) -> Self {
        Self {
            ordered: true,
            class: Some(class.into()),
            items: Vec::new(),
        }
    }

    /// Empty unordered list.
    pub fn unordered(class: impl Into<String>) -> Self {
        Self {
            ordered: false,
            class: Some(class.into()),
            items: Vec::new(),
        }
    }
}

/// One list item, optionally owning a nested list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content: Vec<Inline>,
    pub sublist: Option<List>,
}

impl ListItem {
    #[must_use]
    pub fn new(content: Vec<Inline>) -> Self {
        Self {
            content,
            sublist: None,
        }
    }
}

/// Label and value of a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub label: String,
    pub value: Vec<Inline>,
}

/// Block-level content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        id: Option<String>,
        class: Option<String>,
        content: Vec<Inline>,
    },
    Paragraph {
        class: Option<String>,
        content: Vec<Inline>,
    },
    List(List),
    Table {
        class: Option<String>,
        rows: Vec<TableRow>,
    },
    Container {
        tag: ContainerTag,
        id: Option<String>,
        class: Option<String>,
        children: Vec<Block>,
    },
    /// Empty decorative element.
    Divider { class: String },
}

impl Block {
    /// Heading with plain text content.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            id: None,
            class: None,
            content: vec![Inline::text(text)],
        }
    }

    /// Heading with a class and plain text content.
    pub fn heading_with_class(level: u8, class: &str, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            id: None,
            class: Some(class.to_string()),
            content: vec![Inline::text(text)],
        }
    }

    /// Paragraph with plain text content.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph {
            class: None,
            content: vec![Inline::text(text)],
        }
    }

    /// Paragraph with a class and plain text content.
    pub fn paragraph_with_class(class: &str, text: impl Into<String>) -> Self {
        Self::Paragraph {
            class: Some(class.to_string()),
            content: vec![Inline::text(text)],
        }
    }

    /// `div` with a class.
    #[must_use]
    pub fn div(class: &str, children: Vec<Block>) -> Self {
        Self::Container {
            tag: ContainerTag::Div,
            id: None,
            class: Some(class.to_string()),
            children,
        }
    }

    /// Visit this block and every nested block, depth first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Block)) {
        visit(self);
        if let Self::Container { children, .. } = self {
            for child in children {
                child.walk(visit);
            }
        }
    }
}

/// Collect every link target in a block sequence, including those nested
/// in containers, lists and tables.
#[must_use]
pub fn collect_hrefs(blocks: &[Block]) -> Vec<String> {
    fn from_inlines(content: &[Inline], out: &mut Vec<String>) {
        for inline in content {
            if let Inline::Link { href, .. } = inline {
                out.push(href.clone());
            }
        }
    }

    fn from_list(list: &List, out: &mut Vec<String>) {
        for item in &list.items {
            from_inlines(&item.content, out);
            if let Some(sublist) = &item.sublist {
                from_list(sublist, out);
            }
        }
    }

    let mut out = Vec::new();
    for block in blocks {
        block.walk(&mut |b| match b {
            Block::Heading { content, .. } | Block::Paragraph { content, .. } => {
                from_inlines(content, &mut out);
            }
            Block::List(list) => from_list(list, &mut out),
            Block::Table { rows, .. } => {
                for row in rows {
                    from_inlines(&row.value, &mut out);
                }
            }
            Block::Container { .. } | Block::Divider { .. } => {}
        });
    }
    out
}

/// Collect every element id in a block sequence.
#[must_use]
pub fn collect_ids(blocks: &[Block]) -> Vec<String> {
    let mut out = Vec::new();
    for block in blocks {
        block.walk(&mut |b| match b {
            Block::Heading { id: Some(id), .. } | Block::Container { id: Some(id), .. } => {
                out.push(id.clone());
            }
            _ => {}
        });
    }
    out
}
