//! Markup serialization of the block document.
//!
//! The serializer is the only place that produces markup. Text from the
//! model is escaped on the way out; link elements are emitted by the
//! serializer itself, so inserted links and literal text can never be
//! confused.

use super::document::{Block, ContainerTag, Inline, List, TableRow};
use crate::config::LANGUAGE;

/// Trait for block document serializers.
///
/// Implementors turn a block sequence into the body markup of one output
/// unit, and wrap a body into a complete standalone document.
pub trait MarkupSerializer: Send + Sync {
    /// The name of this serializer (e.g., "xhtml").
    fn name(&self) -> &str;

    /// Serialize blocks into body markup.
    fn serialize_blocks(&self, blocks: &[Block]) -> String;

    /// Wrap body markup into a complete document that links the stylesheet.
    fn serialize_document(&self, title: &str, stylesheet_href: &str, body: &str) -> String;
}

/// XHTML serializer used for every publication unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct XhtmlSerializer;

impl MarkupSerializer for XhtmlSerializer {
    fn name(&self) -> &str {
        "xhtml"
    }

    fn serialize_blocks(&self, blocks: &[Block]) -> String {
        let mut out = String::new();
        for block in blocks {
            write_block(block, &mut out);
        }
        out
    }

    fn serialize_document(&self, title: &str, stylesheet_href: &str, body: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <!DOCTYPE html>\n\
             <html xmlns=\"http://www.w3.org/1999/xhtml\" lang=\"{LANGUAGE}\" xml:lang=\"{LANGUAGE}\">\n\
             <head>\n\
             <meta charset=\"utf-8\"/>\n\
             <title>{}</title>\n\
             <link rel=\"stylesheet\" type=\"text/css\" href=\"{}\"/>\n\
             </head>\n\
             <body>\n{body}</body>\n\
             </html>\n",
            escape(title),
            escape(stylesheet_href),
        )
    }
}

/// Escape text for element content and attribute values.
///
/// # Examples
/// ```
/// use leychile_epub::render::html::escape;
///
/// assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
/// ```
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn attributes(id: Option<&str>, class: Option<&str>) -> String {
    let mut attrs = String::new();
    if let Some(id) = id {
        attrs.push_str(&format!(" id=\"{}\"", escape(id)));
    }
    if let Some(class) = class {
        attrs.push_str(&format!(" class=\"{}\"", escape(class)));
    }
    attrs
}

fn write_inlines(content: &[Inline], out: &mut String) {
    for inline in content {
        match inline {
            Inline::Text(text) => out.push_str(&escape(text)),
            Inline::Link { href, class, text } => {
                out.push_str(&format!("<a href=\"{}\"", escape(href)));
                if let Some(class) = class {
                    out.push_str(&format!(" class=\"{}\"", escape(class)));
                }
                out.push_str(&format!(">{}</a>", escape(text)));
            }
            Inline::Span { class, text } => {
                out.push_str(&format!(
                    "<span class=\"{}\">{}</span>",
                    escape(class),
                    escape(text)
                ));
            }
            Inline::Strong(text) => out.push_str(&format!("<strong>{}</strong>", escape(text))),
            Inline::LineBreak => out.push_str("<br/>"),
        }
    }
}

fn write_list(list: &List, out: &mut String) {
    let tag = if list.ordered { "ol" } else { "ul" };
    out.push_str(&format!(
        "<{tag}{} role=\"list\">\n",
        attributes(None, list.class.as_deref())
    ));
    for item in &list.items {
        out.push_str("<li>");
        write_inlines(&item.content, out);
        if let Some(sublist) = &item.sublist {
            out.push('\n');
            write_list(sublist, out);
        }
        out.push_str("</li>\n");
    }
    out.push_str(&format!("</{tag}>\n"));
}

fn write_table(class: Option<&str>, rows: &[TableRow], out: &mut String) {
    out.push_str(&format!("<table{}>\n", attributes(None, class)));
    for row in rows {
        out.push_str(&format!(
            "<tr><td class=\"label\">{}</td><td>",
            escape(&row.label)
        ));
        write_inlines(&row.value, out);
        out.push_str("</td></tr>\n");
    }
    out.push_str("</table>\n");
}

fn write_block(block: &Block, out: &mut String) {
    match block {
        Block::Heading {
            level,
            id,
            class,
            content,
        } => {
            let level = (*level).clamp(1, 6);
            out.push_str(&format!(
                "<h{level}{}>",
                attributes(id.as_deref(), class.as_deref())
            ));
            write_inlines(content, out);
            out.push_str(&format!("</h{level}>\n"));
        }
        Block::Paragraph { class, content } => {
            out.push_str(&format!("<p{}>", attributes(None, class.as_deref())));
            write_inlines(content, out);
            out.push_str("</p>\n");
        }
        Block::List(list) => write_list(list, out),
        Block::Table { class, rows } => write_table(class.as_deref(), rows, out),
        Block::Container {
            tag,
            id,
            class,
            children,
        } => {
            let tag = match tag {
                ContainerTag::Div => "div",
                ContainerTag::Main => "main",
                ContainerTag::Article => "article",
                ContainerTag::Blockquote => "blockquote",
            };
            out.push_str(&format!(
                "<{tag}{}>\n",
                attributes(id.as_deref(), class.as_deref())
            ));
            for child in children {
                write_block(child, out);
            }
            out.push_str(&format!("</{tag}>\n"));
        }
        Block::Divider { class } => {
            out.push_str(&format!("<div class=\"{}\"></div>\n", escape(class)));
        }
    }
}
