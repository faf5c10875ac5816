//! Display formatting of division and sub-division headings.
//!
//! Formatting is cosmetic: the heading text stored in the tree and used by
//! the indexes is never changed.

use std::sync::LazyLock;

use regex::Regex;

use super::document::Inline;

#[allow(clippy::expect_used)]
static DIVISION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((?:t[íi]tulo|cap[íi]tulo|libro)\s+[ivxlcdm]+)\s+(.+)$").expect("valid regex")
});

#[allow(clippy::expect_used)]
static SUBDIVISION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(p[áa]rrafo\s+\d+[°º]?)\s+(.+)$").expect("valid regex")
});

/// How a heading is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleLayout {
    /// Label and caption on two lines.
    TwoLines,
    /// Label and caption joined by a dash.
    Dashed,
    /// Heading shown as written.
    Plain,
}

/// A heading split into its numbered label and free-text caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTitle {
    /// Numbered label, e.g. "TÍTULO I"; the whole text for plain headings.
    pub label: String,
    pub caption: Option<String>,
    pub layout: TitleLayout,
}

impl SectionTitle {
    /// Inline content for the rendered heading.
    #[must_use]
    pub fn to_inlines(&self) -> Vec<Inline> {
        match (&self.caption, self.layout) {
            (Some(caption), TitleLayout::TwoLines) => vec![
                Inline::text(self.label.clone()),
                Inline::LineBreak,
                Inline::text(caption.clone()),
            ],
            (Some(caption), TitleLayout::Dashed) => {
                vec![Inline::text(format!("{} – {caption}", self.label))]
            }
            _ => vec![Inline::text(self.label.clone())],
        }
    }

    /// Short title for navigation: the caption if there is one.
    #[must_use]
    pub fn short_title(&self, max_chars: usize) -> String {
        truncate(self.caption.as_deref().unwrap_or(&self.label), max_chars)
    }
}

/// Split a heading for display.
///
/// # Examples
/// ```
/// use leychile_epub::render::title::{format_section_title, TitleLayout};
///
/// let title = format_section_title("TÍTULO I Disposiciones generales");
/// assert_eq!(title.label, "TÍTULO I");
/// assert_eq!(title.caption.as_deref(), Some("Disposiciones generales"));
/// assert_eq!(title.layout, TitleLayout::TwoLines);
/// ```
#[must_use]
pub fn format_section_title(text: &str) -> SectionTitle {
    let text = text.trim();
    let split = |re: &Regex, layout| {
        let caps = re.captures(text)?;
        Some(SectionTitle {
            label: caps.get(1)?.as_str().to_string(),
            caption: Some(caps.get(2)?.as_str().trim().to_string()),
            layout,
        })
    };

    split(&DIVISION_HEADING, TitleLayout::TwoLines)
        .or_else(|| split(&SUBDIVISION_HEADING, TitleLayout::Dashed))
        .unwrap_or_else(|| SectionTitle {
            label: text.to_string(),
            caption: None,
            layout: TitleLayout::Plain,
        })
}

/// Truncate to `max_chars` characters, appending "..." when shortened.
///
/// # Examples
/// ```
/// use leychile_epub::render::title::truncate;
///
/// assert_eq!(truncate("Disposiciones", 40), "Disposiciones");
/// assert_eq!(truncate("abcdef", 3), "abc...");
/// ```
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let mut short: String = text.chars().take(max_chars).collect();
        short.push_str("...");
        short
    } else {
        text.to_string()
    }
}
