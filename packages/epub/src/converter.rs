//! End-to-end conversion pipeline.
//!
//! ```text
//! LawRecord ─► fragments ─► DocumentTree ─┬─► ArticleIndex ─┐
//!                                          └─► KeywordIndex ─┴─► assemble ─► Publication
//! ```
//!
//! Both indexes are built from the finished tree before anything is
//! rendered. The only failure point is the input boundary.

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::error::Result;
use crate::hierarchy::build_tree;
use crate::index::{ArticleIndex, KeywordIndex};
use crate::package::Publication;
use crate::render::{assemble, AssemblyInput, XhtmlSerializer};
use crate::types::LawRecord;

/// Runtime options of a conversion.
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    /// Date printed on the cover and in the metadata (default: today).
    pub generated_on: Option<NaiveDate>,
}

impl ConversionOptions {
    /// Fix the generation date.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.generated_on = Some(date);
        self
    }

    fn date(&self) -> NaiveDate {
        self.generated_on
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Convert a source record into a publication.
///
/// # Errors
/// Returns `MissingFragmentText` when a fragment record has no text; no
/// partial output is produced in that case.
pub fn convert(record: &LawRecord, options: &ConversionOptions) -> Result<Publication> {
    let fragments = record.fragments()?;
    debug!(fragments = fragments.len(), "Validated fragment records");

    let tree = build_tree(&fragments);
    let articles = ArticleIndex::build(&tree);
    let keywords = KeywordIndex::build(&tree);
    debug!(
        indexed_articles = articles.len(),
        keywords = keywords.non_empty().count(),
        "Built indexes"
    );

    let input = AssemblyInput {
        tree: &tree,
        articles: &articles,
        keywords: &keywords,
        metadata: &record.metadata,
        source_url: record.url.as_deref(),
        id_version: record.id_version.as_deref(),
        generated_on: options.date(),
    };
    let publication = assemble(&input, &XhtmlSerializer);

    info!(
        title = %publication.metadata.title,
        divisions = tree.divisions.len(),
        articles = articles.len(),
        units = publication.spine().count(),
        "Converted record"
    );
    Ok(publication)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConverterError;
    use crate::types::{Fragment, FragmentRecord, LawMetadata};

    fn options() -> ConversionOptions {
        ConversionOptions::default().with_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn test_convert_basic_law() {
        let record = LawRecord::new(
            LawMetadata::default(),
            vec![
                Fragment::new("TÍTULO I Disposiciones"),
                Fragment::new("Artículo 1 Esta ley regula..."),
                Fragment::new("Artículo 2 Remítase al artículo 1 para definiciones."),
            ],
        );
        let publication = convert(&record, &options()).unwrap();

        let content: Vec<_> = publication.content_units().collect();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].title, "Disposiciones");
        assert!(content[0]
            .html_body
            .contains("<a href=\"titulo_1.xhtml#art_1\" class=\"cross-ref\">artículo 1</a>"));
        assert_eq!(publication.metadata.date, "2024-01-01");
    }

    #[test]
    fn test_convert_rejects_missing_text() {
        let mut record = LawRecord::default();
        record.fragments.push(FragmentRecord::default());
        let err = convert(&record, &options()).unwrap_err();
        assert!(matches!(err, ConverterError::MissingFragmentText { index: 0 }));
    }

    #[test]
    fn test_default_date_is_today() {
        let today = Local::now().date_naive();
        assert_eq!(ConversionOptions::default().date(), today);
    }
}
