//! Assembly of the finished publication.

use chrono::NaiveDate;
use tracing::debug;

use super::front::{cover_unit, legal_info_unit, promulgation_unit};
use super::html::MarkupSerializer;
use super::toc::build_toc;
use super::units::{article_index_unit, keyword_index_unit, ContentRenderer};
use super::OutputUnit;
use crate::hierarchy::DocumentTree;
use crate::index::{ArticleIndex, KeywordIndex};
use crate::package::{Publication, PublicationMetadata};
use crate::types::LawMetadata;

/// Everything the assembler reads. All of it is borrowed and left untouched.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub tree: &'a DocumentTree,
    pub articles: &'a ArticleIndex,
    pub keywords: &'a KeywordIndex,
    pub metadata: &'a LawMetadata,
    pub source_url: Option<&'a str>,
    pub id_version: Option<&'a str>,
    pub generated_on: NaiveDate,
}

/// Render every unit, serialize it and lay out the spine and the table of
/// contents.
///
/// Spine order: cover, information page, content units, article index,
/// keyword index, appendix.
#[must_use]
pub fn assemble(input: &AssemblyInput<'_>, serializer: &dyn MarkupSerializer) -> Publication {
    let serialize = |units: Vec<OutputUnit>| -> Vec<OutputUnit> {
        units
            .into_iter()
            .map(|unit| unit.serialized(serializer))
            .collect()
    };

    let front_matter = serialize(vec![
        cover_unit(input.metadata, input.id_version, input.generated_on),
        legal_info_unit(input.metadata),
    ]);

    let mut renderer = ContentRenderer::new(input.articles);
    let mut units = renderer.content_units(input.tree, input.metadata);
    if renderer.unresolved() > 0 {
        debug!(
            unresolved = renderer.unresolved(),
            "Citations left unlinked"
        );
    }
    units.extend(article_index_unit(input.articles));
    units.extend(keyword_index_unit(input.keywords));
    let units = serialize(units);

    let appendices = serialize(promulgation_unit(input.metadata).into_iter().collect());

    let toc = build_toc(front_matter.iter().chain(&units).chain(&appendices));

    debug!(
        serializer = serializer.name(),
        units = front_matter.len() + units.len() + appendices.len(),
        toc_entries = toc.len(),
        "Assembled publication"
    );

    Publication {
        metadata: PublicationMetadata::from_law(input.metadata, input.source_url, input.generated_on),
        front_matter,
        units,
        appendices,
        toc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_tree;
    use crate::render::html::XhtmlSerializer;
    use crate::render::toc::TocEntry;
    use crate::types::Fragment;

    fn publication(texts: &[&str], metadata: &LawMetadata) -> Publication {
        let fragments: Vec<Fragment> = texts.iter().map(|t| Fragment::new(*t)).collect();
        let tree = build_tree(&fragments);
        let articles = ArticleIndex::build(&tree);
        let keywords = KeywordIndex::build(&tree);
        let input = AssemblyInput {
            tree: &tree,
            articles: &articles,
            keywords: &keywords,
            metadata,
            source_url: None,
            id_version: None,
            generated_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assemble(&input, &XhtmlSerializer)
    }

    #[test]
    fn test_spine_order() {
        let metadata = LawMetadata {
            promulgation_text: "Promúlguese.".to_string(),
            ..LawMetadata::default()
        };
        let publication = publication(
            &["Considerando.", "TÍTULO I A", "Artículo 1 Un plazo."],
            &metadata,
        );

        let files: Vec<&str> = publication.spine().map(|u| u.file_name.as_str()).collect();
        assert_eq!(
            files,
            vec![
                "cover.xhtml",
                "legal_info.xhtml",
                "intro.xhtml",
                "titulo_1.xhtml",
                "article_index.xhtml",
                "keyword_index.xhtml",
                "anexo_promulgacion.xhtml",
            ]
        );
        assert!(publication.spine().all(|u| !u.html_body.is_empty()));
    }

    #[test]
    fn test_toc_skips_cover_and_follows_spine() {
        let publication = publication(
            &["TÍTULO I A", "PÁRRAFO 1 Mesas", "Artículo 1 Uno.", "TÍTULO II B"],
            &LawMetadata::default(),
        );

        let hrefs: Vec<&str> = publication.toc.iter().map(|e| e.link().href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec!["legal_info.xhtml", "titulo_1.xhtml", "titulo_2.xhtml", "article_index.xhtml"]
        );
        assert!(matches!(&publication.toc[1], TocEntry::Section { children, .. } if children.len() == 1));
        assert!(matches!(&publication.toc[2], TocEntry::Unit(_)));
    }

    #[test]
    fn test_zero_fragments_single_content_unit() {
        let publication = publication(&[], &LawMetadata::default());
        assert_eq!(publication.content_units().count(), 1);
        assert_eq!(publication.units.len(), 1);
        assert_eq!(publication.units[0].file_name, "contenido.xhtml");
    }
}
