//! Keyword index over a fixed legal vocabulary.

use std::collections::BTreeMap;

use unicode_normalization::char::{decompose_canonical, is_combining_mark};
use unicode_normalization::UnicodeNormalization;

use super::Location;
use crate::hierarchy::DocumentTree;

/// Controlled vocabulary, written without diacritics.
pub const VOCABULARY: &[&str] = &[
    "plazo",
    "sancion",
    "multa",
    "pena",
    "prohibicion",
    "obligacion",
    "derecho",
    "deber",
    "facultad",
    "competencia",
    "jurisdiccion",
    "recurso",
    "apelacion",
    "nulidad",
    "prescripcion",
    "caducidad",
    "contrato",
    "convenio",
    "acuerdo",
    "resolucion",
    "decreto",
    "votacion",
    "eleccion",
    "escrutinio",
    "sufragio",
    "candidatura",
    "mesa",
    "vocal",
    "presidente",
    "secretario",
    "ministro",
    "tribunal",
    "juez",
    "fiscal",
    "abogado",
    "notario",
    "registro",
    "inscripcion",
    "certificado",
    "documento",
    "patrimonio",
    "propiedad",
    "dominio",
    "posesion",
    "usufructo",
    "herencia",
    "testamento",
    "sucesion",
    "donacion",
    "delito",
    "falta",
    "infraccion",
    "crimen",
    "cuasidelito",
];

/// One occurrence of a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHit {
    pub location: Location,
    pub article_number: String,
}

/// Term to article locations, for every term of the vocabulary.
///
/// Terms without evidence are kept with an empty list; consumers that render
/// the index use [`KeywordIndex::non_empty`].
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    terms: BTreeMap<&'static str, Vec<KeywordHit>>,
}

impl KeywordIndex {
    /// Build the index with the default vocabulary.
    #[must_use]
    pub fn build(tree: &DocumentTree) -> Self {
        Self::build_with(tree, VOCABULARY)
    }

    /// Build the index with a custom vocabulary.
    ///
    /// Matching is a substring test on the lower-cased body with diacritics
    /// removed, so `sancion` also finds "sanción" and "sanciones".
    #[must_use]
    pub fn build_with(tree: &DocumentTree, vocabulary: &[&'static str]) -> Self {
        let mut terms: BTreeMap<&'static str, Vec<KeywordHit>> =
            vocabulary.iter().map(|term| (*term, Vec::new())).collect();

        for ctx in tree.articles() {
            let Some(number) = ctx.article.number.as_deref() else {
                continue;
            };
            let body = fold_text(&ctx.article.body);
            let location = Location::for_article(ctx.division, number);

            for (term, hits) in &mut terms {
                if body.contains(*term) && !hits.iter().any(|h| h.location == location) {
                    hits.push(KeywordHit {
                        location: location.clone(),
                        article_number: number.to_string(),
                    });
                }
            }
        }

        Self { terms }
    }

    /// Hits for a term, or `None` if the term is not in the vocabulary.
    #[must_use]
    pub fn hits(&self, term: &str) -> Option<&[KeywordHit]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    /// Terms with at least one hit, in alphabetical order.
    pub fn non_empty(&self) -> impl Iterator<Item = (&'static str, &[KeywordHit])> {
        self.terms
            .iter()
            .filter(|(_, hits)| !hits.is_empty())
            .map(|(term, hits)| (*term, hits.as_slice()))
    }

    /// Number of vocabulary terms tracked, including empty ones.
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }
}

/// Lower-case and strip accents, keeping `ñ` as its own letter.
fn fold_text(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.nfc().flat_map(char::to_lowercase) {
        if c == 'ñ' {
            folded.push(c);
            continue;
        }
        decompose_canonical(c, |d| {
            if !is_combining_mark(d) {
                folded.push(d);
            }
        });
    }
    folded
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
    fn test_fold_text() {
        assert_eq!(fold_text("Sanción ELECCIÓN"), "sancion eleccion");
        assert_eq!(fold_text("Desempeñar PEQUEÑO"), "desempeñar pequeño");
        // Decomposed input: n followed by a combining tilde
        assert_eq!(fold_text("desempen\u{303}ar"), "desempeñar");
        assert_eq!(fold_text("pingüino"), "pinguino");
    }

    #[test]
    fn test_enye_is_not_folded_into_n() {
        let index = KeywordIndex::build(&tree(&[
            "TÍTULO I De las mesas",
            "Artículo 1 El vocal deberá desempeñar su cargo.",
        ]));

        assert!(index.hits("pena").unwrap().is_empty());
        assert_eq!(index.hits("vocal").unwrap().len(), 1);
    }

    #[test]
    fn test_terms_found_with_accents() {
        let index = KeywordIndex::build(&tree(&[
            "TÍTULO I General",
            "Artículo 1 La sanción será una multa.",
            "Artículo 2 El plazo de prescripción es de un año.",
        ]));

        let sancion = index.hits("sancion").unwrap();
        assert_eq!(sancion.len(), 1);
        assert_eq!(sancion[0].article_number, "1");
        assert_eq!(sancion[0].location.href(), "titulo_1.xhtml#art_1");

        assert_eq!(index.hits("prescripcion").unwrap()[0].article_number, "2");
        assert!(index.hits("tribunal").unwrap().is_empty());
        assert!(index.hits("inexistente").is_none());
    }

    #[test]
    fn test_zero_evidence_terms_retained_but_not_listed() {
        let index = KeywordIndex::build(&tree(&["TÍTULO I A", "Artículo 1 Una multa."]));

        assert_eq!(index.term_count(), VOCABULARY.len());
        let listed: Vec<&str> = index.non_empty().map(|(t, _)| t).collect();
        assert_eq!(listed, vec!["multa"]);
    }

    #[test]
    fn test_dedup_by_location() {
        // Two articles share a location only when the number repeats inside a unit.
        let index = KeywordIndex::build(&tree(&[
            "TÍTULO I A",
            "Artículo 1 Un plazo.",
            "Artículo 1 Otro plazo.",
            "TÍTULO II B",
            "Artículo 1 Un tercer plazo.",
        ]));

        let hits = index.hits("plazo").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].location.file, "titulo_1.xhtml");
        assert_eq!(hits[1].location.file, "titulo_2.xhtml");
    }

    #[test]
    fn test_custom_vocabulary() {
        let index = KeywordIndex::build_with(
            &tree(&["Artículo 3 El alcalde firmará."]),
            &["alcalde", "concejal"],
        );
        assert_eq!(index.term_count(), 2);
        assert_eq!(index.hits("alcalde").unwrap()[0].location.href(), "intro.xhtml#art_3");
    }
}
