//! Document tree and the hierarchy builder.
//!
//! The builder is a single fold over the fragment stream. Its only state is
//! the division currently being filled; the open sub-division is always the
//! last child of that division (or of the introduction), because every leaf
//! that follows a sub-division heading belongs to it until the next heading.
//!
//! ```text
//! DocumentTree
//! ├── preamble (optional)
//! ├── introduction: content before the first division
//! └── divisions
//!     └── Division
//!         ├── SubDivision
//!         │   └── Article | PlainText
//!         └── Article | PlainText
//! ```

use tracing::debug;

use crate::classify::{
    create_leychile_classifier, extract_article_number, split_article, Classifier, Kind,
};
use crate::types::Fragment;

/// Marker that flags an article as repealed.
const DEROGATION_MARKER: &str = "derogad";

/// Numbered legal provision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Normalized number (e.g. "10bis"), or `None` if it could not be parsed.
    pub number: Option<String>,

    /// Leading citation as written in the source (e.g. "Artículo 10 bis").
    pub title: String,

    /// Body text; continuation paragraphs are separated by a blank line.
    pub body: String,
}

impl Article {
    /// Build an article from a fragment classified as [`Kind::Article`].
    #[must_use]
    pub fn from_fragment(text: &str) -> Self {
        let heading = split_article(text);
        if heading.degraded {
            debug!(title = %heading.title, "Article citation could not be split off");
        }
        Self {
            number: extract_article_number(&heading.title),
            title: heading.title,
            body: heading.body,
        }
    }

    /// Anchor id inside the rendered unit, e.g. `art_10bis`.
    #[must_use]
    pub fn anchor(&self) -> Option<String> {
        self.number.as_deref().map(article_anchor)
    }

    /// Whether the body marks this article as repealed.
    #[must_use]
    pub fn is_derogated(&self) -> bool {
        self.body.to_lowercase().contains(DEROGATION_MARKER)
    }

    fn append_continuation(&mut self, text: &str) {
        if !self.body.is_empty() {
            self.body.push_str("\n\n");
        }
        self.body.push_str(text);
    }
}

/// Anchor id for a normalized article number.
#[must_use]
pub fn article_anchor(number: &str) -> String {
    format!("art_{number}")
}

/// Narrative text with no structural role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainText {
    pub text: String,
}

/// Leaf content of a division or sub-division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaf {
    Article(Article),
    PlainText(PlainText),
}

/// Intermediate grouping (Párrafo) inside a division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubDivision {
    /// Heading text as written in the source.
    pub text: String,

    /// 1-based position among the sub-divisions of the same container.
    pub ordinal: usize,

    pub children: Vec<Leaf>,
}

/// Child of a division or of the introduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    SubDivision(SubDivision),
    Leaf(Leaf),
}

/// Top-level structural unit (Título, Capítulo, Libro).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    /// Heading text as written in the source.
    pub text: String,

    /// 1-based position in encounter order.
    pub ordinal: usize,

    pub children: Vec<Child>,
}

/// Leading header of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    pub text: String,
}

/// Finished, immutable document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTree {
    pub preamble: Option<Preamble>,

    /// Content that appeared before the first division.
    pub introduction: Vec<Child>,

    pub divisions: Vec<Division>,
}

/// An article together with its enclosing structure.
#[derive(Debug, Clone, Copy)]
pub struct ArticleContext<'a> {
    pub article: &'a Article,
    pub division: Option<&'a Division>,
    pub subdivision: Option<&'a SubDivision>,
}

impl DocumentTree {
    /// Whether anything precedes the first division.
    #[must_use]
    pub fn has_introduction(&self) -> bool {
        self.preamble.is_some() || !self.introduction.is_empty()
    }

    /// Whether the tree holds no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_introduction() && self.divisions.is_empty()
    }

    /// All articles in document order, with their enclosing structure.
    #[must_use]
    pub fn articles(&self) -> Vec<ArticleContext<'_>> {
        let mut out = Vec::new();
        collect_articles(&self.introduction, None, &mut out);
        for division in &self.divisions {
            collect_articles(&division.children, Some(division), &mut out);
        }
        out
    }
}

fn collect_articles<'a>(
    children: &'a [Child],
    division: Option<&'a Division>,
    out: &mut Vec<ArticleContext<'a>>,
) {
    for child in children {
        match child {
            Child::Leaf(Leaf::Article(article)) => out.push(ArticleContext {
                article,
                division,
                subdivision: None,
            }),
            Child::SubDivision(subdivision) => {
                for leaf in &subdivision.children {
                    if let Leaf::Article(article) = leaf {
                        out.push(ArticleContext {
                            article,
                            division,
                            subdivision: Some(subdivision),
                        });
                    }
                }
            }
            Child::Leaf(Leaf::PlainText(_)) => {}
        }
    }
}

/// Local state threaded through the fold.
#[derive(Default)]
struct BuildState {
    tree: DocumentTree,
    current: Option<Division>,
}

impl BuildState {
    fn apply(mut self, classifier: &Classifier, fragment: &Fragment) -> Self {
        let text = fragment.text.trim();

        if fragment.is_preamble()
            && self.tree.preamble.is_none()
            && self.current.is_none()
            && self.tree.introduction.is_empty()
        {
            self.tree.preamble = Some(Preamble {
                text: text.to_string(),
            });
            return self;
        }

        match classifier.classify(text) {
            Kind::Division => self.open_division(text),
            Kind::SubDivision => self.open_subdivision(text),
            Kind::Article => self.push_leaf(Leaf::Article(Article::from_fragment(text))),
            Kind::PlainText => self.push_text(text),
        }
        self
    }

    fn open_division(&mut self, text: &str) {
        if let Some(done) = self.current.take() {
            self.tree.divisions.push(done);
        }
        self.current = Some(Division {
            text: text.to_string(),
            ordinal: self.tree.divisions.len() + 1,
            children: Vec::new(),
        });
    }

    fn open_subdivision(&mut self, text: &str) {
        let container = self.container();
        let ordinal = container
            .iter()
            .filter(|c| matches!(c, Child::SubDivision(_)))
            .count()
            + 1;
        container.push(Child::SubDivision(SubDivision {
            text: text.to_string(),
            ordinal,
            children: Vec::new(),
        }));
    }

    fn push_leaf(&mut self, leaf: Leaf) {
        let container = self.container();
        if let Some(Child::SubDivision(open)) = container.last_mut() {
            open.children.push(leaf);
            return;
        }
        container.push(Child::Leaf(leaf));
    }

    fn push_text(&mut self, text: &str) {
        if let Some(article) = self.last_article_mut() {
            article.append_continuation(text);
            return;
        }
        self.push_leaf(Leaf::PlainText(PlainText {
            text: text.to_string(),
        }));
    }

    fn container(&mut self) -> &mut Vec<Child> {
        match self.current.as_mut() {
            Some(division) => &mut division.children,
            None => &mut self.tree.introduction,
        }
    }

    fn last_article_mut(&mut self) -> Option<&mut Article> {
        let last = match self.container().last_mut() {
            Some(Child::SubDivision(open)) => open.children.last_mut(),
            Some(Child::Leaf(leaf)) => Some(leaf),
            None => None,
        };
        match last {
            Some(Leaf::Article(article)) => Some(article),
            _ => None,
        }
    }

    fn finish(mut self) -> DocumentTree {
        if let Some(done) = self.current.take() {
            self.tree.divisions.push(done);
        }
        self.tree
    }
}

/// Build the document tree with the default classifier.
#[must_use]
pub fn build_tree(fragments: &[Fragment]) -> DocumentTree {
    build_tree_with(&create_leychile_classifier(), fragments)
}

/// Build the document tree with a custom classifier.
///
/// Whitespace-only fragments are skipped; everything else lands in the tree
/// in source order.
#[must_use]
pub fn build_tree_with(classifier: &Classifier, fragments: &[Fragment]) -> DocumentTree {
    let tree = fragments
        .iter()
        .filter(|f| !f.text.trim().is_empty())
        .fold(BuildState::default(), |state, fragment| {
            state.apply(classifier, fragment)
        })
        .finish();

    debug!(
        divisions = tree.divisions.len(),
        articles = tree.articles().len(),
        preamble = tree.preamble.is_some(),
        "Built document tree"
    );
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments(texts: &[&str]) -> Vec<Fragment> {
        texts.iter().map(|t| Fragment::new(*t)).collect()
    }

    fn article_numbers(tree: &DocumentTree) -> Vec<Option<String>> {
        tree.articles()
            .iter()
            .map(|ctx| ctx.article.number.clone())
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let tree = build_tree(&[]);
        assert!(tree.is_empty());
        assert!(!tree.has_introduction());
    }

    #[test]
    fn test_whitespace_fragments_skipped() {
        let tree = build_tree(&fragments(&["   ", "\n\t", ""]));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_articles_nest_under_division() {
        let tree = build_tree(&fragments(&[
            "TÍTULO I Disposiciones",
            "Artículo 1 Esta ley regula...",
            "Artículo 2 Remítase al artículo 1 para definiciones.",
        ]));

        assert_eq!(tree.divisions.len(), 1);
        assert_eq!(tree.divisions[0].ordinal, 1);
        assert_eq!(tree.divisions[0].children.len(), 2);
        assert_eq!(
            article_numbers(&tree),
            vec![Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[test]
    fn test_subdivision_collects_following_articles() {
        let tree = build_tree(&fragments(&[
            "TÍTULO I De las mesas",
            "Artículo 1 Primero.",
            "PÁRRAFO 1° De la constitución",
            "Artículo 2 Segundo.",
            "Artículo 3 Tercero.",
            "PÁRRAFO 2° Del funcionamiento",
            "Artículo 4 Cuarto.",
            "TÍTULO II Del escrutinio",
            "Artículo 5 Quinto.",
        ]));

        assert_eq!(tree.divisions.len(), 2);
        let first = &tree.divisions[0];
        assert_eq!(first.children.len(), 3);
        let Child::SubDivision(p1) = &first.children[1] else {
            panic!("expected sub-division");
        };
        assert_eq!(p1.ordinal, 1);
        assert_eq!(p1.children.len(), 2);
        let Child::SubDivision(p2) = &first.children[2] else {
            panic!("expected sub-division");
        };
        assert_eq!(p2.ordinal, 2);
        assert_eq!(p2.children.len(), 1);

        // Sub-division cursor resets at a new division.
        assert!(matches!(
            tree.divisions[1].children[0],
            Child::Leaf(Leaf::Article(_))
        ));
        assert_eq!(tree.divisions[1].ordinal, 2);

        let ctx = tree.articles();
        assert_eq!(
            ctx[2].subdivision.map(|s| s.text.as_str()),
            Some("PÁRRAFO 1° De la constitución")
        );
        assert_eq!(ctx[4].division.map(|d| d.ordinal), Some(2));
        assert!(ctx[4].subdivision.is_none());
    }

    #[test]
    fn test_plain_text_continues_article() {
        let tree = build_tree(&fragments(&[
            "TÍTULO I General",
            "Artículo 1 Son electores:",
            "a) Los ciudadanos.",
            "b) Los extranjeros avecindados.",
        ]));

        assert_eq!(tree.divisions[0].children.len(), 1);
        let article = tree.articles()[0].article;
        assert_eq!(
            article.body,
            "Son electores:\n\na) Los ciudadanos.\n\nb) Los extranjeros avecindados."
        );
    }

    #[test]
    fn test_plain_text_without_article_is_own_node() {
        let tree = build_tree(&fragments(&[
            "TÍTULO I General",
            "Texto introductorio del título.",
            "PÁRRAFO 1 Primero",
            "Nota del párrafo.",
        ]));

        let division = &tree.divisions[0];
        assert!(matches!(
            &division.children[0],
            Child::Leaf(Leaf::PlainText(t)) if t.text == "Texto introductorio del título."
        ));
        let Child::SubDivision(sub) = &division.children[1] else {
            panic!("expected sub-division");
        };
        assert_eq!(sub.children.len(), 1);
        assert!(matches!(&sub.children[0], Leaf::PlainText(t) if t.text == "Nota del párrafo."));
    }

    #[test]
    fn test_pre_division_content_goes_to_introduction() {
        let tree = build_tree(&fragments(&[
            "Considerando que es necesario...",
            "Artículo 1 Norma preliminar.",
            "PÁRRAFO 1 Sin título padre",
            "Artículo 2 Dentro del párrafo.",
            "TÍTULO I Primero",
        ]));

        assert!(tree.has_introduction());
        assert_eq!(tree.introduction.len(), 3);
        assert_eq!(tree.divisions.len(), 1);
        assert!(tree.divisions[0].children.is_empty());

        let ctx = tree.articles();
        assert!(ctx[0].division.is_none());
        assert!(ctx[1].subdivision.is_some());
    }

    #[test]
    fn test_preamble_hint() {
        let tree = build_tree(&[
            Fragment::new("LEY NÚM. 18.700 SOBRE VOTACIONES").with_hint("encabezado"),
            Fragment::new("TÍTULO I General"),
        ]);

        assert_eq!(
            tree.preamble.as_ref().map(|p| p.text.as_str()),
            Some("LEY NÚM. 18.700 SOBRE VOTACIONES")
        );
        assert!(tree.introduction.is_empty());
        assert!(tree.has_introduction());
    }

    #[test]
    fn test_late_preamble_hint_is_ordinary_text() {
        let tree = build_tree(&[
            Fragment::new("TÍTULO I General"),
            Fragment::new("Texto suelto").with_hint("encabezado"),
        ]);
        assert!(tree.preamble.is_none());
        assert_eq!(tree.divisions[0].children.len(), 1);
    }

    #[test]
    fn test_node_order_matches_source_order() {
        let tree = build_tree(&fragments(&[
            "CAPÍTULO I Uno",
            "Artículo 3 c",
            "Artículo 1 a",
            "Artículo 2 b",
        ]));
        assert_eq!(
            article_numbers(&tree),
            vec![Some("3".to_string()), Some("1".to_string()), Some("2".to_string())]
        );
    }

    #[test]
    fn test_article_derogation_and_anchor() {
        let article = Article::from_fragment("Artículo 5º. Derogado.");
        assert_eq!(article.number.as_deref(), Some("5"));
        assert_eq!(article.anchor().as_deref(), Some("art_5"));
        assert!(article.is_derogated());

        let article = Article::from_fragment("Artículo 6 Vigente.");
        assert!(!article.is_derogated());
    }
}
