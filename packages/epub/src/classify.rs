//! Fragment classification.
//!
//! Classification is a strategy table: an ordered list of rules, each a
//! pattern paired with the structural kind it produces. The first matching
//! rule wins, so adding a new structural pattern is a registration, not a
//! change to control flow.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::DEGRADED_TITLE_CHARS;

/// Ordinal suffix words that may follow an article number.
const ARTICLE_SUFFIXES: &str =
    r"bis|ter|qu[aá]ter|cu[aá]ter|quinquies|sexies|septies|octies|nonies|decies";

/// Structural kind of a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Top-level division (Título, Capítulo, Libro).
    Division,
    /// Intermediate grouping (Párrafo).
    SubDivision,
    /// Numbered article.
    Article,
    /// Narrative text without structural role.
    PlainText,
}

/// A single classification rule.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    /// Human-readable rule name, used in logs.
    pub name: &'static str,

    /// Pattern matched against the trimmed fragment text.
    pub pattern: Regex,

    /// Kind produced when the pattern matches.
    pub kind: Kind,
}

/// Ordered rule table. Evaluated top to bottom; first match wins.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Classifier {
    /// Create an empty classifier. Everything classifies as plain text.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule at the lowest priority.
    pub fn register(&mut self, name: &'static str, pattern: Regex, kind: Kind) {
        self.rules.push(ClassificationRule {
            name,
            pattern,
            kind,
        });
    }

    /// Classify one fragment.
    #[must_use]
    pub fn classify(&self, text: &str) -> Kind {
        let text = text.trim();
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .map_or(Kind::PlainText, |rule| rule.kind)
    }

    /// Names of the registered rules, in priority order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }
}

/// Create the classifier for Chilean legislation.
///
/// ```text
/// 1. TÍTULO <roman>    -> Division
/// 2. PÁRRAFO <int>     -> SubDivision
/// 3. Artículo <int>    -> Article
/// 4. CAPÍTULO <roman>  -> Division
/// 5. LIBRO <roman>     -> Division
/// ```
#[must_use]
#[allow(clippy::expect_used)] // Static patterns that are guaranteed to be valid
pub fn create_leychile_classifier() -> Classifier {
    let mut classifier = Classifier::new();
    let rule = |pattern: &str| Regex::new(pattern).expect("valid regex");

    classifier.register("titulo", rule(r"(?i)^t[íi]tulo\s+[ivxlcdm]+"), Kind::Division);
    classifier.register("parrafo", rule(r"(?i)^p[áa]rrafo\s+\d"), Kind::SubDivision);
    classifier.register("articulo", rule(r"(?i)^art[íi]culo\s+\d"), Kind::Article);
    classifier.register("capitulo", rule(r"(?i)^cap[íi]tulo\s+[ivxlcdm]+"), Kind::Division);
    classifier.register("libro", rule(r"(?i)^libro\s+[ivxlcdm]+"), Kind::Division);

    classifier
}

static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(create_leychile_classifier);

/// Leading citation of an article fragment and the text that follows it.
#[allow(clippy::expect_used)]
static ARTICLE_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?is)^(art[íi]culo\s+\d+[°º]?(?:\s*(?:{ARTICLE_SUFFIXES})\b)?)[.\s:\-]*(.*)$"
    ))
    .expect("valid regex")
});

/// Article citation: digits, an optional degree sign, then an optional
/// suffix word. The sign is matched but never part of the key.
#[allow(clippy::expect_used)]
pub(crate) static ARTICLE_CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)art[íi]culo\s+(\d+)[°º]?(?:\s*({ARTICLE_SUFFIXES})\b)?"
    ))
    .expect("valid regex")
});

/// Normalized key of an [`ARTICLE_CITATION`] match.
pub(crate) fn citation_key(caps: &Captures<'_>) -> Option<String> {
    let digits = caps.get(1)?.as_str();
    let suffix = caps.get(2).map_or("", |m| m.as_str());
    Some(normalize_article_number(&format!("{digits}{suffix}")))
}

/// Classify a fragment with the default rule table.
///
/// # Examples
/// ```
/// use leychile_epub::classify::{classify, Kind};
///
/// assert_eq!(classify("TÍTULO I Disposiciones generales"), Kind::Division);
/// assert_eq!(classify("Párrafo 2° De las mesas"), Kind::SubDivision);
/// assert_eq!(classify("Artículo 10 bis.- El plazo..."), Kind::Article);
/// assert_eq!(classify("Santiago, 6 de mayo de 1988."), Kind::PlainText);
/// ```
#[must_use]
pub fn classify(text: &str) -> Kind {
    DEFAULT_CLASSIFIER.classify(text)
}

/// Article fragment split into its citation title and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleHeading {
    /// Leading citation, e.g. "Artículo 5º".
    pub title: String,

    /// Remaining text.
    pub body: String,

    /// Whether the citation pattern failed and the split is degraded.
    pub degraded: bool,
}

/// Separate the leading "Artículo N" citation from the article body.
///
/// When the citation cannot be isolated, the first characters become the
/// title verbatim and the full text is kept as body.
#[must_use]
pub fn split_article(text: &str) -> ArticleHeading {
    let text = text.trim();
    if let Some(caps) = ARTICLE_SPLIT.captures(text) {
        if let (Some(title), Some(body)) = (caps.get(1), caps.get(2)) {
            return ArticleHeading {
                title: title.as_str().trim().to_string(),
                body: body.as_str().trim().to_string(),
                degraded: false,
            };
        }
    }

    ArticleHeading {
        title: text.chars().take(DEGRADED_TITLE_CHARS).collect(),
        body: text.to_string(),
        degraded: true,
    }
}

/// Normalize a raw article number: lower-case, whitespace removed.
///
/// # Examples
/// ```
/// use leychile_epub::classify::normalize_article_number;
///
/// assert_eq!(normalize_article_number("10  Bis"), "10bis");
/// assert_eq!(normalize_article_number("3"), "3");
/// ```
#[must_use]
pub fn normalize_article_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Extract the normalized article number from a citation such as an
/// article title. Returns `None` when no number can be parsed.
///
/// # Examples
/// ```
/// use leychile_epub::classify::extract_article_number;
///
/// assert_eq!(extract_article_number("Artículo  10  Bis").as_deref(), Some("10bis"));
/// assert_eq!(extract_article_number("artículo 10bis").as_deref(), Some("10bis"));
/// assert_eq!(extract_article_number("Artículo 3° bis").as_deref(), Some("3bis"));
/// assert_eq!(extract_article_number("Disposición final"), None);
/// ```
#[must_use]
pub fn extract_article_number(citation: &str) -> Option<String> {
    ARTICLE_CITATION
        .captures(citation)
        .and_then(|caps| citation_key(&caps))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_divisions() {
        assert_eq!(classify("TÍTULO I Disposiciones"), Kind::Division);
        assert_eq!(classify("Titulo XIV Final"), Kind::Division);
        assert_eq!(classify("título ii de las juntas"), Kind::Division);
        assert_eq!(classify("CAPÍTULO III De los recursos"), Kind::Division);
        assert_eq!(classify("Capitulo IV"), Kind::Division);
        assert_eq!(classify("LIBRO II"), Kind::Division);
    }

    #[test]
    fn test_classify_subdivision() {
        assert_eq!(classify("PÁRRAFO 1° De las mesas"), Kind::SubDivision);
        assert_eq!(classify("Parrafo 12"), Kind::SubDivision);
    }

    #[test]
    fn test_classify_article() {
        assert_eq!(classify("Artículo 1 Esta ley regula..."), Kind::Article);
        assert_eq!(classify("ARTICULO 25.- Derogado."), Kind::Article);
        assert_eq!(classify("   Artículo 3 bis: texto"), Kind::Article);
    }

    #[test]
    fn test_classify_plain_text() {
        assert_eq!(classify("Santiago, 6 de mayo de 1988."), Kind::PlainText);
        assert_eq!(classify("Título Preliminar"), Kind::PlainText);
        assert_eq!(classify("Artículos transitorios"), Kind::PlainText);
        assert_eq!(classify("Párrafo final"), Kind::PlainText);
        assert_eq!(classify(""), Kind::PlainText);
    }

    #[test]
    fn test_classify_priority_order() {
        // Only the leading text matters; an article citing a título is an article.
        assert_eq!(
            classify("Artículo 4 Lo dispuesto en el TÍTULO II"),
            Kind::Article
        );
        let names = create_leychile_classifier().rule_names();
        assert_eq!(names, vec!["titulo", "parrafo", "articulo", "capitulo", "libro"]);
    }

    #[test]
    fn test_custom_rule_registration() {
        let mut classifier = create_leychile_classifier();
        classifier.register(
            "disposicion",
            Regex::new(r"(?i)^disposiciones\s+transitorias").unwrap(),
            Kind::Division,
        );
        assert_eq!(classifier.classify("Disposiciones transitorias"), Kind::Division);
        assert_eq!(Classifier::new().classify("TÍTULO I"), Kind::PlainText);
    }

    #[test]
    fn test_split_article_basic() {
        let heading = split_article("Artículo 1 Esta ley regula las votaciones.");
        assert_eq!(heading.title, "Artículo 1");
        assert_eq!(heading.body, "Esta ley regula las votaciones.");
        assert!(!heading.degraded);
    }

    #[test]
    fn test_split_article_with_ordinal_and_separator() {
        let heading = split_article("Artículo 5º. Derogado.");
        assert_eq!(heading.title, "Artículo 5º");
        assert_eq!(heading.body, "Derogado.");

        let heading = split_article("Artículo 10 bis.- El plazo será de diez días.");
        assert_eq!(heading.title, "Artículo 10 bis");
        assert_eq!(heading.body, "El plazo será de diez días.");
    }

    #[test]
    fn test_split_article_suffix_needs_word_boundary() {
        let heading = split_article("Artículo 3 Terminado el escrutinio, se levantará acta.");
        assert_eq!(heading.title, "Artículo 3");
        assert_eq!(heading.body, "Terminado el escrutinio, se levantará acta.");
    }

    #[test]
    fn test_split_article_degraded() {
        let text = "Art. único Esta disposición no sigue el formato habitual de las normas chilenas.";
        let heading = split_article(text);
        assert!(heading.degraded);
        assert_eq!(heading.title.chars().count(), DEGRADED_TITLE_CHARS);
        assert_eq!(heading.body, text);
    }

    #[test]
    fn test_normalize_consistency() {
        assert_eq!(
            extract_article_number("Artículo  10  Bis"),
            extract_article_number("artículo 10bis")
        );
        assert_eq!(extract_article_number("ARTÍCULO 7 TER").as_deref(), Some("7ter"));
        assert_eq!(extract_article_number("Artículo 5º").as_deref(), Some("5"));
        assert_eq!(
            extract_article_number("Artículo 2 quáter").as_deref(),
            Some("2quáter")
        );
    }

    #[test]
    fn test_degree_sign_keeps_suffix() {
        assert_eq!(extract_article_number("Artículo 3° bis").as_deref(), Some("3bis"));
        assert_eq!(extract_article_number("artículo 3º BIS").as_deref(), Some("3bis"));
        assert_eq!(extract_article_number("Artículo 3°").as_deref(), Some("3"));
        assert_eq!(split_article("Artículo 3° bis.- Agregado.").title, "Artículo 3° bis");
    }
}
