//! Configuration constants and validation functions for the converter.

use std::path::Path;

use crate::error::{ConverterError, Result};
use crate::types::LawMetadata;

/// Language of every generated document.
pub const LANGUAGE: &str = "es";

/// Publisher and author credited in the publication metadata.
pub const PUBLISHER: &str = "Biblioteca del Congreso Nacional de Chile";

/// Rights statement for the publication metadata.
pub const RIGHTS: &str = "Documento publico - Republica de Chile";

/// Path of the stylesheet inside the publication, relative to every unit.
pub const STYLESHEET_HREF: &str = "style/premium.css";

/// Static stylesheet consumed by every unit.
pub const STYLESHEET: &str = include_str!("../assets/premium.css");

/// File name of the unit holding content that precedes the first division.
pub const INTRO_FILE: &str = "intro.xhtml";

/// File name of the fallback unit for documents without usable content.
pub const EMPTY_FILE: &str = "contenido.xhtml";

/// File name of the cover unit.
pub const COVER_FILE: &str = "cover.xhtml";

/// File name of the legal information unit.
pub const LEGAL_INFO_FILE: &str = "legal_info.xhtml";

/// File name of the article index unit.
pub const ARTICLE_INDEX_FILE: &str = "article_index.xhtml";

/// File name of the keyword index unit.
pub const KEYWORD_INDEX_FILE: &str = "keyword_index.xhtml";

/// File name of the promulgation appendix unit.
pub const PROMULGATION_FILE: &str = "anexo_promulgacion.xhtml";

/// Characters kept from an article fragment when its citation cannot be split off.
pub const DEGRADED_TITLE_CHARS: usize = 50;

/// Maximum characters of a division title used as unit title.
pub const UNIT_TITLE_CHARS: usize = 50;

/// Maximum characters of a division title in the article index.
pub const INDEX_SECTION_TITLE_CHARS: usize = 60;

/// Maximum characters of a sub-division title in the table of contents.
pub const TOC_ENTRY_CHARS: usize = 40;

/// Maximum article links listed per keyword.
pub const KEYWORD_LINK_LIMIT: usize = 8;

/// Subjects shown on the cover and in the publication metadata.
pub const COVER_SUBJECT_LIMIT: usize = 5;

/// Subjects shown on the legal information page.
pub const INFO_SUBJECT_LIMIT: usize = 8;

/// Modification dates shown on the legal information page.
pub const INFO_DATE_LIMIT: usize = 5;

/// Validate that an output directory exists and is a directory.
///
/// # Examples
/// ```
/// use leychile_epub::config::validate_output_dir;
///
/// assert!(validate_output_dir(&std::env::temp_dir()).is_ok());
/// assert!(validate_output_dir(std::path::Path::new("/definitely/not/here")).is_err());
/// ```
pub fn validate_output_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ConverterError::InvalidOutputDir(path.to_path_buf()))
    }
}

/// Sanitize an identifier by removing characters that are unsafe in file
/// names and URL fragments.
///
/// # Examples
/// ```
/// use leychile_epub::config::sanitize_fragment;
///
/// assert_eq!(sanitize_fragment("10bis"), "10bis");
/// assert_eq!(sanitize_fragment("1<script>"), "1script");
/// ```
pub fn sanitize_fragment(fragment: &str) -> String {
    fragment
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
        .collect()
}

/// File stem for a generated publication, e.g. `Ley_18700`.
///
/// Falls back to `Ley` and `documento` when type or number are missing.
pub fn output_file_stem(metadata: &LawMetadata) -> String {
    let law_type = non_empty_or(&metadata.law_type, "Ley");
    let number = non_empty_or(&metadata.number, "documento");
    let stem = format!("{law_type}_{number}").replace(' ', "_");
    sanitize_fragment(&stem)
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_fragment() {
        assert_eq!(sanitize_fragment("1a"), "1a");
        assert_eq!(sanitize_fragment("titulo_1"), "titulo_1");
        assert_eq!(sanitize_fragment("test\"quote"), "testquote");
        assert_eq!(sanitize_fragment("1&amp;2"), "1amp2");
    }

    #[test]
    fn test_output_file_stem() {
        let metadata = LawMetadata {
            law_type: "Decreto con Fuerza de Ley".to_string(),
            number: "1".to_string(),
            ..LawMetadata::default()
        };
        assert_eq!(output_file_stem(&metadata), "Decreto_con_Fuerza_de_Ley_1");
    }

    #[test]
    fn test_output_file_stem_fallbacks() {
        assert_eq!(output_file_stem(&LawMetadata::default()), "Ley_documento");
    }

    #[test]
    fn test_validate_output_dir_rejects_file() {
        let file = std::env::temp_dir().join("leychile-epub-config-test.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(validate_output_dir(&file).is_err());
        std::fs::remove_file(file).unwrap();
    }

    #[test]
    fn test_stylesheet_is_embedded() {
        assert!(STYLESHEET.contains(".articulo-titulo"));
        assert!(STYLESHEET.contains(".cross-ref"));
    }
}
