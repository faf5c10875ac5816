//! Cover, information page and promulgation appendix.

use chrono::{Datelike, NaiveDate};

use super::document::{Block, ContainerTag, Inline, TableRow};
use super::{OutputUnit, UnitKind};
use crate::config::{
    COVER_FILE, COVER_SUBJECT_LIMIT, INFO_DATE_LIMIT, INFO_SUBJECT_LIMIT, LEGAL_INFO_FILE,
    PROMULGATION_FILE, PUBLISHER,
};
use crate::types::LawMetadata;

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Long Spanish date, e.g. "6 de mayo de 1988".
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use leychile_epub::render::front::long_date;
///
/// let date = NaiveDate::from_ymd_opt(1988, 5, 6).unwrap();
/// assert_eq!(long_date(date), "6 de mayo de 1988");
/// ```
#[must_use]
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value.trim()
    }
}

/// Cover unit. Not listed in the table of contents.
#[must_use]
pub fn cover_unit(
    metadata: &LawMetadata,
    id_version: Option<&str>,
    generated_on: NaiveDate,
) -> OutputUnit {
    let mut children = vec![
        Block::div(
            "cover-header",
            vec![
                Block::paragraph_with_class("cover-escudo", "\u{2605}"),
                Block::paragraph_with_class("cover-republica", "Republica de Chile"),
            ],
        ),
        Block::paragraph_with_class("cover-law-type", or_default(&metadata.law_type, "Ley")),
        Block::paragraph_with_class("cover-law-number", format!("N° {}", metadata.number.trim())),
        Block::Divider {
            class: "cover-divider".to_string(),
        },
        Block::heading_with_class(1, "no-break", or_default(&metadata.title, "Ley Chile")),
    ];

    if !metadata.organism.trim().is_empty() {
        children.push(Block::paragraph_with_class("cover-organism", metadata.organism.trim()));
    }
    let subjects = metadata.unique_subjects(COVER_SUBJECT_LIMIT);
    if !subjects.is_empty() {
        children.push(Block::paragraph_with_class("cover-subjects", subjects.join(" | ")));
    }

    let mut details = Vec::new();
    if let Some(version) = id_version.filter(|v| !v.is_empty()) {
        details.push(Block::paragraph_with_class("cover-source", format!("Version: {version}")));
    }
    if !metadata.source.trim().is_empty() {
        details.push(Block::paragraph_with_class(
            "cover-source",
            format!("Publicado en: {}", metadata.source.trim()),
        ));
    }
    details.push(Block::paragraph_with_class("cover-source", format!("Fuente: {PUBLISHER}")));
    children.push(Block::div("cover-metadata", details));

    children.push(Block::div(
        "cover-footer",
        vec![
            Block::paragraph(format!("Documento generado el {}", long_date(generated_on))),
            Block::paragraph("Generado en base a la ultima version de la ley"),
        ],
    ));

    OutputUnit::new(
        "cover",
        COVER_FILE,
        "Portada",
        UnitKind::Front,
        vec![Block::div("cover", children)],
    )
    .hidden_from_toc()
}

/// Legal information unit ("Ficha del Documento").
#[must_use]
pub fn legal_info_unit(metadata: &LawMetadata) -> OutputUnit {
    let row = |label: &str, value: String| TableRow {
        label: label.to_string(),
        value: vec![Inline::text(value)],
    };

    let subjects = metadata.unique_subjects(INFO_SUBJECT_LIMIT);
    let subjects = if subjects.is_empty() {
        "No especificadas".to_string()
    } else {
        subjects.join(", ")
    };

    let mut rows = vec![
        row(
            "Tipo",
            format!(
                "{} N° {}",
                or_default(&metadata.law_type, "Ley"),
                metadata.number.trim()
            ),
        ),
        row("Titulo", metadata.title.trim().to_string()),
        row("Organismo", or_default(&metadata.organism, "—").to_string()),
        row("Publicacion", or_default(&metadata.source, "—").to_string()),
        row("Materias", subjects),
    ];
    if !metadata.derogation_dates.is_empty() {
        let dates: Vec<&str> = metadata
            .derogation_dates
            .iter()
            .take(INFO_DATE_LIMIT)
            .map(String::as_str)
            .collect();
        rows.push(row("Modificaciones", dates.join(" | ")));
    }

    let children = vec![
        Block::heading_with_class(1, "no-break info-title", "Ficha del Documento"),
        Block::Table {
            class: Some("info-table-compact".to_string()),
            rows,
        },
        Block::Paragraph {
            class: Some("legal-disclaimer".to_string()),
            content: vec![
                Inline::text("Generado en base a la ultima version de la ley."),
                Inline::LineBreak,
                Inline::text("Para efectos legales, consulte la fuente oficial en la BCN."),
            ],
        },
    ];

    OutputUnit::new(
        "legal_info",
        LEGAL_INFO_FILE,
        "Informacion del Documento",
        UnitKind::Front,
        vec![Block::div("legal-info-compact", children)],
    )
}

/// Promulgation appendix. `None` when the record has no promulgation text.
#[must_use]
pub fn promulgation_unit(metadata: &LawMetadata) -> Option<OutputUnit> {
    let text = metadata.promulgation_text.trim();
    if text.is_empty() {
        return None;
    }

    let children = vec![
        Block::heading_with_class(1, "no-break", "Anexo"),
        Block::heading(2, "Texto de Promulgacion"),
        Block::Container {
            tag: ContainerTag::Blockquote,
            id: None,
            class: Some("promulgation-text".to_string()),
            children: vec![Block::paragraph(text)],
        },
    ];

    Some(OutputUnit::new(
        "anexo_promulgacion",
        PROMULGATION_FILE,
        "Anexo: Texto de Promulgacion",
        UnitKind::Appendix,
        vec![Block::div("appendix", children)],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::html::{MarkupSerializer, XhtmlSerializer};

    fn metadata() -> LawMetadata {
        LawMetadata {
            title: "Sobre votaciones populares y escrutinios".to_string(),
            law_type: "Ley".to_string(),
            number: "18700".to_string(),
            organism: "Ministerio del Interior".to_string(),
            subjects: vec![
                "Elecciones".to_string(),
                "Votaciones".to_string(),
                "Elecciones".to_string(),
            ],
            source: "Diario Oficial".to_string(),
            derogation_dates: vec!["1989-08-17".to_string(), "2015-05-11".to_string()],
            ..LawMetadata::default()
        }
    }

    #[test]
    fn test_long_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(long_date(date), "16 de octubre de 2026");
    }

    #[test]
    fn test_cover_unit() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let unit = cover_unit(&metadata(), Some("2024-01-01"), date);
        let html = XhtmlSerializer.serialize_blocks(&unit.blocks);

        assert!(!unit.in_toc);
        assert_eq!(unit.file_name, "cover.xhtml");
        assert!(html.contains("<p class=\"cover-law-number\">N° 18700</p>"));
        assert!(html.contains("<p class=\"cover-subjects\">Elecciones | Votaciones</p>"));
        assert!(html.contains("Version: 2024-01-01"));
        assert!(html.contains("Documento generado el 2 de enero de 2024"));
    }

    #[test]
    fn test_legal_info_unit() {
        let unit = legal_info_unit(&metadata());
        let html = XhtmlSerializer.serialize_blocks(&unit.blocks);

        assert!(unit.in_toc);
        assert!(html.contains("<tr><td class=\"label\">Tipo</td><td>Ley N° 18700</td></tr>"));
        assert!(html.contains("<td>Elecciones, Votaciones</td>"));
        assert!(html.contains("<td>1989-08-17 | 2015-05-11</td>"));
    }

    #[test]
    fn test_legal_info_defaults() {
        let html = XhtmlSerializer.serialize_blocks(&legal_info_unit(&LawMetadata::default()).blocks);
        assert!(html.contains("<td>No especificadas</td>"));
        assert!(html.contains("<tr><td class=\"label\">Organismo</td><td>—</td></tr>"));
        assert!(!html.contains("Modificaciones"));
    }

    #[test]
    fn test_promulgation_unit() {
        assert!(promulgation_unit(&metadata()).is_none());

        let with_text = LawMetadata {
            promulgation_text: "Y por cuanto el Congreso Nacional...".to_string(),
            ..LawMetadata::default()
        };
        let unit = promulgation_unit(&with_text).unwrap();
        assert_eq!(unit.kind, UnitKind::Appendix);
        assert_eq!(unit.file_name, "anexo_promulgacion.xhtml");
    }
}
