//! Core data types for source records.
//!
//! These types describe what arrives at the converter's input boundary:
//! the law metadata and the ordered list of text fragments.

use serde::{Deserialize, Serialize};

use crate::error::{ConverterError, Result};

/// Source hint marking the header fragment that becomes the preamble.
pub const PREAMBLE_HINT: &str = "encabezado";

/// One validated text fragment, ready for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Raw fragment text.
    pub text: String,

    /// Optional structural hint from the source (e.g. `encabezado`).
    pub source_hint: Option<String>,
}

impl Fragment {
    /// Create a fragment without a source hint.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_hint: None,
        }
    }

    /// Set the source hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.source_hint = Some(hint.into());
        self
    }

    /// Whether the source marked this fragment as the document header.
    #[must_use]
    pub fn is_preamble(&self) -> bool {
        self.source_hint
            .as_deref()
            .is_some_and(|h| h.eq_ignore_ascii_case(PREAMBLE_HINT))
    }
}

/// Fragment record as it arrives from an external source.
///
/// `text` is optional here so that a record missing it can be rejected
/// with a precise error instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hint: Option<String>,
}

impl From<Fragment> for FragmentRecord {
    fn from(fragment: Fragment) -> Self {
        Self {
            text: Some(fragment.text),
            source_hint: fragment.source_hint,
        }
    }
}

/// Descriptive metadata of a law, used only for cover and information pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LawMetadata {
    /// Official title (TituloNorma).
    pub title: String,

    /// Norm type, e.g. "Ley" or "Decreto".
    #[serde(rename = "type")]
    pub law_type: String,

    /// Norm number, e.g. "18700".
    pub number: String,

    /// Issuing organism.
    pub organism: String,

    /// Subject matters, in source order (may contain duplicates).
    pub subjects: Vec<String>,

    /// Common name (NombreUsoComun).
    pub common_name: String,

    /// Publication source (IdentificacionFuente).
    pub source: String,

    /// Full promulgation text.
    pub promulgation_text: String,

    /// Sorted, unique derogation dates.
    pub derogation_dates: Vec<String>,
}

impl LawMetadata {
    /// Subjects with duplicates removed, keeping first-seen order.
    #[must_use]
    pub fn unique_subjects(&self, limit: usize) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for subject in &self.subjects {
            if !seen.contains(&subject.as_str()) {
                seen.push(subject);
            }
            if seen.len() == limit {
                break;
            }
        }
        seen
    }

    /// Display title, e.g. "Ley N° 18700 - Sobre votaciones".
    #[must_use]
    pub fn full_title(&self) -> String {
        let title = if self.title.is_empty() {
            "Ley Chile"
        } else {
            self.title.as_str()
        };
        if self.number.is_empty() {
            title.to_string()
        } else {
            let law_type = if self.law_type.is_empty() {
                "Ley"
            } else {
                self.law_type.as_str()
            };
            format!("{law_type} N° {} - {title}", self.number)
        }
    }
}

/// Complete source record: metadata plus ordered fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawRecord {
    #[serde(default)]
    pub metadata: LawMetadata,

    #[serde(default)]
    pub fragments: Vec<FragmentRecord>,

    /// URL the record was retrieved from, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Version identifier of the consolidated text, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_version: Option<String>,
}

impl LawRecord {
    /// Create a record from metadata and already validated fragments.
    #[must_use]
    pub fn new(metadata: LawMetadata, fragments: Vec<Fragment>) -> Self {
        Self {
            metadata,
            fragments: fragments.into_iter().map(FragmentRecord::from).collect(),
            url: None,
            id_version: None,
        }
    }

    /// Validate the fragment records and return them in source order.
    ///
    /// # Errors
    /// Returns `MissingFragmentText` for the first record without text;
    /// the whole run is rejected rather than partially processed.
    pub fn fragments(&self) -> Result<Vec<Fragment>> {
        self.fragments
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let text = record
                    .text
                    .clone()
                    .ok_or(ConverterError::MissingFragmentText { index })?;
                Ok(Fragment {
                    text,
                    source_hint: record.source_hint.clone(),
                })
            })
            .collect()
    }
}
