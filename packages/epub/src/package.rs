//! Finished publication and the packaging seam.
//!
//! The archive format itself is out of scope: a [`Packager`] receives the
//! assembled [`Publication`] and decides how to write it. The
//! [`DirectoryPackager`] writes an exploded publication (one XHTML document
//! per unit, the stylesheet and a YAML manifest) that any archive writer can
//! pick up.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::{
    output_file_stem, validate_output_dir, LANGUAGE, PUBLISHER, RIGHTS, STYLESHEET,
    STYLESHEET_HREF,
};
use crate::error::Result;
use crate::render::html::{MarkupSerializer, XhtmlSerializer};
use crate::render::{OutputUnit, TocEntry, UnitKind};
use crate::types::LawMetadata;

/// Subjects appended to every publication.
const EXTRA_SUBJECTS: [&str; 2] = ["Legislacion chilena", "Derecho"];

/// Descriptive metadata of the publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicationMetadata {
    /// Stable identifier, e.g. `bcn-chile-1a2b3c4d`.
    pub identifier: String,
    pub title: String,
    pub language: String,
    pub creator: String,
    pub publisher: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contributor: Option<String>,
    pub description: String,
    pub subjects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub rights: String,
    /// Generation date in `YYYY-MM-DD` format.
    pub date: String,
}

impl PublicationMetadata {
    /// Derive publication metadata from the law metadata.
    #[must_use]
    pub fn from_law(metadata: &LawMetadata, source_url: Option<&str>, generated_on: NaiveDate) -> Self {
        let law_type = if metadata.law_type.is_empty() {
            "Ley"
        } else {
            metadata.law_type.as_str()
        };

        let mut subjects: Vec<String> = metadata
            .unique_subjects(crate::config::COVER_SUBJECT_LIMIT)
            .into_iter()
            .map(String::from)
            .collect();
        subjects.extend(EXTRA_SUBJECTS.iter().map(|s| (*s).to_string()));

        Self {
            identifier: publication_identifier(metadata),
            title: metadata.full_title(),
            language: LANGUAGE.to_string(),
            creator: PUBLISHER.to_string(),
            publisher: PUBLISHER.to_string(),
            contributor: Some(metadata.organism.trim().to_string()).filter(|o| !o.is_empty()),
            description: format!(
                "{law_type} {}: {}. Texto oficial de la Republica de Chile.",
                metadata.number, metadata.title
            ),
            subjects,
            source: source_url.map(String::from),
            rights: RIGHTS.to_string(),
            date: generated_on.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Deterministic identifier derived from type, number and title.
///
/// # Examples
/// ```
/// use leychile_epub::package::publication_identifier;
/// use leychile_epub::types::LawMetadata;
///
/// let id = publication_identifier(&LawMetadata::default());
/// assert!(id.starts_with("bcn-chile-"));
/// assert_eq!(id.len(), "bcn-chile-".len() + 8);
/// ```
#[must_use]
pub fn publication_identifier(metadata: &LawMetadata) -> String {
    let mut hasher = Sha256::new();
    hasher.update(metadata.law_type.as_bytes());
    hasher.update(b"|");
    hasher.update(metadata.number.as_bytes());
    hasher.update(b"|");
    hasher.update(metadata.title.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("bcn-chile-{}", &digest[..8])
}

/// Assembled publication: units in spine order plus the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub metadata: PublicationMetadata,

    /// Cover and information page.
    pub front_matter: Vec<OutputUnit>,

    /// Content units followed by the index pages.
    pub units: Vec<OutputUnit>,

    /// Units after the index pages.
    pub appendices: Vec<OutputUnit>,

    pub toc: Vec<TocEntry>,
}

impl Publication {
    /// Every unit in spine order.
    pub fn spine(&self) -> impl Iterator<Item = &OutputUnit> {
        self.front_matter
            .iter()
            .chain(&self.units)
            .chain(&self.appendices)
    }

    /// Units rendered from the document tree.
    pub fn content_units(&self) -> impl Iterator<Item = &OutputUnit> {
        self.units.iter().filter(|u| u.kind == UnitKind::Content)
    }

    /// Look up a unit by file name.
    #[must_use]
    pub fn unit(&self, file_name: &str) -> Option<&OutputUnit> {
        self.spine().find(|u| u.file_name == file_name)
    }
}

/// Seam to the archive writer.
pub trait Packager {
    /// Write the publication and return the path of the result.
    fn package(&self, publication: &Publication) -> Result<PathBuf>;
}

/// Spine entry in the manifest.
#[derive(Debug, Serialize)]
struct ManifestItem<'a> {
    id: &'a str,
    href: &'a str,
    title: &'a str,
    kind: UnitKind,
}

/// Manifest written next to the units.
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    metadata: &'a PublicationMetadata,
    stylesheet: &'a str,
    spine: Vec<ManifestItem<'a>>,
    toc: &'a [TocEntry],
}

/// Generate the manifest YAML for a publication.
pub fn generate_manifest(publication: &Publication) -> Result<String> {
    let manifest = Manifest {
        metadata: &publication.metadata,
        stylesheet: STYLESHEET_HREF,
        spine: publication
            .spine()
            .map(|unit| ManifestItem {
                id: &unit.id,
                href: &unit.file_name,
                title: &unit.title,
                kind: unit.kind,
            })
            .collect(),
        toc: &publication.toc,
    };
    let yaml = serde_yaml_ng::to_string(&manifest)?;
    Ok(format!("---\n{yaml}"))
}

/// Writes an exploded publication into `<output>/<stem>/`.
pub struct DirectoryPackager {
    output_dir: PathBuf,
    serializer: Box<dyn MarkupSerializer>,
}

impl DirectoryPackager {
    /// Create a packager writing XHTML below `output_dir`.
    ///
    /// # Errors
    /// Returns `InvalidOutputDir` if `output_dir` is not an existing directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        validate_output_dir(&output_dir)?;
        Ok(Self {
            output_dir,
            serializer: Box::new(XhtmlSerializer),
        })
    }

    /// Use a different serializer for the document wrapper.
    #[must_use]
    pub fn with_serializer(mut self, serializer: Box<dyn MarkupSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Directory a publication with the given metadata is written to.
    #[must_use]
    pub fn target_dir(&self, metadata: &LawMetadata) -> PathBuf {
        self.output_dir.join(output_file_stem(metadata))
    }

    fn write_publication(&self, target: &Path, publication: &Publication) -> Result<()> {
        let style_dir = target.join("style");
        fs::create_dir_all(&style_dir)?;
        write_atomic(&style_dir.join("premium.css"), STYLESHEET)?;

        for unit in publication.spine() {
            let document =
                self.serializer
                    .serialize_document(&unit.title, STYLESHEET_HREF, &unit.html_body);
            write_atomic(&target.join(&unit.file_name), &document)?;
        }

        write_atomic(&target.join("manifest.yaml"), &generate_manifest(publication)?)?;
        Ok(())
    }

    /// Write the publication for a specific law.
    ///
    /// The directory name is derived from the law type and number.
    pub fn package_law(&self, metadata: &LawMetadata, publication: &Publication) -> Result<PathBuf> {
        let target = self.target_dir(metadata);
        self.write_publication(&target, publication)?;
        info!(path = %target.display(), "Wrote publication");
        Ok(target)
    }
}

impl Packager for DirectoryPackager {
    fn package(&self, publication: &Publication) -> Result<PathBuf> {
        let stem = publication.metadata.identifier.clone();
        let target = self.output_dir.join(stem);
        self.write_publication(&target, publication)?;
        info!(path = %target.display(), "Wrote publication");
        Ok(target)
    }
}

/// Write a file atomically: temp file, sync, rename.
///
/// Partial writes never replace an existing file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_file, path)?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}
