//! LeyChile EPUB - Convert Chilean legislation into navigable e-books.
//!
//! This crate turns the flat sequence of text fragments of a LeyChile record
//! into a hierarchically structured, cross-linked publication: one unit per
//! division, an article index, a keyword index and a multi-level table of
//! contents.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use leychile_epub::{convert, ConversionOptions, Fragment, LawMetadata, LawRecord};
//!
//! let record = LawRecord::new(
//!     LawMetadata::default(),
//!     vec![
//!         Fragment::new("TÍTULO I Disposiciones"),
//!         Fragment::new("Artículo 1 Esta ley regula..."),
//!         Fragment::new("Artículo 2 Remítase al artículo 1 para definiciones."),
//!     ],
//! );
//! let options = ConversionOptions::default()
//!     .with_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//! let publication = convert(&record, &options).unwrap();
//!
//! assert_eq!(publication.content_units().count(), 1);
//! ```
//!
//! # Architecture
//!
//! The pipeline runs leaf-first through these modules:
//!
//! - [`types`]: Source records (fragments and metadata)
//! - [`source`]: LeyChile XML and YAML readers
//! - [`classify`]: Fragment classification rules
//! - [`hierarchy`]: Document tree and hierarchy builder
//! - [`index`]: Article and keyword indexes
//! - [`xref`]: Cross-reference resolution
//! - [`render`]: Block document, XHTML serializer, units and table of contents
//! - [`package`]: Publication and packaging
//! - [`converter`]: End-to-end pipeline
//! - [`config`]: Configuration constants and validation
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod classify;
pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod hierarchy;
pub mod index;
pub mod package;
pub mod render;
pub mod source;
pub mod types;
pub mod xref;

// Re-export main functions
pub use converter::{convert, ConversionOptions};

// Re-export commonly used items
pub use classify::{classify, Kind};
pub use error::{ConverterError, Result};
pub use hierarchy::{build_tree, DocumentTree};
pub use package::{DirectoryPackager, Packager, Publication};
pub use source::read_record;
pub use types::{Fragment, LawMetadata, LawRecord};
