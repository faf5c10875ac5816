//! Composite table of contents.

use serde::Serialize;

use super::OutputUnit;

/// Link to a unit or to an anchor inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocLink {
    pub title: String,
    pub href: String,
}

/// Top-level table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TocEntry {
    /// A unit without second-level entries.
    Unit(TocLink),
    /// A unit with its sub-division entries.
    Section {
        unit: TocLink,
        children: Vec<TocLink>,
    },
}

impl TocEntry {
    /// Link of the unit this entry points to.
    #[must_use]
    pub fn link(&self) -> &TocLink {
        match self {
            Self::Unit(link) | Self::Section { unit: link, .. } => link,
        }
    }
}

/// Build the table of contents from units in spine order.
///
/// Units hidden from the table of contents are skipped; units with
/// sub-division entries expand into a section.
pub fn build_toc<'a>(units: impl IntoIterator<Item = &'a OutputUnit>) -> Vec<TocEntry> {
    units
        .into_iter()
        .filter(|unit| unit.in_toc)
        .map(|unit| {
            let link = TocLink {
                title: unit.title.clone(),
                href: unit.file_name.clone(),
            };
            if unit.toc_children.is_empty() {
                TocEntry::Unit(link)
            } else {
                TocEntry::Section {
                    unit: link,
                    children: unit.toc_children.clone(),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::UnitKind;

    #[test]
    fn test_build_toc() {
        let cover = OutputUnit::new("cover", "cover.xhtml", "Portada", UnitKind::Front, Vec::new())
            .hidden_from_toc();
        let plain = OutputUnit::new("intro", "intro.xhtml", "Intro", UnitKind::Content, Vec::new());
        let section = OutputUnit::new("titulo_1", "titulo_1.xhtml", "Uno", UnitKind::Content, Vec::new())
            .with_toc_children(vec![TocLink {
                title: "PÁRRAFO 1 Mesas".to_string(),
                href: "titulo_1.xhtml#par_1_1".to_string(),
            }]);

        let toc = build_toc([&cover, &plain, &section]);

        assert_eq!(toc.len(), 2);
        assert!(matches!(&toc[0], TocEntry::Unit(link) if link.href == "intro.xhtml"));
        let TocEntry::Section { unit, children } = &toc[1] else {
            panic!("expected section");
        };
        assert_eq!(unit.title, "Uno");
        assert_eq!(children[0].href, "titulo_1.xhtml#par_1_1");
        assert_eq!(toc[1].link().href, "titulo_1.xhtml");
    }
}
