//! Source record readers.
//!
//! A record arrives either as a LeyChile XML document (as served by the BCN
//! `obtxml` endpoint) or as a YAML file holding a [`LawRecord`]. Both end up
//! as the same record type; fetching the XML is left to the caller.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ConverterError, Result};
use crate::types::{Fragment, LawMetadata, LawRecord, PREAMBLE_HINT};

/// Root element of a LeyChile record.
const ROOT_ELEMENT: &str = "Norma";

/// Get the tag name without namespace.
fn tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// First descendant element (document order) with the given tag name.
fn find_descendant<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .find(|n| n.is_element() && tag_name(*n) == tag)
}

/// First direct child element with the given tag name.
fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && tag_name(*n) == tag)
}

/// Collapse whitespace runs into single spaces and trim.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All text below `node`, whitespace collapsed.
fn all_text(node: Node<'_, '_>) -> String {
    let raw: String = node
        .descendants()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect();
    collapse_whitespace(&raw)
}

/// Own text of the first descendant with the given tag, trimmed.
fn descendant_text(node: Node<'_, '_>, tag: &str) -> String {
    find_descendant(node, tag)
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Parse a LeyChile XML document into a record.
///
/// # Errors
/// Returns `XmlParse` for malformed XML and `MissingElement` when the root
/// is not a `Norma` element.
///
/// # Examples
/// ```
/// use leychile_epub::source::parse_leychile_xml;
///
/// let xml = r#"<Norma xmlns="http://www.leychile.cl/esquemas">
///   <Identificador><TiposNumeros><TipoNumero><Tipo>Ley</Tipo><Numero>1</Numero></TipoNumero></TiposNumeros></Identificador>
///   <EstructurasFuncionales>
///     <EstructuraFuncional><Texto>Artículo 1 Texto.</Texto></EstructuraFuncional>
///   </EstructurasFuncionales>
/// </Norma>"#;
/// let record = parse_leychile_xml(xml).unwrap();
/// assert_eq!(record.metadata.title, "Ley 1");
/// assert_eq!(record.fragments.len(), 1);
/// ```
pub fn parse_leychile_xml(xml: &str) -> Result<LawRecord> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    if tag_name(root) != ROOT_ELEMENT {
        return Err(ConverterError::MissingElement {
            element: ROOT_ELEMENT.to_string(),
            context: "LeyChile record".to_string(),
        });
    }

    let metadata = extract_metadata(root);
    let fragments = extract_fragments(root);
    debug!(
        title = %metadata.title,
        fragments = fragments.len(),
        "Parsed LeyChile record"
    );

    Ok(LawRecord::new(metadata, fragments))
}

fn extract_metadata(root: Node<'_, '_>) -> LawMetadata {
    let (law_type, number) = find_descendant(root, "TipoNumero")
        .map(|tn| {
            let text = |tag| {
                find_child(tn, tag)
                    .and_then(|n| n.text())
                    .map(|t| t.trim().to_string())
                    .unwrap_or_default()
            };
            (text("Tipo"), text("Numero"))
        })
        .unwrap_or_default();

    let subjects = root
        .descendants()
        .filter(|n| n.is_element() && tag_name(*n) == "Materia")
        .filter_map(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let promulgation_text = find_descendant(root, "Promulgacion")
        .filter(|p| find_child(*p, "Texto").is_some())
        .map(all_text)
        .unwrap_or_default();

    let derogation_dates: BTreeSet<String> = root
        .descendants()
        .filter(|n| n.is_element() && tag_name(*n) == "FechaDerogacion")
        .filter_map(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let mut title = descendant_text(root, "TituloNorma");
    if title.is_empty() {
        title = format!("{law_type} {number}").trim().to_string();
    }

    LawMetadata {
        title,
        law_type,
        number,
        organism: descendant_text(root, "Organismo"),
        subjects,
        common_name: descendant_text(root, "NombreUsoComun"),
        source: descendant_text(root, "IdentificacionFuente"),
        promulgation_text,
        derogation_dates: derogation_dates.into_iter().collect(),
    }
}

/// Header first, then every functional structure in document order.
///
/// Only the direct `Texto` child of a structure is read, so text of nested
/// structures is never repeated in their parent.
fn extract_fragments(root: Node<'_, '_>) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    if let Some(header) = find_descendant(root, "Encabezado") {
        let text = find_child(header, "Texto").map_or_else(|| all_text(header), all_text);
        if !text.is_empty() {
            fragments.push(Fragment::new(text).with_hint(PREAMBLE_HINT));
        }
    }

    for structure in root
        .descendants()
        .filter(|n| n.is_element() && tag_name(*n) == "EstructuraFuncional")
    {
        let Some(texto) = find_child(structure, "Texto") else {
            continue;
        };
        let text = all_text(texto);
        if !text.is_empty() {
            fragments.push(Fragment::new(text));
        }
    }

    fragments
}

/// Read a YAML record.
///
/// # Errors
/// Returns `Yaml` when the document does not describe a record.
pub fn parse_yaml_record(yaml: &str) -> Result<LawRecord> {
    Ok(serde_yaml_ng::from_str(yaml)?)
}

/// Read a record from disk. `.yaml`/`.yml` files are read as YAML, anything
/// else as LeyChile XML.
///
/// # Errors
/// Returns `Io` when the file cannot be read, or the parser's error.
pub fn read_record(path: &Path) -> Result<LawRecord> {
    let content = fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    if is_yaml {
        parse_yaml_record(&content)
    } else {
        parse_leychile_xml(&content)
    }
}

/// Query parameter value of a LeyChile URL.
fn query_param(url: &str, name: &str) -> Option<String> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(url, error = %e, "Could not parse source URL");
            return None;
        }
    };
    parsed
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|v| !v.is_empty())
}

/// Extract the `idNorma` parameter of a LeyChile URL.
///
/// # Examples
/// ```
/// use leychile_epub::source::extract_id_norma;
///
/// let url = "https://www.bcn.cl/leychile/navegar?idNorma=30082&idVersion=2024-01-01";
/// assert_eq!(extract_id_norma(url).as_deref(), Some("30082"));
/// assert_eq!(extract_id_norma("https://www.bcn.cl/leychile"), None);
/// ```
#[must_use]
pub fn extract_id_norma(url: &str) -> Option<String> {
    query_param(url, "idNorma")
}

/// Extract the `idVersion` parameter of a LeyChile URL.
#[must_use]
pub fn extract_id_version(url: &str) -> Option<String> {
    query_param(url, "idVersion")
}

/// Attach the URL a record was retrieved from, along with its version.
#[must_use]
pub fn with_source_url(mut record: LawRecord, url: &str) -> LawRecord {
    record.id_version = extract_id_version(url).or(record.id_version);
    record.url = Some(url.to_string());
    record
}
