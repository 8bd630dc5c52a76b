//! METS manifest parser using roxmltree.

use std::io::Read;
use std::path::Path;

use roxmltree::{Document as XmlDocument, Node};

use crate::error::{Error, Result};
use crate::model::{DocumentMetadata, LogicalLinks, LogicalSection, Manifest, PageDescriptor};

use super::options::{ErrorMode, ParseOptions};

/// METS namespace.
pub const METS_NS: &str = "http://www.loc.gov/METS/";
/// MODS namespace (bibliographic metadata).
pub const MODS_NS: &str = "http://www.loc.gov/mods/v3";
/// XLink namespace (structural links).
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
/// DFG-Viewer namespace (rights metadata).
pub const DV_NS: &str = "http://dfg-viewer.de/";

/// Prefix of logical unit identifiers.
const LOGICAL_UNIT_PREFIX: &str = "U.";

/// METS manifest parser.
pub struct MetsParser {
    xml: String,
    options: ParseOptions,
}

impl MetsParser {
    /// Open a METS file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a METS file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(Error::ManifestNotFound(path.to_path_buf()));
        }

        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Create a parser from manifest text.
    pub fn from_xml(xml: impl Into<String>) -> Self {
        Self::from_xml_with_options(xml, ParseOptions::default())
    }

    /// Create a parser from manifest text with custom options.
    pub fn from_xml_with_options(xml: impl Into<String>, options: ParseOptions) -> Self {
        Self {
            xml: xml.into(),
            options,
        }
    }

    /// Create a parser from manifest bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Create a parser from manifest bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let xml = std::str::from_utf8(data)
            .map_err(|e| Error::Encoding(format!("manifest is not valid UTF-8: {}", e)))?;
        Ok(Self::from_xml_with_options(xml, options))
    }

    /// Create a parser from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Create a parser from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse the manifest.
    pub fn parse(&self) -> Result<Manifest> {
        let parse_options = roxmltree::ParsingOptions {
            allow_dtd: self.options.allow_dtd,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = XmlDocument::parse_with_options(&self.xml, parse_options)?;

        let manifest = Manifest {
            metadata: extract_metadata(&doc),
            pages: self.extract_pages(&doc)?,
            logical_sections: extract_logical_sections(&doc),
            logical_to_physical: extract_links(&doc),
        };

        log::debug!(
            "Parsed manifest: {} pages, {} logical sections, {} links",
            manifest.pages.len(),
            manifest.logical_sections.len(),
            manifest.logical_to_physical.link_count()
        );

        Ok(manifest)
    }

    /// Extract the physical page list, sorted by order.
    fn extract_pages(&self, doc: &XmlDocument) -> Result<Vec<PageDescriptor>> {
        let mut pages = Vec::new();

        for div in struct_map_divs(doc, "PHYSICAL") {
            if div.attribute("TYPE") != Some("page") {
                continue;
            }
            if let Some(page) = self.page_descriptor(div)? {
                pages.push(page);
            }
        }

        pages.sort_by_key(|p| p.order);
        Ok(pages)
    }

    /// Build a descriptor for one page node.
    ///
    /// Returns `Ok(None)` for pages that are skipped.
    fn page_descriptor(&self, div: Node) -> Result<Option<PageDescriptor>> {
        let Some(id) = div.attribute("ID") else {
            return self.invalid_page("", "missing ID attribute");
        };

        let order = match div.attribute("ORDER") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(order) => order,
                Err(_) => {
                    return self.invalid_page(id, &format!("ORDER {:?} is not an integer", value))
                }
            },
            None => return self.invalid_page(id, "missing ORDER attribute"),
        };

        let file_id = div
            .descendants()
            .find(|n| n.has_tag_name((METS_NS, "fptr")))
            .and_then(|fptr| fptr.attribute("FILEID"));

        let Some(file_id) = file_id else {
            log::warn!("Page {} (order {}) has no file pointer, skipping", id, order);
            return Ok(None);
        };

        let mut page = PageDescriptor::new(id, order, file_id);
        if let Some(content_id) = div.attribute("CONTENTIDS") {
            page = page.with_content_id(content_id);
        }

        Ok(Some(page))
    }

    fn invalid_page(&self, page_id: &str, reason: &str) -> Result<Option<PageDescriptor>> {
        match self.options.error_mode {
            ErrorMode::Strict => Err(Error::InvalidPage {
                page_id: page_id.to_string(),
                reason: reason.to_string(),
            }),
            ErrorMode::Lenient => {
                log::warn!("Skipping page {:?}: {}", page_id, reason);
                Ok(None)
            }
        }
    }
}

/// Extract the bibliographic metadata block.
fn extract_metadata(doc: &XmlDocument) -> DocumentMetadata {
    DocumentMetadata {
        title: element_text(doc, MODS_NS, "title", None),
        author: element_text(doc, MODS_NS, "displayForm", None),
        signature: element_text(doc, MODS_NS, "note", Some(("type", "signature"))),
        language: element_text(doc, MODS_NS, "languageTerm", Some(("type", "code"))),
        owner: element_text(doc, DV_NS, "owner", None),
        urn: element_text(doc, MODS_NS, "identifier", Some(("type", "urn"))),
    }
}

/// Text of the first element with the given name and attribute value.
fn element_text(
    doc: &XmlDocument,
    ns: &str,
    name: &str,
    attr: Option<(&str, &str)>,
) -> Option<String> {
    doc.descendants()
        .find(|n| {
            n.has_tag_name((ns, name))
                && attr.map_or(true, |(key, value)| n.attribute(key) == Some(value))
        })
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
}

/// All `mets:div` nodes below structure maps of the given type.
fn struct_map_divs<'a, 'input>(
    doc: &'a XmlDocument<'input>,
    map_type: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    doc.descendants()
        .filter(move |n| {
            n.has_tag_name((METS_NS, "structMap")) && n.attribute("TYPE") == Some(map_type)
        })
        .flat_map(|map| map.descendants().filter(|n| n.has_tag_name((METS_NS, "div"))))
}

/// Extract named logical units.
fn extract_logical_sections(doc: &XmlDocument) -> Vec<LogicalSection> {
    struct_map_divs(doc, "LOGICAL")
        .filter_map(|div| {
            let id = div.attribute("ID")?;
            let section_type = div.attribute("TYPE")?;
            id.starts_with(LOGICAL_UNIT_PREFIX)
                .then(|| LogicalSection::new(id, section_type))
        })
        .collect()
}

/// Extract logical-to-physical links, appending duplicates.
fn extract_links(doc: &XmlDocument) -> LogicalLinks {
    let mut links = LogicalLinks::new();

    for link in doc.descendants().filter(|n| n.has_tag_name((METS_NS, "smLink"))) {
        let from = link.attribute((XLINK_NS, "from"));
        let to = link.attribute((XLINK_NS, "to"));

        match (from, to) {
            (Some(from), Some(to)) => links.link(from, to),
            _ => log::debug!("Ignoring incomplete smLink {:?} -> {:?}", from, to),
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<mets:mets xmlns:mets="http://www.loc.gov/METS/"
           xmlns:mods="http://www.loc.gov/mods/v3"
           xmlns:xlink="http://www.w3.org/1999/xlink"
           xmlns:dv="http://dfg-viewer.de/">
{body}
</mets:mets>"#
        )
    }

    fn physical(pages: &str) -> String {
        manifest(&format!(
            r#"<mets:structMap TYPE="PHYSICAL">
  <mets:div ID="PHYSSEQ" TYPE="physSequence">{pages}</mets:div>
</mets:structMap>"#
        ))
    }

    #[test]
    fn test_pages_sorted_by_order() {
        let xml = physical(
            r#"<mets:div ID="PHYS_B" TYPE="page" ORDER="2"><mets:fptr FILEID="IMG.2"/></mets:div>
               <mets:div ID="PHYS_A" TYPE="page" ORDER="1"><mets:fptr FILEID="IMG.1"/></mets:div>
               <mets:div ID="PHYS_C" TYPE="page" ORDER="3"><mets:fptr FILEID="IMG.3"/></mets:div>"#,
        );
        let manifest = MetsParser::from_xml(xml).parse().unwrap();

        let orders: Vec<_> = manifest.pages.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(manifest.pages[0].physical_id, "PHYS_A");
        assert_eq!(manifest.pages[0].file_id, "IMG.1");
    }

    #[test]
    fn test_page_without_pointer_is_skipped() {
        let xml = physical(
            r#"<mets:div ID="PHYS_1" TYPE="page" ORDER="1"><mets:fptr FILEID="IMG.1"/></mets:div>
               <mets:div ID="PHYS_2" TYPE="page" ORDER="2"/>"#,
        );
        let manifest = MetsParser::from_xml(xml).parse().unwrap();
        assert_eq!(manifest.page_count(), 1);
    }

    #[test]
    fn test_first_pointer_wins_and_content_ids() {
        let xml = physical(
            r#"<mets:div ID="PHYS_1" TYPE="page" ORDER="1" CONTENTIDS="urn:page:1">
                 <mets:fptr FILEID="IMG.1"/>
                 <mets:fptr FILEID="THUMB.1"/>
               </mets:div>"#,
        );
        let manifest = MetsParser::from_xml(xml).parse().unwrap();
        assert_eq!(manifest.pages[0].file_id, "IMG.1");
        assert_eq!(manifest.pages[0].content_id.as_deref(), Some("urn:page:1"));
    }

    #[test]
    fn test_duplicate_orders_are_kept() {
        let xml = physical(
            r#"<mets:div ID="PHYS_1" TYPE="page" ORDER="1"><mets:fptr FILEID="IMG.1"/></mets:div>
               <mets:div ID="PHYS_1b" TYPE="page" ORDER="1"><mets:fptr FILEID="IMG.1b"/></mets:div>"#,
        );
        let manifest = MetsParser::from_xml(xml).parse().unwrap();
        assert_eq!(manifest.page_count(), 2);
        assert_eq!(manifest.pages[0].physical_id, "PHYS_1");
    }

    #[test]
    fn test_invalid_order_strict_and_lenient() {
        let xml = physical(
            r#"<mets:div ID="PHYS_1" TYPE="page" ORDER="eins"><mets:fptr FILEID="IMG.1"/></mets:div>
               <mets:div ID="PHYS_2" TYPE="page" ORDER="2"><mets:fptr FILEID="IMG.2"/></mets:div>"#,
        );

        let err = MetsParser::from_xml(xml.clone()).parse().unwrap_err();
        assert!(matches!(err, Error::InvalidPage { ref page_id, .. } if page_id == "PHYS_1"));

        let parser = MetsParser::from_xml_with_options(xml, ParseOptions::new().lenient());
        let manifest = parser.parse().unwrap();
        assert_eq!(manifest.page_count(), 1);
        assert_eq!(manifest.pages[0].physical_id, "PHYS_2");
    }

    #[test]
    fn test_metadata_fields() {
        let xml = manifest(
            r#"<mets:dmdSec ID="DMD"><mets:mdWrap MDTYPE="MODS"><mets:xmlData>
                 <mods:mods>
                   <mods:titleInfo><mods:title>Brief an Romain Rolland</mods:title></mods:titleInfo>
                   <mods:name><mods:displayForm>Zweig, Stefan</mods:displayForm></mods:name>
                   <mods:note type="date">1920</mods:note>
                   <mods:note type="signature">SZ-SAM/L1.4</mods:note>
                   <mods:language><mods:languageTerm type="text">Deutsch</mods:languageTerm>
                     <mods:languageTerm type="code">ger</mods:languageTerm></mods:language>
                   <mods:identifier type="local">o:szd.151</mods:identifier>
                   <mods:identifier type="urn">urn:nbn:at:at-oeaw-151</mods:identifier>
                 </mods:mods>
               </mets:xmlData></mets:mdWrap></mets:dmdSec>
               <mets:amdSec><mets:rightsMD ID="RIGHTS"><mets:mdWrap><mets:xmlData>
                 <dv:rights><dv:owner>Literaturarchiv Salzburg</dv:owner></dv:rights>
               </mets:xmlData></mets:mdWrap></mets:rightsMD></mets:amdSec>"#,
        );
        let metadata = MetsParser::from_xml(xml).parse().unwrap().metadata;

        assert_eq!(metadata.title.as_deref(), Some("Brief an Romain Rolland"));
        assert_eq!(metadata.author.as_deref(), Some("Zweig, Stefan"));
        assert_eq!(metadata.signature.as_deref(), Some("SZ-SAM/L1.4"));
        assert_eq!(metadata.language.as_deref(), Some("ger"));
        assert_eq!(metadata.owner.as_deref(), Some("Literaturarchiv Salzburg"));
        assert_eq!(metadata.urn.as_deref(), Some("urn:nbn:at:at-oeaw-151"));
    }

    #[test]
    fn test_missing_metadata_stays_absent() {
        let xml = manifest("<mets:dmdSec ID=\"DMD\"/>");
        let manifest = MetsParser::from_xml(xml).parse().unwrap();
        assert!(manifest.metadata.is_empty());
        assert!(manifest.pages.is_empty());
    }

    #[test]
    fn test_logical_sections_and_links() {
        let xml = manifest(
            r#"<mets:structMap TYPE="LOGICAL">
                 <mets:div ID="LOG_ROOT" TYPE="collection">
                   <mets:div ID="U.1" TYPE="letter"/>
                   <mets:div ID="U.2" TYPE="envelope"/>
                   <mets:div ID="U.3"/>
                 </mets:div>
               </mets:structMap>
               <mets:structLink>
                 <mets:smLink xlink:from="U.1" xlink:to="PHYS_1"/>
                 <mets:smLink xlink:from="U.1" xlink:to="PHYS_2"/>
                 <mets:smLink xlink:from="U.2" xlink:to="PHYS_3"/>
                 <mets:smLink xlink:from="U.1" xlink:to="PHYS_2"/>
                 <mets:smLink xlink:from="U.4"/>
               </mets:structLink>"#,
        );
        let manifest = MetsParser::from_xml(xml).parse().unwrap();

        assert_eq!(
            manifest.logical_sections,
            vec![
                LogicalSection::new("U.1", "letter"),
                LogicalSection::new("U.2", "envelope"),
            ]
        );
        assert_eq!(
            manifest.logical_to_physical.get("U.1").unwrap(),
            &["PHYS_1", "PHYS_2", "PHYS_2"]
        );
        assert_eq!(manifest.logical_to_physical.get("U.2").unwrap(), &["PHYS_3"]);
        assert!(manifest.logical_to_physical.get("U.4").is_none());
    }

    #[test]
    fn test_malformed_xml() {
        let result = MetsParser::from_xml("<mets:mets><mets:structMap></mets:mets>").parse();
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_from_bytes_invalid_utf8() {
        let result = MetsParser::from_bytes(&[0x3C, 0xFF, 0xFE, 0x3E]);
        assert!(matches!(result, Err(Error::Encoding(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let result = MetsParser::open("does/not/exist/mets.xml");
        assert!(matches!(result, Err(Error::ManifestNotFound(_))));
    }
}
