//! Minimal XMP packet codec
//!
//! Extracts simple key/value properties from the attributes of
//! `rdf:Description` elements and synthesises a fresh packet when the
//! caller edits properties instead of supplying a packet verbatim.
//! Anything the property model cannot represent survives untouched as
//! long as the raw packet string is written unmodified.

use crate::error::Result;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;

const RDF_DESCRIPTION: &[u8] = b"rdf:Description";

/// Namespace URIs for the property prefixes this codec can re-encode
const KNOWN_NAMESPACES: &[(&str, &str)] = &[
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("xmp", "http://ns.adobe.com/xap/1.0/"),
    ("xmpMM", "http://ns.adobe.com/xap/1.0/mm/"),
    ("xmpRights", "http://ns.adobe.com/xap/1.0/rights/"),
    ("tiff", "http://ns.adobe.com/tiff/1.0/"),
    ("exif", "http://ns.adobe.com/exif/1.0/"),
    ("photoshop", "http://ns.adobe.com/photoshop/1.0/"),
    ("Iptc4xmpCore", "http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/"),
];

/// One `prefix:name = value` property
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmpProperty {
    pub key: String,
    pub value: String,
}

/// A collection of simple XMP properties
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmpData {
    properties: Vec<XmpProperty>,
}

impl XmpData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn clear(&mut self) {
        self.properties.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, XmpProperty> {
        self.properties.iter()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Set `key` to `value`, replacing any existing property.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.properties.iter_mut().find(|p| p.key == key) {
            Some(p) => p.value = value.to_string(),
            None => self.properties.push(XmpProperty {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.properties.len();
        self.properties.retain(|p| p.key != key);
        before != self.properties.len()
    }
}

/// Decode the simple properties of an XMP packet.
///
/// Collects the attributes of every `rdf:Description` element, skipping
/// namespace declarations and `rdf:about`. A packet without any
/// `rdf:Description` decodes to an empty collection.
pub fn decode(packet: &str) -> Result<XmpData> {
    let mut reader = Reader::from_str(packet);
    reader.config_mut().trim_text(true);

    let mut data = XmpData::new();
    loop {
        match reader.read_event()? {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if e.name() == QName(RDF_DESCRIPTION) {
                    for attr in e.attributes() {
                        let attr = attr.map_err(quick_xml::Error::from)?;
                        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                        if key == "rdf:about" || key.starts_with("xmlns") {
                            continue;
                        }
                        let value = attr.decode_and_unescape_value(reader.decoder())?;
                        data.set(&key, &value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(data)
}

/// Encode properties as a fresh XMP packet.
///
/// An empty collection encodes to an empty string so that no XMP box is
/// emitted for it. Properties with a prefix outside the known namespace
/// table cannot be re-encoded and are dropped with a warning.
pub fn encode(data: &XmpData) -> String {
    let mut prefixes: Vec<&str> = Vec::new();
    let mut encodable: Vec<&XmpProperty> = Vec::new();
    for p in data.iter() {
        let Some((prefix, _)) = p.key.split_once(':') else {
            log::warn!("dropping XMP property without a prefix: {}", p.key);
            continue;
        };
        if KNOWN_NAMESPACES.iter().any(|(known, _)| *known == prefix) {
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
            encodable.push(p);
        } else {
            log::warn!("dropping XMP property with unknown namespace: {}", p.key);
        }
    }
    if encodable.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str("<?xpacket begin=\"\u{FEFF}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n");
    out.push_str("<x:xmpmeta xmlns:x=\"adobe:ns:meta/\">\n");
    out.push_str(" <rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">\n");
    out.push_str("  <rdf:Description rdf:about=\"\"");
    for prefix in &prefixes {
        let uri = KNOWN_NAMESPACES
            .iter()
            .find(|(known, _)| known == prefix)
            .map(|(_, uri)| *uri)
            .unwrap_or_default();
        out.push_str(&format!("\n    xmlns:{}=\"{}\"", prefix, uri));
    }
    for p in &encodable {
        out.push_str(&format!("\n    {}=\"{}\"", p.key, escape(p.value.as_str())));
    }
    out.push_str("/>\n </rdf:RDF>\n</x:xmpmeta>\n<?xpacket end=\"w\"?>");
    out
}
