use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::LandXmlError;

/// A parsed XML element with namespace prefixes stripped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub text: String,
}

impl XmlNode {
    /// Value of the attribute with the given local name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child with the given local name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Every child with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn parse_error(err: impl std::fmt::Display) -> LandXmlError {
    LandXmlError::Parse(err.to_string())
}

fn open_node(
    reader: &Reader<&[u8]>,
    e: &quick_xml::events::BytesStart<'_>,
) -> Result<XmlNode, LandXmlError> {
    let local = e.local_name();
    let name = reader.decoder().decode(local.as_ref()).map_err(parse_error)?;

    let mut attributes = Vec::new();
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(parse_error)?;
        let key = reader
            .decoder()
            .decode(attr.key.local_name().as_ref())
            .map_err(parse_error)?
            .into_owned();
        let value = attr.unescape_value().map_err(parse_error)?.into_owned();
        attributes.push((key, value));
    }

    Ok(XmlNode {
        name: name.into_owned(),
        attributes,
        ..XmlNode::default()
    })
}

/// Parses a document into its root element.
///
/// # Errors
///
/// Returns [`LandXmlError::Parse`] for malformed XML or a document without
/// a root element.
pub fn parse(xml: &str) -> Result<XmlNode, LandXmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buffer = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event_into(&mut buffer) {
            Ok(Event::Start(ref e)) => stack.push(open_node(&reader, e)?),
            Ok(Event::Empty(ref e)) => {
                let node = open_node(&reader, e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| LandXmlError::Parse("unbalanced end tag".to_owned()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.xml_content().map_err(parse_error)?;
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(parse_error(err)),
            _ => {}
        }

        buffer.clear();
    }

    if !stack.is_empty() {
        return Err(LandXmlError::Parse("unexpected end of document".to_owned()));
    }
    root.ok_or_else(|| LandXmlError::Parse("document has no root element".to_owned()))
}
