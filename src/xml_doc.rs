use std::io;

use quick_xml::events::{
    BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event,
};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// The only failure type in the core. Everything downstream of a
/// successful parse is a total function.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid XML: {0}")]
    Malformed(String),
    #[error("no track points found in document")]
    NoTrackPoints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    /// Attribute order is significant for byte-stable re-serialization.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    /// Whether the source used `<name/>` rather than `<name></name>`.
    pub self_closing: bool,
}

impl Element {
    /// Element name with any namespace prefix removed, so documents
    /// using a prefix for the GPX namespace still resolve.
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(Element),
    /// Decoded character data (entities resolved at parse time,
    /// re-escaped on serialization).
    Text(String),
    CData(String),
    Comment(String),
    /// Content between `<?` and `?>` of the XML declaration.
    Declaration(String),
    ProcessingInstruction(String),
    DocType(String),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_whitespace_text(&self) -> bool {
        match self {
            XmlNode::Text(t) => t.chars().all(char::is_whitespace),
            _ => false,
        }
    }
}

fn malformed(err: impl std::fmt::Display) -> ParseError {
    ParseError::Malformed(err.to_string())
}

/// Parses a markup document into a forest of top-level nodes. Fails on
/// anything that is not well-formed; performs no schema validation.
pub fn parse(input: &str) -> Result<Vec<XmlNode>, ParseError> {
    let mut reader = Reader::from_str(input);

    let mut roots: Vec<XmlNode> = Vec::new();
    // Stack of elements whose end tag has not been seen yet.
    let mut open: Vec<Element> = Vec::new();

    loop {
        let event = reader.read_event().map_err(malformed)?;
        match event {
            Event::Eof => break,
            Event::Start(e) => {
                open.push(element_from_start(&e, false)?);
            }
            Event::Empty(e) => {
                let el = element_from_start(&e, true)?;
                attach(&mut roots, &mut open, XmlNode::Element(el));
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let el = match open.pop() {
                    Some(el) if el.name == name => el,
                    Some(el) => {
                        return Err(ParseError::Malformed(format!(
                            "mismatched end tag </{}>, expected </{}>",
                            name, el.name
                        )))
                    }
                    None => {
                        return Err(ParseError::Malformed(format!(
                            "unexpected end tag </{name}>"
                        )))
                    }
                };
                attach(&mut roots, &mut open, XmlNode::Element(el));
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(malformed)?.into_owned();
                attach(&mut roots, &mut open, XmlNode::Text(text));
            }
            Event::CData(e) => {
                let content = String::from_utf8_lossy(&e).into_owned();
                attach(&mut roots, &mut open, XmlNode::CData(content));
            }
            Event::Comment(e) => {
                let content = String::from_utf8_lossy(&e).into_owned();
                attach(&mut roots, &mut open, XmlNode::Comment(content));
            }
            Event::Decl(e) => {
                let content = String::from_utf8_lossy(&e).into_owned();
                attach(&mut roots, &mut open, XmlNode::Declaration(content));
            }
            Event::PI(e) => {
                let content = String::from_utf8_lossy(&e).into_owned();
                attach(&mut roots, &mut open, XmlNode::ProcessingInstruction(content));
            }
            Event::DocType(e) => {
                let content = String::from_utf8_lossy(&e).trim().to_owned();
                attach(&mut roots, &mut open, XmlNode::DocType(content));
            }
        }
    }

    if let Some(el) = open.pop() {
        return Err(ParseError::Malformed(format!("unclosed element <{}>", el.name)));
    }

    Ok(roots)
}

fn element_from_start(
    e: &quick_xml::events::BytesStart,
    self_closing: bool,
) -> Result<Element, ParseError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(malformed)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(malformed)?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        self_closing,
    })
}

fn attach(roots: &mut Vec<XmlNode>, open: &mut [Element], node: XmlNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Raw re-emission of a node forest through a `quick_xml::Writer`. No
/// formatting guarantees; every node kind round-trips (pretty-printing
/// is the formatter's job).
pub fn serialize(nodes: &[XmlNode]) -> String {
    let mut writer = Writer::new(Vec::new());
    for node in nodes {
        // Writes into an in-memory Vec cannot fail.
        write_node(&mut writer, node).expect("write into Vec");
    }
    String::from_utf8_lossy(&writer.into_inner()).into_owned()
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> io::Result<()> {
    match node {
        XmlNode::Element(el) => {
            let mut start = BytesStart::new(el.name.as_str());
            for (key, value) in &el.attributes {
                start.push_attribute((key.as_str(), value.as_str()));
            }
            if el.self_closing && el.children.is_empty() {
                writer.write_event(Event::Empty(start))?;
            } else {
                writer.write_event(Event::Start(start))?;
                for child in &el.children {
                    write_node(writer, child)?;
                }
                writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
            }
        }
        XmlNode::Text(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        XmlNode::CData(content) => {
            writer.write_event(Event::CData(BytesCData::new(content)))?;
        }
        XmlNode::Comment(content) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(content.as_str())))?;
        }
        XmlNode::Declaration(content) => {
            let start = BytesStart::from_content(content.as_str(), "xml".len());
            writer.write_event(Event::Decl(BytesDecl::from_start(start)))?;
        }
        XmlNode::ProcessingInstruction(content) => {
            writer.write_event(Event::PI(BytesPI::new(content.as_str())))?;
        }
        XmlNode::DocType(content) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(content.as_str())))?;
        }
    }
    Ok(())
}
