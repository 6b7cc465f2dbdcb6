//! Mutable XML document trees for package parts.
//!
//! Parts that need rewriting are materialized as an [`XmlTree`]: a small
//! owned element tree built from quick-xml events and written back out with
//! `quick_xml::Writer`. Element and attribute names are kept qualified
//! (`xdr:wsDr`), so prefixes survive a round trip untouched.

use crate::error::{Error, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// A node inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Child element
    Element(Element),
    /// Unescaped character data
    Text(String),
    /// CDATA section content
    CData(String),
    /// Comment body
    Comment(String),
    /// Processing instruction content
    ProcessingInstruction(String),
}

/// An XML element with qualified name, attributes in document order, and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified name (e.g., "xdr:oneCellAnchor")
    pub name: String,
    /// Attributes as (qualified name, unescaped value)
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder: append a text node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Namespace prefix of the element name, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Get an attribute value by qualified name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Iterate mutably over child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// First child element with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&Element> {
        self.elements().find(|el| el.local_name() == local_name)
    }

    /// Child elements with the given local name.
    pub fn children_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.local_name() == local_name)
    }

    /// Append a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Concatenated character data of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Element(el) => el.collect_text(out),
                Node::Text(text) | Node::CData(text) => out.push_str(text),
                _ => {}
            }
        }
    }

    /// This element and all descendant elements, breadth first.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = vec![self];
        let mut i = 0;
        while i < out.len() {
            let current = out[i];
            out.extend(current.elements());
            i += 1;
        }
        out
    }

    /// Serialize this element (without XML declaration).
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self)?;
        String::from_utf8(writer.into_inner()).map_err(|e| Error::XmlParse(e.to_string()))
    }

    /// Parse a standalone fragment with a single root element.
    pub fn parse_fragment(xml: &str) -> Result<Self> {
        XmlTree::parse_str(xml)?
            .root
            .ok_or_else(|| Error::XmlParse("fragment has no root element".to_string()))
    }
}

/// The `<?xml ...?>` declaration of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// A parsed XML document.
///
/// An empty tree (no root) serializes to zero bytes, which the package store
/// treats as a deleted part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlTree {
    /// XML declaration, if present
    pub declaration: Option<Declaration>,
    /// Comments and processing instructions before the root element
    pub prolog: Vec<Node>,
    /// Document element
    pub root: Option<Element>,
}

impl XmlTree {
    /// Parse raw part bytes (UTF-8 or UTF-16, with or without BOM).
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let content = decode_xml_bytes(bytes)?;
        Self::parse_str(&content)
    }

    /// Parse an XML string.
    pub fn parse_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut tree = XmlTree::default();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::XmlParse(format!("at position {}: {}", reader.error_position(), e))
            })?;
            match event {
                Event::Decl(decl) => tree.declaration = Some(parse_declaration(&decl)?),
                Event::Start(e) => stack.push(element_from_start(&e)?),
                Event::Empty(e) => {
                    let el = element_from_start(&e)?;
                    tree.attach(&mut stack, Node::Element(el))?;
                }
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| Error::XmlParse("unexpected end tag".to_string()))?;
                    tree.attach(&mut stack, Node::Element(el))?;
                }
                Event::Text(e) => {
                    if !stack.is_empty() {
                        let text = e.unescape()?.into_owned();
                        tree.attach(&mut stack, Node::Text(text))?;
                    }
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    tree.attach(&mut stack, Node::CData(text))?;
                }
                Event::Comment(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    tree.attach(&mut stack, Node::Comment(text))?;
                }
                Event::PI(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    tree.attach(&mut stack, Node::ProcessingInstruction(text))?;
                }
                Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::XmlParse(format!("unclosed element <{}>", open.name)));
        }

        Ok(tree)
    }

    fn attach(&mut self, stack: &mut [Element], node: Node) -> Result<()> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        match node {
            Node::Element(el) => {
                if self.root.is_some() {
                    return Err(Error::XmlParse("multiple root elements".to_string()));
                }
                self.root = Some(el);
            }
            Node::Text(_) | Node::CData(_) => {}
            other => {
                if self.root.is_none() {
                    self.prolog.push(other);
                }
            }
        }
        Ok(())
    }

    /// Serialize the document as UTF-8. A tree without root yields no bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let Some(root) = &self.root else {
            return Ok(Vec::new());
        };

        let mut writer = Writer::new(Vec::new());
        if let Some(decl) = &self.declaration {
            // Content is always re-encoded as UTF-8.
            let encoding = decl.encoding.as_ref().map(|_| "UTF-8");
            write(
                &mut writer,
                Event::Decl(BytesDecl::new(
                    &decl.version,
                    encoding,
                    decl.standalone.as_deref(),
                )),
            )?;
            writer.get_mut().extend_from_slice(b"\r\n");
        }
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, root)?;
        Ok(writer.into_inner())
    }
}

fn parse_declaration(decl: &BytesDecl<'_>) -> Result<Declaration> {
    let version = decl
        .version()
        .map_err(|e| Error::XmlParse(e.to_string()))?;
    let encoding = match decl.encoding() {
        Some(enc) => Some(enc.map_err(|e| Error::XmlParse(e.to_string()))?),
        None => None,
    };
    let standalone = match decl.standalone() {
        Some(sa) => Some(sa.map_err(|e| Error::XmlParse(e.to_string()))?),
        None => None,
    };
    Ok(Declaration {
        version: String::from_utf8_lossy(&version).into_owned(),
        encoding: encoding.map(|e| String::from_utf8_lossy(&e).into_owned()),
        standalone: standalone.map(|s| String::from_utf8_lossy(&s).into_owned()),
    })
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element> {
    let mut el = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::XmlParse(e.to_string()))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    match node {
        Node::Element(el) => write_element(writer, el),
        Node::Text(text) => write(writer, Event::Text(BytesText::new(text))),
        Node::CData(text) => write(writer, Event::CData(BytesCData::new(text.as_str()))),
        Node::Comment(text) => write(writer, Event::Comment(BytesText::from_escaped(text.as_str()))),
        Node::ProcessingInstruction(text) => write(writer, Event::PI(BytesPI::new(text.as_str()))),
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &Element) -> Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        return write(writer, Event::Empty(start));
    }

    write(writer, Event::Start(start))?;
    for child in &el.children {
        write_node(writer, child)?;
    }
    write(writer, Event::End(BytesEnd::new(el.name.as_str())))
}

/// Fix XML encoding declaration from UTF-16 to UTF-8.
///
/// When we decode UTF-16 XML to a Rust String (UTF-8), the XML declaration
/// still says encoding="UTF-16", which quick-xml would try to honor.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];

            let fixed_decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");

            return format!("{}{}", fixed_decl, rest);
        }
    }
    content.to_string()
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// OOXML parts are typically UTF-8, but some producers write UTF-16.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return String::from_utf8(bytes[3..].to_vec())
            .map_err(|e| Error::XmlParse(e.to_string()));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        let content = decode_utf16(&bytes[2..], u16::from_le_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let content = decode_utf16(&bytes[2..], u16::from_be_bytes)?;
        return Ok(fix_xml_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // UTF-16 without BOM: ASCII markup leaves null bytes in every other position
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                decode_utf16(bytes, u16::from_le_bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                decode_utf16(bytes, u16::from_be_bytes).map(|s| fix_xml_encoding_declaration(&s))
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let len = bytes.len() & !1;
    let units = (0..len).step_by(2).map(|i| unit([bytes[i], bytes[i + 1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::XmlParse(e.to_string()))
}
