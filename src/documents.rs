//! Parsed schema document trees
//!
//! The engine consumes already-parsed, attributed element trees. This module
//! provides that tree shape plus a quick-xml parser producing it from XSD
//! source text, so schema sets can be loaded without an external parser.
//! Namespace declarations (`xmlns`, `xmlns:*`) are captured per element;
//! everything else lands in the plain attribute map.

use crate::error::{Error, Result};
use crate::namespaces::AliasTable;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// XML element in a parsed document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Local name (prefix stripped)
    pub name: String,
    /// Prefix as written, if any
    pub prefix: Option<String>,
    /// Attributes in document order, namespace declarations excluded
    pub attributes: IndexMap<String, String>,
    /// Namespace declarations appearing on this element
    pub namespaces: AliasTable,
    /// Text content, if any
    pub text: Option<String>,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            attributes: IndexMap::new(),
            namespaces: AliasTable::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Child elements with the given local name
    pub fn children_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Element> + 'a {
        let name = name.to_string();
        self.children.iter().filter(move |e| e.name == name)
    }

    /// First child element with the given local name
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children_named(name).next()
    }

    /// A location string for error reporting, e.g. `element 'price'`
    pub fn location(&self) -> String {
        match self.attribute("name") {
            Some(name) => format!("{} '{}'", self.name, name),
            None => self.name.clone(),
        }
    }
}

/// A parsed XML document
#[derive(Debug, Clone)]
pub struct Document {
    /// Root element, if the document was not empty
    pub root: Option<Element>,
}

impl Document {
    /// Parse a document from a string
    pub fn from_str(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse a document from bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut root = None;
        let mut stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    stack.push(Self::read_element(&e)?);
                }
                Ok(Event::End(_)) => {
                    if let Some(current) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.add_child(current),
                            None => root = Some(current),
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::read_element(&e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.add_child(element),
                        None => root = Some(element),
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("failed to unescape text: {}", e)))?
                            .to_string();
                        if !text.trim().is_empty() {
                            current.text = Some(text);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // comments, processing instructions, declarations
            }
            buf.clear();
        }

        Ok(Self { root })
    }

    fn read_element(start: &BytesStart) -> Result<Element> {
        let raw_name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::Xml(format!("invalid element name: {}", e)))?
            .to_string();

        let (prefix, local) = match raw_name.split_once(':') {
            Some((p, l)) => (Some(p.to_string()), l.to_string()),
            None => (None, raw_name),
        };

        let mut element = Element::new(local);
        element.prefix = prefix;

        for attr_result in start.attributes() {
            let attr =
                attr_result.map_err(|e| Error::Xml(format!("failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("invalid attribute name: {}", e)))?;

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("failed to unescape attribute value: {}", e)))?
                .to_string();

            if attr_name == "xmlns" {
                element.namespaces.set_default_namespace(&attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                element.namespaces.add_prefix(prefix, &attr_value);
            } else {
                element.attributes.insert(attr_name.to_string(), attr_value);
            }
        }

        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_xml() {
        let xml = r#"<root><child>text</child></root>"#;
        let doc = Document::from_str(xml).unwrap();

        let root = doc.root.unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "child");
        assert_eq!(root.children[0].text.as_deref(), Some("text"));
    }

    #[test]
    fn test_parse_with_attributes() {
        let xml = r#"<root attr1="value1" attr2="value2"><child/></root>"#;
        let doc = Document::from_str(xml).unwrap();

        let root = doc.root.unwrap();
        assert_eq!(root.attribute("attr1"), Some("value1"));
        assert_eq!(root.attribute("attr2"), Some("value2"));
        assert_eq!(root.attribute("missing"), None);
    }

    #[test]
    fn test_parse_with_namespaces() {
        let xml = r#"<xs:schema xmlns="http://example.com" xmlns:xs="http://www.w3.org/2001/XMLSchema"/>"#;
        let doc = Document::from_str(xml).unwrap();

        let root = doc.root.unwrap();
        assert_eq!(root.name, "schema");
        assert_eq!(root.prefix.as_deref(), Some("xs"));
        assert_eq!(
            root.namespaces.default_namespace(),
            Some("http://example.com")
        );
        assert_eq!(
            root.namespaces.namespace_for("xs"),
            Some("http://www.w3.org/2001/XMLSchema")
        );
        // namespace declarations do not leak into the attribute map
        assert!(root.attributes.is_empty());
    }

    #[test]
    fn test_children_named() {
        let xml = r#"<root><a/><b/><a/></root>"#;
        let doc = Document::from_str(xml).unwrap();

        let root = doc.root.unwrap();
        assert_eq!(root.children_named("a").count(), 2);
        assert!(root.first_child("b").is_some());
        assert!(root.first_child("c").is_none());

        // the returned borrow is tied to the tree, not the name
        let found = {
            let name = String::from("b");
            root.first_child(&name)
        };
        assert_eq!(found.unwrap().name, "b");
    }

    #[test]
    fn test_location() {
        let xml = r#"<element name="price"/>"#;
        let doc = Document::from_str(xml).unwrap();
        assert_eq!(doc.root.unwrap().location(), "element 'price'");
    }
}
