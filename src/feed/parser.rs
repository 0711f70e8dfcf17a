use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{FeedError, Result};

/// Read-only navigation over a parsed feed document.
///
/// The adapter only ever needs three things from a node: its attributes,
/// its children with a given tag, and those children filtered on an
/// attribute value (`Room[@type='bedroom']`).
pub trait FeedNode: Sized {
    fn tag(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
    /// Trimmed text content of the node itself.
    fn text(&self) -> &str;
    fn children(&self) -> &[Self];

    fn children_of<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children().iter().filter(move |child| child.tag() == tag)
    }

    fn find<'a>(
        &'a self,
        tag: &'a str,
        attribute: &'a str,
        value: &'a str,
    ) -> impl Iterator<Item = &'a Self> + 'a {
        self.children_of(tag)
            .filter(move |child| child.attribute(attribute) == Some(value))
    }

    fn child(&self, tag: &str) -> Option<&Self> {
        self.children().iter().find(|child| child.tag() == tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    text: String,
}

impl FeedNode for XmlElement {
    fn tag(&self) -> &str {
        &self.name
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn text(&self) -> &str {
        self.text.trim()
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Loads a whole document into memory and returns its root element.
pub fn parse_document(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(FeedError::Truncated { element: open.name });
    }

    root.ok_or_else(|| FeedError::MissingElement {
        parent: "document".to_string(),
        element: "root".to_string(),
    })
}

fn open_element(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name,
        attributes,
        ..Default::default()
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
