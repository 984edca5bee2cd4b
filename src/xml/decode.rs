//! Response decoding
//!
//! Parsing happens in two steps: [`parse_document`] builds a small element
//! tree with `quick_xml`, then [`to_mapping`] folds it into an [`XmlMap`].

use super::{CodecError, XmlMap, XmlValue};
use crate::core::constants::element;
use indexmap::IndexMap;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parsed element tree node
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn new(tag: String) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    /// Converts the element's content to a value, dropping its own tag
    pub fn into_value(self) -> XmlValue {
        value_of(self.text, self.children)
    }
}

fn value_of(text: String, children: Vec<Element>) -> XmlValue {
    if children.is_empty() {
        return XmlValue::Text(text.trim().to_string());
    }

    let mut grouped: IndexMap<String, Vec<XmlValue>> = IndexMap::new();
    for child in children {
        grouped
            .entry(child.tag)
            .or_default()
            .push(value_of(child.text, child.children));
    }

    let map = grouped
        .into_iter()
        .map(|(tag, mut values)| {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                XmlValue::List(values)
            };
            (tag, value)
        })
        .collect();
    XmlValue::Map(map)
}

fn tag_name(decoder: Decoder, start: &BytesStart<'_>) -> Result<String, CodecError> {
    Ok(decoder.decode(start.name().as_ref())?.into_owned())
}

/// Places a finished element under its parent, or makes it the root
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), CodecError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(CodecError::Structure("multiple root elements")),
    }
    Ok(())
}

fn push_text(stack: &mut [Element], content: &str) -> Result<(), CodecError> {
    match stack.last_mut() {
        Some(element) => element.text.push_str(content),
        None if content.trim().is_empty() => {}
        None => return Err(CodecError::Structure("text outside root element")),
    }
    Ok(())
}

/// Parses a complete XML document into an element tree
///
/// Text is decoded with the encoding named in the XML declaration, UTF-8
/// when there is none. Comments, processing instructions and doctypes are
/// skipped. Attributes are not part of the wFirma payloads and are ignored.
pub fn parse_document(input: &[u8]) -> Result<Element, CodecError> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(CodecError::Structure("multiple root elements"));
                }
                stack.push(Element::new(tag_name(reader.decoder(), &start)?));
            }
            Event::Empty(start) => {
                let element = Element::new(tag_name(reader.decoder(), &start)?);
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or(CodecError::Structure("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let content = text.unescape()?;
                push_text(&mut stack, &content)?;
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                let content = reader.decoder().decode(&bytes)?;
                push_text(&mut stack, &content)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(CodecError::Structure("unclosed element"));
    }
    root.ok_or(CodecError::Structure("document has no root element"))
}

/// Folds a parsed response document into a mapping
///
/// An `<api>` envelope is unwrapped: each distinct child tag becomes a key,
/// and when a tag repeats only its first occurrence is kept. Any other root
/// yields its own children mapping; a text-only root yields
/// `{root_tag: text}`.
pub fn to_mapping(root: Element) -> XmlMap {
    if root.tag == element::API {
        let mut map = XmlMap::new();
        for child in root.children {
            map.entry(child.tag)
                .or_insert_with(|| value_of(child.text, child.children));
        }
        return map;
    }

    let tag = root.tag;
    match value_of(root.text, root.children) {
        XmlValue::Map(map) => map,
        leaf => XmlMap::from([(tag, leaf)]),
    }
}

/// Parses and folds a response body in one step
pub fn decode(input: &[u8]) -> Result<XmlMap, CodecError> {
    parse_document(input).map(to_mapping)
}
