//! XML codec for wFirma payloads
//!
//! Responses are decoded into a generic [`XmlMap`] rather than typed models:
//! the API returns deeply nested, loosely specified documents and callers
//! pick out what they need. Request bodies are produced by the builders in
//! [`encode`].

pub mod decode;
pub mod encode;

pub use decode::{decode, parse_document, to_mapping, Element};
pub use encode::{find_parameters, module_parameters, module_record, FindParameters, Order};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decoded element children keyed by tag name, in document order
pub type XmlMap = IndexMap<String, XmlValue>;

/// A decoded XML element
///
/// Leaf elements become [`XmlValue::Text`]. Elements with children become a
/// [`XmlValue::Map`]; a tag repeated among siblings becomes a
/// [`XmlValue::List`] in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XmlValue {
    Text(String),
    List(Vec<XmlValue>),
    Map(XmlMap),
}

impl XmlValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&XmlMap> {
        match self {
            XmlValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[XmlValue]> {
        match self {
            XmlValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a child by tag when this value is a map
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        self.as_map()?.get(key)
    }

    /// Views the value as a list of records
    ///
    /// A tag that appeared once decodes to a single value, the same tag
    /// appearing several times decodes to a list. This smooths over the
    /// difference.
    pub fn items(&self) -> &[XmlValue] {
        match self {
            XmlValue::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

/// Errors produced while reading or writing XML
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("xml parse: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed document: {0}")]
    Structure(&'static str),

    #[error("invalid element name: {0:?}")]
    InvalidName(String),
}
