//! Request body builders
//!
//! Every wFirma request body is wrapped in `<api><{module}>…</{module}></api>`.
//! Three shapes are used by the resource methods: a single record of flat
//! fields, a `<parameters>` list of name/value pairs, and a `<parameters>`
//! block with paging, field selection and ordering for `find` calls.

use super::CodecError;
use crate::core::constants::element;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;

/// Sort direction and field for `find` calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Asc(String),
    Desc(String),
}

/// Paging, field selection and ordering for `find` calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindParameters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub fields: Vec<String>,
    pub order: Option<Order>,
}

impl FindParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Restricts the returned record fields; may be called repeatedly
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Thin wrapper over `quick_xml::Writer` that only emits element/text nodes
struct BodyWriter {
    writer: Writer<Vec<u8>>,
}

impl BodyWriter {
    /// Starts a document with the XML declaration and the given module
    /// wrapper, i.e. `<api><{module}>`.
    fn start(module: &str) -> Result<Self, CodecError> {
        let mut body = Self {
            writer: Writer::new(Vec::new()),
        };
        body.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        body.open(element::API)?;
        body.open(module)?;
        Ok(body)
    }

    fn open(&mut self, name: &str) -> Result<(), CodecError> {
        if !is_valid_name(name) {
            return Err(CodecError::InvalidName(name.to_string()));
        }
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), CodecError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn leaf(&mut self, name: &str, text: &str) -> Result<(), CodecError> {
        self.open(name)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn finish(mut self, module: &str) -> Result<Vec<u8>, CodecError> {
        self.close(module)?;
        self.close(element::API)?;
        Ok(self.writer.into_inner())
    }
}

/// `<api><{module}><{record}><k>v</k>…</{record}></{module}></api>`
pub fn module_record<I, K, V>(module: &str, record: &str, fields: I) -> Result<Vec<u8>, CodecError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    let mut body = BodyWriter::start(module)?;
    body.open(record)?;
    for (key, value) in fields {
        body.leaf(key.as_ref(), &value.to_string())?;
    }
    body.close(record)?;
    body.finish(module)
}

/// `<api><{module}><parameters><parameter><name>k</name><value>v</value></parameter>…`
pub fn module_parameters<I, K, V>(module: &str, params: I) -> Result<Vec<u8>, CodecError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    let mut body = BodyWriter::start(module)?;
    body.open(element::PARAMETERS)?;
    for (name, value) in params {
        body.open(element::PARAMETER)?;
        body.leaf(element::NAME, name.as_ref())?;
        body.leaf(element::VALUE, &value.to_string())?;
        body.close(element::PARAMETER)?;
    }
    body.close(element::PARAMETERS)?;
    body.finish(module)
}

/// `<api><{module}><parameters>` with page, limit, fields and order
pub fn find_parameters(module: &str, params: &FindParameters) -> Result<Vec<u8>, CodecError> {
    let mut body = BodyWriter::start(module)?;
    body.open(element::PARAMETERS)?;

    if let Some(page) = params.page {
        body.leaf(element::PAGE, &page.to_string())?;
    }
    if let Some(limit) = params.limit {
        body.leaf(element::LIMIT, &limit.to_string())?;
    }
    if !params.fields.is_empty() {
        body.open(element::FIELDS)?;
        for field in &params.fields {
            body.leaf(element::FIELD, field)?;
        }
        body.close(element::FIELDS)?;
    }
    if let Some(order) = &params.order {
        body.open(element::ORDER)?;
        match order {
            Order::Asc(field) => body.leaf(element::ASC, field)?,
            Order::Desc(field) => body.leaf(element::DESC, field)?,
        }
        body.close(element::ORDER)?;
    }

    body.close(element::PARAMETERS)?;
    body.finish(module)
}
