//! Error types for the wFirma client
//!
//! Every failure after a client has been constructed surfaces as
//! [`WFirmaError::Api`], whether the transport failed, the body was not valid
//! XML, or the API reported a non-OK status. Callers get one type to match on
//! and enough context to decide whether to retry.

use crate::core::constants::{element, status};
use crate::xml::{CodecError, XmlMap, XmlValue};
use thiserror::Error;

/// Body attached to an API error
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Response decoded into a mapping
    Decoded(XmlMap),

    /// Raw bytes that could not be decoded
    Raw(Vec<u8>),
}

/// Errors raised by the wFirma client
#[derive(Debug, Error)]
pub enum WFirmaError {
    /// No usable credentials were configured
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Transport, parse, HTTP or API-status failure
    #[error("[{}] {}", display_status(.status), .message)]
    Api {
        status: Option<u16>,
        message: String,
        payload: Option<Payload>,
    },
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "-".to_string(), |s| s.to_string())
}

impl WFirmaError {
    pub(crate) fn api(status: Option<u16>, message: impl Into<String>, payload: Option<Payload>) -> Self {
        WFirmaError::Api {
            status,
            message: message.into(),
            payload,
        }
    }

    /// HTTP status of the response, if one was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            WFirmaError::Api { status, .. } => *status,
            WFirmaError::Auth(_) => None,
        }
    }

    /// Decoded or raw response attached to the error
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            WFirmaError::Api { payload, .. } => payload.as_ref(),
            WFirmaError::Auth(_) => None,
        }
    }

    /// API status code (`<status><code>`) from the decoded payload
    pub fn api_code(&self) -> Option<&str> {
        match self.payload()? {
            Payload::Decoded(map) => status_code_of(map),
            Payload::Raw(_) => None,
        }
    }
}

/// Request bodies that cannot be encoded never reach the transport
impl From<CodecError> for WFirmaError {
    fn from(err: CodecError) -> Self {
        WFirmaError::api(None, format!("Failed to build XML body: {}", err), None)
    }
}

/// Reads `status.code` out of a decoded response
pub(crate) fn status_code_of(map: &XmlMap) -> Option<&str> {
    map.get(element::STATUS)?
        .get(element::CODE)?
        .as_text()
        .filter(|code| !code.is_empty())
}

/// Reads `status.message` out of a decoded response
pub(crate) fn status_message_of(map: &XmlMap) -> Option<&str> {
    map.get(element::STATUS)?
        .get(element::MESSAGE)?
        .as_text()
        .filter(|msg| !msg.is_empty())
}

/// Returns the API error for a decoded response whose status code is not a
/// success code, or `None` if the response is acceptable at the API level.
pub(crate) fn check_api_status(http_status: u16, map: &XmlMap) -> Option<WFirmaError> {
    let code = status_code_of(map)?;
    if status::is_success(code) {
        return None;
    }

    let message = match status_message_of(map) {
        Some(detail) => format!("API status != OK: {}: {}", code, detail),
        None => format!("API status != OK: {}", code),
    };
    Some(WFirmaError::api(
        Some(http_status),
        message,
        Some(Payload::Decoded(map.clone())),
    ))
}

/// Builds the `{status: {code: NO_CONTENT}}` mapping returned for empty bodies
pub(crate) fn no_content() -> XmlMap {
    let mut inner = XmlMap::new();
    inner.insert(
        element::CODE.to_string(),
        XmlValue::Text(status::NO_CONTENT.to_string()),
    );
    let mut map = XmlMap::new();
    map.insert(element::STATUS.to_string(), XmlValue::Map(inner));
    map
}
