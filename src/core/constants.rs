//! Constants for the wFirma wire protocol
//!
//! This module defines the string constants used when talking to the wFirma
//! API: header names, query parameter keys, payload formats, API status codes
//! and the environment variables read by the configuration loader.

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api2.wfirma.pl";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP header names and values
pub mod header {
    /// Accept header name
    pub const ACCEPT: &str = "Accept";

    /// Content-Type header name
    pub const CONTENT_TYPE: &str = "Content-Type";

    /// Authorization header name (OAuth2 bearer mode)
    pub const AUTHORIZATION: &str = "Authorization";

    /// API key headers
    pub const ACCESS_KEY: &str = "accessKey";
    pub const SECRET_KEY: &str = "secretKey";
    pub const APP_KEY: &str = "appKey";

    /// Value sent in the Accept header
    pub const XML_ACCEPT: &str = "application/xml";

    /// Value sent in the Content-Type header
    pub const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";
}

/// Query parameter keys and fixed values
pub mod query {
    pub const INPUT_FORMAT: &str = "inputFormat";
    pub const OUTPUT_FORMAT: &str = "outputFormat";
    pub const COMPANY_ID: &str = "company_id";
    pub const OAUTH_VERSION: &str = "oauth_version";

    /// Payload format used in both directions
    pub const XML: &str = "xml";

    /// OAuth version announced with bearer credentials
    pub const OAUTH2: &str = "2";
}

/// API status codes reported in `<status><code>`
pub mod status {
    /// Request succeeded
    pub const OK: &str = "OK";

    /// Request succeeded without a body
    pub const NO_CONTENT: &str = "NO_CONTENT";

    /// Codes that do not signal an error
    pub const SUCCESS: [&str; 2] = [OK, NO_CONTENT];

    /// Returns true if `code` is one of the non-error codes
    pub fn is_success(code: &str) -> bool {
        SUCCESS.contains(&code)
    }
}

/// Element names shared by request and response documents
pub mod element {
    pub const API: &str = "api";
    pub const STATUS: &str = "status";
    pub const CODE: &str = "code";
    pub const MESSAGE: &str = "message";
    pub const PARAMETERS: &str = "parameters";
    pub const PARAMETER: &str = "parameter";
    pub const NAME: &str = "name";
    pub const VALUE: &str = "value";
    pub const PAGE: &str = "page";
    pub const LIMIT: &str = "limit";
    pub const FIELDS: &str = "fields";
    pub const FIELD: &str = "field";
    pub const ORDER: &str = "order";
    pub const ASC: &str = "asc";
    pub const DESC: &str = "desc";
}

/// Environment variables read by [`crate::core::config::Config::from_env`]
pub mod env {
    pub const CONFIG_PATH: &str = "WFIRMA_CONFIG";
    pub const API_BASE: &str = "WFIRMA_API_BASE";
    pub const COMPANY_ID: &str = "WFIRMA_COMPANY_ID";
    pub const ACCESS_KEY: &str = "WFIRMA_ACCESS_KEY";
    pub const SECRET_KEY: &str = "WFIRMA_SECRET_KEY";
    pub const APP_KEY: &str = "WFIRMA_APP_KEY";
    pub const OAUTH_TOKEN: &str = "WFIRMA_OAUTH_TOKEN";
    pub const TIMEOUT: &str = "WFIRMA_TIMEOUT";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}
