//! wFirma API client
//!
//! [`WFirmaClient::call`] is the single request primitive: it attaches the
//! fixed query parameters and authentication, sends the request through the
//! configured [`Transport`], decodes the XML response and turns every kind of
//! failure into a [`WFirmaError`]. The resource method groups only shape
//! paths and bodies before delegating to it.

use crate::core::config::{Config, Credentials};
use crate::core::constants::{header, query};
use crate::core::error::{check_api_status, no_content, Payload, WFirmaError};
use crate::core::transport::{HttpRequest, HttpResponse, HttpTransport, Transport};
use crate::resources::{CompanyAccounts, Contractors, Invoices};
use crate::xml::{self, XmlMap};
use reqwest::Method;
use std::sync::Arc;
use tracing::{debug, warn};

/// Client for the wFirma XML API
///
/// Cheap to share by reference; holds only immutable configuration and the
/// transport.
pub struct WFirmaClient {
    config: Config,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for WFirmaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WFirmaClient")
            .field("base_url", &self.config.base_url)
            .field("company_id", &self.config.company_id)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl WFirmaClient {
    /// Create a client that sends requests over HTTPS with reqwest
    ///
    /// # Errors
    ///
    /// Returns `WFirmaError::Auth` if the configuration carries no
    /// credentials, or `WFirmaError::Api` if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, WFirmaError> {
        let transport =
            HttpTransport::new(config.timeout).map_err(|e| WFirmaError::api(None, e.0, None))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a caller-supplied transport
    pub fn with_transport(
        config: Config,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, WFirmaError> {
        let credentials = config.credentials.clone().ok_or_else(|| {
            WFirmaError::Auth(
                "Provide either an OAuth2 token or the API key trio (accessKey/secretKey/appKey)"
                    .to_string(),
            )
        })?;

        Ok(Self {
            config,
            credentials,
            transport,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn contractors(&self) -> Contractors<'_> {
        Contractors::new(self)
    }

    pub fn invoices(&self) -> Invoices<'_> {
        Invoices::new(self)
    }

    pub fn company_accounts(&self) -> CompanyAccounts<'_> {
        CompanyAccounts::new(self)
    }

    /// Send one request and decode the response
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `path` - Endpoint path relative to the base URL, e.g. `/invoices/get/1`
    /// * `query_params` - Extra query parameters; these override the defaults
    /// * `body` - XML request body
    ///
    /// # Errors
    ///
    /// Returns `WFirmaError::Api` when the transport fails, the body is not
    /// valid XML, or the API status code is not `OK`/`NO_CONTENT`. The HTTP
    /// status alone only fails a call when the body is empty.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        query_params: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<XmlMap, WFirmaError> {
        let request = self.build_request(method, path, query_params, body);
        debug!("Sending {} {}", request.method, request.url);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| WFirmaError::api(None, format!("Transport error: {}", e), None))?;

        Self::decode_response(response)
    }

    pub(crate) async fn get(&self, path: &str) -> Result<XmlMap, WFirmaError> {
        self.call(Method::GET, path, &[], None).await
    }

    pub(crate) async fn post(&self, path: &str, body: Vec<u8>) -> Result<XmlMap, WFirmaError> {
        self.call(Method::POST, path, &[], Some(body)).await
    }

    fn build_request(
        &self,
        method: Method,
        path: &str,
        query_params: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> HttpRequest {
        let url = if path.starts_with('/') {
            format!("{}{}", self.config.base_url, path)
        } else {
            format!("{}/{}", self.config.base_url, path)
        };

        let mut params = vec![
            (query::INPUT_FORMAT.to_string(), query::XML.to_string()),
            (query::OUTPUT_FORMAT.to_string(), query::XML.to_string()),
        ];
        if let Some(company_id) = &self.config.company_id {
            params.push((query::COMPANY_ID.to_string(), company_id.clone()));
        }
        if matches!(self.credentials, Credentials::OAuth2 { .. }) {
            params.push((query::OAUTH_VERSION.to_string(), query::OAUTH2.to_string()));
        }
        for (key, value) in query_params {
            match params.iter_mut().find(|(k, _)| k.as_str() == *key) {
                Some(existing) => existing.1 = value.to_string(),
                None => params.push((key.to_string(), value.to_string())),
            }
        }

        let mut headers = vec![
            (header::ACCEPT.to_string(), header::XML_ACCEPT.to_string()),
            (
                header::CONTENT_TYPE.to_string(),
                header::XML_CONTENT_TYPE.to_string(),
            ),
        ];
        for (name, value) in &self.config.headers {
            set_header(&mut headers, name, value);
        }
        self.apply_auth(&mut headers);

        HttpRequest {
            method,
            url,
            query: params,
            headers,
            body,
        }
    }

    /// Attaches the headers of the active credential mode, removing any
    /// headers belonging to the other mode.
    fn apply_auth(&self, headers: &mut Vec<(String, String)>) {
        headers.retain(|(name, _)| !is_auth_header(name));

        match &self.credentials {
            Credentials::OAuth2 { token } => {
                headers.push((header::AUTHORIZATION.to_string(), format!("Bearer {}", token)));
            }
            Credentials::ApiKey {
                access_key,
                secret_key,
                app_key,
            } => {
                headers.push((header::ACCESS_KEY.to_string(), access_key.clone()));
                headers.push((header::SECRET_KEY.to_string(), secret_key.clone()));
                headers.push((header::APP_KEY.to_string(), app_key.clone()));
            }
        }
    }

    fn decode_response(response: HttpResponse) -> Result<XmlMap, WFirmaError> {
        let status = response.status;
        let content = response.body.trim_ascii();

        if content.is_empty() {
            if !response.is_success() {
                return Err(WFirmaError::api(
                    Some(status),
                    "HTTP error without body",
                    None,
                ));
            }
            return Ok(no_content());
        }

        let map = xml::decode(content).map_err(|e| {
            WFirmaError::api(
                Some(status),
                format!("Failed to parse XML: {}", e),
                Some(Payload::Raw(content.to_vec())),
            )
        })?;

        if let Some(err) = check_api_status(status, &map) {
            warn!("wFirma request failed: {}", err);
            return Err(err);
        }

        if !response.is_success() {
            debug!("HTTP {} with a non-error API status, returning body", status);
        }

        Ok(map)
    }
}

fn is_auth_header(name: &str) -> bool {
    [
        header::AUTHORIZATION,
        header::ACCESS_KEY,
        header::SECRET_KEY,
        header::APP_KEY,
    ]
    .iter()
    .any(|auth| auth.eq_ignore_ascii_case(name))
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        Some(entry) => entry.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::testing::{api_xml, MockTransport};
    use crate::xml::XmlValue;

    fn oauth_client(transport: &Arc<MockTransport>) -> WFirmaClient {
        let config = Config::new("https://api2.wfirma.pl")
            .with_company_id("321")
            .with_oauth2_token("bearer-token");
        WFirmaClient::with_transport(config, transport.clone()).unwrap()
    }

    fn api_key_client(transport: &Arc<MockTransport>) -> WFirmaClient {
        let config = Config::new("https://api2.wfirma.pl/").with_api_key("AK", "SK", "APP");
        WFirmaClient::with_transport(config, transport.clone()).unwrap()
    }

    #[test]
    fn test_missing_credentials_fail_before_sending() {
        let transport = Arc::new(MockTransport::new());
        let result = WFirmaClient::with_transport(Config::default(), transport.clone());

        assert!(matches!(result, Err(WFirmaError::Auth(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_oauth_request_shape() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(200, api_xml("<users></users>", "OK"));
        let client = oauth_client(&transport);

        client.call(Method::GET, "/invoices/get/777", &[], None).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "https://api2.wfirma.pl/invoices/get/777");
        assert_eq!(request.query_param("inputFormat"), Some("xml"));
        assert_eq!(request.query_param("outputFormat"), Some("xml"));
        assert_eq!(request.query_param("company_id"), Some("321"));
        assert_eq!(request.query_param("oauth_version"), Some("2"));
        assert_eq!(request.header("Authorization"), Some("Bearer bearer-token"));
        assert_eq!(request.header("Accept"), Some("application/xml"));
        assert_eq!(
            request.header("Content-Type"),
            Some("application/xml; charset=utf-8")
        );
        assert_eq!(request.header("accessKey"), None);
        assert_eq!(request.header("secretKey"), None);
        assert_eq!(request.header("appKey"), None);
    }

    #[tokio::test]
    async fn test_api_key_request_shape() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(200, api_xml("<users></users>", "OK"));
        let client = api_key_client(&transport);

        client.call(Method::GET, "company_accounts/find", &[], None).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.url, "https://api2.wfirma.pl/company_accounts/find");
        assert_eq!(request.header("accessKey"), Some("AK"));
        assert_eq!(request.header("secretKey"), Some("SK"));
        assert_eq!(request.header("appKey"), Some("APP"));
        assert_eq!(request.header("Authorization"), None);
        assert_eq!(request.query_param("oauth_version"), None);
        assert_eq!(request.query_param("company_id"), None);
    }

    #[tokio::test]
    async fn test_configured_headers_cannot_add_second_auth_mode() {
        let transport = Arc::new(MockTransport::new());
        let config = Config::new("https://api2.wfirma.pl")
            .with_oauth2_token("tok")
            .with_header("accessKey", "sneaky")
            .with_header("X-Request-Source", "tests");
        let client = WFirmaClient::with_transport(config, transport.clone()).unwrap();

        client.call(Method::GET, "/invoices/get/1", &[], None).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.header("Authorization"), Some("Bearer tok"));
        assert_eq!(request.header("accessKey"), None);
        assert_eq!(request.header("X-Request-Source"), Some("tests"));
    }

    #[tokio::test]
    async fn test_query_params_override_defaults() {
        let transport = Arc::new(MockTransport::new());
        let client = oauth_client(&transport);

        client
            .call(Method::GET, "/invoices/find", &[("company_id", "999"), ("page", "2")], None)
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.query_param("company_id"), Some("999"));
        assert_eq!(request.query_param("page"), Some("2"));
        assert_eq!(
            request.query.iter().filter(|(k, _)| k == "company_id").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_success_codes_return_mapping() {
        for code in ["OK", "NO_CONTENT"] {
            let transport = Arc::new(MockTransport::new());
            transport.respond(
                200,
                api_xml("<invoices><invoice><id>42</id></invoice></invoices>", code),
            );
            let client = oauth_client(&transport);

            let map = client.call(Method::GET, "/invoices/get/42", &[], None).await.unwrap();

            assert_eq!(
                map["status"].get("code").and_then(XmlValue::as_text),
                Some(code)
            );
            let invoice = map["invoices"].get("invoice").unwrap();
            assert_eq!(invoice.get("id").and_then(XmlValue::as_text), Some("42"));
        }
    }

    #[tokio::test]
    async fn test_error_codes_raise_with_payload() {
        for code in ["ERROR", "AUTH", "NOT_FOUND", "INPUT_ERROR", "OUT_OF_SERVICE"] {
            let transport = Arc::new(MockTransport::new());
            transport.respond(200, api_xml("<invoices></invoices>", code));
            let client = oauth_client(&transport);

            let err = client
                .call(Method::GET, "/invoices/get/1", &[], None)
                .await
                .unwrap_err();

            assert_eq!(err.status_code(), Some(200));
            assert_eq!(err.api_code(), Some(code));
            match err.payload() {
                Some(Payload::Decoded(map)) => assert!(map.contains_key("invoices")),
                other => panic!("expected decoded payload, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_error_message_includes_status_message() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            200,
            "<api><status><code>AUTH</code><message>Invalid key</message></status></api>",
        );
        let client = api_key_client(&transport);

        let err = client.get("/contractors/get/1").await.unwrap_err();
        assert_eq!(err.to_string(), "[200] API status != OK: AUTH: Invalid key");
    }

    #[tokio::test]
    async fn test_empty_body() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(200, "  \n").respond(502, "");
        let client = oauth_client(&transport);

        let map = client.get("/company_accounts/find").await.unwrap();
        assert_eq!(map["status"].get("code").and_then(XmlValue::as_text), Some("NO_CONTENT"));

        let err = client.get("/company_accounts/find").await.unwrap_err();
        assert_eq!(err.status_code(), Some(502));
        assert!(err.payload().is_none());
        assert_eq!(err.to_string(), "[502] HTTP error without body");
    }

    #[tokio::test]
    async fn test_malformed_xml_keeps_raw_body() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(200, "<api><status>");
        let client = oauth_client(&transport);

        let err = client.get("/invoices/get/1").await.unwrap_err();
        assert_eq!(err.status_code(), Some(200));
        assert_eq!(err.payload(), Some(&Payload::Raw(b"<api><status>".to_vec())));
        assert!(err.to_string().contains("Failed to parse XML"));
    }

    #[tokio::test]
    async fn test_transport_failure_has_no_status() {
        let transport = Arc::new(MockTransport::new());
        transport.fail("connection refused");
        let client = oauth_client(&transport);

        let err = client.get("/invoices/get/1").await.unwrap_err();
        assert_eq!(err.status_code(), None);
        assert!(err.payload().is_none());
        assert_eq!(err.to_string(), "[-] Transport error: connection refused");
    }

    #[tokio::test]
    async fn test_http_error_status_defers_to_body_status() {
        let transport = Arc::new(MockTransport::new());
        transport
            .respond(500, api_xml("<invoices></invoices>", "OK"))
            .respond(503, api_xml("", "NO_CONTENT"))
            .respond(500, api_xml("<invoices></invoices>", "ERROR"));
        let client = oauth_client(&transport);

        let map = client.get("/invoices/get/1").await.unwrap();
        assert_eq!(map["status"].get("code").and_then(XmlValue::as_text), Some("OK"));
        assert!(map.contains_key("invoices"));

        let map = client.get("/invoices/get/1").await.unwrap();
        assert_eq!(
            map["status"].get("code").and_then(XmlValue::as_text),
            Some("NO_CONTENT")
        );

        let err = client.get("/invoices/get/1").await.unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.api_code(), Some("ERROR"));
        assert!(matches!(err.payload(), Some(Payload::Decoded(_))));
    }

    #[tokio::test]
    async fn test_body_is_forwarded() {
        let transport = Arc::new(MockTransport::new());
        let client = oauth_client(&transport);

        client.post("/invoices/find", b"<api/>".to_vec()).await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(transport.last_body(), "<api/>");
    }
}
