//! Client library for the wFirma.pl accounting API
//!
//! The API speaks XML over HTTPS. [`WFirmaClient`] builds authenticated
//! requests, encodes request bodies, decodes responses into an [`XmlMap`] and
//! reports every failure as a [`WFirmaError`].
//!
//! ```no_run
//! use wfirma_sdk::{Config, FindParameters, Order, WFirmaClient};
//!
//! # async fn run() -> Result<(), wfirma_sdk::WFirmaError> {
//! let config = Config::default()
//!     .with_company_id("12345")
//!     .with_api_key("access", "secret", "app");
//! let client = WFirmaClient::new(config)?;
//!
//! let _latest = client
//!     .invoices()
//!     .find(&FindParameters::new().limit(20).order(Order::Desc("date".into())))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod resources;
pub mod xml;

pub use crate::core::client::WFirmaClient;
pub use crate::core::config::{Config, Credentials};
pub use crate::core::error::{Payload, WFirmaError};
pub use crate::core::transport::{HttpRequest, HttpResponse, HttpTransport, Transport, TransportError};
pub use crate::xml::{FindParameters, Order, XmlMap, XmlValue};
pub use reqwest::Method;
