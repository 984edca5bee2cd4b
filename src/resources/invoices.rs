//! `/invoices` endpoints

use crate::core::client::WFirmaClient;
use crate::core::constants::element;
use crate::core::error::WFirmaError;
use crate::resources::path_segment;
use crate::xml::{self, FindParameters, XmlMap};
use std::fmt::Display;

const MODULE: &str = "invoices";
const RECORD: &str = "invoice";

/// Invoice operations
pub struct Invoices<'a> {
    client: &'a WFirmaClient,
}

fn owned_params<I, K, V>(params: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    params
        .into_iter()
        .map(|(name, value)| (name.as_ref().to_string(), value.to_string()))
        .collect()
}

impl<'a> Invoices<'a> {
    pub(crate) fn new(client: &'a WFirmaClient) -> Self {
        Self { client }
    }

    /// GET `/invoices/get/{id}`
    pub async fn get(&self, invoice_id: impl Display) -> Result<XmlMap, WFirmaError> {
        self.client
            .get(&format!("/invoices/get/{}", path_segment(invoice_id)))
            .await
    }

    /// POST `/invoices/add` with flat fields wrapped in an `<invoice>` record
    ///
    /// Invoices with contents or a nested contractor need the full document;
    /// use [`Invoices::add_xml`] for those.
    pub async fn add<I, K, V>(&self, fields: I) -> Result<XmlMap, WFirmaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let body = xml::module_record(MODULE, RECORD, fields)?;
        self.client.post("/invoices/add", body).await
    }

    /// POST `/invoices/add` with a complete caller-built document
    pub async fn add_xml(&self, invoice_xml: impl Into<Vec<u8>>) -> Result<XmlMap, WFirmaError> {
        self.client.post("/invoices/add", invoice_xml.into()).await
    }

    /// POST `/invoices/download/{id}`
    ///
    /// `parameters` become `<parameter><name>…</name><value>…</value></parameter>`
    /// entries. With no parameters, `page=all` is sent.
    pub async fn download<I, K, V>(
        &self,
        invoice_id: impl Display,
        parameters: I,
    ) -> Result<XmlMap, WFirmaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let mut params = owned_params(parameters);
        if params.is_empty() {
            params.push((element::PAGE.to_string(), "all".to_string()));
        }

        let body = xml::module_parameters(MODULE, params)?;
        self.client
            .post(&format!("/invoices/download/{}", path_segment(invoice_id)), body)
            .await
    }

    /// POST `/invoices/send/{id}` (email, subject, page, …)
    pub async fn send<I, K, V>(
        &self,
        invoice_id: impl Display,
        parameters: I,
    ) -> Result<XmlMap, WFirmaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let body = xml::module_parameters(MODULE, parameters)?;
        self.client
            .post(&format!("/invoices/send/{}", path_segment(invoice_id)), body)
            .await
    }

    /// POST `/invoices/find` with paging, field selection and ordering
    pub async fn find(&self, params: &FindParameters) -> Result<XmlMap, WFirmaError> {
        let body = xml::find_parameters(MODULE, params)?;
        self.client.post("/invoices/find", body).await
    }

    /// POST `/invoices/find` with a caller-built `<parameters>` document
    pub async fn find_xml(&self, parameters_xml: impl Into<Vec<u8>>) -> Result<XmlMap, WFirmaError> {
        self.client
            .post("/invoices/find", parameters_xml.into())
            .await
    }
}
