//! `/contractors` endpoints

use crate::core::client::WFirmaClient;
use crate::core::error::WFirmaError;
use crate::resources::path_segment;
use crate::xml::{self, FindParameters, XmlMap};
use std::fmt::Display;

const MODULE: &str = "contractors";
const RECORD: &str = "contractor";

/// Contractor (customer/supplier) operations
pub struct Contractors<'a> {
    client: &'a WFirmaClient,
}

impl<'a> Contractors<'a> {
    pub(crate) fn new(client: &'a WFirmaClient) -> Self {
        Self { client }
    }

    /// POST `/contractors/add` with the fields wrapped in a `<contractor>` record
    pub async fn add<I, K, V>(&self, fields: I) -> Result<XmlMap, WFirmaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let body = xml::module_record(MODULE, RECORD, fields)?;
        self.client.post("/contractors/add", body).await
    }

    /// GET `/contractors/get/{id}`
    pub async fn get(&self, contractor_id: impl Display) -> Result<XmlMap, WFirmaError> {
        self.client
            .get(&format!("/contractors/get/{}", path_segment(contractor_id)))
            .await
    }

    /// POST `/contractors/edit/{id}` with the changed fields
    pub async fn edit<I, K, V>(
        &self,
        contractor_id: impl Display,
        fields: I,
    ) -> Result<XmlMap, WFirmaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let body = xml::module_record(MODULE, RECORD, fields)?;
        self.client
            .post(&format!("/contractors/edit/{}", path_segment(contractor_id)), body)
            .await
    }

    /// POST `/contractors/find` with paging and field selection
    pub async fn find(&self, params: &FindParameters) -> Result<XmlMap, WFirmaError> {
        let body = xml::find_parameters(MODULE, params)?;
        self.client.post("/contractors/find", body).await
    }

    /// POST `/contractors/find` with a caller-built `<parameters>` document
    pub async fn find_xml(&self, parameters_xml: impl Into<Vec<u8>>) -> Result<XmlMap, WFirmaError> {
        self.client
            .post("/contractors/find", parameters_xml.into())
            .await
    }
}
