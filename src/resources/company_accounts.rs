//! `/company_accounts` endpoints

use crate::core::client::WFirmaClient;
use crate::core::error::WFirmaError;
use crate::resources::path_segment;
use crate::xml::XmlMap;
use std::fmt::Display;

/// Company bank account operations
pub struct CompanyAccounts<'a> {
    client: &'a WFirmaClient,
}

impl<'a> CompanyAccounts<'a> {
    pub(crate) fn new(client: &'a WFirmaClient) -> Self {
        Self { client }
    }

    /// GET `/company_accounts/find`
    pub async fn find(&self) -> Result<XmlMap, WFirmaError> {
        self.client.get("/company_accounts/find").await
    }

    /// GET `/company_accounts/get/{id}`
    pub async fn get(&self, account_id: impl Display) -> Result<XmlMap, WFirmaError> {
        self.client
            .get(&format!("/company_accounts/get/{}", path_segment(account_id)))
            .await
    }
}
