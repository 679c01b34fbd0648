//! Power BI REST adapter

use crate::domain::ports::{Dataset, DatasetUser, PowerBiApi};
use crate::error::ApiError;
use crate::infrastructure::http::{join_url, HttpClient};

pub struct RestPowerBiApi<'c> {
    http: &'c HttpClient,
    base_url: String,
}

impl<'c> RestPowerBiApi<'c> {
    pub fn new(http: &'c HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

impl PowerBiApi for RestPowerBiApi<'_> {
    fn list_datasets(&self, workspace_id: &str) -> Result<Vec<Dataset>, ApiError> {
        self.http.get_all(&join_url(
            &self.base_url,
            &format!("groups/{}/datasets", workspace_id),
        ))
    }

    fn list_dataset_users(
        &self,
        workspace_id: &str,
        dataset_id: &str,
    ) -> Result<Vec<DatasetUser>, ApiError> {
        self.http.get_all(&join_url(
            &self.base_url,
            &format!("groups/{}/datasets/{}/users", workspace_id, dataset_id),
        ))
    }
}
