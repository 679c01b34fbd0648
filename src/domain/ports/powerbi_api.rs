//! Power BI REST port - semantic models and their sharing entries.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub name: String,
}

/// One permission entry on a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetUser {
    /// Object ID or UPN, depending on principal type
    pub identifier: String,
    #[serde(default)]
    pub principal_type: String,
    #[serde(default)]
    pub dataset_user_access_right: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl DatasetUser {
    /// `Read*Reshare*` rights let the holder grant access onward.
    pub fn can_reshare(&self) -> bool {
        self.dataset_user_access_right.contains("Reshare")
    }

    /// Build permission is reported by the API as `Explore`.
    pub fn can_build(&self) -> bool {
        self.dataset_user_access_right.contains("Explore")
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.identifier)
    }
}

/// Port for the BI service dataset endpoints
pub trait PowerBiApi {
    fn list_datasets(&self, workspace_id: &str) -> Result<Vec<Dataset>, ApiError>;

    fn list_dataset_users(
        &self,
        workspace_id: &str,
        dataset_id: &str,
    ) -> Result<Vec<DatasetUser>, ApiError>;
}
