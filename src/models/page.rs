use serde::{Deserialize, Serialize};

use super::{Admin, Provisioner};

/// One page of `GET /admin/admins`. An empty `next_cursor` marks the last page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminsPage {
    #[serde(default)]
    pub admins: Vec<Admin>,
    #[serde(default)]
    pub next_cursor: String,
}

/// One page of `GET /admin/provisioners`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionersPage {
    #[serde(default)]
    pub provisioners: Vec<Provisioner>,
    #[serde(default)]
    pub next_cursor: String,
}
