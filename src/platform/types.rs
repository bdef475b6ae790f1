use serde::{Deserialize, Serialize};

use crate::utils::{string_or_number, string_or_number_seq};

/// The challenge team a user submits for, resolved once per attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub team_id: String,
    pub team_name: String,
    pub folder_id: String,
    /// Selects which registration link an unregistered member is shown
    pub advanced_compute: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "string_or_number")]
    pub owner_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTeamIds {
    #[serde(deserialize_with = "string_or_number_seq")]
    pub team_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Team {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

/// Stored prediction file as returned by the upload gateway
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntity {
    pub id: String,
    pub etag: String,
    pub version_number: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub principal_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub evaluation_id: String,
    pub entity_id: String,
    pub version_number: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub team_id: String,
    pub submitter_alias: String,
    pub contributors: Vec<Contributor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub created_on: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AsyncJobToken {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryResultBundle {
    pub query_result: QueryResult,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryResult {
    pub query_results: RowSet,
}

/// Rows of a table query; every cell comes back as a string or null
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RowSet {
    #[serde(default)]
    pub headers: Vec<SelectColumn>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectColumn {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub values: Vec<Option<String>>,
}

impl RowSet {
    /// Value of `column` in the first row
    pub fn first_value(&self, column: &str) -> Option<&str> {
        let index = self.headers.iter().position(|h| h.name == column)?;
        self.rows.first()?.values.get(index)?.as_deref()
    }
}
