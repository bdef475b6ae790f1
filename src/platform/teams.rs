use std::time::Duration;
use tracing::{debug, info};

use crate::{
    config::ChallengeConfig,
    error::{Result, SubmitError},
    platform::{
        client::PlatformClient,
        types::{RowSet, TeamInfo},
    },
};

/// Resolves the challenge team a user submits for and where its predictions live
pub struct TeamDirectory<'a> {
    client: &'a PlatformClient,
    challenge: &'a ChallengeConfig,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl<'a> TeamDirectory<'a> {
    pub fn new(
        client: &'a PlatformClient,
        challenge: &'a ChallengeConfig,
        poll_attempts: u32,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            challenge,
            poll_attempts,
            poll_interval,
        }
    }

    pub async fn resolve(&self, owner_id: i64) -> Result<TeamInfo> {
        let team_ids = self.client.get_user_team_ids(owner_id).await?;
        debug!("User {} belongs to {} teams", owner_id, team_ids.len());

        let mut challenge_team = None;
        for team_id in &team_ids {
            let team = self.client.get_team(team_id).await?;
            if is_challenge_team(&team.name, &self.challenge.team_prefix) {
                challenge_team = Some(team);
                break;
            }
        }
        let team = challenge_team
            .ok_or_else(|| SubmitError::TeamNotFound(self.challenge.team_prefix.clone()))?;
        info!("Submitting on behalf of team {} ({})", team.name, team.id);

        let key = registry_key(&team.name, &self.challenge.team_prefix);
        let sql = registry_query(&self.challenge.team_registry_table, key);
        let rows = self
            .client
            .query_table(&self.challenge.team_registry_table, &sql, self.poll_attempts, self.poll_interval)
            .await?;
        let (folder_id, advanced_compute) =
            parse_registry_row(&rows).ok_or_else(|| SubmitError::TeamFolderNotFound(key.to_string()))?;

        Ok(TeamInfo {
            team_id: team.id,
            team_name: team.name,
            folder_id,
            advanced_compute,
        })
    }
}

/// Challenge teams carry the prefix; participant and admin groups share it and are skipped
pub fn is_challenge_team(name: &str, prefix: &str) -> bool {
    !name.contains("Participants") && !name.contains("Admin") && name.starts_with(prefix)
}

/// Registry rows are keyed by the team name without the challenge prefix
pub fn registry_key<'n>(team_name: &'n str, prefix: &str) -> &'n str {
    team_name.strip_prefix(prefix).unwrap_or(team_name)
}

pub fn registry_query(table_id: &str, key: &str) -> String {
    format!(
        "select folderId, advancedCompute from {} where teamName = '{}'",
        table_id,
        key.replace('\'', "''")
    )
}

/// `(folderId, advancedCompute)` of the first registry row, if any
pub fn parse_registry_row(rows: &RowSet) -> Option<(String, bool)> {
    let folder_id = rows.first_value("folderId")?.to_string();
    let advanced_compute = rows
        .first_value("advancedCompute")
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    Some((folder_id, advanced_compute))
}
