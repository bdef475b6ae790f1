use crate::{
    error::Result,
    eligibility::{
        decision::decide_with,
        messages::RegistrationLinks,
        types::{EligibilityDecision, EligibilitySnapshot},
    },
    platform::types::TeamInfo,
};
use tracing::{debug, info};

/// Narrow capability for reading submission eligibility from the platform
#[allow(async_fn_in_trait)]
#[cfg_attr(test, mockall::automock)]
pub trait EligibilityClient {
    /// Fails with `SubmissionWindowClosed` when the platform refuses the request
    async fn fetch_eligibility(&self, evaluation_id: &str, team_id: &str) -> Result<EligibilitySnapshot>;
}

pub struct EligibilityChecker<C> {
    client: C,
    evaluation_id: String,
    links: RegistrationLinks,
}

impl<C: EligibilityClient> EligibilityChecker<C> {
    pub fn new(client: C, evaluation_id: impl Into<String>, links: RegistrationLinks) -> Self {
        Self {
            client,
            evaluation_id: evaluation_id.into(),
            links,
        }
    }

    /// Fetch a fresh snapshot for the team and decide whether `owner_id` may submit
    pub async fn check(&self, team: &TeamInfo, owner_id: i64) -> Result<(EligibilitySnapshot, EligibilityDecision)> {
        info!("Checking eligibility of {} for team {}", owner_id, team.team_name);

        let snapshot = self
            .client
            .fetch_eligibility(&self.evaluation_id, &team.team_id)
            .await?;
        debug!(
            "Eligibility snapshot for team {}: {} members, state hash {}",
            snapshot.team_id,
            snapshot.members_eligibility.len(),
            snapshot.eligibility_state_hash
        );

        let decision = decide_with(&snapshot, &team.team_name, owner_id, team.advanced_compute, &self.links)?;
        debug!("Eligibility decision for {}: allowed={}", owner_id, decision.allowed);

        Ok((snapshot, decision))
    }
}
