use crate::error::{Result, SubmitError};

use super::messages::{format_member_message_with, format_team_message, RegistrationLinks};
use super::types::{EligibilityDecision, EligibilitySnapshot, MemberEligibility};

/// Coerce a profile owner id into the principal id domain
pub fn parse_owner_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| SubmitError::InvalidOwnerId(raw.to_string()))
}

/// Find the member record for `owner_id`.
///
/// A user missing from the roster is reported as `MemberNotFound`, never as
/// an ineligible member.
pub fn select_member(snapshot: &EligibilitySnapshot, owner_id: i64) -> Result<&MemberEligibility> {
    snapshot
        .members_eligibility
        .iter()
        .find(|member| member.principal_id == owner_id)
        .ok_or_else(|| SubmitError::MemberNotFound {
            owner_id,
            team_id: snapshot.team_id.clone(),
        })
}

pub fn decide(
    snapshot: &EligibilitySnapshot,
    team_name: &str,
    owner_id: i64,
    advanced_compute: bool,
) -> Result<EligibilityDecision> {
    decide_with(snapshot, team_name, owner_id, advanced_compute, &RegistrationLinks::default())
}

/// Combine team and member eligibility into an allow/deny decision with
/// team messages first, then member messages.
pub fn decide_with(
    snapshot: &EligibilitySnapshot,
    team_name: &str,
    owner_id: i64,
    advanced_compute: bool,
    links: &RegistrationLinks,
) -> Result<EligibilityDecision> {
    let member = select_member(snapshot, owner_id)?;
    let team = &snapshot.team_eligibility;

    let mut messages = format_team_message(team, team_name);
    messages.extend(format_member_message_with(member, advanced_compute, links));

    Ok(EligibilityDecision {
        allowed: team.is_eligible && member.is_eligible,
        messages,
    })
}
