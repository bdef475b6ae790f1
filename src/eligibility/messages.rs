use serde::{Deserialize, Serialize};

use super::types::{MemberEligibility, TeamEligibility};

const TEAM_PREFIX: &str = " > Team : ";
const USER_PREFIX: &str = " > User : ";

/// Where an unregistered member is sent to accept the challenge terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationLinks {
    pub advanced_compute: String,
    pub standard: String,
}

impl Default for RegistrationLinks {
    fn default() -> Self {
        Self {
            advanced_compute: "https://www.synapse.org/#!Synapse:syn16910051/wiki/584254".to_string(),
            standard: "https://www.synapse.org/#!Synapse:syn16810563/wiki/584196".to_string(),
        }
    }
}

impl RegistrationLinks {
    pub fn for_track(&self, advanced_compute: bool) -> &str {
        if advanced_compute {
            &self.advanced_compute
        } else {
            &self.standard
        }
    }
}

/// Explain the team-level eligibility. Quota line precedes the registration line.
pub fn format_team_message(team: &TeamEligibility, team_name: &str) -> Vec<String> {
    if team.is_eligible {
        return vec![format!("{}Your team, {}, is eligible to submit.", TEAM_PREFIX, team_name)];
    }

    let mut messages = vec![format!(
        "{}Your team, {}, is not eligible to submit at this time.",
        TEAM_PREFIX, team_name
    )];
    if team.is_quota_filled {
        messages.push(format!(
            "{}The team has reached its submission quota for this 24 hour period.",
            TEAM_PREFIX
        ));
    }
    if !team.is_registered {
        messages.push(format!("{}The team is not registered for the challenge.", TEAM_PREFIX));
    }
    messages
}

pub fn format_member_message(member: &MemberEligibility, advanced_compute: bool) -> Vec<String> {
    format_member_message_with(member, advanced_compute, &RegistrationLinks::default())
}

/// Explain the member-level eligibility. Registration line precedes the conflict line.
pub fn format_member_message_with(
    member: &MemberEligibility,
    advanced_compute: bool,
    links: &RegistrationLinks,
) -> Vec<String> {
    if member.is_eligible {
        return vec![format!("{}You're eligible to submit for your team.", USER_PREFIX)];
    }

    let mut messages = vec![format!("{}You're not currently eligible to submit.", USER_PREFIX)];
    if !member.is_registered {
        messages.push(format!(
            "{}You have not accepted the terms of the challenge. Please follow the link below to accept the terms.\n{}",
            USER_PREFIX,
            links.for_track(advanced_compute)
        ));
    }
    if member.has_conflicting_submission {
        messages.push(format!(
            "{}It appears you've submitted for a different challenge team.",
            USER_PREFIX
        ));
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(is_eligible: bool, is_registered: bool, is_quota_filled: bool) -> TeamEligibility {
        TeamEligibility { is_eligible, is_registered, is_quota_filled }
    }

    fn member(is_eligible: bool, is_registered: bool, has_conflicting_submission: bool) -> MemberEligibility {
        MemberEligibility {
            principal_id: 5555,
            is_eligible,
            is_registered,
            is_quota_filled: false,
            has_conflicting_submission,
        }
    }

    #[test]
    fn test_eligible_team() {
        let messages = format_team_message(&team(true, true, false), "TEST");
        assert_eq!(messages, vec![" > Team : Your team, TEST, is eligible to submit."]);
    }

    #[test]
    fn test_eligible_team_ignores_flags() {
        let messages = format_team_message(&team(true, false, true), "TEST");
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_ineligible_team_quota_and_registration() {
        let messages = format_team_message(&team(false, false, true), "TEST");
        assert_eq!(
            messages,
            vec![
                " > Team : Your team, TEST, is not eligible to submit at this time.",
                " > Team : The team has reached its submission quota for this 24 hour period.",
                " > Team : The team is not registered for the challenge.",
            ]
        );
    }

    #[test]
    fn test_ineligible_team_quota_only() {
        let messages = format_team_message(&team(false, true, true), "TEST");
        assert_eq!(messages.len(), 2);
        assert!(messages[1].contains("submission quota"));
    }

    #[test]
    fn test_ineligible_team_without_reason() {
        let messages = format_team_message(&team(false, true, false), "TEST");
        assert_eq!(messages, vec![" > Team : Your team, TEST, is not eligible to submit at this time."]);
    }

    #[test]
    fn test_eligible_member() {
        let messages = format_member_message(&member(true, true, false), true);
        assert_eq!(messages, vec![" > User : You're eligible to submit for your team."]);
    }

    #[test]
    fn test_unregistered_member_advanced_compute_link() {
        let messages = format_member_message(&member(false, false, false), true);
        assert_eq!(
            messages,
            vec![
                " > User : You're not currently eligible to submit.",
                " > User : You have not accepted the terms of the challenge. Please follow the link below to accept the terms.\nhttps://www.synapse.org/#!Synapse:syn16910051/wiki/584254",
            ]
        );
    }

    #[test]
    fn test_unregistered_member_standard_link() {
        let messages = format_member_message(&member(false, false, false), false);
        assert_eq!(
            messages[1],
            " > User : You have not accepted the terms of the challenge. Please follow the link below to accept the terms.\nhttps://www.synapse.org/#!Synapse:syn16810563/wiki/584196"
        );
    }

    #[test]
    fn test_conflicting_member() {
        let messages = format_member_message(&member(false, true, true), true);
        assert_eq!(
            messages,
            vec![
                " > User : You're not currently eligible to submit.",
                " > User : It appears you've submitted for a different challenge team.",
            ]
        );
    }

    #[test]
    fn test_member_registration_precedes_conflict() {
        let messages = format_member_message(&member(false, false, true), false);
        assert_eq!(messages.len(), 3);
        assert!(messages[1].contains("accepted the terms"));
        assert!(messages[2].contains("different challenge team"));
    }

    #[test]
    fn test_configured_links() {
        let links = RegistrationLinks {
            advanced_compute: "https://example.org/ac".to_string(),
            standard: "https://example.org/std".to_string(),
        };
        let messages = format_member_message_with(&member(false, false, false), false, &links);
        assert!(messages[1].ends_with("\nhttps://example.org/std"));
    }
}
