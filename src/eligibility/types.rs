use serde::{Deserialize, Serialize};

use crate::utils::string_or_number;

/// Submission eligibility of a team and each of its members for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilitySnapshot {
    #[serde(deserialize_with = "string_or_number")]
    pub team_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub evaluation_id: String,
    pub team_eligibility: TeamEligibility,
    pub members_eligibility: Vec<MemberEligibility>,
    /// Opaque version token, echoed back when registering a team submission
    #[serde(deserialize_with = "string_or_number")]
    pub eligibility_state_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamEligibility {
    pub is_eligible: bool,
    pub is_registered: bool,
    pub is_quota_filled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberEligibility {
    pub principal_id: i64,
    pub is_eligible: bool,
    pub is_registered: bool,
    pub is_quota_filled: bool,
    pub has_conflicting_submission: bool,
}

/// Outcome of combining team and member eligibility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityDecision {
    pub allowed: bool,
    pub messages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_platform_json() {
        let raw = r#"{
            "teamId": "123456",
            "evaluationId": "9614112",
            "teamEligibility": {"isEligible": true, "isRegistered": true, "isQuotaFilled": false},
            "membersEligibility": [
                {"principalId": 4444, "isEligible": true, "isRegistered": true,
                 "isQuotaFilled": false, "hasConflictingSubmission": false}
            ],
            "eligibilityStateHash": 32345
        }"#;

        let snapshot: EligibilitySnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.team_id, "123456");
        assert_eq!(snapshot.eligibility_state_hash, "32345");
        assert_eq!(snapshot.members_eligibility[0].principal_id, 4444);
        assert!(snapshot.team_eligibility.is_eligible);
    }

    #[test]
    fn test_state_hash_accepts_string() {
        let raw = r#"{
            "teamId": "1", "evaluationId": "2",
            "teamEligibility": {"isEligible": false, "isRegistered": false, "isQuotaFilled": false},
            "membersEligibility": [],
            "eligibilityStateHash": "-99123"
        }"#;

        let snapshot: EligibilitySnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.eligibility_state_hash, "-99123");
    }
}
