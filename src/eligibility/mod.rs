pub mod types;
pub mod messages;
pub mod decision;
pub mod checker;

pub use types::{EligibilityDecision, EligibilitySnapshot, MemberEligibility, TeamEligibility};
pub use messages::{format_member_message, format_member_message_with, format_team_message, RegistrationLinks};
pub use decision::{decide, decide_with, parse_owner_id, select_member};
pub use checker::{EligibilityChecker, EligibilityClient};
