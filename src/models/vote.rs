use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use crate::errors::{Error, Result};

/// One signed vote per user per target. Exactly one of the three target
/// columns is set per row.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Vote {
    pub id: RecordId,
    pub user_id: RecordId,
    pub solution_id: Option<RecordId>,
    pub pro_id: Option<RecordId>,
    pub con_id: Option<RecordId>,
    pub value: i64, // +1 or -1
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateVote {
    pub user_id: RecordId,
    pub solution_id: Option<RecordId>,
    pub pro_id: Option<RecordId>,
    pub con_id: Option<RecordId>,
    pub value: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteTarget {
    Solution(RecordId),
    Pro(RecordId),
    Con(RecordId),
}

impl VoteTarget {
    pub fn from_parts(
        solution_id: Option<RecordId>,
        pro_id: Option<RecordId>,
        con_id: Option<RecordId>,
    ) -> Result<Self> {
        match (solution_id, pro_id, con_id) {
            (Some(id), None, None) => Ok(VoteTarget::Solution(id)),
            (None, Some(id), None) => Ok(VoteTarget::Pro(id)),
            (None, None, Some(id)) => Ok(VoteTarget::Con(id)),
            _ => Err(Error::InvalidVoteTarget),
        }
    }

    pub fn record(&self) -> &RecordId {
        match self {
            VoteTarget::Solution(id) | VoteTarget::Pro(id) | VoteTarget::Con(id) => id,
        }
    }
}

pub fn validate_vote_value(value: i64) -> Result<i64> {
    if value == 1 || value == -1 {
        Ok(value)
    } else {
        Err(Error::InvalidVoteValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid(table: &str, key: &str) -> RecordId {
        RecordId::from_table_key(table, key)
    }

    #[test]
    fn test_exactly_one_target_is_required() {
        assert!(VoteTarget::from_parts(None, None, None).is_err());
        assert!(
            VoteTarget::from_parts(Some(rid("solutions", "s1")), Some(rid("pros", "p1")), None)
                .is_err()
        );
        assert!(
            VoteTarget::from_parts(
                Some(rid("solutions", "s1")),
                Some(rid("pros", "p1")),
                Some(rid("cons", "c1"))
            )
            .is_err()
        );
    }

    #[test]
    fn test_each_single_target_is_accepted() {
        assert_eq!(
            VoteTarget::from_parts(Some(rid("solutions", "s1")), None, None).unwrap(),
            VoteTarget::Solution(rid("solutions", "s1"))
        );
        assert_eq!(
            VoteTarget::from_parts(None, Some(rid("pros", "p1")), None).unwrap(),
            VoteTarget::Pro(rid("pros", "p1"))
        );
        assert_eq!(
            VoteTarget::from_parts(None, None, Some(rid("cons", "c1"))).unwrap(),
            VoteTarget::Con(rid("cons", "c1"))
        );
    }

    #[test]
    fn test_only_signed_unit_votes_are_accepted() {
        assert_eq!(validate_vote_value(1).unwrap(), 1);
        assert_eq!(validate_vote_value(-1).unwrap(), -1);
        assert!(validate_vote_value(0).is_err());
        assert!(validate_vote_value(2).is_err());
        assert!(validate_vote_value(-5).is_err());
    }
}
