//! Response types for engine operations.

use crate::types::{ConditionId, PositionId, U256};

/// Response from preparing a condition.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareConditionResponse {
    /// The derived condition id
    pub condition_id: ConditionId,
}

/// Response from reporting payouts.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPayoutsResponse {
    /// The resolved condition id
    pub condition_id: ConditionId,
    /// Sum of the reported numerators
    pub payout_denominator: U256,
}

/// Response from a split.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPositionResponse {
    /// Position ids minted, one per partition element in input order
    pub position_ids: Vec<PositionId>,
}

/// Response from a merge.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePositionsResponse {
    /// Position ids burned, one per partition element in input order
    pub position_ids: Vec<PositionId>,
}

/// Response from a redemption.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemPositionsResponse {
    /// Total payout credited to the redeemer; zero when no balance was held
    pub payout: U256,
}
