//! Request types for engine operations.
//!
//! Every state-changing request carries an explicit identity field
//! (`oracle`, `stakeholder`, `redeemer`): the engine has no ambient caller
//! concept, so authorization-relevant identity is threaded through the call.

use bon::Builder;

use crate::types::{Address, CollectionId, ConditionId, QuestionId, U256};

/// Standard partition for binary conditions (YES/NO).
/// Index 1 (0b01) selects the first outcome slot, index 2 (0b10) the second.
pub const BINARY_PARTITION: [u64; 2] = [1, 2];

/// Request to prepare a new condition.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct PrepareConditionRequest {
    /// The reporter that will resolve the condition
    pub oracle: Address,
    /// Hash of the question being resolved
    pub question_id: QuestionId,
    /// Number of outcome slots; must be in (1, 256]
    pub outcome_slot_count: usize,
}

/// Request to report the payouts resolving a condition.
///
/// The condition id is derived from (oracle, question id, payout length), so
/// a report from anyone but the preparing oracle lands on an unprepared id.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct ReportPayoutsRequest {
    /// The authenticated identity submitting the report
    pub oracle: Address,
    /// Hash of the question being resolved
    pub question_id: QuestionId,
    /// One payout numerator per outcome slot; the sum becomes the denominator
    pub payouts: Vec<U256>,
}

/// Request to split collateral (or a coarser position) into finer positions.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct SplitPositionRequest {
    /// The account funding the split and receiving the minted positions
    pub stakeholder: Address,
    /// The collateral token backing the positions
    pub collateral_token: Address,
    /// Parent collection id; zero for bare collateral
    #[builder(default)]
    pub parent_collection_id: CollectionId,
    /// The condition to split on
    pub condition_id: ConditionId,
    /// Pairwise-disjoint index sets over the condition's outcome slots.
    /// For binary conditions: [1, 2]
    pub partition: Vec<U256>,
    /// Amount to split
    pub amount: U256,
}

/// Request to merge finer positions back into collateral or a coarser position.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct MergePositionsRequest {
    /// The account whose positions are burned and which receives the proceeds
    pub stakeholder: Address,
    /// The collateral token backing the positions
    pub collateral_token: Address,
    /// Parent collection id; zero for bare collateral
    #[builder(default)]
    pub parent_collection_id: CollectionId,
    /// The condition to merge on
    pub condition_id: ConditionId,
    /// Pairwise-disjoint index sets over the condition's outcome slots
    pub partition: Vec<U256>,
    /// Amount of each element position to merge
    pub amount: U256,
}

/// Request to redeem positions of a resolved condition.
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct RedeemPositionsRequest {
    /// The account whose positions are redeemed
    pub redeemer: Address,
    /// The collateral token backing the positions
    pub collateral_token: Address,
    /// Parent collection id; zero for bare collateral
    #[builder(default)]
    pub parent_collection_id: CollectionId,
    /// The resolved condition to redeem against
    pub condition_id: ConditionId,
    /// Index sets to redeem; may overlap or repeat, each is processed on its own
    pub index_sets: Vec<U256>,
}

// Convenience constructors for binary conditions
impl SplitPositionRequest {
    /// Creates a split request for a binary condition using the standard
    /// partition [1, 2].
    #[must_use]
    pub fn for_binary_condition(
        stakeholder: Address,
        collateral_token: Address,
        condition_id: ConditionId,
        amount: U256,
    ) -> Self {
        Self {
            stakeholder,
            collateral_token,
            parent_collection_id: CollectionId::ZERO,
            condition_id,
            partition: BINARY_PARTITION.iter().map(|&i| U256::from(i)).collect(),
            amount,
        }
    }
}

impl MergePositionsRequest {
    /// Creates a merge request for a binary condition using the standard
    /// partition [1, 2].
    #[must_use]
    pub fn for_binary_condition(
        stakeholder: Address,
        collateral_token: Address,
        condition_id: ConditionId,
        amount: U256,
    ) -> Self {
        Self {
            stakeholder,
            collateral_token,
            parent_collection_id: CollectionId::ZERO,
            condition_id,
            partition: BINARY_PARTITION.iter().map(|&i| U256::from(i)).collect(),
            amount,
        }
    }
}

impl RedeemPositionsRequest {
    /// Creates a redeem request for a binary condition using the standard
    /// index sets [1, 2].
    #[must_use]
    pub fn for_binary_condition(
        redeemer: Address,
        collateral_token: Address,
        condition_id: ConditionId,
    ) -> Self {
        Self {
            redeemer,
            collateral_token,
            parent_collection_id: CollectionId::ZERO,
            condition_id,
            index_sets: BINARY_PARTITION.iter().map(|&i| U256::from(i)).collect(),
        }
    }
}
