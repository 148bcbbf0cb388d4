//! Events recorded by the engine for external observers and indexers.

use serde::Serialize;

use crate::types::{Address, CollectionId, ConditionId, QuestionId, U256};

/// One entry of the engine's in-order event log.
///
/// Events serialize to JSON with a `type` tag, ready for indexer export.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A condition was prepared.
    ConditionPreparation {
        condition_id: ConditionId,
        oracle: Address,
        question_id: QuestionId,
        outcome_slot_count: usize,
    },
    /// A condition's payouts were reported.
    ConditionResolution {
        condition_id: ConditionId,
        oracle: Address,
        question_id: QuestionId,
        outcome_slot_count: usize,
        payout_numerators: Vec<U256>,
    },
    /// A position (or collateral) was split into finer positions.
    PositionSplit {
        stakeholder: Address,
        collateral_token: Address,
        parent_collection_id: CollectionId,
        condition_id: ConditionId,
        partition: Vec<U256>,
        amount: U256,
    },
    /// Finer positions were merged back into a coarser one (or collateral).
    PositionsMerge {
        stakeholder: Address,
        collateral_token: Address,
        parent_collection_id: CollectionId,
        condition_id: ConditionId,
        partition: Vec<U256>,
        amount: U256,
    },
    /// Positions of a resolved condition were redeemed.
    ///
    /// Emitted even when the payout is zero.
    PayoutRedemption {
        redeemer: Address,
        collateral_token: Address,
        parent_collection_id: CollectionId,
        condition_id: ConditionId,
        index_sets: Vec<U256>,
        payout: U256,
    },
}
