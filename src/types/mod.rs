//! Core identifier types and the engine's request/response types.
//!
//! The identifier types are re-exported from [`alloy::primitives`] so the
//! derived ids stay byte-compatible with EVM deployments of the same scheme,
//! and so users don't need to add `alloy` to their own `Cargo.toml`.

mod request;
mod response;

/// Account / token address type and the [`address!`] macro for compile-time
/// address literals.
pub use alloy::primitives::{Address, address};
/// 32-byte word type and the [`b256!`] macro for compile-time literals.
pub use alloy::primitives::{B256, b256};
/// 256-bit unsigned integer used for amounts, index sets, and position ids.
pub use alloy::primitives::U256;
pub use request::{
    BINARY_PARTITION, MergePositionsRequest, PrepareConditionRequest, RedeemPositionsRequest,
    ReportPayoutsRequest, SplitPositionRequest,
};
pub use response::{
    MergePositionsResponse, PrepareConditionResponse, RedeemPositionsResponse,
    ReportPayoutsResponse, SplitPositionResponse,
};

/// Identity of a condition: `keccak256(oracle, question_id, outcome_slot_count)`.
pub type ConditionId = B256;

/// Opaque hash identifying the question a condition resolves.
pub type QuestionId = B256;

/// Identity of a collection of (condition, outcome-subset) constraints,
/// combined additively across conditions.
pub type CollectionId = B256;

/// Identity of a position: `keccak256(collateral_token, collection_id)`.
/// This is the unit the position ledger tracks balances for.
pub type PositionId = U256;

/// The zero collection id: no parent constraints, i.e. bare collateral.
pub const ROOT_COLLECTION: CollectionId = B256::ZERO;
