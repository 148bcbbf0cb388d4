//! Error types for the conditional tokens engine.
//!
//! Every error aborts the whole operation that raised it: the engine performs
//! no retries and no internal recovery, and no partial mutation survives a
//! failure. The caller decides whether to retry with corrected inputs.

use std::error::Error as StdError;
use std::fmt;

use crate::types::{Address, ConditionId, PositionId, U256};

/// Errors raised by the registry, the partition validator, the engine, and
/// the in-memory ledger/collateral adapters.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Outcome slot count outside the supported range (1, 256].
    InvalidOutcomeCount {
        /// The rejected slot count (payout vector length for reports)
        outcome_slot_count: usize,
    },
    /// A condition with the same (oracle, question id, slot count) already exists.
    AlreadyPrepared {
        /// Id of the already-prepared condition
        condition_id: ConditionId,
    },
    /// No condition exists for the derived id.
    NotPrepared {
        /// The derived condition id that was not found
        condition_id: ConditionId,
    },
    /// Payouts were already reported for this condition.
    AlreadyResolved {
        /// Id of the already-resolved condition
        condition_id: ConditionId,
    },
    /// The condition has no reported payouts yet.
    NotResolved {
        /// Id of the unresolved condition
        condition_id: ConditionId,
    },
    /// A payout numerator was already non-zero when reporting.
    ///
    /// Unreachable while the denominator guard holds (denominator is zero iff
    /// every numerator is zero), but checked per slot regardless.
    NumeratorAlreadySet {
        /// Id of the condition being reported
        condition_id: ConditionId,
        /// Outcome slot whose numerator was already set
        slot: usize,
    },
    /// The reported payout vector sums to zero.
    ZeroPayout,
    /// A partition must have at least two elements.
    InvalidPartition {
        /// Number of elements supplied
        len: usize,
    },
    /// An index set was empty or not a proper subset of the full outcome set.
    InvalidIndexSet {
        /// The rejected index set
        index_set: U256,
    },
    /// A partition element overlaps a previous element of the same call.
    PartitionNotDisjoint {
        /// The overlapping index set
        index_set: U256,
    },
    /// A burn (or a pre-flight balance check) exceeded the held balance.
    InsufficientBalance {
        /// Position whose balance was insufficient
        position_id: PositionId,
        /// Amount the operation needed
        requested: U256,
        /// Amount actually held
        available: U256,
    },
    /// A mint would overflow the position's balance.
    BalanceOverflow {
        /// Position whose balance would overflow
        position_id: PositionId,
    },
    /// The collateral token refused a transfer.
    TransferFailed {
        /// The collateral token
        token: Address,
        /// Amount that could not be moved
        amount: U256,
    },
    /// A payout computation overflowed the 256-bit word.
    ArithmeticOverflow,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOutcomeCount { outcome_slot_count } => {
                write!(f, "invalid outcome slot count {outcome_slot_count}: must be in (1, 256]")
            }
            Self::AlreadyPrepared { condition_id } => {
                write!(f, "condition {condition_id} already prepared")
            }
            Self::NotPrepared { condition_id } => {
                write!(f, "condition {condition_id} not prepared")
            }
            Self::AlreadyResolved { condition_id } => {
                write!(f, "condition {condition_id} already resolved")
            }
            Self::NotResolved { condition_id } => {
                write!(f, "condition {condition_id} not resolved yet")
            }
            Self::NumeratorAlreadySet { condition_id, slot } => {
                write!(f, "payout numerator for slot {slot} of condition {condition_id} already set")
            }
            Self::ZeroPayout => write!(f, "payout vector is all zeroes"),
            Self::InvalidPartition { len } => {
                write!(f, "got empty or singleton partition ({len} elements)")
            }
            Self::InvalidIndexSet { index_set } => {
                write!(f, "got invalid index set {index_set:#x}")
            }
            Self::PartitionNotDisjoint { index_set } => {
                write!(f, "partition not disjoint at index set {index_set:#x}")
            }
            Self::InsufficientBalance {
                position_id,
                requested,
                available,
            } => write!(
                f,
                "insufficient balance of position {position_id:#x}: requested {requested}, held {available}"
            ),
            Self::BalanceOverflow { position_id } => {
                write!(f, "balance overflow on position {position_id:#x}")
            }
            Self::TransferFailed { token, amount } => {
                write!(f, "collateral token {token} refused transfer of {amount}")
            }
            Self::ArithmeticOverflow => write!(f, "arithmetic overflow in payout computation"),
        }
    }
}

impl StdError for Error {}
