//! Deterministic derivation of condition, collection, and position ids.
//!
//! All three functions are pure and total. The encodings match the packed
//! EVM layout (20-byte addresses, 32-byte big-endian words), so ids derived
//! here equal the ids of on-chain deployments of the same scheme.

use alloy::primitives::keccak256;

use crate::types::{Address, CollectionId, ConditionId, PositionId, QuestionId, U256};

/// Derives a condition id from the reporting oracle, the question hash, and
/// the outcome slot count.
#[must_use]
pub fn condition_id(
    oracle: Address,
    question_id: QuestionId,
    outcome_slot_count: usize,
) -> ConditionId {
    let mut buf = [0_u8; 84];
    buf[..20].copy_from_slice(oracle.as_slice());
    buf[20..52].copy_from_slice(question_id.as_slice());
    buf[52..].copy_from_slice(&U256::from(outcome_slot_count).to_be_bytes::<32>());
    keccak256(buf)
}

/// Derives a collection id by combining a parent collection with one
/// (condition, outcome-subset) constraint.
///
/// The combination is wraparound addition mod 2^256, which makes it
/// commutative and associative: a collection built by splitting on condition
/// A then B has the same id as one built by splitting on B then A. The zero
/// parent denotes bare collateral.
#[must_use]
pub fn collection_id(
    parent_collection_id: CollectionId,
    condition_id: ConditionId,
    index_set: U256,
) -> CollectionId {
    let mut buf = [0_u8; 64];
    buf[..32].copy_from_slice(condition_id.as_slice());
    buf[32..].copy_from_slice(&index_set.to_be_bytes::<32>());

    let parent = U256::from_be_bytes(parent_collection_id.0);
    let hashed = U256::from_be_bytes(keccak256(buf).0);
    CollectionId::new(parent.wrapping_add(hashed).to_be_bytes::<32>())
}

/// Derives the position id the ledger tracks balances for.
#[must_use]
pub fn position_id(collateral_token: Address, collection_id: CollectionId) -> PositionId {
    let mut buf = [0_u8; 52];
    buf[..20].copy_from_slice(collateral_token.as_slice());
    buf[20..].copy_from_slice(collection_id.as_slice());
    U256::from_be_bytes(keccak256(buf).0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{B256, ROOT_COLLECTION, address};

    const ORACLE: Address = address!("0x0000000000000000000000000000000000000001");
    const USDC: Address = address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174");

    #[test]
    fn condition_id_is_deterministic() {
        let a = condition_id(ORACLE, B256::repeat_byte(0x11), 2);
        let b = condition_id(ORACLE, B256::repeat_byte(0x11), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn condition_id_depends_on_every_input() {
        let base = condition_id(ORACLE, B256::repeat_byte(0x11), 2);
        assert_ne!(base, condition_id(USDC, B256::repeat_byte(0x11), 2));
        assert_ne!(base, condition_id(ORACLE, B256::repeat_byte(0x22), 2));
        assert_ne!(base, condition_id(ORACLE, B256::repeat_byte(0x11), 3));
    }

    #[test]
    fn collection_id_zero_parent_is_plain_hash_offset() {
        let cond = condition_id(ORACLE, B256::repeat_byte(0x11), 2);
        let child = collection_id(ROOT_COLLECTION, cond, U256::from(1));
        assert_ne!(child, ROOT_COLLECTION);
        // Same constraint, different index set: different collection
        assert_ne!(child, collection_id(ROOT_COLLECTION, cond, U256::from(2)));
    }

    #[test]
    fn collection_id_combination_is_commutative() {
        let cond_a = condition_id(ORACLE, B256::repeat_byte(0xaa), 2);
        let cond_b = condition_id(ORACLE, B256::repeat_byte(0xbb), 3);

        let a_then_b = collection_id(
            collection_id(ROOT_COLLECTION, cond_a, U256::from(1)),
            cond_b,
            U256::from(5),
        );
        let b_then_a = collection_id(
            collection_id(ROOT_COLLECTION, cond_b, U256::from(5)),
            cond_a,
            U256::from(1),
        );
        assert_eq!(a_then_b, b_then_a);
    }

    #[test]
    fn position_id_separates_collateral_tokens() {
        let cond = condition_id(ORACLE, B256::repeat_byte(0x11), 2);
        let coll = collection_id(ROOT_COLLECTION, cond, U256::from(1));
        assert_ne!(position_id(USDC, coll), position_id(ORACLE, coll));
        assert_eq!(position_id(USDC, coll), position_id(USDC, coll));
    }
}
