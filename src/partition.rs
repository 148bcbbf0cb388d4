//! Validation of outcome index sets and partitions.
//!
//! An index set is a bit-vector over a condition's outcome slots, carried in
//! a [`U256`] with bit *j* set iff slot *j* is included. Outcome slot counts
//! are capped at 256 so that every subset fits one word; the cap is an input
//! validation boundary enforced by the registry.

use crate::error::Error;
use crate::types::U256;
use crate::Result;

/// Returns the index set selecting all of a condition's outcome slots.
#[must_use]
pub fn full_index_set(outcome_slot_count: usize) -> U256 {
    if outcome_slot_count >= 256 {
        U256::MAX
    } else {
        (U256::from(1_u8) << outcome_slot_count) - U256::from(1_u8)
    }
}

/// Checks that `index_set` is non-empty and a proper subset of `full`.
///
/// The numeric comparison suffices for the subset check: `full` is all ones
/// over the condition's slots, so any value below it has no stray high bits.
pub fn validate_index_set(index_set: U256, full: U256) -> Result<()> {
    if index_set.is_zero() || index_set >= full {
        return Err(Error::InvalidIndexSet { index_set });
    }
    Ok(())
}

/// Validates a partition against a condition's full index set and returns
/// the free mask: the bits no partition element covers.
///
/// Each element must be a non-empty proper subset of `full` and disjoint
/// from every earlier element. A zero free mask means the partition covers
/// the full outcome set; a non-zero free mask means the elements refine the
/// position keyed by the covered complement.
pub fn validate_partition(partition: &[U256], full: U256) -> Result<U256> {
    if partition.len() < 2 {
        return Err(Error::InvalidPartition {
            len: partition.len(),
        });
    }

    let mut free = full;
    for &index_set in partition {
        validate_index_set(index_set, full)?;
        if index_set & free != index_set {
            return Err(Error::PartitionNotDisjoint { index_set });
        }
        free ^= index_set;
    }
    Ok(free)
}
