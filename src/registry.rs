//! Condition lifecycle: one-time preparation and one-time resolution.

use dashmap::{DashMap, Entry};

use crate::error::Error;
use crate::ids;
use crate::types::{Address, ConditionId, QuestionId, U256};
use crate::Result;

/// A prepared condition and, once resolved, its payout vector.
///
/// The payout vector's length never changes after preparation. The
/// denominator is zero iff the condition is unresolved; resolution sets the
/// numerators and the denominator in one atomic transition with no reversal
/// path.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// The reporter allowed to resolve this condition
    pub oracle: Address,
    /// Hash of the question this condition resolves
    pub question_id: QuestionId,
    /// Number of outcome slots, in (1, 256]
    pub outcome_slot_count: usize,
    /// Per-slot payout weights; all zero until resolved
    pub payout_numerators: Vec<U256>,
    /// Sum of the numerators; zero iff unresolved
    pub payout_denominator: U256,
}

impl Condition {
    /// Whether payouts have been reported.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !self.payout_denominator.is_zero()
    }
}

/// Outcome of a successful [`ConditionRegistry::report`], cloned out of the
/// store for event emission.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved condition
    pub condition_id: ConditionId,
    /// Number of outcome slots
    pub outcome_slot_count: usize,
    /// The stored payout numerators
    pub payout_numerators: Vec<U256>,
    /// Sum of the numerators
    pub payout_denominator: U256,
}

/// Keyed store of conditions.
///
/// `DashMap`'s entry API keeps prepare and report atomic per condition id;
/// reads never block each other.
#[derive(Debug, Default)]
pub struct ConditionRegistry {
    conditions: DashMap<ConditionId, Condition>,
}

impl ConditionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepares a condition, allocating its all-zero payout vector.
    ///
    /// Preparing the same (oracle, question id, slot count) twice fails with
    /// [`Error::AlreadyPrepared`] and leaves the stored condition untouched.
    pub fn prepare(
        &self,
        oracle: Address,
        question_id: QuestionId,
        outcome_slot_count: usize,
    ) -> Result<ConditionId> {
        if !(2..=256).contains(&outcome_slot_count) {
            return Err(Error::InvalidOutcomeCount { outcome_slot_count });
        }

        let condition_id = ids::condition_id(oracle, question_id, outcome_slot_count);
        match self.conditions.entry(condition_id) {
            Entry::Occupied(_) => Err(Error::AlreadyPrepared { condition_id }),
            Entry::Vacant(vacant) => {
                vacant.insert(Condition {
                    oracle,
                    question_id,
                    outcome_slot_count,
                    payout_numerators: vec![U256::ZERO; outcome_slot_count],
                    payout_denominator: U256::ZERO,
                });
                Ok(condition_id)
            }
        }
    }

    /// Reports the payout vector resolving a condition.
    ///
    /// The condition id is derived from (oracle, question id, payout length),
    /// so a report from the wrong identity or with the wrong vector length
    /// fails with [`Error::NotPrepared`]. The transition is all-or-nothing:
    /// the numerators and denominator are validated in full before anything
    /// is written.
    pub fn report(
        &self,
        oracle: Address,
        question_id: QuestionId,
        payouts: &[U256],
    ) -> Result<Resolution> {
        let outcome_slot_count = payouts.len();
        if !(2..=256).contains(&outcome_slot_count) {
            return Err(Error::InvalidOutcomeCount { outcome_slot_count });
        }

        let condition_id = ids::condition_id(oracle, question_id, outcome_slot_count);
        let mut condition = self
            .conditions
            .get_mut(&condition_id)
            .ok_or(Error::NotPrepared { condition_id })?;

        if condition.is_resolved() {
            return Err(Error::AlreadyResolved { condition_id });
        }
        // Unreachable while the denominator guard holds, but kept per slot.
        if let Some(slot) = condition
            .payout_numerators
            .iter()
            .position(|n| !n.is_zero())
        {
            return Err(Error::NumeratorAlreadySet { condition_id, slot });
        }

        let mut denominator = U256::ZERO;
        for &payout in payouts {
            denominator = denominator
                .checked_add(payout)
                .ok_or(Error::ArithmeticOverflow)?;
        }
        if denominator.is_zero() {
            return Err(Error::ZeroPayout);
        }

        condition.payout_numerators.copy_from_slice(payouts);
        condition.payout_denominator = denominator;

        Ok(Resolution {
            condition_id,
            outcome_slot_count,
            payout_numerators: condition.payout_numerators.clone(),
            payout_denominator: denominator,
        })
    }

    /// Returns the outcome slot count, or 0 if the condition is unprepared.
    #[must_use]
    pub fn outcome_slot_count(&self, condition_id: ConditionId) -> usize {
        self.conditions
            .get(&condition_id)
            .map_or(0, |c| c.outcome_slot_count)
    }

    /// Returns the payout numerators of a prepared condition.
    #[must_use]
    pub fn payout_numerators(&self, condition_id: ConditionId) -> Option<Vec<U256>> {
        self.conditions
            .get(&condition_id)
            .map(|c| c.payout_numerators.clone())
    }

    /// Returns the payout denominator, or zero if unprepared or unresolved.
    #[must_use]
    pub fn payout_denominator(&self, condition_id: ConditionId) -> U256 {
        self.conditions
            .get(&condition_id)
            .map_or(U256::ZERO, |c| c.payout_denominator)
    }

    /// Returns a snapshot of a prepared condition.
    #[must_use]
    pub fn condition(&self, condition_id: ConditionId) -> Option<Condition> {
        self.conditions.get(&condition_id).map(|c| c.clone())
    }
}
