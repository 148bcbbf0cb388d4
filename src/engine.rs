//! The split/merge/redeem engine.
//!
//! [`ConditionalTokens`] owns the condition registry and the event log, and
//! orchestrates the position ledger and collateral adapter it is constructed
//! with. All state-mutating operations serialize on one internal mutex, so
//! the one-shot and value-conservation invariants hold on multi-threaded
//! hosts without any cooperation from the adapters.
//!
//! Every operation is all-or-nothing: inputs are validated and balance /
//! overflow requirements pre-flighted before the first ledger mutation, and
//! mutations are ordered so the only fallible step comes first.
//!
//! # Example
//!
//! ```
//! use alloy::primitives::B256;
//! use conditional_tokens_engine::ConditionalTokens;
//! use conditional_tokens_engine::types::{PrepareConditionRequest, address};
//!
//! # fn example() -> conditional_tokens_engine::Result<()> {
//! let engine = ConditionalTokens::in_memory(
//!     address!("0x00000000000000000000000000000000000000e1"),
//! );
//!
//! let prepared = engine.prepare_condition(
//!     &PrepareConditionRequest::builder()
//!         .oracle(address!("0x0000000000000000000000000000000000000001"))
//!         .question_id(B256::ZERO)
//!         .outcome_slot_count(2)
//!         .build(),
//! )?;
//! println!("condition id: {}", prepared.condition_id);
//! # Ok(())
//! # }
//! ```

use std::sync::{Mutex, PoisonError};

use crate::error::Error;
use crate::events::Event;
use crate::ids;
use crate::ledger::{CollateralAdapter, MemoryCollateral, MemoryLedger, PositionLedger};
use crate::partition::{full_index_set, validate_index_set, validate_partition};
use crate::registry::{Condition, ConditionRegistry};
use crate::types::{
    Address, CollectionId, ConditionId, MergePositionsRequest, MergePositionsResponse, PositionId,
    PrepareConditionRequest, PrepareConditionResponse, RedeemPositionsRequest,
    RedeemPositionsResponse, ReportPayoutsRequest, ReportPayoutsResponse, ROOT_COLLECTION,
    SplitPositionRequest, SplitPositionResponse, U256,
};
use crate::Result;

/// Position ledger engine for conditional outcome tokens.
#[derive(Debug)]
pub struct ConditionalTokens<L, C> {
    /// The engine's own collateral account, the counterparty of
    /// `transfer_from`/`transfer` calls
    address: Address,
    registry: ConditionRegistry,
    ledger: L,
    collateral: C,
    events: Mutex<Vec<Event>>,
    /// Linearizes all state-mutating operations
    op_lock: Mutex<()>,
}

impl ConditionalTokens<MemoryLedger, MemoryCollateral> {
    /// Creates an engine backed by the in-memory ledger and collateral bank.
    #[must_use]
    pub fn in_memory(address: Address) -> Self {
        Self::new(address, MemoryLedger::new(), MemoryCollateral::new())
    }
}

impl<L: PositionLedger, C: CollateralAdapter> ConditionalTokens<L, C> {
    /// Creates an engine over the given adapters.
    ///
    /// `address` is the account collateral is escrowed under: splits pull
    /// collateral from the stakeholder to this account, merges and
    /// redemptions pay out from it.
    pub fn new(address: Address, ledger: L, collateral: C) -> Self {
        Self {
            address,
            registry: ConditionRegistry::new(),
            ledger,
            collateral,
            events: Mutex::new(Vec::new()),
            op_lock: Mutex::new(()),
        }
    }

    /// Prepares a condition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOutcomeCount`] outside (1, 256] and
    /// [`Error::AlreadyPrepared`] on a repeated preparation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, request), fields(
            oracle = %request.oracle,
            question_id = %request.question_id,
            outcome_slot_count = request.outcome_slot_count
        ))
    )]
    pub fn prepare_condition(
        &self,
        request: &PrepareConditionRequest,
    ) -> Result<PrepareConditionResponse> {
        let _guard = self.lock_ops();

        let condition_id = self.registry.prepare(
            request.oracle,
            request.question_id,
            request.outcome_slot_count,
        )?;

        self.record(Event::ConditionPreparation {
            condition_id,
            oracle: request.oracle,
            question_id: request.question_id,
            outcome_slot_count: request.outcome_slot_count,
        });
        Ok(PrepareConditionResponse { condition_id })
    }

    /// Reports the payouts resolving a condition. One-shot: unresolved to
    /// resolved, with no reversal path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOutcomeCount`], [`Error::NotPrepared`],
    /// [`Error::AlreadyResolved`], [`Error::NumeratorAlreadySet`], or
    /// [`Error::ZeroPayout`] per the registry's guards.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, request), fields(
            oracle = %request.oracle,
            question_id = %request.question_id,
            payouts_len = request.payouts.len()
        ))
    )]
    pub fn report_payouts(&self, request: &ReportPayoutsRequest) -> Result<ReportPayoutsResponse> {
        let _guard = self.lock_ops();

        let resolution =
            self.registry
                .report(request.oracle, request.question_id, &request.payouts)?;

        self.record(Event::ConditionResolution {
            condition_id: resolution.condition_id,
            oracle: request.oracle,
            question_id: request.question_id,
            outcome_slot_count: resolution.outcome_slot_count,
            payout_numerators: resolution.payout_numerators,
        });
        Ok(ReportPayoutsResponse {
            condition_id: resolution.condition_id,
            payout_denominator: resolution.payout_denominator,
        })
    }

    /// Splits collateral or a coarser position into finer positions.
    ///
    /// Mints `amount` of every partition element's position to the
    /// stakeholder. The funding source depends on the uncovered remainder of
    /// the partition: a full partition burns the parent position, or pulls
    /// collateral in when the parent is the root; a partial partition burns
    /// the position keyed by the covered subset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotPrepared`], a partition validation error, or the
    /// funding failure ([`Error::InsufficientBalance`] /
    /// [`Error::TransferFailed`]). No mutation survives a failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, request), fields(
            stakeholder = %request.stakeholder,
            collateral_token = %request.collateral_token,
            condition_id = %request.condition_id,
            amount = %request.amount
        ))
    )]
    pub fn split_position(&self, request: &SplitPositionRequest) -> Result<SplitPositionResponse> {
        let _guard = self.lock_ops();

        let (full, free, position_ids) = self.validate_split_merge(
            request.condition_id,
            request.collateral_token,
            request.parent_collection_id,
            &request.partition,
        )?;

        // Pre-flight the mints so the burn below cannot strand a half-split.
        for &pid in &position_ids {
            self.ensure_mint_fits(request.stakeholder, pid, request.amount)?;
        }

        if free.is_zero() {
            if request.parent_collection_id == ROOT_COLLECTION {
                if !self.collateral.transfer_from(
                    request.collateral_token,
                    request.stakeholder,
                    self.address,
                    request.amount,
                ) {
                    return Err(Error::TransferFailed {
                        token: request.collateral_token,
                        amount: request.amount,
                    });
                }
            } else {
                let parent = ids::position_id(request.collateral_token, request.parent_collection_id);
                self.ledger.burn(request.stakeholder, parent, request.amount)?;
            }
        } else {
            let covered = ids::position_id(
                request.collateral_token,
                ids::collection_id(
                    request.parent_collection_id,
                    request.condition_id,
                    full ^ free,
                ),
            );
            self.ledger.burn(request.stakeholder, covered, request.amount)?;
        }

        for &pid in &position_ids {
            self.ledger.mint(request.stakeholder, pid, request.amount)?;
        }

        self.record(Event::PositionSplit {
            stakeholder: request.stakeholder,
            collateral_token: request.collateral_token,
            parent_collection_id: request.parent_collection_id,
            condition_id: request.condition_id,
            partition: request.partition.clone(),
            amount: request.amount,
        });
        Ok(SplitPositionResponse { position_ids })
    }

    /// Merges finer positions back into a coarser position or collateral.
    ///
    /// The structural mirror of [`Self::split_position`]: burns `amount` of
    /// every partition element's position, then credits the parent position,
    /// the covered-subset position, or collateral per the same funding
    /// logic with direction reversed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotPrepared`], a partition validation error,
    /// [`Error::InsufficientBalance`] when an element balance is short, or
    /// [`Error::TransferFailed`]. No mutation survives a failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, request), fields(
            stakeholder = %request.stakeholder,
            collateral_token = %request.collateral_token,
            condition_id = %request.condition_id,
            amount = %request.amount
        ))
    )]
    pub fn merge_positions(
        &self,
        request: &MergePositionsRequest,
    ) -> Result<MergePositionsResponse> {
        let _guard = self.lock_ops();

        let (full, free, position_ids) = self.validate_split_merge(
            request.condition_id,
            request.collateral_token,
            request.parent_collection_id,
            &request.partition,
        )?;

        // Pre-flight the burns, then credit before burning: the credit is
        // the only step left that can fail, and it runs first.
        for &pid in &position_ids {
            let held = self.ledger.balance_of(request.stakeholder, pid);
            if held < request.amount {
                return Err(Error::InsufficientBalance {
                    position_id: pid,
                    requested: request.amount,
                    available: held,
                });
            }
        }

        if free.is_zero() {
            if request.parent_collection_id == ROOT_COLLECTION {
                if !self.collateral.transfer(
                    request.collateral_token,
                    self.address,
                    request.stakeholder,
                    request.amount,
                ) {
                    return Err(Error::TransferFailed {
                        token: request.collateral_token,
                        amount: request.amount,
                    });
                }
            } else {
                let parent = ids::position_id(request.collateral_token, request.parent_collection_id);
                self.ledger.mint(request.stakeholder, parent, request.amount)?;
            }
        } else {
            let covered = ids::position_id(
                request.collateral_token,
                ids::collection_id(
                    request.parent_collection_id,
                    request.condition_id,
                    full ^ free,
                ),
            );
            self.ledger.mint(request.stakeholder, covered, request.amount)?;
        }

        for &pid in &position_ids {
            self.ledger.burn(request.stakeholder, pid, request.amount)?;
        }

        self.record(Event::PositionsMerge {
            stakeholder: request.stakeholder,
            collateral_token: request.collateral_token,
            parent_collection_id: request.parent_collection_id,
            condition_id: request.condition_id,
            partition: request.partition.clone(),
            amount: request.amount,
        });
        Ok(MergePositionsResponse { position_ids })
    }

    /// Redeems the redeemer's balances of the given index sets against a
    /// resolved condition.
    ///
    /// Each index set contributes `balance * numerator / denominator`
    /// (truncating) to the payout and has its whole balance burned. Sets the
    /// redeemer holds none of contribute zero and burn nothing; the event is
    /// emitted either way. Index sets may repeat or overlap; each is
    /// processed independently, and a set drained by an earlier entry of
    /// the same call contributes nothing further.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotPrepared`], [`Error::NotResolved`],
    /// [`Error::InvalidIndexSet`], [`Error::ArithmeticOverflow`], or
    /// [`Error::TransferFailed`]. No mutation survives a failure.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip(self, request), fields(
            redeemer = %request.redeemer,
            collateral_token = %request.collateral_token,
            condition_id = %request.condition_id,
            index_sets_len = request.index_sets.len()
        ))
    )]
    pub fn redeem_positions(
        &self,
        request: &RedeemPositionsRequest,
    ) -> Result<RedeemPositionsResponse> {
        let _guard = self.lock_ops();

        let condition = self
            .registry
            .condition(request.condition_id)
            .ok_or(Error::NotPrepared {
                condition_id: request.condition_id,
            })?;
        if !condition.is_resolved() {
            return Err(Error::NotResolved {
                condition_id: request.condition_id,
            });
        }

        let full = full_index_set(condition.outcome_slot_count);
        for &index_set in &request.index_sets {
            validate_index_set(index_set, full)?;
        }

        // Compute the whole redemption before mutating anything. Repeated
        // sets are drained locally so a duplicate cannot double-count.
        let mut burns: Vec<(PositionId, U256)> = Vec::new();
        let mut total = U256::ZERO;
        for &index_set in &request.index_sets {
            let pid = ids::position_id(
                request.collateral_token,
                ids::collection_id(request.parent_collection_id, request.condition_id, index_set),
            );
            if burns.iter().any(|&(burned, _)| burned == pid) {
                continue;
            }

            let stake = self.ledger.balance_of(request.redeemer, pid);
            if stake.is_zero() {
                continue;
            }

            let numerator = payout_numerator(&condition, index_set)?;
            let share = stake
                .checked_mul(numerator)
                .ok_or(Error::ArithmeticOverflow)?
                / condition.payout_denominator;
            total = total.checked_add(share).ok_or(Error::ArithmeticOverflow)?;
            burns.push((pid, stake));
        }

        if !total.is_zero() {
            if request.parent_collection_id == ROOT_COLLECTION {
                if !self.collateral.transfer(
                    request.collateral_token,
                    self.address,
                    request.redeemer,
                    total,
                ) {
                    return Err(Error::TransferFailed {
                        token: request.collateral_token,
                        amount: total,
                    });
                }
            } else {
                let parent = ids::position_id(request.collateral_token, request.parent_collection_id);
                self.ledger.mint(request.redeemer, parent, total)?;
            }
        }

        for (pid, stake) in burns {
            self.ledger.burn(request.redeemer, pid, stake)?;
        }

        self.record(Event::PayoutRedemption {
            redeemer: request.redeemer,
            collateral_token: request.collateral_token,
            parent_collection_id: request.parent_collection_id,
            condition_id: request.condition_id,
            index_sets: request.index_sets.clone(),
            payout: total,
        });
        Ok(RedeemPositionsResponse { payout: total })
    }

    /// Returns the outcome slot count, or 0 if the condition is unprepared.
    #[must_use]
    pub fn get_outcome_slot_count(&self, condition_id: ConditionId) -> usize {
        self.registry.outcome_slot_count(condition_id)
    }

    /// Returns the payout numerators of a prepared condition.
    #[must_use]
    pub fn payout_numerators(&self, condition_id: ConditionId) -> Option<Vec<U256>> {
        self.registry.payout_numerators(condition_id)
    }

    /// Returns the payout denominator, or zero if unprepared or unresolved.
    #[must_use]
    pub fn payout_denominator(&self, condition_id: ConditionId) -> U256 {
        self.registry.payout_denominator(condition_id)
    }

    /// Snapshot of the event log, in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drains the event log, handing the events to the caller.
    pub fn drain_events(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// The engine's own collateral account.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns a reference to the underlying position ledger.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Returns a reference to the underlying collateral adapter.
    #[must_use]
    pub const fn collateral(&self) -> &C {
        &self.collateral
    }

    /// Shared validation for split and merge: condition lookup, partition
    /// validation, and derivation of the element position ids.
    fn validate_split_merge(
        &self,
        condition_id: ConditionId,
        collateral_token: Address,
        parent_collection_id: CollectionId,
        partition: &[U256],
    ) -> Result<(U256, U256, Vec<PositionId>)> {
        let outcome_slot_count = self.registry.outcome_slot_count(condition_id);
        if outcome_slot_count == 0 {
            return Err(Error::NotPrepared { condition_id });
        }

        let full = full_index_set(outcome_slot_count);
        let free = validate_partition(partition, full)?;
        let position_ids = partition
            .iter()
            .map(|&index_set| {
                ids::position_id(
                    collateral_token,
                    ids::collection_id(parent_collection_id, condition_id, index_set),
                )
            })
            .collect();
        Ok((full, free, position_ids))
    }

    fn ensure_mint_fits(&self, account: Address, position_id: PositionId, amount: U256) -> Result<()> {
        self.ledger
            .balance_of(account, position_id)
            .checked_add(amount)
            .map(|_| ())
            .ok_or(Error::BalanceOverflow { position_id })
    }

    fn lock_ops(&self) -> std::sync::MutexGuard<'_, ()> {
        self.op_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: Event) {
        #[cfg(feature = "tracing")]
        tracing::debug!(?event, "engine event");
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Sums a resolved condition's numerators over the bits of `index_set`.
fn payout_numerator(condition: &Condition, index_set: U256) -> Result<U256> {
    let mut numerator = U256::ZERO;
    for (slot, &weight) in condition.payout_numerators.iter().enumerate() {
        if index_set.bit(slot) {
            numerator = numerator
                .checked_add(weight)
                .ok_or(Error::ArithmeticOverflow)?;
        }
    }
    Ok(numerator)
}
