//! Shared fixtures for the engine integration tests.

#![allow(dead_code, reason = "Not every test module uses every fixture")]

use conditional_tokens_engine::ConditionalTokens;
use conditional_tokens_engine::ledger::{MemoryCollateral, MemoryLedger};
use conditional_tokens_engine::types::{
    Address, B256, ConditionId, PrepareConditionRequest, QuestionId, U256, address,
};

pub const ENGINE_ADDRESS: Address = address!("0x00000000000000000000000000000000000000e1");
pub const ORACLE: Address = address!("0x0000000000000000000000000000000000000001");
pub const ALICE: Address = address!("0x00000000000000000000000000000000000000a1");
pub const BOB: Address = address!("0x00000000000000000000000000000000000000b0");
pub const USDC: Address = address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174");

pub const QUESTION_A: QuestionId = B256::repeat_byte(0xaa);
pub const QUESTION_B: QuestionId = B256::repeat_byte(0xbb);

pub type TestEngine = ConditionalTokens<MemoryLedger, MemoryCollateral>;

/// An engine over the in-memory adapters.
pub fn engine() -> TestEngine {
    ConditionalTokens::in_memory(ENGINE_ADDRESS)
}

/// Funds `account` with USDC and approves the engine to pull all of it.
pub fn fund(engine: &TestEngine, account: Address, amount: u64) {
    engine.collateral().fund(USDC, account, U256::from(amount));
    engine
        .collateral()
        .approve(USDC, account, engine.address(), U256::from(amount));
}

/// Prepares a condition for `question` with the standard test oracle.
pub fn prepare(
    engine: &TestEngine,
    question: QuestionId,
    outcome_slot_count: usize,
) -> ConditionId {
    engine
        .prepare_condition(
            &PrepareConditionRequest::builder()
                .oracle(ORACLE)
                .question_id(question)
                .outcome_slot_count(outcome_slot_count)
                .build(),
        )
        .expect("condition preparation failed")
        .condition_id
}

/// Converts plain bit patterns into index sets.
pub fn sets(bits: &[u64]) -> Vec<U256> {
    bits.iter().map(|&b| U256::from(b)).collect()
}

/// USDC balance helper.
pub fn usdc_balance(engine: &TestEngine, account: Address) -> U256 {
    engine.collateral().balance_of(USDC, account)
}
