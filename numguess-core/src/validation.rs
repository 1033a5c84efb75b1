//! Client-side mirror of the contract's solvency rule.
//!
//! The contract must always be able to pay `maxPrize` out of half of its
//! balance. Both owner operations that can break that rule check it here
//! before anything is submitted.

use crate::error::{NumguessError, Result};
use alloy::primitives::U256;

/// `max_prize <= balance / 2`, with integer division on wei.
pub fn ensure_prize_covered(max_prize: U256, balance: U256) -> Result<()> {
    if max_prize > balance / U256::from(2u64) {
        return Err(NumguessError::PrizeExceedsHalfBalance {
            max_prize: max_prize.to_string(),
            balance: balance.to_string(),
        });
    }
    Ok(())
}

/// Check a new max prize against the current balance.
pub fn check_new_max_prize(new_max_prize: U256, balance: U256) -> Result<()> {
    ensure_prize_covered(new_max_prize, balance)
}

/// Check that the current max prize stays covered by what remains after a withdrawal.
pub fn check_withdrawal(amount: U256, max_prize: U256, balance: U256) -> Result<()> {
    let remaining =
        balance
            .checked_sub(amount)
            .ok_or_else(|| NumguessError::WithdrawExceedsBalance {
                amount: amount.to_string(),
                balance: balance.to_string(),
            })?;
    ensure_prize_covered(max_prize, remaining)
}
