//! Proportional Allocator
//!
//! Splits a total airdrop amount across holders in proportion to their
//! snapshot balances:
//!
//! ```text
//! amount_i = floor(balance_i * total_amount / sum(balances))
//! ```
//!
//! The multiplication runs in 512-bit intermediate precision so the
//! multiply-then-divide never loses precision to intermediate rounding.
//! Floor division leaves a remainder of at most one base unit per holder;
//! the achieved total is reported alongside the entries so the shortfall is
//! auditable. Callers that need exact conservation can top up one entry
//! (e.g. the largest holder) before committing; the allocator itself never
//! redistributes.

use crate::types::{Allocation, AllocationEntry, HolderBalance};
use alloy_primitives::{Address, U256, U512};
use std::collections::HashSet;
use thiserror::Error;

/// Errors from the allocation step.
///
/// All variants are deterministic functions of the input; there is no
/// partial-success mode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("holder set is empty")]
    EmptyHolderSet,

    #[error("total airdrop amount must be greater than zero")]
    ZeroTotalAmount,

    #[error("holder {0} has a zero balance")]
    ZeroBalance(Address),

    #[error("holder {0} appears more than once")]
    DuplicateHolder(Address),

    #[error("sum of holder balances overflows 256 bits")]
    BalanceSumOverflow,

    #[error("allocated amount for {0} overflows 256 bits")]
    AmountOverflow(Address),
}

/// Allocate `total_amount` across `holders` proportionally to balance.
///
/// Holders keep their input order and each entry's `index` is its input
/// position. The caller must supply a stable ordering (e.g. sorted by
/// address) to get reproducible indices across runs; the allocator never
/// reorders.
///
/// # Errors
/// Returns [`AllocationError`] if the holder set is empty, any balance is
/// zero, an address appears twice, `total_amount` is zero, or the balance
/// sum overflows.
pub fn allocate(
    holders: &[HolderBalance],
    total_amount: U256,
) -> Result<Allocation, AllocationError> {
    if holders.is_empty() {
        return Err(AllocationError::EmptyHolderSet);
    }
    if total_amount.is_zero() {
        return Err(AllocationError::ZeroTotalAmount);
    }

    let mut seen = HashSet::with_capacity(holders.len());
    let mut total_balance = U256::ZERO;
    for holder in holders {
        if holder.balance.is_zero() {
            return Err(AllocationError::ZeroBalance(holder.address));
        }
        if !seen.insert(holder.address) {
            return Err(AllocationError::DuplicateHolder(holder.address));
        }
        total_balance = total_balance
            .checked_add(holder.balance)
            .ok_or(AllocationError::BalanceSumOverflow)?;
    }

    let wide_total = U512::from(total_amount);
    let wide_sum = U512::from(total_balance);

    let mut entries = Vec::with_capacity(holders.len());
    let mut achieved_total = U256::ZERO;
    for (position, holder) in holders.iter().enumerate() {
        let quotient = U512::from(holder.balance) * wide_total / wide_sum;
        if quotient > U512::from(U256::MAX) {
            return Err(AllocationError::AmountOverflow(holder.address));
        }
        // quotient <= total_amount since balance <= total_balance, so the
        // high limbs are zero
        let be = quotient.to_be_bytes::<64>();
        let amount = U256::from_be_slice(&be[32..]);

        achieved_total += amount;
        entries.push(AllocationEntry {
            index: position as u64,
            address: holder.address,
            amount,
        });
    }

    Ok(Allocation {
        entries,
        requested_total: total_amount,
        achieved_total,
    })
}
