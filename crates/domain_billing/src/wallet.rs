//! Account wallet and usage operations
//!
//! Deposits and withdrawals move value between an external [`Coin`] and the
//! account escrow. Usage reduction lowers the informational unit counter.

use tracing::info;

use core_kernel::{Balance, Coin, Principal};
use crate::account::Account;
use crate::bill::BillBook;
use crate::error::{BillingError, ValueRejected};
use crate::policy::WithdrawalPolicy;

/// Adds a coin to the account escrow, returning the new balance
///
/// On failure the coin is handed back inside [`ValueRejected`].
pub fn deposit(caller: &Principal, account: &mut Account, coin: Coin) -> Result<u64, ValueRejected> {
    if let Err(error) = account.authorize(caller) {
        return Err(ValueRejected::new(error, coin));
    }
    let escrow = match account.escrow.checked_add(Balance::new(coin.value())) {
        Ok(escrow) => escrow,
        Err(error) => return Err(ValueRejected::new(error.into(), coin)),
    };

    let amount = coin.into_balance().value();
    account.escrow = escrow;

    info!(account = %account.id, amount, balance = escrow.value(), "deposit");
    Ok(escrow.value())
}

/// Takes `amount` out of the account escrow as an external coin
///
/// Under [`WithdrawalPolicy::HoldWhileUnpaid`] the withdrawal is refused
/// while any bill of the account is unpaid.
///
/// # Errors
///
/// - `Unauthorized` if `caller` does not own the account
/// - `InsufficientBalance` if the escrow does not cover `amount`
/// - `WithdrawalHeld` if the hold policy applies
pub fn withdraw(
    caller: &Principal,
    account: &mut Account,
    book: &BillBook,
    amount: u64,
    policy: WithdrawalPolicy,
) -> Result<Coin, BillingError> {
    account.authorize(caller)?;
    let mut escrow = account.escrow;
    let taken = escrow.split(amount)?;

    if policy == WithdrawalPolicy::HoldWhileUnpaid {
        let unpaid = account.unpaid_bills(book).len();
        if unpaid > 0 {
            return Err(BillingError::WithdrawalHeld { unpaid });
        }
    }

    account.escrow = escrow;
    info!(account = %account.id, amount, balance = escrow.value(), "withdrawal");
    Ok(Coin::from_balance(taken))
}

/// Lowers the outstanding unit counter, returning the new count
///
/// # Errors
///
/// - `Unauthorized` if `caller` does not own the account
/// - `UnderflowUnits` if `units` exceeds the outstanding count
pub fn reduce_usage(caller: &Principal, account: &mut Account, units: u64) -> Result<u64, BillingError> {
    account.authorize(caller)?;
    let remaining = account
        .units_outstanding
        .checked_sub(units)
        .ok_or(BillingError::UnderflowUnits {
            outstanding: account.units_outstanding,
            requested: units,
        })?;

    account.units_outstanding = remaining;
    Ok(remaining)
}
