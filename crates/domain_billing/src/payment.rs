//! Bill settlement
//!
//! Two ways to settle a bill, both ending with the bill paid and funds in
//! the treasury:
//! - **Wallet**: the bill amount moves from the account escrow
//! - **Direct**: the caller supplies a coin covering the bill
//!
//! Checks run in a fixed order (authorization, ownership, already paid,
//! funds) so the most specific failure is reported first.

use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{Balance, BillId, Coin, Principal, Timestamp};
use crate::account::Account;
use crate::bill::{Bill, BillBook};
use crate::error::{BillingError, ValueRejected};
use crate::treasury::Treasury;

/// How a bill was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Deducted from the account escrow
    Wallet,
    /// Paid with externally supplied value
    Direct,
}

/// Outcome of a successful settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub bill_id: BillId,
    pub method: PaymentMethod,
    /// Bill amount at the time of payment
    pub amount_due: u64,
    /// Value credited to the treasury
    pub amount_collected: u64,
    pub settled_at: Timestamp,
}

/// Resolves a bill the caller may settle on behalf of `account`
fn payable_bill<'a>(
    caller: &Principal,
    account: &Account,
    book: &'a mut BillBook,
    bill_id: BillId,
) -> Result<&'a mut Bill, BillingError> {
    account.authorize(caller)?;
    let bill = book.get_mut(&bill_id)?;
    bill.ensure_payable_by(account.id)?;
    Ok(bill)
}

/// Settles a bill from the account escrow
///
/// # Errors
///
/// - `Unauthorized` if `caller` does not own the account
/// - `BillNotFound` if the bill id is unknown
/// - `InvalidBill` if the bill belongs to another account or is already paid
/// - `InsufficientBalance` if the escrow does not cover the bill
/// - `ArithmeticOverflow` if the treasury escrow would overflow
pub fn pay_from_wallet(
    caller: &Principal,
    account: &mut Account,
    treasury: &mut Treasury,
    book: &mut BillBook,
    bill_id: BillId,
    now: Timestamp,
) -> Result<Settlement, BillingError> {
    let bill = payable_bill(caller, account, book, bill_id)?;

    let amount = bill.amount();
    let account_escrow = account.escrow.checked_sub(amount)?;
    let treasury_escrow = treasury.escrow.checked_add(Balance::new(amount))?;

    account.escrow = account_escrow;
    treasury.escrow = treasury_escrow;
    bill.mark_paid(now);

    info!(account = %account.id, bill = %bill_id, amount, "bill paid from wallet");
    Ok(Settlement {
        bill_id,
        method: PaymentMethod::Wallet,
        amount_due: amount,
        amount_collected: amount,
        settled_at: now,
    })
}

/// Settles a bill with a supplied coin
///
/// The whole coin goes to the treasury: value above the bill amount is
/// kept, not returned as change. On failure the coin is handed back inside
/// [`ValueRejected`].
///
/// # Errors
///
/// Same as [`pay_from_wallet`], with `InsufficientBalance` raised when the
/// coin is worth less than the bill.
pub fn pay_directly(
    caller: &Principal,
    account: &Account,
    treasury: &mut Treasury,
    book: &mut BillBook,
    bill_id: BillId,
    payment: Coin,
    now: Timestamp,
) -> Result<Settlement, ValueRejected> {
    let bill = match payable_bill(caller, account, book, bill_id) {
        Ok(bill) => bill,
        Err(error) => return Err(ValueRejected::new(error, payment)),
    };

    let amount = bill.amount();
    if payment.value() < amount {
        let error = BillingError::InsufficientBalance {
            available: payment.value(),
            requested: amount,
        };
        return Err(ValueRejected::new(error, payment));
    }
    let treasury_escrow = match treasury.escrow.checked_add(Balance::new(payment.value())) {
        Ok(escrow) => escrow,
        Err(error) => return Err(ValueRejected::new(error.into(), payment)),
    };

    let collected = payment.into_balance().value();
    treasury.escrow = treasury_escrow;
    bill.mark_paid(now);

    info!(account = %account.id, bill = %bill_id, amount, collected, "bill paid directly");
    Ok(Settlement {
        bill_id,
        method: PaymentMethod::Direct,
        amount_due: amount,
        amount_collected: collected,
        settled_at: now,
    })
}
