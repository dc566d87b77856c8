//! Billing engine
//!
//! Turns a unit request into a priced bill attached to an account.

use tracing::info;

use core_kernel::{BillId, Principal, Timestamp};
use crate::account::Account;
use crate::bill::{Bill, BillBook};
use crate::error::BillingError;
use crate::treasury::Treasury;

/// Issues a bill for `units` at the treasury's current price
///
/// The bill is due `grace_period_ms` after `now`. All quantities are
/// computed before anything is written, so a failure leaves the account
/// and the bill book untouched.
///
/// # Errors
///
/// - `Unauthorized` if `caller` does not own the account
/// - `InvalidUnits` if `units` is zero
/// - `ArithmeticOverflow` if the usage counter, amount, or due date overflows
pub fn issue_bill(
    caller: &Principal,
    account: &mut Account,
    book: &mut BillBook,
    treasury: &Treasury,
    units: u64,
    now: Timestamp,
) -> Result<BillId, BillingError> {
    account.authorize(caller)?;

    if units == 0 {
        return Err(BillingError::InvalidUnits(
            "a bill must cover at least one unit".to_string(),
        ));
    }

    let units_outstanding = account.units_outstanding.checked_add(units).ok_or_else(|| {
        BillingError::ArithmeticOverflow(format!(
            "{} outstanding + {} units",
            account.units_outstanding, units
        ))
    })?;
    let amount = treasury.price(units)?;
    let due_date = now.checked_add_millis(treasury.grace_period_ms())?;

    let bill = Bill::new(account.id, units, amount, now, due_date);
    let bill_id = bill.id();

    account.units_outstanding = units_outstanding;
    account.bills.push(bill_id);
    book.insert(bill);

    info!(account = %account.id, bill = %bill_id, units, amount, %due_date, "bill issued");
    Ok(bill_id)
}
