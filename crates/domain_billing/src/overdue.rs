//! Overdue accrual
//!
//! Adds late fees to an account's unpaid bills once their due date has
//! passed. The pass never fails: paid bills, bills not yet due, bills whose
//! amount is already at the numeric ceiling, and (under
//! [`AccrualMode::OncePerBill`]) bills already surcharged are skipped.

use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{BillId, Timestamp};
use crate::account::Account;
use crate::bill::BillBook;
use crate::policy::{AccrualMode, BillingPolicy};
use crate::treasury::Treasury;

/// A late fee added by an accrual pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateFee {
    pub bill_id: BillId,
    /// Fee actually added, which is less than the computed fee at the ceiling
    pub surcharge: u64,
    /// Bill amount after the fee
    pub amount_after: u64,
}

/// Runs one accrual pass over the account's bills, in issuance order
///
/// Under [`AccrualMode::Repeating`] every call surcharges every overdue bill
/// again, so fees compound with the number of calls.
pub fn accrue_late_fees(
    account: &Account,
    book: &mut BillBook,
    treasury: &Treasury,
    policy: &BillingPolicy,
    now: Timestamp,
) -> Vec<LateFee> {
    let mut applied = Vec::new();

    for bill_id in account.bills() {
        let Ok(bill) = book.get_mut(bill_id) else {
            continue;
        };
        if !bill.is_overdue(now) {
            continue;
        }
        if policy.accrual == AccrualMode::OncePerBill && bill.late_fee_applied_at().is_some() {
            debug!(bill = %bill_id, "late fee already applied");
            continue;
        }

        let surcharge = policy.surcharge.surcharge(bill.amount(), treasury.overdue_fee());
        let added = bill.add_surcharge(surcharge, now);
        if added == 0 {
            continue;
        }

        debug!(bill = %bill_id, surcharge = added, amount = bill.amount(), "late fee applied");
        applied.push(LateFee {
            bill_id: *bill_id,
            surcharge: added,
            amount_after: bill.amount(),
        });
    }

    applied
}
