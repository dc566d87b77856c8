//! Custom Test Assertions
//!
//! Provides assertion helpers for ledger state that give more meaningful
//! failure messages than comparing raw fields.

use core_kernel::{AccountId, BillId};
use domain_billing::{BillingError, Ledger};

/// Asserts the escrow balance of an account
///
/// # Panics
///
/// Panics if the account is unknown or the balance differs
pub fn assert_escrow(ledger: &Ledger, account_id: AccountId, expected: u64) {
    let account = ledger
        .account(&account_id)
        .unwrap_or_else(|| panic!("Unknown account {account_id}"));
    assert_eq!(
        account.escrow_balance(),
        expected,
        "Escrow mismatch for {account_id}: actual={}, expected={expected}",
        account.escrow_balance()
    );
}

/// Asserts the treasury escrow balance
pub fn assert_treasury(ledger: &Ledger, expected: u64) {
    assert_eq!(
        ledger.treasury().escrow_balance(),
        expected,
        "Treasury mismatch: actual={}, expected={expected}",
        ledger.treasury().escrow_balance()
    );
}

/// Asserts that a bill exists and is paid
pub fn assert_bill_paid(ledger: &Ledger, bill_id: BillId) {
    let bill = ledger
        .bill(&bill_id)
        .unwrap_or_else(|| panic!("Unknown bill {bill_id}"));
    assert!(bill.is_paid(), "Expected {bill_id} to be paid");
    assert!(bill.paid_at().is_some(), "Paid bill {bill_id} has no payment time");
}

/// Asserts that a bill exists, is unpaid, and carries `amount`
pub fn assert_bill_unpaid(ledger: &Ledger, bill_id: BillId, amount: u64) {
    let bill = ledger
        .bill(&bill_id)
        .unwrap_or_else(|| panic!("Unknown bill {bill_id}"));
    assert!(!bill.is_paid(), "Expected {bill_id} to be unpaid");
    assert_eq!(
        bill.amount(),
        amount,
        "Amount mismatch for {bill_id}: actual={}, expected={amount}",
        bill.amount()
    );
}

/// Asserts that the value held by the ledger equals the net external flow
///
/// Every unit of value in an escrow entered through a deposit or a direct
/// payment and has not yet left through a withdrawal.
pub fn assert_value_conserved(ledger: &Ledger, accounts: &[AccountId], inflow: u64, outflow: u64) {
    let held: u64 = accounts
        .iter()
        .filter_map(|id| ledger.account(id))
        .map(|account| account.escrow_balance())
        .sum::<u64>()
        + ledger.treasury().escrow_balance();
    assert_eq!(
        held,
        inflow - outflow,
        "Value not conserved: held={held}, inflow={inflow}, outflow={outflow}"
    );
}

/// Asserts that a result failed with the given error variant
pub fn assert_billing_error<T: std::fmt::Debug>(
    result: Result<T, BillingError>,
    matches: fn(&BillingError) -> bool,
    expected: &str,
) {
    match result {
        Err(error) if matches(&error) => {}
        other => panic!("Expected {expected}, got {other:?}"),
    }
}
