//! Bills and the bill book
//!
//! A [`Bill`] refers back to its account by id only. The [`BillBook`] owns
//! every bill; accounts keep the ordered list of their bill ids.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use core_kernel::{AccountId, BillId, Timestamp};
use crate::error::BillingError;

/// A charge for consumed units
///
/// The amount may only grow (through late fees) while the bill is unpaid.
/// Once paid, the bill is frozen and never becomes unpaid again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    id: BillId,
    /// Owning account (back-reference, resolved by lookup)
    account_id: AccountId,
    units: u64,
    amount: u64,
    issued_at: Timestamp,
    due_date: Timestamp,
    paid: bool,
    paid_at: Option<Timestamp>,
    /// Sum of all late fees added to `amount`
    surcharge_total: u64,
    late_fee_applied_at: Option<Timestamp>,
}

impl Bill {
    pub(crate) fn new(
        account_id: AccountId,
        units: u64,
        amount: u64,
        issued_at: Timestamp,
        due_date: Timestamp,
    ) -> Self {
        Self {
            id: BillId::new_v7(),
            account_id,
            units,
            amount,
            issued_at,
            due_date,
            paid: false,
            paid_at: None,
            surcharge_total: 0,
            late_fee_applied_at: None,
        }
    }

    pub fn id(&self) -> BillId {
        self.id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn units(&self) -> u64 {
        self.units
    }

    /// Amount currently owed, including late fees
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    pub fn due_date(&self) -> Timestamp {
        self.due_date
    }

    /// Payment status
    pub fn is_paid(&self) -> bool {
        self.paid
    }

    pub fn paid_at(&self) -> Option<Timestamp> {
        self.paid_at
    }

    pub fn surcharge_total(&self) -> u64 {
        self.surcharge_total
    }

    /// When the most recent late fee was added
    pub fn late_fee_applied_at(&self) -> Option<Timestamp> {
        self.late_fee_applied_at
    }

    pub fn belongs_to(&self, account_id: AccountId) -> bool {
        self.account_id == account_id
    }

    /// Unpaid and strictly past its due date
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        !self.paid && self.due_date < now
    }

    /// Checks that this bill can be settled by `account_id`
    pub(crate) fn ensure_payable_by(&self, account_id: AccountId) -> Result<(), BillingError> {
        if !self.belongs_to(account_id) {
            return Err(BillingError::InvalidBill(format!(
                "{} belongs to {}, not {}",
                self.id, self.account_id, account_id
            )));
        }
        if self.paid {
            return Err(BillingError::InvalidBill(format!("{} is already paid", self.id)));
        }
        Ok(())
    }

    pub(crate) fn mark_paid(&mut self, at: Timestamp) {
        debug_assert!(!self.paid, "bill paid twice");
        self.paid = true;
        self.paid_at = Some(at);
    }

    /// Adds a late fee, returning the part that fit below the numeric ceiling
    ///
    /// A bill already at the ceiling is left untouched and returns zero.
    pub(crate) fn add_surcharge(&mut self, surcharge: u64, at: Timestamp) -> u64 {
        debug_assert!(!self.paid, "surcharge on a paid bill");
        let applied = self.amount.saturating_add(surcharge) - self.amount;
        if applied == 0 {
            return 0;
        }
        self.amount += applied;
        self.surcharge_total = self.surcharge_total.saturating_add(applied);
        self.late_fee_applied_at = Some(at);
        applied
    }
}

/// Storage for every bill in the ledger, keyed by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillBook {
    bills: HashMap<BillId, Bill>,
}

impl BillBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &BillId) -> Option<&Bill> {
        self.bills.get(id)
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bill> {
        self.bills.values()
    }

    /// Looks up a bill, failing with `BillNotFound`
    pub(crate) fn get_mut(&mut self, id: &BillId) -> Result<&mut Bill, BillingError> {
        self.bills
            .get_mut(id)
            .ok_or_else(|| BillingError::BillNotFound(id.to_string()))
    }

    pub(crate) fn insert(&mut self, bill: Bill) {
        self.bills.insert(bill.id, bill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpaid_bill(account_id: AccountId) -> Bill {
        Bill::new(
            account_id,
            5,
            50,
            Timestamp::from_millis(0),
            Timestamp::from_millis(1_000),
        )
    }

    #[test]
    fn test_overdue_is_strictly_after_due_date() {
        let bill = unpaid_bill(AccountId::new());

        assert!(!bill.is_overdue(Timestamp::from_millis(1_000)));
        assert!(bill.is_overdue(Timestamp::from_millis(1_001)));
    }

    #[test]
    fn test_paid_bill_is_never_overdue() {
        let mut bill = unpaid_bill(AccountId::new());
        bill.mark_paid(Timestamp::from_millis(10));

        assert!(!bill.is_overdue(Timestamp::from_millis(5_000)));
        assert_eq!(bill.paid_at(), Some(Timestamp::from_millis(10)));
    }

    #[test]
    fn test_ensure_payable_by_other_account() {
        let bill = unpaid_bill(AccountId::new());
        let result = bill.ensure_payable_by(AccountId::new());

        assert!(matches!(result, Err(BillingError::InvalidBill(_))));
    }

    #[test]
    fn test_surcharge_saturates() {
        let mut bill = Bill::new(
            AccountId::new(),
            1,
            u64::MAX - 1,
            Timestamp::EPOCH,
            Timestamp::EPOCH,
        );
        let applied = bill.add_surcharge(10, Timestamp::from_millis(1));

        assert_eq!(applied, 1);
        assert_eq!(bill.amount(), u64::MAX);
        assert_eq!(bill.surcharge_total(), 1);
    }

    #[test]
    fn test_surcharge_at_ceiling_leaves_bill_untouched() {
        let mut bill = Bill::new(AccountId::new(), 1, u64::MAX, Timestamp::EPOCH, Timestamp::EPOCH);

        assert_eq!(bill.add_surcharge(10, Timestamp::from_millis(1)), 0);
        assert_eq!(bill.surcharge_total(), 0);
        assert_eq!(bill.late_fee_applied_at(), None);
    }
}
