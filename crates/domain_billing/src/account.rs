//! Customer accounts
//!
//! An account ties a principal to a meter, an escrow wallet, a usage
//! counter, and the ordered list of bills issued against it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{AccountId, Balance, BillId, Principal, Timestamp};
use crate::bill::BillBook;
use crate::error::BillingError;

/// A customer account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Principal that exclusively owns this account
    identity: Principal,
    /// Physical meter identifier
    meter_code: String,
    /// Pre-deposited funds
    pub(crate) escrow: Balance,
    /// Units currently attributed to the account
    pub(crate) units_outstanding: u64,
    /// Bill ids in issuance order
    pub(crate) bills: Vec<BillId>,
    /// Registration time
    pub created_at: Timestamp,
}

impl Account {
    /// Creates an empty account
    ///
    /// # Arguments
    ///
    /// * `identity` - Owning principal
    /// * `meter_code` - Meter identifier
    /// * `created_at` - Registration time
    pub fn new(identity: Principal, meter_code: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id: AccountId::new_v7(),
            identity,
            meter_code: meter_code.into(),
            escrow: Balance::zero(),
            units_outstanding: 0,
            bills: Vec::new(),
            created_at,
        }
    }

    pub fn identity(&self) -> Principal {
        self.identity
    }

    pub fn meter_code(&self) -> &str {
        &self.meter_code
    }

    pub fn escrow_balance(&self) -> u64 {
        self.escrow.value()
    }

    /// Units currently attributed to the account
    pub fn remaining_units(&self) -> u64 {
        self.units_outstanding
    }

    /// Bill ids in issuance order
    pub fn bills(&self) -> &[BillId] {
        &self.bills
    }

    /// Ids of unpaid bills, in issuance order
    pub fn unpaid_bills(&self, book: &BillBook) -> Vec<BillId> {
        self.bills
            .iter()
            .filter(|id| book.get(id).is_some_and(|bill| !bill.is_paid()))
            .copied()
            .collect()
    }

    /// Verifies that `caller` owns this account
    pub fn authorize(&self, caller: &Principal) -> Result<(), BillingError> {
        if *caller != self.identity {
            warn!(%caller, account = %self.id, "rejected caller");
            return Err(BillingError::Unauthorized(format!(
                "{} does not own {}",
                caller, self.id
            )));
        }
        Ok(())
    }

    /// Builds a read-only summary of the account
    pub fn summary(&self, book: &BillBook) -> AccountSummary {
        let mut unpaid_count = 0;
        let mut total_owed: u64 = 0;

        for bill in self.bills.iter().filter_map(|id| book.get(id)) {
            if !bill.is_paid() {
                unpaid_count += 1;
                total_owed = total_owed.saturating_add(bill.amount());
            }
        }

        AccountSummary {
            account_id: self.id,
            meter_code: self.meter_code.clone(),
            escrow_balance: self.escrow.value(),
            units_outstanding: self.units_outstanding,
            bill_count: self.bills.len(),
            unpaid_count,
            total_owed,
        }
    }
}

/// Point-in-time view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_id: AccountId,
    pub meter_code: String,
    pub escrow_balance: u64,
    pub units_outstanding: u64,
    pub bill_count: usize,
    pub unpaid_count: usize,
    /// Sum of unpaid bill amounts
    pub total_owed: u64,
}
