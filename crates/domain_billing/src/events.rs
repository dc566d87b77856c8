//! Ledger events
//!
//! Every committed operation appends one or more events to the ledger's
//! audit log. Rejected operations append nothing.

use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, BillId, Principal, Timestamp};
use crate::payment::PaymentMethod;
use crate::treasury::PolicyParameter;

/// Domain events emitted by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A customer account was opened
    AccountRegistered {
        account_id: AccountId,
        owner: Principal,
        meter_code: String,
        timestamp: Timestamp,
    },

    /// Value entered an account escrow
    Deposited {
        account_id: AccountId,
        amount: u64,
        balance_after: u64,
        timestamp: Timestamp,
    },

    /// A bill was issued
    BillIssued {
        account_id: AccountId,
        bill_id: BillId,
        units: u64,
        amount: u64,
        due_date: Timestamp,
        timestamp: Timestamp,
    },

    /// A bill was settled
    BillPaid {
        account_id: AccountId,
        bill_id: BillId,
        method: PaymentMethod,
        amount_due: u64,
        amount_collected: u64,
        timestamp: Timestamp,
    },

    /// A late fee was added to an overdue bill
    LateFeeApplied {
        account_id: AccountId,
        bill_id: BillId,
        surcharge: u64,
        amount_after: u64,
        timestamp: Timestamp,
    },

    /// Value left an account escrow
    Withdrawn {
        account_id: AccountId,
        amount: u64,
        balance_after: u64,
        timestamp: Timestamp,
    },

    /// Outstanding units were reduced
    UsageReduced {
        account_id: AccountId,
        units: u64,
        units_after: u64,
        timestamp: Timestamp,
    },

    /// The operator changed a billing parameter
    PolicyUpdated {
        parameter: PolicyParameter,
        old_value: u64,
        new_value: u64,
        timestamp: Timestamp,
    },
}

impl LedgerEvent {
    /// Account the event concerns, if any
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            LedgerEvent::AccountRegistered { account_id, .. }
            | LedgerEvent::Deposited { account_id, .. }
            | LedgerEvent::BillIssued { account_id, .. }
            | LedgerEvent::BillPaid { account_id, .. }
            | LedgerEvent::LateFeeApplied { account_id, .. }
            | LedgerEvent::Withdrawn { account_id, .. }
            | LedgerEvent::UsageReduced { account_id, .. } => Some(*account_id),
            LedgerEvent::PolicyUpdated { .. } => None,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            LedgerEvent::AccountRegistered { timestamp, .. }
            | LedgerEvent::Deposited { timestamp, .. }
            | LedgerEvent::BillIssued { timestamp, .. }
            | LedgerEvent::BillPaid { timestamp, .. }
            | LedgerEvent::LateFeeApplied { timestamp, .. }
            | LedgerEvent::Withdrawn { timestamp, .. }
            | LedgerEvent::UsageReduced { timestamp, .. }
            | LedgerEvent::PolicyUpdated { timestamp, .. } => *timestamp,
        }
    }
}
