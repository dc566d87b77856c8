//! Power Billing - metered power billing ledger
//!
//! Umbrella crate re-exporting the workspace crates:
//! - [`core_kernel`]: identifiers, balances and coins, time and clocks
//! - [`domain_billing`]: treasury, accounts, bills, and the [`Ledger`]
//!
//! Most callers only need [`BillingConfig`] to build a [`Ledger`] and the
//! core value types to drive it.

pub use core_kernel;
pub use domain_billing;

pub use core_kernel::{AccountId, BillId, Clock, Coin, ManualClock, Principal, SystemClock, Timestamp};
pub use domain_billing::{BillingConfig, BillingError, Ledger, LedgerEvent, ValueRejected};
