//! Billing Domain - Power Billing Escrow Ledger
//!
//! This crate implements the billing side of a metered power service:
//! customers pre-deposit funds into an account escrow, the operator issues
//! bills for consumed units, and bills are settled either from the escrow
//! or with value supplied at payment time. Overdue bills accrue late fees.
//!
//! # Records
//!
//! - **Treasury**: operator-owned escrow that receives every payment, plus
//!   the unit price, overdue fee, and grace period
//! - **Account**: customer escrow, outstanding units, and owned bills
//! - **Bill**: one charge for a quantity of units, paid at most once
//!
//! # Value
//!
//! External value arrives and leaves as a [`Coin`](core_kernel::Coin). An
//! operation that fails after receiving a coin hands it back inside
//! [`ValueRejected`], so value is never silently dropped.
//!
//! # Example
//!
//! ```rust
//! use core_kernel::{Coin, ManualClock, Principal};
//! use domain_billing::{AccrualMode, BillingPolicy, Ledger, SurchargeMode, Treasury, WithdrawalPolicy};
//!
//! let operator = Principal::new();
//! let customer = Principal::new();
//! let policy = BillingPolicy::new(SurchargeMode::Flat, AccrualMode::Repeating, WithdrawalPolicy::Unrestricted);
//! let mut ledger = Ledger::new(Treasury::new(operator, 10, 5, 1_000), policy, ManualClock::starting_at(0))?;
//!
//! let account = ledger.register_account(customer, "MTR-001")?;
//! ledger.deposit(&customer, account, Coin::new(100)).map_err(|rejected| rejected.error)?;
//! let bill = ledger.issue_bill(&customer, account, 5)?;
//! ledger.pay_from_wallet(&customer, account, bill)?;
//!
//! assert_eq!(ledger.treasury().escrow_balance(), 50);
//! assert_eq!(ledger.account(&account).map(|a| a.escrow_balance()), Some(50));
//! # Ok::<(), domain_billing::BillingError>(())
//! ```

pub mod account;
pub mod bill;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod overdue;
pub mod payment;
pub mod policy;
pub mod treasury;
pub mod wallet;

pub use account::{Account, AccountSummary};
pub use bill::{Bill, BillBook};
pub use config::{BillingConfig, SurchargeKind};
pub use error::{BillingError, ValueRejected};
pub use events::LedgerEvent;
pub use ledger::Ledger;
pub use overdue::LateFee;
pub use payment::{PaymentMethod, Settlement};
pub use policy::{AccrualMode, BillingPolicy, SurchargeMode, WithdrawalPolicy};
pub use treasury::{PolicyParameter, Treasury};
