//! Core Kernel - Foundational types for the power billing ledger
//!
//! This crate provides the building blocks shared by the billing domain:
//! - Value types for escrowed funds and externally supplied coins
//! - Ledger time and the clock port
//! - Strongly-typed identifiers for records and principals

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Balance, Coin, Rate};
pub use temporal::Timestamp;
pub use identifiers::{Principal, AccountId, BillId, TreasuryId};
pub use ports::{Clock, SystemClock, ManualClock};
pub use error::CoreError;
