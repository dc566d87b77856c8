//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! billing ledger test suites.
//!
//! # Modules
//!
//! - `fixtures`: Standard treasury parameters, policies, and times
//! - `builders`: Ledger builder with a controllable clock
//! - `assertions`: Assertion helpers for ledger state
//! - `generators`: Property-based strategies and random operation sequences
//! - `tracing`: Test log initialization

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;
pub mod tracing;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
pub use crate::tracing::init_test_tracing;
