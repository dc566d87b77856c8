//! Pre-built Test Fixtures
//!
//! Provides ready-to-use billing parameters, policies, and times. The
//! numbers are chosen so that results are easy to check by hand: five units
//! cost 50, a flat late fee adds 5, and a bill issued at time zero falls
//! due at 1000 ms.

use core_kernel::{Principal, Timestamp};
use domain_billing::{AccrualMode, BillingPolicy, SurchargeMode, Treasury, WithdrawalPolicy};

/// Fixture for treasury parameters
pub struct TreasuryFixtures;

impl TreasuryFixtures {
    /// Price per unit
    pub const UNIT_PRICE: u64 = 10;
    /// Flat late fee, or 5% under percentage mode
    pub const OVERDUE_FEE: u64 = 5;
    /// Issuance-to-due offset
    pub const GRACE_PERIOD_MS: u64 = 1_000;

    /// Creates a treasury with the standard parameters
    pub fn standard(operator: Principal) -> Treasury {
        Treasury::new(operator, Self::UNIT_PRICE, Self::OVERDUE_FEE, Self::GRACE_PERIOD_MS)
    }
}

/// Fixture for policy switches
pub struct PolicyFixtures;

impl PolicyFixtures {
    /// Flat, repeating, unrestricted withdrawals
    pub fn flat_repeating() -> BillingPolicy {
        BillingPolicy::new(SurchargeMode::Flat, AccrualMode::Repeating, WithdrawalPolicy::Unrestricted)
    }

    /// Flat, once per bill, unrestricted withdrawals
    pub fn flat_once() -> BillingPolicy {
        BillingPolicy::new(SurchargeMode::Flat, AccrualMode::OncePerBill, WithdrawalPolicy::Unrestricted)
    }

    /// Percentage with a cap, repeating, unrestricted withdrawals
    pub fn percentage(max_fee_cap: u64) -> BillingPolicy {
        BillingPolicy::new(
            SurchargeMode::Percentage { max_fee_cap },
            AccrualMode::Repeating,
            WithdrawalPolicy::Unrestricted,
        )
    }

    /// Flat, repeating, withdrawals held while bills are unpaid
    pub fn holding() -> BillingPolicy {
        BillingPolicy::new(SurchargeMode::Flat, AccrualMode::Repeating, WithdrawalPolicy::HoldWhileUnpaid)
    }
}

/// Fixture for ledger times
pub struct TimeFixtures;

impl TimeFixtures {
    /// Issuance time used by most tests
    pub fn issued_at() -> Timestamp {
        Timestamp::EPOCH
    }

    /// Exactly the due date of a bill issued at [`Self::issued_at`]
    pub fn due() -> Timestamp {
        Timestamp::from_millis(TreasuryFixtures::GRACE_PERIOD_MS)
    }

    /// Strictly after the due date
    pub fn overdue() -> Timestamp {
        Timestamp::from_millis(TreasuryFixtures::GRACE_PERIOD_MS + 1)
    }
}

/// Sequential meter codes for test accounts
pub struct MeterFixtures;

impl MeterFixtures {
    pub fn code(n: u32) -> String {
        format!("MTR-{n:05}")
    }
}
