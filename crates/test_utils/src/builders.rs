//! Test Data Builders
//!
//! Provides a builder for ledgers with sensible defaults. Tests override
//! only the parameters they care about and drive time through the shared
//! [`ManualClock`] handle.

use std::sync::Arc;

use core_kernel::{AccountId, BillId, Coin, ManualClock, Principal, Timestamp};
use domain_billing::{
    AccrualMode, BillingPolicy, Ledger, SurchargeMode, Treasury, WithdrawalPolicy,
};

use crate::fixtures::{MeterFixtures, TreasuryFixtures};

/// A ledger together with its operator and clock handle
pub struct TestLedger {
    pub ledger: Ledger,
    pub operator: Principal,
    pub clock: Arc<ManualClock>,
    next_meter: u32,
}

impl TestLedger {
    /// Registers a fresh customer on a new meter
    pub fn open_account(&mut self) -> (Principal, AccountId) {
        let customer = Principal::new();
        self.next_meter += 1;
        let account_id = self
            .ledger
            .register_account(customer, MeterFixtures::code(self.next_meter))
            .expect("fresh meter code");
        (customer, account_id)
    }

    /// Registers a fresh customer and deposits `amount` into the escrow
    pub fn funded_account(&mut self, amount: u64) -> (Principal, AccountId) {
        let (customer, account_id) = self.open_account();
        if amount > 0 {
            self.ledger
                .deposit(&customer, account_id, Coin::new(amount))
                .expect("deposit into own account");
        }
        (customer, account_id)
    }

    /// Issues a bill and returns its id
    pub fn bill(&mut self, customer: &Principal, account_id: AccountId, units: u64) -> BillId {
        self.ledger
            .issue_bill(customer, account_id, units)
            .expect("bill issuance")
    }

    /// Moves the clock forward
    pub fn advance(&self, millis: u64) {
        self.clock.advance(millis);
    }

    /// Current ledger time
    pub fn now(&self) -> Timestamp {
        self.ledger.now()
    }

    /// Escrow balance of an account, panicking if it is unknown
    pub fn escrow(&self, account_id: AccountId) -> u64 {
        self.ledger
            .account(&account_id)
            .map(|account| account.escrow_balance())
            .expect("known account")
    }
}

/// Builder for constructing test ledgers
pub struct TestLedgerBuilder {
    operator: Principal,
    unit_price: u64,
    overdue_fee: u64,
    grace_period_ms: u64,
    surcharge: SurchargeMode,
    accrual: AccrualMode,
    withdrawal: WithdrawalPolicy,
    start_ms: u64,
}

impl Default for TestLedgerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLedgerBuilder {
    /// Creates a new builder with the standard fixture parameters
    pub fn new() -> Self {
        Self {
            operator: Principal::new(),
            unit_price: TreasuryFixtures::UNIT_PRICE,
            overdue_fee: TreasuryFixtures::OVERDUE_FEE,
            grace_period_ms: TreasuryFixtures::GRACE_PERIOD_MS,
            surcharge: SurchargeMode::Flat,
            accrual: AccrualMode::Repeating,
            withdrawal: WithdrawalPolicy::Unrestricted,
            start_ms: 0,
        }
    }

    /// Sets the treasury operator
    pub fn with_operator(mut self, operator: Principal) -> Self {
        self.operator = operator;
        self
    }

    /// Sets the price per unit
    pub fn with_unit_price(mut self, unit_price: u64) -> Self {
        self.unit_price = unit_price;
        self
    }

    /// Sets the overdue fee
    pub fn with_overdue_fee(mut self, overdue_fee: u64) -> Self {
        self.overdue_fee = overdue_fee;
        self
    }

    /// Sets the grace period
    pub fn with_grace_period(mut self, grace_period_ms: u64) -> Self {
        self.grace_period_ms = grace_period_ms;
        self
    }

    /// Switches to percentage surcharges with the given cap
    pub fn with_percentage_surcharge(mut self, max_fee_cap: u64) -> Self {
        self.surcharge = SurchargeMode::Percentage { max_fee_cap };
        self
    }

    /// Sets the accrual mode
    pub fn with_accrual(mut self, accrual: AccrualMode) -> Self {
        self.accrual = accrual;
        self
    }

    /// Sets the withdrawal policy
    pub fn with_withdrawal(mut self, withdrawal: WithdrawalPolicy) -> Self {
        self.withdrawal = withdrawal;
        self
    }

    /// Uses all three policy switches from `policy`
    pub fn with_policy(mut self, policy: BillingPolicy) -> Self {
        self.surcharge = policy.surcharge;
        self.accrual = policy.accrual;
        self.withdrawal = policy.withdrawal;
        self
    }

    /// Sets the initial clock reading
    pub fn starting_at(mut self, millis: u64) -> Self {
        self.start_ms = millis;
        self
    }

    /// Builds the ledger
    pub fn build(self) -> TestLedger {
        let clock = Arc::new(ManualClock::starting_at(self.start_ms));
        let treasury = Treasury::new(self.operator, self.unit_price, self.overdue_fee, self.grace_period_ms);
        let policy = BillingPolicy::new(self.surcharge, self.accrual, self.withdrawal);

        TestLedger {
            ledger: Ledger::new(treasury, policy, Arc::clone(&clock)).expect("valid test policy"),
            operator: self.operator,
            clock,
            next_meter: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let test = TestLedgerBuilder::new().build();

        assert_eq!(test.ledger.treasury().unit_price(), TreasuryFixtures::UNIT_PRICE);
        assert_eq!(test.ledger.treasury().operator(), test.operator);
        assert_eq!(test.now(), Timestamp::EPOCH);
    }

    #[test]
    fn test_shared_clock_drives_ledger() {
        let test = TestLedgerBuilder::new().starting_at(100).build();
        test.advance(50);
        assert_eq!(test.now(), Timestamp::from_millis(150));
    }

    #[test]
    fn test_funded_accounts_use_distinct_meters() {
        let mut test = TestLedgerBuilder::new().build();
        let (_, first) = test.funded_account(10);
        let (_, second) = test.funded_account(20);

        assert_ne!(first, second);
        assert_eq!(test.escrow(first), 10);
        assert_eq!(test.escrow(second), 20);
    }
}
