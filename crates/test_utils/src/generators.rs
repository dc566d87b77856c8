//! Property-Based Test Generators
//!
//! Provides proptest strategies for billing parameters and for random
//! sequences of ledger operations. [`LedgerOp::apply`] runs one operation
//! against a [`TestLedger`] and reports the value it moved, so properties
//! can track how much entered and left the ledger.

use proptest::prelude::*;

use core_kernel::{AccountId, BillId, Coin, Principal};
use domain_billing::{AccrualMode, BillingPolicy, SurchargeMode, WithdrawalPolicy};

use crate::builders::TestLedger;

/// Strategy for coin values
pub fn amount_strategy() -> impl Strategy<Value = u64> {
    0u64..10_000u64
}

/// Strategy for billable unit counts
pub fn units_strategy() -> impl Strategy<Value = u64> {
    1u64..100u64
}

/// Strategy for unit prices
pub fn unit_price_strategy() -> impl Strategy<Value = u64> {
    0u64..1_000u64
}

/// Strategy for overdue fees, usable as flat amounts or percentages
pub fn overdue_fee_strategy() -> impl Strategy<Value = u64> {
    0u64..200u64
}

pub fn surcharge_mode_strategy() -> impl Strategy<Value = SurchargeMode> {
    prop_oneof![
        Just(SurchargeMode::Flat),
        (1u64..1_000u64).prop_map(|max_fee_cap| SurchargeMode::Percentage { max_fee_cap }),
    ]
}

pub fn accrual_mode_strategy() -> impl Strategy<Value = AccrualMode> {
    prop_oneof![Just(AccrualMode::Repeating), Just(AccrualMode::OncePerBill)]
}

pub fn withdrawal_policy_strategy() -> impl Strategy<Value = WithdrawalPolicy> {
    prop_oneof![
        Just(WithdrawalPolicy::Unrestricted),
        Just(WithdrawalPolicy::HoldWhileUnpaid),
    ]
}

/// Strategy for complete policy choices
pub fn policy_strategy() -> impl Strategy<Value = BillingPolicy> {
    (surcharge_mode_strategy(), accrual_mode_strategy(), withdrawal_policy_strategy())
        .prop_map(|(surcharge, accrual, withdrawal)| BillingPolicy::new(surcharge, accrual, withdrawal))
}

/// One customer-facing ledger operation
///
/// Bills are addressed by their position in the account's issuance order,
/// wrapped around the number of bills issued so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerOp {
    Deposit(u64),
    IssueBill(u64),
    PayFromWallet(usize),
    PayDirectly(usize, u64),
    Withdraw(u64),
    ReduceUsage(u64),
    Advance(u64),
    AccrueLateFees,
}

/// Value moved by one applied operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flow {
    /// Value that entered the ledger from outside
    pub inflow: u64,
    /// Value that left the ledger
    pub outflow: u64,
}

impl LedgerOp {
    /// Applies the operation as `customer`; rejected operations move nothing
    pub fn apply(&self, test: &mut TestLedger, customer: &Principal, account_id: AccountId) -> Flow {
        match *self {
            LedgerOp::Deposit(amount) => match test.ledger.deposit(customer, account_id, Coin::new(amount)) {
                Ok(()) => Flow { inflow: amount, outflow: 0 },
                Err(_) => Flow::default(),
            },
            LedgerOp::IssueBill(units) => {
                let _ = test.ledger.issue_bill(customer, account_id, units);
                Flow::default()
            }
            LedgerOp::PayFromWallet(index) => {
                if let Some(bill_id) = nth_bill(test, account_id, index) {
                    let _ = test.ledger.pay_from_wallet(customer, account_id, bill_id);
                }
                Flow::default()
            }
            LedgerOp::PayDirectly(index, amount) => {
                let Some(bill_id) = nth_bill(test, account_id, index) else {
                    return Flow::default();
                };
                match test.ledger.pay_directly(customer, account_id, bill_id, Coin::new(amount)) {
                    Ok(settlement) => Flow { inflow: settlement.amount_collected, outflow: 0 },
                    Err(_) => Flow::default(),
                }
            }
            LedgerOp::Withdraw(amount) => match test.ledger.withdraw(customer, account_id, amount) {
                Ok(coin) => Flow { inflow: 0, outflow: coin.value() },
                Err(_) => Flow::default(),
            },
            LedgerOp::ReduceUsage(units) => {
                let _ = test.ledger.reduce_usage(customer, account_id, units);
                Flow::default()
            }
            LedgerOp::Advance(millis) => {
                test.advance(millis);
                Flow::default()
            }
            LedgerOp::AccrueLateFees => {
                let _ = test.ledger.accrue_late_fees(account_id);
                Flow::default()
            }
        }
    }
}

fn nth_bill(test: &TestLedger, account_id: AccountId, index: usize) -> Option<BillId> {
    let bills = test.ledger.account(&account_id)?.bills();
    if bills.is_empty() {
        return None;
    }
    bills.get(index % bills.len()).copied()
}

/// Strategy for a single operation
pub fn ledger_op_strategy() -> impl Strategy<Value = LedgerOp> {
    prop_oneof![
        3 => amount_strategy().prop_map(LedgerOp::Deposit),
        3 => units_strategy().prop_map(LedgerOp::IssueBill),
        2 => any::<usize>().prop_map(LedgerOp::PayFromWallet),
        1 => (any::<usize>(), amount_strategy()).prop_map(|(index, amount)| LedgerOp::PayDirectly(index, amount)),
        2 => amount_strategy().prop_map(LedgerOp::Withdraw),
        1 => (0u64..50u64).prop_map(LedgerOp::ReduceUsage),
        2 => (0u64..2_000u64).prop_map(LedgerOp::Advance),
        2 => Just(LedgerOp::AccrueLateFees),
    ]
}

/// Strategy for operation sequences
pub fn ledger_ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<LedgerOp>> {
    prop::collection::vec(ledger_op_strategy(), 1..max_len)
}
