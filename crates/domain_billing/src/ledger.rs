//! The billing ledger
//!
//! This module owns every record (treasury, accounts, bills) and exposes the
//! operation surface by id. Each method resolves ids, delegates to the
//! subsystem that implements the rule, and records an event once the
//! operation has committed.
//!
//! # Invariants
//!
//! - Account and treasury escrows never go negative
//! - The treasury escrow only grows
//! - A bill is paid at most once and stays paid
//! - A failed operation leaves every record and the event log unchanged

use std::collections::HashMap;
use std::fmt;

use tracing::{info, instrument};

use core_kernel::{AccountId, BillId, Clock, Coin, Principal, Timestamp};
use crate::account::{Account, AccountSummary};
use crate::bill::{Bill, BillBook};
use crate::engine;
use crate::error::{BillingError, ValueRejected};
use crate::events::LedgerEvent;
use crate::overdue::{self, LateFee};
use crate::payment::{self, Settlement};
use crate::policy::BillingPolicy;
use crate::treasury::{PolicyParameter, Treasury};
use crate::wallet;

/// In-memory state store for the billing service
pub struct Ledger {
    /// Operator treasury and billing parameters
    treasury: Treasury,
    /// Operator policy switches
    policy: BillingPolicy,
    /// Customer accounts
    accounts: HashMap<AccountId, Account>,
    /// Meter code to account index
    meters: HashMap<String, AccountId>,
    /// Every bill ever issued
    bills: BillBook,
    /// Audit log of committed operations
    events: Vec<LedgerEvent>,
    /// Host time source
    clock: Box<dyn Clock>,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("treasury", &self.treasury)
            .field("policy", &self.policy)
            .field("accounts", &self.accounts.len())
            .field("bills", &self.bills.len())
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl Ledger {
    /// Creates an empty ledger
    ///
    /// # Arguments
    ///
    /// * `treasury` - Operator treasury holding the billing parameters
    /// * `policy` - Surcharge, accrual, and withdrawal choices
    /// * `clock` - Time source for issuance and accrual
    ///
    /// # Example
    ///
    /// ```rust
    /// use core_kernel::{ManualClock, Principal};
    /// use domain_billing::{AccrualMode, BillingPolicy, Ledger, SurchargeMode, Treasury, WithdrawalPolicy};
    ///
    /// let operator = Principal::new();
    /// let policy = BillingPolicy::new(
    ///     SurchargeMode::Flat,
    ///     AccrualMode::Repeating,
    ///     WithdrawalPolicy::Unrestricted,
    /// );
    /// let ledger = Ledger::new(
    ///     Treasury::new(operator, 10, 5, 1_000),
    ///     policy,
    ///     ManualClock::starting_at(0),
    /// )?;
    /// assert_eq!(ledger.treasury().escrow_balance(), 0);
    /// # Ok::<(), domain_billing::BillingError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the policy has a zero percentage cap
    pub fn new(
        treasury: Treasury,
        policy: BillingPolicy,
        clock: impl Clock + 'static,
    ) -> Result<Self, BillingError> {
        policy.validate()?;
        Ok(Self {
            treasury,
            policy,
            accounts: HashMap::new(),
            meters: HashMap::new(),
            bills: BillBook::new(),
            events: Vec::new(),
            clock: Box::new(clock),
        })
    }

    /// Current time according to the host clock
    pub fn now(&self) -> Timestamp {
        self.clock.now_ms()
    }

    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    pub fn policy(&self) -> &BillingPolicy {
        &self.policy
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn bill(&self, id: &BillId) -> Option<&Bill> {
        self.bills.get(id)
    }

    /// Audit log, oldest first
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Audit log as a JSON array
    pub fn events_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.events)
    }

    fn find_account(&self, id: &AccountId) -> Result<&Account, BillingError> {
        self.accounts
            .get(id)
            .ok_or_else(|| BillingError::AccountNotFound(id.to_string()))
    }

    fn find_account_mut(&mut self, id: &AccountId) -> Result<&mut Account, BillingError> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| BillingError::AccountNotFound(id.to_string()))
    }

    /// Opens an account for `owner` on an unused meter
    ///
    /// # Errors
    ///
    /// Returns `MeterAlreadyRegistered` if the meter belongs to another account
    #[instrument(skip(self, meter_code), fields(meter = %meter_code.as_ref()))]
    pub fn register_account(
        &mut self,
        owner: Principal,
        meter_code: impl AsRef<str>,
    ) -> Result<AccountId, BillingError> {
        let meter_code = meter_code.as_ref();
        if self.meters.contains_key(meter_code) {
            return Err(BillingError::MeterAlreadyRegistered(meter_code.to_string()));
        }

        let now = self.now();
        let account = Account::new(owner, meter_code, now);
        let account_id = account.id;

        self.meters.insert(meter_code.to_string(), account_id);
        self.accounts.insert(account_id, account);
        self.events.push(LedgerEvent::AccountRegistered {
            account_id,
            owner,
            meter_code: meter_code.to_string(),
            timestamp: now,
        });

        info!(account = %account_id, %owner, "account registered");
        Ok(account_id)
    }

    /// Issues a bill dated by the host clock
    pub fn issue_bill(
        &mut self,
        caller: &Principal,
        account_id: AccountId,
        units: u64,
    ) -> Result<BillId, BillingError> {
        let now = self.now();
        self.issue_bill_at(caller, account_id, units, now)
    }

    /// Issues a bill for `units`, due `grace_period_ms` after `now`
    #[instrument(skip(self, caller), fields(account = %account_id))]
    pub fn issue_bill_at(
        &mut self,
        caller: &Principal,
        account_id: AccountId,
        units: u64,
        now: Timestamp,
    ) -> Result<BillId, BillingError> {
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| BillingError::AccountNotFound(account_id.to_string()))?;
        let bill_id = engine::issue_bill(caller, account, &mut self.bills, &self.treasury, units, now)?;

        if let Some(bill) = self.bills.get(&bill_id) {
            self.events.push(LedgerEvent::BillIssued {
                account_id,
                bill_id,
                units,
                amount: bill.amount(),
                due_date: bill.due_date(),
                timestamp: now,
            });
        }
        Ok(bill_id)
    }

    /// Moves a coin into the account escrow
    ///
    /// On failure the coin is returned inside [`ValueRejected`].
    #[instrument(skip(self, caller, coin), fields(account = %account_id, amount = coin.value()))]
    pub fn deposit(
        &mut self,
        caller: &Principal,
        account_id: AccountId,
        coin: Coin,
    ) -> Result<(), ValueRejected> {
        let now = self.now();
        let amount = coin.value();
        let account = match self.find_account_mut(&account_id) {
            Ok(account) => account,
            Err(error) => return Err(ValueRejected::new(error, coin)),
        };
        let balance_after = wallet::deposit(caller, account, coin)?;

        self.events.push(LedgerEvent::Deposited {
            account_id,
            amount,
            balance_after,
            timestamp: now,
        });
        Ok(())
    }

    /// Settles a bill from the account escrow
    #[instrument(skip(self, caller), fields(account = %account_id, bill = %bill_id))]
    pub fn pay_from_wallet(
        &mut self,
        caller: &Principal,
        account_id: AccountId,
        bill_id: BillId,
    ) -> Result<Settlement, BillingError> {
        let now = self.now();
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| BillingError::AccountNotFound(account_id.to_string()))?;
        let settlement =
            payment::pay_from_wallet(caller, account, &mut self.treasury, &mut self.bills, bill_id, now)?;

        self.record_settlement(account_id, &settlement);
        Ok(settlement)
    }

    /// Settles a bill with a supplied coin; any overpayment is kept
    #[instrument(skip(self, caller, coin), fields(account = %account_id, bill = %bill_id, supplied = coin.value()))]
    pub fn pay_directly(
        &mut self,
        caller: &Principal,
        account_id: AccountId,
        bill_id: BillId,
        coin: Coin,
    ) -> Result<Settlement, ValueRejected> {
        let now = self.now();
        let Some(account) = self.accounts.get(&account_id) else {
            return Err(ValueRejected::new(
                BillingError::AccountNotFound(account_id.to_string()),
                coin,
            ));
        };
        let settlement =
            payment::pay_directly(caller, account, &mut self.treasury, &mut self.bills, bill_id, coin, now)?;

        self.record_settlement(account_id, &settlement);
        Ok(settlement)
    }

    fn record_settlement(&mut self, account_id: AccountId, settlement: &Settlement) {
        self.events.push(LedgerEvent::BillPaid {
            account_id,
            bill_id: settlement.bill_id,
            method: settlement.method,
            amount_due: settlement.amount_due,
            amount_collected: settlement.amount_collected,
            timestamp: settlement.settled_at,
        });
    }

    /// Withdraws `amount` from the account escrow as an external coin
    #[instrument(skip(self, caller), fields(account = %account_id))]
    pub fn withdraw(
        &mut self,
        caller: &Principal,
        account_id: AccountId,
        amount: u64,
    ) -> Result<Coin, BillingError> {
        let now = self.now();
        let policy = self.policy.withdrawal;
        let account = self
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| BillingError::AccountNotFound(account_id.to_string()))?;
        let coin = wallet::withdraw(caller, account, &self.bills, amount, policy)?;
        let balance_after = account.escrow_balance();

        self.events.push(LedgerEvent::Withdrawn {
            account_id,
            amount,
            balance_after,
            timestamp: now,
        });
        Ok(coin)
    }

    /// Lowers the account's outstanding units
    #[instrument(skip(self, caller), fields(account = %account_id))]
    pub fn reduce_usage(
        &mut self,
        caller: &Principal,
        account_id: AccountId,
        units: u64,
    ) -> Result<(), BillingError> {
        let now = self.now();
        let account = self.find_account_mut(&account_id)?;
        let units_after = wallet::reduce_usage(caller, account, units)?;

        self.events.push(LedgerEvent::UsageReduced {
            account_id,
            units,
            units_after,
            timestamp: now,
        });
        Ok(())
    }

    /// Units currently attributed to the account
    pub fn remaining_units(&self, account_id: AccountId) -> Result<u64, BillingError> {
        Ok(self.find_account(&account_id)?.remaining_units())
    }

    /// Unpaid bill ids, in issuance order
    pub fn unpaid_bills(&self, account_id: AccountId) -> Result<Vec<BillId>, BillingError> {
        Ok(self.find_account(&account_id)?.unpaid_bills(&self.bills))
    }

    /// Read-only overview of an account
    pub fn account_summary(&self, account_id: AccountId) -> Result<AccountSummary, BillingError> {
        Ok(self.find_account(&account_id)?.summary(&self.bills))
    }

    /// Runs an accrual pass at the host clock's time
    pub fn accrue_late_fees(&mut self, account_id: AccountId) -> Result<Vec<LateFee>, BillingError> {
        let now = self.now();
        self.accrue_late_fees_at(account_id, now)
    }

    /// Surcharges the account's overdue bills as of `now`
    ///
    /// Anyone may trigger an accrual pass; the only failure is an unknown
    /// account.
    #[instrument(skip(self), fields(account = %account_id))]
    pub fn accrue_late_fees_at(
        &mut self,
        account_id: AccountId,
        now: Timestamp,
    ) -> Result<Vec<LateFee>, BillingError> {
        let account = self
            .accounts
            .get(&account_id)
            .ok_or_else(|| BillingError::AccountNotFound(account_id.to_string()))?;
        let applied = overdue::accrue_late_fees(account, &mut self.bills, &self.treasury, &self.policy, now);

        self.events.extend(applied.iter().map(|fee| LedgerEvent::LateFeeApplied {
            account_id,
            bill_id: fee.bill_id,
            surcharge: fee.surcharge,
            amount_after: fee.amount_after,
            timestamp: now,
        }));
        if !applied.is_empty() {
            info!(count = applied.len(), "late fees applied");
        }
        Ok(applied)
    }

    /// Sets the price per unit (operator only)
    pub fn set_unit_price(&mut self, caller: &Principal, unit_price: u64) -> Result<(), BillingError> {
        self.update_policy(caller, PolicyParameter::UnitPrice, unit_price)
    }

    /// Sets the late fee amount or percentage (operator only)
    pub fn set_overdue_fee(&mut self, caller: &Principal, overdue_fee: u64) -> Result<(), BillingError> {
        self.update_policy(caller, PolicyParameter::OverdueFee, overdue_fee)
    }

    /// Sets the issuance-to-due offset (operator only)
    pub fn set_grace_period(&mut self, caller: &Principal, grace_period_ms: u64) -> Result<(), BillingError> {
        self.update_policy(caller, PolicyParameter::GracePeriodMs, grace_period_ms)
    }

    #[instrument(skip(self, caller))]
    fn update_policy(
        &mut self,
        caller: &Principal,
        parameter: PolicyParameter,
        new_value: u64,
    ) -> Result<(), BillingError> {
        let now = self.now();
        let old_value = self.treasury.update(caller, parameter, new_value)?;

        self.events.push(LedgerEvent::PolicyUpdated {
            parameter,
            old_value,
            new_value,
            timestamp: now,
        });
        info!(?parameter, old_value, new_value, "policy updated");
        Ok(())
    }
}
