//! Operator treasury
//!
//! The treasury holds the billing parameters and the aggregate escrow of
//! every settled bill. Its escrow only grows inside this crate: settlements
//! add to it and nothing here takes from it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{Balance, Principal, TreasuryId};
use crate::error::BillingError;

/// Policy parameter names, used in audit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyParameter {
    UnitPrice,
    OverdueFee,
    GracePeriodMs,
}

/// The operator's treasury record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treasury {
    /// Unique identifier
    pub id: TreasuryId,
    /// Principal allowed to administer policy
    operator: Principal,
    /// Price charged per unit of power
    unit_price: u64,
    /// Flat fee or percentage, depending on the surcharge mode
    overdue_fee: u64,
    /// Offset from issuance to due date
    grace_period_ms: u64,
    /// Funds collected from settled bills
    pub(crate) escrow: Balance,
}

impl Treasury {
    /// Creates a treasury with an empty escrow
    ///
    /// # Arguments
    ///
    /// * `operator` - Principal administering the treasury
    /// * `unit_price` - Price per unit
    /// * `overdue_fee` - Late fee amount or percentage
    /// * `grace_period_ms` - Milliseconds between issuance and due date
    pub fn new(operator: Principal, unit_price: u64, overdue_fee: u64, grace_period_ms: u64) -> Self {
        Self {
            id: TreasuryId::new_v7(),
            operator,
            unit_price,
            overdue_fee,
            grace_period_ms,
            escrow: Balance::zero(),
        }
    }

    pub fn operator(&self) -> Principal {
        self.operator
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    pub fn overdue_fee(&self) -> u64 {
        self.overdue_fee
    }

    pub fn grace_period_ms(&self) -> u64 {
        self.grace_period_ms
    }

    /// Returns the collected escrow
    pub fn escrow_balance(&self) -> u64 {
        self.escrow.value()
    }

    /// Prices a quantity of units at the current unit price
    pub fn price(&self, units: u64) -> Result<u64, BillingError> {
        units.checked_mul(self.unit_price).ok_or_else(|| {
            BillingError::ArithmeticOverflow(format!("{} units * price {}", units, self.unit_price))
        })
    }

    /// Verifies that `caller` is the operator
    pub fn authorize(&self, caller: &Principal) -> Result<(), BillingError> {
        if *caller != self.operator {
            warn!(%caller, treasury = %self.id, "rejected treasury administration");
            return Err(BillingError::Unauthorized(format!(
                "{} is not the operator of {}",
                caller, self.id
            )));
        }
        Ok(())
    }

    /// Updates one policy parameter, returning the previous value
    ///
    /// Existing bills are unaffected; only later issuance and accrual read
    /// the new value.
    pub fn update(
        &mut self,
        caller: &Principal,
        parameter: PolicyParameter,
        value: u64,
    ) -> Result<u64, BillingError> {
        self.authorize(caller)?;
        let slot = match parameter {
            PolicyParameter::UnitPrice => &mut self.unit_price,
            PolicyParameter::OverdueFee => &mut self.overdue_fee,
            PolicyParameter::GracePeriodMs => &mut self.grace_period_ms,
        };
        Ok(std::mem::replace(slot, value))
    }
}
