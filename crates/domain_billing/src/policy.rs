//! Billing policy switches
//!
//! Three behaviors are chosen by the operator:
//! - how an overdue surcharge is computed ([`SurchargeMode`])
//! - whether repeated accrual passes compound fees ([`AccrualMode`])
//! - whether withdrawals are blocked while bills are unpaid ([`WithdrawalPolicy`])
//!
//! [`BillingPolicy`] has no `Default`: every ledger names its choices.

use serde::{Deserialize, Serialize};

use core_kernel::Rate;
use crate::error::BillingError;

/// How the treasury's `overdue_fee` is turned into a surcharge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SurchargeMode {
    /// `overdue_fee` is added as-is
    Flat,
    /// `overdue_fee` is a percentage of the bill amount, capped
    Percentage {
        /// Ceiling for a single surcharge
        max_fee_cap: u64,
    },
}

impl SurchargeMode {
    /// Computes the surcharge for one accrual pass over a bill
    ///
    /// Never fails: a percentage product too large to represent is clamped
    /// to the cap.
    pub fn surcharge(&self, amount: u64, overdue_fee: u64) -> u64 {
        match self {
            SurchargeMode::Flat => overdue_fee,
            SurchargeMode::Percentage { max_fee_cap } => Rate::from_percentage(overdue_fee)
                .apply(amount)
                .map_or(*max_fee_cap, |fee| fee.min(*max_fee_cap)),
        }
    }
}

/// Whether a bill can be surcharged more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccrualMode {
    /// Every accrual pass after the due date adds another surcharge
    Repeating,
    /// Only the first accrual pass after the due date adds a surcharge
    OncePerBill,
}

/// Whether escrow can leave an account that still owes money
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalPolicy {
    /// Withdrawals only need a sufficient balance
    Unrestricted,
    /// Withdrawals are refused while any bill of the account is unpaid
    HoldWhileUnpaid,
}

/// The full set of operator policy choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPolicy {
    pub surcharge: SurchargeMode,
    pub accrual: AccrualMode,
    pub withdrawal: WithdrawalPolicy,
}

impl BillingPolicy {
    pub fn new(surcharge: SurchargeMode, accrual: AccrualMode, withdrawal: WithdrawalPolicy) -> Self {
        Self {
            surcharge,
            accrual,
            withdrawal,
        }
    }

    /// Rejects a percentage surcharge with a zero cap
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if `max_fee_cap` is zero
    pub fn validate(&self) -> Result<(), BillingError> {
        if let SurchargeMode::Percentage { max_fee_cap: 0 } = self.surcharge {
            return Err(BillingError::Configuration(
                "max_fee_cap must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_surcharge_ignores_amount() {
        assert_eq!(SurchargeMode::Flat.surcharge(1_000, 7), 7);
        assert_eq!(SurchargeMode::Flat.surcharge(0, 7), 7);
    }

    #[test]
    fn test_percentage_surcharge() {
        let mode = SurchargeMode::Percentage { max_fee_cap: 1_000 };
        assert_eq!(mode.surcharge(50, 10), 5);
    }

    #[test]
    fn test_percentage_surcharge_is_capped() {
        let mode = SurchargeMode::Percentage { max_fee_cap: 20 };
        assert_eq!(mode.surcharge(1_000, 10), 20);
    }

    #[test]
    fn test_percentage_surcharge_clamps_unrepresentable_product() {
        let mode = SurchargeMode::Percentage { max_fee_cap: 99 };
        assert_eq!(mode.surcharge(u64::MAX, u64::MAX), 99);
    }

    #[test]
    fn test_zero_percentage_cap_is_invalid() {
        let policy = BillingPolicy::new(
            SurchargeMode::Percentage { max_fee_cap: 0 },
            AccrualMode::Repeating,
            WithdrawalPolicy::Unrestricted,
        );
        assert!(matches!(policy.validate(), Err(BillingError::Configuration(_))));

        let flat = BillingPolicy::new(SurchargeMode::Flat, AccrualMode::Repeating, WithdrawalPolicy::Unrestricted);
        assert_eq!(flat.validate(), Ok(()));
    }

    #[test]
    fn test_policy_serialization() {
        let policy = BillingPolicy::new(
            SurchargeMode::Percentage { max_fee_cap: 20 },
            AccrualMode::OncePerBill,
            WithdrawalPolicy::HoldWhileUnpaid,
        );
        let json = serde_json::to_string(&policy).unwrap();

        assert!(json.contains("\"mode\":\"percentage\""));
        assert!(json.contains("\"once_per_bill\""));
        assert!(json.contains("\"hold_while_unpaid\""));
    }
}
