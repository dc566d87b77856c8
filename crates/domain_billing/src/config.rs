//! Ledger configuration
//!
//! Loaded with the `config` crate from `BILLING_*` environment variables or
//! from a TOML document:
//!
//! ```toml
//! unit_price = 10
//! overdue_fee = 5
//! grace_period_ms = 86400000
//! surcharge_mode = "percentage"
//! max_fee_cap = 500
//! accrual_mode = "once_per_bill"
//! withdrawal_policy = "hold_while_unpaid"
//! ```

use serde::Deserialize;
use tracing::info;

use core_kernel::{Clock, Principal};
use crate::error::BillingError;
use crate::ledger::Ledger;
use crate::policy::{AccrualMode, BillingPolicy, SurchargeMode, WithdrawalPolicy};
use crate::treasury::Treasury;

const DEFAULT_UNIT_PRICE: u64 = 1;
const DEFAULT_GRACE_PERIOD_MS: u64 = 30 * 24 * 60 * 60 * 1_000;

/// Surcharge mode as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeKind {
    Flat,
    Percentage,
}

/// Billing configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BillingConfig {
    /// Price per unit
    #[serde(default = "default_unit_price")]
    pub unit_price: u64,
    /// Flat late fee, or percentage under percentage mode
    #[serde(default)]
    pub overdue_fee: u64,
    /// Issuance-to-due offset in milliseconds
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,
    #[serde(default = "default_surcharge_kind")]
    pub surcharge_mode: SurchargeKind,
    /// Required under percentage mode
    #[serde(default)]
    pub max_fee_cap: Option<u64>,
    #[serde(default = "default_accrual_mode")]
    pub accrual_mode: AccrualMode,
    /// No default: every deployment must choose
    pub withdrawal_policy: WithdrawalPolicy,
}

fn default_unit_price() -> u64 {
    DEFAULT_UNIT_PRICE
}

fn default_grace_period_ms() -> u64 {
    DEFAULT_GRACE_PERIOD_MS
}

fn default_surcharge_kind() -> SurchargeKind {
    SurchargeKind::Flat
}

fn default_accrual_mode() -> AccrualMode {
    AccrualMode::Repeating
}

impl BillingConfig {
    /// Loads configuration from `BILLING_*` environment variables
    pub fn from_env() -> Result<Self, BillingError> {
        Self::from_env_with_prefix("BILLING")
    }

    /// Loads configuration from environment variables under `prefix`
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, BillingError> {
        let loaded = config::Config::builder()
            .add_source(config::Environment::with_prefix(prefix).try_parsing(true))
            .build()
            .and_then(|config| config.try_deserialize::<Self>())
            .map_err(config_error)?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Parses configuration from a TOML document
    pub fn from_toml(source: &str) -> Result<Self, BillingError> {
        let loaded = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize::<Self>())
            .map_err(config_error)?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks that the surcharge settings are coherent
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when percentage mode has no cap or a zero cap
    pub fn validate(&self) -> Result<(), BillingError> {
        self.policy().map(|_| ())
    }

    /// Resolves the policy switches
    pub fn policy(&self) -> Result<BillingPolicy, BillingError> {
        let surcharge = match (self.surcharge_mode, self.max_fee_cap) {
            (SurchargeKind::Flat, _) => SurchargeMode::Flat,
            (SurchargeKind::Percentage, Some(cap)) => SurchargeMode::Percentage { max_fee_cap: cap },
            (SurchargeKind::Percentage, None) => {
                return Err(BillingError::Configuration(
                    "percentage surcharge requires max_fee_cap".to_string(),
                ))
            }
        };
        let policy = BillingPolicy::new(surcharge, self.accrual_mode, self.withdrawal_policy);
        policy.validate()?;
        Ok(policy)
    }

    /// Creates the treasury for `operator` with the configured parameters
    pub fn treasury(&self, operator: Principal) -> Treasury {
        Treasury::new(operator, self.unit_price, self.overdue_fee, self.grace_period_ms)
    }

    /// Builds an empty ledger operated by `operator`
    pub fn into_ledger(self, operator: Principal, clock: impl Clock + 'static) -> Result<Ledger, BillingError> {
        let policy = self.policy()?;
        info!(
            %operator,
            unit_price = self.unit_price,
            overdue_fee = self.overdue_fee,
            grace_period_ms = self.grace_period_ms,
            ?policy,
            "ledger configured"
        );
        Ledger::new(self.treasury(operator), policy, clock)
    }
}

fn config_error(error: config::ConfigError) -> BillingError {
    BillingError::Configuration(error.to_string())
}
