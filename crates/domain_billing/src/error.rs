//! Billing domain errors

use thiserror::Error;

use core_kernel::{Coin, CoreError};

/// Errors that can occur in the billing domain
///
/// Every error aborts the operation that raised it; no record is modified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// Caller is not the record owner or not the treasury operator
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bill belongs to another account or is already paid
    #[error("Invalid bill: {0}")]
    InvalidBill(String),

    /// Balance or supplied value does not cover the request
    #[error("Insufficient balance: available={available}, requested={requested}")]
    InsufficientBalance { available: u64, requested: u64 },

    /// Quantity computation would overflow
    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    /// Usage reduction would make outstanding units negative
    #[error("Units underflow: outstanding={outstanding}, requested={requested}")]
    UnderflowUnits { outstanding: u64, requested: u64 },

    /// A bill must be for at least one unit
    #[error("Invalid units: {0}")]
    InvalidUnits(String),

    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Bill not found
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    /// Withdrawal refused while bills are unpaid
    #[error("Withdrawal held: {unpaid} unpaid bill(s)")]
    WithdrawalHeld { unpaid: usize },

    /// Meter code is already attached to an account
    #[error("Meter already registered: {0}")]
    MeterAlreadyRegistered(String),

    /// Invalid ledger configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<CoreError> for BillingError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Overflow(context) => BillingError::ArithmeticOverflow(context),
            CoreError::InsufficientFunds { available, requested } => {
                BillingError::InsufficientBalance { available, requested }
            }
            CoreError::Validation(message) => BillingError::Configuration(message),
        }
    }
}

/// A rejected operation that was handed external value
///
/// The coin is returned untouched so the caller keeps its funds.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ValueRejected {
    pub error: BillingError,
    pub coin: Coin,
}

impl ValueRejected {
    pub fn new(error: BillingError, coin: Coin) -> Self {
        Self { error, coin }
    }

    /// Splits into the error and the returned coin
    pub fn into_parts(self) -> (BillingError, Coin) {
        (self.error, self.coin)
    }
}
