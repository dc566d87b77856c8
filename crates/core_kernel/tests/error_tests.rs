//! Tests for core_kernel error types

use core_kernel::error::CoreError;
use core_kernel::Balance;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_overflow_display() {
    let error = CoreError::overflow("units * price");
    let display = format!("{}", error);

    assert!(display.contains("Arithmetic overflow"));
    assert!(display.contains("units * price"));
}

#[test]
fn test_insufficient_funds_carries_amounts() {
    let error = Balance::new(10).checked_sub(25).unwrap_err();

    assert_eq!(
        error,
        CoreError::InsufficientFunds { available: 10, requested: 25 }
    );
    assert!(error.to_string().contains("available=10"));
}
