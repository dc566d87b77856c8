//! Unit tests for balances, coins, and rates

use core_kernel::{Balance, Coin, CoreError, Rate};
use rust_decimal_macros::dec;

mod balance {
    use super::*;

    #[test]
    fn test_zero_is_empty() {
        assert!(Balance::zero().is_zero());
        assert_eq!(Balance::default(), Balance::zero());
    }

    #[test]
    fn test_covers() {
        let balance = Balance::new(50);
        assert!(balance.covers(50));
        assert!(!balance.covers(51));
    }

    #[test]
    fn test_join_adds_value() {
        let mut balance = Balance::new(100);
        balance.join(Balance::new(25)).unwrap();
        assert_eq!(balance.value(), 125);
    }

    #[test]
    fn test_split_exact_empties_balance() {
        let mut balance = Balance::new(100);
        let taken = balance.split(100).unwrap();

        assert_eq!(taken.value(), 100);
        assert!(balance.is_zero());
    }

    #[test]
    fn test_split_insufficient() {
        let mut balance = Balance::new(5);
        let err = balance.split(6).unwrap_err();

        assert!(matches!(err, CoreError::InsufficientFunds { .. }));
        assert_eq!(balance.value(), 5);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Balance::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}

mod coin {
    use super::*;

    #[test]
    fn test_into_balance_keeps_value() {
        assert_eq!(Coin::new(300).into_balance(), Balance::new(300));
    }

    #[test]
    fn test_from_balance_keeps_value() {
        assert_eq!(Coin::from_balance(Balance::new(7)).value(), 7);
    }
}

mod rate {
    use super::*;

    #[test]
    fn test_from_percentage() {
        let rate = Rate::from_percentage(10);
        assert_eq!(rate.as_decimal(), dec!(0.10));
        assert_eq!(rate.as_percentage(), dec!(10));
    }

    #[test]
    fn test_apply_floors_fractional_charge() {
        // 10% of 55 is 5.5
        assert_eq!(Rate::from_percentage(10).apply(55).unwrap(), 5);
    }

    #[test]
    fn test_apply_above_hundred_percent() {
        assert_eq!(Rate::from_percentage(250).apply(4).unwrap(), 10);
    }

    #[test]
    fn test_apply_overflow() {
        let result = Rate::from_percentage(200).apply(u64::MAX);
        assert!(matches!(result, Err(CoreError::Overflow(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(Rate::from_percentage(5).to_string(), "5%");
    }
}
