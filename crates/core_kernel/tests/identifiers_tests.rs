//! Unit tests for the Identifiers module

use core_kernel::{AccountId, BillId, Principal, TreasuryId};
use uuid::Uuid;

mod bill_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(BillId::new(), BillId::new());
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = BillId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = BillId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_from_str_with_prefix() {
        let original = BillId::new();
        let parsed: BillId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_str_without_prefix() {
        let uuid = Uuid::new_v4();
        let parsed: BillId = uuid.to_string().parse().unwrap();
        assert_eq!(*parsed.as_uuid(), uuid);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("BILL-not-a-uuid".parse::<BillId>().is_err());
    }
}

#[test]
fn test_prefixes() {
    assert_eq!(Principal::prefix(), "PRN");
    assert_eq!(AccountId::prefix(), "ACC");
    assert_eq!(BillId::prefix(), "BILL");
    assert_eq!(TreasuryId::prefix(), "TRS");
}

#[test]
fn test_serde_is_transparent() {
    let uuid = Uuid::new_v4();
    let id = AccountId::from_uuid(uuid);
    let json = serde_json::to_string(&id).unwrap();

    assert_eq!(json, format!("\"{}\"", uuid));
    let back: AccountId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}
