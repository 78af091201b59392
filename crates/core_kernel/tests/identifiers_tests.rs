//! Tests for strongly-typed identifiers

use core_kernel::{AccountId, BudgetId, LevyItemId, LevyScheduleId, LotId, PaymentId, SchemeId};
use uuid::Uuid;

#[test]
fn test_prefixes() {
    assert_eq!(SchemeId::prefix(), "SCH");
    assert_eq!(LotId::prefix(), "LOT");
    assert_eq!(LevyScheduleId::prefix(), "LSC");
    assert_eq!(LevyItemId::prefix(), "LVI");
    assert_eq!(PaymentId::prefix(), "PAY");
    assert_eq!(BudgetId::prefix(), "BUD");
    assert_eq!(AccountId::prefix(), "ACC");
}

#[test]
fn test_display_includes_prefix() {
    let id = LevyScheduleId::new();
    assert!(id.to_string().starts_with("LSC-"));
}

#[test]
fn test_parse_with_and_without_prefix() {
    let id = PaymentId::new();
    let with_prefix: PaymentId = id.to_string().parse().unwrap();
    let bare: PaymentId = id.as_uuid().to_string().parse().unwrap();
    assert_eq!(with_prefix, id);
    assert_eq!(bare, id);
}

#[test]
fn test_parse_rejects_garbage() {
    let result: Result<LotId, _> = "not-a-uuid".parse();
    assert!(result.is_err());
}

#[test]
fn test_v7_ids_are_time_ordered() {
    let a = LevyItemId::new_v7();
    let b = LevyItemId::new_v7();
    assert!(a.as_uuid().as_bytes() <= b.as_uuid().as_bytes());
}

#[test]
fn test_serde_is_transparent() {
    let uuid = Uuid::new_v4();
    let id = SchemeId::from_uuid(uuid);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", uuid));
}
