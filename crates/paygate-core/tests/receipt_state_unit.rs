// crates/paygate-core/tests/receipt_state_unit.rs
// ============================================================================
// Module: Receipt State Machine Tests
// Description: Legal and illegal transitions of the receipt lifecycle.
// Purpose: Keep the Submitted -> Verified -> Recorded progression closed.
// ============================================================================

//! ## Overview
//! Exhaustively checks the receipt lifecycle transition table and the
//! catalog's refusal to guess unknown product ids.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use paygate_core::ProductCatalog;
use paygate_core::ReceiptState;
use paygate_core::StaticCatalog;
use paygate_core::StoreKind;
use paygate_core::StoreProductId;
use paygate_core::UnifiedPackageId;

/// Every state in declaration order.
const ALL_STATES: [ReceiptState; 4] = [
    ReceiptState::Submitted,
    ReceiptState::Verified,
    ReceiptState::Recorded,
    ReceiptState::Rejected,
];

#[test]
fn transition_table_is_exactly_the_specified_one() {
    let legal = [
        (ReceiptState::Submitted, ReceiptState::Verified),
        (ReceiptState::Verified, ReceiptState::Recorded),
        (ReceiptState::Submitted, ReceiptState::Rejected),
        (ReceiptState::Verified, ReceiptState::Rejected),
    ];
    for from in ALL_STATES {
        for to in ALL_STATES {
            let expected = legal.contains(&(from, to));
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "transition {from} -> {to}"
            );
        }
    }
}

#[test]
fn recorded_and_rejected_are_terminal() {
    assert!(ReceiptState::Recorded.is_terminal());
    assert!(ReceiptState::Rejected.is_terminal());
    assert!(!ReceiptState::Submitted.is_terminal());
    assert!(!ReceiptState::Verified.is_terminal());
}

#[test]
fn catalog_resolves_per_store() {
    let mut catalog = StaticCatalog::new();
    catalog.insert(
        StoreKind::AppleAppStore,
        StoreProductId::new("com.esim.global10"),
        UnifiedPackageId::new("pkg_global_10gb"),
    );

    let hit = catalog
        .resolve(StoreKind::AppleAppStore, &StoreProductId::new("com.esim.global10"))
        .expect("catalog lookup");
    assert_eq!(hit, Some(UnifiedPackageId::new("pkg_global_10gb")));

    let other_store = catalog
        .resolve(StoreKind::GooglePlay, &StoreProductId::new("com.esim.global10"))
        .expect("catalog lookup");
    assert_eq!(other_store, None, "mappings are store-scoped");
}

#[test]
fn catalog_never_guesses_unknown_products() {
    let catalog = StaticCatalog::new();
    let miss = catalog
        .resolve(StoreKind::AppleAppStore, &StoreProductId::new("com.esim.unknown"))
        .expect("catalog lookup");
    assert_eq!(miss, None);
}
