//! End-to-end flows through a vending session, driven exactly the way a
//! front panel would drive them.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use vendo_core::{DomainError, Limits};
use vendo_machine::{Notice, Severity, VendingSession};

fn seeded(limits: Limits, seed: u64) -> VendingSession<StdRng> {
    vendo_observability::init();
    VendingSession::with_rng(limits, StdRng::seed_from_u64(seed))
}

#[test]
fn full_lifecycle_of_a_single_snack() {
    let mut session = seeded(Limits::default(), 42);

    let added = session.add_snack("Chips", 3).unwrap();
    assert_eq!(added.quantity, 3);
    assert_eq!(session.inventory().variety(), 1);

    let err = session.add_snack("Chips", 1).unwrap_err();
    assert_eq!(err, DomainError::DuplicateName("Chips".to_string()));

    let refilled = session.refill_by("Chips", 25).unwrap();
    assert_eq!(refilled.quantity, 20);
    assert!(refilled.clamped);

    let removed = session.remove_snack("Chips").unwrap();
    assert!(removed.now_empty);
    assert_eq!(session.inventory().variety(), 0);

    let err = session.request_snack().unwrap_err();
    assert_eq!(err, DomainError::EmptyInventory);
}

#[test]
fn refill_paths_respect_the_cap() {
    let mut session = seeded(Limits::default(), 42);
    session.add_snack("Jerky", 0).unwrap();
    session.add_snack("Chips", 18).unwrap();

    let refilled = session.refill_to_max("Jerky").unwrap();
    assert_eq!(refilled.quantity, 20);
    assert!(!refilled.clamped);

    let refilled = session.refill_by("Chips", 5).unwrap();
    assert_eq!(refilled.quantity, 20);
    assert!(refilled.clamped);

    let refilled = session.refill_by("Chips", 0).unwrap();
    assert_eq!(refilled.quantity, 20);
    assert!(!refilled.clamped);
}

#[test]
fn draws_are_uniform_across_snacks_regardless_of_stock() {
    let mut session = seeded(Limits::default(), 7);
    session.add_snack("Jerky", 2).unwrap();
    session.add_snack("Chips", 20).unwrap();
    session.add_snack("Candy", 5).unwrap();
    // Out of stock, but still offered with the same probability as the rest.
    session.add_snack("Gum", 0).unwrap();

    const DRAWS: u32 = 4000;
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for _ in 0..DRAWS {
        let offered = session.request_snack().unwrap();
        if offered.name == "Gum" {
            assert!(offered.out_of_stock);
        }
        *counts.entry(offered.name.clone()).or_default() += 1;
        session.decline_offer().unwrap();
    }

    assert_eq!(counts.len(), 4);
    for (name, count) in &counts {
        // Expected 1000 per snack; a generous band still catches any bias
        // toward in-stock or alphabetically early names.
        assert!(
            (800..=1200).contains(count),
            "{name} drawn {count} times out of {DRAWS}"
        );
    }

    // Declining 4000 offers never changed the stock.
    assert_eq!(session.inventory().quantity("Jerky"), Some(2));
    assert_eq!(session.inventory().quantity("Gum"), Some(0));
}

#[test]
fn accepting_an_out_of_stock_offer_is_a_no_op() {
    let mut session = seeded(Limits::default(), 3);
    session.add_snack("Gum", 0).unwrap();

    let offered = session.request_snack().unwrap();
    assert_eq!(offered.name, "Gum");
    assert!(offered.out_of_stock);

    let dispensed = session.accept_offer().unwrap();
    assert_eq!(dispensed.remaining, 0);
    assert_eq!(session.inventory().quantity("Gum"), Some(0));
}

#[test]
fn draining_a_snack_one_accept_at_a_time() {
    let mut session = seeded(Limits::default(), 9);
    session.add_snack("Chips", 2).unwrap();

    for expected_remaining in [1, 0] {
        let offered = session.request_snack().unwrap();
        assert_eq!(offered.name, "Chips");
        let dispensed = session.accept_offer().unwrap();
        assert_eq!(dispensed.remaining, expected_remaining);
    }

    // Drained but still stocked as a kind: the next offer flags it.
    let offered = session.request_snack().unwrap();
    assert!(offered.out_of_stock);
}

#[test]
fn variety_cap_holds_at_machine_scale() {
    let mut session = seeded(Limits::default(), 11);
    for i in 0..10 {
        session.add_snack(&format!("Snack {i}"), 1).unwrap();
    }

    let err = session.add_snack("One Too Many", 1).unwrap_err();
    assert_eq!(err, DomainError::CapacityExceeded { max_variety: 10 });
}

#[test]
fn notices_serialize_the_way_the_panel_expects() {
    let mut session = seeded(Limits::default(), 13);
    session.add_snack("Chips", 3).unwrap();

    let err = session.add_snack("Chips", 1).unwrap_err();
    let notice = Notice::for_error(&err);
    assert_eq!(notice.severity, Severity::Danger);

    let json = serde_json::to_value(&notice).unwrap();
    assert_eq!(json["severity"], "danger");
    assert_eq!(
        json["message"],
        "You already have this snack! Try adding a different snack."
    );
}
