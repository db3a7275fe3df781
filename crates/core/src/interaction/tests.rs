use super::*;
use crate::config::GameConfig;
use crate::generator::TokenGenerator;

fn empty_world() -> CellStore {
    CellStore::new(TokenGenerator::new(0.0, vec![1]))
}

fn reach() -> Reach {
    Reach { player_cell: CellCoord::new(0, 0), radius: 3 }
}

#[test]
fn pickup_moves_token_into_hands_and_clears_cell() {
    let mut store = empty_world();
    let coord = CellCoord::new(1, 1);
    store.update(coord, |_| Some(2));
    let mut inventory = Inventory::Empty;

    let outcome = apply_click(&mut store, &mut inventory, reach(), coord);

    assert_eq!(outcome, ClickOutcome::PickedUp(2));
    assert_eq!(inventory, Inventory::Holding(2));
    assert_eq!(store.get(coord), None);
}

#[test]
fn merge_doubles_into_cell_and_empties_hands() {
    for held in [1, 2, 4, 8, 16] {
        let mut store = empty_world();
        let coord = CellCoord::new(-2, 3);
        store.update(coord, |_| Some(held));
        let mut inventory = Inventory::Holding(held);

        let outcome = apply_click(&mut store, &mut inventory, reach(), coord);

        assert_eq!(outcome, ClickOutcome::Merged(held * 2));
        assert_eq!(inventory, Inventory::Empty);
        assert_eq!(store.get(coord), Some(held * 2));
    }
}

#[test]
fn mismatch_is_rejected_without_mutation() {
    let mut store = empty_world();
    let coord = CellCoord::new(0, 1);
    store.update(coord, |_| Some(4));
    let before = store.snapshot();
    let mut inventory = Inventory::Holding(2);

    let outcome = apply_click(&mut store, &mut inventory, reach(), coord);

    assert_eq!(outcome, ClickOutcome::Mismatch { cell: 4, held: 2 });
    assert_eq!(inventory, Inventory::Holding(2));
    assert_eq!(store.snapshot(), before);
    let text = outcome.to_string();
    assert!(text.contains("[4]") && text.contains("[2]"), "feedback should name both: {text}");
}

#[test]
fn holding_onto_empty_cell_is_rejected() {
    let mut store = empty_world();
    let mut inventory = Inventory::Holding(8);
    let outcome = apply_click(&mut store, &mut inventory, reach(), CellCoord::new(1, 0));
    assert_eq!(outcome, ClickOutcome::AlreadyHolding(8));
    assert_eq!(inventory, Inventory::Holding(8));
    assert!(store.is_empty());
}

#[test]
fn empty_hands_on_empty_cell_does_nothing() {
    let mut store = empty_world();
    let mut inventory = Inventory::Empty;
    let outcome = apply_click(&mut store, &mut inventory, reach(), CellCoord::new(0, 0));
    assert_eq!(outcome, ClickOutcome::NothingHere);
    assert!(!outcome.is_accepted());
    assert!(store.is_empty());
}

#[test]
fn click_outside_reach_reports_distance_and_changes_nothing() {
    let mut store = CellStore::new(TokenGenerator::new(1.0, vec![2]));
    let coord = CellCoord::new(4, -1);
    let mut inventory = Inventory::Empty;

    let outcome = apply_click(&mut store, &mut inventory, reach(), coord);

    assert_eq!(outcome, ClickOutcome::TooFar { distance: 4, radius: 3 });
    assert_eq!(inventory, Inventory::Empty);
    assert!(store.is_empty());
    assert!(outcome.to_string().contains("4 cells away"));
}

#[test]
fn reach_is_a_square_ring() {
    let reach = reach();
    assert!(reach.interactable(CellCoord::new(3, 3)));
    assert!(reach.interactable(CellCoord::new(-3, 0)));
    assert!(!reach.interactable(CellCoord::new(4, 0)));
    assert!(!reach.interactable(CellCoord::new(1, -4)));
}

#[test]
fn never_holds_more_than_one_token() {
    let mut store = CellStore::new(TokenGenerator::from_config(&GameConfig::default()));
    let mut inventory = Inventory::Empty;
    for i in -3..=3 {
        for j in -3..=3 {
            let before = inventory;
            let outcome = apply_click(&mut store, &mut inventory, reach(), CellCoord::new(i, j));
            match outcome {
                ClickOutcome::PickedUp(_) => assert_eq!(before, Inventory::Empty),
                ClickOutcome::Merged(_) => assert_eq!(inventory, Inventory::Empty),
                _ => assert_eq!(inventory, before),
            }
        }
    }
}

#[test]
fn inventory_converts_from_optional_value() {
    assert_eq!(Inventory::from_held(None), Inventory::Empty);
    assert_eq!(Inventory::from_held(Some(4)), Inventory::Holding(4));
    assert_eq!(Inventory::Holding(4).held(), Some(4));
}
