//! Up/down moves and their interaction with the chain ends.

use tokenlist::{ItemPayload, MoveDirection};

use crate::helpers::{assert_chain_consistent, collection_with, ids, names};

#[test]
fn test_move_up_swaps_with_predecessor() {
    let (_registry, collection, added) = collection_with(&["a", "b", "c", "d"]);
    // order: d c b a

    collection.move_up(added[1].id).unwrap();
    assert_eq!(names(&collection), ["d", "b", "c", "a"]);
    assert_chain_consistent(&collection);

    collection.move_up(added[1].id).unwrap();
    assert_eq!(names(&collection), ["b", "d", "c", "a"]);
    assert_eq!(collection.head().unwrap(), Some(added[1].id));
    assert_chain_consistent(&collection);
}

#[test]
fn test_move_down_swaps_with_successor() {
    let (_registry, collection, added) = collection_with(&["a", "b", "c", "d"]);

    collection.move_down(added[3].id).unwrap();
    assert_eq!(names(&collection), ["c", "d", "b", "a"]);
    assert_eq!(collection.head().unwrap(), Some(added[2].id));
    assert_chain_consistent(&collection);

    collection.move_down(added[2].id).unwrap();
    assert_eq!(names(&collection), ["d", "c", "b", "a"]);
    assert_chain_consistent(&collection);

    collection.move_down(added[1].id).unwrap();
    assert_eq!(names(&collection), ["d", "c", "a", "b"]);
    assert_chain_consistent(&collection);
}

#[test]
fn test_moves_at_the_ends_are_no_ops() {
    let (_registry, collection, added) = collection_with(&["a", "b", "c"]);
    let before = ids(&collection);

    let head = collection.move_up(added[2].id).unwrap();
    let tail = collection.move_down(added[0].id).unwrap();

    assert_eq!(head.id, added[2].id);
    assert_eq!(tail.id, added[0].id);
    assert_eq!(ids(&collection), before);
    assert_chain_consistent(&collection);
}

#[test]
fn test_single_item_moves() {
    let (_registry, collection, added) = collection_with(&["only"]);

    collection.move_up(added[0].id).unwrap();
    collection.move_down(added[0].id).unwrap();

    assert_eq!(names(&collection), ["only"]);
    assert_chain_consistent(&collection);
}

#[test]
fn test_up_then_down_restores_order() {
    let (_registry, collection, added) = collection_with(&["a", "b", "c", "d", "e"]);
    let before = ids(&collection);

    for item in &added[..4] {
        collection.move_up(item.id).unwrap();
        collection.move_down(item.id).unwrap();
        assert_eq!(ids(&collection), before);
    }
    assert_chain_consistent(&collection);
}

#[test]
fn test_move_unknown_item() {
    let (_registry, collection, added) = collection_with(&["a", "b"]);
    collection.remove(added[0].id).unwrap();
    let before = ids(&collection);

    assert!(collection.move_up(added[0].id).unwrap_err().is_not_found());
    assert!(collection.move_down(added[0].id).unwrap_err().is_not_found());
    assert_eq!(ids(&collection), before);
}

#[test]
fn test_item_walks_from_tail_to_head() {
    let names_in = ["a", "b", "c", "d", "e", "f"];
    let (_registry, collection, added) = collection_with(&names_in);
    let walker = added[0].id;

    for step in 1..names_in.len() {
        collection.move_item(walker, MoveDirection::Up).unwrap();
        let order = ids(&collection);
        assert_eq!(order[names_in.len() - 1 - step], walker);
        assert_chain_consistent(&collection);
    }
    assert_eq!(collection.head().unwrap(), Some(walker));
}

#[test]
fn test_update_and_move_down_from_head() {
    let (_registry, collection, added) = collection_with(&["a", "b", "c"]);

    let item = collection
        .update_and_move(added[2].id, ItemPayload::named("c2"), MoveDirection::Down)
        .unwrap();

    assert_eq!(item.name, "c2");
    assert_eq!(names(&collection), ["b", "c2", "a"]);
    assert_chain_consistent(&collection);
}

#[test]
fn test_add_after_moves_goes_to_head() {
    let (_registry, collection, added) = collection_with(&["a", "b", "c"]);
    collection.move_down(added[2].id).unwrap();
    collection.move_up(added[0].id).unwrap();
    // order: b a c

    collection.add(ItemPayload::named("new")).unwrap();

    assert_eq!(names(&collection), ["new", "b", "a", "c"]);
    assert_chain_consistent(&collection);
}
