//! End-to-end walkthroughs of a single list.

use tokenlist::{ItemId, ItemPayload, ItemUpdate, MoveDirection, Registry};

use crate::helpers::{assert_chain_consistent, ids, names};

#[test]
fn test_shopping_list_walkthrough() {
    let registry = Registry::new();
    let token = registry.create().unwrap();
    assert!(registry.validate(token.as_str()));
    let list = registry.resolve(token.as_str()).unwrap();

    let milk = list.add(ItemPayload::named("Buy milk")).unwrap();
    let dog = list.add(ItemPayload::named("Walk dog")).unwrap();
    assert_eq!(milk.id, ItemId::new(0));
    assert_eq!(dog.id, ItemId::new(1));
    assert_eq!(ids(&list), [dog.id, milk.id]);

    list.move_down(dog.id).unwrap();
    assert_eq!(names(&list), ["Buy milk", "Walk dog"]);
    assert_chain_consistent(&list);

    let removed = list.remove(milk.id).unwrap();
    assert_eq!(removed.name, "Buy milk");
    assert_eq!(ids(&list), [dog.id]);
    assert!(list.get_by_id(milk.id).unwrap_err().is_not_found());
    assert_chain_consistent(&list);
}

#[test]
fn test_checklist_edits_through_updates() {
    let registry = Registry::new();
    let token = registry.create().unwrap();
    let list = registry.resolve(token.as_str()).unwrap();

    let pack = list.add(ItemPayload::named("Pack bags")).unwrap();
    let book = list.add(ItemPayload::named("Book taxi")).unwrap();
    let lock = list.add(ItemPayload::named("Lock door")).unwrap();
    assert_eq!(names(&list), ["Lock door", "Book taxi", "Pack bags"]);

    // Tick off packing and pull it to the top.
    let packed = list
        .apply(ItemUpdate {
            id: pack.id,
            payload: ItemPayload {
                done: true,
                ..pack.payload()
            },
            direction: MoveDirection::Up,
        })
        .unwrap();
    assert!(packed.done);
    assert_eq!(names(&list), ["Lock door", "Pack bags", "Book taxi"]);

    list.move_up(pack.id).unwrap();
    assert_eq!(list.head().unwrap(), Some(pack.id));

    list.update(
        book.id,
        ItemPayload {
            category: vec!["travel".to_string()],
            ..book.payload()
        },
    )
    .unwrap();
    assert_eq!(list.get_by_id(book.id).unwrap().category, ["travel"]);

    list.remove(lock.id).unwrap();
    assert_eq!(names(&list), ["Pack bags", "Book taxi"]);
    assert_chain_consistent(&list);

    // A second list never sees the first one's items.
    let other = registry.resolve(registry.create().unwrap().as_str()).unwrap();
    assert!(other.get_by_id(pack.id).unwrap_err().is_not_found());
    assert!(other.is_empty().unwrap());
}
