use super::*;
use pretty_assertions::assert_eq;

#[test]
fn add_creates_private_empty_list() {
    let mut state = state();
    let effects = run(
        &mut state,
        AppAction::List(ListAction::Add(NewList {
            title: " Weekend ".to_string(),
            description: "chores".to_string(),
            owner: Some(UserId(7)),
        })),
        1_000,
    );

    let list = &state.lists.lists()[0];
    assert_eq!(list.title, "Weekend");
    assert_eq!(list.description, "chores");
    assert_eq!(list.shared, 1);
    assert!(!list.is_shared());
    assert_eq!(list.todo_count, 0);
    assert_eq!(list.created_at, at(1_000));
    assert_eq!(list.owner, Some(UserId(7)));
    assert_eq!(messages(&effects), vec!["List \"Weekend\" created successfully"]);
}

#[test]
fn blank_title_is_rejected() {
    let mut state = state();
    let err = reduce(
        &mut state,
        AppAction::List(ListAction::Add(NewList::new("   "))),
        at(1_000),
    )
    .expect_err("blank");
    assert_eq!(err.message(), "Please enter a list title");
    assert!(state.lists.is_empty());
}

#[test]
fn update_sets_share_level_and_timestamp() {
    let mut state = state();
    let id = add_list(&mut state, "Groceries", 1_000);

    let effects = run(
        &mut state,
        AppAction::List(ListAction::Update {
            id,
            patch: ListPatch {
                shared: Some(3),
                ..ListPatch::default()
            },
        }),
        2_000,
    );

    let list = state.lists.get(id).expect("list");
    assert!(list.is_shared());
    assert_eq!(list.title, "Groceries");
    assert_eq!(list.updated_at, Some(at(2_000)));
    assert_eq!(messages(&effects), vec!["List updated successfully"]);
}

#[test]
fn update_rejects_share_level_below_one() {
    let mut state = state();
    let id = add_list(&mut state, "Groceries", 1_000);
    let result = reduce(
        &mut state,
        AppAction::List(ListAction::Update {
            id,
            patch: ListPatch {
                shared: Some(0),
                ..ListPatch::default()
            },
        }),
        at(2_000),
    );
    assert!(result.is_err());
    assert_eq!(state.lists.get(id).map(|list| list.shared), Some(1));
}

#[test]
fn recompute_count_leaves_updated_at_alone() {
    let mut store = crate::state::ListStore::default();
    let mut ids = crate::state::IdSequence::default();
    reduce_lists(
        &mut store,
        &mut ids,
        ListAction::Add(NewList::new("Groceries")),
        at(1_000),
    )
    .expect("add");
    let id = ListId(ids.last());

    let effects = reduce_lists(
        &mut store,
        &mut ids,
        ListAction::RecomputeCount { list_id: id, count: 4 },
        at(9_000),
    )
    .expect("recompute");
    assert_eq!(effects, vec![AppEffect::Persist(Section::Lists)]);
    let list = store.get(id).expect("list");
    assert_eq!(list.todo_count, 4);
    assert_eq!(list.updated_at, Some(at(1_000)));

    let effects = reduce_lists(
        &mut store,
        &mut ids,
        ListAction::RecomputeCount { list_id: id, count: 4 },
        at(10_000),
    )
    .expect("recompute");
    assert!(effects.is_empty());
}

#[test]
fn delete_unknown_list_is_silent() {
    let mut state = state();
    add_list(&mut state, "Groceries", 1_000);
    let effects = run(&mut state, AppAction::List(ListAction::Delete(ListId(5))), 2_000);
    assert!(effects.is_empty());
    assert_eq!(state.lists.len(), 1);
}

#[test]
fn delete_cascades_to_owned_todos_only() {
    let mut state = state();
    let groceries = add_list(&mut state, "Groceries", 1_000);
    let chores = add_list(&mut state, "Chores", 1_001);
    add_todo(&mut state, groceries, "Milk", 2_000);
    add_todo(&mut state, groceries, "Eggs", 2_001);
    let kept = add_todo(&mut state, chores, "Sweep", 2_002);

    let effects = run(&mut state, AppAction::List(ListAction::Delete(groceries)), 3_000);

    assert!(state.lists.get(groceries).is_none());
    assert_eq!(
        state.todos.items().iter().map(|todo| todo.id).collect::<Vec<_>>(),
        vec![kept]
    );
    assert_eq!(persisted(&effects), vec![Section::Todos, Section::Lists]);
    assert_eq!(messages(&effects), vec!["List \"Groceries\" deleted"]);
    assert_counts_in_sync(&state);
}
