use super::*;
use pretty_assertions::assert_eq;

#[test]
fn two_todos_then_one_deleted_leaves_count_one() {
    let mut state = state();
    let list = add_list(&mut state, "Groceries", 1_000);
    let milk = add_todo(&mut state, list, "Milk", 2_000);
    add_todo(&mut state, list, "Eggs", 2_001);
    assert_eq!(count_of(&state, list), Some(2));

    run(&mut state, AppAction::Todo(TodoAction::Delete(milk)), 3_000);
    assert_eq!(count_of(&state, list), Some(1));
}

#[test]
fn count_sync_does_not_touch_updated_at() {
    let mut state = state();
    let list = add_list(&mut state, "Groceries", 1_000);
    add_todo(&mut state, list, "Milk", 5_000);
    assert_eq!(
        state.lists.get(list).and_then(|list| list.updated_at),
        Some(at(1_000))
    );
}

#[test]
fn toggle_keeps_count_and_skips_list_persist() {
    let mut state = state();
    let list = add_list(&mut state, "Groceries", 1_000);
    let id = add_todo(&mut state, list, "Milk", 2_000);

    let effects = run(&mut state, AppAction::Todo(TodoAction::Toggle(id)), 3_000);
    assert_eq!(persisted(&effects), vec![Section::Todos]);
    assert_eq!(count_of(&state, list), Some(1));
}

#[test]
fn loaded_lists_are_reconciled_with_loaded_todos() {
    let mut scratch = state();
    let list = add_list(&mut scratch, "Groceries", 1_000);
    add_todo(&mut scratch, list, "Milk", 2_000);
    add_todo(&mut scratch, list, "Eggs", 2_001);
    let todos = scratch.todos.items().to_vec();
    let mut lists = scratch.lists.lists().to_vec();
    lists[0].todo_count = 9;

    let mut state = state();
    run(&mut state, AppAction::Todo(TodoAction::LoadAll(todos)), 3_000);
    run(&mut state, AppAction::List(ListAction::LoadAll(lists)), 3_000);

    assert_eq!(count_of(&state, list), Some(2));
    assert_counts_in_sync(&state);
}

#[test]
fn explicit_recompute_is_applied_verbatim() {
    let mut state = state();
    let list = add_list(&mut state, "Groceries", 1_000);
    run(
        &mut state,
        AppAction::List(ListAction::RecomputeCount {
            list_id: list,
            count: 3,
        }),
        2_000,
    );
    assert_eq!(count_of(&state, list), Some(3));

    add_todo(&mut state, list, "Milk", 3_000);
    assert_eq!(count_of(&state, list), Some(1));
}
