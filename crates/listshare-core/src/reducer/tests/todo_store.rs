use super::*;
use pretty_assertions::assert_eq;

#[test]
fn add_appends_with_defaults_and_trimmed_title() {
    let mut state = state();
    let list = add_list(&mut state, "Groceries", 1_000);

    let effects = run(
        &mut state,
        AppAction::Todo(TodoAction::Add(NewTodo::new(list, "  Milk  "))),
        2_000,
    );

    assert_eq!(state.todos.len(), 1);
    let todo = &state.todos.items()[0];
    assert_eq!(todo.title, "Milk");
    assert_eq!(todo.list_id, list);
    assert!(!todo.completed);
    assert_eq!(todo.priority, Priority::Medium);
    assert_eq!(todo.assignee, "Unassigned");
    assert_eq!(todo.due_date, None);
    assert_eq!(todo.created_at, at(2_000));
    assert_eq!(todo.updated_at, at(2_000));
    assert_eq!(persisted(&effects), vec![Section::Todos, Section::Lists]);
    assert_eq!(messages(&effects), vec!["Task \"Milk\" added successfully"]);
}

#[test]
fn add_assigns_unique_ids_within_one_millisecond() {
    let mut state = state();
    let list = add_list(&mut state, "Groceries", 1_000);
    let first = add_todo(&mut state, list, "Milk", 2_000);
    let second = add_todo(&mut state, list, "Eggs", 2_000);
    let third = add_todo(&mut state, list, "Bread", 2_000);

    assert!(first < second && second < third);
    assert_eq!(state.todos.len(), 3);
}

#[test]
fn whitespace_title_is_rejected_without_change() {
    let mut state = state();
    let list = add_list(&mut state, "Groceries", 1_000);
    let before = state.clone();

    let err = reduce(
        &mut state,
        AppAction::Todo(TodoAction::Add(NewTodo::new(list, " \t "))),
        at(2_000),
    )
    .expect_err("blank title");

    assert_eq!(err, StoreError::validation("Please enter a task title"));
    assert_eq!(state.todos, before.todos);
    assert_eq!(state.lists, before.lists);
}

#[test]
fn toggle_twice_restores_completion_and_bumps_updated_at() {
    let mut state = state();
    let list = add_list(&mut state, "Groceries", 1_000);
    let id = add_todo(&mut state, list, "Milk", 2_000);

    let effects = run(&mut state, AppAction::Todo(TodoAction::Toggle(id)), 3_000);
    assert_eq!(messages(&effects), vec!["Task \"Milk\" marked as complete"]);
    assert!(state.todos.get(id).is_some_and(|todo| todo.completed));

    let effects = run(&mut state, AppAction::Todo(TodoAction::Toggle(id)), 4_000);
    assert_eq!(messages(&effects), vec!["Task \"Milk\" marked as incomplete"]);
    let todo = state.todos.get(id).expect("todo");
    assert!(!todo.completed);
    assert_eq!(todo.updated_at, at(4_000));
}

#[test]
fn update_merges_only_given_fields() {
    let mut state = state();
    let list = add_list(&mut state, "Groceries", 1_000);
    let id = add_todo(&mut state, list, "Milk", 2_000);
    let due = chrono::NaiveDate::from_ymd_opt(2024, 5, 1);

    let effects = run(
        &mut state,
        AppAction::Todo(TodoAction::Update {
            id,
            patch: TodoPatch {
                priority: Some(Priority::High),
                due_date: Some(due),
                assignee: Some("  ".to_string()),
                ..TodoPatch::default()
            },
        }),
        3_000,
    );

    let todo = state.todos.get(id).expect("todo");
    assert_eq!(todo.title, "Milk");
    assert_eq!(todo.priority, Priority::High);
    assert_eq!(todo.due_date, due);
    assert_eq!(todo.assignee, "Unassigned");
    assert_eq!(todo.created_at, at(2_000));
    assert_eq!(todo.updated_at, at(3_000));
    assert_eq!(messages(&effects), vec!["Task updated successfully"]);

    run(
        &mut state,
        AppAction::Todo(TodoAction::Update {
            id,
            patch: TodoPatch {
                due_date: Some(None),
                ..TodoPatch::default()
            },
        }),
        4_000,
    );
    assert_eq!(state.todos.get(id).and_then(|todo| todo.due_date), None);
}

#[test]
fn update_with_blank_title_is_rejected() {
    let mut state = state();
    let list = add_list(&mut state, "Groceries", 1_000);
    let id = add_todo(&mut state, list, "Milk", 2_000);

    let result = reduce(
        &mut state,
        AppAction::Todo(TodoAction::Update {
            id,
            patch: TodoPatch {
                title: Some("   ".to_string()),
                ..TodoPatch::default()
            },
        }),
        at(3_000),
    );

    assert!(result.is_err());
    assert_eq!(state.todos.get(id).map(|todo| todo.title.as_str()), Some("Milk"));
}

#[test]
fn unknown_ids_are_silent_no_ops() {
    let mut state = state();
    let list = add_list(&mut state, "Groceries", 1_000);
    add_todo(&mut state, list, "Milk", 2_000);
    let before = state.clone();
    let missing = TodoId(999_999);

    for action in [
        TodoAction::Toggle(missing),
        TodoAction::Delete(missing),
        TodoAction::Update {
            id: missing,
            patch: TodoPatch {
                completed: Some(true),
                ..TodoPatch::default()
            },
        },
    ] {
        let effects = run(&mut state, AppAction::Todo(action), 3_000);
        assert!(effects.is_empty());
    }
    assert_eq!(state.todos, before.todos);
    assert_eq!(state.lists, before.lists);
}

#[test]
fn add_to_missing_list_is_ignored() {
    let mut state = state();
    let effects = run(
        &mut state,
        AppAction::Todo(TodoAction::Add(NewTodo::new(ListId(42), "Orphan"))),
        1_000,
    );
    assert!(effects.is_empty());
    assert!(state.todos.is_empty());
}

#[test]
fn load_all_replaces_and_seeds_ids() {
    let mut store = crate::state::TodoStore::default();
    let mut ids = crate::state::IdSequence::default();
    let mut scratch = state();
    let list = add_list(&mut scratch, "Groceries", 1_000);
    add_todo(&mut scratch, list, "Milk", 5_000_000);
    let loaded = scratch.todos.items().to_vec();

    let effects = reduce_todos(&mut store, &mut ids, TodoAction::LoadAll(loaded.clone()), at(10))
        .expect("load");
    assert_eq!(effects, vec![AppEffect::Persist(Section::Todos)]);
    assert_eq!(store.items(), loaded.as_slice());
    assert!(ids.next(at(10)) > loaded[0].id.0);
}
