use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;

pub(super) use super::reduce;
pub(super) use super::reduce_lists;
pub(super) use super::reduce_session;
pub(super) use super::reduce_todos;
pub(super) use super::AppEffect;
pub(super) use super::NotificationKind;
pub(super) use super::Section;
pub(super) use crate::actions::AppAction;
pub(super) use crate::actions::Credentials;
pub(super) use crate::actions::ListAction;
pub(super) use crate::actions::ListPatch;
pub(super) use crate::actions::LoginOrigin;
pub(super) use crate::actions::NewList;
pub(super) use crate::actions::NewTodo;
pub(super) use crate::actions::ProfilePatch;
pub(super) use crate::actions::SessionAction;
pub(super) use crate::actions::TodoAction;
pub(super) use crate::actions::TodoPatch;
pub(super) use crate::error::StoreError;
pub(super) use crate::state::AppState;
pub(super) use crate::state::ListId;
pub(super) use crate::state::LoginTicket;
pub(super) use crate::state::Priority;
pub(super) use crate::state::TodoId;
pub(super) use crate::state::UserId;

mod count_sync;
mod list_store;
mod todo_store;

fn state() -> AppState {
    AppState::new()
}

fn at(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .expect("valid timestamp")
}

fn run(state: &mut AppState, action: AppAction, ms: i64) -> Vec<AppEffect> {
    reduce(state, action, at(ms)).expect("action accepted")
}

fn add_list(state: &mut AppState, title: &str, ms: i64) -> ListId {
    run(state, AppAction::List(ListAction::Add(NewList::new(title))), ms);
    ListId(state.ids.last())
}

fn add_todo(state: &mut AppState, list_id: ListId, title: &str, ms: i64) -> TodoId {
    run(
        state,
        AppAction::Todo(TodoAction::Add(NewTodo::new(list_id, title))),
        ms,
    );
    TodoId(state.ids.last())
}

fn persisted(effects: &[AppEffect]) -> Vec<Section> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            AppEffect::Persist(section) => Some(*section),
            _ => None,
        })
        .collect()
}

fn messages(effects: &[AppEffect]) -> Vec<String> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            AppEffect::Notify(note) => Some(note.message.clone()),
            _ => None,
        })
        .collect()
}

fn count_of(state: &AppState, list_id: ListId) -> Option<u32> {
    state.lists.get(list_id).map(|list| list.todo_count)
}

fn assert_counts_in_sync(state: &AppState) {
    for list in state.lists.lists() {
        let actual = state.todos.in_list(list.id).count() as u32;
        assert_eq!(
            list.todo_count, actual,
            "list {} reports {} todos but has {}",
            list.id, list.todo_count, actual
        );
    }
}
