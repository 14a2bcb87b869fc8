use chrono::DateTime;
use chrono::Utc;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::actions::AppAction;
use super::actions::Credentials;
use super::actions::ListAction;
use super::actions::ListPatch;
use super::actions::LoginOrigin;
use super::actions::ProfilePatch;
use super::actions::SessionAction;
use super::actions::TodoAction;
use super::actions::TodoPatch;
use super::error::StoreError;
use super::state::AppState;
use super::state::IdSequence;
use super::state::ListId;
use super::state::ListStore;
use super::state::LoginTicket;
use super::state::SessionState;
use super::state::Todo;
use super::state::TodoId;
use super::state::TodoList;
use super::state::TodoStore;
use super::state::User;
use super::state::UserId;
use super::state::DEFAULT_ASSIGNEE;
use super::state::PRIVATE_SHARE_LEVEL;
use super::views::count_sync_updates;

pub const TODO_TITLE_REQUIRED: &str = "Please enter a task title";
pub const LIST_TITLE_REQUIRED: &str = "Please enter a list title";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Todos,
    Lists,
    User,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::Todos => "todos",
            Self::Lists => "todoLists",
            Self::User => "user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEffect {
    Persist(Section),
    LoginPending(LoginTicket),
    Notify(Notification),
}

/// Applies one action to the whole application state.
///
/// Cross-store rules live here and only here: logout clears both collections,
/// deleting a list first deletes its todos, and every todo mutation is
/// followed by a count-sync pass over the post-mutation snapshot. On `Err`
/// the state is untouched.
pub fn reduce(
    state: &mut AppState,
    action: AppAction,
    now: DateTime<Utc>,
) -> Result<Vec<AppEffect>, StoreError> {
    let mut effects = match action {
        AppAction::Session(action) => reduce_session_action(state, action, now)?,
        AppAction::Todo(action) => reduce_todo_action(state, action, now)?,
        AppAction::List(action) => reduce_list_action(state, action, now)?,
    };
    dedupe_persist(&mut effects);
    Ok(effects)
}

fn reduce_session_action(
    state: &mut AppState,
    action: SessionAction,
    now: DateTime<Utc>,
) -> Result<Vec<AppEffect>, StoreError> {
    match action {
        SessionAction::Logout => {
            let mut effects = reduce_session(
                &mut state.session,
                &mut state.ids,
                SessionAction::Logout,
                now,
            )?;
            effects.extend(reduce_todos(
                &mut state.todos,
                &mut state.ids,
                TodoAction::ClearAll,
                now,
            )?);
            effects.extend(reduce_lists(
                &mut state.lists,
                &mut state.ids,
                ListAction::ClearAll,
                now,
            )?);
            Ok(effects)
        }
        other => reduce_session(&mut state.session, &mut state.ids, other, now),
    }
}

fn reduce_todo_action(
    state: &mut AppState,
    action: TodoAction,
    now: DateTime<Utc>,
) -> Result<Vec<AppEffect>, StoreError> {
    if let TodoAction::Add(new) = &action {
        if !new.title.trim().is_empty() && state.lists.get(new.list_id).is_none() {
            debug!(list_id = %new.list_id, "add todo ignored: list not found");
            return Ok(Vec::new());
        }
    }

    let mut effects = reduce_todos(&mut state.todos, &mut state.ids, action, now)?;
    sync_todo_counts(state, &mut effects);
    Ok(effects)
}

fn reduce_list_action(
    state: &mut AppState,
    action: ListAction,
    now: DateTime<Utc>,
) -> Result<Vec<AppEffect>, StoreError> {
    match action {
        ListAction::Delete(list_id) => {
            if state.lists.get(list_id).is_none() {
                debug!(list_id = %list_id, "delete list ignored: list not found");
                return Ok(Vec::new());
            }

            let doomed: Vec<TodoId> = state.todos.in_list(list_id).map(|todo| todo.id).collect();
            let mut effects = Vec::new();
            for todo_id in doomed {
                let cascade = reduce_todos(
                    &mut state.todos,
                    &mut state.ids,
                    TodoAction::Delete(todo_id),
                    now,
                )?;
                effects.extend(
                    cascade
                        .into_iter()
                        .filter(|effect| matches!(effect, AppEffect::Persist(_))),
                );
            }
            effects.extend(reduce_lists(
                &mut state.lists,
                &mut state.ids,
                ListAction::Delete(list_id),
                now,
            )?);
            sync_todo_counts(state, &mut effects);
            Ok(effects)
        }
        ListAction::LoadAll(lists) => {
            let mut effects =
                reduce_lists(&mut state.lists, &mut state.ids, ListAction::LoadAll(lists), now)?;
            sync_todo_counts(state, &mut effects);
            Ok(effects)
        }
        other => reduce_lists(&mut state.lists, &mut state.ids, other, now),
    }
}

/// Session transitions. Knows nothing about the other stores.
pub fn reduce_session(
    session: &mut SessionState,
    ids: &mut IdSequence,
    action: SessionAction,
    now: DateTime<Utc>,
) -> Result<Vec<AppEffect>, StoreError> {
    match action {
        SessionAction::Login(credentials) => {
            if let Some(previous) = session.pending_login.take() {
                info!(superseded = %previous, "pending login superseded by direct login");
            }
            Ok(login(session, ids, credentials, now))
        }
        SessionAction::Logout => {
            session.user = None;
            session.pending_login = None;
            info!("session ended");
            Ok(vec![
                AppEffect::Persist(Section::User),
                AppEffect::Notify(Notification::success("Logged out successfully")),
            ])
        }
        SessionAction::UpdateProfile(patch) => {
            let Some(user) = session.user.as_mut() else {
                debug!("profile update ignored: no active session");
                return Ok(Vec::new());
            };
            apply_profile_patch(user, patch);
            user.updated_at = Some(now);
            Ok(vec![
                AppEffect::Persist(Section::User),
                AppEffect::Notify(Notification::success("Profile updated successfully")),
            ])
        }
        SessionAction::BeginLogin => {
            session.next_ticket = session.next_ticket.saturating_add(1);
            let ticket = LoginTicket(session.next_ticket);
            if let Some(previous) = session.pending_login.replace(ticket) {
                info!(superseded = %previous, ticket = %ticket, "login attempt superseded");
            }
            Ok(vec![AppEffect::LoginPending(ticket)])
        }
        SessionAction::CompleteLogin {
            ticket,
            credentials,
        } => {
            if session.pending_login != Some(ticket) {
                warn!(ticket = %ticket, "stale login completion ignored");
                return Ok(Vec::new());
            }
            session.pending_login = None;
            Ok(login(session, ids, credentials, now))
        }
        SessionAction::CancelLogin => {
            if let Some(ticket) = session.pending_login.take() {
                info!(ticket = %ticket, "pending login cancelled");
            }
            Ok(Vec::new())
        }
    }
}

fn login(
    session: &mut SessionState,
    ids: &mut IdSequence,
    credentials: Credentials,
    now: DateTime<Utc>,
) -> Vec<AppEffect> {
    let Credentials {
        id,
        username,
        email,
        full_name,
        origin,
    } = credentials;

    let id = match id {
        Some(id) => {
            ids.observe(id.0);
            id
        }
        None => UserId(ids.next(now)),
    };
    let email = email
        .filter(|email| !email.trim().is_empty())
        .unwrap_or_else(|| format!("{username}@example.com"));
    let full_name = full_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| username.clone());

    let user = User {
        id,
        username,
        email,
        full_name,
        is_authenticated: true,
        login_time: now,
        updated_at: None,
    };
    info!(user_id = %user.id, username = %user.username, "session started");

    let mut effects = vec![AppEffect::Persist(Section::User)];
    match origin {
        LoginOrigin::SignIn => effects.push(AppEffect::Notify(Notification::success(format!(
            "Welcome back, {}!",
            user.full_name
        )))),
        LoginOrigin::Register => effects.push(AppEffect::Notify(Notification::success(format!(
            "Welcome to listshare, {}!",
            user.full_name
        )))),
        LoginOrigin::Restore => {}
    }
    session.user = Some(user);
    effects
}

fn apply_profile_patch(user: &mut User, patch: ProfilePatch) {
    if let Some(username) = patch.username {
        user.username = username;
    }
    if let Some(email) = patch.email {
        user.email = email;
    }
    if let Some(full_name) = patch.full_name {
        user.full_name = full_name;
    }
}

/// Todo collection transitions. Insertion order is preserved.
pub fn reduce_todos(
    store: &mut TodoStore,
    ids: &mut IdSequence,
    action: TodoAction,
    now: DateTime<Utc>,
) -> Result<Vec<AppEffect>, StoreError> {
    match action {
        TodoAction::Add(new) => {
            let title = new.title.trim();
            if title.is_empty() {
                return Err(StoreError::validation(TODO_TITLE_REQUIRED));
            }
            let todo = Todo {
                id: TodoId(ids.next(now)),
                list_id: new.list_id,
                title: title.to_string(),
                description: new.description.trim().to_string(),
                completed: false,
                due_date: new.due_date,
                priority: new.priority.unwrap_or_default(),
                assignee: assignee_or_default(new.assignee),
                created_at: now,
                updated_at: now,
            };
            let message = format!("Task \"{}\" added successfully", todo.title);
            debug!(todo_id = %todo.id, list_id = %todo.list_id, "todo added");
            store.items.push(todo);
            Ok(vec![
                AppEffect::Persist(Section::Todos),
                AppEffect::Notify(Notification::success(message)),
            ])
        }
        TodoAction::Toggle(id) => {
            let Some(todo) = store.items.iter_mut().find(|todo| todo.id == id) else {
                debug!(todo_id = %id, "toggle ignored: todo not found");
                return Ok(Vec::new());
            };
            todo.completed = !todo.completed;
            todo.updated_at = now;
            let marked = if todo.completed {
                "complete"
            } else {
                "incomplete"
            };
            Ok(vec![
                AppEffect::Persist(Section::Todos),
                AppEffect::Notify(Notification::success(format!(
                    "Task \"{}\" marked as {marked}",
                    todo.title
                ))),
            ])
        }
        TodoAction::Update { id, patch } => {
            if patch
                .title
                .as_deref()
                .is_some_and(|title| title.trim().is_empty())
            {
                return Err(StoreError::validation(TODO_TITLE_REQUIRED));
            }
            let Some(todo) = store.items.iter_mut().find(|todo| todo.id == id) else {
                debug!(todo_id = %id, "update ignored: todo not found");
                return Ok(Vec::new());
            };
            apply_todo_patch(todo, patch);
            todo.updated_at = now;
            Ok(vec![
                AppEffect::Persist(Section::Todos),
                AppEffect::Notify(Notification::success("Task updated successfully")),
            ])
        }
        TodoAction::Delete(id) => {
            let Some(index) = store.items.iter().position(|todo| todo.id == id) else {
                debug!(todo_id = %id, "delete ignored: todo not found");
                return Ok(Vec::new());
            };
            let removed = store.items.remove(index);
            Ok(vec![
                AppEffect::Persist(Section::Todos),
                AppEffect::Notify(Notification::success(format!(
                    "Task \"{}\" deleted",
                    removed.title
                ))),
            ])
        }
        TodoAction::LoadAll(todos) => {
            for todo in &todos {
                ids.observe(todo.id.0);
            }
            store.items = todos;
            Ok(vec![AppEffect::Persist(Section::Todos)])
        }
        TodoAction::ClearAll => {
            store.items.clear();
            Ok(vec![AppEffect::Persist(Section::Todos)])
        }
    }
}

fn apply_todo_patch(todo: &mut Todo, patch: TodoPatch) {
    if let Some(title) = patch.title {
        todo.title = title.trim().to_string();
    }
    if let Some(description) = patch.description {
        todo.description = description;
    }
    if let Some(completed) = patch.completed {
        todo.completed = completed;
    }
    if let Some(due_date) = patch.due_date {
        todo.due_date = due_date;
    }
    if let Some(priority) = patch.priority {
        todo.priority = priority;
    }
    if let Some(assignee) = patch.assignee {
        todo.assignee = assignee_or_default(Some(assignee));
    }
}

fn assignee_or_default(assignee: Option<String>) -> String {
    assignee
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_ASSIGNEE.to_string())
}

/// List metadata transitions. Deleting a list here does not touch todos;
/// the cascade is sequenced by [`reduce`].
pub fn reduce_lists(
    store: &mut ListStore,
    ids: &mut IdSequence,
    action: ListAction,
    now: DateTime<Utc>,
) -> Result<Vec<AppEffect>, StoreError> {
    match action {
        ListAction::Add(new) => {
            let title = new.title.trim();
            if title.is_empty() {
                return Err(StoreError::validation(LIST_TITLE_REQUIRED));
            }
            let list = TodoList {
                id: ListId(ids.next(now)),
                title: title.to_string(),
                description: new.description.trim().to_string(),
                shared: PRIVATE_SHARE_LEVEL,
                todo_count: 0,
                created_at: now,
                updated_at: Some(now),
                owner: new.owner,
            };
            let message = format!("List \"{}\" created successfully", list.title);
            debug!(list_id = %list.id, "list added");
            store.lists.push(list);
            Ok(vec![
                AppEffect::Persist(Section::Lists),
                AppEffect::Notify(Notification::success(message)),
            ])
        }
        ListAction::Update { id, patch } => {
            validate_list_patch(&patch)?;
            let Some(list) = store.lists.iter_mut().find(|list| list.id == id) else {
                debug!(list_id = %id, "update ignored: list not found");
                return Ok(Vec::new());
            };
            apply_list_patch(list, patch);
            list.updated_at = Some(now);
            Ok(vec![
                AppEffect::Persist(Section::Lists),
                AppEffect::Notify(Notification::success("List updated successfully")),
            ])
        }
        ListAction::Delete(id) => {
            let Some(index) = store.lists.iter().position(|list| list.id == id) else {
                debug!(list_id = %id, "delete ignored: list not found");
                return Ok(Vec::new());
            };
            let removed = store.lists.remove(index);
            Ok(vec![
                AppEffect::Persist(Section::Lists),
                AppEffect::Notify(Notification::success(format!(
                    "List \"{}\" deleted",
                    removed.title
                ))),
            ])
        }
        ListAction::RecomputeCount { list_id, count } => {
            if recompute_count(store, list_id, count) {
                Ok(vec![AppEffect::Persist(Section::Lists)])
            } else {
                Ok(Vec::new())
            }
        }
        ListAction::LoadAll(lists) => {
            for list in &lists {
                ids.observe(list.id.0);
            }
            store.lists = lists;
            Ok(vec![AppEffect::Persist(Section::Lists)])
        }
        ListAction::ClearAll => {
            store.lists.clear();
            Ok(vec![AppEffect::Persist(Section::Lists)])
        }
    }
}

fn validate_list_patch(patch: &ListPatch) -> Result<(), StoreError> {
    if patch
        .title
        .as_deref()
        .is_some_and(|title| title.trim().is_empty())
    {
        return Err(StoreError::validation(LIST_TITLE_REQUIRED));
    }
    if patch.shared.is_some_and(|shared| shared < PRIVATE_SHARE_LEVEL) {
        return Err(StoreError::validation("Share level must be at least 1"));
    }
    Ok(())
}

fn apply_list_patch(list: &mut TodoList, patch: ListPatch) {
    if let Some(title) = patch.title {
        list.title = title.trim().to_string();
    }
    if let Some(description) = patch.description {
        list.description = description;
    }
    if let Some(shared) = patch.shared {
        list.shared = shared;
    }
}

/// Writes a derived count without touching `updated_at`. Returns whether
/// anything changed.
fn recompute_count(store: &mut ListStore, list_id: ListId, count: u32) -> bool {
    match store.lists.iter_mut().find(|list| list.id == list_id) {
        Some(list) if list.todo_count != count => {
            list.todo_count = count;
            true
        }
        _ => false,
    }
}

fn sync_todo_counts(state: &mut AppState, effects: &mut Vec<AppEffect>) {
    let updates = count_sync_updates(state.lists.lists(), state.todos.items());
    let mut changed = false;
    for (list_id, count) in updates {
        changed |= recompute_count(&mut state.lists, list_id, count);
    }
    if changed {
        effects.push(AppEffect::Persist(Section::Lists));
    }
}

fn dedupe_persist(effects: &mut Vec<AppEffect>) {
    let mut seen: Vec<Section> = Vec::new();
    effects.retain(|effect| match effect {
        AppEffect::Persist(section) => {
            if seen.contains(section) {
                false
            } else {
                seen.push(*section);
                true
            }
        }
        _ => true,
    });
}

#[cfg(test)]
mod tests;
