use chrono::NaiveDate;

use super::state::ListId;
use super::state::LoginTicket;
use super::state::Priority;
use super::state::Todo;
use super::state::TodoId;
use super::state::TodoList;
use super::state::UserId;

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Session(SessionAction),
    Todo(TodoAction),
    List(ListAction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    Login(Credentials),
    Logout,
    UpdateProfile(ProfilePatch),
    BeginLogin,
    CompleteLogin {
        ticket: LoginTicket,
        credentials: Credentials,
    },
    CancelLogin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TodoAction {
    Add(NewTodo),
    Toggle(TodoId),
    Update { id: TodoId, patch: TodoPatch },
    Delete(TodoId),
    LoadAll(Vec<Todo>),
    ClearAll,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    Add(NewList),
    Update { id: ListId, patch: ListPatch },
    Delete(ListId),
    RecomputeCount { list_id: ListId, count: u32 },
    LoadAll(Vec<TodoList>),
    ClearAll,
}

/// How a session came to exist; only changes the welcome message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginOrigin {
    #[default]
    SignIn,
    Register,
    Restore,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub id: Option<UserId>,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub origin: LoginOrigin,
}

impl Credentials {
    pub fn sign_in(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub list_id: ListId,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
}

impl NewTodo {
    pub fn new(list_id: ListId, title: impl Into<String>) -> Self {
        Self {
            list_id,
            title: title.into(),
            description: String::new(),
            due_date: None,
            priority: None,
            assignee: None,
        }
    }
}

/// Fields to merge into an existing todo. `due_date: Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewList {
    pub title: String,
    pub description: String,
    pub owner: Option<UserId>,
}

impl NewList {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            owner: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub shared: Option<u32>,
}

impl ListPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
