use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_ASSIGNEE: &str = "Unassigned";
pub const PRIVATE_SHARE_LEVEL: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoginTicket(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LoginTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "login-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// The single authenticated session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_authenticated: bool,
    pub login_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// List metadata. Items live in [`TodoStore`] and reference the list by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: ListId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Access-level placeholder: 1 is private, anything above is shared.
    pub shared: u32,
    /// Denormalized count of todos referencing this list, refreshed by the
    /// count-sync pass after every todo mutation.
    #[serde(default)]
    pub todo_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub owner: Option<UserId>,
}

impl TodoList {
    pub fn is_shared(&self) -> bool {
        self.shared > PRIVATE_SHARE_LEVEL
    }

    pub fn last_touched(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub list_id: ListId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, with = "due_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_assignee")]
    pub assignee: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

fn default_assignee() -> String {
    DEFAULT_ASSIGNEE.to_string()
}

pub fn parse_due_date(text: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(text.trim(), DUE_DATE_FORMAT)
}

/// `dueDate` is written as `"YYYY-MM-DD"` or `""`; `null` is accepted on load.
mod due_date {
    use chrono::NaiveDate;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    use super::DUE_DATE_FORMAT;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format(DUE_DATE_FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => super::parse_due_date(text)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoStore {
    pub(crate) items: Vec<Todo>,
}

impl TodoStore {
    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.items.iter().find(|todo| todo.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn in_list(&self, list_id: ListId) -> impl Iterator<Item = &Todo> {
        self.items.iter().filter(move |todo| todo.list_id == list_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListStore {
    pub(crate) lists: Vec<TodoList>,
}

impl ListStore {
    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    pub fn get(&self, id: ListId) -> Option<&TodoList> {
        self.lists.iter().find(|list| list.id == id)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) user: Option<User>,
    pub(crate) pending_login: Option<LoginTicket>,
    pub(crate) next_ticket: u64,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn pending_login(&self) -> Option<LoginTicket> {
        self.pending_login
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_authenticated)
    }
}

/// Id source shared by users, lists and todos.
///
/// Ids follow the wall clock in milliseconds but never repeat: the next id is
/// `max(last + 1, now_ms)`, so ids stay unique after deletes and across
/// restarts as long as the sequence is seeded with every loaded id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    pub fn observe(&mut self, id: u64) {
        self.last = self.last.max(id);
    }

    pub fn next(&mut self, now: DateTime<Utc>) -> u64 {
        let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = self.last.saturating_add(1).max(now_ms);
        self.last = id;
        id
    }

    pub fn last(&self) -> u64 {
        self.last
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: SessionState,
    pub todos: TodoStore,
    pub lists: ListStore,
    pub ids: IdSequence,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.user()
    }
}
