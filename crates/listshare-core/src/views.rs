//! Derived views over the list and todo stores.
//!
//! Everything here is a pure function of store snapshots plus UI parameters.
//! Inputs are borrowed and never reordered; results are new vectors of
//! references in display order. Sorts are stable, so ties keep store order.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;

use super::state::ListId;
use super::state::Priority;
use super::state::Todo;
use super::state::TodoList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    #[default]
    All,
    Shared,
    Private,
}

impl ListFilter {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Shared => "shared",
            Self::Private => "private",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "all" => Some(Self::All),
            "shared" => Some(Self::Shared),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    fn keeps(self, list: &TodoList) -> bool {
        match self {
            Self::All => true,
            Self::Shared => list.is_shared(),
            Self::Private => !list.is_shared(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListSort {
    #[default]
    Recent,
    Name,
    Todos,
}

impl ListSort {
    pub fn label(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Name => "name",
            Self::Todos => "todos",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "recent" => Some(Self::Recent),
            "name" => Some(Self::Name),
            "todos" => Some(Self::Todos),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoFilter {
    #[default]
    All,
    Completed,
    Pending,
    HighPriority,
    Overdue,
}

impl TodoFilter {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::HighPriority => "high-priority",
            Self::Overdue => "overdue",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "all" => Some(Self::All),
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            "high-priority" => Some(Self::HighPriority),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    fn keeps(self, todo: &Todo, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Completed => todo.completed,
            Self::Pending => !todo.completed,
            Self::HighPriority => todo.priority == Priority::High,
            Self::Overdue => todo.is_overdue(today),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodoSort {
    #[default]
    CreatedAt,
    Title,
    DueDate,
    Priority,
    Completed,
}

impl TodoSort {
    pub fn label(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Title => "title",
            Self::DueDate => "dueDate",
            Self::Priority => "priority",
            Self::Completed => "completed",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "createdAt" | "created" => Some(Self::CreatedAt),
            "title" => Some(Self::Title),
            "dueDate" | "due" => Some(Self::DueDate),
            "priority" => Some(Self::Priority),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search_term: String,
    pub filter: ListFilter,
    pub sort: ListSort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoQuery {
    pub search_term: String,
    pub filter: TodoFilter,
    pub sort: TodoSort,
    pub selected_list: Option<ListId>,
    /// Start-of-today boundary for the overdue filter.
    pub today: NaiveDate,
}

impl TodoQuery {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            search_term: String::new(),
            filter: TodoFilter::All,
            sort: TodoSort::CreatedAt,
            selected_list: None,
            today,
        }
    }
}

pub fn filter_and_sort_lists<'a>(lists: &'a [TodoList], query: &ListQuery) -> Vec<&'a TodoList> {
    let needle = query.search_term.to_lowercase();
    let mut filtered: Vec<&TodoList> = lists
        .iter()
        .filter(|list| {
            needle.is_empty()
                || list.title.to_lowercase().contains(&needle)
                || list.description.to_lowercase().contains(&needle)
        })
        .filter(|list| query.filter.keeps(list))
        .collect();

    match query.sort {
        ListSort::Name => filtered.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        ListSort::Todos => filtered.sort_by(|a, b| b.todo_count.cmp(&a.todo_count)),
        ListSort::Recent => filtered.sort_by(|a, b| b.last_touched().cmp(&a.last_touched())),
    }
    filtered
}

pub fn filter_and_sort_todos<'a>(todos: &'a [Todo], query: &TodoQuery) -> Vec<&'a Todo> {
    let needle = query.search_term.to_lowercase();
    let mut filtered: Vec<&Todo> = todos
        .iter()
        .filter(|todo| {
            query
                .selected_list
                .map_or(true, |list_id| todo.list_id == list_id)
        })
        .filter(|todo| {
            needle.is_empty()
                || todo.title.to_lowercase().contains(&needle)
                || todo.assignee.to_lowercase().contains(&needle)
        })
        .filter(|todo| query.filter.keeps(todo, query.today))
        .collect();

    match query.sort {
        TodoSort::Title => filtered.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        TodoSort::DueDate => filtered.sort_by(|a, b| compare_due_dates(a.due_date, b.due_date)),
        TodoSort::Priority => filtered.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        TodoSort::Completed => filtered.sort_by(|a, b| a.completed.cmp(&b.completed)),
        TodoSort::CreatedAt => filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    filtered
}

/// Case-insensitive first, then byte order so the result is total.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Ascending; todos without a due date go last.
fn compare_due_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn of<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> Self {
        todos
            .into_iter()
            .fold(Self::default(), |mut progress, todo| {
                progress.total += 1;
                if todo.completed {
                    progress.completed += 1;
                }
                progress
            })
    }

    pub fn ratio(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }

    pub fn percent(self) -> u32 {
        (self.ratio() * 100.0).round() as u32
    }
}

/// Card progress for one list: completed todos over the cached `todoCount`.
pub fn list_progress(list: &TodoList, todos: &[Todo]) -> Progress {
    let completed = todos
        .iter()
        .filter(|todo| todo.list_id == list.id && todo.completed)
        .count();
    Progress {
        completed,
        total: list.todo_count as usize,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub lists: usize,
    pub total: usize,
    pub completed: usize,
    pub due_today: usize,
}

impl DashboardStats {
    pub fn compute(lists: &[TodoList], todos: &[Todo], today: NaiveDate) -> Self {
        let progress = Progress::of(todos);
        Self {
            lists: lists.len(),
            total: progress.total,
            completed: progress.completed,
            due_today: todos
                .iter()
                .filter(|todo| todo.due_date == Some(today))
                .count(),
        }
    }
}

/// Lists whose cached `todoCount` disagrees with the todo store, paired with
/// the correct count. One pass reaches the fixed point.
pub fn count_sync_updates(lists: &[TodoList], todos: &[Todo]) -> Vec<(ListId, u32)> {
    let mut counts: HashMap<ListId, u32> = HashMap::new();
    for todo in todos {
        *counts.entry(todo.list_id).or_default() += 1;
    }
    lists
        .iter()
        .filter_map(|list| {
            let count = counts.get(&list.id).copied().unwrap_or(0);
            (count != list.todo_count).then_some((list.id, count))
        })
        .collect()
}
