//! The application facade: one place that dispatches actions, writes changed
//! sections through the persistence port and queues notifications for the
//! shell to display.

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use tracing::debug;
use tracing::error;

use super::actions::AppAction;
use super::actions::Credentials;
use super::actions::ListAction;
use super::actions::ListPatch;
use super::actions::LoginOrigin;
use super::actions::NewList;
use super::actions::NewTodo;
use super::actions::ProfilePatch;
use super::actions::SessionAction;
use super::actions::TodoAction;
use super::actions::TodoPatch;
use super::error::AppError;
use super::error::PersistenceError;
use super::error::StoreError;
use super::persistence::PersistedSnapshot;
use super::persistence::PersistencePort;
use super::persistence::SectionSnapshot;
use super::reducer::reduce;
use super::reducer::AppEffect;
use super::reducer::Notification;
use super::reducer::Section;
use super::state::AppState;
use super::state::ListId;
use super::state::LoginTicket;
use super::state::Todo;
use super::state::TodoId;
use super::state::TodoList;
use super::state::User;
use super::views::filter_and_sort_lists;
use super::views::filter_and_sort_todos;
use super::views::DashboardStats;
use super::views::ListQuery;
use super::views::TodoQuery;

pub struct App<P: PersistencePort> {
    state: AppState,
    port: P,
    settings: BTreeMap<String, serde_json::Value>,
    notifications: Vec<Notification>,
}

impl<P: PersistencePort> App<P> {
    /// Rehydrates from the port. Non-empty collections are loaded as-is and a
    /// saved user is signed back in under its stored id.
    pub fn open(port: P, now: DateTime<Utc>) -> Result<Self, AppError> {
        let PersistedSnapshot {
            todos,
            todo_lists,
            user,
            settings,
        } = port.load()?;

        let mut app = Self {
            state: AppState::new(),
            port,
            settings,
            notifications: Vec::new(),
        };

        if !todos.is_empty() {
            app.dispatch(AppAction::Todo(TodoAction::LoadAll(todos)), now)?;
        }
        if !todo_lists.is_empty() {
            app.dispatch(AppAction::List(ListAction::LoadAll(todo_lists)), now)?;
        }
        if let Some(user) = user {
            let credentials = Credentials {
                id: Some(user.id),
                username: user.username,
                email: Some(user.email),
                full_name: Some(user.full_name),
                origin: LoginOrigin::Restore,
            };
            app.dispatch(AppAction::Session(SessionAction::Login(credentials)), now)?;
        }
        debug!(
            todos = app.state.todos.len(),
            lists = app.state.lists.len(),
            signed_in = app.state.session.is_authenticated(),
            "state rehydrated"
        );
        Ok(app)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn todos(&self) -> &[Todo] {
        self.state.todos.items()
    }

    pub fn lists(&self) -> &[TodoList] {
        self.state.lists.lists()
    }

    pub fn user(&self) -> Option<&User> {
        self.state.current_user()
    }

    pub fn lists_view(&self, query: &ListQuery) -> Vec<&TodoList> {
        filter_and_sort_lists(self.lists(), query)
    }

    pub fn todos_view(&self, query: &TodoQuery) -> Vec<&Todo> {
        filter_and_sort_todos(self.todos(), query)
    }

    pub fn stats(&self, today: NaiveDate) -> DashboardStats {
        DashboardStats::compute(self.lists(), self.todos(), today)
    }

    /// The live state in its persisted shape.
    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            todos: self.todos().to_vec(),
            todo_lists: self.lists().to_vec(),
            user: self.user().cloned(),
            settings: self.settings.clone(),
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn login(&mut self, credentials: Credentials, now: DateTime<Utc>) -> Result<(), AppError> {
        self.dispatch(AppAction::Session(SessionAction::Login(credentials)), now)
            .map(drop)
    }

    /// Ends the session, clears both collections and wipes stored data.
    pub fn logout(&mut self, now: DateTime<Utc>) -> Result<(), AppError> {
        self.dispatch(AppAction::Session(SessionAction::Logout), now)?;
        self.port.reset().map_err(|err| self.persistence_failed("all", err))
    }

    pub fn update_profile(
        &mut self,
        patch: ProfilePatch,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.dispatch(AppAction::Session(SessionAction::UpdateProfile(patch)), now)
            .map(drop)
    }

    /// Starts a delayed login. Any earlier pending attempt is superseded.
    pub fn begin_login(&mut self, now: DateTime<Utc>) -> Result<LoginTicket, AppError> {
        let effects = self.dispatch(AppAction::Session(SessionAction::BeginLogin), now)?;
        effects
            .into_iter()
            .find_map(|effect| match effect {
                AppEffect::LoginPending(ticket) => Some(ticket),
                _ => None,
            })
            .ok_or_else(|| StoreError::validation("login attempt was not started").into())
    }

    /// Returns whether the completion was applied; stale tickets are ignored.
    pub fn complete_login(
        &mut self,
        ticket: LoginTicket,
        credentials: Credentials,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let effects = self.dispatch(
            AppAction::Session(SessionAction::CompleteLogin {
                ticket,
                credentials,
            }),
            now,
        )?;
        Ok(!effects.is_empty())
    }

    pub fn cancel_login(&mut self, now: DateTime<Utc>) -> Result<(), AppError> {
        self.dispatch(AppAction::Session(SessionAction::CancelLogin), now)
            .map(drop)
    }

    /// Returns the new todo's id, or `None` when its list does not exist.
    pub fn add_todo(
        &mut self,
        new: NewTodo,
        now: DateTime<Utc>,
    ) -> Result<Option<TodoId>, AppError> {
        let before = self.state.todos.len();
        self.dispatch(AppAction::Todo(TodoAction::Add(new)), now)?;
        Ok((self.state.todos.len() > before).then(|| TodoId(self.state.ids.last())))
    }

    pub fn toggle_todo(&mut self, id: TodoId, now: DateTime<Utc>) -> Result<(), AppError> {
        self.dispatch(AppAction::Todo(TodoAction::Toggle(id)), now)
            .map(drop)
    }

    pub fn update_todo(
        &mut self,
        id: TodoId,
        patch: TodoPatch,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.dispatch(AppAction::Todo(TodoAction::Update { id, patch }), now)
            .map(drop)
    }

    pub fn delete_todo(&mut self, id: TodoId, now: DateTime<Utc>) -> Result<(), AppError> {
        self.dispatch(AppAction::Todo(TodoAction::Delete(id)), now)
            .map(drop)
    }

    /// New lists are owned by the signed-in user when there is one.
    pub fn add_list(&mut self, mut new: NewList, now: DateTime<Utc>) -> Result<ListId, AppError> {
        if new.owner.is_none() {
            new.owner = self.user().map(|user| user.id);
        }
        self.dispatch(AppAction::List(ListAction::Add(new)), now)?;
        Ok(ListId(self.state.ids.last()))
    }

    pub fn update_list(
        &mut self,
        id: ListId,
        patch: ListPatch,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.dispatch(AppAction::List(ListAction::Update { id, patch }), now)
            .map(drop)
    }

    /// Deletes the list and, before it, every todo that belongs to it.
    pub fn delete_list(&mut self, id: ListId, now: DateTime<Utc>) -> Result<(), AppError> {
        self.dispatch(AppAction::List(ListAction::Delete(id)), now)
            .map(drop)
    }

    fn dispatch(
        &mut self,
        action: AppAction,
        now: DateTime<Utc>,
    ) -> Result<Vec<AppEffect>, AppError> {
        let effects = match reduce(&mut self.state, action, now) {
            Ok(effects) => effects,
            Err(err) => {
                debug!(
                    category = err.category().label(),
                    message = err.message(),
                    "action rejected"
                );
                self.notifications.push(Notification::error(err.message()));
                return Err(err.into());
            }
        };

        for effect in &effects {
            match effect {
                AppEffect::Persist(section) => self.persist(*section)?,
                AppEffect::Notify(notification) => self.notifications.push(notification.clone()),
                AppEffect::LoginPending(_) => {}
            }
        }
        Ok(effects)
    }

    fn persist(&mut self, section: Section) -> Result<(), AppError> {
        let snapshot = match section {
            Section::Todos => SectionSnapshot::Todos(self.state.todos.items()),
            Section::Lists => SectionSnapshot::Lists(self.state.lists.lists()),
            Section::User => SectionSnapshot::User(self.state.current_user()),
        };
        let result = self.port.save(snapshot);
        result.map_err(|err| self.persistence_failed(section.label(), err))
    }

    fn persistence_failed(&mut self, section: &'static str, err: PersistenceError) -> AppError {
        error!(section, error = %err, "failed to persist state");
        self.notifications
            .push(Notification::error(format!("Failed to save changes: {err}")));
        AppError::Persistence(err)
    }
}
