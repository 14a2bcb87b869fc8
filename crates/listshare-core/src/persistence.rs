use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::error::PersistenceError;
use super::reducer::Section;
use super::state::Todo;
use super::state::TodoList;
use super::state::User;

/// The whole persisted blob. Field names match the stored JSON keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSnapshot {
    pub todos: Vec<Todo>,
    pub todo_lists: Vec<TodoList>,
    pub user: Option<User>,
    pub settings: BTreeMap<String, serde_json::Value>,
}

impl PersistedSnapshot {
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
            && self.todo_lists.is_empty()
            && self.user.is_none()
            && self.settings.is_empty()
    }

    pub fn apply(&mut self, section: SectionSnapshot<'_>) {
        match section {
            SectionSnapshot::Todos(todos) => self.todos = todos.to_vec(),
            SectionSnapshot::Lists(lists) => self.todo_lists = lists.to_vec(),
            SectionSnapshot::User(user) => self.user = user.cloned(),
        }
    }
}

/// One changed section, borrowed from live state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionSnapshot<'a> {
    Todos(&'a [Todo]),
    Lists(&'a [TodoList]),
    User(Option<&'a User>),
}

impl SectionSnapshot<'_> {
    pub fn section(&self) -> Section {
        match self {
            Self::Todos(_) => Section::Todos,
            Self::Lists(_) => Section::Lists,
            Self::User(_) => Section::User,
        }
    }
}

pub trait PersistencePort {
    fn load(&self) -> Result<PersistedSnapshot, PersistenceError>;
    fn save(&mut self, section: SectionSnapshot<'_>) -> Result<(), PersistenceError>;
    /// Drops every stored section.
    fn reset(&mut self) -> Result<(), PersistenceError>;
}

/// In-process storage; nothing outlives the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    snapshot: PersistedSnapshot,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: PersistedSnapshot) -> Self {
        Self { snapshot, saves: 0 }
    }

    pub fn snapshot(&self) -> &PersistedSnapshot {
        &self.snapshot
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl PersistencePort for MemoryStorage {
    fn load(&self) -> Result<PersistedSnapshot, PersistenceError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, section: SectionSnapshot<'_>) -> Result<(), PersistenceError> {
        self.snapshot.apply(section);
        self.saves = self.saves.saturating_add(1);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), PersistenceError> {
        self.snapshot = PersistedSnapshot::default();
        Ok(())
    }
}

/// A single pretty-printed JSON document on disk.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    snapshot: PersistedSnapshot,
}

impl JsonFileStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let snapshot = read_snapshot(&path)?;
        Ok(Self { path, snapshot })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_vec_pretty(&self.snapshot)?;
        write_atomically(&self.path, &encoded)
    }
}

impl PersistencePort for JsonFileStorage {
    fn load(&self) -> Result<PersistedSnapshot, PersistenceError> {
        read_snapshot(&self.path)
    }

    fn save(&mut self, section: SectionSnapshot<'_>) -> Result<(), PersistenceError> {
        self.snapshot.apply(section);
        self.flush()
    }

    fn reset(&mut self) -> Result<(), PersistenceError> {
        self.snapshot = PersistedSnapshot::default();
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|source| PersistenceError::Io {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

pub fn export_snapshot(
    snapshot: &PersistedSnapshot,
    format: ExportFormat,
) -> Result<String, PersistenceError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(snapshot)?),
        ExportFormat::Yaml => Ok(serde_yaml::to_string(snapshot)?),
    }
}

fn read_snapshot(path: &Path) -> Result<PersistedSnapshot, PersistenceError> {
    if !path.exists() {
        return Ok(PersistedSnapshot::default());
    }
    let bytes = std::fs::read(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(PersistedSnapshot::default());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    let tmp = path.with_extension("json.tmp");
    let io_err = |source: std::io::Error| PersistenceError::Io {
        path: tmp.clone(),
        source,
    };
    let mut opts = OpenOptions::new();
    opts.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(&tmp).map_err(io_err)?;
    file.write_all(bytes).map_err(io_err)?;
    file.write_all(b"\n").map_err(io_err)?;
    file.flush().map_err(io_err)?;
    drop(file);
    std::fs::rename(&tmp, path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
