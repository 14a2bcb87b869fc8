use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::views::ListSort;
use super::views::TodoSort;

pub const DEFAULT_LOGIN_DELAY_MS: u64 = 1000;
pub const DEFAULT_SHARE_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub share: ShareConfig,
    pub views: ViewsConfig,
}

impl Config {
    /// Checks values serde cannot: sort names and the share origin scheme.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(sort) = self.views.list_sort.as_deref() {
            if ListSort::from_label(sort).is_none() {
                return Err(ConfigError::Invalid {
                    key: "views.list_sort".to_string(),
                    reason: format!("unknown list sort '{sort}'"),
                });
            }
        }
        if let Some(sort) = self.views.todo_sort.as_deref() {
            if TodoSort::from_label(sort).is_none() {
                return Err(ConfigError::Invalid {
                    key: "views.todo_sort".to_string(),
                    reason: format!("unknown todo sort '{sort}'"),
                });
            }
        }
        let origin = self.share.origin.trim();
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "share.origin".to_string(),
                reason: format!("expected an http(s) origin, got '{origin}'"),
            });
        }
        Ok(())
    }

    pub fn list_sort(&self) -> ListSort {
        self.views
            .list_sort
            .as_deref()
            .and_then(ListSort::from_label)
            .unwrap_or_default()
    }

    pub fn todo_sort(&self) -> TodoSort {
        self.views
            .todo_sort
            .as_deref()
            .and_then(TodoSort::from_label)
            .unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    pub login_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_delay_ms: DEFAULT_LOGIN_DELAY_MS,
        }
    }
}

impl SessionConfig {
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ShareConfig {
    pub origin: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_SHARE_ORIGIN.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ViewsConfig {
    pub list_sort: Option<String>,
    pub todo_sort: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session.login_delay(), Duration::from_millis(1000));
        assert_eq!(config.share.origin, "http://localhost:3000");
        assert_eq!(config.list_sort(), ListSort::Recent);
        assert_eq!(config.todo_sort(), TodoSort::CreatedAt);
    }

    #[test]
    fn unknown_sort_is_rejected() {
        let mut config = Config::default();
        config.views.todo_sort = Some("alphabetical".to_string());
        let err = config.validate().expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "views.todo_sort"));
    }

    #[test]
    fn configured_sorts_are_parsed() {
        let mut config = Config::default();
        config.views.list_sort = Some("todos".to_string());
        config.views.todo_sort = Some("dueDate".to_string());
        assert_eq!(config.list_sort(), ListSort::Todos);
        assert_eq!(config.todo_sort(), TodoSort::DueDate);
    }

    #[test]
    fn non_http_origin_is_rejected() {
        let mut config = Config::default();
        config.share.origin = "ftp://lists".to_string();
        assert!(config.validate().is_err());
    }
}
