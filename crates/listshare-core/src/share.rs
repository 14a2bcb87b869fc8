//! Share artifacts for a list: a display-only link and an email invitation.
//!
//! Nothing here is delivered anywhere and no access is granted. The list's
//! `shared` level stays an opaque integer.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::error::ValidationErrors;
use super::state::ListId;
use super::state::TodoList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    #[default]
    View,
    Edit,
    Admin,
}

impl SharePermission {
    pub fn label(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Admin => "admin",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// `{origin}/shared/{listId}?token={t}`, where `t` encodes `listId + now_ms`.
pub fn share_link(origin: &str, list_id: ListId, now: DateTime<Utc>) -> String {
    let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let seed = list_id.0.saturating_add(now_ms).to_string();
    let token = URL_SAFE_NO_PAD.encode(seed.as_bytes());
    format!(
        "{}/shared/{}?token={}",
        origin.trim_end_matches('/'),
        list_id,
        token
    )
}

pub fn default_invite_message(list: &TodoList) -> String {
    format!("Hi! I'd like to share my todo list \"{}\" with you.", list.title)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailInvite {
    pub list_id: ListId,
    pub emails: Vec<String>,
    pub message: String,
    pub permissions: SharePermission,
}

impl EmailInvite {
    /// Splits a comma-separated address field. Blank entries are dropped and
    /// an empty result is rejected. A `None` message uses the default text.
    pub fn parse(
        list: &TodoList,
        emails: &str,
        message: Option<&str>,
        permissions: SharePermission,
    ) -> Result<Self, ValidationErrors> {
        let emails: Vec<String> = emails
            .split(',')
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string)
            .collect();
        if emails.is_empty() {
            let mut errors = ValidationErrors::default();
            errors.push("emails", "Enter at least one email address");
            return Err(errors);
        }
        Ok(Self {
            list_id: list.id,
            emails,
            message: message
                .map(str::to_string)
                .unwrap_or_else(|| default_invite_message(list)),
            permissions,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShareRequest {
    Link {
        #[serde(rename = "listId")]
        list_id: ListId,
        #[serde(rename = "shareLink")]
        share_link: String,
        permissions: SharePermission,
    },
    Email(EmailInvite),
}

impl ShareRequest {
    pub fn link(
        origin: &str,
        list: &TodoList,
        permissions: SharePermission,
        now: DateTime<Utc>,
    ) -> Self {
        Self::Link {
            list_id: list.id,
            share_link: share_link(origin, list.id, now),
            permissions,
        }
    }

    pub fn list_id(&self) -> ListId {
        match self {
            Self::Link { list_id, .. } => *list_id,
            Self::Email(invite) => invite.list_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn list() -> TodoList {
        TodoList {
            id: ListId(42),
            title: "Groceries".to_string(),
            description: String::new(),
            shared: 1,
            todo_count: 0,
            created_at: Utc.timestamp_millis_opt(0).single().expect("ts"),
            updated_at: None,
            owner: None,
        }
    }

    #[test]
    fn share_link_is_well_formed() {
        let now = Utc.timestamp_millis_opt(1_000).single().expect("ts");
        let link = share_link("https://lists.example.com/", ListId(42), now);
        // 42 + 1000 = "1042"
        assert_eq!(link, "https://lists.example.com/shared/42?token=MTA0Mg");
    }

    #[test]
    fn email_invite_splits_and_trims() {
        let invite = EmailInvite::parse(
            &list(),
            " a@x.io, ,b@y.io ",
            None,
            SharePermission::Edit,
        )
        .expect("valid");
        assert_eq!(invite.emails, vec!["a@x.io", "b@y.io"]);
        assert_eq!(
            invite.message,
            "Hi! I'd like to share my todo list \"Groceries\" with you."
        );
        assert_eq!(invite.permissions, SharePermission::Edit);
    }

    #[test]
    fn email_invite_rejects_blank_field() {
        assert!(EmailInvite::parse(&list(), " , ", None, SharePermission::View).is_err());
    }

    #[test]
    fn link_request_serializes_with_type_tag() {
        let now = Utc.timestamp_millis_opt(0).single().expect("ts");
        let request = ShareRequest::link("http://localhost:3000", &list(), SharePermission::View, now);
        let encoded = serde_json::to_value(&request).expect("encode");
        assert_eq!(encoded["type"], "link");
        assert_eq!(encoded["listId"], 42);
        assert_eq!(request.list_id(), ListId(42));
    }

    #[test]
    fn permission_labels_match_wire_names() {
        for permission in [SharePermission::View, SharePermission::Edit, SharePermission::Admin] {
            let encoded = serde_json::to_value(permission).expect("encode");
            assert_eq!(encoded, permission.label());
            assert_eq!(SharePermission::from_label(permission.label()), Some(permission));
        }
    }
}
