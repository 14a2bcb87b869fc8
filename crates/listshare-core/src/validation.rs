//! Form checks run by callers before an operation is dispatched.
//!
//! The stores only reject blank titles; everything stricter (password length,
//! email shape, minimum title length) belongs to the shell that owns the form.

use std::sync::OnceLock;

use regex::Regex;

use super::error::ValidationErrors;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_FULL_NAME_LEN: usize = 2;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_LIST_TITLE_LEN: usize = 3;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

fn username_pattern() -> &'static Regex {
    static USERNAME: OnceLock<Regex> = OnceLock::new();
    USERNAME.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("username pattern"))
}

/// Letters, digits and underscores only.
pub fn is_valid_username(username: &str) -> bool {
    username_pattern().is_match(username)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.username.trim().is_empty() {
            errors.push("username", "Username is required");
        }
        if self.password.trim().is_empty() {
            errors.push("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            errors.push("fullName", "Full name is required");
        } else if full_name.chars().count() < MIN_FULL_NAME_LEN {
            errors.push(
                "fullName",
                format!("Full name must be at least {MIN_FULL_NAME_LEN} characters"),
            );
        }

        let username = self.username.trim();
        if username.is_empty() {
            errors.push("username", "Username is required");
        } else if username.chars().count() < MIN_USERNAME_LEN {
            errors.push(
                "username",
                format!("Username must be at least {MIN_USERNAME_LEN} characters"),
            );
        } else if !is_valid_username(username) {
            errors.push(
                "username",
                "Username can only contain letters, numbers, and underscores",
            );
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push("email", "Email is required");
        } else if !is_valid_email(email) {
            errors.push("email", "Please enter a valid email address");
        }

        if self.password.is_empty() {
            errors.push("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }

        if self.confirm_password.is_empty() {
            errors.push("confirmPassword", "Please confirm your password");
        } else if self.password != self.confirm_password {
            errors.push("confirmPassword", "Passwords do not match");
        }

        errors.into_result()
    }
}

pub fn validate_list_form(title: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let title = title.trim();
    if title.is_empty() {
        errors.push("title", "List title is required");
    } else if title.chars().count() < MIN_LIST_TITLE_LEN {
        errors.push(
            "title",
            format!("Title must be at least {MIN_LIST_TITLE_LEN} characters"),
        );
    }
    errors.into_result()
}

pub fn validate_profile_form(full_name: &str, email: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if full_name.trim().is_empty() {
        errors.push("fullName", "Please fill in all required fields");
    }
    if email.trim().is_empty() {
        errors.push("email", "Please fill in all required fields");
    }
    errors.into_result()
}

pub fn validate_todo_title(title: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if title.trim().is_empty() {
        errors.push("title", "Please enter a task title");
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn registration() -> RegistrationForm {
        RegistrationForm {
            full_name: "Ada Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "engine1".to_string(),
            confirm_password: "engine1".to_string(),
        }
    }

    #[test]
    fn login_requires_username_and_six_char_password() {
        let form = LoginForm {
            username: "  ".to_string(),
            password: "12345".to_string(),
        };
        let errors = form.validate().expect_err("invalid");
        assert_eq!(errors.0.len(), 2);
        assert_eq!(
            errors.for_field("password").map(|err| err.message.as_str()),
            Some("Password must be at least 6 characters")
        );

        let ok = LoginForm {
            username: "ada".to_string(),
            password: "123456".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn registration_accepts_complete_form() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn registration_reports_each_bad_field() {
        let form = RegistrationForm {
            full_name: "A".to_string(),
            username: "ad".to_string(),
            email: "ada@example".to_string(),
            password: "engine1".to_string(),
            confirm_password: "engine2".to_string(),
        };
        let errors = form.validate().expect_err("invalid");
        let fields: Vec<&str> = errors.0.iter().map(|err| err.field).collect();
        assert_eq!(fields, vec!["fullName", "username", "email", "confirmPassword"]);
    }

    #[test]
    fn username_rejects_spaces_and_punctuation() {
        let form = RegistrationForm {
            username: "ada lovelace!".to_string(),
            ..registration()
        };
        let errors = form.validate().expect_err("invalid");
        assert_eq!(
            errors.for_field("username").map(|err| err.message.as_str()),
            Some("Username can only contain letters, numbers, and underscores")
        );
        assert!(is_valid_username("ada_1815"));
    }

    #[test]
    fn email_needs_local_part_domain_and_dot() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn list_form_needs_three_characters() {
        assert!(validate_list_form("  ab ").is_err());
        assert!(validate_list_form("abc").is_ok());
        assert_eq!(
            validate_list_form("")
                .expect_err("blank")
                .for_field("title")
                .map(|err| err.message.clone()),
            Some("List title is required".to_string())
        );
    }

    #[test]
    fn profile_and_todo_title_checks() {
        assert!(validate_profile_form("Ada", "").is_err());
        assert!(validate_profile_form("Ada", "ada@example.com").is_ok());
        assert!(validate_todo_title("\t").is_err());
    }
}
