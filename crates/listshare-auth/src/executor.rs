use listshare_core::Credentials;
use listshare_core::LoginOrigin;
use tracing::debug;

use crate::contracts::AuthError;
use crate::contracts::LoginRequest;
use crate::contracts::RegistrationRequest;

/// Turns a sign-in or registration request into session credentials.
pub trait AuthExecutor {
    fn login(&self, request: &LoginRequest) -> Result<Credentials, AuthError>;
    fn register(&self, request: &RegistrationRequest) -> Result<Credentials, AuthError>;
}

/// Accepts any request that passes form validation. There is no account
/// store; the credentials carry exactly what the user typed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedAuthExecutor;

impl AuthExecutor for SimulatedAuthExecutor {
    fn login(&self, request: &LoginRequest) -> Result<Credentials, AuthError> {
        request.form().validate()?;
        let username = request.username.trim().to_string();
        debug!(username = %username, "simulated sign-in accepted");
        Ok(Credentials::sign_in(username))
    }

    fn register(&self, request: &RegistrationRequest) -> Result<Credentials, AuthError> {
        request.form().validate()?;
        let username = request.username.trim().to_string();
        debug!(username = %username, "simulated registration accepted");
        Ok(Credentials {
            id: None,
            username,
            email: Some(request.email.trim().to_string()),
            full_name: Some(request.full_name.trim().to_string()),
            origin: LoginOrigin::Register,
        })
    }
}
