//! Credential gate: the first check of every request.
//!
//! Runs before an identifier is generated or any network call is made, so a
//! malformed request has no external side effects.

use crate::api::ProvisionRequest;
use crate::domain::error::ProvisionError;
use crate::domain::session::Credential;

/// Extract the caller's credential.
///
/// The token is returned unchanged; whether the platform accepts it is only
/// discovered on first use.
///
/// # Errors
///
/// Returns `MissingCredential` if the field is absent or blank.
pub fn validate(request: &ProvisionRequest) -> Result<Credential, ProvisionError> {
    match request.credential.as_deref() {
        Some(token) if !token.trim().is_empty() => Ok(Credential::new(token)),
        _ => Err(ProvisionError::MissingCredential),
    }
}
