//! The identity capability the client depends on for bearer tokens.

use secrecy::SecretString;
use std::future::Future;

/// Failure to obtain a token. Never shown to the user: requests simply go
/// out without an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not obtain an access token: {0}")]
pub struct TokenError(pub String);

/// Source of the current session and its access token.
pub trait Identity {
    fn is_authenticated(&self) -> bool;

    fn token(&self) -> impl Future<Output = Result<SecretString, TokenError>>;
}

impl<T: Identity> Identity for &T {
    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }

    fn token(&self) -> impl Future<Output = Result<SecretString, TokenError>> {
        (**self).token()
    }
}

/// Identity with no session, for public inventories.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl Identity for Anonymous {
    fn is_authenticated(&self) -> bool {
        false
    }

    async fn token(&self) -> Result<SecretString, TokenError> {
        Err(TokenError("no session".into()))
    }
}

/// Token to attach to an operation's requests, if any.
pub(crate) async fn bearer_token(
    identity: &impl Identity,
) -> Option<SecretString> {
    if !identity.is_authenticated() {
        return None;
    }
    match identity.token().await {
        Ok(token) => Some(token),
        Err(e) => {
            tracing::debug!("Continuing unauthenticated: {e}");
            None
        }
    }
}
