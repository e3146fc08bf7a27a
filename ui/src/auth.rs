//! Bearer token lookup for the browser.
//!
//! The sign-in flow (an external identity provider SDK) stores the access
//! token in local storage; the device client only reads it.

use payloads::{Identity, TokenError};
use secrecy::SecretString;

pub const TOKEN_STORAGE_KEY: &str = "inventory.access_token";

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserIdentity;

impl BrowserIdentity {
    fn stored_token() -> Option<String> {
        web_sys::window()?
            .local_storage()
            .ok()??
            .get_item(TOKEN_STORAGE_KEY)
            .ok()?
            .filter(|token| !token.is_empty())
    }
}

impl Identity for BrowserIdentity {
    fn is_authenticated(&self) -> bool {
        Self::stored_token().is_some()
    }

    async fn token(&self) -> Result<SecretString, TokenError> {
        Self::stored_token()
            .map(SecretString::from)
            .ok_or_else(|| TokenError("no access token in local storage".into()))
    }
}
