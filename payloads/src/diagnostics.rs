//! Turning client errors into messages a user can act on.

use reqwest::Url;

use crate::ClientError;

/// Likely cause of a request that never got a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkHint {
    MixedContent,
    LocalBackendUnreachable,
    NetworkOrCors,
}

impl NetworkHint {
    pub fn message(self) -> &'static str {
        match self {
            Self::MixedContent => {
                "The API URL uses a different scheme than this page, so the \
                 browser blocks it as mixed content. Serve both over https or \
                 use a relative API base such as /api/."
            }
            Self::LocalBackendUnreachable => {
                "The API points at localhost, but this page is not served from \
                 localhost. Configure a reachable API base URL."
            }
            Self::NetworkOrCors => {
                "Check that the API is running and reachable, and that it \
                 allows cross-origin requests from this page."
            }
        }
    }
}

/// Pick the hint for a network failure on `attempted`, given the URL of the
/// page the client runs on (when known).
pub fn network_hint(attempted: &Url, page: Option<&Url>) -> NetworkHint {
    let Some(page) = page else {
        return NetworkHint::NetworkOrCors;
    };
    if attempted.scheme() != page.scheme() {
        NetworkHint::MixedContent
    } else if attempted.host_str() == Some("localhost")
        && page.host_str() != Some("localhost")
    {
        NetworkHint::LocalBackendUnreachable
    } else {
        NetworkHint::NetworkOrCors
    }
}

/// User-facing message for a failed operation. Only network failures get a
/// hint appended; HTTP errors are shown as the server reported them.
pub fn describe(error: &ClientError, page: Option<&Url>) -> String {
    match error {
        ClientError::Network { url, .. } => {
            format!("{error}. {}", network_hint(url, page).message())
        }
        _ => error.to_string(),
    }
}
