use reqwest::Url;

/// Base used when nothing is configured: the API mounted on the page's own
/// origin, which keeps dev-server proxies and same-origin deployments free of
/// CORS and mixed-content trouble.
pub const DEFAULT_BASE_URL: &str = "/api/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Relative base URL {0:?} needs a page URL to resolve against")]
    RelativeWithoutPage(String),
    #[error("Unsupported scheme in {0:?}, expected http or https")]
    UnsupportedScheme(String),
}

/// Where the device API lives, threaded into the client at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    audience: Option<Url>,
    page_url: Option<Url>,
}

impl ClientConfig {
    /// Build a config from raw strings.
    ///
    /// `base_url` may be relative (e.g. `/api/`) when `page_url` is given.
    /// `audience` is only kept when it is an absolute http(s) URL, since it
    /// is used strictly as a fallback host.
    pub fn new(
        base_url: &str,
        audience: Option<&str>,
        page_url: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let page_url = page_url.map(parse_http_url).transpose()?;

        let mut base_url = base_url.trim();
        if base_url.is_empty() {
            base_url = DEFAULT_BASE_URL;
        }
        if let Some(page) = &page_url
            && base_url.starts_with("http://localhost")
            && page.host_str() != Some("localhost")
        {
            tracing::warn!(
                "Overriding base URL {base_url} -> {DEFAULT_BASE_URL} because \
                 the page is not served from localhost"
            );
            base_url = DEFAULT_BASE_URL;
        }

        let base_url = resolve(base_url, page_url.as_ref())?;

        let audience = audience
            .map(str::trim)
            .filter(|audience| !audience.is_empty())
            .and_then(|audience| match parse_http_url(audience) {
                Ok(url) => Some(without_trailing_slash(url)),
                Err(e) => {
                    tracing::warn!("Ignoring audience as fallback host: {e}");
                    None
                }
            });

        Ok(Self {
            base_url,
            audience,
            page_url,
        })
    }

    /// Read the config from the environment.
    ///
    /// - API_BASE_URL: base of the device API, defaults to `/api/`
    /// - AUTH_AUDIENCE: optional token audience, reused as a fallback host
    /// - PAGE_URL: optional URL of the page the client runs on
    pub fn from_env() -> Result<Self, ConfigError> {
        use std::env::var;

        let non_empty = |key: &str| var(key).ok().filter(|v| !v.is_empty());
        let base_url = non_empty("API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self::new(
            &base_url,
            non_empty("AUTH_AUDIENCE").as_deref(),
            non_empty("PAGE_URL").as_deref(),
        )
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn audience(&self) -> Option<&Url> {
        self.audience.as_ref()
    }

    pub fn page_url(&self) -> Option<&Url> {
        self.page_url.as_ref()
    }
}

fn resolve(base_url: &str, page_url: Option<&Url>) -> Result<Url, ConfigError> {
    let url = match (Url::parse(base_url), page_url) {
        (Ok(url), _) => url,
        (Err(_), Some(page)) if !base_url.contains("://") => {
            page.join(base_url).map_err(|e| ConfigError::InvalidUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?
        }
        (Err(_), None) if !base_url.contains("://") => {
            return Err(ConfigError::RelativeWithoutPage(base_url.to_string()));
        }
        (Err(e), _) => {
            return Err(ConfigError::InvalidUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            });
        }
    };
    if !is_http(&url) {
        return Err(ConfigError::UnsupportedScheme(base_url.to_string()));
    }
    Ok(without_trailing_slash(url))
}

fn parse_http_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !is_http(&url) {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(url)
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Drop query, fragment and any trailing slash from the path.
pub(crate) fn without_trailing_slash(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);
    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }
    url
}
