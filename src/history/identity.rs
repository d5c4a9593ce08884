use crate::{Error, Result, config::IdentityConfig};
use axum::http::{HeaderMap, HeaderName};
use tracing::debug;
use uuid::Uuid;

const MAX_ID_LEN: usize = 128;

/// Who a request belongs to. Authenticated users and anonymous sessions share
/// one history table; `owner_key` is the only filter ever applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    User { user_id: String },
    Anonymous { session_id: String },
}

impl Identity {
    pub fn owner_key(&self) -> String {
        match self {
            Identity::User { user_id } => format!("user:{user_id}"),
            Identity::Anonymous { session_id } => format!("session:{session_id}"),
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            Identity::User { .. } => None,
            Identity::Anonymous { session_id } => Some(session_id),
        }
    }
}

pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Identity;
}

/// Resolves identity from request headers: the user header wins, then the
/// session header, otherwise a fresh anonymous session is minted.
#[derive(Debug, Clone)]
pub struct HeaderIdentityResolver {
    user_header: HeaderName,
    session_header: HeaderName,
}

impl HeaderIdentityResolver {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        Ok(Self {
            user_header: parse_header_name(&config.user_header)?,
            session_header: parse_header_name(&config.session_header)?,
        })
    }

    pub fn session_header(&self) -> &HeaderName {
        &self.session_header
    }
}

impl IdentityResolver for HeaderIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Identity {
        if let Some(user_id) = header_id(headers, &self.user_header) {
            return Identity::User { user_id };
        }
        if let Some(session_id) = header_id(headers, &self.session_header) {
            return Identity::Anonymous { session_id };
        }

        let session_id = Uuid::new_v4().to_string();
        debug!("Minted anonymous session: {}", session_id);
        Identity::Anonymous { session_id }
    }
}

fn parse_header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::config(format!("Invalid header name '{name}': {e}")))
}

fn header_id(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_ID_LEN)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use pretty_assertions::assert_eq;

    fn resolver() -> HeaderIdentityResolver {
        HeaderIdentityResolver::new(&IdentityConfig::default()).unwrap()
    }

    #[test]
    fn test_user_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("42"));
        headers.insert("x-session-id", HeaderValue::from_static("abc"));

        let identity = resolver().resolve(&headers);
        assert_eq!(
            identity,
            Identity::User {
                user_id: "42".to_string()
            }
        );
        assert_eq!(identity.owner_key(), "user:42");
        assert_eq!(identity.session_id(), None);
    }

    #[test]
    fn test_session_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-session-id", HeaderValue::from_static(" abc "));

        let identity = resolver().resolve(&headers);
        assert_eq!(identity.owner_key(), "session:abc");
        assert_eq!(identity.session_id(), Some("abc"));
    }

    #[test]
    fn test_new_session_minted_when_headers_absent_or_blank() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("   "));

        let first = resolver().resolve(&headers);
        let second = resolver().resolve(&headers);
        assert!(first.session_id().is_some());
        assert_ne!(first, second);
    }

    #[test]
    fn test_invalid_header_name_is_config_error() {
        let config = IdentityConfig {
            user_header: "bad header".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HeaderIdentityResolver::new(&config),
            Err(Error::Config(_))
        ));
    }
}
