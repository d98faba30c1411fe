use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};

use crate::app::Result;

pub const DEFAULT_USER_AGENT: &str = concat!("flagfetch/", env!("CARGO_PKG_VERSION"));

/// Headers sent with every request. Computed once at startup.
pub fn default_headers(sdk_key: &str, user_agent: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(sdk_key)?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);

    let agent = HeaderValue::from_str(user_agent.unwrap_or(DEFAULT_USER_AGENT))?;
    headers.insert(USER_AGENT, agent);

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers() {
        let headers = default_headers("sdk-abc", None).unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "sdk-abc");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
        assert_eq!(headers.get(USER_AGENT).unwrap(), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_custom_user_agent() {
        let headers = default_headers("sdk-abc", Some("svc/2.0")).unwrap();
        assert_eq!(headers.get(USER_AGENT).unwrap(), "svc/2.0");
    }

    #[test]
    fn test_invalid_key_rejected() {
        assert!(default_headers("bad\nkey", None).is_err());
    }
}
