//! Access-token cookie handling
//!
//! The token cookie is `HttpOnly` and `SameSite=Lax`; `Secure` is
//! configurable for plain-HTTP development setups.

use crate::config::AuthConfig;
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

/// Builds and reads the access-token cookie
#[derive(Debug, Clone)]
pub struct CookieSettings {
    name: String,
    max_age_secs: i64,
    secure: bool,
}

impl CookieSettings {
    pub fn new(name: impl Into<String>, max_age_secs: i64, secure: bool) -> Self {
        Self {
            name: name.into(),
            max_age_secs,
            secure,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.cookie_name.clone(),
            config.access_token_expiry_secs,
            config.cookie_secure,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Set-Cookie` value carrying a freshly issued token
    pub fn issue(&self, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build(token, self.max_age_secs)
    }

    /// `Set-Cookie` value that makes the browser drop the token
    pub fn clear(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        self.build("", 0)
    }

    fn build(&self, value: &str, max_age: i64) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::try_from(cookie)
    }

    /// Find the token cookie among the request's `Cookie` headers
    pub fn read<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .map(|(_, value)| value.trim_matches('"'))
    }
}
