//! One-shot messages carried across a redirect in the `flash` cookie

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::fmt::{Display, Formatter, Result as FmtResult};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashCategory {
    Success,
    Danger,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Danger => "danger",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(FlashCategory::Success),
            "danger" => Some(FlashCategory::Danger),
            _ => None,
        }
    }
}

impl Display for FlashCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Danger,
            message: message.into(),
        }
    }

    /// Cookie storing this message as `category:url-encoded message`
    pub fn to_cookie(&self) -> Cookie<'static> {
        let value = format!("{}:{}", self.category, urlencoding::encode(&self.message));
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }

    /// Message stored in the request cookies, if any. Malformed values are ignored.
    pub fn from_jar(jar: &CookieJar) -> Option<Self> {
        jar.get(FLASH_COOKIE)
            .and_then(|cookie| Self::decode(cookie.value_trimmed()))
    }

    /// Add this message to the response cookies
    pub fn store(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.to_cookie())
    }

    /// Expire the flash cookie once it has been displayed
    pub fn clear(jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(FLASH_COOKIE).path("/").build())
    }

    fn decode(value: &str) -> Option<Self> {
        let (category, message) = value.split_once(':')?;
        let category = FlashCategory::parse(category)?;
        let message = urlencoding::decode(message).ok()?;
        Some(Self {
            category,
            message: message.into_owned(),
        })
    }
}
