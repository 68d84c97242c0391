use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// User entity - matches SQL schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all users
    pub nickname: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub email: String,
    /// ISO 3166-1 alpha-2, uppercase
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for create and update.
///
/// Missing fields decode as empty strings so they surface as validation
/// messages rather than decode errors.
#[derive(Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct InputUser {
    #[validate(length(min = 1, message = "first_name required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "nickname required"))]
    pub nickname: String,
    #[validate(
        length(min = 8, max = 72, message = "password must be ascii only,min=8,max=72"),
        custom(
            function = "crate::validation::printable_ascii",
            message = "password must be ascii only,min=8,max=72"
        )
    )]
    pub password: String,
    #[validate(
        length(min = 1, message = "email required"),
        email(message = "email required")
    )]
    pub email: String,
    #[validate(custom(
        function = "crate::validation::country_code",
        message = "country must be two-letter country code uppercase"
    ))]
    pub country: String,
}

impl std::fmt::Debug for InputUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("nickname", &self.nickname)
            .field("password", &"[REDACTED]")
            .field("email", &self.email)
            .field("country", &self.country)
            .finish()
    }
}

/// Row to insert; the password is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub password_hash: String,
    pub email: String,
    pub country: String,
}

/// Full replacement of the editable columns.
#[derive(Debug, Clone, PartialEq)]
pub struct UserChanges {
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub password_hash: String,
    pub email: String,
    pub country: String,
}

/// Optional listing predicates; empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring of first or last name
    pub name: Option<String>,
    /// Case-insensitive exact country
    pub country: Option<String>,
}

impl UserFilter {
    pub fn new(name: Option<String>, country: Option<String>) -> Self {
        let non_empty = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        Self {
            name: non_empty(name),
            country: non_empty(country),
        }
    }
}

/// 1-based page selection, always `>= 1` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub page_size: u64,
}

impl Page {
    /// Values below 1 fall back to the defaults.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

/// Query string of `GET /users`.
///
/// Page numbers are taken as raw strings so non-numeric values can fall
/// back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Substring of first or last name
    pub name: Option<String>,
    /// Two-letter country code, any case
    pub country: Option<String>,
    /// 1-based page number (default 1)
    #[param(value_type = Option<u64>)]
    pub page: Option<String>,
    /// Page size (default 10)
    #[param(value_type = Option<u64>)]
    pub page_size: Option<String>,
}

impl ListQuery {
    pub fn filter(&self) -> UserFilter {
        UserFilter::new(self.name.clone(), self.country.clone())
    }

    pub fn page(&self) -> Page {
        let parse = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .filter(|n| *n > 0)
                .map(|n| n as u64)
                .unwrap_or(0)
        };
        Page::new(parse(&self.page), parse(&self.page_size))
    }
}

/// One page of users plus the count of all matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total_count: u64,
}

/// Body of a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Created {
    pub message: String,
    pub created: Uuid,
}
