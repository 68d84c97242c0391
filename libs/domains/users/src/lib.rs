//! Users Domain
//!
//! User directory: create, list with search and paging, fetch, replace and
//! delete users, announcing every mutation on NATS.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, request validation, identity resolution
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────┐
//! │   Service   │ ──► │ Notifier │  ← best-effort NATS publish
//! └──────┬──────┘     └──────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← storage gateway (PostgreSQL or in-memory)
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, NatsNotifier, UserService};
//! use std::time::Duration;
//!
//! # async fn example(client: async_nats::Client) {
//! let service = UserService::new(
//!     InMemoryUserRepository::new(),
//!     NatsNotifier::new(client, Duration::from_secs(5)),
//! );
//! let router = handlers::router(service);
//! # }
//! ```

pub mod context;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notifier;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

pub use context::{ResolvedUser, resolve_user};
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    Created, InputUser, ListQuery, NewUser, Page, User, UserChanges, UserFilter, UserPage,
};
pub use notifier::{NatsNotifier, Notifier, NotifyError, UserEvent};
pub use postgres::{PgUserRepository, UserStatements};
pub use repository::{InMemoryUserRepository, StoreError, StoreResult, UserRepository};
pub use service::{UserService, default_password_params};
