//! # Link Shortener
//!
//! A URL shortening service with interchangeable link storage, built with Axum.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - The [`Link`](domain::entities::Link) entity and the
//!   [`LinkRepository`](domain::repositories::LinkRepository) storage contract
//! - **Application Layer** ([`application`]) - Create, list, redirect and delete flows
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory, filesystem and Redis backends
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Short ids
//!
//! Unless the caller picks one, a link's short id is the decimal value of a
//! polynomial rolling hash of its URL (see [`utils::code_generator::shorten`]).
//! Collisions are not detected.
//!
//! ## Quick Start
//!
//! ```bash
//! export STORAGE_BACKEND="fs"
//! export DATA_DIR="/var/lib/links"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::{AppError, StorageError};
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::LinkService;
    pub use crate::domain::entities::Link;
    pub use crate::domain::repositories::LinkRepository;
    pub use crate::error::{AppError, StorageError};
    pub use crate::infrastructure::persistence::{
        FsLinkRepository, MemoryLinkRepository, RedisLinkRepository,
    };
    pub use crate::state::AppState;
}
