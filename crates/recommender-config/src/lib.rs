#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Process configuration for the recommender client.
//!
//! Configuration is resolved exactly once at startup from [`ConfigSources`]
//! (command-line flags with environment fallbacks) into a validated
//! [`RecommenderConfig`]. Nothing downstream reads the environment again.
//!
//! Layout: `model.rs` (typed configuration), `validate.rs` (parsing helpers),
//! `error.rs` (`ConfigError`).

pub mod error;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use model::{
    ENV_ACCESS_TOKEN, ENV_API_KEY, ENV_BASE_URL, ENV_PROJECT_ID, ConfigSources, CredentialConfig,
    RecommenderConfig,
};
