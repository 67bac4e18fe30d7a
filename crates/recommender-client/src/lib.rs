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

//! Typed client for the model-serving recommender API.
//!
//! Layout:
//! - `client.rs`: one method per endpoint, mapping bodies into typed records
//! - `transport.rs`: authenticated GET, status/decode classification, redaction
//! - `credentials.rs`: the credential capability and its two variants
//! - `token.rs`: bearer token sources backing the ambient variant
//! - `error.rs`: `ClientError`

pub mod client;
pub mod credentials;
pub mod error;
pub mod token;
pub mod transport;

pub use client::{ManifestRequest, RecommenderClient};
pub use credentials::{AmbientCredentials, ApiKeyCredentials, Credentials, credentials_from_config};
pub use error::{ClientError, ClientResult};
pub use token::{
    ApplicationDefaultTokenSource, GcloudTokenSource, MetadataServerTokenSource, StaticToken,
    TokenSource,
};
pub use transport::{HEADER_REQUEST_ID, HEADER_USER_PROJECT, Transport};
