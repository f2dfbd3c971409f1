//! Runscope API interaction module
//!
//! Typed bindings for the Runscope (BlazeMeter API Monitoring) REST API.
//! Every operation is a single request/response round-trip; nothing is
//! cached or retried.
//!
//! # Module Structure
//!
//! - [`auth`] - Access token handling and environment defaults
//! - [`client`] - Main client with the generic create/read/update/delete helpers
//! - [`http`] - HTTP utilities for REST API calls
//! - [`endpoints`] - API path templates
//! - [`bucket`], [`test`], [`environment`], [`integration`], [`account`] - resources
//!
//! # Example
//!
//! ```ignore
//! use rscope::runscope::{AccessToken, Bucket, Environment, RunscopeClient, DEFAULT_API_URL};
//!
//! async fn example() -> rscope::runscope::Result<()> {
//!     let client = RunscopeClient::new(DEFAULT_API_URL, AccessToken::from_env()?)?;
//!     let bucket = Bucket::with_key("z20co8yhb6uq");
//!     let env = Environment { name: Some("staging".into()), ..Environment::new() };
//!     let created = client.create_shared_environment(&env, &bucket).await?;
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod auth;
pub mod bucket;
pub mod client;
pub mod endpoints;
pub mod environment;
pub mod error;
pub mod http;
pub mod integration;
pub mod test;

mod nullable;
mod timestamp;

pub use account::Account;
pub use auth::AccessToken;
pub use bucket::{Bucket, Team};
pub use client::{decode, ApiResponse, RunscopeClient, DEFAULT_API_URL};
pub use environment::{Contact, EmailSettings, Environment, EnvironmentIntegration, LocalMachine};
pub use error::{Result, RunscopeError};
pub use http::format_api_error;
pub use integration::Integration;
pub use test::Test;
