//! rscope: typed client for the Runscope API monitoring REST API
//!
//! The [`runscope`] module holds the client and resource records; [`config`]
//! persists the command line's defaults.

pub mod config;
pub mod runscope;
