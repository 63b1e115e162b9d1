//! # mc-directory
//!
//! Directory service clients for management-chain resolution.
//!
//! The resolver only sees the [`DirectoryClient`] trait. This crate ships
//! two implementations:
//! - [`GraphDirectory`]: Microsoft Graph over HTTPS, authenticated with the
//!   OAuth2 client-credentials grant
//! - [`InMemoryDirectory`]: a fixture store with injectable failures

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod memory;
pub mod retry;

pub use auth::TokenProvider;
pub use client::DirectoryClient;
pub use config::{ClientCredentials, GraphConfig, GraphConfigBuilder};
pub use error::{DirectoryError, DirectoryResult};
pub use graph::{DirectoryObject, GraphDirectory, GraphUser};
pub use memory::InMemoryDirectory;
pub use retry::RetryPolicy;
