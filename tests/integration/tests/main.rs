//! End-to-end tests.
//!
//! These tests run the Graph client, the resolver and the report against an
//! in-process mock of the token endpoint and the Graph v1.0 API.

mod common;
mod failures;
mod pipeline;
