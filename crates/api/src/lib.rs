//! Mito API server library.
//!
//! Exposes the building blocks (config, state, error handling, the response
//! pipeline glue, routes) so integration tests and the binary entrypoint can
//! both access them.

pub mod config;
pub mod error;
pub mod openapi;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
