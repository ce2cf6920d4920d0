//! OpenCircle project directory server library.
//!
//! Exposes the building blocks (config, state, logic, rendering, routes,
//! background tasks) so integration tests and the binary entrypoint can both
//! access them.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod middleware;
pub mod query;
pub mod render;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod tracking;
