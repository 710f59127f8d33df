//! Reconciles a desired-state roster of identities against the live user
//! directory of a remote collaboration platform.
//!
//! Roster users already present in the directory are deactivated; roster
//! users missing from the directory but belonging to a controlled domain
//! are invited (notification suppressed) and then deactivated; everyone
//! else is left untouched. Each invocation is a single serial batch pass
//! with bounded exponential backoff on rate limits and an append-only CSV
//! audit log of successful deactivations.

pub mod audit;
pub mod classify;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod retry;
pub mod roster;

pub use error::{DirectoryError, DirectoryResult};
