//! Core daemon for clipkeep.
//!
//! Owns the history store behind a single event loop (the serialized
//! writer), drives clipboard polling on a fixed interval, and wires
//! enrichment results back into the store by id.

pub mod config;
pub mod daemon;
pub mod error;
pub mod setup;
pub mod watcher;

pub use config::Config;
pub use daemon::{Daemon, DaemonEvent};
pub use error::DaemonError;
