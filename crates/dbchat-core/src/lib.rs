//! Core domain of the dbchat conversational query client.
//!
//! This crate holds the session model (registry, transcript, turns), the
//! error taxonomy, the client configuration and the traits the remote
//! services are consumed through. It performs no I/O of its own: HTTP
//! implementations live in `dbchat-client`, orchestration in
//! `dbchat-application`.

pub mod config;
pub mod error;
pub mod service;
pub mod session;

pub use config::ClientConfig;
pub use error::{DbChatError, Result};
