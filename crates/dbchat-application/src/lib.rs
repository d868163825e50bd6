//! Application layer of the dbchat client.
//!
//! Composes the core session state holders with the remote service traits
//! into the three units presentation code drives: the
//! [`QuerySubmissionCoordinator`] for natural-language turns, the
//! [`DirectQueryConsole`] for literal query execution, and the
//! [`SessionController`] that owns both plus the session registry and
//! transcript store.

mod console;
mod controller;
mod coordinator;

pub use console::DirectQueryConsole;
pub use controller::SessionController;
pub use coordinator::QuerySubmissionCoordinator;
