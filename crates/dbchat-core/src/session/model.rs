//! Session domain models.
//!
//! A [`ChatSession`] is a named, persisted conversation scoped to one data
//! source. A [`ChatTranscript`] is the full ordered list of turns for one
//! session. The transcript is always replaced wholesale on session switch,
//! never merged.

use super::turn::MessageTurn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named conversation attached to one data source.
///
/// Identity is the server-assigned `id`; the name is mutable, either by an
/// explicit user rename or by the backend deriving a name from the first
/// turn of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub name: String,
    /// Last modification timestamp. The session-list endpoint does not
    /// report it, so it is only present on sessions fetched individually.
    pub last_modified: Option<DateTime<Utc>>,
}

impl ChatSession {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            last_modified: None,
        }
    }
}

/// The ordered sequence of message turns of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTranscript {
    /// The session these turns belong to.
    pub session_id: Uuid,
    /// Turns in append order. Never reordered or truncated except by a
    /// full reload.
    pub messages: Vec<MessageTurn>,
    /// True while a load is in flight.
    pub loading: bool,
}

impl ChatTranscript {
    /// Creates an empty transcript for a session that has no turns yet.
    pub fn empty(session_id: Uuid) -> Self {
        Self {
            session_id,
            messages: Vec::new(),
            loading: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
