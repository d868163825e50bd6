//! Session domain module.
//!
//! Everything that models a conversational query session:
//!
//! - `model`: session and transcript entities (`ChatSession`, `ChatTranscript`)
//! - `turn`: message turn types (`MessageTurn`, `TurnOutcome`, `ResultPage`)
//! - `registry`: session list + active selection (`ChatHistoryRegistry`)
//! - `transcript`: the active transcript store (`TranscriptStore`)

mod model;
mod registry;
mod transcript;
mod turn;

pub use model::{ChatSession, ChatTranscript};
pub use registry::{ChatHistoryRegistry, DeleteOutcome};
pub use transcript::TranscriptStore;
pub use turn::{ConsoleOutcome, MessageTurn, ResultPage, TurnAnswer, TurnOutcome};
