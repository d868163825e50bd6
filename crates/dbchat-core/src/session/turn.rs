//! Message turn types.
//!
//! One [`MessageTurn`] is a single exchange unit: the user's natural
//! language query merged with the structured response it produced. The
//! response state is a tagged [`TurnOutcome`] so that invalid combinations
//! (an execution error alongside result data) are unrepresentable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One bounded slice of a potentially larger tabular result.
///
/// `total_count` is the full server-side cardinality of the result,
/// independent of the page currently held. Invariant:
/// `rows.len() <= page_size as usize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Page index, starting from 0.
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
}

/// The answered part of a successful turn.
///
/// Every field is independently optional: a turn may produce only a
/// description, only a plot, a table, or any combination. A failed plot
/// generation (`plot_error`) does not invalidate the rest of the answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnAnswer {
    /// Natural language description of the result.
    pub description: Option<String>,
    /// The database query derived from the natural language input.
    pub generated_query: Option<String>,
    /// Reference to a rendered chart image.
    pub plot_url: Option<String>,
    /// Plot generation failed independently of query execution; the rest
    /// of the answer is still valid.
    pub plot_error: Option<String>,
    /// The currently cached page of the tabular result. Replaced wholesale
    /// on every page load.
    pub data: Option<ResultPage>,
}

/// Behavioral state of a turn.
///
/// A turn is terminal once answered or failed; the only later mutation is
/// `Answered` data being replaced by pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// Submitted, no response integrated yet.
    Pending,
    /// The derived query executed; the answer fields carry whatever the
    /// service produced.
    Answered(TurnAnswer),
    /// The derived query failed against the data source. A failed turn
    /// never exposes data or a plot, even if the payload carried them.
    Failed { error: String },
}

/// One natural-language query plus its merged structured response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageTurn {
    pub message_id: Uuid,
    pub natural_language_query: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub outcome: TurnOutcome,
}

impl MessageTurn {
    /// Builds a turn from the raw response fields of the wire contract.
    ///
    /// An execution error invalidates every query-result field: when
    /// `error` is present the data, plot and description are discarded and
    /// the turn becomes `Failed`, whatever else the payload carried.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        message_id: Uuid,
        natural_language_query: String,
        timestamp: Option<DateTime<Utc>>,
        description: Option<String>,
        generated_query: Option<String>,
        plot_url: Option<String>,
        plot_error: Option<String>,
        data: Option<ResultPage>,
        error: Option<String>,
    ) -> Self {
        let outcome = match error {
            Some(error) => TurnOutcome::Failed { error },
            None => TurnOutcome::Answered(TurnAnswer {
                description,
                generated_query,
                plot_url,
                plot_error,
                data,
            }),
        };
        Self {
            message_id,
            natural_language_query,
            timestamp,
            outcome,
        }
    }

    /// The cached result page, if this turn has one.
    pub fn data(&self) -> Option<&ResultPage> {
        match &self.outcome {
            TurnOutcome::Answered(answer) => answer.data.as_ref(),
            _ => None,
        }
    }

    /// The generated database query, if this turn produced one.
    pub fn generated_query(&self) -> Option<&str> {
        match &self.outcome {
            TurnOutcome::Answered(answer) => answer.generated_query.as_deref(),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, TurnOutcome::Failed { .. })
    }

    /// Replaces the cached result page with a newly loaded one.
    ///
    /// Only an answered turn can carry data; pending and failed turns
    /// silently refuse the page. Returns whether the page was applied.
    pub fn replace_data(&mut self, page: ResultPage) -> bool {
        match &mut self.outcome {
            TurnOutcome::Answered(answer) => {
                answer.data = Some(page);
                true
            }
            _ => false,
        }
    }
}

/// Result of one direct console execution.
///
/// The console result lives outside any transcript: it is replaced on
/// every execution and never merged into a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConsoleOutcome {
    /// The query executed; `executed_query` is the exact text that ran,
    /// which pagination re-issues regardless of later editor edits.
    Success {
        executed_query: String,
        data: ResultPage,
    },
    /// The query failed against the data source.
    Failed { error: String },
}

impl ConsoleOutcome {
    pub fn data(&self) -> Option<&ResultPage> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failed { .. } => None,
        }
    }
}
