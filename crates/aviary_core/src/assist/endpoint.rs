//! External endpoint contracts for inference and document extraction.
//!
//! # Responsibility
//! - Define what the core hands to the inference endpoint (an instruction
//!   plus a serialized collection snapshot) and what comes back (a structured
//!   proposal plus a human-readable summary).
//!
//! # Invariants
//! - Proposals are data; nothing here touches the item collection.
//! - The extraction endpoint only produces input text for the inference
//!   endpoint, never store mutations.

use crate::model::item::{Item, ItemId};
use crate::store::aviary_store::FieldUpdate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AssistResult<T> = Result<T, AssistError>;

/// Failure envelope from an external endpoint call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl AssistError {
    pub fn new(code: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            retryable,
        }
    }
}

impl Display for AssistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "assist endpoint error ({}): {}", self.code, self.message)
    }
}

impl Error for AssistError {}

/// One proposed mutation, mirroring the store operation shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProposedAction {
    AddOne { item: Item },
    AddMany { items: Vec<Item> },
    UpdateOne { id: ItemId, fields: Value },
    UpdateMany { updates: Vec<FieldUpdate> },
    DeleteOne { id: ItemId },
    DeleteBird { id: ItemId },
}

/// Structured result of one inference call: proposed mutations plus a
/// natural-language summary shown to the human for confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistProposal {
    pub summary: String,
    pub actions: Vec<ProposedAction>,
}

/// Inference endpoint: instruction + serialized snapshot in, proposal out.
pub trait AssistEndpoint {
    fn propose(&self, instruction: &str, snapshot_json: &str) -> AssistResult<AssistProposal>;
}

/// Document extraction endpoint: URL in, plain text out.
pub trait DocumentTextEndpoint {
    fn extract_text(&self, url: &str) -> AssistResult<String>;
}
