//! Plan documents read from and written to disk by the CLI.
//!
//! The input document carries what the form-editing layer owns: the room
//! list, any cached placement, and annotations. Output reports are plain
//! serde views over engine state.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use floorplan::adjacency::{Adjacency, AdjacencyEdge};
use floorplan::model::{Annotation, Placement, Room, RoomId};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("invalid plan document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDocument {
    pub rooms: Vec<Room>,
    /// Positions cached from a previous session. Missing rooms are laid out fresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl PlanDocument {
    pub fn from_reader(reader: impl Read) -> Result<Self, DocumentError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn open(path: &Path) -> Result<Self, DocumentError> {
        let file = File::open(path).map_err(|source| DocumentError::Io { path: path.display().to_string(), source })?;
        Self::from_reader(BufReader::new(file))
    }
}

/// Shared walls plus declared pairs that found no wall.
#[derive(Debug, Serialize)]
pub struct AdjacencyReport<'a> {
    pub edges: &'a [AdjacencyEdge],
    pub unmatched_declarations: Vec<UnmatchedDeclaration>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UnmatchedDeclaration {
    pub room: RoomId,
    pub declared: RoomId,
}

impl<'a> AdjacencyReport<'a> {
    #[must_use]
    pub fn new(adjacency: &'a Adjacency) -> Self {
        let unmatched_declarations = adjacency
            .unmatched_declarations()
            .iter()
            .map(|(room, declared)| UnmatchedDeclaration { room: *room, declared: *declared })
            .collect();
        Self { edges: adjacency.edges(), unmatched_declarations }
    }
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
