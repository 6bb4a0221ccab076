//! Swimlane documents.

use serde::{Deserialize, Serialize};
use tableau_shared::types::{BoardId, SwimlaneId};

/// A horizontal lane within a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Swimlane {
    /// Swimlane ID.
    #[serde(rename = "_id")]
    pub id: SwimlaneId,
    /// Title.
    pub title: String,
    /// Owning board.
    pub board_id: BoardId,
    /// Position within the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<f64>,
    /// Whether the swimlane is archived.
    #[serde(default)]
    pub archived: bool,
    /// Display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Swimlane {
    /// Creates an unarchived swimlane on `board_id`.
    #[must_use]
    pub fn new(
        id: impl Into<SwimlaneId>,
        title: impl Into<String>,
        board_id: impl Into<BoardId>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            board_id: board_id.into(),
            sort: None,
            archived: false,
            color: None,
        }
    }
}
