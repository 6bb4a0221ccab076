//! List (board column) documents.

use serde::{Deserialize, Deserializer, Serialize};
use tableau_shared::types::{BoardId, ListId, SwimlaneId};

/// Work-in-progress limit of a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipLimit {
    /// Maximum number of cards.
    #[serde(default)]
    pub value: i32,
    /// Whether the limit is enforced.
    #[serde(default)]
    pub enabled: bool,
    /// Whether exceeding the limit only warns.
    #[serde(default)]
    pub soft: bool,
}

/// A column within a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    /// List ID.
    #[serde(rename = "_id")]
    pub id: ListId,
    /// Title.
    pub title: String,
    /// Owning board.
    pub board_id: BoardId,
    /// Swimlane the list is pinned to, `None` for board-wide lists. A stored
    /// empty string also means board-wide.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub swimlane_id: Option<SwimlaneId>,
    /// Position within the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<f64>,
    /// Whether the list is archived.
    #[serde(default)]
    pub archived: bool,
    /// WIP limit settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wip_limit: Option<WipLimit>,
}

impl List {
    /// Creates an unarchived board-wide list on `board_id`.
    #[must_use]
    pub fn new(id: impl Into<ListId>, title: impl Into<String>, board_id: impl Into<BoardId>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            board_id: board_id.into(),
            swimlane_id: None,
            sort: None,
            archived: false,
            wip_limit: None,
        }
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<SwimlaneId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|id| !id.is_empty()).map(SwimlaneId::from))
}
