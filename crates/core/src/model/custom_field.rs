//! Custom field definitions.
//!
//! A custom field is the only entity shared by several boards: `board_ids`
//! lists every board it is attached to.

use serde::{Deserialize, Serialize};
use tableau_shared::types::{BoardId, CustomFieldId};

/// A field definition shared across one or more boards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    /// Custom field ID.
    #[serde(rename = "_id")]
    pub id: CustomFieldId,
    /// Display name.
    pub name: String,
    /// Field kind (`text`, `number`, `date`, `dropdown`, ...).
    #[serde(rename = "type")]
    pub field_type: String,
    /// Boards the field belongs to.
    #[serde(default)]
    pub board_ids: Vec<BoardId>,
    /// Kind-specific settings, kept as stored.
    #[serde(default)]
    pub settings: serde_json::Value,
    /// Show the field on minicards.
    #[serde(default)]
    pub show_on_card: bool,
    /// Add the field to new cards automatically.
    #[serde(default)]
    pub automatically_on_card: bool,
    /// Always show the field on cards.
    #[serde(default)]
    pub always_on_card: bool,
}

impl CustomField {
    /// Creates a custom field attached to `board_ids`.
    #[must_use]
    pub fn new(
        id: impl Into<CustomFieldId>,
        name: impl Into<String>,
        field_type: impl Into<String>,
        board_ids: Vec<BoardId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type: field_type.into(),
            board_ids,
            settings: serde_json::Value::Null,
            show_on_card: false,
            automatically_on_card: false,
            always_on_card: false,
        }
    }

    /// Returns true if the field is attached to `board_id`.
    #[must_use]
    pub fn belongs_to(&self, board_id: &BoardId) -> bool {
        self.board_ids.contains(board_id)
    }
}
