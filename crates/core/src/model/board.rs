//! Board documents.

use serde::{Deserialize, Serialize};
use tableau_shared::types::BoardId;

/// Discriminator separating real boards from templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoardType {
    /// A regular board.
    #[default]
    Board,
    /// A board used as a template.
    TemplateBoard,
    /// The placeholder board holding a user's templates.
    TemplateContainer,
}

impl BoardType {
    /// Returns the tag stored in the `type` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::TemplateBoard => "template-board",
            Self::TemplateContainer => "template-container",
        }
    }
}

/// A kanban board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Board ID.
    #[serde(rename = "_id")]
    pub id: BoardId,
    /// Human title.
    pub title: String,
    /// URL slug derived from the title, used for tenant scoping.
    pub slug: String,
    /// Board kind.
    #[serde(rename = "type", default)]
    pub board_type: BoardType,
    /// Whether the board is archived.
    #[serde(default)]
    pub archived: bool,
    /// Display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Visibility (`private` or `public`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
}

impl Board {
    /// Creates a regular, unarchived board.
    #[must_use]
    pub fn new(id: impl Into<BoardId>, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slug: slug.into(),
            board_type: BoardType::Board,
            archived: false,
            color: None,
            permission: None,
        }
    }

    /// Returns true for regular boards (not templates).
    #[must_use]
    pub fn is_regular(&self) -> bool {
        self.board_type == BoardType::Board
    }
}
