//! The assembled tenant configuration snapshot.
//!
//! A `TenantConfig` is a read-only, point-in-time projection. It is computed
//! fresh for every request and never written back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tableau_shared::types::{BoardId, CustomFieldId, ListId, SwimlaneId, UserId};

use super::{Board, CustomField, List, Swimlane, User};

/// Everything attached to one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardBundle {
    /// The board document.
    pub board: Board,
    /// Swimlanes whose `boardId` is this board.
    pub swimlanes: BTreeMap<SwimlaneId, Swimlane>,
    /// Lists whose `boardId` is this board.
    pub lists: BTreeMap<ListId, List>,
    /// Custom fields whose `boardIds` contain this board.
    pub custom_fields: BTreeMap<CustomFieldId, CustomField>,
}

impl BoardBundle {
    /// Creates a bundle holding only the board.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            swimlanes: BTreeMap::new(),
            lists: BTreeMap::new(),
            custom_fields: BTreeMap::new(),
        }
    }
}

/// Boards of one tenant with their swimlanes, lists and custom fields, plus
/// every named user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Matching boards keyed by ID.
    pub boards: BTreeMap<BoardId, BoardBundle>,
    /// Users with a username keyed by ID.
    pub users: BTreeMap<UserId, User>,
}

impl TenantConfig {
    /// Returns the bundle of a board, if it matched.
    #[must_use]
    pub fn board(&self, id: &BoardId) -> Option<&BoardBundle> {
        self.boards.get(id)
    }

    /// Returns true if no board matched.
    #[must_use]
    pub fn has_no_boards(&self) -> bool {
        self.boards.is_empty()
    }

    /// Returns every board holding the given custom field.
    pub fn boards_with_custom_field<'a>(
        &'a self,
        id: &'a CustomFieldId,
    ) -> impl Iterator<Item = &'a BoardId> + 'a {
        self.boards
            .iter()
            .filter(move |(_, bundle)| bundle.custom_fields.contains_key(id))
            .map(|(board_id, _)| board_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_nested_snapshot() {
        let value = json!({
            "boards": {
                "b1": {
                    "board": {"_id": "b1", "title": "Ops", "slug": "tableau-acme-ops", "type": "board"},
                    "swimlanes": {"s1": {"_id": "s1", "title": "Default", "boardId": "b1", "sort": 0}},
                    "lists": {},
                    "customFields": {
                        "c1": {"_id": "c1", "name": "Priority", "type": "dropdown", "boardIds": ["b1", "b2"]}
                    }
                }
            },
            "users": {"u1": {"_id": "u1", "username": "alice"}}
        });

        let config: TenantConfig = serde_json::from_value(value).unwrap();
        let bundle = config.board(&BoardId::from("b1")).unwrap();

        assert_eq!(bundle.board.slug, "tableau-acme-ops");
        assert!(bundle.board.is_regular());
        assert_eq!(bundle.swimlanes[&SwimlaneId::from("s1")].sort, Some(0.0));
        assert!(bundle.lists.is_empty());
        assert_eq!(config.users[&UserId::from("u1")].username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_missing_bundle_field_is_rejected() {
        let value = json!({
            "boards": {"b1": {"board": {"_id": "b1", "title": "Ops", "slug": "x"}}},
            "users": {}
        });

        assert!(serde_json::from_value::<TenantConfig>(value).is_err());
    }

    #[test]
    fn test_serializes_custom_fields_camel_case() {
        let mut config = TenantConfig::default();
        config.boards.insert(
            BoardId::from("b1"),
            BoardBundle::new(Board::new("b1", "Ops", "tableau-acme-ops")),
        );

        let value = serde_json::to_value(&config).unwrap();
        assert!(value["boards"]["b1"].get("customFields").is_some());
        assert!(value["boards"]["b1"].get("custom_fields").is_none());
    }

    #[test]
    fn test_boards_with_custom_field() {
        let field = CustomField::new(
            "c1",
            "Priority",
            "dropdown",
            vec![BoardId::from("b1"), BoardId::from("b2")],
        );
        let mut config = TenantConfig::default();
        for id in ["b1", "b2", "b3"] {
            let mut bundle = BoardBundle::new(Board::new(id, id, format!("tableau-{id}")));
            if field.belongs_to(&bundle.board.id) {
                bundle.custom_fields.insert(field.id.clone(), field.clone());
            }
            config.boards.insert(BoardId::from(id), bundle);
        }

        let holders: Vec<_> = config.boards_with_custom_field(&field.id).collect();
        assert_eq!(holders, vec![&BoardId::from("b1"), &BoardId::from("b2")]);
    }
}
