//! Builds the tenant config aggregation.

use super::stage::{Collection, ID_FIELD, JoinSpec, Pipeline, Predicate, Stage};
use crate::model::BoardType;

/// Envelope field holding the board document.
pub const BOARD_FIELD: &str = "board";
/// Board bundle field holding swimlanes.
pub const SWIMLANES_FIELD: &str = "swimlanes";
/// Board bundle field holding lists.
pub const LISTS_FIELD: &str = "lists";
/// Board bundle field holding custom fields.
pub const CUSTOM_FIELDS_FIELD: &str = "customFields";
/// Result field holding board bundles.
pub const BOARDS_FIELD: &str = "boards";
/// Result field holding users.
pub const USERS_FIELD: &str = "users";

/// Builds the stage sequence assembling a tenant config from the `boards`
/// collection.
///
/// `slug_pattern` is a regular expression matched case-insensitively against
/// each board's `slug`; only regular boards (not templates) survive. The
/// result is a single document shaped like
/// [`TenantConfig`](crate::model::TenantConfig).
///
/// Stage order matters: joins read `board._id` introduced by the envelope,
/// and the final reshaping reads the array produced by the group.
#[must_use]
pub fn build_config_pipeline(slug_pattern: &str) -> Pipeline {
    let board_id = format!("{BOARD_FIELD}.{ID_FIELD}");

    Pipeline::from(vec![
        Stage::Filter(vec![
            Predicate::regex_i("slug", slug_pattern),
            Predicate::equals("type", BoardType::Board.as_str()),
        ]),
        Stage::Envelope {
            field: BOARD_FIELD.to_string(),
        },
        Stage::Join(JoinSpec::equals(
            Collection::Swimlanes,
            &board_id,
            "boardId",
            SWIMLANES_FIELD,
        )),
        Stage::Join(JoinSpec::equals(
            Collection::Lists,
            &board_id,
            "boardId",
            LISTS_FIELD,
        )),
        Stage::Join(JoinSpec::contains(
            Collection::CustomFields,
            &board_id,
            "boardIds",
            CUSTOM_FIELDS_FIELD,
        )),
        Stage::PairsToMap {
            fields: owned(&[SWIMLANES_FIELD, LISTS_FIELD, CUSTOM_FIELDS_FIELD]),
        },
        Stage::KeyValue {
            key: board_id,
            value: owned(&[BOARD_FIELD, SWIMLANES_FIELD, LISTS_FIELD, CUSTOM_FIELDS_FIELD]),
        },
        Stage::Group {
            field: BOARDS_FIELD.to_string(),
        },
        Stage::PairsToMap {
            fields: owned(&[BOARDS_FIELD]),
        },
        Stage::Join(
            JoinSpec::all(Collection::Users, USERS_FIELD).with_filter(Predicate::non_empty("username")),
        ),
        Stage::PairsToMap {
            fields: owned(&[USERS_FIELD]),
        },
        Stage::Keep {
            fields: owned(&[BOARDS_FIELD, USERS_FIELD]),
        },
    ])
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(ToString::to_string).collect()
}
