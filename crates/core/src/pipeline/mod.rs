//! Config assembly pipeline.
//!
//! This module describes, as plain data, the aggregation that rebuilds a
//! tenant configuration from the flat `boards`, `swimlanes`, `lists`,
//! `customFields` and `users` collections.
//!
//! # Modules
//!
//! - `stage` - Stage, join and predicate types
//! - `builder` - The tenant config stage sequence
//! - `reshape` - Pair array and mapping conversion

pub mod builder;
pub mod reshape;
pub mod stage;


#[cfg(test)]
mod builder_props;

pub use builder::{
    BOARD_FIELD, BOARDS_FIELD, CUSTOM_FIELDS_FIELD, LISTS_FIELD, SWIMLANES_FIELD, USERS_FIELD,
    build_config_pipeline,
};
pub use reshape::{Pair, map_to_pairs, pairs_to_map};
pub use stage::{
    Collection, ID_FIELD, JoinSpec, MatchKind, PAIR_KEY, PAIR_VALUE, Pipeline, Predicate, Stage,
};
