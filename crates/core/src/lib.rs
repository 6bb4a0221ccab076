//! Core domain logic for Tableau.
//!
//! This crate contains the kanban domain model and the declarative
//! aggregation pipeline used to assemble a tenant configuration. It has ZERO
//! database dependencies: a [`pipeline::Pipeline`] is a plain value that a
//! document store interprets.
//!
//! # Modules
//!
//! - `model` - Boards, swimlanes, lists, custom fields, users and the assembled `TenantConfig`
//! - `pipeline` - Stage types, the config pipeline builder and pair/map reshaping

pub mod model;
pub mod pipeline;

pub use model::{Board, BoardBundle, BoardType, CustomField, List, Swimlane, TenantConfig, User};
pub use pipeline::{Collection, Pipeline, Stage, build_config_pipeline};
