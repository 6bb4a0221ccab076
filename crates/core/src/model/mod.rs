//! Kanban domain model.
//!
//! Field names follow the stored documents (`_id`, `boardId`, `boardIds`), so
//! the same types decode both single documents and the assembled snapshot.

pub mod board;
pub mod custom_field;
pub mod list;
pub mod swimlane;
pub mod tenant;
pub mod user;

pub use board::{Board, BoardType};
pub use custom_field::CustomField;
pub use list::{List, WipLimit};
pub use swimlane::Swimlane;
pub use tenant::{BoardBundle, TenantConfig};
pub use user::{User, UserEmail};
