//! Repository abstractions for data access.
//!
//! Repositories provide a typed interface over single collections, hiding
//! the document store from the rest of the application. Tenant config
//! assembly does not go through them; it talks to the store directly.

pub mod board;
pub mod entity;
pub mod user;

pub use entity::{
    BoardRepository, CustomFieldRepository, Entity, EntityRepository, ListRepository,
    ParentScoped, SwimlaneRepository, UserRepository,
};
