//! Row models.
//!
//! Each submodule contains a `FromRow` struct matching the database row
//! plus a conversion into the domain entity from `taskboard-core`.

pub mod project;
pub mod task;
