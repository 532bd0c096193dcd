//! Item template table: raw-preserving model, persistence and errors.

pub mod database;
pub mod errors;
pub mod types;

pub use database::{lock_path_for, ItemDatabase, DEFAULT_MAX_FILE_BYTES};
pub use errors::DatabaseError;
pub use types::{ItemTable, TemplateItem};
