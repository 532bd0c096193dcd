//! # twoslotmags - Two-slot extended magazines
//!
//! Patches a game server's item template table so that "extended" magazines
//! (one cell wide, taller than two cells, with a round capacity inside a
//! configured range) take up two inventory cells instead of three or more.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use twoslotmags::config::Config;
//! use twoslotmags::items::ItemDatabase;
//! use twoslotmags::mods::{ModHost, TwoSlotExtendedMags};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let mut db = ItemDatabase::load(&config.database.items_path, config.database.max_file_bytes)?;
//!
//!     let mut host = ModHost::new();
//!     host.register(Box::new(TwoSlotExtendedMags::new(&config.resizer)));
//!     host.run_post_db_load(&mut db)?;
//!
//!     db.save(config.database.output_path())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`resizer`] - the extended magazine predicate and the resize pass
//! - [`items`] - item template model and JSON persistence
//! - [`mods`] - post-database-load hook and the mod host
//! - [`config`] - TOML configuration
//! - [`logutil`] - logger setup and log-safe string escaping

pub mod config;
pub mod items;
pub mod logutil;
pub mod mods;
pub mod resizer;
