//! Post-database-load mods.
//!
//! The host loads the item table once, then hands it to every registered mod
//! in registration order before anything else reads it. Mods get the database
//! as a parameter rather than looking it up from a global container.

use crate::items::{DatabaseError, ItemDatabase};
use log::info;
use thiserror::Error;

mod two_slot_extended_mags;

pub use two_slot_extended_mags::TwoSlotExtendedMags;

#[derive(Debug, Error)]
pub enum ModError {
    #[error("mod {name} failed: {reason}")]
    Failed { name: String, reason: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Summary a mod returns after patching the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModOutcome {
    pub mod_name: String,
    pub items_changed: usize,
    /// Ids of the changed item templates.
    pub changed_ids: Vec<String>,
    pub dry_run: bool,
}

/// Hook run after the item database is loaded and before the server is ready.
pub trait PostDbLoadMod {
    fn name(&self) -> &str;

    fn post_db_load(&self, database: &mut ItemDatabase) -> Result<ModOutcome, ModError>;
}

/// Ordered set of post-load mods.
#[derive(Default)]
pub struct ModHost {
    mods: Vec<Box<dyn PostDbLoadMod>>,
}

impl ModHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, m: Box<dyn PostDbLoadMod>) -> &mut Self {
        self.mods.push(m);
        self
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn mod_names(&self) -> Vec<&str> {
        self.mods.iter().map(|m| m.name()).collect()
    }

    /// Run every mod against `database`, stopping at the first failure.
    pub fn run_post_db_load(
        &self,
        database: &mut ItemDatabase,
    ) -> Result<Vec<ModOutcome>, ModError> {
        let mut outcomes = Vec::with_capacity(self.mods.len());
        for m in &self.mods {
            info!("Running post-DB-load mod {}", m.name());
            outcomes.push(m.post_db_load(database)?);
        }
        Ok(outcomes)
    }
}
