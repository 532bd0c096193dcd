//! Extended magazine downsizing.
//!
//! A magazine counts as "extended" when it is one cell wide, taller than
//! [`TARGET_HEIGHT`], and its round capacity falls inside the configured
//! inclusive range. Such magazines are shrunk to [`TARGET_HEIGHT`] cells and
//! lose one cell of `ExtraSizeDown` stacking allowance if they had any.
//!
//! Horizontal magazines (width other than 1) are never touched so their
//! footprint is not distorted. The pass is idempotent: a resized magazine is
//! no longer taller than the target, so a second pass skips it.

use crate::config::ResizerConfig;
use crate::items::types::as_integer;
use crate::items::{ItemTable, TemplateItem};
use crate::logutil::escape_log;
use log::{debug, warn};
use std::ops::RangeInclusive;

/// Category id shared by every magazine template.
pub const MAGAZINE_CATEGORY_ID: &str = "5448bc234bdc2d3c308b4569";

/// Height, in inventory cells, that extended magazines are normalized to.
pub const TARGET_HEIGHT: i64 = 2;

/// What a resize pass changed (or would change, for a dry run).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResizeReport {
    /// Table keys of the resized magazines, sorted.
    pub resized: Vec<String>,
    /// How many of those also had `ExtraSizeDown` reduced.
    pub offsets_trimmed: usize,
    pub dry_run: bool,
}

impl ResizeReport {
    pub fn count(&self) -> usize {
        self.resized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resized.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagazineResizer {
    min_capacity: i64,
    max_capacity: i64,
}

impl MagazineResizer {
    pub fn new(min_capacity: i64, max_capacity: i64) -> Self {
        if min_capacity > max_capacity {
            warn!(
                "Magazine capacity range {}..={} is empty; no magazine will be resized",
                min_capacity, max_capacity
            );
        }
        Self {
            min_capacity,
            max_capacity,
        }
    }

    pub fn from_config(config: &ResizerConfig) -> Self {
        Self::new(
            config.min_magazine_capacity_to_be_included,
            config.max_magazine_capacity_to_be_included,
        )
    }

    pub fn capacity_range(&self) -> RangeInclusive<i64> {
        self.min_capacity..=self.max_capacity
    }

    pub fn is_extended_magazine(&self, item: &TemplateItem) -> bool {
        item.parent() == Some(MAGAZINE_CATEGORY_ID)
            && item.width() == Some(1)
            && item.height().is_some_and(|h| h > TARGET_HEIGHT)
            && self.is_within_capacity(item)
    }

    /// Unknown capacity is never within range.
    fn is_within_capacity(&self, item: &TemplateItem) -> bool {
        magazine_capacity(item).is_some_and(|capacity| self.capacity_range().contains(&capacity))
    }

    /// Downsize every extended magazine in `items`; returns how many changed.
    pub fn resize(&self, items: &mut ItemTable) -> usize {
        self.apply(items, false).count()
    }

    /// Run the pass and report what changed. With `dry_run` the table is left
    /// untouched and the report describes what would have changed.
    pub fn apply(&self, items: &mut ItemTable, dry_run: bool) -> ResizeReport {
        let mut report = ResizeReport {
            dry_run,
            ..ResizeReport::default()
        };

        for (id, item) in items.iter_mut() {
            if !self.is_extended_magazine(item) {
                continue;
            }

            debug!(
                "{} {} ({}) height {:?} -> {}",
                if dry_run { "Would resize" } else { "Resizing" },
                id,
                escape_log(item.display_name()),
                item.height(),
                TARGET_HEIGHT
            );

            if stack_offset(item).is_some() {
                report.offsets_trimmed += 1;
            }
            if !dry_run {
                downsize(item);
            }
            report.resized.push(id.clone());
        }

        report
    }
}

impl From<&ResizerConfig> for MagazineResizer {
    fn from(config: &ResizerConfig) -> Self {
        Self::from_config(config)
    }
}

/// `_max_count` of the first cartridge slot that declares one.
///
/// The first declared value decides: if it is not an integer the capacity is
/// unknown, even when a later slot carries a usable count.
pub fn magazine_capacity(item: &TemplateItem) -> Option<i64> {
    item.cartridge_max_counts()
        .into_iter()
        .flatten()
        .next()
        .and_then(as_integer)
}

// Zero and absent are treated alike: neither is decremented.
fn stack_offset(item: &TemplateItem) -> Option<i64> {
    item.extra_size_down().filter(|offset| *offset != 0)
}

fn downsize(item: &mut TemplateItem) {
    item.set_height(TARGET_HEIGHT);
    if let Some(offset) = stack_offset(item) {
        item.set_extra_size_down(offset.saturating_sub(1));
    }
}
