use super::{ModError, ModOutcome, PostDbLoadMod};
use crate::config::ResizerConfig;
use crate::items::ItemDatabase;
use crate::resizer::MagazineResizer;
use log::info;

/// Shrinks extended magazines to two inventory cells.
#[derive(Debug, Clone)]
pub struct TwoSlotExtendedMags {
    resizer: MagazineResizer,
    dry_run: bool,
}

impl TwoSlotExtendedMags {
    pub const NAME: &'static str = "TwoSlotExtendedMags";

    pub fn new(config: &ResizerConfig) -> Self {
        Self {
            resizer: MagazineResizer::from_config(config),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn resizer(&self) -> &MagazineResizer {
        &self.resizer
    }
}

impl PostDbLoadMod for TwoSlotExtendedMags {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn post_db_load(&self, database: &mut ItemDatabase) -> Result<ModOutcome, ModError> {
        let report = self.resizer.apply(database.items_mut(), self.dry_run);

        if report.dry_run {
            info!(
                "Dry run: {} extended magazines would be downsized ({} stack offsets trimmed)",
                report.count(),
                report.offsets_trimmed
            );
        } else {
            info!(
                "Downsized! {} extended magazines now take two slots ({} stack offsets trimmed)",
                report.count(),
                report.offsets_trimmed
            );
        }

        Ok(ModOutcome {
            mod_name: Self::NAME.to_string(),
            items_changed: report.count(),
            changed_ids: report.resized,
            dry_run: report.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{ItemTable, TemplateItem};
    use crate::resizer::MAGAZINE_CATEGORY_ID;

    fn database() -> ItemDatabase {
        let mut items = ItemTable::new();
        items.insert(
            "pmag40".to_string(),
            TemplateItem::new("pmag40", MAGAZINE_CATEGORY_ID)
                .with_size(1, 3)
                .with_extra_size_down(1)
                .with_cartridge(Some(40)),
        );
        items.insert(
            "stanag30".to_string(),
            TemplateItem::new("stanag30", MAGAZINE_CATEGORY_ID)
                .with_size(1, 2)
                .with_cartridge(Some(30)),
        );
        ItemDatabase::new(items)
    }

    #[test]
    fn test_post_db_load_resizes() {
        let mut db = database();
        let m = TwoSlotExtendedMags::new(&ResizerConfig::new(20, 40));
        let outcome = m.post_db_load(&mut db).unwrap();

        assert_eq!(outcome.mod_name, "TwoSlotExtendedMags");
        assert_eq!(outcome.items_changed, 1);
        assert_eq!(outcome.changed_ids, vec!["pmag40".to_string()]);
        assert!(!outcome.dry_run);

        let pmag = db.get("pmag40").unwrap();
        assert_eq!(pmag.height(), Some(2));
        assert_eq!(pmag.extra_size_down(), Some(0));
    }

    #[test]
    fn test_dry_run_leaves_database_untouched() {
        let mut db = database();
        let before = db.clone();
        let m = TwoSlotExtendedMags::new(&ResizerConfig::new(20, 40)).with_dry_run(true);
        let outcome = m.post_db_load(&mut db).unwrap();

        assert!(outcome.dry_run);
        assert_eq!(outcome.items_changed, 1);
        assert_eq!(db, before);
    }
}
