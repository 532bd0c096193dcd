//! Item template table.
//!
//! Each template is kept as the raw JSON value it was read as, so writing the
//! table back reproduces every record byte-for-byte in meaning, including
//! fields of unexpected types. The fields the resizer cares about are read
//! through typed accessors that treat a missing or wrongly typed value as
//! absent; only `Height` and `ExtraSizeDown` are ever written.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Item table keyed by template id, as stored in `templates/items.json`.
pub type ItemTable = BTreeMap<String, TemplateItem>;

/// A single item template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateItem {
    raw: Value,
}

impl TemplateItem {
    pub fn new(id: &str, parent: &str) -> Self {
        Self {
            raw: json!({ "_id": id, "_parent": parent, "_props": {} }),
        }
    }

    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    pub fn into_value(self) -> Value {
        self.raw
    }

    pub fn id(&self) -> Option<&str> {
        self.raw.get("_id").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.raw.get("_name").and_then(Value::as_str)
    }

    /// Category the template belongs to.
    pub fn parent(&self) -> Option<&str> {
        self.raw.get("_parent").and_then(Value::as_str)
    }

    pub fn width(&self) -> Option<i64> {
        self.prop("Width").and_then(as_integer)
    }

    pub fn height(&self) -> Option<i64> {
        self.prop("Height").and_then(as_integer)
    }

    /// Extra cells the item occupies below its base footprint when stacked.
    pub fn extra_size_down(&self) -> Option<i64> {
        self.prop("ExtraSizeDown").and_then(as_integer)
    }

    /// Declared `_max_count` values of the ammo loading slots, in slot order.
    ///
    /// Each entry is `None` when the slot has no `_max_count` (or it is
    /// `null`), and `Some(raw)` otherwise, whatever its type.
    pub fn cartridge_max_counts(&self) -> Vec<Option<&Value>> {
        self.prop("Cartridges")
            .and_then(Value::as_array)
            .map(|slots| {
                slots
                    .iter()
                    .map(|slot| slot.get("_max_count").filter(|v| !v.is_null()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_height(&mut self, height: i64) {
        self.props_mut().insert("Height".to_string(), json!(height));
    }

    pub fn set_extra_size_down(&mut self, offset: i64) {
        self.props_mut()
            .insert("ExtraSizeDown".to_string(), json!(offset));
    }

    pub fn with_name(mut self, name: &str) -> Self {
        object_mut(&mut self.raw).insert("_name".to_string(), json!(name));
        self
    }

    pub fn with_size(mut self, width: i64, height: i64) -> Self {
        self.props_mut().insert("Width".to_string(), json!(width));
        self.set_height(height);
        self
    }

    pub fn with_extra_size_down(mut self, offset: i64) -> Self {
        self.set_extra_size_down(offset);
        self
    }

    /// Append a cartridge slot; `None` models a slot without `_max_count`.
    pub fn with_cartridge(mut self, max_count: Option<i64>) -> Self {
        let slot = match max_count {
            Some(count) => json!({ "_name": "cartridges", "_max_count": count }),
            None => json!({ "_name": "cartridges" }),
        };
        let slots = self
            .props_mut()
            .entry("Cartridges")
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(slots) = slots {
            slots.push(slot);
        }
        self
    }

    /// Name for log lines, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name().or_else(|| self.id()).unwrap_or("<unnamed>")
    }

    fn prop(&self, key: &str) -> Option<&Value> {
        self.raw.get("_props")?.get(key)
    }

    fn props_mut(&mut self) -> &mut Map<String, Value> {
        let root = object_mut(&mut self.raw);
        object_mut(
            root.entry("_props")
                .or_insert_with(|| Value::Object(Map::new())),
        )
    }
}

/// Integral JSON numbers (including `30.0`) as `i64`; anything else is absent.
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    }
}

// Replaces a non-object with an empty object; only reached from writers.
fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just made an object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_magazine_template() {
        let item = TemplateItem::from_value(json!({
            "_id": "55d4887d4bdc2d962f8b4570",
            "_name": "mag_stanag_556_30",
            "_parent": "5448bc234bdc2d3c308b4569",
            "_type": "Item",
            "_props": {
                "Width": 1,
                "Height": 2,
                "ExtraSizeDown": 1,
                "Weight": 0.117,
                "Cartridges": [
                    { "_name": "cartridges", "_max_count": 30, "_props": { "filters": [] } }
                ]
            }
        }));

        assert_eq!(item.id(), Some("55d4887d4bdc2d962f8b4570"));
        assert_eq!(item.parent(), Some("5448bc234bdc2d3c308b4569"));
        assert_eq!(item.width(), Some(1));
        assert_eq!(item.height(), Some(2));
        assert_eq!(item.extra_size_down(), Some(1));
        assert_eq!(item.cartridge_max_counts(), vec![Some(&json!(30))]);
    }

    #[test]
    fn wrong_typed_fields_read_as_absent() {
        let item = TemplateItem::from_value(json!({
            "_id": 12,
            "_parent": 5,
            "_props": {
                "Width": "1",
                "Height": null,
                "ExtraSizeDown": true,
                "Cartridges": [ 7, { "_max_count": null }, { "_max_count": "thirty" }, { "_max_count": 25.0 } ]
            }
        }));

        assert_eq!(item.id(), None);
        assert_eq!(item.parent(), None);
        assert_eq!(item.width(), None);
        assert_eq!(item.height(), None);
        assert_eq!(item.extra_size_down(), None);
        assert_eq!(
            item.cartridge_max_counts(),
            vec![None, None, Some(&json!("thirty")), Some(&json!(25.0))]
        );
    }

    #[test]
    fn non_object_props_and_records_read_as_absent() {
        let item = TemplateItem::from_value(json!({ "_id": "x", "_props": null }));
        assert_eq!(item.height(), None);
        assert!(item.cartridge_max_counts().is_empty());

        let item = TemplateItem::from_value(json!("not a record"));
        assert_eq!(item.parent(), None);
        assert_eq!(item.display_name(), "<unnamed>");
    }

    #[test]
    fn integral_floats_read_as_integers() {
        assert_eq!(as_integer(&json!(30.0)), Some(30));
        assert_eq!(as_integer(&json!(2.5)), None);
        assert_eq!(as_integer(&json!(1e300)), None);
        assert_eq!(as_integer(&json!("30")), None);
    }

    #[test]
    fn setters_touch_only_their_field() {
        let raw = json!({
            "_id": "abc",
            "_parent": "p",
            "_proto": "proto-id",
            "_props": { "Height": 3, "ExtraSizeDown": 2, "Prefab": { "path": "assets/mag.bundle" } }
        });
        let mut item = TemplateItem::from_value(raw.clone());
        item.set_height(2);
        item.set_extra_size_down(1);

        let mut expected = raw;
        expected["_props"]["Height"] = json!(2);
        expected["_props"]["ExtraSizeDown"] = json!(1);
        assert_eq!(item.into_value(), expected);
    }

    #[test]
    fn serializes_as_the_raw_record() {
        let raw = json!({ "_id": "abc", "_props": { "Width": 2.5, "Cartridges": [7] } });
        let item: TemplateItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let item = TemplateItem::new("abc", "p");
        assert_eq!(item.display_name(), "abc");
        assert_eq!(item.with_name("PMAG").display_name(), "PMAG");
    }
}
