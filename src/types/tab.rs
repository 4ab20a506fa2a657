use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// A single imported cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    String(String),
}

impl CellValue {
    /// Text shown in the grid for this value.
    pub fn display(&self) -> String {
        match self {
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// One record of a tab: field name to value, in the order fields were first
/// written.
///
/// Serializes as a JSON object so it can be handed to the grid as row data.
#[derive(Debug, Clone, Default)]
pub struct Row {
    entries: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, keeping the key's original position when it
    /// already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Append a field the caller knows is not present yet.
    pub(crate) fn push_unique(&mut self, key: impl Into<String>, value: CellValue) {
        self.entries.push((key.into(), value));
    }

    /// Builder-style [`Row::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<CellValue> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rows compare as maps: key order does not matter.
impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of cell values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Row, A::Error> {
                let mut row = Row::new();
                while let Some((key, value)) = access.next_entry::<String, CellValue>()? {
                    row.insert(key, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

/// A grid column bound to a row field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub header_name: String,
    pub field: String,
}

impl Column {
    /// Column whose header is the field name itself.
    pub fn for_field(field: &str) -> Self {
        Self {
            header_name: field.to_string(),
            field: field.to_string(),
        }
    }
}

/// A named row/column set: one worksheet of an imported or exported workbook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub title: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Tab {
    pub fn new(title: impl Into<String>, columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows,
        }
    }

    /// All row keys in first-seen order.
    pub fn field_union(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut fields: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if seen.insert(key) {
                    fields.push(key.to_string());
                }
            }
        }
        fields
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_row_insert_keeps_position() {
        let mut row = Row::new().with("a", 1.0).with("b", "x");
        row.insert("a", 2.0);
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(row.get("a"), Some(&CellValue::Number(2.0)));
    }

    #[test]
    fn test_row_equality_ignores_key_order() {
        let a = Row::new().with("x", 1.0).with("y", "z");
        let b = Row::new().with("y", "z").with("x", 1.0);
        assert_eq!(a, b);
        assert_ne!(a, Row::new().with("x", 1.0));
    }

    #[test]
    fn test_row_json_preserves_order() {
        let row = Row::new().with("zeta", true).with("alpha", 3.5).with("mid", "t");
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"zeta":true,"alpha":3.5,"mid":"t"}"#);
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_field_union_first_seen_order() {
        let tab = Tab::new(
            "S",
            Vec::new(),
            vec![
                Row::new().with("a", 1.0),
                Row::new().with("b", 2.0).with("a", 3.0),
                Row::new().with("c", 4.0),
            ],
        );
        assert_eq!(tab.field_union(), vec!["a", "b", "c"]);
    }
}
