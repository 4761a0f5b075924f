// src/normalize.rs
//! # Response normalizer
//!
//! Turns one decoded API payload into zero or more named, exportable tables.
//!
//! Each requested field is handled on its own, in request order:
//!
//! | `payload[field]`        | result                                          |
//! |-------------------------|-------------------------------------------------|
//! | absent                  | skipped (no entry)                              |
//! | `[]`                    | table with no rows and no columns               |
//! | `[ {..}, {..}, 7, .. ]` | one row per element, columns = union of keys   |
//! | `{ .. }`                | one-row table                                   |
//! | scalar / `null`         | [`FieldData::Scalar`], JSON export only         |
//!
//! Bare scalars inside a list land in a column named after the field.
//! Column order is first-seen; ragged rows are padded with `null`.
//!
//! The only failure is a payload that is not an object at all.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value};

use crate::error::NormalizeError;

/// Runtime shape of a JSON value, matched exhaustively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JsonShape<'a> {
    Sequence(&'a [Value]),
    Mapping(&'a Map<String, Value>),
    Scalar(&'a Value),
    Null,
}

impl<'a> JsonShape<'a> {
    pub fn of(v: &'a Value) -> Self {
        match v {
            Value::Array(items) => JsonShape::Sequence(items),
            Value::Object(map) => JsonShape::Mapping(map),
            Value::Null => JsonShape::Null,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => JsonShape::Scalar(v),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            JsonShape::Sequence(_) => "array",
            JsonShape::Mapping(_) => "object",
            JsonShape::Scalar(Value::String(_)) => "string",
            JsonShape::Scalar(Value::Number(_)) => "number",
            JsonShape::Scalar(_) => "boolean",
            JsonShape::Null => "null",
        }
    }
}

/// Column-aligned rows for one field. `rows[i][j]` belongs to `columns[j]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedTable {
    field: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl NormalizedTable {
    pub fn empty(field: &str) -> Self {
        Self { field: s!(field), columns: Vec::new(), rows: Vec::new() }
    }

    /// Build from a list of JSON elements (mappings and/or bare scalars).
    pub fn from_elements(field: &str, items: &[Value]) -> Self {
        let mut columns: Vec<String> = Vec::new();

        // Pass 1: column union in first-seen order.
        for item in items {
            match JsonShape::of(item) {
                JsonShape::Mapping(map) => {
                    for key in map.keys() {
                        push_unique(&mut columns, key);
                    }
                }
                JsonShape::Sequence(_) | JsonShape::Scalar(_) | JsonShape::Null => {
                    push_unique(&mut columns, field);
                }
            }
        }

        // Pass 2: align every element to the union.
        let rows = items
            .iter()
            .map(|item| {
                columns
                    .iter()
                    .map(|col| match JsonShape::of(item) {
                        JsonShape::Mapping(map) => map.get(col).cloned().unwrap_or(Value::Null),
                        JsonShape::Sequence(_) | JsonShape::Scalar(_) | JsonShape::Null => {
                            if col == field { item.clone() } else { Value::Null }
                        }
                    })
                    .collect()
            })
            .collect();

        Self { field: s!(field), columns, rows }
    }

    /// A single object becomes a one-row table.
    pub fn from_mapping(field: &str, map: &Map<String, Value>) -> Self {
        Self {
            field: s!(field),
            columns: map.keys().cloned().collect(),
            rows: vec![map.values().cloned().collect()],
        }
    }

    pub fn field(&self) -> &str { &self.field }
    pub fn columns(&self) -> &[String] { &self.columns }
    pub fn rows(&self) -> &[Vec<Value>] { &self.rows }
    pub fn nrows(&self) -> usize { self.rows.len() }
    pub fn ncols(&self) -> usize { self.columns.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Cell lookup by column name. `None` when the column does not exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let ci = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).and_then(|r| r.get(ci))
    }
}

/// Rows serialize as objects keyed in column order; padded cells are `null`.
impl Serialize for NormalizedTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowRef { columns: &self.columns, cells: row })?;
        }
        seq.end()
    }
}

struct RowRef<'a> {
    columns: &'a [String],
    cells: &'a [Value],
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (col, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(col, cell)?;
        }
        map.end()
    }
}

/// What one requested field turned into.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldData {
    Table(NormalizedTable),
    /// Not tabular; shown as raw JSON and exported as JSON only.
    Scalar(Value),
}

impl Serialize for FieldData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldData::Table(t) => t.serialize(serializer),
            FieldData::Scalar(v) => v.serialize(serializer),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedField {
    pub name: String,
    pub data: FieldData,
}

impl NormalizedField {
    pub fn table(&self) -> Option<&NormalizedTable> {
        match &self.data {
            FieldData::Table(t) => Some(t),
            FieldData::Scalar(_) => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.data, FieldData::Scalar(_))
    }
}

/// Normalize one field value. Never fails.
pub fn normalize_value(field: &str, value: &Value) -> FieldData {
    match JsonShape::of(value) {
        JsonShape::Sequence(items) if items.is_empty() => {
            FieldData::Table(NormalizedTable::empty(field))
        }
        JsonShape::Sequence(items) => FieldData::Table(NormalizedTable::from_elements(field, items)),
        JsonShape::Mapping(map) => FieldData::Table(NormalizedTable::from_mapping(field, map)),
        JsonShape::Scalar(v) => FieldData::Scalar(v.clone()),
        JsonShape::Null => FieldData::Scalar(Value::Null),
    }
}

/// Normalize every requested field present in `payload`, in request order.
pub fn normalize<S: AsRef<str>>(
    payload: &Value,
    requested: &[S],
) -> Result<Vec<NormalizedField>, NormalizeError> {
    let map = match JsonShape::of(payload) {
        JsonShape::Mapping(map) => map,
        other => {
            logd!("Normalize: payload is {}, not an object", other.name());
            return Err(NormalizeError::InvalidPayloadShape { found: other.name() });
        }
    };

    let mut out = Vec::with_capacity(requested.len());
    for field in requested {
        let field = field.as_ref();
        let Some(value) = map.get(field) else {
            logd!("Normalize: field {field:?} absent, skipped");
            continue;
        };
        let data = normalize_value(field, value);
        if let FieldData::Table(t) = &data {
            logd!("Normalize: field {field:?} → {} rows × {} cols", t.nrows(), t.ncols());
        }
        out.push(NormalizedField { name: s!(field), data });
    }
    Ok(out)
}

fn push_unique(columns: &mut Vec<String>, key: &str) {
    if !columns.iter().any(|c| c == key) {
        columns.push(s!(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn cols(t: &NormalizedTable) -> Vec<&str> {
        t.columns().iter().map(String::as_str).collect()
    }

    #[test]
    fn shape_names() {
        assert_eq!(JsonShape::of(&json!([])).name(), "array");
        assert_eq!(JsonShape::of(&json!({})).name(), "object");
        assert_eq!(JsonShape::of(&json!("x")).name(), "string");
        assert_eq!(JsonShape::of(&json!(1.5)).name(), "number");
        assert_eq!(JsonShape::of(&json!(true)).name(), "boolean");
        assert_eq!(JsonShape::of(&Value::Null).name(), "null");
    }

    #[test]
    fn union_is_first_seen() {
        let t = NormalizedTable::from_elements(
            "f",
            &[json!({"b": 1, "a": 2}), json!({"c": 3, "a": 4})],
        );
        assert_eq!(cols(&t), vec!["b", "a", "c"]);
        assert_eq!(t.rows()[0], vec![json!(1), json!(2), Value::Null]);
        assert_eq!(t.rows()[1], vec![Value::Null, json!(4), json!(3)]);
    }

    #[test]
    fn mixed_scalars_and_objects() {
        let t = NormalizedTable::from_elements("tags", &[json!("x"), json!({"id": 1}), json!(null)]);
        assert_eq!(cols(&t), vec!["tags", "id"]);
        assert_eq!(t.get(0, "tags"), Some(&json!("x")));
        assert_eq!(t.get(0, "id"), Some(&Value::Null));
        assert_eq!(t.get(1, "id"), Some(&json!(1)));
        assert_eq!(t.get(2, "tags"), Some(&Value::Null));
    }

    #[test]
    fn field_named_column_collides_with_object_key() {
        // A scalar element and an object key sharing the field name share the column.
        let t = NormalizedTable::from_elements("id", &[json!(5), json!({"id": 6})]);
        assert_eq!(cols(&t), vec!["id"]);
        assert_eq!(t.rows(), &[vec![json!(5)], vec![json!(6)]]);
    }

    #[test]
    fn null_field_is_scalar() {
        assert_eq!(normalize_value("x", &Value::Null), FieldData::Scalar(Value::Null));
    }

    #[test]
    fn table_serializes_as_row_objects() {
        let t = NormalizedTable::from_elements("f", &[json!({"a": 1, "b": 2}), json!({"a": 3})]);
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v, json!([{"a": 1, "b": 2}, {"a": 3, "b": null}]));
    }

    #[test]
    fn invalid_shape_names_what_was_found() {
        let err = normalize(&json!([1, 2]), &["a"]).unwrap_err();
        assert_eq!(err, NormalizeError::InvalidPayloadShape { found: "array" });
    }
}
