//! Common types used throughout ledgerview
//!
//! Records fetched from the account API have no fixed schema: a user row, a
//! transaction and a payment request all travel through the same engine. A
//! [`Record`] is therefore an open map from field name to a tagged
//! [`FieldValue`]; the semantic subtype of a value (numeric, temporal,
//! textual) is inferred where it is needed and never stored.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The value held by one field of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    /// Missing or `null`
    #[default]
    Absent,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

static ABSENT: FieldValue = FieldValue::Absent;

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Presence test used when picking among candidate fields.
    ///
    /// Empty strings, zero, `false` and absent values count as not present.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Absent => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::List(_) | Self::Map(_) => true,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// String coercion; absent values become the empty string
    pub fn to_text(&self) -> String {
        match self {
            Self::Absent => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
            Self::List(_) | Self::Map(_) => self.to_json().to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self)
    }
}

/// Formats a number the way it is shown in table cells: integral values
/// without a trailing `.0`, and no negative zero.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    format!("{}", n)
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Absent)
    }
}

impl From<&serde_json::Value> for FieldValue {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Absent,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map(Self::Number).unwrap_or(Self::Absent),
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Largest integer an `f64` holds exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

impl From<&FieldValue> for serde_json::Value {
    fn from(value: &FieldValue) -> Self {
        use serde_json::Value;
        match value {
            FieldValue::Absent => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                Value::from(*n as i64)
            }
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            FieldValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// A single row of tabular data
///
/// Records carry no stable identity; within one collection snapshot a record
/// is identified by its position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field (builder pattern)
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Value of a field, [`FieldValue::Absent`] when the field is missing
    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&ABSENT)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// First truthy value among the candidate fields, in order
    pub fn first_present<S: AsRef<str>>(&self, candidates: &[S]) -> Option<&FieldValue> {
        candidates
            .iter()
            .map(|name| self.get(name.as_ref()))
            .find(|value| value.is_truthy())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record from a JSON object; any other JSON value yields `None`
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        value.as_object().map(|map| {
            map.iter()
                .map(|(k, v)| (k.clone(), FieldValue::from(v)))
                .collect()
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!FieldValue::Absent.is_truthy());
        assert!(!FieldValue::text("").is_truthy());
        assert!(!FieldValue::Number(0.0).is_truthy());
        assert!(!FieldValue::Bool(false).is_truthy());
        assert!(FieldValue::text("2024-01-01").is_truthy());
        assert!(FieldValue::Number(1.5).is_truthy());
    }

    #[test]
    fn test_to_text() {
        assert_eq!(FieldValue::Absent.to_text(), "");
        assert_eq!(FieldValue::Number(100.0).to_text(), "100");
        assert_eq!(FieldValue::Number(20.5).to_text(), "20.5");
        assert_eq!(FieldValue::Number(-0.0).to_text(), "0");
        assert_eq!(FieldValue::Bool(true).to_text(), "true");
        assert_eq!(FieldValue::text("₪100").to_text(), "₪100");
    }

    #[test]
    fn test_record_get_missing_is_absent() {
        let record = Record::new().with("amount", 50);
        assert_eq!(record.get("amount"), &FieldValue::Number(50.0));
        assert!(record.get("missing").is_absent());
        assert!(!record.contains("missing"));
    }

    #[test]
    fn test_first_present() {
        let record = Record::new()
            .with("transaction_date", "")
            .with("date", "2024-01-02")
            .with("createdAt", "2024-01-03");

        let found = record.first_present(&["transaction_date", "date", "createdAt"]);
        assert_eq!(found, Some(&FieldValue::text("2024-01-02")));
        assert!(record.first_present(&["nope"]).is_none());
    }

    #[test]
    fn test_json_round_trip_shape() {
        let value = json!({
            "amount": 12.5,
            "action_type": "deposit",
            "note": null,
            "tags": ["a", "b"],
            "meta": {"label": "x"}
        });
        let record = Record::from_json(&value).unwrap();
        assert_eq!(record.get("amount"), &FieldValue::Number(12.5));
        assert!(record.get("note").is_absent());
        assert!(matches!(record.get("tags"), FieldValue::List(items) if items.len() == 2));
        assert_eq!(record.to_json(), value);
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(Record::from_json(&json!(42)).is_none());
        assert!(Record::from_json(&json!("row")).is_none());
        assert!(Record::from_json(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_serde_deserialize() {
        let record: Record =
            serde_json::from_str(r#"{"name":"Dana","balance":250,"active":true,"x":null}"#)
                .unwrap();
        assert_eq!(record.get("name"), &FieldValue::text("Dana"));
        assert_eq!(record.get("balance"), &FieldValue::Number(250.0));
        assert_eq!(record.get("active"), &FieldValue::Bool(true));
        assert!(record.get("x").is_absent());
    }

    #[test]
    fn test_json_keeps_integers() {
        let value = json!({"amount": 100, "rate": 2.5, "meta": {"a": 1, "big": -42}});
        let record = Record::from_json(&value).unwrap();
        assert_eq!(record.to_json(), value);
        assert_eq!(serde_json::Value::from(&FieldValue::Number(1e300)), json!(1e300));
    }
}
