//! Derived display metadata
//!
//! An [`Annotator`] reads one field of a record and attaches a derived
//! field to a copy of it. The transaction tables use [`ActionAnnotator`] to
//! classify `action_type` into a label and a color tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lv_core::types::{FieldValue, Record};

use crate::sorts::attributes;

/// Color tags understood by the table view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionColor {
    Primary,
    Error,
    Success,
    Warning,
    Info,
}

impl ActionColor {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Error => "error",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Money coming in
    pub fn is_credit(&self) -> bool {
        matches!(self, Self::Primary | Self::Warning)
    }
}

/// Label and color for one kind of action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMeta {
    pub label: String,
    #[serde(rename = "colorTag")]
    pub color: ActionColor,
}

impl ActionMeta {
    pub fn new(label: impl Into<String>, color: ActionColor) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }

    pub fn is_credit(&self) -> bool {
        self.color.is_credit()
    }

    /// Amount with a `+`/`-` sign and currency suffix, e.g. `+ 100 ₪`
    pub fn signed_amount(&self, amount: &FieldValue) -> String {
        let sign = if self.is_credit() { '+' } else { '-' };
        format!("{} {} ₪", sign, amount.to_text())
    }

    /// Field value form: `{label, colorTag}`
    pub fn to_field_value(&self) -> FieldValue {
        let mut map = BTreeMap::new();
        map.insert("label".to_string(), FieldValue::text(self.label.clone()));
        map.insert("colorTag".to_string(), FieldValue::text(self.color.as_str()));
        FieldValue::Map(map)
    }

    /// Read back a value produced by [`ActionMeta::to_field_value`]
    pub fn from_field_value(value: &FieldValue) -> Option<Self> {
        let map = value.as_map()?;
        let label = map.get("label")?.as_str()?;
        let color = match map.get("colorTag")?.as_str()? {
            "primary" => ActionColor::Primary,
            "error" => ActionColor::Error,
            "success" => ActionColor::Success,
            "warning" => ActionColor::Warning,
            "info" => ActionColor::Info,
            _ => return None,
        };
        Some(Self::new(label, color))
    }
}

/// Keyword rule; matches when any keyword occurs in the lowercased action
#[derive(Debug, Clone)]
pub struct ActionRule {
    keywords: Vec<String>,
    meta: ActionMeta,
}

impl ActionRule {
    pub fn new<S: AsRef<str>>(keywords: &[S], label: impl Into<String>, color: ActionColor) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.as_ref().to_lowercase()).collect(),
            meta: ActionMeta::new(label, color),
        }
    }

    fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k.as_str()))
    }
}

/// Ordered keyword rules with a fallback; the first matching rule wins
#[derive(Debug, Clone)]
pub struct ActionClassifier {
    rules: Vec<ActionRule>,
    fallback: ActionMeta,
}

impl Default for ActionClassifier {
    fn default() -> Self {
        Self::standard()
    }
}

impl ActionClassifier {
    pub fn new(rules: Vec<ActionRule>, fallback: ActionMeta) -> Self {
        Self { rules, fallback }
    }

    /// Rules for account transactions
    pub fn standard() -> Self {
        Self::new(
            vec![
                ActionRule::new(&["deposit"], "Deposit", ActionColor::Primary),
                ActionRule::new(&["withdraw"], "Withdrawal", ActionColor::Error),
                ActionRule::new(&["transfer"], "Transfer", ActionColor::Success),
                ActionRule::new(&["received"], "Received", ActionColor::Warning),
                ActionRule::new(&["payment"], "Payment", ActionColor::Error),
            ],
            ActionMeta::new("Other", ActionColor::Info),
        )
    }

    pub fn classify(&self, action: &str) -> &ActionMeta {
        let normalized = action.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| &rule.meta)
            .unwrap_or(&self.fallback)
    }
}

/// Computes a derived field from one source field
pub trait Annotator {
    /// Field the derivation reads
    fn source_field(&self) -> &str;

    /// Field the derivation writes
    fn derived_field(&self) -> &str;

    /// Derive the annotation from a present source value
    fn derive(&self, source: &FieldValue) -> FieldValue;

    /// Copy of `record` with the derived field attached.
    ///
    /// Records whose source field is missing or empty come back unchanged.
    fn annotate(&self, record: &Record) -> Record {
        let source = record.get(self.source_field());
        if !source.is_truthy() {
            return record.clone();
        }
        let derived = self.derive(source);
        record.clone().with(self.derived_field(), derived)
    }
}

/// Attaches `actionMeta` derived from `action_type`
#[derive(Debug, Clone, Default)]
pub struct ActionAnnotator {
    classifier: ActionClassifier,
}

impl ActionAnnotator {
    pub fn new(classifier: ActionClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &ActionClassifier {
        &self.classifier
    }

    /// Classification of a record's action, annotated or not
    pub fn meta_for(&self, record: &Record) -> ActionMeta {
        ActionMeta::from_field_value(record.get(attributes::ACTION_META))
            .unwrap_or_else(|| {
                self.classifier
                    .classify(&record.get(attributes::ACTION_TYPE).to_text())
                    .clone()
            })
    }
}

impl Annotator for ActionAnnotator {
    fn source_field(&self) -> &str {
        attributes::ACTION_TYPE
    }

    fn derived_field(&self) -> &str {
        attributes::ACTION_META
    }

    fn derive(&self, source: &FieldValue) -> FieldValue {
        self.classifier.classify(&source.to_text()).to_field_value()
    }
}
