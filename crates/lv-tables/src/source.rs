//! Record sources and upstream payload handling

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use lv_core::error::LvError;
use lv_core::result::{ApiResponse, LvResult};
use lv_core::traits::RecordSource;
use lv_core::types::Record;

use crate::compare::ValueComparator;
use crate::pipeline::stable_sort_by;
use crate::sorts::{attributes, SortDirection};

/// Extract records from an upstream payload.
///
/// Accepts a bare array or a response envelope carrying the array under
/// `collection_key`. Items that are not JSON objects are dropped.
pub fn records_from_value(value: &Value, collection_key: &str, source_name: &str) -> LvResult<Vec<Record>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => {
            let response: ApiResponse = serde_json::from_value(value.clone())?;
            let response = response.into_result(source_name)?;
            return match response.collection(collection_key) {
                Some(items) => Ok(objects(items)),
                None => Err(LvError::upstream(
                    source_name,
                    format!("response has no `{}` collection", collection_key),
                )),
            };
        }
        _ => {
            return Err(LvError::upstream(
                source_name,
                "payload is neither a list nor a response object",
            ))
        }
    };
    Ok(objects(items))
}

fn objects(items: &[Value]) -> Vec<Record> {
    let records: Vec<Record> = items.iter().filter_map(Record::from_json).collect();
    if records.len() < items.len() {
        tracing::debug!(dropped = items.len() - records.len(), "Skipped non-object items");
    }
    records
}

/// Map upstream user objects to user table rows
pub fn normalize_users(users: Vec<Record>) -> Vec<Record> {
    users
        .into_iter()
        .map(|user| {
            Record::new()
                .with(attributes::PHONE, user.get("phone_number").clone())
                .with(attributes::ID_NUM, user.get("id_number").clone())
                .with(attributes::BALANCE, user.get(attributes::BALANCE).clone())
                .with(attributes::ROLE, user.get(attributes::ROLE).clone())
                .with(attributes::NAME, user.get(attributes::NAME).clone())
        })
        .collect()
}

/// Order fetched history newest first
pub fn prepare_history(history: Vec<Record>, comparator: &ValueComparator) -> Vec<Record> {
    stable_sort_by(history, &mut |a: &Record, b: &Record| {
        comparator.compare_records(a, b, attributes::TRANSACTION_DATE, SortDirection::Desc)
    })
}

/// Reads a JSON payload from a file on every fetch
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    collection_key: String,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>, collection_key: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            collection_key: collection_key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> LvResult<Vec<Record>> {
        let text = fs::read_to_string(&self.path)?;
        let value: Value = serde_json::from_str(&text)?;
        let records = records_from_value(&value, &self.collection_key, &self.name())?;
        tracing::debug!(source = %self.path.display(), records = records.len(), "Records loaded");
        Ok(records)
    }
}
