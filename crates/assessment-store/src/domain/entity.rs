//! # Storage Entity
//!
//! The flat physical representation of one assessment record: a partition
//! key, a row key and a map of property name to scalar value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar property value accepted by the table store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl EntityValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EntityValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            EntityValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EntityValue::Float(v) => Some(*v),
            EntityValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EntityValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Size of the value in characters, as the table store measures it.
    pub fn char_len(&self) -> usize {
        match self {
            EntityValue::String(s) => s.chars().count(),
            EntityValue::Int(v) => v.to_string().len(),
            EntityValue::Float(v) => v.to_string().len(),
            EntityValue::Bool(v) => v.to_string().len(),
        }
    }
}

impl From<String> for EntityValue {
    fn from(value: String) -> Self {
        EntityValue::String(value)
    }
}

impl From<&str> for EntityValue {
    fn from(value: &str) -> Self {
        EntityValue::String(value.to_string())
    }
}

impl From<i64> for EntityValue {
    fn from(value: i64) -> Self {
        EntityValue::Int(value)
    }
}

impl From<f64> for EntityValue {
    fn from(value: f64) -> Self {
        EntityValue::Float(value)
    }
}

impl From<bool> for EntityValue {
    fn from(value: bool) -> Self {
        EntityValue::Bool(value)
    }
}

/// One row in the table store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEntity {
    pub partition_key: String,
    pub row_key: String,
    properties: BTreeMap<String, EntityValue>,
}

impl StorageEntity {
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Set a property, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<EntityValue>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<EntityValue> {
        self.properties.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&EntityValue> {
        self.properties.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(EntityValue::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(EntityValue::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(EntityValue::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(EntityValue::as_bool)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn properties(&self) -> impl Iterator<Item = (&String, &EntityValue)> {
        self.properties.iter()
    }

    /// Largest property as (name, size in characters).
    pub fn largest_property(&self) -> Option<(&str, usize)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.char_len()))
            .max_by_key(|(_, len)| *len)
    }
}
