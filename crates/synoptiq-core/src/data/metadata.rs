//! Per-feature metadata records and faceted filtering.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key holding the storey a feature belongs to.
pub const FLOOR_ID_KEY: &str = "floor_id";

/// An opaque, comparable attribute token.
///
/// Values compare by exact equality: `Integer(1)` and `Text("1")` are
/// different tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// Converts a scalar JSON value. Null, arrays and objects have no token.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    /// An empty string carries no information for faceting.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Bool(_) => 0,
            Self::Integer(_) => 1,
            Self::Float(_) => 2,
            Self::Text(_) => 3,
        }
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for AttributeValue {}

impl Hash for AttributeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Bool(b) => b.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            Self::Text(s) => s.hash(state),
        }
    }
}

/// Sorts by rendered text first, so preset lists read alphabetically.
impl Ord for AttributeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string()
            .cmp(&other.to_string())
            .then_with(|| self.rank().cmp(&other.rank()))
            .then_with(|| match (self, other) {
                (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for AttributeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Attributes of one feature, keyed by feature id.
///
/// Decoded from a flat JSON object; null and non-scalar attributes are
/// dropped on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct MetadataRecord {
    pub id: String,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl MetadataRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn floor_id(&self) -> Option<&AttributeValue> {
        self.get(FLOOR_ID_KEY)
    }
}

impl TryFrom<Map<String, Value>> for MetadataRecord {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match map.remove("id") {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err("metadata record without an id".to_string()),
        };

        let attributes = map
            .iter()
            .filter_map(|(k, v)| AttributeValue::from_json(v).map(|a| (k.clone(), a)))
            .collect();

        Ok(Self { id, attributes })
    }
}

impl From<MetadataRecord> for Map<String, Value> {
    fn from(record: MetadataRecord) -> Self {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(record.id));
        for (k, v) in record.attributes {
            map.insert(k, v.to_json());
        }
        map
    }
}

/// Metadata records with a feature id lookup.
///
/// When several records share an id the last one wins.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    records: Vec<MetadataRecord>,
    by_id: HashMap<String, usize>,
}

impl MetadataIndex {
    pub fn new(records: Vec<MetadataRecord>) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self { records, by_id }
    }

    pub fn get(&self, feature_id: &str) -> Option<&MetadataRecord> {
        self.by_id.get(feature_id).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Faceted filter set: attribute key to allowed values.
///
/// A key with an empty list does not constrain anything. A record matches
/// when, for every constraining key, its value is one of the allowed values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveFilters(BTreeMap<String, Vec<AttributeValue>>);

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ActiveFilters::set`].
    pub fn with(mut self, key: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        self.set(key, values);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, values: Vec<AttributeValue>) {
        self.0.insert(key.into(), values);
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<AttributeValue>> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&[AttributeValue]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<AttributeValue>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when no key carries a non-empty list.
    pub fn is_unconstrained(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Applies the filter set to a feature's metadata record, if any.
    pub fn matches(&self, record: Option<&MetadataRecord>) -> bool {
        self.matches_except(record, None)
    }

    /// Same as [`ActiveFilters::matches`] with one key ignored.
    pub fn matches_except(&self, record: Option<&MetadataRecord>, skip: Option<&str>) -> bool {
        self.0
            .iter()
            .filter(|(key, allowed)| !allowed.is_empty() && Some(key.as_str()) != skip)
            .all(|(key, allowed)| {
                record
                    .and_then(|r| r.get(key))
                    .is_some_and(|value| allowed.contains(value))
            })
    }
}

impl From<BTreeMap<String, Vec<AttributeValue>>> for ActiveFilters {
    fn from(map: BTreeMap<String, Vec<AttributeValue>>) -> Self {
        Self(map)
    }
}
