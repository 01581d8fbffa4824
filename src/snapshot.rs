use crate::error::SnapshotError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-screen box of a placeholder, in the placeholder's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for SnapshotValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Non-finite numbers are stored as `0.0`: NaN never equals itself and has
/// no JSON form.
impl From<f64> for SnapshotValue {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Self::Number(value)
        } else {
            Self::Number(0.0)
        }
    }
}

impl From<i64> for SnapshotValue {
    fn from(value: i64) -> Self {
        Self::from(value as f64)
    }
}

impl From<&str> for SnapshotValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SnapshotValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Desired native-overlay state at one point in time.
///
/// Snapshots are never mutated after capture; every synchronization pass
/// builds a fresh one and compares it by value against the baseline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    fields: BTreeMap<String, SnapshotValue>,
}

impl Snapshot {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SnapshotValue> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SnapshotValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Names of fields whose values differ between `self` and `other`,
    /// including fields present on only one side.
    #[must_use]
    pub fn changed_fields<'a>(&'a self, other: &'a Snapshot) -> Vec<&'a str> {
        let mut changed: Vec<&str> = self
            .fields
            .iter()
            .filter(|(name, value)| other.fields.get(*name) != Some(*value))
            .map(|(name, _)| name.as_str())
            .collect();

        changed.extend(
            other
                .fields
                .keys()
                .filter(|name| !self.fields.contains_key(*name))
                .map(String::as_str),
        );
        changed
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(name, value)| {
                    let json = match value {
                        SnapshotValue::Bool(flag) => serde_json::Value::Bool(*flag),
                        SnapshotValue::Number(number) => serde_json::Number::from_f64(*number)
                            .map(serde_json::Value::Number)
                            .unwrap_or(serde_json::Value::Null),
                        SnapshotValue::Text(text) => serde_json::Value::String(text.clone()),
                    };
                    (name.clone(), json)
                })
                .collect(),
        )
    }
}

impl<K, V> FromIterator<(K, V)> for Snapshot
where
    K: Into<String>,
    V: Into<SnapshotValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// Collects geometry plus per-component fields into a [`Snapshot`].
#[derive(Debug)]
pub struct SnapshotBuilder {
    fields: BTreeMap<String, SnapshotValue>,
}

impl SnapshotBuilder {
    /// Starts a snapshot from the placeholder box. A detached placeholder has
    /// no box, and nothing may be sent to the bridge for it.
    pub fn new(geometry: Option<Geometry>) -> Result<Self, SnapshotError> {
        let geometry = geometry.ok_or(SnapshotError::GeometryUnavailable)?;
        let mut builder = Self {
            fields: BTreeMap::new(),
        };
        builder
            .field("left", geometry.left)
            .field("top", geometry.top)
            .field("width", geometry.width)
            .field("height", geometry.height);
        Ok(builder)
    }

    pub fn field(&mut self, name: &str, value: impl Into<SnapshotValue>) -> &mut Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn finish(self) -> Snapshot {
        Snapshot {
            fields: self.fields,
        }
    }
}
