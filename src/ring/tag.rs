//! Canonical serialized form of a chain.
//!
//! The same structure is the persistence format and the cache key, so field
//! order and list order are fixed: modifiers sorted by
//! `(operation, attribute, magnitude)`, `extra` sorted by attribute key, all
//! numbers in fixed-point. Reading is lenient: absent or wrong-typed keys
//! read as their defaults, and list entries that are not complete modifier
//! objects are skipped. Only unparsable text or a non-object root is an error.
//!
//! ```
//! use rust_spell::ring::RingTag;
//!
//! let tag = RingTag::from_json(r#"{"module": "shape_self", "extra": {"range": 4000000}}"#).unwrap();
//! assert_eq!(tag.module.as_deref(), Some("shape_self"));
//! assert_eq!(tag.depth(), 1);
//! assert!(tag.to_json().starts_with(r#"{"extra":{"range":4000000}"#));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::attributes::{AttributeModifier, Operation};
use crate::core::Fixed;
use crate::error::SpellError;

/// One persisted compile-time modifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierTag {
    /// Operation index in evaluation order.
    pub operation: i64,
    pub attribute: String,
    pub modifier: Fixed,
}

impl ModifierTag {
    /// Rebuild the modifier. Out-of-range operation indices wrap.
    #[must_use]
    pub fn to_modifier(&self) -> AttributeModifier {
        AttributeModifier::from_fixed(
            self.attribute.clone(),
            Operation::from_index(self.operation),
            self.modifier,
        )
    }
}

impl From<&AttributeModifier> for ModifierTag {
    fn from(modifier: &AttributeModifier) -> Self {
        Self {
            operation: modifier.operation().index() as i64,
            attribute: modifier.attribute().as_str().to_string(),
            modifier: modifier.magnitude_fixed(),
        }
    }
}

/// Persisted ring, with its child nested inside.
///
/// Children are shared, so the tag of every ring in a compiled chain points
/// into the same tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct RingTag {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<ModifierTag>,

    pub extra: BTreeMap<String, Fixed>,

    pub primary_color: String,

    pub secondary_color: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_ring: Option<Arc<RingTag>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl RingTag {
    /// Parse a persisted chain.
    pub fn from_json(json: &str) -> Result<Self, SpellError> {
        let value: Value = serde_json::from_str(json).map_err(SpellError::MalformedChain)?;
        Self::from_value(value).map_err(SpellError::MalformedChain)
    }

    /// Read a persisted chain from parsed JSON.
    ///
    /// The nesting is walked iteratively and rebuilt leaf first. A
    /// `child_ring` that is not an object ends the chain.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let Value::Object(mut fields) = value else {
            return Err(de::Error::custom("a persisted ring must be a JSON object"));
        };

        let mut rings = Vec::new();
        loop {
            let child = fields.remove("child_ring");
            rings.push(Self::read_fields(&fields));
            match child {
                Some(Value::Object(next)) => fields = next,
                _ => break,
            }
        }

        let mut rings = rings.into_iter().rev();
        let mut tag = rings.next().unwrap_or_default();
        for mut parent in rings {
            parent.child_ring = Some(Arc::new(tag));
            tag = parent;
        }
        Ok(tag)
    }

    /// Canonical JSON text.
    #[must_use]
    pub fn to_json(&self) -> String {
        // Cannot fail: all map keys are strings.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Number of rings in this tag, itself included.
    #[must_use]
    pub fn depth(&self) -> usize {
        std::iter::successors(Some(self), |tag| tag.child_ring.as_deref()).count()
    }

    fn read_fields(fields: &Map<String, Value>) -> Self {
        let modifiers = fields
            .get("modifiers")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(read_modifier).collect())
            .unwrap_or_default();
        let extra = fields
            .get("extra")
            .and_then(Value::as_object)
            .map(|extra| {
                extra
                    .iter()
                    .filter_map(|(key, value)| Some((key.clone(), read_fixed(value)?)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            modifiers,
            extra,
            primary_color: read_string(fields, "primary_color").unwrap_or_default(),
            secondary_color: read_string(fields, "secondary_color").unwrap_or_default(),
            child_ring: None,
            module: read_string(fields, "module"),
        }
    }
}

impl<'de> Deserialize<'de> for RingTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

fn read_string(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key)?.as_str().map(str::to_string)
}

/// Stored numbers are raw fixed-point integers; anything else is unreadable.
fn read_fixed(value: &Value) -> Option<Fixed> {
    value.as_i64().map(Fixed::from_raw)
}

fn read_modifier(entry: &Value) -> Option<ModifierTag> {
    let entry = entry.as_object()?;
    Some(ModifierTag {
        operation: entry.get("operation")?.as_i64()?,
        attribute: entry.get("attribute")?.as_str()?.to_string(),
        modifier: read_fixed(entry.get("modifier")?)?,
    })
}
