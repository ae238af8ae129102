use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    #[serde(default)]
    pub value: String,
}

impl FieldValue {
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

/// One reviewable row of the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

impl Card {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, field_id: &str, value: &str) -> Self {
        self.fields
            .insert(field_id.to_string(), FieldValue::new(value));
        self
    }

    pub fn field(&self, field_id: &str) -> Option<&str> {
        self.fields.get(field_id).map(|f| f.value.as_str())
    }
}

/// Ordered field-id -> label mapping. Insertion order is column order.
///
/// Serialized as a JSON object; deserialization keeps the keys in document
/// order rather than sorting or hashing them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchema {
    fields: Vec<(String, String)>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, or relabels it in place if the id is already present.
    pub fn insert(&mut self, field_id: &str, label: &str) {
        match self.fields.iter_mut().find(|(id, _)| id == field_id) {
            Some(entry) => entry.1 = label.to_string(),
            None => self
                .fields
                .push((field_id.to_string(), label.to_string())),
        }
    }

    pub fn with_field(mut self, field_id: &str, label: &str) -> Self {
        self.insert(field_id, label);
        self
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(id, _)| id.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, label)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for FieldSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (id, label) in &self.fields {
            map.serialize_entry(id, label)?;
        }
        map.end()
    }
}

struct FieldSchemaVisitor;

impl<'de> Visitor<'de> for FieldSchemaVisitor {
    type Value = FieldSchema;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of field id to label")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut schema = FieldSchema::new();
        while let Some((id, label)) = access.next_entry::<String, String>()? {
            schema.insert(&id, &label);
        }
        Ok(schema)
    }
}

impl<'de> Deserialize<'de> for FieldSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldSchemaVisitor)
    }
}

/// Label of the review batch currently on screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    pub label: Option<String>,
}

impl EventContext {
    pub fn new(label: Option<&str>) -> Self {
        Self {
            label: label.map(str::to_string),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionType {
    #[serde(rename = "archive")]
    Archive,
    #[serde(rename = "mark_exported")]
    MarkExported,
    #[serde(rename = "export")]
    Export,
    #[serde(rename = "delete")]
    Delete,
    #[serde(rename = "move")]
    Move,
}

impl ActionType {
    /// Verb used in "select at least one card to ..." and failure text.
    pub fn verb(&self) -> &'static str {
        match self {
            ActionType::Archive => "archive",
            ActionType::MarkExported => "mark as exported",
            ActionType::Export => "export",
            ActionType::Delete => "delete",
            ActionType::Move => "move",
        }
    }

    pub fn success_description(&self, count: usize) -> String {
        let cards = pluralize(count, "card", "cards");
        match self {
            ActionType::Archive => format!("Archived {}", cards),
            ActionType::MarkExported => format!("Marked {} as exported", cards),
            ActionType::Export => format!("Exported {}", cards),
            ActionType::Delete => format!("Deleted {}", cards),
            ActionType::Move => format!("Moved {} to reviewed", cards),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Archive => write!(f, "archive"),
            ActionType::MarkExported => write!(f, "mark_exported"),
            ActionType::Export => write!(f, "export"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::Move => write!(f, "move"),
        }
    }
}

impl std::str::FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "archive" => Ok(ActionType::Archive),
            "mark_exported" | "mark-exported" => Ok(ActionType::MarkExported),
            "export" => Ok(ActionType::Export),
            "delete" => Ok(ActionType::Delete),
            "move" => Ok(ActionType::Move),
            _ => Err(format!("Invalid action type: {}", s)),
        }
    }
}

/// "1 card", "3 cards".
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
