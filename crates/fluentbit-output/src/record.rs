// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Record model consumed by the output modules.
//!
//! A record is one event plus its event data, an optional event data stream
//! and an optional tag. The output modules only rely on the
//! [`AttributeContainer`] capability to enumerate attributes, so any record
//! shape implementing it can be written.
//!
//! Records can be read from JSON. Plain JSON values map onto the matching
//! [`AttributeValue`] variants; objects carrying a `"__type__"` marker select
//! the typed variants:
//!
//! ```json
//! {"__type__": "bytes", "stream": [255, 254]}
//! {"__type__": "DateTimeValues", "timestamp": 1281647951000000}
//! {"__type__": "AttributeContainerIdentifier", "identifier": "event_data.4"}
//! {"__type__": "PathSpec", "type_indicator": "OS", "location": "/tmp/x"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const TYPE_MARKER: &str = "__type__";

/// Value of a single record attribute.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Raw bytes written by a parser; not valid JSON text until sanitized.
    Bytes(Vec<u8>),
    /// Identifier of another attribute container in the store.
    Identifier(String),
    /// Date and time value as a POSIX timestamp in microseconds.
    DateTime(i64),
    List(Vec<AttributeValue>),
    Object(Map<String, Value>),
    PathSpec(PathSpec),
}

impl AttributeValue {
    /// Date and time values, and lists of them, are surfaced through the
    /// event timestamp rather than as text fields.
    pub fn is_date_time(&self) -> bool {
        match self {
            AttributeValue::DateTime(_) => true,
            AttributeValue::List(values) => {
                matches!(values.first(), Some(AttributeValue::DateTime(_)))
            }
            _ => false,
        }
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self, AttributeValue::Identifier(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AttributeValue::Null,
            Value::Bool(value) => AttributeValue::Bool(value),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => AttributeValue::Integer(integer),
                None => number
                    .as_f64()
                    .map_or(AttributeValue::Null, AttributeValue::Float),
            },
            Value::String(text) => AttributeValue::Text(text),
            Value::Array(values) => {
                AttributeValue::List(values.into_iter().map(AttributeValue::from).collect())
            }
            Value::Object(object) => from_typed_object(object),
        }
    }
}

fn from_typed_object(mut object: Map<String, Value>) -> AttributeValue {
    let marker = object
        .get(TYPE_MARKER)
        .and_then(Value::as_str)
        .map(str::to_owned);

    match marker.as_deref() {
        Some("bytes") => {
            let stream = object
                .remove("stream")
                .and_then(|stream| serde_json::from_value::<Vec<u8>>(stream).ok());
            match stream {
                Some(bytes) => AttributeValue::Bytes(bytes),
                None => AttributeValue::Object(object),
            }
        }
        Some("DateTimeValues") => match object.get("timestamp").and_then(Value::as_i64) {
            Some(timestamp) => AttributeValue::DateTime(timestamp),
            None => AttributeValue::Object(object),
        },
        Some("AttributeContainerIdentifier") => match object.remove("identifier") {
            Some(Value::String(identifier)) => AttributeValue::Identifier(identifier),
            Some(other) => AttributeValue::Identifier(other.to_string()),
            None => AttributeValue::Object(object),
        },
        Some("PathSpec") => {
            match serde_json::from_value::<PathSpec>(Value::Object(object.clone())) {
                Ok(path_spec) => AttributeValue::PathSpec(path_spec),
                Err(_) => AttributeValue::Object(object),
            }
        }
        _ => AttributeValue::Object(object),
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        AttributeValue::Bytes(value)
    }
}

impl From<PathSpec> for AttributeValue {
    fn from(value: PathSpec) -> Self {
        AttributeValue::PathSpec(value)
    }
}

/// Path specification locating the data an event was extracted from.
///
/// Only `type_indicator`, `location` and `parent` are interpreted; any other
/// property is carried through serialization untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSpec {
    pub type_indicator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<PathSpec>>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl PathSpec {
    pub fn new(type_indicator: &str, location: Option<&str>) -> Self {
        PathSpec {
            type_indicator: type_indicator.to_string(),
            location: location.map(str::to_string),
            parent: None,
            properties: Map::new(),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: PathSpec) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }
}

/// Capability to enumerate `(name, value)` attribute pairs.
pub trait AttributeContainer: Send + Sync {
    fn attributes(&self) -> Box<dyn Iterator<Item = (&str, &AttributeValue)> + '_>;

    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes()
            .find(|(attribute_name, _)| *attribute_name == name)
            .map(|(_, value)| value)
    }
}

/// Event data: an attribute container with a declared data type.
pub trait EventDataSource: AttributeContainer {
    fn data_type(&self) -> &str;
}

/// Base event: when it happened and what the timestamp means.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Event {
    /// POSIX timestamp in microseconds.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub timestamp_desc: String,
}

impl Event {
    pub fn new(timestamp: i64, timestamp_desc: &str) -> Self {
        Event {
            timestamp,
            timestamp_desc: timestamp_desc.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventData {
    pub data_type: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl EventData {
    pub fn new(data_type: &str) -> Self {
        EventData {
            data_type: data_type.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }
}

impl AttributeContainer for EventData {
    fn attributes(&self) -> Box<dyn Iterator<Item = (&str, &AttributeValue)> + '_> {
        Box::new(
            self.attributes
                .iter()
                .map(|(name, value)| (name.as_str(), value)),
        )
    }

    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

impl EventDataSource for EventData {
    fn data_type(&self) -> &str {
        &self.data_type
    }
}

/// Attributes of the data stream an event was extracted from, such as its
/// path specification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventDataStream {
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl EventDataStream {
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }
}

impl AttributeContainer for EventDataStream {
    fn attributes(&self) -> Box<dyn Iterator<Item = (&str, &AttributeValue)> + '_> {
        Box::new(
            self.attributes
                .iter()
                .map(|(name, value)| (name.as_str(), value)),
        )
    }

    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventTag {
    #[serde(default)]
    pub labels: Vec<String>,
}

/// One logical record as produced upstream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub event: Event,
    pub event_data: EventData,
    #[serde(default)]
    pub event_data_stream: Option<EventDataStream>,
    #[serde(default)]
    pub event_tag: Option<EventTag>,
}

impl EventRecord {
    pub fn view(&self) -> RecordView<'_> {
        RecordView {
            event: &self.event,
            event_data: &self.event_data,
            event_data_stream: self
                .event_data_stream
                .as_ref()
                .map(|stream| stream as &dyn AttributeContainer),
            event_tag: self.event_tag.as_ref(),
        }
    }
}

/// Borrowed components of one record, independent of how they are stored.
#[derive(Clone, Copy)]
pub struct RecordView<'a> {
    pub event: &'a Event,
    pub event_data: &'a dyn EventDataSource,
    pub event_data_stream: Option<&'a dyn AttributeContainer>,
    pub event_tag: Option<&'a EventTag>,
}

impl RecordView<'_> {
    /// Looks up an attribute, preferring the event data stream over the
    /// event data.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.event_data_stream
            .and_then(|stream| stream.attribute(name))
            .or_else(|| self.event_data.attribute(name))
    }
}
