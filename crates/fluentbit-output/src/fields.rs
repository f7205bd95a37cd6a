// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Projection of records onto flat field documents.
//!
//! A [`FieldSchema`] fixes the set of field names every document carries: the
//! default fields, followed by any additional fields and custom fields. The
//! [`FieldResolver`] turns one record into a document over that schema:
//!
//! 1. Event data attributes are collected, skipping container identifiers,
//!    date and time values and internal (`_` prefixed) attributes. The parser
//!    chain is published as `parser`.
//! 2. Event data stream attributes are merged in, overriding event data.
//! 3. Each field is resolved: path specifications are serialized, everything
//!    else goes through the [`FieldFormatter`]. A missing value falls back to
//!    the custom field value and then to the sentinel `"-"`.
//! 4. Every value is sanitized for JSON transport.

use crate::constants::{
    DEFAULT_FIELD_NAMES, PARSER_ALIAS, PARSER_CHAIN_ATTRIBUTE, PATH_SPEC_ATTRIBUTE,
    SENTINEL_VALUE,
};
use crate::formatting::{DefaultFieldFormatter, FieldFormatter};
use crate::mediator::OutputMediator;
use crate::path_spec::{JsonPathSpecSerializer, PathSpecSerializer};
use crate::record::{AttributeValue, RecordView};
use crate::sanitize::sanitize_field;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Flat, JSON-ready projection of one record.
pub type FieldDocument = Map<String, Value>;

/// Ordered set of output field names.
///
/// Immutable: reconfiguring yields a new schema computed from the defaults,
/// so one instance never affects another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    names: Vec<String>,
    additional_fields: Vec<String>,
    custom_fields: Vec<(String, String)>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        FieldSchema::new(&[], &[])
    }
}

impl FieldSchema {
    pub fn new(additional_fields: &[String], custom_fields: &[(String, String)]) -> Self {
        let mut names: Vec<String> = Vec::new();
        let candidates = DEFAULT_FIELD_NAMES
            .iter()
            .copied()
            .chain(additional_fields.iter().map(String::as_str))
            .chain(custom_fields.iter().map(|(name, _)| name.as_str()));
        for name in candidates {
            if !names.iter().any(|existing| existing == name) {
                names.push(name.to_string());
            }
        }

        FieldSchema {
            names,
            additional_fields: additional_fields.to_vec(),
            custom_fields: custom_fields.to_vec(),
        }
    }

    /// Extends the additional fields. Earlier additional fields are kept.
    #[must_use]
    pub fn with_additional_fields(&self, additional_fields: &[String]) -> Self {
        let mut extended = self.additional_fields.clone();
        extended.extend_from_slice(additional_fields);
        FieldSchema::new(&extended, &self.custom_fields)
    }

    /// Replaces the custom fields and their values.

    #[must_use]
    pub fn with_custom_fields(&self, custom_fields: &[(String, String)]) -> Self {
        FieldSchema::new(&self.additional_fields, custom_fields)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    /// Value of a custom field. When a name is configured more than once the
    /// last value wins.
    pub fn custom_value(&self, name: &str) -> Option<&str> {
        self.custom_fields
            .iter()
            .rev()
            .find(|(custom_name, _)| custom_name == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Resolves records into [`FieldDocument`]s over a [`FieldSchema`].
#[derive(Clone)]
pub struct FieldResolver {
    schema: FieldSchema,
    formatter: Arc<dyn FieldFormatter>,
    path_spec_serializer: Arc<dyn PathSpecSerializer>,
    emit_event_attributes: bool,
}

impl fmt::Debug for FieldResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldResolver")
            .field("schema", &self.schema)
            .field("emit_event_attributes", &self.emit_event_attributes)
            .finish_non_exhaustive()
    }
}

impl Default for FieldResolver {
    fn default() -> Self {
        FieldResolver::new(FieldSchema::default())
    }
}

impl FieldResolver {
    pub fn new(schema: FieldSchema) -> Self {
        FieldResolver {
            schema,
            formatter: Arc::new(DefaultFieldFormatter),
            path_spec_serializer: Arc::new(JsonPathSpecSerializer),
            emit_event_attributes: false,
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn FieldFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_path_spec_serializer(mut self, serializer: Arc<dyn PathSpecSerializer>) -> Self {
        self.path_spec_serializer = serializer;
        self
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn set_schema(&mut self, schema: FieldSchema) {
        self.schema = schema;
    }

    pub fn set_formatter(&mut self, formatter: Arc<dyn FieldFormatter>) {
        self.formatter = formatter;
    }

    /// When set, every eligible record attribute is emitted in addition to
    /// the schema fields.
    pub fn set_emit_event_attributes(&mut self, emit_event_attributes: bool) {
        self.emit_event_attributes = emit_event_attributes;
    }

    /// Resolves the field values of one record.
    ///
    /// Never fails: a field without value gets the sentinel, and a path
    /// specification that cannot be serialized is left out of the document.
    pub fn get_field_values(
        &self,
        mediator: &OutputMediator,
        record: RecordView<'_>,
    ) -> FieldDocument {
        let event_values = collect_event_values(record);

        let mut field_names: Vec<&str> = self.schema.names().iter().map(String::as_str).collect();
        if self.emit_event_attributes {
            field_names.extend(
                event_values
                    .keys()
                    .map(String::as_str)
                    .filter(|name| !self.schema.contains(name)),
            );
        }

        let data_type = record.event_data.data_type();
        let mut document = FieldDocument::new();
        for field_name in field_names {
            let field_value = if field_name == PATH_SPEC_ATTRIBUTE {
                match self.serialize_path_spec(event_values.get(field_name).copied()) {
                    Some(serialized) => Some(AttributeValue::Text(serialized)),
                    None => continue,
                }
            } else {
                self.formatter.format_field(mediator, field_name, record)
            };

            let field_value = field_value
                .or_else(|| self.schema.custom_value(field_name).map(AttributeValue::from))
                .unwrap_or_else(|| AttributeValue::from(SENTINEL_VALUE));

            document.insert(
                field_name.to_string(),
                sanitize_field(data_type, field_name, field_value),
            );
        }
        document
    }

    fn serialize_path_spec(&self, value: Option<&AttributeValue>) -> Option<String> {
        let Some(AttributeValue::PathSpec(path_spec)) = value else {
            debug!("Unable to serialize path specification: {:?}", value);
            return None;
        };
        match self.path_spec_serializer.write_serialized(path_spec) {
            Ok(serialized) => Some(serialized),
            Err(e) => {
                debug!("Unable to serialize path specification: {}", e);
                None
            }
        }
    }
}

/// Merges the eligible event data attributes with the event data stream
/// attributes, the latter taking precedence.
fn collect_event_values<'a>(record: RecordView<'a>) -> BTreeMap<String, &'a AttributeValue> {
    let mut event_values = BTreeMap::new();

    for (attribute_name, attribute_value) in record.event_data.attributes() {
        if attribute_value.is_identifier() || attribute_value.is_date_time() {
            continue;
        }
        let attribute_name = if attribute_name == PARSER_CHAIN_ATTRIBUTE {
            PARSER_ALIAS
        } else if attribute_name.starts_with('_') {
            continue;
        } else {
            attribute_name
        };
        event_values.insert(attribute_name.to_string(), attribute_value);
    }

    if let Some(event_data_stream) = record.event_data_stream {
        for (attribute_name, attribute_value) in event_data_stream.attributes() {
            event_values.insert(attribute_name.to_string(), attribute_value);
        }
    }

    event_values
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::{Event, EventData, EventDataStream, EventRecord, PathSpec};
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    struct FailingSerializer;

    impl PathSpecSerializer for FailingSerializer {
        fn write_serialized(&self, _path_spec: &PathSpec) -> Result<String, serde_json::Error> {
            Err(serde::ser::Error::custom("unsupported path specification"))
        }
    }

    /// Formatter that only knows attributes, so tests see the resolver rules.
    struct AttributeFormatter;

    impl FieldFormatter for AttributeFormatter {
        fn format_field(
            &self,
            _mediator: &OutputMediator,
            field_name: &str,
            record: RecordView<'_>,
        ) -> Option<AttributeValue> {
            record
                .attribute(field_name)
                .filter(|value| !matches!(value, AttributeValue::Null))
                .cloned()
        }
    }

    fn record() -> EventRecord {
        EventRecord {
            event: Event::new(1_340_821_021_000_000, "Creation Time"),
            event_data: EventData::new("fs:stat")
                .with_attribute("filename", "/var/log/syslog")
                .with_attribute("inode", 15_i64)
                .with_attribute("_parser_chain", "filestat")
                .with_attribute("_event_values_hash", "abc")
                .with_attribute(
                    "event_data_stream_identifier",
                    AttributeValue::Identifier("event_data_stream.1".into()),
                )
                .with_attribute("access_time", AttributeValue::DateTime(1))
                .with_attribute(
                    "times",
                    AttributeValue::List(vec![AttributeValue::DateTime(1)]),
                ),
            event_data_stream: Some(
                EventDataStream::default()
                    .with_attribute("inode", 16_i64)
                    .with_attribute("path_spec", PathSpec::new("OS", Some("/var/log/syslog"))),
            ),
            event_tag: None,
        }
    }

    fn keys(document: &FieldDocument) -> BTreeSet<String> {
        document.keys().cloned().collect()
    }

    #[test]
    fn test_default_schema() {
        let schema = FieldSchema::default();
        assert_eq!(schema.names(), DEFAULT_FIELD_NAMES.as_slice());
    }

    #[test]
    fn test_schema_extends_without_duplicates() {
        let schema = FieldSchema::new(
            &["parser".to_string(), "message".to_string()],
            &[("case".to_string(), "A-17".to_string())],
        );

        assert_eq!(schema.names().len(), DEFAULT_FIELD_NAMES.len() + 2);
        assert_eq!(schema.names()[8], "parser");
        assert_eq!(schema.names()[9], "case");
        assert_eq!(schema.custom_value("case"), Some("A-17"));
        assert_eq!(schema.custom_value("parser"), None);
    }

    #[test]
    fn test_schema_reconfiguration_is_per_instance() {
        let base = FieldSchema::default();
        let extended = base.with_additional_fields(&["inode".to_string()]);
        let with_custom = extended.with_custom_fields(&[("case".to_string(), "x".to_string())]);

        assert_eq!(base.names().len(), 8);
        assert_eq!(extended.names().len(), 9);
        assert!(with_custom.contains("inode"));
        assert!(with_custom.contains("case"));
        assert_eq!(FieldSchema::default(), base);
    }

    #[test]
    fn test_additional_fields_accumulate() {
        let schema = FieldSchema::default()
            .with_additional_fields(&["inode".to_string()])
            .with_additional_fields(&["parser".to_string(), "inode".to_string()]);

        assert_eq!(schema.names().len(), 10);
        assert_eq!(schema.names()[8], "inode");
        assert_eq!(schema.names()[9], "parser");
    }

    #[test]
    fn test_custom_field_last_value_wins() {
        let schema = FieldSchema::new(
            &[],
            &[
                ("case".to_string(), "first".to_string()),
                ("case".to_string(), "second".to_string()),
            ],
        );
        assert_eq!(schema.custom_value("case"), Some("second"));
        assert_eq!(schema.names().len(), 9);
    }

    #[test]
    fn test_document_covers_exactly_the_schema() {
        let resolver = FieldResolver::default();
        let record = record();

        let document = resolver.get_field_values(&OutputMediator::default(), record.view());

        let expected: BTreeSet<String> =
            DEFAULT_FIELD_NAMES.iter().map(|n| n.to_string()).collect();
        assert_eq!(keys(&document), expected);
        assert_eq!(document["message"], json!("-"));
        assert_eq!(document["tag"], json!("-"));
        assert_eq!(document["display_name"], json!("OS:/var/log/syslog"));
        assert_eq!(document["timestamp"], json!(1_340_821_021_000_000_i64));
    }

    #[test]
    fn test_sentinel_and_custom_values() {
        let schema = FieldSchema::new(
            &["missing".to_string()],
            &[
                ("case".to_string(), "A-17".to_string()),
                ("filename".to_string(), "unused".to_string()),
            ],
        );
        let resolver = FieldResolver::new(schema).with_formatter(Arc::new(AttributeFormatter));

        let document = resolver.get_field_values(&OutputMediator::default(), record().view());

        assert_eq!(document["missing"], json!("-"));
        assert_eq!(document["case"], json!("A-17"));
        assert_eq!(document["filename"], json!("/var/log/syslog"));
        assert_eq!(document["datetime"], json!("-"));
    }

    #[test]
    fn test_stream_attributes_override_event_data() {
        let schema = FieldSchema::new(&["inode".to_string()], &[]);
        let resolver = FieldResolver::new(schema).with_formatter(Arc::new(AttributeFormatter));

        let document = resolver.get_field_values(&OutputMediator::default(), record().view());

        assert_eq!(document["inode"], json!(16));
    }

    #[test]
    fn test_path_spec_is_serialized() {
        let schema = FieldSchema::new(&["path_spec".to_string()], &[]);
        let resolver = FieldResolver::new(schema);

        let document = resolver.get_field_values(&OutputMediator::default(), record().view());

        let serialized = document["path_spec"].as_str().unwrap();
        let value: Value = serde_json::from_str(serialized).unwrap();
        assert_eq!(value["__type__"], json!("PathSpec"));
        assert_eq!(value["location"], json!("/var/log/syslog"));
    }

    #[test]
    fn test_unserializable_path_spec_is_dropped() {
        let schema = FieldSchema::new(&["path_spec".to_string()], &[]);
        let resolver =
            FieldResolver::new(schema).with_path_spec_serializer(Arc::new(FailingSerializer));

        let document = resolver.get_field_values(&OutputMediator::default(), record().view());

        assert!(!document.contains_key("path_spec"));
        assert_eq!(document.len(), DEFAULT_FIELD_NAMES.len());
    }

    #[test]
    fn test_absent_path_spec_is_dropped() {
        let schema = FieldSchema::new(&["path_spec".to_string()], &[]);
        let resolver = FieldResolver::new(schema);
        let mut record = record();
        record.event_data_stream = None;

        let document = resolver.get_field_values(&OutputMediator::default(), record.view());

        assert!(!document.contains_key("path_spec"));
    }

    #[test]
    fn test_emit_event_attributes() {
        let mut resolver = FieldResolver::default();
        resolver.set_emit_event_attributes(true);

        let document = resolver.get_field_values(&OutputMediator::default(), record().view());

        assert_eq!(document["parser"], json!("filestat"));
        assert_eq!(document["inode"], json!(16));
        assert_eq!(document["filename"], json!("/var/log/syslog"));
        assert!(document["path_spec"].as_str().unwrap().contains("PathSpec"));
        assert!(!document.contains_key("_parser_chain"));
        assert!(!document.contains_key("_event_values_hash"));
        assert!(!document.contains_key("event_data_stream_identifier"));
        assert!(!document.contains_key("access_time"));
        assert!(!document.contains_key("times"));
    }

    #[test]
    fn test_bytes_attribute_is_sanitized() {
        let schema = FieldSchema::new(&["value_data".to_string()], &[]);
        let resolver = FieldResolver::new(schema);
        let mut record = record();
        record.event_data = record
            .event_data
            .with_attribute("value_data", vec![0xff_u8, 0xfe]);

        let document = resolver.get_field_values(&OutputMediator::default(), record.view());

        assert_eq!(document["value_data"], json!("\u{fffd}\u{fffd}"));
    }

    fn attribute_value() -> impl Strategy<Value = AttributeValue> {
        prop_oneof![
            Just(AttributeValue::Null),
            any::<i64>().prop_map(AttributeValue::Integer),
            ".*".prop_map(AttributeValue::Text),
            proptest::collection::vec(any::<u8>(), 0..8).prop_map(AttributeValue::Bytes),
            any::<i64>().prop_map(AttributeValue::DateTime),
            "[a-z_.]{1,12}".prop_map(AttributeValue::Identifier),
        ]
    }

    proptest! {
        #[test]
        fn test_key_set_equals_schema(
            attributes in proptest::collection::btree_map("_?[a-z]{1,10}", attribute_value(), 0..12),
            additional in proptest::collection::vec("[a-z]{1,10}", 0..4),
            custom in proptest::collection::vec(("[a-z]{1,10}", "[A-Za-z0-9]{0,6}"), 0..3),
        ) {
            let schema = FieldSchema::new(&additional, &custom);
            let resolver = FieldResolver::new(schema.clone());
            let record = EventRecord {
                event: Event::new(0, "Creation Time"),
                event_data: EventData {
                    data_type: "test:event".to_string(),
                    attributes,
                },
                event_data_stream: None,
                event_tag: None,
            };

            let document = resolver.get_field_values(&OutputMediator::default(), record.view());

            let expected: BTreeSet<String> = schema
                .names()
                .iter()
                .filter(|name| name.as_str() != PATH_SPEC_ATTRIBUTE)
                .cloned()
                .collect();
            prop_assert_eq!(keys(&document), expected);
            prop_assert!(document.values().all(|value| !value.is_null()));
        }
    }
}
